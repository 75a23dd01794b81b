pub mod catalog;
pub mod document;
pub mod hit;
pub mod id;
pub mod interpolate;
pub mod lint;
pub mod model;
pub mod playback;
pub mod surface;
pub mod timeline;

pub use catalog::{EquipmentDef, LABEL_PRESETS, LabelPreset, default_formation, player_color};
pub use document::{AnimationDocument, DEFAULT_SPEED, DocumentError};
pub use hit::{HitTarget, hit_test, hit_test_rect, normalize_rect};
pub use id::ElementId;
pub use interpolate::{InterpolatedFrame, interpolate};
pub use lint::{LintDiagnostic, LintSeverity, lint_document};
pub use model::*;
pub use playback::{Playback, PlaybackEnd, PlaybackState, TickOutcome};
pub use surface::{ClientRect, ViewMode, to_surface};
pub use timeline::Timeline;

// Re-export kurbo geometry so downstream crates share one version.
pub use kurbo::{Point, Rect, Vec2};
