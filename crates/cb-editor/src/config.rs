//! Editor tunables.

use cb_core::{DEFAULT_SPEED, PlaybackEnd};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Configuration for an editing session.
///
/// Every field has a default, so hosts may pass a partial JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum undo (and redo) depth. Oldest entries are dropped silently.
    /// Default: **50**.
    pub history_depth: usize,

    /// Offset of the first duplicated/pasted entity. Default: **20**.
    pub duplicate_offset: f64,
    /// Extra offset per further entity in the same batch. Default: **15**.
    pub duplicate_step: f64,

    /// Segment duration for new animations. Default: **1000**.
    pub default_speed: f64,
    /// Speeds accepted by `set_speed`; out-of-range values are clamped.
    pub min_speed: f64,
    pub max_speed: f64,

    /// Players in the starting formation. Default: **6**.
    pub formation_size: usize,

    /// Context menu footprint used to keep it inside the container.
    pub popup_width: f64,
    pub popup_height: f64,

    /// `Stop` in the editor, `Loop` for previews.
    pub playback_end: PlaybackEnd,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: 50,
            duplicate_offset: 20.0,
            duplicate_step: 15.0,
            default_speed: DEFAULT_SPEED,
            min_speed: 500.0,
            max_speed: 2000.0,
            formation_size: 6,
            popup_width: 180.0,
            popup_height: 100.0,
            playback_end: PlaybackEnd::Stop,
        }
    }
}

impl EditorConfig {
    /// The lightweight read-only preview: loops instead of stopping.
    pub fn preview() -> Self {
        Self {
            playback_end: PlaybackEnd::Loop,
            ..Self::default()
        }
    }

    pub fn speed_range(&self) -> RangeInclusive<f64> {
        self.min_speed..=self.max_speed
    }

    /// Offset applied to the `index`-th entity of a duplicate or paste.
    pub fn duplicate_offset_for(&self, index: usize) -> f64 {
        self.duplicate_offset + self.duplicate_step * index as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: EditorConfig = serde_json::from_str(r#"{"historyDepth": 5}"#).unwrap();
        assert_eq!(cfg.history_depth, 5);
        assert_eq!(cfg.popup_width, 180.0);
        assert_eq!(cfg.playback_end, PlaybackEnd::Stop);
    }

    #[test]
    fn offsets_stack() {
        let cfg = EditorConfig::default();
        assert_eq!(cfg.duplicate_offset_for(0), 20.0);
        assert_eq!(cfg.duplicate_offset_for(2), 50.0);
        assert!(cfg.speed_range().contains(&1000.0));
    }
}
