//! Playing-surface geometry and the pointer → surface coordinate transform.
//!
//! The logical surface is a fixed 320 × 640 portrait rectangle with a 20-unit
//! margin. Pointer positions arrive in screen space together with the
//! measured on-screen rectangle of the drawing surface; `to_surface` maps
//! them into logical space and clamps them inside the court lines.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

pub const SURFACE_WIDTH: f64 = 320.0;
pub const SURFACE_HEIGHT: f64 = 640.0;
pub const SURFACE_PADDING: f64 = 20.0;

/// Extra inset so a clamped element never straddles the court line.
pub const ELEMENT_INSET: f64 = 10.0;

/// How much of the surface is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// The whole surface.
    #[default]
    Full,
    /// Only the lower (home) half.
    Half,
    /// The whole surface with no guide lines drawn.
    Empty,
}

impl ViewMode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "full" => Some(ViewMode::Full),
            "half" => Some(ViewMode::Half),
            "empty" => Some(ViewMode::Empty),
            _ => None,
        }
    }

    /// Whether court lines are drawn in this mode.
    pub fn draws_lines(self) -> bool {
        !matches!(self, ViewMode::Empty)
    }

    /// The region of logical space visible in this mode.
    pub fn view_box(self) -> Rect {
        match self {
            ViewMode::Half => Rect::new(0.0, SURFACE_HEIGHT / 2.0, SURFACE_WIDTH, SURFACE_HEIGHT),
            ViewMode::Full | ViewMode::Empty => Rect::new(0.0, 0.0, SURFACE_WIDTH, SURFACE_HEIGHT),
        }
    }
}

/// The measured on-screen rectangle of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ClientRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A zero-sized or non-finite rect has not been laid out yet.
    pub fn is_measured(&self) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.left.is_finite()
            && self.top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

/// The interior region an element may occupy.
pub fn placement_bounds() -> Rect {
    let inset = SURFACE_PADDING + ELEMENT_INSET;
    Rect::new(inset, inset, SURFACE_WIDTH - inset, SURFACE_HEIGHT - inset)
}

/// Clamp a logical point into `placement_bounds`.
pub fn clamp_to_surface(p: Point) -> Point {
    let b = placement_bounds();
    Point::new(p.x.clamp(b.x0, b.x1), p.y.clamp(b.y0, b.y1))
}

/// Map a screen-space pointer position to clamped logical surface coordinates.
///
/// Returns `None` when the surface has not been measured; callers ignore the
/// event in that case.
pub fn to_surface(pointer: Point, rect: Option<ClientRect>, mode: ViewMode) -> Option<Point> {
    let rect = rect.filter(ClientRect::is_measured)?;
    let view = mode.view_box();

    let x = (pointer.x - rect.left) / rect.width * view.width() + view.x0;
    let y = (pointer.y - rect.top) / rect.height * view.height() + view.y0;

    Some(clamp_to_surface(Point::new(x, y)))
}

/// Reflect an x-coordinate about the surface's vertical center line.
pub fn mirror_x(x: f64) -> f64 {
    SURFACE_WIDTH - x
}
