//! Input abstraction layer.
//!
//! Pointer events reach the drag controller already mapped into surface
//! coordinates; the session does the screen → surface transform and drops
//! events that arrive before the surface has been measured.

use cb_core::Point;
use serde::{Deserialize, Serialize};

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    /// Ctrl on Windows/Linux, ⌘ on macOS.
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// A pointer event in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { at: Point, modifiers: Modifiers },
    PointerMove { at: Point, modifiers: Modifiers },
    PointerUp,
    /// The pointer left the drawing surface. Ends a gesture like `PointerUp`.
    PointerLeave,
}

impl InputEvent {
    pub fn down(at: Point, modifiers: Modifiers) -> Self {
        Self::PointerDown { at, modifiers }
    }

    pub fn moved(at: Point, modifiers: Modifiers) -> Self {
        Self::PointerMove { at, modifiers }
    }

    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { at, .. } | Self::PointerMove { at, .. } => Some(*at),
            Self::PointerUp | Self::PointerLeave => None,
        }
    }

    /// True for events that end a gesture.
    pub fn is_release(&self) -> bool {
        matches!(self, Self::PointerUp | Self::PointerLeave)
    }
}
