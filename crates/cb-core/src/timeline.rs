//! The ordered keyframe list plus the current-frame pointer.
//!
//! Invariant: there is always at least one keyframe, and `current` is
//! always a valid index into it.

use crate::catalog::default_formation;
use crate::id::ElementId;
use crate::model::Keyframe;

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    keyframes: Vec<Keyframe>,
    current: usize,
}

impl Timeline {
    /// A timeline holding one default-formation keyframe.
    pub fn blank(player_count: usize) -> Self {
        Self {
            keyframes: vec![default_formation(player_count)],
            current: 0,
        }
    }

    /// Build from existing keyframes. Returns `None` for an empty list.
    pub fn from_keyframes(keyframes: Vec<Keyframe>) -> Option<Self> {
        if keyframes.is_empty() {
            return None;
        }
        Some(Self {
            keyframes,
            current: 0,
        })
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Keyframe {
        &self.keyframes[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Keyframe {
        &mut self.keyframes[self.current]
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.keyframes.len()
    }

    /// The current frame and every later one.
    pub fn forward_mut(&mut self) -> impl Iterator<Item = &mut Keyframe> {
        let from = self.current;
        self.keyframes[from..].iter_mut()
    }

    /// Every frame, regardless of the current pointer.
    pub fn all_mut(&mut self) -> impl Iterator<Item = &mut Keyframe> {
        self.keyframes.iter_mut()
    }

    /// Clone the current keyframe under a fresh id, insert it right after
    /// the current one, and move the pointer onto it. Returns the new index.
    pub fn add_keyframe(&mut self) -> usize {
        let copy = self.current().duplicate(ElementId::fresh("kf"));
        let at = self.current + 1;
        self.keyframes.insert(at, copy);
        self.current = at;
        log::debug!("keyframe added at {at} ({} total)", self.keyframes.len());
        at
    }

    /// Remove the current keyframe. Refused when it is the only one.
    pub fn delete_keyframe(&mut self) -> bool {
        if self.keyframes.len() <= 1 {
            return false;
        }
        self.keyframes.remove(self.current);
        self.current = self.current.min(self.keyframes.len() - 1);
        log::debug!(
            "keyframe deleted, now at {} ({} total)",
            self.current,
            self.keyframes.len()
        );
        true
    }

    /// Point at `index`. Out-of-range indices are refused.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.keyframes.len() {
            return false;
        }
        self.current = index;
        true
    }

    /// Swap in a whole keyframe list (undo/redo restore). The pointer is
    /// clamped to the new length; an empty list is refused.
    pub fn restore(&mut self, keyframes: Vec<Keyframe>) -> bool {
        if keyframes.is_empty() {
            return false;
        }
        self.keyframes = keyframes;
        self.current = self.current.min(self.keyframes.len() - 1);
        true
    }
}
