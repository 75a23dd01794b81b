//! Multi-selection and marquee state.
//!
//! The selection stores `(kind, id)` refs and never holds frame data, so an
//! entity deleted elsewhere simply stops matching: `resolve` filters stale
//! refs out against the current frame and `prune` drops them for good.

use cb_core::model::{ElementKind, ElementRef, Keyframe};
use cb_core::{ElementId, Point, Rect, normalize_rect};
use smallvec::SmallVec;

use crate::mutation::Refs;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    items: Refs,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain select replaces the selection; additive select toggles `r`.
    pub fn select(&mut self, r: ElementRef, additive: bool) {
        if !additive {
            self.items.clear();
            self.items.push(r);
            return;
        }
        match self.items.iter().position(|s| *s == r) {
            Some(i) => {
                self.items.remove(i);
            }
            None => self.items.push(r),
        }
    }

    pub fn select_all(&mut self, refs: impl IntoIterator<Item = ElementRef>) {
        self.items.clear();
        for r in refs {
            if !self.items.contains(&r) {
                self.items.push(r);
            }
        }
    }

    pub fn deselect_all(&mut self) {
        self.items.clear();
    }

    pub fn contains(&self, r: ElementRef) -> bool {
        self.items.contains(&r)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Raw refs, possibly including ids no longer in the frame.
    pub fn items(&self) -> &[ElementRef] {
        &self.items
    }

    /// The refs that still exist in `frame`, in selection order.
    pub fn resolve(&self, frame: &Keyframe) -> Refs {
        self.items.iter().copied().filter(|r| frame.contains(*r)).collect()
    }

    /// Drop refs that no longer exist in `frame`. Returns whether any were dropped.
    pub fn prune(&mut self, frame: &Keyframe) -> bool {
        let before = self.items.len();
        self.items.retain(|r| frame.contains(*r));
        self.items.len() != before
    }

    /// Selected player ids still present in `frame`.
    pub fn players(&self, frame: &Keyframe) -> SmallVec<[ElementId; 8]> {
        self.resolve(frame)
            .into_iter()
            .filter(|r| r.kind == ElementKind::Player)
            .map(|r| r.id)
            .collect()
    }
}

/// A rubber-band rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marquee {
    pub start: Point,
    pub current: Point,
}

impl Marquee {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            current: start,
        }
    }

    /// Normalized rectangle, independent of drag direction.
    pub fn rect(&self) -> Rect {
        normalize_rect(self.start, self.current)
    }
}
