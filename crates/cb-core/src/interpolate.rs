//! Keyframe interpolation for playback.
//!
//! Progress in `[0, 1]` spans the whole animation, split into `N - 1` equal
//! segments. Within a segment, positions move along a quadratic ease-in-out
//! curve. Entities are paired across the two frames by id:
//!
//! | In `from` | In `to` | Position            | Scale                      |
//! |-----------|---------|---------------------|----------------------------|
//! | yes       | yes     | eased lerp          | 1                          |
//! | no        | yes     | target position     | 0 → 1 over first third     |
//! | yes       | no      | frozen at `from`    | 1 → 0 over last third      |
//!
//! Scale ramps follow the linear within-segment progress so that pop-in and
//! pop-out timing does not depend on the easing curve. The ball follows the
//! same rule as players and equipment when it is missing on one side.

use crate::id::ElementId;
use crate::model::{Ball, Element, ElementKind, ElementRef, Keyframe};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Quadratic ease-in-out.
pub fn ease_in_out_quad(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

/// Scale of an entity that only exists in the target frame.
pub fn appear_scale(t: f64) -> f64 {
    (t * 3.0).clamp(0.0, 1.0)
}

/// Scale of an entity that only exists in the source frame.
pub fn disappear_scale(t: f64) -> f64 {
    ((1.0 - t) * 3.0).clamp(0.0, 1.0)
}

/// Which pair of keyframes a progress value falls between.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: usize,
    pub to: usize,
    /// Linear progress within the segment, `[0, 1]`.
    pub t: f64,
}

/// Locate the segment for `progress` in an animation of `frame_count`
/// keyframes. Progress 1.0 lands at the end of the last segment.
pub fn locate_segment(frame_count: usize, progress: f64) -> Option<Segment> {
    if frame_count < 2 {
        return None;
    }
    let segments = frame_count - 1;
    let scaled = progress.clamp(0.0, 1.0) * segments as f64;
    let from = (scaled.floor() as usize).min(segments - 1);
    Some(Segment {
        from,
        to: from + 1,
        t: (scaled - from as f64).clamp(0.0, 1.0),
    })
}

/// A blended frame plus the per-entity scale factors to draw it with.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterpolatedFrame {
    pub frame: Keyframe,
    pub player_scales: HashMap<ElementId, f64>,
    pub equipment_scales: HashMap<ElementId, f64>,
    pub ball_scale: f64,
}

impl InterpolatedFrame {
    /// A frame drawn as-is: every entity at full size.
    pub fn unscaled(frame: Keyframe) -> Self {
        let ball_scale = if frame.ball.is_some() { 1.0 } else { 0.0 };
        Self {
            frame,
            player_scales: HashMap::new(),
            equipment_scales: HashMap::new(),
            ball_scale,
        }
    }

    /// Scale for an element. Elements with no recorded scale draw at full
    /// size when present and not at all when absent.
    pub fn scale_of(&self, r: ElementRef) -> f64 {
        let scales = match r.kind {
            ElementKind::Player => &self.player_scales,
            ElementKind::Equipment => &self.equipment_scales,
        };
        match scales.get(&r.id) {
            Some(s) => *s,
            None if self.frame.contains(r) => 1.0,
            None => 0.0,
        }
    }
}

/// Blend the keyframes at `progress`.
///
/// With a single keyframe, that keyframe is returned unscaled. Returns
/// `None` only for an empty slice. Inputs are never mutated.
pub fn interpolate(keyframes: &[Keyframe], progress: f64) -> Option<InterpolatedFrame> {
    let Some(seg) = locate_segment(keyframes.len(), progress) else {
        return keyframes.first().cloned().map(InterpolatedFrame::unscaled);
    };

    let from = &keyframes[seg.from];
    let to = &keyframes[seg.to];
    let eased = ease_in_out_quad(seg.t);

    let mut player_scales = HashMap::with_capacity(from.players.len());
    let mut equipment_scales = HashMap::with_capacity(from.equipment.len());
    let players = blend(&from.players, &to.players, eased, seg.t, &mut player_scales);
    let equipment = blend(&from.equipment, &to.equipment, eased, seg.t, &mut equipment_scales);

    let (ball, ball_scale) = match (from.ball, to.ball) {
        (Some(a), Some(b)) => (
            Some(Ball::from(a.position().lerp(b.position(), eased))),
            1.0,
        ),
        (Some(a), None) => (Some(a), disappear_scale(seg.t)),
        (None, Some(b)) => (Some(b), appear_scale(seg.t)),
        (None, None) => (None, 0.0),
    };

    Some(InterpolatedFrame {
        frame: Keyframe {
            id: from.id,
            players,
            ball,
            equipment,
        },
        player_scales,
        equipment_scales,
        ball_scale,
    })
}

/// Pair one entity collection across two frames by id.
///
/// Output order: every `from` entity in its original order, then the
/// entities that only appear in `to`.
fn blend<E: Element>(
    from: &[E],
    to: &[E],
    eased: f64,
    t: f64,
    scales: &mut HashMap<ElementId, f64>,
) -> Vec<E> {
    let to_by_id: HashMap<ElementId, &E> = to.iter().map(|e| (e.id(), e)).collect();
    let from_ids: HashSet<ElementId> = from.iter().map(Element::id).collect();

    let mut out = Vec::with_capacity(from.len() + to.len());
    for src in from {
        let mut e = src.clone();
        match to_by_id.get(&src.id()) {
            Some(dst) => {
                e.set_position(src.position().lerp(dst.position(), eased));
                scales.insert(src.id(), 1.0);
            }
            None => {
                scales.insert(src.id(), disappear_scale(t));
            }
        }
        out.push(e);
    }
    for dst in to.iter().filter(|e| !from_ids.contains(&e.id())) {
        scales.insert(dst.id(), appear_scale(t));
        out.push(dst.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_is_symmetric_and_pinned() {
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert_eq!(ease_in_out_quad(0.5), 0.5);
        assert_eq!(ease_in_out_quad(1.0), 1.0);
        let a = ease_in_out_quad(0.2);
        let b = ease_in_out_quad(0.8);
        assert!((a + b - 1.0).abs() < 1e-12);
    }

    #[test]
    fn scale_ramps() {
        assert_eq!(appear_scale(0.0), 0.0);
        assert!((appear_scale(0.1) - 0.3).abs() < 1e-9);
        assert_eq!(appear_scale(0.5), 1.0);
        assert_eq!(disappear_scale(0.5), 1.0);
        assert!((disappear_scale(0.9) - 0.3).abs() < 1e-9);
        assert_eq!(disappear_scale(1.0), 0.0);
    }

    #[test]
    fn segments_split_evenly() {
        assert_eq!(locate_segment(1, 0.5), None);
        let s = locate_segment(3, 0.25).unwrap();
        assert_eq!((s.from, s.to), (0, 1));
        assert!((s.t - 0.5).abs() < 1e-12);
        let s = locate_segment(3, 0.75).unwrap();
        assert_eq!((s.from, s.to), (1, 2));
        let s = locate_segment(3, 1.0).unwrap();
        assert_eq!((s.from, s.to, s.t), (1, 2, 1.0));
    }

    #[test]
    fn empty_input_yields_none() {
        assert!(interpolate(&[], 0.3).is_none());
    }
}
