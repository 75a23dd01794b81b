//! Hit testing against a single keyframe.
//!
//! Entities are drawn equipment first, then players, then the ball, so the
//! point test walks that order in reverse to find the topmost hit.

use crate::model::{Element, ElementRef, Keyframe};
use kurbo::{Point, Rect};

pub const PLAYER_RADIUS: f64 = 14.0;
pub const EQUIPMENT_RADIUS: f64 = 12.0;
pub const BALL_RADIUS: f64 = 8.0;

/// What a pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Ball,
    Element(ElementRef),
}

/// Find the topmost entity at `p`. Returns `None` on background.
pub fn hit_test(frame: &Keyframe, p: Point) -> Option<HitTarget> {
    if let Some(ball) = frame.ball
        && ball.position().distance(p) <= BALL_RADIUS
    {
        return Some(HitTarget::Ball);
    }

    topmost(&frame.players, p, PLAYER_RADIUS)
        .or_else(|| topmost(&frame.equipment, p, EQUIPMENT_RADIUS))
}

fn topmost<E: Element>(items: &[E], p: Point, radius: f64) -> Option<HitTarget> {
    items
        .iter()
        .rev()
        .find(|e| e.position().distance(p) <= radius)
        .map(|e| HitTarget::Element(e.element_ref()))
}

/// Every player and equipment item whose center lies inside `rect`
/// (bounds inclusive). Used for marquee selection; the ball is never
/// selectable.
pub fn hit_test_rect(frame: &Keyframe, rect: Rect) -> Vec<ElementRef> {
    let inside = |c: Point| c.x >= rect.x0 && c.x <= rect.x1 && c.y >= rect.y0 && c.y <= rect.y1;

    frame
        .players
        .iter()
        .filter(|e| inside(e.position()))
        .map(Element::element_ref)
        .chain(
            frame
                .equipment
                .iter()
                .filter(|e| inside(e.position()))
                .map(Element::element_ref),
        )
        .collect()
}

/// Rectangle spanned by two corner points, regardless of drag direction.
pub fn normalize_rect(a: Point, b: Point) -> Rect {
    Rect::from_points(a, b)
}
