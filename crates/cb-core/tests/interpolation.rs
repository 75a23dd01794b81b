//! Integration tests: interpolation over documents loaded from JSON.

use cb_core::model::*;
use cb_core::{AnimationDocument, ElementId, interpolate};
use pretty_assertions::assert_eq;

fn load(json: &str) -> Vec<Keyframe> {
    AnimationDocument::from_json(json).unwrap().keyframes
}

fn p(id: &str) -> ElementRef {
    ElementRef::player(ElementId::intern(id))
}

fn eq(id: &str) -> ElementRef {
    ElementRef::equipment(ElementId::intern(id))
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ─── Continuous entities ─────────────────────────────────────────────────

#[test]
fn ping_pong_midpoint() {
    let frames = load(include_str!("fixtures/ping_pong.json"));
    let out = interpolate(&frames, 0.5).unwrap();

    let p1 = out.frame.player(ElementId::intern("p1")).unwrap();
    assert_eq!((p1.x, p1.y), (160.0, 190.0));
    assert_eq!(out.scale_of(p("p1")), 1.0);
    assert_eq!(out.frame.ball, Some(Ball { x: 160.0, y: 340.0 }));
    assert_eq!(out.ball_scale, 1.0);
}

#[test]
fn attributes_come_from_source_frame() {
    let frames = load(include_str!("fixtures/ping_pong.json"));
    let out = interpolate(&frames, 0.4).unwrap();
    let p1 = out.frame.player(ElementId::intern("p1")).unwrap();
    assert_eq!(p1.color, "#3b82f6");
    assert_eq!(p1.note.as_deref(), Some("Start left"));
    assert_eq!(out.frame.id, frames[0].id);
}

#[test]
fn endpoints_match_keyframes() {
    let frames = load(include_str!("fixtures/ping_pong.json"));
    let start = interpolate(&frames, 0.0).unwrap();
    assert_eq!(start.frame.players[0].x, 60.0);
    let end = interpolate(&frames, 1.0).unwrap();
    assert_eq!(end.frame.players[0].x, 260.0);
}

#[test]
fn easing_lags_then_catches_up() {
    let frames = load(include_str!("fixtures/ping_pong.json"));
    let x = |progress| interpolate(&frames, progress).unwrap().frame.players[0].x;
    // Quadratic ease-in: a quarter of the way in time is an eighth of the distance.
    assert!(approx(x(0.25), 60.0 + 200.0 * 0.125));
    assert!(approx(x(0.75), 60.0 + 200.0 * 0.875));
}

#[test]
fn three_frames_split_into_two_segments() {
    let frames = load(include_str!("fixtures/three_frames.json"));
    assert_eq!(interpolate(&frames, 0.25).unwrap().frame.players[0].x, 110.0);
    assert_eq!(interpolate(&frames, 0.5).unwrap().frame.players[0].x, 160.0);
    assert_eq!(interpolate(&frames, 0.75).unwrap().frame.players[0].x, 210.0);
}

// ─── Appearing / disappearing ────────────────────────────────────────────

#[test]
fn appearing_cone_pops_in_over_first_third() {
    let frames = load(include_str!("fixtures/appear_disappear.json"));

    let early = interpolate(&frames, 0.1).unwrap();
    let cone = early.frame.equipment_item(ElementId::intern("eq-cone")).unwrap();
    assert_eq!((cone.x, cone.y), (150.0, 300.0));
    assert!(approx(early.scale_of(eq("eq-cone")), 0.3));

    let mid = interpolate(&frames, 0.5).unwrap();
    assert_eq!(mid.scale_of(eq("eq-cone")), 1.0);
}

#[test]
fn disappearing_player_shrinks_to_zero() {
    let frames = load(include_str!("fixtures/appear_disappear.json"));
    let scale = |progress| interpolate(&frames, progress).unwrap().scale_of(p("p1"));

    assert!(scale(0.9) < scale(0.5));
    assert_eq!(scale(1.0), 0.0);

    // Position stays frozen at the last known value.
    let late = interpolate(&frames, 0.8).unwrap();
    let p1 = late.frame.player(ElementId::intern("p1")).unwrap();
    assert_eq!((p1.x, p1.y), (60.0, 390.0));
}

#[test]
fn snapshot_keeps_source_order_then_appends_newcomers() {
    let frames = load(include_str!("fixtures/appear_disappear.json"));
    let out = interpolate(&frames, 0.5).unwrap();
    let ids: Vec<&str> = out.frame.players.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2"]);
    assert_eq!(out.frame.equipment.len(), 1);
}

#[test]
fn ball_missing_on_one_side_fades_like_any_entity() {
    let frames = load(include_str!("fixtures/appear_disappear.json"));
    let out = interpolate(&frames, 0.1).unwrap();
    assert_eq!(out.frame.ball, Some(Ball { x: 160.0, y: 440.0 }));
    assert!(approx(out.ball_scale, 0.3));

    // Reverse the frames: the ball now disappears.
    let reversed: Vec<Keyframe> = frames.into_iter().rev().collect();
    let out = interpolate(&reversed, 1.0).unwrap();
    assert_eq!(out.ball_scale, 0.0);
}

#[test]
fn entity_in_neither_frame_is_not_drawn() {
    let frames = load(include_str!("fixtures/ping_pong.json"));
    let out = interpolate(&frames, 0.5).unwrap();
    assert_eq!(out.scale_of(p("nobody")), 0.0);
    assert!(out.frame.player(ElementId::intern("nobody")).is_none());
}

// ─── Purity / degenerate input ───────────────────────────────────────────

#[test]
fn inputs_are_not_mutated() {
    let frames = load(include_str!("fixtures/appear_disappear.json"));
    let before = frames.clone();
    for step in 0..=20 {
        let _ = interpolate(&frames, step as f64 / 20.0);
    }
    assert_eq!(frames, before);
}

#[test]
fn single_keyframe_is_returned_unscaled() {
    let frames = load(include_str!("fixtures/ping_pong.json"));
    let single = &frames[..1];
    let out = interpolate(single, 0.7).unwrap();
    assert_eq!(out.frame, frames[0]);
    assert_eq!(out.scale_of(p("p1")), 1.0);
    assert_eq!(out.ball_scale, 1.0);
}
