//! Integration tests: which keyframes an edit reaches.
//!
//! Structural edits made at frame k land in k..n and never touch earlier
//! frames; positional edits stay on the current frame; labels are global.

use cb_core::model::{EquipmentKind, Keyframe};
use cb_core::{AnimationDocument, ElementId, ElementRef};
use cb_editor::{Editor, EditorConfig};
use pretty_assertions::assert_eq;

fn drill() -> Editor {
    let doc = AnimationDocument::from_json(include_str!("fixtures/drill.json")).unwrap();
    Editor::from_document(doc, EditorConfig::default()).unwrap()
}

fn frames(editor: &Editor) -> &[Keyframe] {
    editor.timeline().keyframes()
}

fn p(id: &str) -> ElementRef {
    ElementRef::player(ElementId::intern(id))
}

#[test]
fn player_added_mid_timeline_appears_from_that_frame_on() {
    let mut editor = drill();
    editor.go_to_frame(1);
    assert!(editor.add_player());

    let counts: Vec<usize> = frames(&editor).iter().map(|f| f.players.len()).collect();
    assert_eq!(counts, vec![2, 3, 3]);

    let added = frames(&editor)[1].players[2].clone();
    assert_eq!(added.first_frame_index, Some(1));
    assert_eq!(added.label.as_deref(), Some("3"));
    assert!(frames(&editor)[0].player(added.id).is_none());
    assert_eq!(frames(&editor)[2].player(added.id), Some(&added));
}

#[test]
fn equipment_delete_keeps_earlier_frames() {
    let mut editor = drill();
    editor.go_to_frame(1);
    assert!(editor.delete_element(ElementRef::equipment(ElementId::intern("c1"))));

    let counts: Vec<usize> = frames(&editor).iter().map(|f| f.equipment.len()).collect();
    assert_eq!(counts, vec![1, 0, 0]);
}

#[test]
fn last_player_cannot_be_deleted() {
    let mut editor = drill();
    editor.select_all();
    assert!(editor.delete_selected());

    // The cone went; both players stayed because removing them would leave
    // the frame empty.
    let frame = editor.current_keyframe();
    assert!(frame.equipment.is_empty());
    assert_eq!(frame.players.len(), 2);

    assert!(editor.delete_element(p("p1")));
    assert!(!editor.delete_element(p("p2")));
    assert_eq!(editor.current_keyframe().players.len(), 1);
}

#[test]
fn move_touches_current_frame_only() {
    let mut editor = drill();
    editor.go_to_frame(1);
    editor.select(p("p1"), false);
    editor.nudge(10.0, 0.0);

    let xs: Vec<f64> = frames(&editor).iter().map(|f| f.players[0].x).collect();
    assert_eq!(xs, vec![60.0, 90.0, 100.0]);
}

#[test]
fn label_is_global_and_note_is_forward() {
    let mut editor = drill();
    editor.go_to_frame(1);
    editor.set_label(p("p1"), "Setter position");
    editor.set_note(p("p1"), "Release early");

    for frame in frames(&editor) {
        assert_eq!(frame.label_of(p("p1")), Some("Setter position"));
    }
    let notes: Vec<Option<&str>> = frames(&editor).iter().map(|f| f.note_of(p("p1"))).collect();
    assert_eq!(notes, vec![None, Some("Release early"), Some("Release early")]);

    editor.set_note(p("p1"), "");
    assert!(frames(&editor).iter().all(|f| f.note_of(p("p1")).is_none()));
}

#[test]
fn overlong_label_is_truncated() {
    let mut editor = drill();
    editor.set_label(p("p2"), "Outside hitter on the left");
    assert_eq!(editor.current_keyframe().label_of(p("p2")), Some("Outside hitter on th"));
}

#[test]
fn ball_is_added_only_where_missing() {
    let mut editor = drill();
    editor.go_to_frame(1);
    assert!(editor.add_ball());

    let balls: Vec<Option<(f64, f64)>> = frames(&editor)
        .iter()
        .map(|f| f.ball.map(|b| (b.x, b.y)))
        .collect();
    assert_eq!(
        balls,
        vec![Some((160.0, 440.0)), Some((180.0, 340.0)), Some((160.0, 440.0))]
    );

    assert!(editor.delete_ball());
    assert!(frames(&editor)[0].ball.is_some());
    assert!(frames(&editor)[1..].iter().all(|f| f.ball.is_none()));
}

#[test]
fn duplicate_offsets_each_copy() {
    let mut editor = drill();
    editor.select(p("p1"), false);
    editor.select(p("p2"), true);
    assert!(editor.duplicate_selected());

    let frame = editor.current_keyframe();
    assert_eq!(frame.players.len(), 4);
    assert_eq!((frame.players[2].x, frame.players[2].y), (80.0, 410.0));
    assert_eq!((frame.players[3].x, frame.players[3].y), (195.0, 425.0));
    assert_eq!(frames(&editor)[2].players.len(), 4);
}

#[test]
fn paste_positions_targets_same_ids() {
    let mut editor = drill();
    editor.go_to_frame(2);
    editor.select(p("p2"), false);
    assert!(editor.copy());

    editor.go_to_frame(0);
    assert!(editor.paste_positions());
    let frame = editor.current_keyframe();
    assert_eq!((frame.players[1].x, frame.players[1].y), (200.0, 220.0));
    assert_eq!((frame.players[0].x, frame.players[0].y), (60.0, 390.0));
}

#[test]
fn copy_without_selection_takes_everything() {
    let mut editor = drill();
    assert!(editor.copy());
    assert!(editor.paste());
    let frame = editor.current_keyframe();
    assert_eq!(frame.players.len(), 4);
    assert_eq!(frame.equipment.len(), 2);
    assert_eq!(frame.equipment[1].kind, EquipmentKind::Cone);
}

#[test]
fn swap_needs_exactly_two_players() {
    let mut editor = drill();
    editor.select(p("p1"), false);
    assert!(!editor.swap_selected_players());

    editor.select(p("p2"), true);
    assert!(editor.swap_selected_players());
    let frame = editor.current_keyframe();
    assert_eq!(frame.players[0].x, 160.0);
    assert_eq!(frame.players[1].x, 60.0);
    // Other frames untouched.
    assert_eq!(frames(&editor)[1].players[0].x, 80.0);
}
