//! Pointer gestures on the surface and drops from the toolbox.
//!
//! The controller turns surface-space input into `Mutation`s and selection
//! changes. It never touches the timeline itself; the session applies what
//! it returns inside an undo batch that spans the whole gesture.
//!
//! ## Modifier behaviors
//!
//! | Modifier | On an entity | On the background |
//! |----------|--------------|-------------------|
//! | **Shift** | Toggle selection; on a member of a multi-selection, drag the whole group. Axis-lock while dragging. | Marquee select |
//! | **Alt** | Drag a fresh copy, leaving the original in place | Deselect |

use cb_core::hit::HitTarget;
use cb_core::model::*;
use cb_core::{ElementId, Point, Rect, Vec2, hit_test_rect, player_color};
use serde::Serialize;

use crate::input::{InputEvent, Modifiers};
use crate::mutation::Mutation;
use crate::selection::{Marquee, Selection};

/// Pointer travel (surface units) before a Shift-drag picks its axis.
pub const AXIS_LOCK_THRESHOLD: f64 = 5.0;

/// What the current gesture is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DragSubject {
    /// One player or equipment item.
    Element(ElementRef),
    Ball,
    /// Every selected element, moved by pointer deltas.
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// A catalog entry being dragged from the toolbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolboxItem {
    Player,
    Equipment(EquipmentKind),
}

impl ToolboxItem {
    /// `"player"` or an equipment type name (`"cone"`, `"hoop"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "player" => Some(ToolboxItem::Player),
            other => EquipmentKind::from_name(other).map(ToolboxItem::Equipment),
        }
    }

    /// The mutation that places this item at `at` in `frame` onwards.
    pub fn spawn(self, frame: &Keyframe, at: Point) -> Mutation {
        match self {
            ToolboxItem::Player => Mutation::AddPlayer(new_player(frame, at)),
            ToolboxItem::Equipment(kind) => Mutation::AddEquipment(new_equipment(kind, at)),
        }
    }
}

/// A new player for `frame`: next palette color, labelled with its 1-based index.
pub fn new_player(frame: &Keyframe, at: Point) -> PlayerPosition {
    let n = frame.players.len();
    PlayerPosition {
        id: ElementId::fresh("p"),
        x: at.x,
        y: at.y,
        color: player_color(n).to_string(),
        label: Some((n + 1).to_string()),
        note: None,
        first_frame_index: None,
    }
}

pub fn new_equipment(kind: EquipmentKind, at: Point) -> EquipmentItem {
    EquipmentItem {
        id: ElementId::fresh("eq"),
        kind,
        x: at.x,
        y: at.y,
        rotation: None,
        label: None,
        note: None,
        first_frame_index: None,
    }
}

/// Copy of `r` under a fresh id, as an insert mutation. `None` if `r` is
/// not in the frame.
pub fn clone_element(frame: &Keyframe, r: ElementRef) -> Option<(ElementRef, Mutation)> {
    match r.kind {
        ElementKind::Player => {
            let mut copy = frame.player(r.id)?.clone();
            copy.id = ElementId::fresh("p");
            Some((
                copy.element_ref(),
                Mutation::InsertElements {
                    players: vec![copy],
                    equipment: Vec::new(),
                },
            ))
        }
        ElementKind::Equipment => {
            let mut copy = frame.equipment_item(r.id)?.clone();
            copy.id = ElementId::fresh("eq");
            Some((
                copy.element_ref(),
                Mutation::InsertElements {
                    players: Vec::new(),
                    equipment: vec![copy],
                },
            ))
        }
    }
}

#[derive(Debug, Default)]
pub struct DragController {
    subject: Option<DragSubject>,
    /// Entity position at press; the axis lock is measured from here.
    origin: Point,
    /// Last pointer position, for group deltas.
    last: Point,
    axis: Option<Axis>,
    /// Whether this gesture already produced an Alt copy.
    alt_duplicated: bool,
    /// Shift-press on a group member: toggled out if released without moving.
    pending_toggle: Option<ElementRef>,
    moved: bool,
    marquee: Option<Marquee>,
    toolbox: Option<ToolboxItem>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a pointer event. `hit` is only consulted on press.
    pub fn handle(
        &mut self,
        event: &InputEvent,
        hit: Option<HitTarget>,
        frame: &Keyframe,
        selection: &mut Selection,
    ) -> Vec<Mutation> {
        match *event {
            InputEvent::PointerDown { at, modifiers } => {
                self.clear_gesture();
                self.last = at;
                match hit {
                    Some(HitTarget::Ball) => {
                        if let Some(ball) = frame.ball {
                            self.origin = ball.position();
                            self.subject = Some(DragSubject::Ball);
                        }
                        Vec::new()
                    }
                    Some(HitTarget::Element(r)) => self.press_element(r, modifiers, frame, selection),
                    None => {
                        if modifiers.shift {
                            self.marquee = Some(Marquee::new(at));
                        } else {
                            selection.deselect_all();
                        }
                        Vec::new()
                    }
                }
            }
            InputEvent::PointerMove { at, modifiers } => {
                if let Some(marquee) = &mut self.marquee {
                    marquee.current = at;
                    return Vec::new();
                }
                let Some(subject) = self.subject else {
                    return Vec::new();
                };
                log::trace!("drag {subject:?} to ({:.1}, {:.1})", at.x, at.y);
                match subject {
                    DragSubject::Group => {
                        let delta = at - self.last;
                        self.last = at;
                        if delta == Vec2::ZERO {
                            return Vec::new();
                        }
                        self.moved = true;
                        vec![Mutation::Translate {
                            targets: selection.resolve(frame),
                            delta,
                        }]
                    }
                    DragSubject::Element(target) => {
                        self.moved = true;
                        let to = self.constrain(at, modifiers.shift);
                        vec![Mutation::Move { target, to }]
                    }
                    DragSubject::Ball => {
                        self.moved = true;
                        vec![Mutation::MoveBall(self.constrain(at, modifiers.shift))]
                    }
                }
            }
            InputEvent::PointerUp | InputEvent::PointerLeave => {
                if let Some(marquee) = self.marquee.take() {
                    selection.select_all(hit_test_rect(frame, marquee.rect()));
                }
                if let (Some(DragSubject::Group), Some(r), false) =
                    (self.subject, self.pending_toggle, self.moved)
                {
                    selection.select(r, true);
                }
                self.clear_gesture();
                Vec::new()
            }
        }
    }

    fn press_element(
        &mut self,
        r: ElementRef,
        modifiers: Modifiers,
        frame: &Keyframe,
        selection: &mut Selection,
    ) -> Vec<Mutation> {
        let Some(origin) = frame.position_of(r) else {
            return Vec::new();
        };
        self.origin = origin;

        if modifiers.shift && selection.contains(r) && selection.resolve(frame).len() > 1 {
            self.subject = Some(DragSubject::Group);
            self.pending_toggle = Some(r);
            return Vec::new();
        }

        selection.select(r, modifiers.shift);
        let mut out = Vec::new();
        let mut target = r;
        if modifiers.alt
            && !self.alt_duplicated
            && let Some((copy, insert)) = clone_element(frame, r)
        {
            self.alt_duplicated = true;
            log::debug!("alt-drag copy of {} as {}", r.id, copy.id);
            target = copy;
            selection.select(copy, false);
            out.push(insert);
        }
        self.subject = Some(DragSubject::Element(target));
        out
    }

    /// Shift locks the drag to the dominant axis once the pointer has moved
    /// far enough from the start; releasing Shift unlocks.
    fn constrain(&mut self, at: Point, shift: bool) -> Point {
        if !shift {
            self.axis = None;
            return at;
        }
        let dx = (at.x - self.origin.x).abs();
        let dy = (at.y - self.origin.y).abs();
        if self.axis.is_none() && (dx > AXIS_LOCK_THRESHOLD || dy > AXIS_LOCK_THRESHOLD) {
            self.axis = Some(if dx > dy { Axis::Horizontal } else { Axis::Vertical });
        }
        match self.axis {
            Some(Axis::Horizontal) => Point::new(at.x, self.origin.y),
            Some(Axis::Vertical) => Point::new(self.origin.x, at.y),
            None => at,
        }
    }

    fn clear_gesture(&mut self) {
        self.subject = None;
        self.axis = None;
        self.alt_duplicated = false;
        self.pending_toggle = None;
        self.moved = false;
        self.marquee = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.subject.is_some()
    }

    pub fn dragging_subject(&self) -> Option<DragSubject> {
        self.subject
    }

    pub fn is_marqueeing(&self) -> bool {
        self.marquee.is_some()
    }

    /// The live marquee rectangle, if one is being drawn.
    pub fn marquee_rect(&self) -> Option<Rect> {
        self.marquee.map(|m| m.rect())
    }

    /// Abandon any gesture without touching the selection.
    pub fn cancel(&mut self) {
        self.clear_gesture();
        self.toolbox = None;
    }

    // ─── Toolbox drag & drop ─────────────────────────────────────────────

    pub fn start_toolbox_drag(&mut self, item: ToolboxItem) {
        self.toolbox = Some(item);
    }

    pub fn toolbox_item(&self) -> Option<ToolboxItem> {
        self.toolbox
    }

    /// Whether the surface should accept a drop right now.
    pub fn drag_over(&self) -> bool {
        self.toolbox.is_some()
    }

    /// Finish a toolbox drag at `at`. Inert when nothing was being dragged.
    pub fn drop(&mut self, at: Point, frame: &Keyframe) -> Option<Mutation> {
        let item = self.toolbox.take()?;
        Some(item.spawn(frame, at))
    }

    pub fn cancel_toolbox(&mut self) {
        self.toolbox = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use cb_core::{Timeline, hit_test};

    fn p(id: &str) -> ElementRef {
        ElementRef::player(ElementId::intern(id))
    }

    fn press(
        tool: &mut DragController,
        frame: &Keyframe,
        selection: &mut Selection,
        at: Point,
        modifiers: Modifiers,
    ) -> Vec<Mutation> {
        let hit = hit_test(frame, at);
        tool.handle(&InputEvent::down(at, modifiers), hit, frame, selection)
    }

    #[test]
    fn plain_drag_moves_to_pointer() {
        let timeline = Timeline::blank(3);
        let frame = timeline.current();
        let mut tool = DragController::new();
        let mut sel = Selection::new();

        let out = press(&mut tool, frame, &mut sel, Point::new(60.0, 390.0), Modifiers::NONE);
        assert!(out.is_empty());
        assert_eq!(sel.items(), &[p("p1")]);
        assert_eq!(tool.dragging_subject(), Some(DragSubject::Element(p("p1"))));

        let to = Point::new(100.0, 300.0);
        let out = tool.handle(&InputEvent::moved(to, Modifiers::NONE), None, frame, &mut sel);
        assert_eq!(out, vec![Mutation::Move { target: p("p1"), to }]);

        tool.handle(&InputEvent::PointerUp, None, frame, &mut sel);
        assert!(!tool.is_dragging());
    }

    #[test]
    fn shift_drag_locks_dominant_axis() {
        let timeline = Timeline::blank(1);
        let frame = timeline.current();
        let mut tool = DragController::new();
        let mut sel = Selection::new();
        press(&mut tool, frame, &mut sel, Point::new(60.0, 390.0), Modifiers::NONE);

        // Inside the threshold nothing is locked yet.
        let out = tool.handle(&InputEvent::moved(Point::new(63.0, 392.0), Modifiers::shift()), None, frame, &mut sel);
        assert_eq!(out, vec![Mutation::Move { target: p("p1"), to: Point::new(63.0, 392.0) }]);

        let out = tool.handle(&InputEvent::moved(Point::new(90.0, 400.0), Modifiers::shift()), None, frame, &mut sel);
        assert_eq!(out, vec![Mutation::Move { target: p("p1"), to: Point::new(90.0, 390.0) }]);

        // Lock persists even when the other axis later dominates.
        let out = tool.handle(&InputEvent::moved(Point::new(95.0, 480.0), Modifiers::shift()), None, frame, &mut sel);
        assert_eq!(out, vec![Mutation::Move { target: p("p1"), to: Point::new(95.0, 390.0) }]);

        // Releasing Shift frees the drag.
        let out = tool.handle(&InputEvent::moved(Point::new(95.0, 480.0), Modifiers::NONE), None, frame, &mut sel);
        assert_eq!(out, vec![Mutation::Move { target: p("p1"), to: Point::new(95.0, 480.0) }]);
    }

    #[test]
    fn ball_drag() {
        let timeline = Timeline::blank(1);
        let frame = timeline.current();
        let mut tool = DragController::new();
        let mut sel = Selection::new();
        press(&mut tool, frame, &mut sel, Point::new(160.0, 440.0), Modifiers::NONE);
        assert_eq!(tool.dragging_subject(), Some(DragSubject::Ball));
        assert!(sel.is_empty());

        let out = tool.handle(&InputEvent::moved(Point::new(150.0, 300.0), Modifiers::NONE), None, frame, &mut sel);
        assert_eq!(out, vec![Mutation::MoveBall(Point::new(150.0, 300.0))]);
    }

    #[test]
    fn shift_press_on_group_member_drags_group() {
        let timeline = Timeline::blank(3);
        let frame = timeline.current();
        let mut tool = DragController::new();
        let mut sel = Selection::new();
        sel.select_all([p("p1"), p("p2")]);

        press(&mut tool, frame, &mut sel, Point::new(60.0, 390.0), Modifiers::shift());
        assert_eq!(tool.dragging_subject(), Some(DragSubject::Group));

        let out = tool.handle(&InputEvent::moved(Point::new(70.0, 380.0), Modifiers::shift()), None, frame, &mut sel);
        match out.as_slice() {
            [Mutation::Translate { targets, delta }] => {
                assert_eq!(targets.as_slice(), &[p("p1"), p("p2")]);
                assert_eq!(*delta, Vec2::new(10.0, -10.0));
            }
            other => panic!("expected Translate, got {other:?}"),
        }
        tool.handle(&InputEvent::PointerUp, None, frame, &mut sel);
        assert_eq!(sel.len(), 2);
    }

    #[test]
    fn shift_click_on_group_member_without_moving_toggles_it_out() {
        let timeline = Timeline::blank(3);
        let frame = timeline.current();
        let mut tool = DragController::new();
        let mut sel = Selection::new();
        sel.select_all([p("p1"), p("p2")]);

        press(&mut tool, frame, &mut sel, Point::new(60.0, 390.0), Modifiers::shift());
        tool.handle(&InputEvent::PointerUp, None, frame, &mut sel);
        assert_eq!(sel.items(), &[p("p2")]);
    }

    #[test]
    fn alt_press_drags_a_fresh_copy() {
        let timeline = Timeline::blank(2);
        let frame = timeline.current();
        let mut tool = DragController::new();
        let mut sel = Selection::new();

        let out = press(&mut tool, frame, &mut sel, Point::new(60.0, 390.0), Modifiers::alt());
        let copy = match out.as_slice() {
            [Mutation::InsertElements { players, equipment }] => {
                assert!(equipment.is_empty());
                assert_ne!(players[0].id, ElementId::intern("p1"));
                assert_eq!(players[0].color, frame.players[0].color);
                players[0].element_ref()
            }
            other => panic!("expected InsertElements, got {other:?}"),
        };
        assert_eq!(tool.dragging_subject(), Some(DragSubject::Element(copy)));
        assert_eq!(sel.items(), &[copy]);
    }

    #[test]
    fn background_press_deselects_and_shift_starts_marquee() {
        let timeline = Timeline::blank(6);
        let frame = timeline.current();
        let mut tool = DragController::new();
        let mut sel = Selection::new();
        sel.select(p("p1"), false);

        press(&mut tool, frame, &mut sel, Point::new(300.0, 100.0), Modifiers::NONE);
        assert!(sel.is_empty());
        assert!(!tool.is_marqueeing());

        press(&mut tool, frame, &mut sel, Point::new(40.0, 380.0), Modifiers::shift());
        assert!(tool.is_marqueeing());
        tool.handle(&InputEvent::moved(Point::new(170.0, 400.0), Modifiers::shift()), None, frame, &mut sel);
        assert_eq!(tool.marquee_rect(), Some(Rect::new(40.0, 380.0, 170.0, 400.0)));

        tool.handle(&InputEvent::PointerUp, None, frame, &mut sel);
        assert_eq!(sel.items(), &[p("p1"), p("p2")]);
        assert!(!tool.is_marqueeing());
    }

    #[test]
    fn toolbox_drop_creates_player_with_next_color() {
        let timeline = Timeline::blank(2);
        let frame = timeline.current();
        let mut tool = DragController::new();

        assert!(!tool.drag_over());
        assert!(tool.drop(Point::new(100.0, 100.0), frame).is_none());

        tool.start_toolbox_drag(ToolboxItem::Player);
        assert!(tool.drag_over());
        match tool.drop(Point::new(100.0, 120.0), frame) {
            Some(Mutation::AddPlayer(player)) => {
                assert_eq!((player.x, player.y), (100.0, 120.0));
                assert_eq!(player.color, player_color(2));
                assert_eq!(player.label.as_deref(), Some("3"));
            }
            other => panic!("expected AddPlayer, got {other:?}"),
        }
        assert!(!tool.drag_over());
    }

    #[test]
    fn toolbox_items_by_name() {
        assert_eq!(ToolboxItem::from_name("player"), Some(ToolboxItem::Player));
        assert_eq!(ToolboxItem::from_name("cone"), Some(ToolboxItem::Equipment(EquipmentKind::Cone)));
        assert_eq!(ToolboxItem::from_name("trampoline"), None);
    }
}
