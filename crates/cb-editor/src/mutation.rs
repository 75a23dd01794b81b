//! Structural edits to the timeline.
//!
//! Every change to keyframe contents goes through `Mutation::apply`, so the
//! frame-scope rules live in one place:
//!
//! | Mutation | Frames touched |
//! |----------|----------------|
//! | `AddPlayer`, `AddEquipment`, `AddBall`, `InsertElements` | current → end |
//! | `RemoveElements`, `RemoveBall` | current → end |
//! | `SetNote` | current → end |
//! | `SetLabel` | every frame |
//! | `Move`, `MoveBall`, `Translate`, `Mirror`, `SwapPlayers`, `PastePositions` | current only |

use cb_core::model::*;
use cb_core::surface::{mirror_x, placement_bounds};
use cb_core::{ElementId, Point, Rect, Timeline, Vec2};
use smallvec::SmallVec;

/// Element references carried by multi-target mutations.
pub type Refs = SmallVec<[ElementRef; 8]>;

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    AddPlayer(PlayerPosition),
    AddEquipment(EquipmentItem),
    /// Place the ball in every frame from here on that has none.
    AddBall(Ball),
    /// Never leaves a frame without players: in any frame where the player
    /// removals would empty it, that frame keeps all of its players.
    RemoveElements(Refs),
    RemoveBall,
    Move {
        target: ElementRef,
        to: Point,
    },
    MoveBall(Point),
    /// Shift several elements by the same delta. The delta is clamped once
    /// so the group keeps its shape against the surface edges.
    Translate {
        targets: Refs,
        delta: Vec2,
    },
    SetNote {
        target: ElementRef,
        note: Option<String>,
    },
    SetLabel {
        target: ElementRef,
        label: Option<String>,
    },
    /// Duplicate / paste / alt-drag clones. Ids must already be fresh.
    InsertElements {
        players: Vec<PlayerPosition>,
        equipment: Vec<EquipmentItem>,
    },
    /// Reflect the current frame about the vertical center line.
    Mirror,
    SwapPlayers(ElementId, ElementId),
    /// Re-apply copied positions onto the same ids.
    PastePositions(Vec<(ElementRef, Point)>),
}

impl Mutation {
    /// Short label for the undo history.
    pub fn description(&self) -> &'static str {
        match self {
            Mutation::AddPlayer(_) => "Add player",
            Mutation::AddEquipment(_) => "Add equipment",
            Mutation::AddBall(_) => "Add ball",
            Mutation::RemoveElements(_) => "Delete",
            Mutation::RemoveBall => "Delete ball",
            Mutation::Move { .. } => "Move",
            Mutation::MoveBall(_) => "Move ball",
            Mutation::Translate { .. } => "Nudge",
            Mutation::SetNote { .. } => "Edit note",
            Mutation::SetLabel { .. } => "Edit label",
            Mutation::InsertElements { .. } => "Duplicate",
            Mutation::Mirror => "Mirror formation",
            Mutation::SwapPlayers(..) => "Swap players",
            Mutation::PastePositions(_) => "Paste positions",
        }
    }

    /// Apply to the timeline. Returns whether anything changed.
    pub fn apply(self, timeline: &mut Timeline) -> bool {
        match self {
            Mutation::AddPlayer(player) => insert_forward(timeline, &[player]),
            Mutation::AddEquipment(item) => insert_forward(timeline, &[item]),
            Mutation::InsertElements { players, equipment } => {
                // Both sides must run; `||` would short-circuit.
                let a = insert_forward(timeline, &players);
                let b = insert_forward(timeline, &equipment);
                a | b
            }
            Mutation::AddBall(ball) => {
                let mut changed = false;
                for frame in timeline.forward_mut().filter(|f| f.ball.is_none()) {
                    frame.ball = Some(ball);
                    changed = true;
                }
                changed
            }
            Mutation::RemoveElements(refs) => remove_forward(timeline, &refs),
            Mutation::RemoveBall => {
                let mut changed = false;
                for frame in timeline.forward_mut() {
                    changed |= frame.ball.take().is_some();
                }
                changed
            }
            Mutation::Move { target, to } => {
                let frame = timeline.current_mut();
                frame.position_of(target) != Some(to) && frame.set_position(target, to)
            }
            Mutation::MoveBall(to) => match &mut timeline.current_mut().ball {
                Some(ball) if ball.position() != to => {
                    *ball = Ball::from(to);
                    true
                }
                _ => false,
            },
            Mutation::Translate { targets, delta } => translate(timeline.current_mut(), &targets, delta),
            Mutation::SetNote { target, note } => {
                let mut changed = false;
                for frame in timeline.forward_mut() {
                    changed |= set_text(frame, target, &note, TextField::Note);
                }
                changed
            }
            Mutation::SetLabel { target, label } => {
                let mut changed = false;
                for frame in timeline.all_mut() {
                    changed |= set_text(frame, target, &label, TextField::Label);
                }
                changed
            }
            Mutation::Mirror => {
                let frame = timeline.current_mut();
                let mut changed = false;
                for p in &mut frame.players {
                    changed |= reflect(&mut p.x);
                }
                for e in &mut frame.equipment {
                    changed |= reflect(&mut e.x);
                }
                if let Some(ball) = &mut frame.ball {
                    changed |= reflect(&mut ball.x);
                }
                changed
            }
            Mutation::SwapPlayers(a, b) => {
                let frame = timeline.current_mut();
                let (ra, rb) = (ElementRef::player(a), ElementRef::player(b));
                match (frame.position_of(ra), frame.position_of(rb)) {
                    (Some(pa), Some(pb)) if a != b && pa != pb => {
                        frame.set_position(ra, pb);
                        frame.set_position(rb, pa);
                        true
                    }
                    _ => false,
                }
            }
            Mutation::PastePositions(entries) => {
                let frame = timeline.current_mut();
                let mut changed = false;
                for (target, to) in entries {
                    if frame.position_of(target).is_some_and(|p| p != to) {
                        changed |= frame.set_position(target, to);
                    }
                }
                changed
            }
        }
    }
}

/// Add `items` to the current frame and every later one. Frames that already
/// hold an id are left alone. Stamps `first_frame_index` with the current index.
fn insert_forward<E: Element>(timeline: &mut Timeline, items: &[E]) -> bool {
    let start = timeline.current_index();
    let mut changed = false;
    for frame in timeline.forward_mut() {
        let collection = E::in_frame_mut(frame);
        for item in items {
            if collection.iter().any(|e| e.id() == item.id()) {
                continue;
            }
            let mut copy = item.clone();
            copy.set_first_frame_index(start);
            collection.push(copy);
            changed = true;
        }
    }
    changed
}

/// Remove `refs` from the current frame onwards. Player removals are all or
/// nothing per frame, so the outcome does not depend on the order of `refs`.
fn remove_forward(timeline: &mut Timeline, refs: &[ElementRef]) -> bool {
    let mut changed = false;
    for frame in timeline.forward_mut() {
        let keeps_a_player = frame.players.iter().any(|p| !refs.contains(&p.element_ref()));
        if !keeps_a_player {
            log::debug!("keeping the players of keyframe {}: removal would empty it", frame.id);
        }
        for r in refs {
            if r.kind == ElementKind::Player && !keeps_a_player {
                continue;
            }
            changed |= frame.remove(*r);
        }
    }
    changed
}

/// Move every target by one delta, limited so the group's bounding box
/// stays inside the placement bounds. Members already outside are not
/// pushed further out.
fn translate(frame: &mut Keyframe, targets: &[ElementRef], delta: Vec2) -> bool {
    let points: SmallVec<[(ElementRef, Point); 8]> = targets
        .iter()
        .filter_map(|&t| Some((t, frame.position_of(t)?)))
        .collect();
    let Some(&(_, first)) = points.first() else {
        return false;
    };
    let group = points
        .iter()
        .fold(Rect::from_points(first, first), |r, &(_, p)| r.union_pt(p));
    let b = placement_bounds();
    let delta = Vec2::new(
        delta.x.clamp((b.x0 - group.x0).min(0.0), (b.x1 - group.x1).max(0.0)),
        delta.y.clamp((b.y0 - group.y0).min(0.0), (b.y1 - group.y1).max(0.0)),
    );
    if delta == Vec2::ZERO {
        return false;
    }
    let mut changed = false;
    for (target, p) in points {
        changed |= frame.set_position(target, p + delta);
    }
    changed
}

#[derive(Clone, Copy)]
enum TextField {
    Label,
    Note,
}

fn set_text(frame: &mut Keyframe, target: ElementRef, text: &Option<String>, field: TextField) -> bool {
    fn set<E: Element>(frame: &mut Keyframe, id: ElementId, text: &Option<String>, field: TextField) -> bool {
        let Some(e) = frame.find_mut::<E>(id) else {
            return false;
        };
        let current = match field {
            TextField::Label => e.label(),
            TextField::Note => e.note(),
        };
        if current == text.as_deref() {
            return false;
        }
        match field {
            TextField::Label => e.set_label(text.clone()),
            TextField::Note => e.set_note(text.clone()),
        }
        true
    }
    match target.kind {
        ElementKind::Player => set::<PlayerPosition>(frame, target.id, text, field),
        ElementKind::Equipment => set::<EquipmentItem>(frame, target.id, text, field),
    }
}

fn reflect(x: &mut f64) -> bool {
    let mirrored = mirror_x(*x);
    if mirrored == *x {
        return false;
    }
    *x = mirrored;
    true
}
