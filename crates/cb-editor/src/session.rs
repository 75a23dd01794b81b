//! The editing session: one owned timeline plus everything that edits it.
//!
//! Hosts talk to `Editor` only. Pointer positions come in as client (screen)
//! coordinates and are mapped into surface space here; keys are resolved by
//! `ShortcutMap` and dispatched to the same methods the host's buttons call.
//! Every timeline change goes through the `CommandStack`.

use cb_core::catalog::default_ball;
use cb_core::hit::HitTarget;
use cb_core::model::*;
use cb_core::surface::{SURFACE_HEIGHT, SURFACE_WIDTH};
use cb_core::{
    AnimationDocument, ClientRect, DocumentError, ElementId, InterpolatedFrame, Playback,
    PlaybackState, Point, TickOutcome, Timeline, Vec2, ViewMode, hit_test, interpolate, to_surface,
};
use serde::Serialize;
use smallvec::SmallVec;

use crate::commands::CommandStack;
use crate::config::EditorConfig;
use crate::input::{InputEvent, Modifiers};
use crate::mutation::{Mutation, Refs};
use crate::popup::{ListenerChange, PopupState, Popups};
use crate::selection::Selection;
use crate::shortcuts::{ShortcutAction, ShortcutContext, ShortcutMap};
use crate::tools::{DragController, DragSubject, ToolboxItem, new_equipment, new_player};

/// Receives the outbound commit and cancel calls.
///
/// `save` only hands the document over; an `Err` means it could not even be
/// dispatched. Completion of an accepted save is reported back through
/// `Editor::save_finished`.
pub trait SaveSink {
    fn save(&mut self, document: AnimationDocument) -> Result<(), String>;
    fn cancel(&mut self);
}

/// Full attribute copies taken by Copy.
#[derive(Debug, Clone, Default)]
struct Clipboard {
    players: SmallVec<[PlayerPosition; 8]>,
    equipment: SmallVec<[EquipmentItem; 8]>,
}

impl Clipboard {
    fn is_empty(&self) -> bool {
        self.players.is_empty() && self.equipment.is_empty()
    }
}

/// Marquee rectangle in surface units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarqueeBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Everything a host needs to draw one frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSnapshot {
    #[serde(flatten)]
    pub scene: InterpolatedFrame,
    pub current_frame: usize,
    pub frame_count: usize,
    pub playback: PlaybackState,
    pub progress: f64,
    pub speed: f64,
    pub view_mode: ViewMode,
    pub selection: Vec<ElementRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marquee: Option<MarqueeBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dragging: Option<DragSubject>,
    pub popup: PopupState,
    pub can_undo: bool,
    pub can_redo: bool,
    pub is_saving: bool,
    pub show_help: bool,
}

pub struct Editor {
    config: EditorConfig,
    timeline: Timeline,
    commands: CommandStack,
    selection: Selection,
    drag: DragController,
    popups: Popups,
    playback: Playback,
    name: String,
    clipboard: Clipboard,
    view_mode: ViewMode,
    surface_rect: Option<ClientRect>,
    is_saving: bool,
    show_help: bool,
    sink: Option<Box<dyn SaveSink>>,
}

impl Editor {
    /// A blank animation: one keyframe with the default formation.
    pub fn new(config: EditorConfig) -> Self {
        let timeline = Timeline::blank(config.formation_size);
        Self::with_timeline(config, timeline, String::new(), None)
    }

    /// Seed from an existing document. Speed and name come from the document.
    pub fn from_document(document: AnimationDocument, config: EditorConfig) -> Result<Self, DocumentError> {
        document.validate()?;
        let name = document.name.clone().unwrap_or_default();
        let speed = document.speed;
        let timeline = document.into_timeline()?;
        log::debug!("editing {:?}: {} keyframe(s)", name, timeline.len());
        Ok(Self::with_timeline(config, timeline, name, Some(speed)))
    }

    fn with_timeline(config: EditorConfig, timeline: Timeline, name: String, speed: Option<f64>) -> Self {
        let speed = speed.unwrap_or(config.default_speed);
        Self {
            commands: CommandStack::new(config.history_depth),
            popups: Popups::new(config.popup_width, config.popup_height),
            playback: Playback::new(speed, config.playback_end),
            timeline,
            selection: Selection::new(),
            drag: DragController::new(),
            name,
            clipboard: Clipboard::default(),
            view_mode: ViewMode::default(),
            surface_rect: None,
            is_saving: false,
            show_help: false,
            sink: None,
            config,
        }
    }

    pub fn set_sink(&mut self, sink: Box<dyn SaveSink>) {
        self.sink = Some(sink);
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn current_keyframe(&self) -> &Keyframe {
        self.timeline.current()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    pub fn can_undo(&self) -> bool {
        self.commands.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.commands.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.commands.undo_len()
    }

    /// Selected elements that still exist in the current frame.
    pub fn selection(&self) -> Refs {
        self.selection.resolve(self.timeline.current())
    }

    pub fn popup_state(&self) -> PopupState {
        self.popups.state()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// The measured on-screen rectangle of the drawing surface.
    pub fn set_surface_rect(&mut self, rect: ClientRect) {
        self.surface_rect = Some(rect);
    }

    pub fn surface_rect(&self) -> Option<ClientRect> {
        self.surface_rect
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn hide_help(&mut self) {
        self.show_help = false;
    }

    /// Client coordinates to clamped surface coordinates. `None` until the
    /// surface has been measured.
    pub fn to_surface(&self, client: Point) -> Option<Point> {
        to_surface(client, self.surface_rect, self.view_mode)
    }

    /// What is under the pointer in the current frame.
    pub fn hit_at(&self, client: Point) -> Option<HitTarget> {
        hit_test(self.timeline.current(), self.to_surface(client)?)
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    pub fn pointer_down(&mut self, client: Point, modifiers: Modifiers) -> bool {
        match self.to_surface(client) {
            Some(at) => self.handle_input(InputEvent::down(at, modifiers)),
            None => false,
        }
    }

    pub fn pointer_move(&mut self, client: Point, modifiers: Modifiers) -> bool {
        match self.to_surface(client) {
            Some(at) => self.handle_input(InputEvent::moved(at, modifiers)),
            None => false,
        }
    }

    pub fn pointer_up(&mut self) -> bool {
        self.handle_input(InputEvent::PointerUp)
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.handle_input(InputEvent::PointerLeave)
    }

    /// Feed a surface-space event through the drag controller. A gesture
    /// that grabs something opens an undo batch; release closes it.
    /// Returns whether the timeline changed.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        let hit = match event {
            InputEvent::PointerDown { at, .. } => {
                if self.playback.is_playing() {
                    return false;
                }
                // A press that was never released still owes its batch.
                self.commands.flush_batch(&self.timeline);
                self.popups.dismiss();
                hit_test(self.timeline.current(), at)
            }
            _ => None,
        };

        let was_dragging = self.drag.is_dragging();
        let mutations = self
            .drag
            .handle(&event, hit, self.timeline.current(), &mut self.selection);
        if !was_dragging && self.drag.is_dragging() {
            self.commands.begin_batch(&self.timeline);
        }

        let mut changed = false;
        for mutation in mutations {
            changed |= self.commands.execute(&mut self.timeline, mutation);
        }

        if event.is_release() {
            self.commands.flush_batch(&self.timeline);
        }
        changed
    }

    // ─── Toolbox drag & drop ─────────────────────────────────────────────

    pub fn start_toolbox_drag(&mut self, item: ToolboxItem) {
        self.drag.start_toolbox_drag(item);
    }

    /// Drag-over on the surface: `true` when the drop should be permitted.
    pub fn drag_over(&self) -> bool {
        !self.playback.is_playing() && self.drag.drag_over()
    }

    pub fn drop_at(&mut self, client: Point) -> bool {
        let at = self.to_surface(client);
        match at {
            Some(at) if !self.playback.is_playing() => {
                match self.drag.drop(at, self.timeline.current()) {
                    Some(mutation) => self.commands.execute(&mut self.timeline, mutation),
                    None => false,
                }
            }
            _ => {
                self.drag.cancel_toolbox();
                false
            }
        }
    }

    pub fn cancel_toolbox_drag(&mut self) {
        self.drag.cancel_toolbox();
    }

    // ─── Popups ──────────────────────────────────────────────────────────

    /// Right-click on an entity. Ignored while playing.
    pub fn open_context_menu(&mut self, target: ElementRef, client: Point, container: ClientRect) -> ListenerChange {
        if self.playback.is_playing() || !self.timeline.current().contains(target) {
            return ListenerChange::Keep;
        }
        self.popups.open_context_menu(target, client, container)
    }

    /// Double-click on an entity: label editor without the menu.
    pub fn open_label_editor(&mut self, target: ElementRef, client: Point, container: ClientRect) -> ListenerChange {
        if self.playback.is_playing() || !self.timeline.current().contains(target) {
            return ListenerChange::Keep;
        }
        self.popups.open_label_editor(target, client, container)
    }

    pub fn edit_label_from_menu(&mut self) -> ListenerChange {
        self.popups.edit_label_from_menu()
    }

    pub fn edit_note_from_menu(&mut self) -> ListenerChange {
        self.popups.edit_note_from_menu()
    }

    /// Click outside the popup, or Escape.
    pub fn close_popups(&mut self) -> ListenerChange {
        self.popups.close()
    }

    /// Listener change owed to the host by operations that closed a popup
    /// as a side effect (pointer press, Escape, play, a finished edit).
    /// Hosts call this after any such operation.
    pub fn take_listener_change(&mut self) -> ListenerChange {
        self.popups.sync_listener()
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Resolve and run a key press. Returns the action that ran.
    pub fn key(&mut self, key: &str, modifiers: Modifiers, text_focus: bool) -> Option<ShortcutAction> {
        let frame = self.timeline.current();
        let ctx = ShortcutContext {
            text_focus,
            playing: self.playback.is_playing(),
            has_selection: !self.selection.resolve(frame).is_empty(),
            selected_players: self.selection.players(frame).len(),
        };
        let action = ShortcutMap::resolve(key, modifiers, &ctx)?;
        log::debug!("shortcut {key:?} -> {action:?}");
        self.perform(action);
        Some(action)
    }

    /// Run a shortcut action directly. Returns whether anything changed.
    pub fn perform(&mut self, action: ShortcutAction) -> bool {
        match action {
            ShortcutAction::TogglePlay => {
                let was = self.playback.is_playing();
                self.toggle_play() != was
            }
            ShortcutAction::PrevFrame => self.prev_frame(),
            ShortcutAction::NextFrame => self.next_frame(),
            ShortcutAction::FirstFrame => self.first_frame(),
            ShortcutAction::LastFrame => self.last_frame(),
            ShortcutAction::SelectAll => self.select_all(),
            ShortcutAction::Deselect => {
                self.deselect_all();
                self.popups.dismiss();
                true
            }
            ShortcutAction::DeleteSelected => self.delete_selected(),
            ShortcutAction::Undo => self.undo().is_some(),
            ShortcutAction::Redo => self.redo().is_some(),
            ShortcutAction::Duplicate => self.duplicate_selected(),
            ShortcutAction::Copy => self.copy(),
            ShortcutAction::Paste => self.paste(),
            ShortcutAction::PastePositions => self.paste_positions(),
            ShortcutAction::Save => self.save(),
            ShortcutAction::Nudge { dx, dy } => self.nudge(dx, dy),
            ShortcutAction::AddKeyframe => self.add_keyframe(),
            ShortcutAction::Mirror => self.mirror(),
            ShortcutAction::SwapPlayers => self.swap_selected_players(),
            ShortcutAction::ShowHelp => {
                self.show_help = true;
                true
            }
        }
    }

    // ─── Frames & playback ───────────────────────────────────────────────

    /// Clone the current keyframe after itself and move onto the copy.
    pub fn add_keyframe(&mut self) -> bool {
        if self.playback.is_playing() {
            return false;
        }
        let added = self.commands.record(&mut self.timeline, "Add keyframe", |t| {
            t.add_keyframe();
            true
        });
        self.selection.deselect_all();
        self.playback.sync_frame_count(self.timeline.len());
        added
    }

    /// Refused when only one keyframe is left.
    pub fn delete_keyframe(&mut self) -> bool {
        if self.playback.is_playing() {
            return false;
        }
        let deleted = self
            .commands
            .record(&mut self.timeline, "Delete keyframe", Timeline::delete_keyframe);
        if deleted {
            self.selection.deselect_all();
            self.playback.sync_frame_count(self.timeline.len());
        }
        deleted
    }

    /// Jump to a frame. Stops playback, zeroes progress and clears the
    /// selection. Out-of-range indices are refused.
    pub fn go_to_frame(&mut self, index: usize) -> bool {
        if !self.timeline.go_to(index) {
            return false;
        }
        self.playback.stop();
        self.selection.deselect_all();
        true
    }

    pub fn prev_frame(&mut self) -> bool {
        match self.timeline.current_index().checked_sub(1) {
            Some(index) => self.go_to_frame(index),
            None => false,
        }
    }

    pub fn next_frame(&mut self) -> bool {
        if self.timeline.is_last() {
            return false;
        }
        self.go_to_frame(self.timeline.current_index() + 1)
    }

    pub fn first_frame(&mut self) -> bool {
        self.go_to_frame(0)
    }

    pub fn last_frame(&mut self) -> bool {
        self.go_to_frame(self.timeline.len() - 1)
    }

    /// Stop, rewind and return to the first frame.
    pub fn reset(&mut self) {
        self.playback.stop();
        self.go_to_frame(0);
    }

    /// Start (from the beginning) or pause. Returns whether playback is now running.
    pub fn toggle_play(&mut self) -> bool {
        if !self.playback.is_playing() {
            self.commands.flush_batch(&self.timeline);
            self.drag.cancel();
            self.popups.dismiss();
        }
        self.playback.toggle(self.timeline.len())
    }

    /// Clock callback. Hosts keep their repeating timer only while
    /// `playback().is_armed()`.
    pub fn tick(&mut self, now: f64) -> TickOutcome {
        self.playback.tick(now, self.timeline.len())
    }

    /// Clamp into the configured range and apply from the next tick.
    pub fn set_speed(&mut self, speed: f64) -> bool {
        if !speed.is_finite() {
            return false;
        }
        let range = self.config.speed_range();
        self.playback.set_speed(speed.clamp(*range.start(), *range.end()))
    }

    pub fn speed(&self) -> f64 {
        self.playback.speed()
    }

    // ─── Selection ───────────────────────────────────────────────────────

    pub fn select(&mut self, target: ElementRef, additive: bool) -> bool {
        if !self.timeline.current().contains(target) {
            return false;
        }
        self.selection.select(target, additive);
        true
    }

    pub fn select_all(&mut self) -> bool {
        if self.playback.is_playing() {
            return false;
        }
        self.selection.select_all(self.timeline.current().element_refs());
        true
    }

    pub fn deselect_all(&mut self) {
        self.selection.deselect_all();
    }

    // ─── Element edits ───────────────────────────────────────────────────

    fn edit(&mut self, mutation: Mutation) -> bool {
        if self.playback.is_playing() {
            return false;
        }
        self.commands.execute(&mut self.timeline, mutation)
    }

    /// Spot used by click-to-add, near the middle of the home half. Staggered
    /// by the current element count so repeated clicks don't stack.
    fn click_to_add_spot(&self) -> Point {
        let frame = self.timeline.current();
        let n = frame.players.len() + frame.equipment.len();
        let step = |k: usize| ((k % 5) as f64 - 2.0) * 12.0;
        Point::new(SURFACE_WIDTH / 2.0 + step(n), SURFACE_HEIGHT * 0.65 + step(n / 5))
    }

    /// Toolbox click: add a player from this frame onwards.
    pub fn add_player(&mut self) -> bool {
        let player = new_player(self.timeline.current(), self.click_to_add_spot());
        self.edit(Mutation::AddPlayer(player))
    }

    pub fn add_equipment(&mut self, kind: EquipmentKind) -> bool {
        let item = new_equipment(kind, self.click_to_add_spot());
        self.edit(Mutation::AddEquipment(item))
    }

    pub fn add_ball(&mut self) -> bool {
        self.edit(Mutation::AddBall(default_ball()))
    }

    pub fn delete_ball(&mut self) -> bool {
        self.edit(Mutation::RemoveBall)
    }

    /// Delete one element from this frame onwards. The last player of the
    /// current frame is kept.
    pub fn delete_element(&mut self, target: ElementRef) -> bool {
        let deleted = self.edit(Mutation::RemoveElements(smallvec::smallvec![target]));
        if deleted {
            self.popups.dismiss();
        }
        deleted
    }

    pub fn delete_selected(&mut self) -> bool {
        let targets = self.selection();
        if targets.is_empty() {
            return false;
        }
        let deleted = self.edit(Mutation::RemoveElements(targets));
        self.selection.deselect_all();
        deleted
    }

    /// Label for every frame the element appears in. Empty text clears it;
    /// long text is cut to the label limit.
    pub fn set_label(&mut self, target: ElementRef, text: &str) -> bool {
        let label = normalize_label(text);
        self.popups.dismiss();
        self.edit(Mutation::SetLabel { target, label })
    }

    /// Note from this frame onwards. Empty text clears it.
    pub fn set_note(&mut self, target: ElementRef, text: &str) -> bool {
        let note = normalize_note(text);
        self.popups.dismiss();
        self.edit(Mutation::SetNote { target, note })
    }

    /// Move the selection by `(dx, dy)` in the current frame only.
    pub fn nudge(&mut self, dx: f64, dy: f64) -> bool {
        let targets = self.selection();
        if targets.is_empty() {
            return false;
        }
        self.edit(Mutation::Translate {
            targets,
            delta: Vec2::new(dx, dy),
        })
    }

    /// Copy the selected elements in place with a staggered offset.
    pub fn duplicate_selected(&mut self) -> bool {
        let frame = self.timeline.current();
        let targets = self.selection.resolve(frame);
        if targets.is_empty() {
            return false;
        }
        let mut source = Clipboard::default();
        for r in targets {
            match r.kind {
                ElementKind::Player => source.players.extend(frame.player(r.id).cloned()),
                ElementKind::Equipment => source.equipment.extend(frame.equipment_item(r.id).cloned()),
            }
        }
        let insert = self.offset_copies(&source);
        self.edit(insert)
    }

    /// Snapshot the selected elements, or every element when nothing is
    /// selected. Does not touch the timeline.
    pub fn copy(&mut self) -> bool {
        if self.playback.is_playing() {
            return false;
        }
        let frame = self.timeline.current();
        let targets = self.selection.resolve(frame);
        let wanted = |r: ElementRef| targets.is_empty() || targets.contains(&r);
        self.clipboard = Clipboard {
            players: frame.players.iter().filter(|p| wanted(p.element_ref())).cloned().collect(),
            equipment: frame.equipment.iter().filter(|e| wanted(e.element_ref())).cloned().collect(),
        };
        log::debug!(
            "copied {} player(s), {} equipment",
            self.clipboard.players.len(),
            self.clipboard.equipment.len()
        );
        !self.clipboard.is_empty()
    }

    /// Insert the clipboard as new elements from this frame onwards.
    pub fn paste(&mut self) -> bool {
        if self.clipboard.is_empty() {
            return false;
        }
        let insert = self.offset_copies(&self.clipboard);
        self.edit(insert)
    }

    /// Move elements with the copied ids to the copied positions, current
    /// frame only.
    pub fn paste_positions(&mut self) -> bool {
        if self.clipboard.is_empty() {
            return false;
        }
        let entries = self
            .clipboard
            .players
            .iter()
            .map(|p| (p.element_ref(), Element::position(p)))
            .chain(self.clipboard.equipment.iter().map(|e| (e.element_ref(), Element::position(e))))
            .collect();
        self.edit(Mutation::PastePositions(entries))
    }

    /// Fresh-id copies of `source`, the i-th shifted by the configured
    /// duplicate offset. No collision or bounds checks.
    fn offset_copies(&self, source: &Clipboard) -> Mutation {
        let mut index = 0;
        let mut shift = |p: Point| {
            let d = self.config.duplicate_offset_for(index);
            index += 1;
            p + Vec2::new(d, d)
        };
        let players = source
            .players
            .iter()
            .map(|p| {
                let mut copy = p.clone();
                copy.id = ElementId::fresh("p");
                copy.set_position(shift(p.position()));
                copy
            })
            .collect();
        let equipment = source
            .equipment
            .iter()
            .map(|e| {
                let mut copy = e.clone();
                copy.id = ElementId::fresh("eq");
                copy.set_position(shift(e.position()));
                copy
            })
            .collect();
        Mutation::InsertElements { players, equipment }
    }

    /// Reflect the current frame about the vertical center line.
    pub fn mirror(&mut self) -> bool {
        self.edit(Mutation::Mirror)
    }

    /// Swap the two selected players. Needs exactly two.
    pub fn swap_selected_players(&mut self) -> bool {
        let players = self.selection.players(self.timeline.current());
        match players.as_slice() {
            [a, b] => self.edit(Mutation::SwapPlayers(*a, *b)),
            _ => false,
        }
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> Option<String> {
        let from = self.timeline.current_index();
        let description = self.commands.undo(&mut self.timeline)?;
        self.after_history_jump(from);
        Some(description)
    }

    pub fn redo(&mut self) -> Option<String> {
        let from = self.timeline.current_index();
        let description = self.commands.redo(&mut self.timeline)?;
        self.after_history_jump(from);
        Some(description)
    }

    /// Selection is frame-scoped: cleared when the restore landed on another
    /// frame, otherwise pruned to what still exists.
    fn after_history_jump(&mut self, from: usize) {
        self.drag.cancel();
        if self.timeline.current_index() != from {
            self.selection.deselect_all();
        } else {
            self.selection.prune(self.timeline.current());
        }
        self.playback.sync_frame_count(self.timeline.len());
    }

    // ─── Output ──────────────────────────────────────────────────────────

    /// The document as it would be saved. An empty name is omitted.
    pub fn document(&self) -> AnimationDocument {
        let name = (!self.name.is_empty()).then(|| self.name.clone());
        AnimationDocument::new(name, self.timeline.keyframes().to_vec(), self.playback.speed())
    }

    /// Hand the document to the save sink. Refused while a save is in flight.
    pub fn save(&mut self) -> bool {
        if self.is_saving {
            return false;
        }
        let document = self.document();
        let Some(sink) = self.sink.as_mut() else {
            log::warn!("save requested with no sink attached");
            return false;
        };
        log::debug!("saving {} keyframe(s)", document.keyframes.len());
        if let Err(e) = sink.save(document) {
            log::warn!("save could not be dispatched: {e}");
            return false;
        }
        self.is_saving = true;
        true
    }

    /// The host reports the end of a save. The timeline is never touched, so
    /// a failed save loses nothing.
    pub fn save_finished(&mut self, ok: bool) {
        if !ok {
            log::warn!("save failed; editor state kept");
        }
        self.is_saving = false;
    }

    pub fn cancel(&mut self) {
        self.teardown();
        if let Some(sink) = self.sink.as_mut() {
            sink.cancel();
        }
    }

    /// Stop the clock, close any open batch and popup. Safe to call twice.
    pub fn teardown(&mut self) -> ListenerChange {
        self.playback.stop();
        self.commands.flush_batch(&self.timeline);
        self.drag.cancel();
        self.popups.close()
    }

    /// What to draw now: the interpolated scene while playing, otherwise
    /// the current keyframe at full scale.
    pub fn render_snapshot(&self) -> RenderSnapshot {
        let blended = self
            .playback
            .is_playing()
            .then(|| interpolate(self.timeline.keyframes(), self.playback.progress()))
            .flatten();
        let scene = blended.unwrap_or_else(|| InterpolatedFrame::unscaled(self.timeline.current().clone()));

        RenderSnapshot {
            scene,
            current_frame: self.timeline.current_index(),
            frame_count: self.timeline.len(),
            playback: self.playback.state(),
            progress: self.playback.progress(),
            speed: self.playback.speed(),
            view_mode: self.view_mode,
            selection: self.selection().to_vec(),
            marquee: self.drag.marquee_rect().map(|r| MarqueeBox {
                x: r.x0,
                y: r.y0,
                width: r.width(),
                height: r.height(),
            }),
            dragging: self.drag.dragging_subject(),
            popup: self.popups.state(),
            can_undo: self.commands.can_undo(),
            can_redo: self.commands.can_redo(),
            is_saving: self.is_saving,
            show_help: self.show_help,
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}
