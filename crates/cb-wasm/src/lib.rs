//! WASM bridge for Courtboard: exposes the editing session to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host owns the DOM, the
//! animation-frame loop and persistence; everything else happens here.
//! Structured results cross the boundary as JSON strings.

mod sink;

use cb_core::model::{ElementKind, EquipmentKind};
use cb_core::{AnimationDocument, ClientRect, ElementId, ElementRef, LABEL_PRESETS, Point, TickOutcome, ViewMode};
use cb_editor::{Editor, EditorConfig, ListenerChange, Modifiers, SHORTCUT_LEGEND, ToolboxItem};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use sink::JsSink;

/// The editor controller handed to the host page.
#[wasm_bindgen]
pub struct CourtboardEditor {
    editor: Editor,
}

#[wasm_bindgen]
impl CourtboardEditor {
    /// Create a blank animation. `config_json` may be empty or a partial
    /// `EditorConfig` object; unparsable config falls back to defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str) -> Self {
        console_error_panic_hook_setup();
        Self {
            editor: Editor::new(parse_config(config_json)),
        }
    }

    /// Replace the session with a saved document.
    /// Returns JSON: `{"ok":true}` or `{"ok":false,"error":"..."}`.
    pub fn load(&mut self, document_json: &str) -> String {
        let config = self.editor.config().clone();
        let loaded = AnimationDocument::from_json(document_json)
            .and_then(|doc| Editor::from_document(doc, config));
        match loaded {
            Ok(editor) => {
                let rect = self.editor.surface_rect();
                let view_mode = self.editor.view_mode();
                self.editor.teardown();
                self.editor = editor;
                self.editor.set_view_mode(view_mode);
                if let Some(rect) = rect {
                    self.editor.set_surface_rect(rect);
                }
                ok_json()
            }
            Err(e) => error_json(&e.to_string()),
        }
    }

    /// Wire the outbound callbacks. `save` receives the document JSON;
    /// `cancel` takes no arguments.
    pub fn set_callbacks(&mut self, save: js_sys::Function, cancel: js_sys::Function) {
        self.editor.set_sink(Box::new(JsSink::new(save, cancel)));
    }

    pub fn set_name(&mut self, name: &str) {
        self.editor.set_name(name);
    }

    pub fn get_name(&self) -> String {
        self.editor.name().to_string()
    }

    // ─── Surface ─────────────────────────────────────────────────────────

    /// Report the drawing surface's bounding client rect.
    pub fn set_surface_rect(&mut self, left: f64, top: f64, width: f64, height: f64) {
        self.editor.set_surface_rect(ClientRect::new(left, top, width, height));
    }

    /// `"full"`, `"half"` or `"empty"`. Returns `false` for an unknown mode.
    pub fn set_view_mode(&mut self, name: &str) -> bool {
        match ViewMode::from_name(name) {
            Some(mode) => {
                self.editor.set_view_mode(mode);
                true
            }
            None => false,
        }
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    /// Pointer down in client coordinates. Returns true if the timeline changed.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_down(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let mods = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        self.editor.pointer_down(Point::new(x, y), mods)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_move(&mut self, x: f64, y: f64, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let mods = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        self.editor.pointer_move(Point::new(x, y), mods)
    }

    pub fn handle_pointer_up(&mut self) -> bool {
        self.editor.pointer_up()
    }

    pub fn handle_pointer_leave(&mut self) -> bool {
        self.editor.pointer_leave()
    }

    // ─── Toolbox ─────────────────────────────────────────────────────────

    /// Begin dragging a toolbox item (`"player"`, `"cone"`, ...).
    pub fn start_toolbox_drag(&mut self, item: &str) -> bool {
        match ToolboxItem::from_name(item) {
            Some(item) => {
                self.editor.start_toolbox_drag(item);
                true
            }
            None => false,
        }
    }

    /// Whether the host should `preventDefault` on dragover.
    pub fn drag_over(&self) -> bool {
        self.editor.drag_over()
    }

    pub fn drop_at(&mut self, x: f64, y: f64) -> bool {
        self.editor.drop_at(Point::new(x, y))
    }

    pub fn cancel_toolbox_drag(&mut self) {
        self.editor.cancel_toolbox_drag();
    }

    /// Toolbox click: add the item at the default spot.
    pub fn add_item(&mut self, item: &str) -> bool {
        match ToolboxItem::from_name(item) {
            Some(ToolboxItem::Player) => self.editor.add_player(),
            Some(ToolboxItem::Equipment(kind)) => self.editor.add_equipment(kind),
            None => false,
        }
    }

    pub fn add_ball(&mut self) -> bool {
        self.editor.add_ball()
    }

    pub fn delete_ball(&mut self) -> bool {
        self.editor.delete_ball()
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Handle a key press. Returns JSON `{"handled":bool,"action":...}` so the
    /// host knows whether to `preventDefault`.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
        text_focus: bool,
    ) -> String {
        let mods = Modifiers {
            shift,
            ctrl,
            alt,
            meta,
        };
        let action = self.editor.key(key, mods, text_focus);
        let listener = self.editor.take_listener_change();
        to_json(&serde_json::json!({
            "handled": action.is_some(),
            "action": action,
            "listener": listener,
        }))
    }

    pub fn hide_help(&mut self) {
        self.editor.hide_help();
    }

    // ─── Selection & edits ───────────────────────────────────────────────

    /// Select by `(type, id)`; `additive` toggles membership.
    pub fn select(&mut self, kind: &str, id: &str, additive: bool) -> bool {
        match element_ref(kind, id) {
            Some(r) => self.editor.select(r, additive),
            None => false,
        }
    }

    pub fn select_all(&mut self) -> bool {
        self.editor.select_all()
    }

    pub fn deselect_all(&mut self) {
        self.editor.deselect_all();
    }

    pub fn delete_selected(&mut self) -> bool {
        self.editor.delete_selected()
    }

    pub fn delete_element(&mut self, kind: &str, id: &str) -> bool {
        match element_ref(kind, id) {
            Some(r) => self.editor.delete_element(r),
            None => false,
        }
    }

    pub fn duplicate_selected(&mut self) -> bool {
        self.editor.duplicate_selected()
    }

    pub fn copy(&mut self) -> bool {
        self.editor.copy()
    }

    pub fn paste(&mut self) -> bool {
        self.editor.paste()
    }

    pub fn paste_positions(&mut self) -> bool {
        self.editor.paste_positions()
    }

    pub fn mirror(&mut self) -> bool {
        self.editor.mirror()
    }

    pub fn swap_players(&mut self) -> bool {
        self.editor.swap_selected_players()
    }

    pub fn undo(&mut self) -> bool {
        self.editor.undo().is_some()
    }

    pub fn redo(&mut self) -> bool {
        self.editor.redo().is_some()
    }

    // ─── Popups ──────────────────────────────────────────────────────────
    //
    // Each returns `"attach"`, `"detach"` or `"keep"` for the host's single
    // click-outside listener.

    #[allow(clippy::too_many_arguments)]
    pub fn open_context_menu(
        &mut self,
        kind: &str,
        id: &str,
        x: f64,
        y: f64,
        container_left: f64,
        container_top: f64,
        container_width: f64,
        container_height: f64,
    ) -> String {
        let container = ClientRect::new(container_left, container_top, container_width, container_height);
        let change = match element_ref(kind, id) {
            Some(r) => self.editor.open_context_menu(r, Point::new(x, y), container),
            None => ListenerChange::Keep,
        };
        listener_name(change)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn open_label_editor(
        &mut self,
        kind: &str,
        id: &str,
        x: f64,
        y: f64,
        container_left: f64,
        container_top: f64,
        container_width: f64,
        container_height: f64,
    ) -> String {
        let container = ClientRect::new(container_left, container_top, container_width, container_height);
        let change = match element_ref(kind, id) {
            Some(r) => self.editor.open_label_editor(r, Point::new(x, y), container),
            None => ListenerChange::Keep,
        };
        listener_name(change)
    }

    pub fn edit_label_from_menu(&mut self) -> String {
        listener_name(self.editor.edit_label_from_menu())
    }

    pub fn edit_note_from_menu(&mut self) -> String {
        listener_name(self.editor.edit_note_from_menu())
    }

    pub fn close_popups(&mut self) -> String {
        listener_name(self.editor.close_popups())
    }

    /// Listener change left by calls that close a popup on the side:
    /// pointer down, `toggle_play`, `set_label`, `set_note`, `delete_element`.
    pub fn take_listener_change(&mut self) -> String {
        listener_name(self.editor.take_listener_change())
    }

    pub fn set_label(&mut self, kind: &str, id: &str, text: &str) -> bool {
        match element_ref(kind, id) {
            Some(r) => self.editor.set_label(r, text),
            None => false,
        }
    }

    pub fn set_note(&mut self, kind: &str, id: &str, text: &str) -> bool {
        match element_ref(kind, id) {
            Some(r) => self.editor.set_note(r, text),
            None => false,
        }
    }

    // ─── Frames & playback ───────────────────────────────────────────────

    pub fn add_keyframe(&mut self) -> bool {
        self.editor.add_keyframe()
    }

    pub fn delete_keyframe(&mut self) -> bool {
        self.editor.delete_keyframe()
    }

    pub fn go_to_frame(&mut self, index: usize) -> bool {
        self.editor.go_to_frame(index)
    }

    pub fn prev_frame(&mut self) -> bool {
        self.editor.prev_frame()
    }

    pub fn next_frame(&mut self) -> bool {
        self.editor.next_frame()
    }

    pub fn reset(&mut self) {
        self.editor.reset();
    }

    /// Returns whether playback is running afterwards. The host starts its
    /// animation-frame loop when this turns true.
    pub fn toggle_play(&mut self) -> bool {
        self.editor.toggle_play()
    }

    /// Animation-frame callback. Returns `true` while the host should keep
    /// requesting frames.
    pub fn tick(&mut self, now: f64) -> bool {
        match self.editor.tick(now) {
            TickOutcome::Idle | TickOutcome::Finished | TickOutcome::Cancelled => false,
            TickOutcome::Advanced(_) | TickOutcome::Looped => self.editor.playback().is_armed(),
        }
    }

    pub fn set_speed(&mut self, speed: f64) -> bool {
        self.editor.set_speed(speed)
    }

    pub fn get_speed(&self) -> f64 {
        self.editor.speed()
    }

    // ─── Output ──────────────────────────────────────────────────────────

    /// Everything needed to draw the surface and the chrome, as JSON.
    pub fn render_snapshot(&self) -> String {
        to_json(&self.editor.render_snapshot())
    }

    /// The current document as JSON (what `save` would send).
    pub fn document_json(&self) -> String {
        match self.editor.document().to_json() {
            Ok(json) => json,
            Err(e) => error_json(&e.to_string()),
        }
    }

    /// Hand the document to the save callback. Refused while a save is in flight.
    pub fn save(&mut self) -> bool {
        self.editor.save()
    }

    /// Report the outcome of the host's persistence call.
    pub fn save_finished(&mut self, ok: bool) {
        self.editor.save_finished(ok);
    }

    pub fn cancel(&mut self) {
        self.editor.cancel();
    }

    /// Stop the clock and close popups before the host unmounts.
    pub fn teardown(&mut self) -> String {
        listener_name(self.editor.teardown())
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────

fn parse_config(json: &str) -> EditorConfig {
    if json.trim().is_empty() {
        return EditorConfig::default();
    }
    serde_json::from_str(json).unwrap_or_else(|e| {
        log::warn!("ignoring editor config: {e}");
        EditorConfig::default()
    })
}

fn element_ref(kind: &str, id: &str) -> Option<ElementRef> {
    let kind = match kind {
        "player" => ElementKind::Player,
        "equipment" => ElementKind::Equipment,
        _ => return None,
    };
    Some(ElementRef {
        kind,
        id: ElementId::intern(id),
    })
}

fn listener_name(change: ListenerChange) -> String {
    match change {
        ListenerChange::Attach => "attach",
        ListenerChange::Detach => "detach",
        ListenerChange::Keep => "keep",
    }
    .to_string()
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| error_json(&format!("Serialization error: {e}")))
}

fn ok_json() -> String {
    r#"{"ok":true}"#.to_string()
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "ok": false, "error": message }).to_string()
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Courtboard WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no editor needed) ─────────────────────────────

/// Validate a document. Returns JSON
/// `{"ok":true,"diagnostics":[...]}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate(document_json: &str) -> String {
    match AnimationDocument::from_json(document_json) {
        Ok(doc) => to_json(&serde_json::json!({
            "ok": true,
            "diagnostics": cb_core::lint_document(&doc),
        })),
        Err(e) => error_json(&e.to_string()),
    }
}

/// Rows for the keyboard help overlay.
#[wasm_bindgen]
pub fn shortcut_legend() -> String {
    to_json(&SHORTCUT_LEGEND)
}

/// Toolbox entries in display order, plus the label presets.
#[wasm_bindgen]
pub fn catalog() -> String {
    let equipment: Vec<_> = EquipmentKind::ALL
        .iter()
        .map(|kind| {
            serde_json::json!({
                "type": kind,
                "definition": kind.definition(),
            })
        })
        .collect();
    to_json(&serde_json::json!({
        "equipment": equipment,
        "labelPresets": LABEL_PRESETS,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn measured() -> CourtboardEditor {
        let mut ed = CourtboardEditor::new("");
        ed.set_surface_rect(0.0, 0.0, 320.0, 640.0);
        ed
    }

    #[test]
    fn validate_reports_errors_as_json() {
        let out: serde_json::Value = serde_json::from_str(&validate(r#"{"keyframes":[]}"#)).unwrap();
        assert_eq!(out["ok"], false);
        assert_eq!(out["error"], "animation has no keyframes");

        let out: serde_json::Value =
            serde_json::from_str(&validate(r#"{"keyframes":[{"id":"a","players":[]}]}"#)).unwrap();
        assert_eq!(out["ok"], true);
        assert_eq!(out["diagnostics"][0]["rule"], "missing-ball");
    }

    #[test]
    fn bad_config_falls_back_to_defaults() {
        let ed = CourtboardEditor::new("{not json");
        assert_eq!(ed.get_speed(), 1000.0);
        let ed = CourtboardEditor::new(r#"{"defaultSpeed": 1500}"#);
        assert_eq!(ed.get_speed(), 1500.0);
    }

    #[test]
    fn load_keeps_surface_measurement() {
        let mut ed = measured();
        let doc = r##"{"name":"Pass","speed":800,"keyframes":[{"id":"a","players":[{"id":"p1","x":60,"y":390,"color":"#3b82f6"}]}]}"##;
        assert_eq!(ed.load(doc), r#"{"ok":true}"#);
        assert_eq!(ed.get_name(), "Pass");
        ed.handle_pointer_down(60.0, 390.0, false, false, false, false);
        assert!(ed.editor.is_dragging());

        let err: serde_json::Value = serde_json::from_str(&ed.load("{")).unwrap();
        assert_eq!(err["ok"], false);
        assert_eq!(ed.get_name(), "Pass", "failed load keeps the session");
    }

    #[test]
    fn key_result_is_json() {
        let mut ed = measured();
        let out: serde_json::Value =
            serde_json::from_str(&ed.handle_key("k", false, false, false, false, false)).unwrap();
        assert_eq!(out["handled"], true);
        assert_eq!(out["action"]["action"], "addKeyframe");

        let out: serde_json::Value =
            serde_json::from_str(&ed.handle_key("q", false, false, false, false, false)).unwrap();
        assert_eq!(out["handled"], false);
        assert!(out["action"].is_null());
    }

    #[test]
    fn popup_listener_names() {
        let mut ed = measured();
        assert_eq!(ed.open_context_menu("player", "p1", 50.0, 50.0, 0.0, 0.0, 320.0, 640.0), "attach");
        assert_eq!(ed.edit_note_from_menu(), "keep");
        assert_eq!(ed.close_popups(), "detach");
        assert_eq!(ed.open_context_menu("ball", "p1", 50.0, 50.0, 0.0, 0.0, 320.0, 640.0), "keep");
    }

    #[test]
    fn escape_key_reports_detach() {
        let mut ed = measured();
        assert_eq!(ed.open_context_menu("player", "p1", 50.0, 50.0, 0.0, 0.0, 320.0, 640.0), "attach");
        let out: serde_json::Value =
            serde_json::from_str(&ed.handle_key("Escape", false, false, false, false, false)).unwrap();
        assert_eq!(out["action"]["action"], "deselect");
        assert_eq!(out["listener"], "detach");
        assert_eq!(ed.close_popups(), "keep");

        ed.open_label_editor("player", "p1", 50.0, 50.0, 0.0, 0.0, 320.0, 640.0);
        assert!(ed.set_label("player", "p1", "S"));
        assert_eq!(ed.take_listener_change(), "detach");
    }

    #[test]
    fn snapshot_and_catalog_serialize() {
        let ed = measured();
        let snap: serde_json::Value = serde_json::from_str(&ed.render_snapshot()).unwrap();
        assert_eq!(snap["frameCount"], 1);
        assert_eq!(snap["frame"]["players"].as_array().map(Vec::len), Some(6));
        assert_eq!(snap["popup"]["kind"], "none");

        let cat: serde_json::Value = serde_json::from_str(&catalog()).unwrap();
        assert_eq!(cat["equipment"][2]["type"], "ball");
        assert_eq!(cat["labelPresets"].as_array().map(Vec::len), Some(12));
    }
}
