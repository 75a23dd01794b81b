//! Context menu / label editor / note editor state machine.
//!
//! At most one popup is open. While one is, the host keeps a single
//! click-outside listener attached; every transition reports whether that
//! listener must be attached, detached or left alone. Side-effect closes
//! (a press on the surface, Escape, starting playback, a finished edit)
//! use `dismiss`; the host picks up the resulting `Detach` from
//! `sync_listener`.

use cb_core::model::ElementRef;
use cb_core::{ClientRect, Point};
use serde::Serialize;

/// Gap between the cursor and the popup corner, and the minimum distance
/// from the container edge.
const POPUP_MARGIN: f64 = 10.0;

/// Popup corner in container-relative pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PopupAnchor {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PopupState {
    #[default]
    None,
    ContextMenu {
        target: ElementRef,
        at: PopupAnchor,
    },
    LabelEditor {
        target: ElementRef,
        at: PopupAnchor,
    },
    NoteEditor {
        target: ElementRef,
        at: PopupAnchor,
    },
}

impl PopupState {
    pub fn is_open(&self) -> bool {
        !matches!(self, PopupState::None)
    }

    pub fn target(&self) -> Option<ElementRef> {
        match *self {
            PopupState::None => None,
            PopupState::ContextMenu { target, .. }
            | PopupState::LabelEditor { target, .. }
            | PopupState::NoteEditor { target, .. } => Some(target),
        }
    }
}

/// What the host should do with its click-outside listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListenerChange {
    Attach,
    Detach,
    Keep,
}

#[derive(Debug, Clone)]
pub struct Popups {
    state: PopupState,
    /// Whether the host has been told to attach its listener.
    listener: bool,
    width: f64,
    height: f64,
}

impl Popups {
    /// `width`/`height` is the popup footprint used for edge clamping.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            state: PopupState::None,
            listener: false,
            width,
            height,
        }
    }

    pub fn state(&self) -> PopupState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    /// Right-click on an entity.
    pub fn open_context_menu(
        &mut self,
        target: ElementRef,
        client: Point,
        container: ClientRect,
    ) -> ListenerChange {
        let at = self.anchor(client, container);
        self.set(PopupState::ContextMenu { target, at })
    }

    /// Double-click on an entity: straight to the label editor.
    pub fn open_label_editor(
        &mut self,
        target: ElementRef,
        client: Point,
        container: ClientRect,
    ) -> ListenerChange {
        let at = self.anchor(client, container);
        self.set(PopupState::LabelEditor { target, at })
    }

    /// "Change Label" in the context menu. Ignored unless the menu is open.
    pub fn edit_label_from_menu(&mut self) -> ListenerChange {
        match self.state {
            PopupState::ContextMenu { target, at } => self.set(PopupState::LabelEditor { target, at }),
            _ => ListenerChange::Keep,
        }
    }

    /// "Add Note" in the context menu. Ignored unless the menu is open.
    pub fn edit_note_from_menu(&mut self) -> ListenerChange {
        match self.state {
            PopupState::ContextMenu { target, at } => self.set(PopupState::NoteEditor { target, at }),
            _ => ListenerChange::Keep,
        }
    }

    /// Escape, a click outside, or a finished edit.
    pub fn close(&mut self) -> ListenerChange {
        self.set(PopupState::None)
    }

    /// Close without reporting. The pending change is left for
    /// `sync_listener`.
    pub fn dismiss(&mut self) {
        if self.state.is_open() {
            log::trace!("popup {:?} dismissed", self.state);
            self.state = PopupState::None;
        }
    }

    /// Bring the host's listener in line with the current state.
    pub fn sync_listener(&mut self) -> ListenerChange {
        let change = match (self.listener, self.state.is_open()) {
            (false, true) => ListenerChange::Attach,
            (true, false) => ListenerChange::Detach,
            _ => ListenerChange::Keep,
        };
        self.listener = self.state.is_open();
        change
    }

    fn set(&mut self, next: PopupState) -> ListenerChange {
        log::trace!("popup {:?} -> {:?}", self.state, next);
        self.state = next;
        self.sync_listener()
    }

    /// Offset from the cursor, then kept inside the container.
    fn anchor(&self, client: Point, container: ClientRect) -> PopupAnchor {
        let x = client.x - container.left + POPUP_MARGIN;
        let y = client.y - container.top + POPUP_MARGIN;
        PopupAnchor {
            x: x.min(container.width - self.width).max(POPUP_MARGIN),
            y: y.min(container.height - self.height).max(POPUP_MARGIN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cb_core::ElementId;

    fn target() -> ElementRef {
        ElementRef::player(ElementId::intern("p1"))
    }

    fn container() -> ClientRect {
        ClientRect::new(100.0, 50.0, 400.0, 300.0)
    }

    #[test]
    fn menu_to_label_editor_keeps_one_listener() {
        let mut popups = Popups::new(180.0, 100.0);
        let change = popups.open_context_menu(target(), Point::new(150.0, 100.0), container());
        assert_eq!(change, ListenerChange::Attach);
        assert_eq!(
            popups.state(),
            PopupState::ContextMenu { target: target(), at: PopupAnchor { x: 60.0, y: 60.0 } }
        );

        assert_eq!(popups.edit_label_from_menu(), ListenerChange::Keep);
        assert!(matches!(popups.state(), PopupState::LabelEditor { .. }));

        assert_eq!(popups.close(), ListenerChange::Detach);
        assert_eq!(popups.state(), PopupState::None);
        assert_eq!(popups.close(), ListenerChange::Keep);
    }

    #[test]
    fn note_editor_only_from_menu() {
        let mut popups = Popups::new(180.0, 100.0);
        assert_eq!(popups.edit_note_from_menu(), ListenerChange::Keep);
        assert!(!popups.is_open());

        popups.open_context_menu(target(), Point::new(150.0, 100.0), container());
        popups.edit_note_from_menu();
        assert!(matches!(popups.state(), PopupState::NoteEditor { .. }));
    }

    #[test]
    fn dismiss_leaves_detach_pending() {
        let mut popups = Popups::new(180.0, 100.0);
        popups.open_context_menu(target(), Point::new(150.0, 100.0), container());
        popups.dismiss();
        assert!(!popups.is_open());
        assert_eq!(popups.sync_listener(), ListenerChange::Detach);
        assert_eq!(popups.sync_listener(), ListenerChange::Keep);

        // Dismissed and reopened before the host synced: still one listener.
        popups.open_context_menu(target(), Point::new(150.0, 100.0), container());
        popups.dismiss();
        assert_eq!(
            popups.open_label_editor(target(), Point::new(150.0, 100.0), container()),
            ListenerChange::Keep
        );
        assert_eq!(popups.close(), ListenerChange::Detach);
    }

    #[test]
    fn double_click_bypasses_menu() {
        let mut popups = Popups::new(180.0, 100.0);
        assert_eq!(
            popups.open_label_editor(target(), Point::new(150.0, 100.0), container()),
            ListenerChange::Attach
        );
        assert_eq!(popups.state().target(), Some(target()));
    }

    #[test]
    fn position_is_clamped_to_container() {
        let mut popups = Popups::new(180.0, 100.0);
        popups.open_context_menu(target(), Point::new(490.0, 340.0), container());
        match popups.state() {
            PopupState::ContextMenu { at, .. } => assert_eq!(at, PopupAnchor { x: 220.0, y: 200.0 }),
            other => panic!("expected menu, got {other:?}"),
        }

        // Near the top-left corner the margin wins.
        popups.open_context_menu(target(), Point::new(90.0, 30.0), container());
        match popups.state() {
            PopupState::ContextMenu { at, .. } => assert_eq!(at, PopupAnchor { x: 10.0, y: 10.0 }),
            other => panic!("expected menu, got {other:?}"),
        }
    }
}
