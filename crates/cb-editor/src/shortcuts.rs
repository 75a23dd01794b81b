//! Keyboard shortcut mapping.
//!
//! Bindings are written as chord strings (`"Ctrl+Shift+Z"`, `"Space"`,
//! `"?"`) in one ordered table and parsed once. Resolution walks the table
//! and the **first** matching chord wins; its gate then decides whether the
//! action fires in the current editor state. A chord whose gate fails does
//! not fall through to later bindings.
//!
//! Matching rules:
//! - Ctrl and ⌘ are the same modifier, and must match exactly.
//! - Shift and Alt in a chord are required; absent, they are not checked.
//!   Order the table most-specific first (`Ctrl+Shift+Z` before `Ctrl+Z`).
//! - Letter keys compare case-insensitively.
//!
//! Arrow keys are resolved before the table: with a selection they nudge it,
//! without one the table's frame navigation applies.

use std::sync::LazyLock;

use serde::Serialize;
use winnow::combinator::{alt, repeat, terminated};
use winnow::prelude::*;
use winnow::token::rest;

use crate::input::Modifiers;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ShortcutAction {
    // ── Playback / navigation ──
    TogglePlay,
    PrevFrame,
    NextFrame,
    FirstFrame,
    LastFrame,

    // ── Selection ──
    SelectAll,
    /// Clear the selection and close any popup.
    Deselect,

    // ── Edit ──
    DeleteSelected,
    Undo,
    Redo,
    Duplicate,
    Copy,
    /// Paste clipboard entities as new elements.
    Paste,
    /// Re-apply copied positions to the same elements.
    PastePositions,
    Save,
    Nudge { dx: f64, dy: f64 },

    // ── Animation / sport ──
    AddKeyframe,
    Mirror,
    SwapPlayers,

    // ── UI ──
    ShowHelp,
}

/// Editor state the gates look at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortcutContext {
    /// A text field has focus; every shortcut is suppressed.
    pub text_focus: bool,
    pub playing: bool,
    pub has_selection: bool,
    /// Number of selected players (the swap needs exactly two).
    pub selected_players: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gate {
    Always,
    /// Not while playing.
    Idle,
    /// Not while playing, and only with a selection.
    IdleWithSelection,
    /// Not while playing, and exactly two players selected.
    IdleWithTwoPlayers,
}

impl Gate {
    fn allows(self, ctx: &ShortcutContext) -> bool {
        match self {
            Gate::Always => true,
            Gate::Idle => !ctx.playing,
            Gate::IdleWithSelection => !ctx.playing && ctx.has_selection,
            Gate::IdleWithTwoPlayers => !ctx.playing && ctx.selected_players == 2,
        }
    }
}

// ─── Chords ──────────────────────────────────────────────────────────────

/// A parsed chord such as `Ctrl+Shift+Z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub command: bool,
    pub shift: bool,
    pub alt: bool,
    /// `KeyboardEvent.key` value; `"Space"` is stored as `" "`.
    pub key: String,
}

impl KeyChord {
    pub fn matches(&self, key: &str, mods: Modifiers) -> bool {
        if self.command != mods.command() {
            return false;
        }
        if (self.shift && !mods.shift) || (self.alt && !mods.alt) {
            return false;
        }
        self.key == key || (self.key.chars().count() == 1 && self.key.eq_ignore_ascii_case(key))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChordModifier {
    Command,
    Shift,
    Alt,
}

fn parse_modifier(input: &mut &str) -> ModalResult<ChordModifier> {
    terminated(
        alt((
            "Ctrl".value(ChordModifier::Command),
            "Cmd".value(ChordModifier::Command),
            "Shift".value(ChordModifier::Shift),
            "Alt".value(ChordModifier::Alt),
        )),
        '+',
    )
    .parse_next(input)
}

fn parse_key<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    rest.verify(|s: &str| !s.is_empty()).parse_next(input)
}

fn parse_chord_inner(input: &mut &str) -> ModalResult<KeyChord> {
    let modifiers: Vec<ChordModifier> = repeat(0.., parse_modifier).parse_next(input)?;
    let key = parse_key.parse_next(input)?;
    Ok(KeyChord {
        command: modifiers.contains(&ChordModifier::Command),
        shift: modifiers.contains(&ChordModifier::Shift),
        alt: modifiers.contains(&ChordModifier::Alt),
        key: match key {
            "Space" => " ".to_string(),
            other => other.to_string(),
        },
    })
}

/// Parse a chord string like `"Ctrl+Shift+Z"`.
pub fn parse_chord(text: &str) -> Result<KeyChord, String> {
    let mut input = text;
    parse_chord_inner
        .parse_next(&mut input)
        .map_err(|e| format!("Chord parse error in {text:?}: {e}"))
}

// ─── Binding table ───────────────────────────────────────────────────────

const BINDINGS: &[(&str, ShortcutAction, Gate)] = &[
    ("Space", ShortcutAction::TogglePlay, Gate::Always),
    ("Ctrl+/", ShortcutAction::ShowHelp, Gate::Always),
    ("?", ShortcutAction::ShowHelp, Gate::Always),
    ("Escape", ShortcutAction::Deselect, Gate::Always),
    ("Ctrl+Shift+Z", ShortcutAction::Redo, Gate::Always),
    ("Ctrl+Z", ShortcutAction::Undo, Gate::Always),
    ("Ctrl+A", ShortcutAction::SelectAll, Gate::Idle),
    ("Ctrl+D", ShortcutAction::Duplicate, Gate::IdleWithSelection),
    ("Ctrl+C", ShortcutAction::Copy, Gate::Idle),
    ("Ctrl+Shift+V", ShortcutAction::PastePositions, Gate::Idle),
    ("Ctrl+V", ShortcutAction::Paste, Gate::Idle),
    ("Ctrl+S", ShortcutAction::Save, Gate::Always),
    ("Delete", ShortcutAction::DeleteSelected, Gate::IdleWithSelection),
    ("Backspace", ShortcutAction::DeleteSelected, Gate::IdleWithSelection),
    ("Shift+ArrowLeft", ShortcutAction::FirstFrame, Gate::Idle),
    ("Shift+ArrowRight", ShortcutAction::LastFrame, Gate::Idle),
    ("ArrowLeft", ShortcutAction::PrevFrame, Gate::Idle),
    ("ArrowRight", ShortcutAction::NextFrame, Gate::Idle),
    ("K", ShortcutAction::AddKeyframe, Gate::Idle),
    ("M", ShortcutAction::Mirror, Gate::Idle),
    ("S", ShortcutAction::SwapPlayers, Gate::IdleWithTwoPlayers),
];

static PARSED: LazyLock<Vec<(KeyChord, ShortcutAction, Gate)>> = LazyLock::new(|| {
    BINDINGS
        .iter()
        .filter_map(|&(text, action, gate)| match parse_chord(text) {
            Ok(chord) => Some((chord, action, gate)),
            Err(e) => {
                log::warn!("{e}");
                None
            }
        })
        .collect()
});

/// Nudge distance per arrow press, and with Shift held.
const NUDGE_STEP: f64 = 1.0;
const NUDGE_STEP_SHIFT: f64 = 10.0;

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`, `" "`).
    /// Returns `None` if nothing should happen.
    pub fn resolve(key: &str, mods: Modifiers, ctx: &ShortcutContext) -> Option<ShortcutAction> {
        if ctx.text_focus {
            return None;
        }

        if let Some((dx, dy)) = arrow_direction(key)
            && !mods.command()
        {
            if ctx.playing {
                return None;
            }
            if ctx.has_selection {
                let step = if mods.shift { NUDGE_STEP_SHIFT } else { NUDGE_STEP };
                return Some(ShortcutAction::Nudge {
                    dx: dx * step,
                    dy: dy * step,
                });
            }
        }

        let (_, action, gate) = PARSED.iter().find(|(chord, ..)| chord.matches(key, mods))?;
        gate.allows(ctx).then_some(*action)
    }
}

fn arrow_direction(key: &str) -> Option<(f64, f64)> {
    match key {
        "ArrowLeft" => Some((-1.0, 0.0)),
        "ArrowRight" => Some((1.0, 0.0)),
        "ArrowUp" => Some((0.0, -1.0)),
        "ArrowDown" => Some((0.0, 1.0)),
        _ => None,
    }
}

// ─── Legend ──────────────────────────────────────────────────────────────

/// One row of the help overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShortcutEntry {
    pub keys: &'static str,
    pub description: &'static str,
    pub group: &'static str,
}

const fn entry(keys: &'static str, description: &'static str, group: &'static str) -> ShortcutEntry {
    ShortcutEntry {
        keys,
        description,
        group,
    }
}

pub const SHORTCUT_LEGEND: [ShortcutEntry; 23] = [
    entry("Space", "Play / Pause", "Playback"),
    entry("←", "Previous frame", "Navigation"),
    entry("→", "Next frame", "Navigation"),
    entry("Shift+←", "First frame", "Navigation"),
    entry("Shift+→", "Last frame", "Navigation"),
    entry("Ctrl+A", "Select all elements", "Selection"),
    entry("Escape", "Deselect all / Close popups", "Selection"),
    entry("Shift+Click", "Add to selection", "Selection"),
    entry("Shift+Drag", "Marquee select (on background)", "Selection"),
    entry("Delete / Backspace", "Delete selected", "Editing"),
    entry("Ctrl+Z", "Undo", "Editing"),
    entry("Ctrl+Shift+Z", "Redo", "Editing"),
    entry("Ctrl+D", "Duplicate selected", "Editing"),
    entry("Ctrl+C", "Copy positions", "Editing"),
    entry("Ctrl+V", "Paste positions", "Editing"),
    entry("Ctrl+Shift+V", "Paste onto the same elements", "Editing"),
    entry("↑/↓/←/→", "Nudge 1px (when selected)", "Editing"),
    entry("Shift+↑/↓/←/→", "Nudge 10px", "Editing"),
    entry("Ctrl+S", "Save", "Editing"),
    entry("K", "Add keyframe", "Animation"),
    entry("M", "Mirror formation", "Sport"),
    entry("S", "Swap two selected players", "Sport"),
    entry("Ctrl+/ or ?", "Show keyboard shortcuts", "Help"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn idle() -> ShortcutContext {
        ShortcutContext::default()
    }

    fn cmd_shift() -> Modifiers {
        Modifiers {
            ctrl: true,
            shift: true,
            ..Modifiers::NONE
        }
    }

    #[test]
    fn every_binding_parses() {
        assert_eq!(PARSED.len(), BINDINGS.len());
    }

    #[test]
    fn parse_chord_modifiers() {
        let chord = parse_chord("Ctrl+Shift+Z").unwrap();
        assert!(chord.command && chord.shift && !chord.alt);
        assert_eq!(chord.key, "Z");
        assert_eq!(parse_chord("Space").unwrap().key, " ");
        // A lone key that starts like a modifier name is still a key.
        assert_eq!(parse_chord("S").unwrap().key, "S");
        assert!(parse_chord("Ctrl+").is_err());
    }

    #[test]
    fn resolve_undo_redo() {
        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert_eq!(ShortcutMap::resolve("z", Modifiers::ctrl(), &idle()), Some(ShortcutAction::Undo));
        assert_eq!(ShortcutMap::resolve("z", meta, &idle()), Some(ShortcutAction::Undo));
        assert_eq!(ShortcutMap::resolve("Z", cmd_shift(), &idle()), Some(ShortcutAction::Redo));
        assert_eq!(ShortcutMap::resolve("z", Modifiers::NONE, &idle()), None);
    }

    #[test]
    fn resolve_help() {
        assert_eq!(ShortcutMap::resolve("/", Modifiers::ctrl(), &idle()), Some(ShortcutAction::ShowHelp));
        assert_eq!(ShortcutMap::resolve("?", Modifiers::shift(), &idle()), Some(ShortcutAction::ShowHelp));
        assert_eq!(ShortcutMap::resolve("?", Modifiers::ctrl(), &idle()), None);
    }

    #[test]
    fn paste_flavors() {
        assert_eq!(ShortcutMap::resolve("v", Modifiers::ctrl(), &idle()), Some(ShortcutAction::Paste));
        assert_eq!(
            ShortcutMap::resolve("V", cmd_shift(), &idle()),
            Some(ShortcutAction::PastePositions)
        );
    }

    #[test]
    fn text_focus_suppresses_everything() {
        let ctx = ShortcutContext {
            text_focus: true,
            ..idle()
        };
        assert_eq!(ShortcutMap::resolve(" ", Modifiers::NONE, &ctx), None);
        assert_eq!(ShortcutMap::resolve("Escape", Modifiers::NONE, &ctx), None);
    }

    #[test]
    fn editing_is_blocked_while_playing() {
        let playing = ShortcutContext {
            playing: true,
            has_selection: true,
            selected_players: 2,
            ..idle()
        };
        assert_eq!(ShortcutMap::resolve(" ", Modifiers::NONE, &playing), Some(ShortcutAction::TogglePlay));
        assert_eq!(ShortcutMap::resolve("k", Modifiers::NONE, &playing), None);
        assert_eq!(ShortcutMap::resolve("Delete", Modifiers::NONE, &playing), None);
        assert_eq!(ShortcutMap::resolve("ArrowLeft", Modifiers::NONE, &playing), None);
        assert_eq!(ShortcutMap::resolve("a", Modifiers::ctrl(), &playing), None);
    }

    #[test]
    fn arrows_nudge_with_selection_and_navigate_without() {
        let selected = ShortcutContext {
            has_selection: true,
            ..idle()
        };
        assert_eq!(
            ShortcutMap::resolve("ArrowUp", Modifiers::NONE, &selected),
            Some(ShortcutAction::Nudge { dx: 0.0, dy: -1.0 })
        );
        assert_eq!(
            ShortcutMap::resolve("ArrowLeft", Modifiers::shift(), &selected),
            Some(ShortcutAction::Nudge { dx: -10.0, dy: 0.0 })
        );

        assert_eq!(ShortcutMap::resolve("ArrowLeft", Modifiers::NONE, &idle()), Some(ShortcutAction::PrevFrame));
        assert_eq!(ShortcutMap::resolve("ArrowRight", Modifiers::shift(), &idle()), Some(ShortcutAction::LastFrame));
        assert_eq!(ShortcutMap::resolve("ArrowUp", Modifiers::NONE, &idle()), None);
    }

    #[test]
    fn selection_gates() {
        assert_eq!(ShortcutMap::resolve("Delete", Modifiers::NONE, &idle()), None);
        assert_eq!(ShortcutMap::resolve("d", Modifiers::ctrl(), &idle()), None);

        let one_player = ShortcutContext {
            has_selection: true,
            selected_players: 1,
            ..idle()
        };
        assert_eq!(ShortcutMap::resolve("s", Modifiers::NONE, &one_player), None);
        let two_players = ShortcutContext {
            selected_players: 2,
            ..one_player
        };
        assert_eq!(ShortcutMap::resolve("s", Modifiers::NONE, &two_players), Some(ShortcutAction::SwapPlayers));
        // Ctrl+S is save, never swap.
        assert_eq!(ShortcutMap::resolve("s", Modifiers::ctrl(), &two_players), Some(ShortcutAction::Save));
    }

    #[test]
    fn legend_groups() {
        let groups: Vec<&str> = SHORTCUT_LEGEND.iter().map(|e| e.group).collect();
        assert_eq!(groups.first(), Some(&"Playback"));
        assert_eq!(groups.last(), Some(&"Help"));
        assert!(SHORTCUT_LEGEND.iter().any(|e| e.keys == "Ctrl+Shift+Z" && e.description == "Redo"));
    }
}
