//! Lint diagnostics for animation documents.
//!
//! Reports structural issues without modifying the document. The editor
//! tolerates everything reported here except `Error`s, which
//! `AnimationDocument::validate` also rejects.

use crate::document::AnimationDocument;
use crate::id::ElementId;
use crate::model::{Color, Element, EquipmentItem, Keyframe, MAX_LABEL_CHARS, PlayerPosition};
use crate::surface::placement_bounds;
use kurbo::{Point, Rect};
use serde::Serialize;
use std::collections::HashSet;

// ─── Diagnostic types ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    /// The document cannot be loaded.
    Error,
    /// Loadable, but probably a mistake.
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LintDiagnostic {
    /// Keyframe index, when the finding is scoped to one frame.
    pub frame: Option<usize>,
    pub element: Option<ElementId>,
    pub message: String,
    pub severity: LintSeverity,
    /// Short rule identifier (e.g. "duplicate-id", "missing-ball").
    pub rule: &'static str,
}

// ─── Public API ──────────────────────────────────────────────────────────

#[must_use]
pub fn lint_document(doc: &AnimationDocument) -> Vec<LintDiagnostic> {
    let mut diags = Vec::new();
    lint_header(doc, &mut diags);
    for (index, frame) in doc.keyframes.iter().enumerate() {
        lint_frame::<PlayerPosition>(index, frame, &mut diags);
        lint_frame::<EquipmentItem>(index, frame, &mut diags);
        lint_colors(index, frame, &mut diags);
        if frame.ball.is_none() {
            diags.push(LintDiagnostic {
                frame: Some(index),
                element: None,
                message: format!("Keyframe {} has no ball.", index + 1),
                severity: LintSeverity::Info,
                rule: "missing-ball",
            });
        }
    }
    diags
}

/// True if any diagnostic is an `Error`.
pub fn has_errors(diags: &[LintDiagnostic]) -> bool {
    diags.iter().any(|d| d.severity == LintSeverity::Error)
}

// ─── Rules ───────────────────────────────────────────────────────────────

fn lint_header(doc: &AnimationDocument, diags: &mut Vec<LintDiagnostic>) {
    if doc.keyframes.is_empty() {
        diags.push(LintDiagnostic {
            frame: None,
            element: None,
            message: "The animation has no keyframes.".into(),
            severity: LintSeverity::Error,
            rule: "no-keyframes",
        });
    }
    if !(doc.speed.is_finite() && doc.speed > 0.0) {
        diags.push(LintDiagnostic {
            frame: None,
            element: None,
            message: format!("Speed {} is not a positive duration.", doc.speed),
            severity: LintSeverity::Error,
            rule: "invalid-speed",
        });
    }
}

/// Duplicate ids, oversized labels and off-surface positions.
fn lint_frame<E: Element>(index: usize, frame: &Keyframe, diags: &mut Vec<LintDiagnostic>) {
    let bounds = placement_bounds();
    let mut seen = HashSet::new();

    for item in E::in_frame(frame) {
        let id = item.id();
        if !seen.insert(id) {
            diags.push(LintDiagnostic {
                frame: Some(index),
                element: Some(id),
                message: format!("`{id}` appears more than once in keyframe {}.", index + 1),
                severity: LintSeverity::Warning,
                rule: "duplicate-id",
            });
        }
        if let Some(label) = item.label()
            && label.chars().count() > MAX_LABEL_CHARS
        {
            diags.push(LintDiagnostic {
                frame: Some(index),
                element: Some(id),
                message: format!("Label of `{id}` is longer than {MAX_LABEL_CHARS} characters."),
                severity: LintSeverity::Warning,
                rule: "long-label",
            });
        }
        let p = item.position();
        if !within(bounds, p) {
            diags.push(LintDiagnostic {
                frame: Some(index),
                element: Some(id),
                message: format!("`{id}` at ({}, {}) is outside the court.", p.x, p.y),
                severity: LintSeverity::Warning,
                rule: "off-surface",
            });
        }
    }
}

/// Inclusive on every edge, unlike `Rect::contains`. NaN is never within.
fn within(bounds: Rect, p: Point) -> bool {
    p.x >= bounds.x0 && p.x <= bounds.x1 && p.y >= bounds.y0 && p.y <= bounds.y1
}

fn lint_colors(index: usize, frame: &Keyframe, diags: &mut Vec<LintDiagnostic>) {
    for player in &frame.players {
        if Color::from_hex(&player.color).is_none() {
            diags.push(LintDiagnostic {
                frame: Some(index),
                element: Some(player.id),
                message: format!("`{}` has an invalid color `{}`.", player.id, player.color),
                severity: LintSeverity::Warning,
                rule: "invalid-color",
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::default_formation;

    fn doc(frames: Vec<Keyframe>) -> AnimationDocument {
        AnimationDocument::new(None, frames, 1000.0)
    }

    #[test]
    fn clean_formation_has_no_warnings() {
        let diags = lint_document(&doc(vec![default_formation(6)]));
        assert!(diags.is_empty(), "{diags:?}");
    }

    #[test]
    fn flags_duplicates_labels_positions_and_colors() {
        let mut frame = default_formation(2);
        frame.players[1].id = frame.players[0].id;
        frame.players[0].label = Some("x".repeat(25));
        frame.players[0].x = 1000.0;
        frame.players[1].color = "blue".into();
        frame.ball = None;

        let rules: Vec<&str> = lint_document(&doc(vec![frame])).iter().map(|d| d.rule).collect();
        for rule in ["duplicate-id", "long-label", "off-surface", "invalid-color", "missing-ball"] {
            assert!(rules.contains(&rule), "missing {rule} in {rules:?}");
        }
    }

    #[test]
    fn empty_document_is_an_error() {
        let mut d = doc(Vec::new());
        d.speed = -1.0;
        let diags = lint_document(&d);
        assert!(has_errors(&diags));
        assert_eq!(diags.len(), 2);
    }
}
