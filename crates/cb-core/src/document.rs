//! The animation document exchanged with the host application.
//!
//! ```json
//! { "name": "Serve receive", "keyframes": [ ... ], "speed": 1000 }
//! ```

use crate::lint::{LintSeverity, lint_document};
use crate::model::Keyframe;
use crate::timeline::Timeline;
use serde::{Deserialize, Serialize};

/// Default duration of one segment, in milliseconds.
pub const DEFAULT_SPEED: f64 = 1000.0;

fn default_speed() -> f64 {
    DEFAULT_SPEED
}

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("invalid animation JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("animation has no keyframes")]
    NoKeyframes,

    #[error("speed must be a positive number, got {0}")]
    InvalidSpeed(f64),
}

/// `{ name?, keyframes, speed }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub keyframes: Vec<Keyframe>,
    #[serde(default = "default_speed")]
    pub speed: f64,
}

impl AnimationDocument {
    pub fn new(name: Option<String>, keyframes: Vec<Keyframe>, speed: f64) -> Self {
        Self {
            name,
            keyframes,
            speed,
        }
    }

    /// Parse and validate. Non-fatal findings are logged as warnings and
    /// the document is accepted as-is.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let doc: Self = serde_json::from_str(json)?;
        doc.validate()?;
        for diag in lint_document(&doc) {
            if diag.severity == LintSeverity::Warning {
                log::warn!("{}: {}", diag.rule, diag.message);
            }
        }
        Ok(doc)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Hard errors only: an empty keyframe list or an unusable speed.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.keyframes.is_empty() {
            return Err(DocumentError::NoKeyframes);
        }
        if !(self.speed.is_finite() && self.speed > 0.0) {
            return Err(DocumentError::InvalidSpeed(self.speed));
        }
        Ok(())
    }

    pub fn into_timeline(self) -> Result<Timeline, DocumentError> {
        Timeline::from_keyframes(self.keyframes).ok_or(DocumentError::NoKeyframes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_defaults_when_missing() {
        let doc = AnimationDocument::from_json(r#"{"keyframes":[{"id":"a","players":[]}]}"#)
            .unwrap();
        assert_eq!(doc.speed, DEFAULT_SPEED);
        assert_eq!(doc.name, None);
    }

    #[test]
    fn rejects_empty_and_bad_speed() {
        let err = AnimationDocument::from_json(r#"{"keyframes":[]}"#).unwrap_err();
        assert!(matches!(err, DocumentError::NoKeyframes));

        let err =
            AnimationDocument::from_json(r#"{"keyframes":[{"id":"a"}],"speed":0}"#).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidSpeed(s) if s == 0.0));

        let err = AnimationDocument::from_json("{").unwrap_err();
        assert!(matches!(err, DocumentError::Json(_)));
    }

    #[test]
    fn json_roundtrip_keeps_name() {
        let doc = AnimationDocument::new(
            Some("Drill".into()),
            vec![Keyframe::new(crate::id::ElementId::intern("doc-kf"))],
            750.0,
        );
        let back = AnimationDocument::from_json(&doc.to_json().unwrap()).unwrap();
        assert_eq!(back, doc);
    }
}
