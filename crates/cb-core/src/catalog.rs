//! Static lookup tables: equipment catalog, player palette, label presets,
//! and the default starting formation.

use crate::id::ElementId;
use crate::model::{Ball, EquipmentKind, Keyframe, PlayerPosition};
use crate::surface::{SURFACE_HEIGHT, SURFACE_WIDTH};
use serde::Serialize;

/// Display data for one equipment kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EquipmentDef {
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

impl EquipmentKind {
    /// Toolbox order.
    pub const ALL: [EquipmentKind; 7] = [
        EquipmentKind::Cone,
        EquipmentKind::Target,
        EquipmentKind::BallMarker,
        EquipmentKind::Hoop,
        EquipmentKind::Ladder,
        EquipmentKind::Hurdle,
        EquipmentKind::Antenna,
    ];

    pub fn definition(self) -> EquipmentDef {
        match self {
            EquipmentKind::Cone => EquipmentDef {
                name: "Cone",
                icon: "🔺",
                color: "#f97316",
            },
            EquipmentKind::Target => EquipmentDef {
                name: "Target",
                icon: "🎯",
                color: "#ef4444",
            },
            EquipmentKind::BallMarker => EquipmentDef {
                name: "Ball",
                icon: "🏐",
                color: "#fef3c7",
            },
            EquipmentKind::Hoop => EquipmentDef {
                name: "Hoop",
                icon: "⭕",
                color: "#3b82f6",
            },
            EquipmentKind::Ladder => EquipmentDef {
                name: "Ladder",
                icon: "🪜",
                color: "#eab308",
            },
            EquipmentKind::Hurdle => EquipmentDef {
                name: "Hurdle",
                icon: "🚧",
                color: "#22c55e",
            },
            EquipmentKind::Antenna => EquipmentDef {
                name: "Antenna",
                icon: "📍",
                color: "#a855f7",
            },
        }
    }

    /// Parse the serialized name (`"cone"`, `"ball"`, ...).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cone" => Some(EquipmentKind::Cone),
            "target" => Some(EquipmentKind::Target),
            "ball" => Some(EquipmentKind::BallMarker),
            "hoop" => Some(EquipmentKind::Hoop),
            "ladder" => Some(EquipmentKind::Ladder),
            "hurdle" => Some(EquipmentKind::Hurdle),
            "antenna" => Some(EquipmentKind::Antenna),
            _ => None,
        }
    }
}

/// Color rotation for newly placed players.
pub const PLAYER_COLORS: [&str; 8] = [
    "#3b82f6", // blue
    "#ef4444", // red
    "#22c55e", // green
    "#a855f7", // purple
    "#f97316", // orange
    "#06b6d4", // cyan
    "#ec4899", // pink
    "#eab308", // yellow
];

/// Color for the `n`-th player placed on a frame.
pub fn player_color(n: usize) -> &'static str {
    PLAYER_COLORS[n % PLAYER_COLORS.len()]
}

/// A quick-pick label offered by the label editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelPreset {
    pub label: &'static str,
    pub description: &'static str,
}

pub const LABEL_PRESETS: [LabelPreset; 12] = [
    LabelPreset { label: "1", description: "Position 1" },
    LabelPreset { label: "2", description: "Position 2" },
    LabelPreset { label: "3", description: "Position 3" },
    LabelPreset { label: "4", description: "Position 4" },
    LabelPreset { label: "5", description: "Position 5" },
    LabelPreset { label: "6", description: "Position 6" },
    LabelPreset { label: "S", description: "Setter" },
    LabelPreset { label: "OH", description: "Outside Hitter" },
    LabelPreset { label: "MB", description: "Middle Blocker" },
    LabelPreset { label: "OP", description: "Opposite" },
    LabelPreset { label: "L", description: "Libero" },
    LabelPreset { label: "C", description: "Coach" },
];

/// Where the ball starts in a fresh animation.
pub fn default_ball() -> Ball {
    Ball {
        x: SURFACE_WIDTH / 2.0,
        y: SURFACE_HEIGHT / 2.0 + 120.0,
    }
}

/// A single keyframe with `player_count` players in rows of three on the
/// home (lower) half, labelled `1..=n`, plus the ball.
pub fn default_formation(player_count: usize) -> Keyframe {
    let players = (0..player_count)
        .map(|i| PlayerPosition {
            id: ElementId::intern(&format!("p{}", i + 1)),
            x: 60.0 + (i % 3) as f64 * 100.0,
            y: SURFACE_HEIGHT / 2.0 + 70.0 + (i / 3) as f64 * 130.0,
            color: player_color(i).to_string(),
            label: Some((i + 1).to_string()),
            note: None,
            first_frame_index: None,
        })
        .collect();

    Keyframe {
        id: ElementId::fresh("kf"),
        players,
        ball: Some(default_ball()),
        equipment: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_a_definition_and_roundtrips_by_name() {
        for kind in EquipmentKind::ALL {
            let json = serde_json::to_value(kind).unwrap();
            let name = json.as_str().unwrap();
            assert_eq!(EquipmentKind::from_name(name), Some(kind));
            assert!(!kind.definition().name.is_empty());
        }
    }

    #[test]
    fn default_formation_is_two_rows_of_three() {
        let frame = default_formation(6);
        assert_eq!(frame.players.len(), 6);
        assert_eq!((frame.players[0].x, frame.players[0].y), (60.0, 390.0));
        assert_eq!((frame.players[5].x, frame.players[5].y), (260.0, 520.0));
        assert_eq!(frame.players[3].label.as_deref(), Some("4"));
        assert_eq!(frame.ball, Some(Ball { x: 160.0, y: 440.0 }));
    }

    #[test]
    fn palette_wraps() {
        assert_eq!(player_color(0), player_color(8));
    }
}
