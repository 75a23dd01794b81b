//! Keyframe data model for drill animations.
//!
//! An animation is an ordered list of `Keyframe`s. Each keyframe is a
//! complete snapshot of the playing surface: player positions, an optional
//! ball, and pieces of equipment. Entities keep the same `ElementId` across
//! every keyframe they appear in; an entity missing from a keyframe simply
//! isn't on the surface at that point of the animation.

use crate::id::ElementId;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Longest label an element may carry.
pub const MAX_LABEL_CHARS: usize = 20;

/// Characters of the label drawn on the surface.
pub const DISPLAY_LABEL_CHARS: usize = 3;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RGB` or `#RRGGBB` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        let channel = |hi: u8, lo: u8| -> Option<f32> {
            Some((hex_val(hi)? << 4 | hex_val(lo)?) as f32 / 255.0)
        };

        match bytes.len() {
            3 => Some(Self::rgba(
                channel(bytes[0], bytes[0])?,
                channel(bytes[1], bytes[1])?,
                channel(bytes[2], bytes[2])?,
                1.0,
            )),
            6 => Some(Self::rgba(
                channel(bytes[0], bytes[1])?,
                channel(bytes[2], bytes[3])?,
                channel(bytes[4], bytes[5])?,
                1.0,
            )),
            _ => None,
        }
    }
}

// ─── Element references ──────────────────────────────────────────────────

/// The two kinds of selectable entity. The ball is never selectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Player,
    Equipment,
}

/// A `(kind, id)` handle onto a player or equipment item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementRef {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub id: ElementId,
}

impl ElementRef {
    pub fn player(id: ElementId) -> Self {
        Self {
            kind: ElementKind::Player,
            id,
        }
    }

    pub fn equipment(id: ElementId) -> Self {
        Self {
            kind: ElementKind::Equipment,
            id,
        }
    }
}

// ─── Entities ────────────────────────────────────────────────────────────

/// A player marker on the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPosition {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Frame at which the player was introduced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_frame_index: Option<usize>,
}

/// The fixed set of equipment pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentKind {
    Cone,
    Target,
    /// A spare ball lying on the surface, distinct from the game ball.
    #[serde(rename = "ball")]
    BallMarker,
    Hoop,
    Ladder,
    Hurdle,
    Antenna,
}

/// A piece of equipment placed on the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentItem {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: EquipmentKind,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_frame_index: Option<usize>,
}

/// The game ball.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub x: f64,
    pub y: f64,
}

impl Ball {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<Point> for Ball {
    fn from(p: Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// Behavior shared by players and equipment, so that frame-range edits and
/// interpolation can be written once for both collections.
pub trait Element: Clone {
    const KIND: ElementKind;

    fn id(&self) -> ElementId;
    fn set_id(&mut self, id: ElementId);
    fn position(&self) -> Point;
    fn set_position(&mut self, p: Point);
    fn label(&self) -> Option<&str>;
    fn set_label(&mut self, label: Option<String>);
    fn note(&self) -> Option<&str>;
    fn set_note(&mut self, note: Option<String>);
    fn set_first_frame_index(&mut self, index: usize);

    /// The collection of this kind inside a keyframe.
    fn in_frame(frame: &Keyframe) -> &[Self];
    fn in_frame_mut(frame: &mut Keyframe) -> &mut Vec<Self>;

    fn element_ref(&self) -> ElementRef {
        ElementRef {
            kind: Self::KIND,
            id: self.id(),
        }
    }
}

macro_rules! impl_element {
    ($ty:ty, $kind:expr, $field:ident) => {
        impl Element for $ty {
            const KIND: ElementKind = $kind;

            fn id(&self) -> ElementId {
                self.id
            }
            fn set_id(&mut self, id: ElementId) {
                self.id = id;
            }
            fn position(&self) -> Point {
                Point::new(self.x, self.y)
            }
            fn set_position(&mut self, p: Point) {
                self.x = p.x;
                self.y = p.y;
            }
            fn label(&self) -> Option<&str> {
                self.label.as_deref()
            }
            fn set_label(&mut self, label: Option<String>) {
                self.label = label;
            }
            fn note(&self) -> Option<&str> {
                self.note.as_deref()
            }
            fn set_note(&mut self, note: Option<String>) {
                self.note = note;
            }
            fn set_first_frame_index(&mut self, index: usize) {
                self.first_frame_index = Some(index);
            }
            fn in_frame(frame: &Keyframe) -> &[Self] {
                &frame.$field
            }
            fn in_frame_mut(frame: &mut Keyframe) -> &mut Vec<Self> {
                &mut frame.$field
            }
        }
    };
}

impl_element!(PlayerPosition, ElementKind::Player, players);
impl_element!(EquipmentItem, ElementKind::Equipment, equipment);

// ─── Keyframe ────────────────────────────────────────────────────────────

/// One snapshot of the surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub id: ElementId,
    #[serde(default)]
    pub players: Vec<PlayerPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ball: Option<Ball>,
    #[serde(default)]
    pub equipment: Vec<EquipmentItem>,
}

impl Keyframe {
    /// An empty keyframe (no players, no ball, no equipment).
    pub fn new(id: ElementId) -> Self {
        Self {
            id,
            players: Vec::new(),
            ball: None,
            equipment: Vec::new(),
        }
    }

    /// Deep copy under a new keyframe id.
    pub fn duplicate(&self, id: ElementId) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }

    pub fn find<E: Element>(&self, id: ElementId) -> Option<&E> {
        E::in_frame(self).iter().find(|e| e.id() == id)
    }

    pub fn find_mut<E: Element>(&mut self, id: ElementId) -> Option<&mut E> {
        E::in_frame_mut(self).iter_mut().find(|e| e.id() == id)
    }

    pub fn player(&self, id: ElementId) -> Option<&PlayerPosition> {
        self.find(id)
    }

    pub fn equipment_item(&self, id: ElementId) -> Option<&EquipmentItem> {
        self.find(id)
    }

    pub fn contains(&self, r: ElementRef) -> bool {
        self.position_of(r).is_some()
    }

    pub fn position_of(&self, r: ElementRef) -> Option<Point> {
        match r.kind {
            ElementKind::Player => self.find::<PlayerPosition>(r.id).map(Element::position),
            ElementKind::Equipment => self.find::<EquipmentItem>(r.id).map(Element::position),
        }
    }

    pub fn label_of(&self, r: ElementRef) -> Option<&str> {
        match r.kind {
            ElementKind::Player => self.find::<PlayerPosition>(r.id)?.label(),
            ElementKind::Equipment => self.find::<EquipmentItem>(r.id)?.label(),
        }
    }

    pub fn note_of(&self, r: ElementRef) -> Option<&str> {
        match r.kind {
            ElementKind::Player => self.find::<PlayerPosition>(r.id)?.note(),
            ElementKind::Equipment => self.find::<EquipmentItem>(r.id)?.note(),
        }
    }

    /// Move an element to `p`. Returns `false` if it isn't in this frame.
    pub fn set_position(&mut self, r: ElementRef, p: Point) -> bool {
        fn set<E: Element>(frame: &mut Keyframe, id: ElementId, p: Point) -> bool {
            match frame.find_mut::<E>(id) {
                Some(e) => {
                    e.set_position(p);
                    true
                }
                None => false,
            }
        }
        match r.kind {
            ElementKind::Player => set::<PlayerPosition>(self, r.id, p),
            ElementKind::Equipment => set::<EquipmentItem>(self, r.id, p),
        }
    }

    pub fn translate(&mut self, r: ElementRef, delta: Vec2) -> bool {
        match self.position_of(r) {
            Some(p) => self.set_position(r, p + delta),
            None => false,
        }
    }

    /// Remove an element from this frame only.
    pub fn remove(&mut self, r: ElementRef) -> bool {
        fn remove<E: Element>(frame: &mut Keyframe, id: ElementId) -> bool {
            let items = E::in_frame_mut(frame);
            let before = items.len();
            items.retain(|e| e.id() != id);
            items.len() != before
        }
        match r.kind {
            ElementKind::Player => remove::<PlayerPosition>(self, r.id),
            ElementKind::Equipment => remove::<EquipmentItem>(self, r.id),
        }
    }

    /// Every selectable element, players first.
    pub fn element_refs(&self) -> Vec<ElementRef> {
        self.players
            .iter()
            .map(Element::element_ref)
            .chain(self.equipment.iter().map(Element::element_ref))
            .collect()
    }
}

// ─── Text helpers ────────────────────────────────────────────────────────

/// Normalize user-entered label text: empty clears, long input is cut to
/// `MAX_LABEL_CHARS`.
pub fn normalize_label(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.chars().take(MAX_LABEL_CHARS).collect())
    }
}

/// Normalize note text: empty clears.
pub fn normalize_note(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// The part of a label drawn on the surface.
pub fn display_label(label: &str) -> &str {
    match label.char_indices().nth(DISPLAY_LABEL_CHARS) {
        Some((idx, _)) => &label[..idx],
        None => label,
    }
}
