#![forbid(unsafe_code)]

//! Deterministic, JSON-friendly input schema for the lightbox.
//!
//! The web host (JS or `lightbox-web`) is expected to provide:
//! - viewport coordinates in CSS pixels for pointer and click events, and
//! - the DOM event `timeStamp` (milliseconds, monotonic) as `time_ms`.
//!
//! The engine never reads a clock of its own, so a recorded JSON trace
//! replays to the same outcomes.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Modifier keys held during a key event.
    ///
    /// Encoded as a compact `u8` bitset in JSON (`mods`).
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

impl Modifiers {
    /// Modifiers that turn an arrow key into a browser shortcut
    /// (history navigation, tab switching).
    pub const SHORTCUT: Self = Self::ALT.union(Self::CTRL).union(Self::SUPER);
}

mod mods_bits {
    use super::Modifiers;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(mods: &Modifiers, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(mods.bits())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Modifiers, D::Error> {
        u8::deserialize(d).map(Modifiers::from_bits_truncate)
    }
}

// ---------------------------------------------------------------------------
// Pointer
// ---------------------------------------------------------------------------

/// Device behind a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

impl PointerKind {
    /// Map the DOM `pointerType` string. Unknown or empty types are treated
    /// as a mouse so they never drive swipes.
    #[must_use]
    pub fn from_dom(pointer_type: &str) -> Self {
        match pointer_type {
            "touch" => Self::Touch,
            "pen" => Self::Pen,
            _ => Self::Mouse,
        }
    }

    /// Whether this device may drive swipe navigation.
    #[must_use]
    pub const fn drives_swipe(self) -> bool {
        matches!(self, Self::Touch | Self::Pen)
    }
}

/// Phase for pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// Normalized pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub phase: PointerPhase,
    pub pointer_id: i32,
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
    pub time_ms: f64,
}

impl PointerInput {
    /// Touch pointer event with id 1, the common case in tests and traces.
    #[must_use]
    pub const fn touch(phase: PointerPhase, x: f64, y: f64, time_ms: f64) -> Self {
        Self {
            phase,
            pointer_id: 1,
            kind: PointerKind::Touch,
            x,
            y,
            time_ms,
        }
    }
}

// ---------------------------------------------------------------------------
// Keyboard
// ---------------------------------------------------------------------------

/// Keys the lightbox reacts to. Everything else is passed through.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCode {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other(Box<str>),
}

impl KeyCode {
    /// Map the DOM `KeyboardEvent.key` value (including legacy IE/Edge
    /// names).
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            other => Self::Other(other.into()),
        }
    }
}

/// Normalized key-down event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyInput {
    pub key: KeyCode,
    #[serde(with = "mods_bits", default)]
    pub mods: Modifiers,
}

impl KeyInput {
    #[must_use]
    pub const fn plain(key: KeyCode) -> Self {
        Self {
            key,
            mods: Modifiers::empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// Click
// ---------------------------------------------------------------------------

/// Normalized click event (including browser-synthesized clicks after touch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClickInput {
    pub x: f64,
    pub y: f64,
    pub time_ms: f64,
}

/// Any input the lightbox consumes, tagged for JSON record/replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightboxInput {
    Pointer(PointerInput),
    Key(KeyInput),
    Click(ClickInput),
}

impl LightboxInput {
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}
