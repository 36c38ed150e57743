//! Note colors
//!
//! Notes store a palette index, not a color. The same index selects a
//! light or a dark variant depending on the dark-mode preference.

use crate::config::PALETTE_SIZE;
use serde::{Serialize, Serializer};

/// A 32-bit ARGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    /// `#RRGGBB`, dropping alpha
    pub fn to_hex(self) -> String {
        format!("#{:06X}", self.0 & 0x00FF_FFFF)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

pub const NOTE_COLORS: [Color; PALETTE_SIZE] = [
    Color(0xFFFFFFFF), // White
    Color(0xFFF28B82), // Red
    Color(0xFFFBBC04), // Orange
    Color(0xFFFFF475), // Yellow
    Color(0xFFCBFF90), // Green
    Color(0xFFA7FFEB), // Teal
    Color(0xFFCBF0F8), // Blue
    Color(0xFFAECBFA), // Dark blue
    Color(0xFFD7AEFB), // Purple
    Color(0xFFFDCFE8), // Pink
    Color(0xFFE6C9A8), // Brown
    Color(0xFFE8EAED), // Gray
];

pub const DARK_NOTE_COLORS: [Color; PALETTE_SIZE] = [
    Color(0xFF202124), // Surface
    Color(0xFF5C2B29),
    Color(0xFF614A19),
    Color(0xFF635D19),
    Color(0xFF345920),
    Color(0xFF16504B),
    Color(0xFF2C5452),
    Color(0xFF2E3F5A),
    Color(0xFF443A5C),
    Color(0xFF5B3B4D),
    Color(0xFF4E3829),
    Color(0xFF3C4043),
];

/// Color for a palette index; anything outside the palette gets index 0.
pub fn note_color(index: i32, dark_mode: bool) -> Color {
    let palette = if dark_mode {
        &DARK_NOTE_COLORS
    } else {
        &NOTE_COLORS
    };

    usize::try_from(index)
        .ok()
        .and_then(|i| palette.get(i))
        .copied()
        .unwrap_or(palette[0])
}
