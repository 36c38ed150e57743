//! Display preferences

use serde::{Deserialize, Serialize};

/// How a note card is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoteStyle {
    #[default]
    Default,
    Rounded,
    Material,
    Minimal,
}

impl NoteStyle {
    pub const ALL: [NoteStyle; 4] = [
        NoteStyle::Default,
        NoteStyle::Rounded,
        NoteStyle::Material,
        NoteStyle::Minimal,
    ];

    pub fn ordinal(self) -> i64 {
        self as i64
    }

    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

/// Column arrangement of the note grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GridLayout {
    /// Columns follow the screen width
    #[default]
    Adaptive,
    OneColumn,
    TwoColumns,
    ThreeColumns,
}

impl GridLayout {
    pub const ALL: [GridLayout; 4] = [
        GridLayout::Adaptive,
        GridLayout::OneColumn,
        GridLayout::TwoColumns,
        GridLayout::ThreeColumns,
    ];

    pub fn ordinal(self) -> i64 {
        self as i64
    }

    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

/// All display preferences at once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub note_style: NoteStyle,
    pub grid_layout: GridLayout,
    pub enable_animations: bool,
    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            note_style: NoteStyle::Default,
            grid_layout: GridLayout::Adaptive,
            enable_animations: true,
            dark_mode: false,
        }
    }
}
