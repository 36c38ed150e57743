use crate::config::DEFAULT_NOTE_COLOR;
use serde::{Deserialize, Serialize};

/// A short text note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Assigned by the store on first insert
    pub id: Option<i64>,
    pub title: String,
    pub content: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Index into the note palette
    pub color: i32,
}

impl Note {
    /// A note that has not been stored yet
    pub fn new(title: impl Into<String>, content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            timestamp,
            color: DEFAULT_NOTE_COLOR,
        }
    }

    pub fn with_color(mut self, color: i32) -> Self {
        self.color = color;
        self
    }

    /// True when both title and content are empty or whitespace.
    /// Blank notes are never saved.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty()
    }
}
