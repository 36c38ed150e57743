//! Search, color filter and ordering of a note list
//!
//! `NoteQuery::apply` is the one filter/sort pipeline in the crate. The
//! search use case maps every live snapshot through it and the list
//! controller only ever goes through the search use case.

use super::note::Note;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Field a note list is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    Timestamp,
    Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// Ordering of a note list. The default, newest first, is the store's own order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NoteOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl NoteOrder {
    pub fn by_timestamp(ascending: bool) -> Self {
        Self {
            key: SortKey::Timestamp,
            direction: if ascending {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            },
        }
    }

    pub fn is_ascending(&self) -> bool {
        self.direction == SortDirection::Ascending
    }

    fn compare(&self, a: &Note, b: &Note) -> Ordering {
        let ordering = match self.key {
            SortKey::Timestamp => a.timestamp.cmp(&b.timestamp),
            SortKey::Color => a.color.cmp(&b.color),
        };
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Parameters of a note search
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NoteQuery {
    /// Free text matched against title and content; blank matches everything
    pub text: String,
    /// Keep only notes of this palette index
    pub color: Option<i32>,
    pub order: NoteOrder,
}

impl NoteQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// True when applying the query leaves the store's sequence unchanged
    pub fn is_default(&self) -> bool {
        self.text.trim().is_empty() && self.color.is_none() && self.order == NoteOrder::default()
    }

    pub fn matches(&self, note: &Note) -> bool {
        if let Some(color) = self.color {
            if note.color != color {
                return false;
            }
        }
        if self.text.trim().is_empty() {
            return true;
        }
        let needle = self.text.to_lowercase();
        note.title.to_lowercase().contains(&needle) || note.content.to_lowercase().contains(&needle)
    }

    /// Filter then stable-sort a snapshot. Ties keep their incoming order.
    pub fn apply(&self, notes: Vec<Note>) -> Vec<Note> {
        let mut kept: Vec<Note> = notes.into_iter().filter(|n| self.matches(n)).collect();
        kept.sort_by(|a, b| self.order.compare(a, b));
        kept
    }
}
