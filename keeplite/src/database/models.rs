//! Database models
//!
//! Rust structs mirroring rows of the notes table. Settings rows are
//! plain key/value strings and need no struct.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of the `notes` table
///
/// `id` is `None` until the row has been inserted once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct NoteRecord {
    pub id: Option<i64>,
    pub title: String,
    pub content: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Index into the note palette
    pub color: i32,
}
