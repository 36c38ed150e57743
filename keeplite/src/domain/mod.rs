//! Domain model
//!
//! In-memory shapes the services and controllers work with. Nothing here
//! touches the database.

pub mod note;
pub mod query;
pub mod settings;

pub use note::Note;
pub use query::{NoteOrder, NoteQuery, SortDirection, SortKey};
pub use settings::{GridLayout, NoteStyle, Settings};
