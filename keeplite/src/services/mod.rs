//! Services module
//!
//! Business logic that sits between the controllers and the database
//! repository.

pub mod notes;
pub mod settings;
pub mod use_cases;

pub use notes::{NoteStream, NotesService};
pub use settings::SettingsService;
pub use use_cases::NoteUseCases;
