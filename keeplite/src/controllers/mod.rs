//! Controllers
//!
//! Screen-level state holders a UI shell observes. Each controller keeps
//! its state in a `watch` channel and reports one-shot notifications on an
//! unbounded `mpsc` channel whose receiver is handed out on construction.

pub mod note_editor;
pub mod note_list;
pub mod settings;

pub use note_editor::{EditorPhase, NoteEditorController, NoteEditorEvent, NoteEditorState};
pub use note_list::{ListDisplay, NoteListController, NoteListEvent, NoteListState};
pub use settings::SettingsController;

/// One-shot notification for the UI shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Transient message, optionally with an action button
    ShowSnackbar {
        message: String,
        action_label: Option<String>,
    },
    /// The edited note was stored; the shell navigates away
    NoteSaved,
}

impl UiEvent {
    pub fn snackbar(message: impl Into<String>) -> Self {
        Self::ShowSnackbar {
            message: message.into(),
            action_label: None,
        }
    }

    pub fn snackbar_with_action(message: impl Into<String>, action_label: impl Into<String>) -> Self {
        Self::ShowSnackbar {
            message: message.into(),
            action_label: Some(action_label.into()),
        }
    }
}
