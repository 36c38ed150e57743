//! Note editor controller
//!
//! Editable fields of one note. Nothing is persisted until `SaveNote`.

use super::UiEvent;
use crate::config::DEFAULT_NOTE_COLOR;
use crate::domain::Note;
use crate::services::NoteUseCases;
use tokio::sync::{mpsc, watch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    /// Fresh note, nothing typed yet
    BlankNew,
    /// Fields hold a stored note, untouched
    LoadedExisting,
    Editing,
    Saved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEditorState {
    /// Id of the stored note being edited; saving then updates instead of inserting
    pub note_id: Option<i64>,
    pub title: String,
    pub content: String,
    pub color: i32,
    pub timestamp: i64,
    pub is_saving: bool,
    pub phase: EditorPhase,
}

impl NoteEditorState {
    /// Empty fields stamped with the current time
    pub fn blank() -> Self {
        Self {
            note_id: None,
            title: String::new(),
            content: String::new(),
            color: DEFAULT_NOTE_COLOR,
            timestamp: chrono::Utc::now().timestamp_millis(),
            is_saving: false,
            phase: EditorPhase::BlankNew,
        }
    }

    pub fn to_note(&self) -> Note {
        Note {
            id: self.note_id,
            title: self.title.clone(),
            content: self.content.clone(),
            timestamp: self.timestamp,
            color: self.color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEditorEvent {
    EnteredTitle(String),
    EnteredContent(String),
    ChangeColor(i32),
    ChangeTimestamp(i64),
    LoadNote(i64),
    ShowSnackbar(String),
    SaveNote,
    ResetFields,
}

pub struct NoteEditorController {
    use_cases: NoteUseCases,
    state: watch::Sender<NoteEditorState>,
    events: mpsc::UnboundedSender<UiEvent>,
}

impl NoteEditorController {
    /// Start blank, or load `note_id` into the fields
    pub async fn open(
        use_cases: NoteUseCases,
        note_id: Option<i64>,
    ) -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let (state, _) = watch::channel(NoteEditorState::blank());

        let controller = Self {
            use_cases,
            state,
            events,
        };
        if let Some(id) = note_id {
            controller.load_note(id).await;
        }

        (controller, events_rx)
    }

    pub fn state(&self) -> watch::Receiver<NoteEditorState> {
        self.state.subscribe()
    }

    pub fn current_state(&self) -> NoteEditorState {
        self.state.borrow().clone()
    }

    pub async fn on_event(&self, event: NoteEditorEvent) {
        match event {
            NoteEditorEvent::EnteredTitle(title) => self.edit(|s| s.title = title),
            NoteEditorEvent::EnteredContent(content) => self.edit(|s| s.content = content),
            NoteEditorEvent::ChangeColor(color) => self.edit(|s| s.color = color),
            NoteEditorEvent::ChangeTimestamp(timestamp) => self.edit(|s| s.timestamp = timestamp),
            NoteEditorEvent::LoadNote(id) => self.load_note(id).await,
            NoteEditorEvent::ShowSnackbar(message) => self.notify(UiEvent::snackbar(message)),
            NoteEditorEvent::SaveNote => self.save_note().await,
            NoteEditorEvent::ResetFields => {
                tracing::debug!("Editor reset");
                self.state.send_replace(NoteEditorState::blank());
            }
        }
    }

    fn edit(&self, apply: impl FnOnce(&mut NoteEditorState)) {
        self.state.send_modify(|s| {
            apply(s);
            s.phase = EditorPhase::Editing;
        });
    }

    async fn load_note(&self, id: i64) {
        match self.use_cases.get_note_by_id(id).await {
            Ok(Some(note)) => {
                tracing::debug!("Editing note {}", id);
                self.state.send_modify(|s| {
                    s.note_id = note.id;
                    s.title = note.title;
                    s.content = note.content;
                    s.color = note.color;
                    s.timestamp = note.timestamp;
                    s.phase = EditorPhase::LoadedExisting;
                });
            }
            Ok(None) => {
                tracing::warn!("Note {} not found", id);
                self.notify(UiEvent::snackbar("Note not found"));
            }
            Err(e) => {
                tracing::error!("Error loading note {}: {}", id, e);
                self.notify(UiEvent::snackbar(format!("Error loading note: {}", e)));
            }
        }
    }

    async fn save_note(&self) {
        let note = self.state.borrow().to_note();
        if note.is_blank() {
            self.notify(UiEvent::snackbar("Cannot save empty note"));
            return;
        }

        self.state.send_modify(|s| s.is_saving = true);

        match self.use_cases.add_note(&note).await {
            Ok(id) => {
                self.state.send_modify(|s| {
                    s.note_id = Some(id);
                    s.is_saving = false;
                    s.phase = EditorPhase::Saved;
                });
                self.notify(UiEvent::NoteSaved);
            }
            Err(e) => {
                tracing::error!("Error saving note: {}", e);
                self.state.send_modify(|s| s.is_saving = false);
                self.notify(UiEvent::snackbar(format!("Error saving note: {}", e)));
            }
        }
    }

    fn notify(&self, event: UiEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("UI event dropped, no listener");
        }
    }
}
