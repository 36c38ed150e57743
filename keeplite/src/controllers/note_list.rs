//! Note list controller
//!
//! Holds the visible note list and its query parameters. Every parameter
//! change re-subscribes to a live note sequence: the plain all-notes query
//! when the parameters are at their defaults, the search use case
//! otherwise. Also owns the single-slot undo for deletes.

use super::UiEvent;
use crate::domain::{Note, NoteOrder, NoteQuery, SortDirection, SortKey};
use crate::error::AppError;
use crate::services::{NoteStream, NoteUseCases};
use futures::stream::StreamExt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;

/// State of the note list screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteListState {
    pub notes: Vec<Note>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub is_search_active: bool,
    pub search_query: String,
    pub filter_by_color: Option<i32>,
    pub order: NoteOrder,
}

/// What the list screen should show, by precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListDisplay {
    Loading,
    Error,
    Empty,
    Populated,
}

impl NoteListState {
    /// Search parameters currently in effect
    pub fn query(&self) -> NoteQuery {
        NoteQuery {
            text: self.search_query.clone(),
            color: self.filter_by_color,
            order: self.order,
        }
    }

    pub fn display(&self) -> ListDisplay {
        if self.is_loading {
            ListDisplay::Loading
        } else if self.error.is_some() {
            ListDisplay::Error
        } else if self.notes.is_empty() {
            ListDisplay::Empty
        } else {
            ListDisplay::Populated
        }
    }
}

/// User actions on the list screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteListEvent {
    Load,
    SearchQueryChanged(String),
    DeleteNote(Note),
    AddNote(Note),
    FilterByColor(Option<i32>),
    ToggleSortOrder { ascending: bool },
    SortBy(SortKey),
    RestoreNote,
    ToggleSearch,
    ClearSearch,
    ClearFilters,
}

pub struct NoteListController {
    use_cases: NoteUseCases,
    state: Arc<watch::Sender<NoteListState>>,
    events: mpsc::UnboundedSender<UiEvent>,
    recently_deleted: Mutex<Option<Note>>,
    subscription: Mutex<Option<JoinHandle<()>>>,
    /// Bumped on every re-subscription; older collectors stop writing state
    generation: Arc<AtomicU64>,
}

impl NoteListController {
    /// Create the controller and start loading notes
    pub async fn open(use_cases: NoteUseCases) -> (Self, mpsc::UnboundedReceiver<UiEvent>) {
        let (events, events_rx) = mpsc::unbounded_channel();
        let (state, _) = watch::channel(NoteListState::default());

        let controller = Self {
            use_cases,
            state: Arc::new(state),
            events,
            recently_deleted: Mutex::new(None),
            subscription: Mutex::new(None),
            generation: Arc::new(AtomicU64::new(0)),
        };
        controller.refresh().await;

        (controller, events_rx)
    }

    /// Observe state changes
    pub fn state(&self) -> watch::Receiver<NoteListState> {
        self.state.subscribe()
    }

    pub fn current_state(&self) -> NoteListState {
        self.state.borrow().clone()
    }

    /// True while a deleted note can still be restored
    pub async fn can_restore(&self) -> bool {
        self.recently_deleted.lock().await.is_some()
    }

    pub async fn on_event(&self, event: NoteListEvent) {
        match event {
            NoteListEvent::Load => self.refresh().await,
            NoteListEvent::DeleteNote(note) => self.delete_note(note).await,
            NoteListEvent::AddNote(note) => self.add_note(note).await,
            NoteListEvent::RestoreNote => self.restore_note().await,
            NoteListEvent::ToggleSearch => {
                self.state.send_modify(|s| {
                    s.is_search_active = !s.is_search_active;
                    if !s.is_search_active {
                        s.search_query.clear();
                    }
                });
                self.refresh().await;
            }
            NoteListEvent::ClearSearch => {
                self.state.send_modify(|s| s.search_query.clear());
                self.refresh().await;
            }
            NoteListEvent::SearchQueryChanged(query) => {
                self.state.send_modify(|s| s.search_query = query);
                self.refresh().await;
            }
            NoteListEvent::FilterByColor(color) => {
                self.state.send_modify(|s| s.filter_by_color = color);
                self.refresh().await;
            }
            NoteListEvent::ToggleSortOrder { ascending } => {
                self.state.send_modify(|s| {
                    s.order.direction = if ascending {
                        SortDirection::Ascending
                    } else {
                        SortDirection::Descending
                    };
                });
                self.refresh().await;
            }
            NoteListEvent::SortBy(key) => {
                self.state.send_modify(|s| s.order.key = key);
                self.refresh().await;
            }
            NoteListEvent::ClearFilters => {
                self.state.send_modify(|s| {
                    s.filter_by_color = None;
                    s.order = NoteOrder::default();
                });
                self.refresh().await;
            }
        }
    }

    async fn delete_note(&self, note: Note) {
        if note.id.is_none() {
            tracing::debug!("Ignoring delete of a note that was never stored");
            return;
        }
        if let Err(e) = self.use_cases.delete_note(&note).await {
            self.report_failure("Failed to delete note", &e);
            return;
        }

        *self.recently_deleted.lock().await = Some(note);
        self.notify(UiEvent::snackbar_with_action("Note deleted", "Undo"));
        self.refresh().await;
    }

    async fn add_note(&self, note: Note) {
        if let Err(e) = self.use_cases.add_note(&note).await {
            self.report_failure("Failed to add note", &e);
            return;
        }

        self.notify(UiEvent::snackbar("Note added"));
        self.refresh().await;
    }

    async fn restore_note(&self) {
        let mut slot = self.recently_deleted.lock().await;
        let Some(note) = slot.take() else {
            tracing::debug!("No deleted note to restore");
            return;
        };

        // Content comes back, identity does not
        let restored = Note { id: None, ..note.clone() };
        match self.use_cases.add_note(&restored).await {
            Ok(id) => {
                drop(slot);
                tracing::info!("Restored deleted note {:?} as {}", note.id, id);
                self.refresh().await;
            }
            Err(e) => {
                *slot = Some(note);
                drop(slot);
                self.report_failure("Failed to restore note", &e);
            }
        }
    }

    /// Re-derive the visible list from the current parameters
    async fn refresh(&self) {
        let query = self.state.borrow().query();

        if query.is_default() {
            self.subscribe(self.use_cases.get_notes(), "Failed to load notes")
                .await;
        } else {
            tracing::debug!("Searching notes with {:?}", query);
            self.subscribe(self.use_cases.search_notes(query), "Search error")
                .await;
        }
    }

    /// Replace the running collector with one reading `stream`
    async fn subscribe(&self, mut stream: NoteStream, failure_context: &'static str) {
        let mut slot = self.subscription.lock().await;
        if let Some(previous) = slot.take() {
            previous.abort();
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|s| s.is_loading = true);

        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);

        *slot = Some(tokio::spawn(async move {
            while let Some(snapshot) = stream.next().await {
                let error = match &snapshot {
                    Ok(_) => None,
                    Err(e) => {
                        tracing::error!("{}: {}", failure_context, e);
                        Some(format!("{}: {}", failure_context, e))
                    }
                };

                let applied = state.send_if_modified(|s| {
                    if current.load(Ordering::SeqCst) != generation {
                        return false;
                    }
                    if let Ok(notes) = snapshot {
                        s.notes = notes;
                    }
                    s.error = error;
                    s.is_loading = false;
                    true
                });

                if !applied {
                    break;
                }
            }
        }));
    }

    fn report_failure(&self, context: &str, error: &AppError) {
        tracing::error!("{}: {}", context, error);
        let message = format!("{}: {}", context, error);
        self.state.send_modify(|s| {
            s.error = Some(message);
            s.is_loading = false;
        });
    }

    fn notify(&self, event: UiEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("UI event dropped, no listener");
        }
    }
}

impl Drop for NoteListController {
    fn drop(&mut self) {
        if let Some(handle) = self.subscription.get_mut().take() {
            handle.abort();
        }
    }
}
