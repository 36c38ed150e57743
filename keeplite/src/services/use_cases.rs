//! Note use cases
//!
//! One operation per verb. Everything delegates to `NotesService` except
//! `search_notes`, which runs each live snapshot through `NoteQuery::apply`.

use super::notes::{NoteStream, NotesService};
use crate::domain::{Note, NoteQuery};
use crate::error::Result;
use futures::stream::StreamExt;

#[derive(Clone)]
pub struct NoteUseCases {
    notes: NotesService,
}

impl NoteUseCases {
    pub fn new(notes: NotesService) -> Self {
        Self { notes }
    }

    pub async fn add_note(&self, note: &Note) -> Result<i64> {
        self.notes.insert_note(note).await
    }

    pub async fn delete_note(&self, note: &Note) -> Result<()> {
        self.notes.delete_note(note).await
    }

    pub async fn update_note(&self, note: &Note) -> Result<i64> {
        self.notes.update_note(note).await
    }

    pub async fn get_note_by_id(&self, id: i64) -> Result<Option<Note>> {
        self.notes.get_note_by_id(id).await
    }

    pub fn get_notes(&self) -> NoteStream {
        self.notes.get_all_notes()
    }

    /// Live all-notes sequence filtered and ordered by `query`
    pub fn search_notes(&self, query: NoteQuery) -> NoteStream {
        self.notes
            .get_all_notes()
            .map(move |snapshot| snapshot.map(|notes| query.apply(notes)))
            .boxed()
    }

    pub async fn count_notes(&self) -> Result<i64> {
        self.notes.count_notes().await
    }
}
