//! Notes service
//!
//! Adapts stored rows to the `Note` model. No business rules live here:
//! a note written through this service reads back equal in every field.

use crate::database::{NoteRecord, Repository};
use crate::domain::Note;
use crate::error::Result;
use futures::stream::{BoxStream, StreamExt};

/// Live sequence of note snapshots
pub type NoteStream = BoxStream<'static, Result<Vec<Note>>>;

impl From<NoteRecord> for Note {
    fn from(record: NoteRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            content: record.content,
            timestamp: record.timestamp,
            color: record.color,
        }
    }
}

impl From<&Note> for NoteRecord {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            title: note.title.clone(),
            content: note.content.clone(),
            timestamp: note.timestamp,
            color: note.color,
        }
    }
}

/// Service for reading and writing notes
#[derive(Clone)]
pub struct NotesService {
    repo: Repository,
}

impl NotesService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// All notes, newest first, re-emitted after every change
    pub fn get_all_notes(&self) -> NoteStream {
        into_notes(self.repo.watch_notes())
    }

    pub async fn get_note_by_id(&self, id: i64) -> Result<Option<Note>> {
        Ok(self.repo.get_note(id).await?.map(Note::from))
    }

    /// Store a note, returning its id
    pub async fn insert_note(&self, note: &Note) -> Result<i64> {
        let id = self.repo.upsert_note(&NoteRecord::from(note)).await?;
        tracing::info!("Note saved: {}", id);
        Ok(id)
    }

    /// Replace a stored note in full. Same upsert as `insert_note`.
    pub async fn update_note(&self, note: &Note) -> Result<i64> {
        self.insert_note(note).await
    }

    pub async fn delete_note(&self, note: &Note) -> Result<()> {
        self.repo.delete_note(&NoteRecord::from(note)).await?;
        tracing::info!("Note deleted: {:?}", note.id);
        Ok(())
    }

    pub async fn delete_all_notes(&self) -> Result<u64> {
        let removed = self.repo.delete_all_notes().await?;
        tracing::info!("Deleted {} notes", removed);
        Ok(removed)
    }

    /// Notes whose title contains `query`, ignoring case
    pub fn search_notes_by_title(&self, query: &str) -> NoteStream {
        into_notes(self.repo.watch_notes_by_title(query))
    }

    pub async fn count_notes(&self) -> Result<i64> {
        self.repo.count_notes().await
    }
}

fn into_notes(records: BoxStream<'static, Result<Vec<NoteRecord>>>) -> NoteStream {
    records
        .map(|snapshot| snapshot.map(|rows| rows.into_iter().map(Note::from).collect()))
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_repository;

    async fn create_test_service() -> NotesService {
        NotesService::new(test_repository().await)
    }

    #[tokio::test]
    async fn test_round_trip_by_id() {
        let service = create_test_service().await;
        let note = Note::new("Recipe", "flour, eggs", 1_700_000_000_123).with_color(4);

        let id = service.insert_note(&note).await.unwrap();
        let fetched = service.get_note_by_id(id).await.unwrap().unwrap();

        assert_eq!(fetched, Note { id: Some(id), ..note });
    }

    #[tokio::test]
    async fn test_round_trip_through_live_sequence() {
        let service = create_test_service().await;
        let note = Note::new("", "content only", 42).with_color(11);
        let id = service.insert_note(&note).await.unwrap();

        let mut all = service.get_all_notes();
        let snapshot = all.next().await.unwrap().unwrap();

        assert_eq!(snapshot, vec![Note { id: Some(id), ..note }]);
    }

    #[tokio::test]
    async fn test_update_keeps_single_row() {
        let service = create_test_service().await;
        let id = service.insert_note(&Note::new("Draft", "", 1)).await.unwrap();

        let edited = Note {
            id: Some(id),
            ..Note::new("Final", "done", 2)
        };
        service.update_note(&edited).await.unwrap();

        assert_eq!(service.count_notes().await.unwrap(), 1);
        assert_eq!(service.get_note_by_id(id).await.unwrap(), Some(edited));
    }

    #[tokio::test]
    async fn test_deleted_note_absent_from_next_emission() {
        let service = create_test_service().await;
        let id = service.insert_note(&Note::new("Temp", "", 1)).await.unwrap();
        let stored = service.get_note_by_id(id).await.unwrap().unwrap();

        let mut all = service.get_all_notes();
        assert_eq!(all.next().await.unwrap().unwrap().len(), 1);

        service.delete_note(&stored).await.unwrap();

        assert!(all.next().await.unwrap().unwrap().is_empty());
        assert_eq!(service.get_note_by_id(id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_search_by_title_treats_wildcards_literally() {
        let service = create_test_service().await;
        service.insert_note(&Note::new("100% done", "", 1)).await.unwrap();
        service.insert_note(&Note::new("1000 items", "", 2)).await.unwrap();
        service.insert_note(&Note::new("DONE list", "", 3)).await.unwrap();

        let percent = service
            .search_notes_by_title("0%")
            .next()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].title, "100% done");

        let done = service
            .search_notes_by_title("done")
            .next()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(done.len(), 2);
    }

    #[tokio::test]
    async fn test_search_by_title_folds_non_ascii_case() {
        let service = create_test_service().await;
        service.insert_note(&Note::new("Ärger im Büro", "", 1)).await.unwrap();
        service.insert_note(&Note::new("ÉTÉ plans", "", 2)).await.unwrap();
        service.insert_note(&Note::new("Winter", "été in content", 3)).await.unwrap();

        let aerger = service
            .search_notes_by_title("ärger")
            .next()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(aerger.len(), 1);
        assert_eq!(aerger[0].title, "Ärger im Büro");

        let ete = service
            .search_notes_by_title("été")
            .next()
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ete.len(), 1);
        assert_eq!(ete[0].title, "ÉTÉ plans");
    }

    #[tokio::test]
    async fn test_delete_all_notes() {
        let service = create_test_service().await;
        service.insert_note(&Note::new("a", "", 1)).await.unwrap();
        service.insert_note(&Note::new("b", "", 2)).await.unwrap();

        assert_eq!(service.delete_all_notes().await.unwrap(), 2);
        assert_eq!(service.count_notes().await.unwrap(), 0);
    }
}
