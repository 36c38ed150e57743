//! Repository layer for database operations
//!
//! Whole-record CRUD over the notes table, key-value access to the
//! settings table, and live queries that re-emit a full snapshot of their
//! result set after every committed change to the notes table.

use super::models::*;
use crate::config::LIVE_QUERY_CHANNEL_CAPACITY;
use crate::error::Result;
use futures::stream::{self, BoxStream, StreamExt};
use sqlx::SqlitePool;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

/// Which rows a live query selects
#[derive(Debug, Clone)]
enum NoteFilter {
    All,
    /// Titles containing this text, compared in lowercase
    TitleContains(String),
}

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
    changes: broadcast::Sender<()>,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        let (changes, _) = broadcast::channel(LIVE_QUERY_CHANNEL_CAPACITY);
        Self { pool, changes }
    }

    /// Underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a note without an id, or fully replace the row with the note's id.
    ///
    /// An id that does not exist yet is inserted under that id.
    /// Returns the id of the stored row.
    pub async fn upsert_note(&self, note: &NoteRecord) -> Result<i64> {
        let id = match note.id {
            None => {
                sqlx::query_scalar::<_, i64>(
                    r#"
                    INSERT INTO notes (title, content, timestamp, color)
                    VALUES (?, ?, ?, ?)
                    RETURNING id
                    "#,
                )
                .bind(&note.title)
                .bind(&note.content)
                .bind(note.timestamp)
                .bind(note.color)
                .fetch_one(&self.pool)
                .await?
            }
            Some(id) => {
                sqlx::query_scalar::<_, i64>(
                    r#"
                    INSERT INTO notes (id, title, content, timestamp, color)
                    VALUES (?, ?, ?, ?, ?)
                    ON CONFLICT(id) DO UPDATE SET
                        title = excluded.title,
                        content = excluded.content,
                        timestamp = excluded.timestamp,
                        color = excluded.color
                    RETURNING id
                    "#,
                )
                .bind(id)
                .bind(&note.title)
                .bind(&note.content)
                .bind(note.timestamp)
                .bind(note.color)
                .fetch_one(&self.pool)
                .await?
            }
        };

        tracing::debug!("Upserted note: {}", id);
        self.notify_changed();
        Ok(id)
    }

    /// Delete the row matching the note's id. Missing rows are not an error.
    pub async fn delete_note(&self, note: &NoteRecord) -> Result<()> {
        let Some(id) = note.id else {
            tracing::debug!("Ignoring delete of a note that was never stored");
            return Ok(());
        };

        let rows = sqlx::query("DELETE FROM notes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows > 0 {
            tracing::debug!("Deleted note: {}", id);
            self.notify_changed();
        }
        Ok(())
    }

    /// Get a note by ID
    pub async fn get_note(&self, id: i64) -> Result<Option<NoteRecord>> {
        let note = sqlx::query_as::<_, NoteRecord>("SELECT * FROM notes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(note)
    }

    /// Delete every note, returning how many were removed
    pub async fn delete_all_notes(&self) -> Result<u64> {
        let rows = sqlx::query("DELETE FROM notes")
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::debug!("Deleted all notes ({} rows)", rows);
        if rows > 0 {
            self.notify_changed();
        }
        Ok(rows)
    }

    pub async fn count_notes(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM notes")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Live sequence of all notes ordered by timestamp, newest first
    pub fn watch_notes(&self) -> BoxStream<'static, Result<Vec<NoteRecord>>> {
        self.watch(NoteFilter::All)
    }

    /// Live sequence of notes whose title contains `text`, ignoring case.
    ///
    /// Both sides are compared in Unicode lowercase. The text matches literally.
    pub fn watch_notes_by_title(&self, text: &str) -> BoxStream<'static, Result<Vec<NoteRecord>>> {
        self.watch(NoteFilter::TitleContains(text.to_lowercase()))
    }

    /// Get/set settings
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    pub async fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Set setting: {} = {}", key, value);
        Ok(())
    }

    async fn fetch_notes(&self, filter: &NoteFilter) -> Result<Vec<NoteRecord>> {
        let mut notes = sqlx::query_as::<_, NoteRecord>(
            "SELECT * FROM notes ORDER BY timestamp DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        if let NoteFilter::TitleContains(needle) = filter {
            notes.retain(|n| n.title.to_lowercase().contains(needle.as_str()));
        }

        Ok(notes)
    }

    fn watch(&self, filter: NoteFilter) -> BoxStream<'static, Result<Vec<NoteRecord>>> {
        // Subscribe before the first query so no change between the two is missed
        let changes = self.changes.subscribe();

        stream::unfold(
            (self.clone(), changes, filter, true),
            |(repo, mut changes, filter, first)| async move {
                if !first && !wait_for_change(&mut changes).await {
                    return None;
                }
                let snapshot = repo.fetch_notes(&filter).await;
                Some((snapshot, (repo, changes, filter, false)))
            },
        )
        .boxed()
    }

    fn notify_changed(&self) {
        // No receivers just means nobody is watching
        let _ = self.changes.send(());
    }
}

/// Wait for the next change signal, folding any queued signals into it.
///
/// Returns false once the channel is closed.
async fn wait_for_change(changes: &mut broadcast::Receiver<()>) -> bool {
    match changes.recv().await {
        Ok(()) => {}
        Err(RecvError::Lagged(skipped)) => {
            tracing::debug!("Live query skipped {} change signals", skipped);
        }
        Err(RecvError::Closed) => return false,
    }

    loop {
        match changes.try_recv() {
            Ok(()) | Err(TryRecvError::Lagged(_)) => continue,
            Err(TryRecvError::Empty) => return true,
            Err(TryRecvError::Closed) => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_repository;

    fn record(title: &str, content: &str, timestamp: i64) -> NoteRecord {
        NoteRecord {
            id: None,
            title: title.to_string(),
            content: content.to_string(),
            timestamp,
            color: 0,
        }
    }

    #[tokio::test]
    async fn test_upsert_assigns_id_and_get_note() {
        let repo = test_repository().await;

        let id = repo.upsert_note(&record("Groceries", "milk", 100)).await.unwrap();

        let fetched = repo.get_note(id).await.unwrap().unwrap();
        assert_eq!(fetched.id, Some(id));
        assert_eq!(fetched.title, "Groceries");
        assert_eq!(fetched.content, "milk");
        assert_eq!(fetched.timestamp, 100);
    }

    #[tokio::test]
    async fn test_upsert_with_id_replaces_whole_record() {
        let repo = test_repository().await;
        let id = repo.upsert_note(&record("Old", "old body", 1)).await.unwrap();

        let replacement = NoteRecord {
            id: Some(id),
            title: "New".to_string(),
            content: String::new(),
            timestamp: 2,
            color: 7,
        };
        let same_id = repo.upsert_note(&replacement).await.unwrap();

        assert_eq!(same_id, id);
        assert_eq!(repo.get_note(id).await.unwrap().unwrap(), replacement);
        assert_eq!(repo.count_notes().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_upsert_unknown_id_inserts() {
        let repo = test_repository().await;

        let note = NoteRecord {
            id: Some(42),
            ..record("Fresh", "", 5)
        };
        let id = repo.upsert_note(&note).await.unwrap();

        assert_eq!(id, 42);
        assert_eq!(repo.get_note(42).await.unwrap(), Some(note));
    }

    #[tokio::test]
    async fn test_get_missing_note_is_none() {
        let repo = test_repository().await;

        assert_eq!(repo.get_note(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_note_and_missing_delete_is_noop() {
        let repo = test_repository().await;
        let id = repo.upsert_note(&record("Bye", "", 1)).await.unwrap();
        let stored = repo.get_note(id).await.unwrap().unwrap();

        repo.delete_note(&stored).await.unwrap();
        assert_eq!(repo.get_note(id).await.unwrap(), None);

        // Deleting again, or deleting a never-stored note, is fine
        repo.delete_note(&stored).await.unwrap();
        repo.delete_note(&record("Transient", "", 1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_deleted_ids_are_not_reused() {
        let repo = test_repository().await;
        let first = repo.upsert_note(&record("A", "", 1)).await.unwrap();
        let stored = repo.get_note(first).await.unwrap().unwrap();
        repo.delete_note(&stored).await.unwrap();

        let second = repo.upsert_note(&record("B", "", 2)).await.unwrap();

        assert!(second > first);
    }

    #[tokio::test]
    async fn test_watch_notes_newest_first() {
        let repo = test_repository().await;
        repo.upsert_note(&record("middle", "", 20)).await.unwrap();
        repo.upsert_note(&record("oldest", "", 10)).await.unwrap();
        repo.upsert_note(&record("newest", "", 30)).await.unwrap();

        let titles: Vec<String> = repo
            .watch_notes()
            .next()
            .await
            .unwrap()
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();

        assert_eq!(titles, vec!["newest", "middle", "oldest"]);
    }

    #[tokio::test]
    async fn test_delete_all_and_count() {
        let repo = test_repository().await;
        for i in 0..3 {
            repo.upsert_note(&record(&format!("Note {}", i), "", i)).await.unwrap();
        }
        assert_eq!(repo.count_notes().await.unwrap(), 3);

        let removed = repo.delete_all_notes().await.unwrap();

        assert_eq!(removed, 3);
        assert_eq!(repo.count_notes().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_watch_notes_emits_after_each_change() {
        let repo = test_repository().await;
        let mut live = repo.watch_notes();

        let initial = live.next().await.unwrap().unwrap();
        assert!(initial.is_empty());

        let id = repo.upsert_note(&record("First", "", 1)).await.unwrap();
        let after_insert = live.next().await.unwrap().unwrap();
        assert_eq!(after_insert.len(), 1);

        let stored = repo.get_note(id).await.unwrap().unwrap();
        repo.delete_note(&stored).await.unwrap();
        let after_delete = live.next().await.unwrap().unwrap();
        assert!(after_delete.is_empty());
    }

    #[tokio::test]
    async fn test_watchers_are_independent() {
        let repo = test_repository().await;
        let mut first = repo.watch_notes();
        let mut second = repo.watch_notes();
        first.next().await.unwrap().unwrap();
        second.next().await.unwrap().unwrap();

        repo.upsert_note(&record("Shared", "", 1)).await.unwrap();

        assert_eq!(first.next().await.unwrap().unwrap().len(), 1);
        assert_eq!(second.next().await.unwrap().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_burst_of_changes_coalesces() {
        let repo = test_repository().await;
        let mut live = repo.watch_notes();
        live.next().await.unwrap().unwrap();

        for i in 0..5 {
            repo.upsert_note(&record("Burst", "", i)).await.unwrap();
        }

        let snapshot = live.next().await.unwrap().unwrap();
        assert_eq!(snapshot.len(), 5);
    }

    #[tokio::test]
    async fn test_watch_notes_by_title_is_case_insensitive() {
        let repo = test_repository().await;
        repo.upsert_note(&record("Foo bar", "", 1)).await.unwrap();
        repo.upsert_note(&record("baz", "foo in content only", 2)).await.unwrap();

        let mut live = repo.watch_notes_by_title("FOO");
        let matches = live.next().await.unwrap().unwrap();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "Foo bar");

        repo.upsert_note(&record("Ärger im Büro", "", 3)).await.unwrap();
        let mut umlaut = repo.watch_notes_by_title("ärger");
        let matches = umlaut.next().await.unwrap().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].title, "Ärger im Büro");
    }

    #[tokio::test]
    async fn test_settings() {
        let repo = test_repository().await;

        assert_eq!(repo.get_setting("dark_mode").await.unwrap(), None);

        repo.set_setting("dark_mode", "true").await.unwrap();
        assert_eq!(
            repo.get_setting("dark_mode").await.unwrap(),
            Some("true".to_string())
        );

        repo.set_setting("dark_mode", "false").await.unwrap();
        assert_eq!(
            repo.get_setting("dark_mode").await.unwrap(),
            Some("false".to_string())
        );
    }
}
