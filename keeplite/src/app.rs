//! Application state and initialization
//!
//! The composition root: opens the database once and wires every service
//! by hand. Controllers are built on demand, one per screen.

use crate::config::{DATABASE_FILE_NAME, DEFAULT_LOG_FILTER};
use crate::controllers::{NoteEditorController, NoteListController, SettingsController, UiEvent};
use crate::database::{create_pool, Repository};
use crate::error::Result;
use crate::services::{NoteUseCases, NotesService, SettingsService};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub app_data_dir: PathBuf,
    pub repo: Repository,
    pub notes: NoteUseCases,
    pub settings: SettingsService,
}

impl AppState {
    /// Open (or create) the note database under `app_data_dir` and wire services
    pub async fn initialize(app_data_dir: impl AsRef<Path>) -> Result<Self> {
        let app_data_dir = app_data_dir.as_ref().to_path_buf();
        tracing::info!("App data directory: {:?}", app_data_dir);

        std::fs::create_dir_all(&app_data_dir)?;

        let pool = create_pool(&app_data_dir.join(DATABASE_FILE_NAME)).await?;
        let repo = Repository::new(pool);

        let state = Self::with_repository(app_data_dir, repo);
        tracing::info!("Application initialized successfully");
        Ok(state)
    }

    /// Wire services over an already opened repository
    pub fn with_repository(app_data_dir: PathBuf, repo: Repository) -> Self {
        let notes = NoteUseCases::new(NotesService::new(repo.clone()));
        let settings = SettingsService::new(repo.clone());

        Self {
            app_data_dir,
            repo,
            notes,
            settings,
        }
    }

    pub async fn note_list(&self) -> (NoteListController, mpsc::UnboundedReceiver<UiEvent>) {
        NoteListController::open(self.notes.clone()).await
    }

    /// Editor for a new note, or for the stored note `note_id`
    pub async fn note_editor(
        &self,
        note_id: Option<i64>,
    ) -> (NoteEditorController, mpsc::UnboundedReceiver<UiEvent>) {
        NoteEditorController::open(self.notes.clone(), note_id).await
    }

    pub async fn settings_screen(&self) -> SettingsController {
        SettingsController::open(self.settings.clone()).await
    }

    /// Close the connection pool, waiting for in-flight queries
    pub async fn shutdown(&self) {
        tracing::info!("Closing database");
        self.repo.pool().close().await;
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. Returns false if a subscriber
/// was already installed.
pub fn init_logging() -> bool {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
