//! Settings controller
//!
//! Mirrors the stored display preferences. Every update writes one
//! preference and then re-reads all of them.

use crate::domain::{GridLayout, NoteStyle, Settings};
use crate::error::Result;
use crate::palette::{self, Color};
use crate::services::SettingsService;
use tokio::sync::watch;

pub struct SettingsController {
    settings: SettingsService,
    state: watch::Sender<Settings>,
}

impl SettingsController {
    /// Create the controller and load stored preferences.
    ///
    /// If loading fails the defaults stay in place.
    pub async fn open(settings: SettingsService) -> Self {
        let (state, _) = watch::channel(Settings::default());
        let controller = Self { settings, state };

        if let Err(e) = controller.load().await {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
        }
        controller
    }

    pub fn state(&self) -> watch::Receiver<Settings> {
        self.state.subscribe()
    }

    pub fn current(&self) -> Settings {
        *self.state.borrow()
    }

    pub async fn load(&self) -> Result<()> {
        let loaded = self.settings.load().await?;
        self.state.send_replace(loaded);
        Ok(())
    }

    pub async fn update_note_style(&self, style: NoteStyle) -> Result<()> {
        self.settings.set_note_style(style).await?;
        self.load().await
    }

    pub async fn update_grid_layout(&self, layout: GridLayout) -> Result<()> {
        self.settings.set_grid_layout(layout).await?;
        self.load().await
    }

    pub async fn update_enable_animations(&self, enabled: bool) -> Result<()> {
        self.settings.set_enable_animations(enabled).await?;
        self.load().await
    }

    pub async fn update_dark_mode(&self, enabled: bool) -> Result<()> {
        self.settings.set_dark_mode(enabled).await?;
        self.load().await
    }

    /// Color of a palette index under the current dark-mode preference
    pub fn note_color(&self, index: i32) -> Color {
        palette::note_color(index, self.current().dark_mode)
    }
}
