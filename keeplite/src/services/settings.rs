//! Settings service
//!
//! Typed access to the four display preferences. Each preference is its
//! own row in the settings table, stored as a JSON scalar, so reading or
//! writing one never touches the others.

use crate::config::{
    SETTING_DARK_MODE, SETTING_ENABLE_ANIMATIONS, SETTING_GRID_LAYOUT, SETTING_NOTE_STYLE,
};
use crate::database::Repository;
use crate::domain::{GridLayout, NoteStyle, Settings};
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Service for managing display preferences
#[derive(Clone)]
pub struct SettingsService {
    repo: Repository,
}

impl SettingsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Read all preferences, filling unset ones with their defaults
    pub async fn load(&self) -> Result<Settings> {
        Ok(Settings {
            note_style: self.get_note_style().await?,
            grid_layout: self.get_grid_layout().await?,
            enable_animations: self.get_enable_animations().await?,
            dark_mode: self.get_dark_mode().await?,
        })
    }

    pub async fn get_note_style(&self) -> Result<NoteStyle> {
        let ordinal: Option<i64> = self.get_value(SETTING_NOTE_STYLE).await?;
        Ok(ordinal
            .and_then(NoteStyle::from_ordinal)
            .unwrap_or_default())
    }

    pub async fn set_note_style(&self, style: NoteStyle) -> Result<()> {
        self.set_value(SETTING_NOTE_STYLE, &style.ordinal()).await
    }

    pub async fn get_grid_layout(&self) -> Result<GridLayout> {
        let ordinal: Option<i64> = self.get_value(SETTING_GRID_LAYOUT).await?;
        Ok(ordinal
            .and_then(GridLayout::from_ordinal)
            .unwrap_or_default())
    }

    pub async fn set_grid_layout(&self, layout: GridLayout) -> Result<()> {
        self.set_value(SETTING_GRID_LAYOUT, &layout.ordinal()).await
    }

    pub async fn get_enable_animations(&self) -> Result<bool> {
        let enabled: Option<bool> = self.get_value(SETTING_ENABLE_ANIMATIONS).await?;
        Ok(enabled.unwrap_or(Settings::default().enable_animations))
    }

    pub async fn set_enable_animations(&self, enabled: bool) -> Result<()> {
        self.set_value(SETTING_ENABLE_ANIMATIONS, &enabled).await
    }

    pub async fn get_dark_mode(&self) -> Result<bool> {
        let enabled: Option<bool> = self.get_value(SETTING_DARK_MODE).await?;
        Ok(enabled.unwrap_or(Settings::default().dark_mode))
    }

    pub async fn set_dark_mode(&self, enabled: bool) -> Result<()> {
        self.set_value(SETTING_DARK_MODE, &enabled).await
    }

    /// Unset and unreadable values both read as `None`
    async fn get_value<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.repo.get_setting(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable setting {} = {:?}: {}", key, raw, e);
                Ok(None)
            }
        }
    }

    async fn set_value<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.repo.set_setting(key, &raw).await?;
        tracing::info!("Setting updated: {}", key);
        Ok(())
    }
}
