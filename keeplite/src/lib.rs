//! Keeplite library
//!
//! Core of a single-user note keeping application: an SQLite note store
//! with live queries, display preferences, and the controllers a UI shell
//! drives.

pub mod app;
pub mod config;
pub mod controllers;
pub mod database;
pub mod domain;
pub mod error;
pub mod palette;
pub mod services;

pub use app::AppState;
pub use domain::{Note, NoteQuery, Settings};
pub use error::{AppError, Result};
