//! Application configuration constants
//!
//! Central location for storage, logging and presentation constants
//! used throughout the application.

// ===== Storage =====

/// File name of the notes database inside the app data directory
pub const DATABASE_FILE_NAME: &str = "keeplite.db";

/// Connections in the application pool.
/// A single user drives one screen at a time, so a handful is plenty.
pub const POOL_MAX_CONNECTIONS: u32 = 5;

/// How long SQLite waits on a locked database before failing, in seconds
pub const BUSY_TIMEOUT_SECS: u64 = 5;

/// Buffered change signals per live-query subscriber.
/// Overflow only coalesces signals; every subscriber re-queries the full table.
pub const LIVE_QUERY_CHANNEL_CAPACITY: usize = 16;

// ===== Logging =====

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "keeplite=debug,info";

// ===== Notes =====

/// Palette index given to notes that never picked a color
pub const DEFAULT_NOTE_COLOR: i32 = 0;

/// Number of entries in each of the light and dark palettes
pub const PALETTE_SIZE: usize = 12;

// ===== Setting keys =====

pub const SETTING_NOTE_STYLE: &str = "note_style";
pub const SETTING_GRID_LAYOUT: &str = "grid_layout";
pub const SETTING_ENABLE_ANIMATIONS: &str = "enable_animations";
pub const SETTING_DARK_MODE: &str = "dark_mode";
