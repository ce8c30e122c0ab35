//! Runtime configuration for the CLI.
//!
//! # Responsibility
//! - Resolve database path, storage key and logging settings from flags and
//!   environment variables.
//!
//! # Invariants
//! - Blank values fall back to defaults instead of producing empty paths.

use clap::Args;
use palette_core::{default_log_level, DEFAULT_STORAGE_KEY};
use std::path::PathBuf;

const DB_FILE_NAME: &str = "palettes.sqlite3";

/// Global options shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// SQLite database file holding the palette store
    #[arg(long = "db", global = true, env = "PALETTES_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// Storage key the palette list is saved under
    #[arg(long = "key", global = true, env = "PALETTES_STORAGE_KEY")]
    pub storage_key: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "PALETTES_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true, env = "PALETTES_LOG_LEVEL")]
    pub log_level: Option<String>,
}

impl AppConfig {
    /// Database path, defaulting to the temp directory.
    pub fn resolved_db_path(&self) -> PathBuf {
        self.db_path
            .as_ref()
            .filter(|path| !path.as_os_str().is_empty())
            .cloned()
            .unwrap_or_else(|| std::env::temp_dir().join(DB_FILE_NAME))
    }

    pub fn resolved_storage_key(&self) -> String {
        non_blank(self.storage_key.as_deref())
            .unwrap_or(DEFAULT_STORAGE_KEY)
            .to_string()
    }

    pub fn resolved_log_level(&self) -> &str {
        non_blank(self.log_level.as_deref()).unwrap_or(default_log_level())
    }

    /// Log directory, or `None` when logging should stay off.
    pub fn resolved_log_dir(&self) -> Option<&str> {
        non_blank(self.log_dir.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
