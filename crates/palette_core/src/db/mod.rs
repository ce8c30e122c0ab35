//! SQLite file behind the palette key-value store.
//!
//! The database holds one table, `kv_entries`, mapping a string key to a
//! string value. The palette list is one row (the JSON array under the
//! storage key) and the id high-water mark is another.
//!
//! # Responsibility
//! - Hand out connections whose `kv_entries` table is ready for upserts.
//! - Create the directory of a database file on first use.
//!
//! # Invariants
//! - `PRAGMA user_version` equals the last applied schema step; a file from a
//!   newer build is refused instead of being rewritten.
//! - Each write is a single-row upsert, so a crash never leaves a half
//!   written palette list.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open or migrate the palette database.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Parent directory of the database file could not be created.
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::CreateDir { path, source } => write!(
                f,
                "cannot create directory `{}` for the palette database: {source}",
                path.display()
            ),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "palette database uses schema v{db_version}; this build reads up to v{latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::CreateDir { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
