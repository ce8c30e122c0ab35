//! Core domain logic for the palette editor.
//! This crate owns the palette list, its persistence and the import merge
//! rules; presentation layers only call into it.

pub mod clipboard;
pub mod codec;
pub mod db;
pub mod ids;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod storage;
pub mod view;

pub use clipboard::{
    Clipboard, ClipboardError, ClipboardResult, MemoryClipboard, SystemClipboard,
};
pub use codec::{
    deserialize, export_file_name, parse_document, serialize, serialize_palette, CodecError,
    PaletteDocument, EXPORT_ALL_FILE_NAME,
};
pub use ids::{Clock, IdAllocator, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::palette::{
    normalize_color, ColorValue, Identifier, Palette, Section, DEFAULT_SECTION_TITLE,
};
pub use repo::palette_store::{
    default_palettes, ImportError, ImportSummary, LoadOutcome, PaletteStore, DEFAULT_STORAGE_KEY,
    HIGH_WATER_KEY_SUFFIX,
};
pub use service::merge::{merge, MergeError, MergeMode, MergeOutcome};
pub use storage::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
};
pub use view::SectionViewState;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
