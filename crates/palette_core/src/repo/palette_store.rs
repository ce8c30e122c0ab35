//! Palette store: canonical in-memory list with write-through persistence.
//!
//! # Responsibility
//! - Load the palette list from the key-value backend, seeding or
//!   recovering with built-in defaults when needed.
//! - Expose add/update/delete/clear/import mutations, each saving the whole
//!   list.
//!
//! # Invariants
//! - Memory is replaced only after the backend write succeeds.
//! - A stored `[]` is restored as an empty list; only an absent or empty
//!   value seeds defaults.
//! - Failed imports leave both memory and storage unchanged.
//! - The allocator's high-water mark is persisted under `<key>.id_high_water`
//!   before the list that uses the new ids, so ids freed by a delete are not
//!   issued again after a restart.

use crate::codec::{self, CodecError, PaletteDocument};
use crate::ids::IdAllocator;
use crate::model::palette::{palette_ids, Identifier, Palette, Section};
use crate::service::merge::{merge, MergeError, MergeMode};
use crate::storage::{KeyValueStore, StorageError, StorageResult};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default storage key for the serialized palette list.
pub const DEFAULT_STORAGE_KEY: &str = "palettes";
/// Suffix of the key holding the largest identifier issued so far.
pub const HIGH_WATER_KEY_SUFFIX: &str = ".id_high_water";

/// How the store obtained its initial list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Stored list parsed successfully.
    Restored { count: usize },
    /// Nothing was stored; defaults were written.
    SeededDefaults,
    /// Stored value was unreadable; defaults replaced it.
    RecoveredFromCorruption { reason: String },
}

/// Import failure. Store state is unchanged for every variant.
#[derive(Debug)]
pub enum ImportError {
    /// Import text is not well-formed JSON.
    Parse(CodecError),
    /// Document shape does not fit the requested mode.
    Shape(String),
    /// Merged list could not be persisted.
    Storage(StorageError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Shape(message) => write!(f, "invalid import document: {message}"),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Shape(_) => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<CodecError> for ImportError {
    fn from(value: CodecError) -> Self {
        match value {
            CodecError::Shape(message) => Self::Shape(message),
            other => Self::Parse(other),
        }
    }
}

impl From<MergeError> for ImportError {
    fn from(value: MergeError) -> Self {
        Self::Shape(value.to_string())
    }
}

impl From<StorageError> for ImportError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Summary of an applied import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub mode: MergeMode,
    /// Palettes taken from the document.
    pub imported: usize,
    /// Palettes in the store after the import.
    pub total: usize,
    pub reassigned_palette_ids: usize,
    pub reassigned_section_ids: usize,
}

/// Owned palette list synchronized with a key-value backend.
pub struct PaletteStore<S: KeyValueStore> {
    backend: S,
    key: String,
    palettes: Vec<Palette>,
    allocator: IdAllocator,
    persisted_high_water: Option<Identifier>,
}

impl<S: KeyValueStore> PaletteStore<S> {
    /// Loads the list stored under `key`.
    ///
    /// # Errors
    /// - Returns backend read/write errors. Unparsable stored data is not an
    ///   error; it is reported as `LoadOutcome::RecoveredFromCorruption`.
    pub fn load(
        backend: S,
        key: impl Into<String>,
        allocator: IdAllocator,
    ) -> StorageResult<(Self, LoadOutcome)> {
        let mut store = Self {
            backend,
            key: key.into(),
            palettes: Vec::new(),
            allocator,
            persisted_high_water: None,
        };
        store.restore_high_water()?;

        let raw = store.backend.get(&store.key)?;
        let outcome = match raw.as_deref() {
            None | Some("") => {
                let defaults = default_palettes(&mut store.allocator);
                store.save(defaults)?;
                LoadOutcome::SeededDefaults
            }
            Some(text) => match codec::deserialize(text) {
                Ok(palettes) => {
                    let count = palettes.len();
                    store.palettes = palettes;
                    LoadOutcome::Restored { count }
                }
                Err(err) => {
                    warn!(
                        "event=store_load module=store status=recovered error_code=storage_parse_error error={}",
                        err
                    );
                    let defaults = default_palettes(&mut store.allocator);
                    store.save(defaults)?;
                    LoadOutcome::RecoveredFromCorruption {
                        reason: err.to_string(),
                    }
                }
            },
        };

        info!(
            "event=store_load module=store status=ok outcome={} count={}",
            outcome_label(&outcome),
            store.palettes.len()
        );
        Ok((store, outcome))
    }

    /// Current canonical list.
    pub fn palettes(&self) -> &[Palette] {
        &self.palettes
    }

    pub fn len(&self) -> usize {
        self.palettes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.palettes.is_empty()
    }

    /// Returns the palette with `id`, if present.
    pub fn get(&self, id: Identifier) -> Option<&Palette> {
        self.palettes.iter().find(|palette| palette.id == id)
    }

    /// Appends an empty palette titled `Paleta {n+1}` and returns its id.
    pub fn add_palette(&mut self) -> StorageResult<Identifier> {
        let id = self.allocator.allocate(&palette_ids(&self.palettes));
        let title = format!("Paleta {}", self.palettes.len() + 1);
        let mut next = self.palettes.clone();
        next.push(Palette::new(id, title));
        self.save(next)?;
        info!("event=palette_add module=store status=ok palette_id={id}");
        Ok(id)
    }

    /// Replaces the entry whose id matches `palette.id`.
    ///
    /// Returns `false` when no entry matched; the list is unchanged.
    pub fn update_palette(&mut self, palette: Palette) -> StorageResult<bool> {
        let id = palette.id;
        let mut found = false;
        let next = self
            .palettes
            .iter()
            .map(|existing| {
                if existing.id == id {
                    found = true;
                    palette.clone()
                } else {
                    existing.clone()
                }
            })
            .collect();
        self.save(next)?;
        info!("event=palette_update module=store status=ok palette_id={id} found={found}");
        Ok(found)
    }

    /// Applies an editor transform to one palette and stores the result.
    ///
    /// Returns `false` when `id` is unknown.
    pub fn edit_palette(
        &mut self,
        id: Identifier,
        transform: impl FnOnce(&Palette, &mut IdAllocator) -> Palette,
    ) -> StorageResult<bool> {
        let Some(current) = self.get(id).cloned() else {
            return Ok(false);
        };
        let mut edited = transform(&current, &mut self.allocator);
        edited.id = id;
        self.update_palette(edited)
    }

    /// Removes the entry with `id`. Returns `false` when none matched.
    pub fn delete_palette(&mut self, id: Identifier) -> StorageResult<bool> {
        let next = self
            .palettes
            .iter()
            .filter(|palette| palette.id != id)
            .cloned()
            .collect::<Vec<_>>();
        let removed = next.len() != self.palettes.len();
        self.save(next)?;
        info!("event=palette_delete module=store status=ok palette_id={id} removed={removed}");
        Ok(removed)
    }

    /// Removes every palette; the empty list is persisted.
    pub fn clear(&mut self) -> StorageResult<()> {
        let removed = self.palettes.len();
        self.save(Vec::new())?;
        info!("event=palette_clear module=store status=ok removed={removed}");
        Ok(())
    }

    /// Parses import text and merges it under `mode`.
    pub fn import_text(
        &mut self,
        text: &str,
        mode: MergeMode,
    ) -> Result<ImportSummary, ImportError> {
        let document = codec::parse_document(text).map_err(|err| {
            warn!(
                "event=palette_import module=store status=error mode={} error={}",
                mode.as_str(),
                err
            );
            ImportError::from(err)
        })?;
        self.import_document(document, mode)
    }

    /// Merges an already parsed document under `mode`.
    pub fn import_document(
        &mut self,
        document: PaletteDocument,
        mode: MergeMode,
    ) -> Result<ImportSummary, ImportError> {
        let kind = document.kind();
        let outcome = match merge(&self.palettes, document, mode, &mut self.allocator) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    "event=palette_import module=store status=error mode={} document={} error={}",
                    mode.as_str(),
                    kind,
                    err
                );
                return Err(err.into());
            }
        };

        let summary = ImportSummary {
            mode,
            imported: outcome.imported,
            total: outcome.palettes.len(),
            reassigned_palette_ids: outcome.reassigned_palette_ids,
            reassigned_section_ids: outcome.reassigned_section_ids,
        };
        self.save(outcome.palettes)?;
        info!(
            "event=palette_import module=store status=ok mode={} document={} imported={} total={} reassigned_palettes={} reassigned_sections={}",
            mode.as_str(),
            kind,
            summary.imported,
            summary.total,
            summary.reassigned_palette_ids,
            summary.reassigned_section_ids
        );
        Ok(summary)
    }

    /// Serializes the full list for export.
    pub fn export_all(&self) -> Result<String, CodecError> {
        codec::serialize(&self.palettes)
    }

    /// Serializes one palette as an object; `None` when `id` is unknown.
    pub fn export_palette(&self, id: Identifier) -> Result<Option<String>, CodecError> {
        self.get(id).map(codec::serialize_palette).transpose()
    }

    /// Writes `palettes` to the backend, then makes them canonical.
    pub fn save(&mut self, palettes: Vec<Palette>) -> StorageResult<()> {
        let text =
            codec::serialize(&palettes).map_err(|err| StorageError::Encode(err.to_string()))?;
        self.persist_high_water()?;
        self.backend.set(&self.key, &text)?;
        self.palettes = palettes;
        Ok(())
    }

    fn high_water_key(&self) -> String {
        format!("{}{HIGH_WATER_KEY_SUFFIX}", self.key)
    }

    fn restore_high_water(&mut self) -> StorageResult<()> {
        let Some(raw) = self.backend.get(&self.high_water_key())? else {
            return Ok(());
        };
        match raw.trim().parse::<Identifier>() {
            Ok(mark) => {
                self.allocator.advance_past(mark);
                self.persisted_high_water = Some(mark);
            }
            Err(err) => warn!(
                "event=store_load module=store status=degraded error_code=high_water_parse_error error={}",
                err
            ),
        }
        Ok(())
    }

    fn persist_high_water(&mut self) -> StorageResult<()> {
        let Some(mark) = self.allocator.high_water_mark() else {
            return Ok(());
        };
        if self.persisted_high_water.is_some_and(|saved| saved >= mark) {
            return Ok(());
        }
        self.backend.set(&self.high_water_key(), &mark.to_string())?;
        self.persisted_high_water = Some(mark);
        Ok(())
    }
}

/// Built-in example palettes used when storage is empty or unreadable.
pub fn default_palettes(allocator: &mut IdAllocator) -> Vec<Palette> {
    let ids = allocator.allocate_many(&Default::default(), 2);
    vec![
        Palette {
            id: ids[0],
            title: "Paleta 1 - Naturaleza".to_string(),
            sections: vec![
                Section::new(
                    1,
                    "Fondos",
                    colors(&["#45C4B0", "#9AEBA3", "#13678A", "#DAFDBA", "#012030"]),
                ),
                Section::new(2, "Header", colors(&["#012030", "#13678A"])),
            ],
        },
        Palette {
            id: ids[1],
            title: "Paleta 2 - Atardecer".to_string(),
            sections: vec![Section::new(
                11,
                "Primarios",
                colors(&["#FFB347", "#FFCC33", "#FF7E5F", "#FEB47B"]),
            )],
        },
    ]
}

fn colors(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

fn outcome_label(outcome: &LoadOutcome) -> &'static str {
    match outcome {
        LoadOutcome::Restored { .. } => "restored",
        LoadOutcome::SeededDefaults => "seeded_defaults",
        LoadOutcome::RecoveredFromCorruption { .. } => "recovered",
    }
}

#[cfg(test)]
mod tests {
    use super::{default_palettes, ImportError};
    use crate::codec::CodecError;
    use crate::ids::IdAllocator;
    use crate::model::palette::palette_ids;

    #[test]
    fn default_palettes_have_distinct_ids() {
        let mut allocator = IdAllocator::with_seed(11);
        let defaults = default_palettes(&mut allocator);
        assert_eq!(defaults.len(), 2);
        assert_eq!(palette_ids(&defaults).len(), 2);
        assert_eq!(defaults[0].sections[0].colors.len(), 5);
    }

    #[test]
    fn codec_shape_errors_map_to_import_shape() {
        let err = ImportError::from(CodecError::Shape("bad".to_string()));
        assert!(matches!(err, ImportError::Shape(_)));
    }
}
