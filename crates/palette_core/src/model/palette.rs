//! Palette, section and color value types.
//!
//! # Responsibility
//! - Define the records persisted to storage and exchanged on import/export.
//! - Own the color normalization rule and id lookups used by editors.
//!
//! # Invariants
//! - Struct field names match the external JSON shape exactly.
//! - Missing `title`, `sections` and `colors` default to empty values; a
//!   missing `id` defaults to `0` and is left for merge de-duplication.
//! - Color strings are not validated beyond the leading `#` rule.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifier for palettes and sections.
///
/// Kept as a type alias so signatures read by intent while the wire format
/// stays a plain JSON number.
pub type Identifier = i64;

/// Hex color string as stored, e.g. `#45C4B0`.
pub type ColorValue = String;

/// Title used for freshly added sections and for blank section renames.
pub const DEFAULT_SECTION_TITLE: &str = "Nueva Sección";

/// Named collection of color sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default)]
    pub id: Identifier,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// Titled, ordered list of colors inside one palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub id: Identifier,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub colors: Vec<ColorValue>,
}

impl Palette {
    /// Creates an empty palette with the given id and title.
    pub fn new(id: Identifier, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            sections: Vec::new(),
        }
    }

    /// Returns the section with `section_id`, if present.
    pub fn section(&self, section_id: Identifier) -> Option<&Section> {
        self.sections
            .iter()
            .find(|section| section.id == section_id)
    }

    /// Returns every section id of this palette.
    pub fn section_ids(&self) -> HashSet<Identifier> {
        self.sections.iter().map(|section| section.id).collect()
    }

    /// Total number of colors across all sections.
    pub fn color_count(&self) -> usize {
        self.sections.iter().map(|section| section.colors.len()).sum()
    }
}

impl Section {
    /// Creates a section with the given id, title and colors.
    pub fn new(id: Identifier, title: impl Into<String>, colors: Vec<ColorValue>) -> Self {
        Self {
            id,
            title: title.into(),
            colors,
        }
    }
}

/// Applies the color normalization rule.
///
/// Returns `None` for empty input. Otherwise prepends `#` when missing; no
/// hex-digit or length validation is performed.
pub fn normalize_color(value: &str) -> Option<ColorValue> {
    if value.is_empty() {
        return None;
    }
    if value.starts_with('#') {
        Some(value.to_string())
    } else {
        Some(format!("#{value}"))
    }
}

/// Collects every palette id in `palettes`.
pub fn palette_ids(palettes: &[Palette]) -> HashSet<Identifier> {
    palettes.iter().map(|palette| palette.id).collect()
}
