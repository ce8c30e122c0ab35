//! Import merge engine.
//!
//! # Responsibility
//! - Combine the current palette list with an imported document under the
//!   append or replace policy.
//! - Re-key colliding palette and section ids on append.
//!
//! # Invariants
//! - Replace accepts only a palette sequence and returns it unmodified.
//! - Append keeps current entries first, in order, with their ids.
//! - After append, palette ids are pairwise distinct and section ids are
//!   pairwise distinct within each palette.

use crate::codec::PaletteDocument;
use crate::ids::IdAllocator;
use crate::model::palette::{palette_ids, Identifier, Palette};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Import policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Merge the document into the current list.
    Append,
    /// Discard the current list and take the document as-is.
    Replace,
}

impl MergeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Append => "append",
            Self::Replace => "replace",
        }
    }
}

impl FromStr for MergeMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "append" => Ok(Self::Append),
            "replace" => Ok(Self::Replace),
            other => Err(format!(
                "unsupported merge mode `{other}`; expected append|replace"
            )),
        }
    }
}

/// Merge usage error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeError {
    /// Replace mode was given a single palette object.
    ReplaceRequiresSequence,
}

impl Display for MergeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReplaceRequiresSequence => {
                write!(f, "replace import requires a JSON array of palettes")
            }
        }
    }
}

impl Error for MergeError {}

/// Result of a successful merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// New canonical palette list.
    pub palettes: Vec<Palette>,
    /// Number of palettes taken from the document.
    pub imported: usize,
    /// Palette ids replaced during de-duplication.
    pub reassigned_palette_ids: usize,
    /// Section ids replaced during de-duplication.
    pub reassigned_section_ids: usize,
}

/// Merges `incoming` into `current` under `mode`.
///
/// # Errors
/// - `MergeError::ReplaceRequiresSequence` when `mode` is `Replace` and the
///   document is a single palette.
pub fn merge(
    current: &[Palette],
    incoming: PaletteDocument,
    mode: MergeMode,
    allocator: &mut IdAllocator,
) -> Result<MergeOutcome, MergeError> {
    match (mode, incoming) {
        (MergeMode::Replace, PaletteDocument::Single(_)) => {
            Err(MergeError::ReplaceRequiresSequence)
        }
        (MergeMode::Replace, PaletteDocument::Sequence(palettes)) => Ok(MergeOutcome {
            imported: palettes.len(),
            palettes,
            reassigned_palette_ids: 0,
            reassigned_section_ids: 0,
        }),
        (MergeMode::Append, document) => {
            let incoming = document.into_palettes();
            let imported = incoming.len();
            let mut combined = Vec::with_capacity(current.len() + imported);
            combined.extend_from_slice(current);
            combined.extend(incoming);

            let (reassigned_palette_ids, reassigned_section_ids) =
                dedupe_ids(&mut combined, current.len(), allocator);

            Ok(MergeOutcome {
                palettes: combined,
                imported,
                reassigned_palette_ids,
                reassigned_section_ids,
            })
        }
    }
}

/// Re-keys colliding ids in place; entries before `current_len` are the
/// existing list. Returns `(palette_ids_changed, section_ids_changed)`.
fn dedupe_ids(
    palettes: &mut [Palette],
    current_len: usize,
    allocator: &mut IdAllocator,
) -> (usize, usize) {
    let original_ids = palette_ids(&palettes[..current_len]);
    // Fresh ids must also avoid ids later entries still hold.
    let mut reserved = palette_ids(palettes);
    let mut assigned = HashSet::<Identifier>::with_capacity(palettes.len());
    let mut palette_changes = 0;
    let mut section_changes = 0;

    for (index, palette) in palettes.iter_mut().enumerate() {
        let is_incoming = index >= current_len;
        let collides = assigned.contains(&palette.id)
            || (is_incoming && original_ids.contains(&palette.id));
        if collides {
            let fresh = allocator.allocate(&reserved);
            palette.id = fresh;
            palette_changes += 1;
        }
        reserved.insert(palette.id);
        assigned.insert(palette.id);

        section_changes += dedupe_section_ids(palette, allocator);
    }

    (palette_changes, section_changes)
}

fn dedupe_section_ids(palette: &mut Palette, allocator: &mut IdAllocator) -> usize {
    let mut reserved = palette.section_ids();
    let mut seen = HashSet::<Identifier>::with_capacity(palette.sections.len());
    let mut changes = 0;

    for section in &mut palette.sections {
        if !seen.insert(section.id) {
            let fresh = allocator.allocate(&reserved);
            reserved.insert(fresh);
            seen.insert(fresh);
            section.id = fresh;
            changes += 1;
        }
    }

    changes
}
