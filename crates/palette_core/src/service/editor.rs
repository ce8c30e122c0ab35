//! Palette, section and color edit transforms.
//!
//! # Responsibility
//! - Turn one edit intent into a new palette value.
//! - Apply section-title and color normalization rules.
//!
//! # Invariants
//! - Inputs are never mutated; every transform returns a fresh `Palette`.
//! - Unknown section ids and out-of-range color indexes are no-ops.
//! - New section ids are unique within their palette.

use crate::ids::IdAllocator;
use crate::model::palette::{normalize_color, Identifier, Palette, Section, DEFAULT_SECTION_TITLE};

/// Replaces the palette title verbatim.
pub fn rename_palette(palette: &Palette, title: &str) -> Palette {
    Palette {
        title: title.to_string(),
        ..palette.clone()
    }
}

/// Appends an empty section titled with the default placeholder.
pub fn add_section(palette: &Palette, allocator: &mut IdAllocator) -> Palette {
    add_section_with_id(palette, allocator).0
}

/// Same as [`add_section`], also returning the new section id so callers
/// can open it for title editing.
pub fn add_section_with_id(
    palette: &Palette,
    allocator: &mut IdAllocator,
) -> (Palette, Identifier) {
    let section_id = allocator.allocate(&palette.section_ids());
    let mut next = palette.clone();
    next.sections
        .push(Section::new(section_id, DEFAULT_SECTION_TITLE, Vec::new()));
    (next, section_id)
}

/// Commits a section title edit.
///
/// Blank or whitespace-only titles revert to the default placeholder.
pub fn rename_section(palette: &Palette, section_id: Identifier, title: &str) -> Palette {
    let title = if title.trim().is_empty() {
        DEFAULT_SECTION_TITLE
    } else {
        title
    };
    map_section(palette, section_id, |section| Section {
        title: title.to_string(),
        ..section.clone()
    })
}

/// Removes the section with `section_id`.
pub fn delete_section(palette: &Palette, section_id: Identifier) -> Palette {
    Palette {
        sections: palette
            .sections
            .iter()
            .filter(|section| section.id != section_id)
            .cloned()
            .collect(),
        ..palette.clone()
    }
}

/// Appends a normalized color to a section; empty input is a no-op.
pub fn add_color(palette: &Palette, section_id: Identifier, color: &str) -> Palette {
    let Some(color) = normalize_color(color) else {
        return palette.clone();
    };
    map_section(palette, section_id, |section| {
        let mut colors = section.colors.clone();
        colors.push(color.clone());
        Section {
            colors,
            ..section.clone()
        }
    })
}

/// Removes the color at `color_index` from a section.
pub fn remove_color(palette: &Palette, section_id: Identifier, color_index: usize) -> Palette {
    map_section(palette, section_id, |section| Section {
        colors: section
            .colors
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != color_index)
            .map(|(_, color)| color.clone())
            .collect(),
        ..section.clone()
    })
}

fn map_section(
    palette: &Palette,
    section_id: Identifier,
    mut f: impl FnMut(&Section) -> Section,
) -> Palette {
    Palette {
        sections: palette
            .sections
            .iter()
            .map(|section| {
                if section.id == section_id {
                    f(section)
                } else {
                    section.clone()
                }
            })
            .collect(),
        ..palette.clone()
    }
}
