//! Ephemeral per-card view state.
//!
//! # Responsibility
//! - Track which sections are expanded, which section title is open for
//!   editing and the draft value of each section's color input.
//! - Decide how many colors a card shows for a section.
//!
//! # Invariants
//! - Nothing here is persisted or read by `PaletteStore`; dropping the state
//!   never changes stored palettes.
//! - At most one section title is open for editing per card.
//! - A section without a draft reads as `#ffffff`; a cleared draft reads as
//!   empty.

use crate::model::palette::{ColorValue, Identifier, Section};
use std::collections::{HashMap, HashSet};

/// Colors shown for a collapsed section.
pub const COLLAPSED_COLOR_LIMIT: usize = 5;
/// Initial value of a section's color draft input.
pub const DEFAULT_DRAFT_COLOR: &str = "#ffffff";

/// UI flags for one palette card.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionViewState {
    expanded: HashSet<Identifier>,
    editing: Option<Identifier>,
    color_drafts: HashMap<Identifier, String>,
}

impl SectionViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the expanded flag of a section and returns the new value.
    pub fn toggle_expanded(&mut self, section_id: Identifier) -> bool {
        if self.expanded.remove(&section_id) {
            false
        } else {
            self.expanded.insert(section_id);
            true
        }
    }

    pub fn is_expanded(&self, section_id: Identifier) -> bool {
        self.expanded.contains(&section_id)
    }

    /// Colors to render: all when expanded, else the first five.
    pub fn visible_colors<'a>(&self, section: &'a Section) -> &'a [ColorValue] {
        if self.is_expanded(section.id) {
            &section.colors
        } else {
            let end = section.colors.len().min(COLLAPSED_COLOR_LIMIT);
            &section.colors[..end]
        }
    }

    /// Whether the section has colors hidden while collapsed.
    pub fn has_more_colors(section: &Section) -> bool {
        section.colors.len() > COLLAPSED_COLOR_LIMIT
    }

    /// Opens the title editor for a section, closing any other.
    pub fn start_editing(&mut self, section_id: Identifier) {
        self.editing = Some(section_id);
    }

    pub fn is_editing(&self, section_id: Identifier) -> bool {
        self.editing == Some(section_id)
    }

    /// Closes the title editor; used for both save and cancel.
    pub fn finish_editing(&mut self) {
        self.editing = None;
    }

    /// Current draft value of the color input for a section.
    pub fn draft_color(&self, section_id: Identifier) -> &str {
        self.color_drafts
            .get(&section_id)
            .map_or(DEFAULT_DRAFT_COLOR, String::as_str)
    }

    pub fn set_draft_color(&mut self, section_id: Identifier, value: impl Into<String>) {
        self.color_drafts.insert(section_id, value.into());
    }

    /// Empties the draft after its color was added.
    pub fn clear_draft_color(&mut self, section_id: Identifier) {
        self.color_drafts.insert(section_id, String::new());
    }

    /// Drops flags for sections that no longer exist.
    pub fn retain_sections(&mut self, live: &HashSet<Identifier>) {
        self.expanded.retain(|id| live.contains(id));
        self.color_drafts.retain(|id, _| live.contains(id));
        if self.editing.is_some_and(|id| !live.contains(&id)) {
            self.editing = None;
        }
    }
}
