//! Palette domain model.
//!
//! # Responsibility
//! - Define the canonical palette/section/color structures.
//! - Keep wire naming identical to the import/export document shape.
//!
//! # Invariants
//! - Palette ids are unique within the store; section ids within a palette.
//! - `sections` and `colors` keep insertion order.

pub mod palette;
