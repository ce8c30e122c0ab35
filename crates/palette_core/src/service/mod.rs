//! Stateless palette transforms.
//!
//! # Responsibility
//! - Editor transforms for single palettes.
//! - Merge policy for imported documents.
//!
//! # Invariants
//! - Functions here never touch storage; the store persists their output.

pub mod editor;
pub mod merge;
