//! Stateful repositories over the key-value backend.
//!
//! # Responsibility
//! - Own canonical in-memory state and write it through on every mutation.
//!
//! # Invariants
//! - Callers never write the backend directly; all writes go through
//!   `PaletteStore::save`.

pub mod palette_store;
