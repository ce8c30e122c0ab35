//! Identifier allocation for palettes and sections.
//!
//! # Responsibility
//! - Issue fresh identifiers for newly created entities.
//! - Resolve identifier collisions during import merges.
//!
//! # Invariants
//! - A returned id is never a member of the `existing` set passed in.
//! - Ids issued by one allocator are strictly increasing and always exceed
//!   the high-water mark it was advanced past, so an id restored from a
//!   persisted mark is never issued again.
//! - Allocation always terminates: candidates only grow and `existing` is
//!   finite.

use crate::model::palette::Identifier;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

/// Upper bound (exclusive) of the random jitter added to each candidate.
pub const JITTER_SPAN: i64 = 1_000;

/// Source of wall-clock milliseconds used as the id base.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Clock backed by `SystemTime`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX / 2))
            .unwrap_or(0)
    }
}

/// Timestamp-plus-jitter identifier allocator.
pub struct IdAllocator {
    clock: Box<dyn Clock>,
    rng: StdRng,
    high_water: Option<Identifier>,
}

impl IdAllocator {
    /// Creates an allocator seeded from OS entropy and the system clock.
    pub fn new() -> Self {
        Self::with_parts(Box::new(SystemClock), StdRng::from_entropy())
    }

    /// Creates an allocator with a deterministic jitter sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_parts(Box::new(SystemClock), StdRng::seed_from_u64(seed))
    }

    /// Creates an allocator with a caller-provided clock and seed.
    pub fn with_clock(clock: impl Clock + 'static, seed: u64) -> Self {
        Self::with_parts(Box::new(clock), StdRng::seed_from_u64(seed))
    }

    fn with_parts(clock: Box<dyn Clock>, rng: StdRng) -> Self {
        Self {
            clock,
            rng,
            high_water: None,
        }
    }

    /// Returns an identifier that is not a member of `existing`.
    pub fn allocate(&mut self, existing: &HashSet<Identifier>) -> Identifier {
        let now = self.clock.now_ms();
        let base = match self.high_water {
            Some(last) => now.max(last.saturating_add(1)),
            None => now,
        };

        let mut candidate = base.saturating_add(self.jitter());
        while existing.contains(&candidate) {
            candidate = candidate.saturating_add(1 + self.jitter());
        }

        self.high_water = Some(candidate);
        candidate
    }

    /// Allocates `count` identifiers, distinct from `existing` and from each
    /// other.
    pub fn allocate_many(
        &mut self,
        existing: &HashSet<Identifier>,
        count: usize,
    ) -> Vec<Identifier> {
        let mut taken = existing.clone();
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = self.allocate(&taken);
            taken.insert(id);
            ids.push(id);
        }
        ids
    }

    /// Largest identifier handed out or advanced past, if any.
    pub fn high_water_mark(&self) -> Option<Identifier> {
        self.high_water
    }

    /// Raises the floor so every later id is greater than `id`.
    ///
    /// Used to carry the mark of a previous session over to a new allocator.
    pub fn advance_past(&mut self, id: Identifier) {
        if self.high_water.map_or(true, |mark| id > mark) {
            self.high_water = Some(id);
        }
    }

    fn jitter(&mut self) -> i64 {
        self.rng.gen_range(0..JITTER_SPAN)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
