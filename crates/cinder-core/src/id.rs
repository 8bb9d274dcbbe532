//! Strongly-typed identifiers carried by every arena handle.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`ArenaId`] allocation.
static ARENA_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for an arena.
///
/// Allocated from a monotonic atomic counter via [`ArenaId::next`]. Two
/// arenas built over the same buffer (one after the other) still get
/// different ids, so a handle can never be resolved against an arena that
/// did not hand it out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaId(u64);

impl ArenaId {
    /// Allocate a fresh, unique arena id.
    pub fn next() -> Self {
        Self(ARENA_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value, for diagnostics.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Arena generation, bumped on every reset.
///
/// Handles record the generation they were allocated in; a mismatch with
/// the arena's current generation means the handle outlived a reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u32);

impl Generation {
    /// The generation following this one. Wraps on overflow.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Generation {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
