//! Arena-specific error types.

use std::error::Error;
use std::fmt;

use cinder_core::{ArenaId, Generation};

/// Errors that can occur during arena operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The bump cursor moved past capacity. Sticky until `reset()`.
    Overflow {
        /// Number of bytes requested by the failing call.
        requested: usize,
        /// Cursor position after the failing call (may exceed capacity).
        used: usize,
        /// Fixed capacity of the arena.
        capacity: usize,
    },
    /// An alignment of zero was requested.
    InvalidAlignment {
        /// The rejected alignment.
        align: usize,
    },
    /// A handle allocated before the most recent `reset()` or `init()`.
    StaleHandle {
        /// The generation encoded in the handle.
        handle_generation: Generation,
        /// The arena's current generation.
        arena_generation: Generation,
    },
    /// A handle that was handed out by a different arena.
    ForeignHandle {
        /// The arena that issued the handle.
        handle_arena: ArenaId,
        /// The arena it was presented to.
        arena: ArenaId,
    },
    /// A handle whose byte range lies outside the allocated part of the arena.
    OutOfBounds {
        /// Start offset of the range.
        offset: usize,
        /// Length of the range.
        len: usize,
        /// Bytes currently allocated.
        used: usize,
    },
    /// Construction parameters were rejected.
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow {
                requested,
                used,
                capacity,
            } => {
                write!(
                    f,
                    "arena overflow: requested {requested} bytes, cursor at {used}, capacity {capacity} bytes"
                )
            }
            Self::InvalidAlignment { align } => {
                write!(f, "invalid alignment {align}")
            }
            Self::StaleHandle {
                handle_generation,
                arena_generation,
            } => {
                write!(
                    f,
                    "stale handle: generation {handle_generation}, arena generation {arena_generation}"
                )
            }
            Self::ForeignHandle {
                handle_arena,
                arena,
            } => {
                write!(f, "handle from arena {handle_arena} used with arena {arena}")
            }
            Self::OutOfBounds { offset, len, used } => {
                write!(
                    f,
                    "range {offset}..{} outside allocated {used} bytes",
                    offset.saturating_add(*len)
                )
            }
            Self::InvalidConfig { reason } => {
                write!(f, "invalid arena config: {reason}")
            }
        }
    }
}

impl Error for ArenaError {}
