//! Region and record handles.
//!
//! Every allocation is addressed by a handle rather than a pointer. A
//! handle carries the id of the arena that issued it and the arena
//! generation at the time, so resolving it against a reset or unrelated
//! arena is an O(1) rejection instead of a dangling read.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use cinder_core::{ArenaId, Generation};

/// A raw byte range handed out by the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct Region {
    pub(crate) arena: ArenaId,
    pub(crate) generation: Generation,
    pub(crate) offset: u32,
    pub(crate) len: u32,
}

impl Region {
    pub(crate) fn new(arena: ArenaId, generation: Generation, offset: u32, len: u32) -> Self {
        Self {
            arena,
            generation,
            offset,
            len,
        }
    }

    /// Byte offset from the start of the arena buffer.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Length of the region in bytes.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Whether this is a zero-length region.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The generation this region belongs to.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The arena that issued this region.
    pub fn arena(&self) -> ArenaId {
        self.arena
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Region(arena={}, gen={}, off={}, len={})",
            self.arena, self.generation, self.offset, self.len
        )
    }
}

/// Typed handle to a fixed-layout record of type `T`.
///
/// Equality is identity: two handles are equal iff they name the same
/// record in the same arena generation.
#[must_use]
pub struct Ref<T> {
    pub(crate) arena: ArenaId,
    pub(crate) generation: Generation,
    pub(crate) offset: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Ref<T> {
    pub(crate) fn new(arena: ArenaId, generation: Generation, offset: u32) -> Self {
        Self {
            arena,
            generation,
            offset,
            _marker: PhantomData,
        }
    }

    /// Byte offset of the record from the start of the arena buffer.
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// The generation this handle belongs to.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// The arena that issued this handle.
    pub fn arena(&self) -> ArenaId {
        self.arena
    }
}

impl<T> Clone for Ref<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Ref<T> {}

impl<T> PartialEq for Ref<T> {
    fn eq(&self, other: &Self) -> bool {
        self.arena == other.arena
            && self.generation == other.generation
            && self.offset == other.offset
    }
}

impl<T> Eq for Ref<T> {}

impl<T> Hash for Ref<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.arena.hash(state);
        self.generation.hash(state);
        self.offset.hash(state);
    }
}

impl<T> fmt::Debug for Ref<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ref")
            .field("arena", &self.arena)
            .field("generation", &self.generation)
            .field("offset", &self.offset)
            .finish()
    }
}
