//! Associative container layered on [`List`].
//!
//! Every link of the underlying list carries a key. Keys are matched with
//! [`ValueRef::compare`], so two distinct strings with the same bytes name
//! the same entry. Setting an existing key removes the old entry and
//! appends a new one: re-assignment moves the key to the end of iteration
//! order.

use cinder_arena::{Arena, ArenaError, Ref};
use cinder_core::{ByteReader, ByteWriter, Record};
use tracing::trace;

use crate::link::Link;
use crate::list::{Links, List, ListHeader};
use crate::value::ValueRef;

/// On-arena layout of a map: the offset of its list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MapHeader {
    pub(crate) list: u32,
}

impl Record for MapHeader {
    const SIZE: usize = 4;

    fn encode(&self, w: &mut ByteWriter<'_>) {
        w.put_u32(self.list);
    }

    fn decode(r: &mut ByteReader<'_>) -> Self {
        Self { list: r.get_u32() }
    }
}

/// Handle to a key/value map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Map(pub(crate) Ref<MapHeader>);

impl Map {
    /// Allocate an empty map and its backing list.
    pub fn new(arena: &mut Arena<'_>) -> Result<Self, ArenaError> {
        let list = List::new(arena)?;
        let header = MapHeader {
            list: list.0.offset(),
        };
        Ok(Self(arena.alloc(&header)?))
    }

    /// The list holding this map's entries.
    pub fn list(self, arena: &Arena<'_>) -> Option<List> {
        let header = arena.read(self.0).ok()?;
        Some(List(arena.rebind::<ListHeader>(header.list)))
    }

    fn try_list(self, arena: &Arena<'_>) -> Result<List, ArenaError> {
        let header = arena.read(self.0)?;
        Ok(List(arena.rebind(header.list)))
    }

    /// Number of entries.
    pub fn size(self, arena: &Arena<'_>) -> u32 {
        self.list(arena).map_or(0, |l| l.size(arena))
    }

    /// Whether the map has no entries.
    pub fn is_empty(self, arena: &Arena<'_>) -> bool {
        self.size(arena) == 0
    }

    /// Bind `key` to `value`, placing the entry last.
    ///
    /// The new link is allocated before any existing entry is removed, so
    /// an overflow leaves the map as it was.
    pub fn set_object(
        self,
        arena: &mut Arena<'_>,
        key: ValueRef,
        value: ValueRef,
    ) -> Result<(), ArenaError> {
        let list = self.try_list(arena)?;
        let link = Link::create(arena, value, Some(key))?;
        if let Some((index, _)) = list.find_key(arena, key) {
            trace!(index, "map key re-set; moving entry to tail");
            list.remove_link(arena, index);
        }
        list.append_link(arena, link)
    }

    /// Whether an entry with an equal key exists.
    pub fn has_key(self, arena: &Arena<'_>, key: ValueRef) -> bool {
        self.find(arena, key).is_some()
    }

    /// The value bound to `key`.
    pub fn get_object(self, arena: &Arena<'_>, key: ValueRef) -> Option<ValueRef> {
        self.find(arena, key)?.1.value(arena)
    }

    /// Remove the entry for `key`. Returns whether one existed.
    pub fn remove_object(self, arena: &mut Arena<'_>, key: ValueRef) -> bool {
        let Some(list) = self.list(arena) else {
            return false;
        };
        match list.find_key(arena, key) {
            Some((index, _)) => list.remove_link(arena, index),
            None => false,
        }
    }

    fn find(self, arena: &Arena<'_>, key: ValueRef) -> Option<(u32, Link)> {
        self.list(arena)?.find_key(arena, key)
    }

    /// `(key, value)` pairs in iteration order.
    pub fn entries<'a>(self, arena: &'a Arena<'a>) -> Entries<'a> {
        let links = match self.list(arena) {
            Some(list) => list.links(arena),
            None => Links::empty(arena),
        };
        Entries { arena, links }
    }

    /// Keys in iteration order.
    pub fn keys<'a>(self, arena: &'a Arena<'a>) -> impl Iterator<Item = ValueRef> + 'a {
        self.entries(arena).map(|(k, _)| k)
    }
}

/// Iterator over the entries of a [`Map`].
#[derive(Clone, Debug)]
pub struct Entries<'a> {
    arena: &'a Arena<'a>,
    links: Links<'a>,
}

impl Iterator for Entries<'_> {
    type Item = (ValueRef, ValueRef);

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        self.links
            .find_map(|link| Some((link.key(arena)?, link.value(arena)?)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.links.size_hint()
    }
}
