//! Ordered container: a doubly-linked list of [`Link`]s.
//!
//! Positional operations walk from the head, so they cost O(index). There
//! is no index cache; lists in this model are expected to stay small.

use std::iter::{FusedIterator, Rev};

use cinder_arena::{Arena, ArenaError, Ref};
use cinder_core::{ByteReader, ByteWriter, Record};

use crate::link::{Link, LinkNode};
use crate::value::ValueRef;

/// On-arena layout of a list header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ListHeader {
    pub(crate) head: Option<u32>,
    pub(crate) tail: Option<u32>,
    pub(crate) count: u32,
}

impl Record for ListHeader {
    const SIZE: usize = 12;

    fn encode(&self, w: &mut ByteWriter<'_>) {
        w.put_slot(self.head);
        w.put_slot(self.tail);
        w.put_u32(self.count);
    }

    fn decode(r: &mut ByteReader<'_>) -> Self {
        Self {
            head: r.get_slot(),
            tail: r.get_slot(),
            count: r.get_u32(),
        }
    }
}

/// Handle to an ordered list.
///
/// Read accessors take `&Arena` and fail closed (`0`, `None`, `false`) on
/// a stale or foreign handle. Mutators take `&mut Arena` and return the
/// provenance error instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct List(pub(crate) Ref<ListHeader>);

impl List {
    /// Allocate an empty list.
    pub fn new(arena: &mut Arena<'_>) -> Result<Self, ArenaError> {
        Ok(Self(arena.alloc(&ListHeader::default())?))
    }

    fn header(self, arena: &Arena<'_>) -> Result<ListHeader, ArenaError> {
        arena.read(self.0)
    }

    /// Number of links.
    pub fn size(self, arena: &Arena<'_>) -> u32 {
        self.header(arena).map_or(0, |h| h.count)
    }

    /// Whether the list has no links.
    pub fn is_empty(self, arena: &Arena<'_>) -> bool {
        self.size(arena) == 0
    }

    /// The link at `index`, or `None` if `index >= size`.
    pub fn get_link(self, arena: &Arena<'_>, index: u32) -> Option<Link> {
        if index >= self.size(arena) {
            return None;
        }
        self.links(arena).nth(index as usize)
    }

    /// Splice `link` in before the current occupant of `index`.
    ///
    /// Any `index >= size` appends at the tail, so insertion never fails
    /// for range reasons. `link` must not already belong to a list.
    pub fn insert_link(
        self,
        arena: &mut Arena<'_>,
        link: Link,
        index: u32,
    ) -> Result<(), ArenaError> {
        let mut header = self.header(arena)?;
        let mut node = link.node(arena)?;
        let off = link.0.offset();

        match self.get_link(arena, index) {
            None => {
                node.prev = header.tail;
                node.next = None;
                match header.tail {
                    Some(tail) => patch(arena, tail, |n| n.next = Some(off))?,
                    None => header.head = Some(off),
                }
                header.tail = Some(off);
            }
            Some(at) => {
                let mut at_node = at.node(arena)?;
                node.prev = at_node.prev;
                node.next = Some(at.0.offset());
                match at_node.prev {
                    Some(prev) => patch(arena, prev, |n| n.next = Some(off))?,
                    None => header.head = Some(off),
                }
                at_node.prev = Some(off);
                arena.write(at.0, &at_node)?;
            }
        }

        header.count += 1;
        arena.write(link.0, &node)?;
        arena.write(self.0, &header)
    }

    /// Attach `link` at the tail.
    pub fn append_link(self, arena: &mut Arena<'_>, link: Link) -> Result<(), ArenaError> {
        self.insert_link(arena, link, u32::MAX)
    }

    /// Unlink the link at `index`. Returns `false`, leaving the list
    /// untouched, if there is no such link.
    ///
    /// The removed link comes back detached and may be inserted again.
    pub fn remove_link(self, arena: &mut Arena<'_>, index: u32) -> bool {
        self.unlink(arena, index).unwrap_or(false)
    }

    fn unlink(self, arena: &mut Arena<'_>, index: u32) -> Result<bool, ArenaError> {
        let Some(link) = self.get_link(arena, index) else {
            return Ok(false);
        };
        let mut header = self.header(arena)?;
        let mut node = link.node(arena)?;

        match node.prev {
            Some(prev) => patch(arena, prev, |n| n.next = node.next)?,
            None => header.head = node.next,
        }
        match node.next {
            Some(next) => patch(arena, next, |n| n.prev = node.prev)?,
            None => header.tail = node.prev,
        }
        header.count -= 1;

        node.prev = None;
        node.next = None;
        arena.write(link.0, &node)?;
        arena.write(self.0, &header)?;
        Ok(true)
    }

    /// Whether `link` itself is in this list.
    pub fn has_link(self, arena: &Arena<'_>, link: Link) -> bool {
        self.links(arena).any(|l| l == link)
    }

    /// Wrap `value` in a fresh key-less link and insert it at `index`.
    pub fn insert_object(
        self,
        arena: &mut Arena<'_>,
        value: ValueRef,
        index: u32,
    ) -> Result<(), ArenaError> {
        self.header(arena)?;
        let link = Link::create(arena, value, None)?;
        self.insert_link(arena, link, index)
    }

    /// Wrap `value` in a fresh key-less link and append it.
    pub fn append_object(self, arena: &mut Arena<'_>, value: ValueRef) -> Result<(), ArenaError> {
        self.insert_object(arena, value, u32::MAX)
    }

    /// The value at `index`.
    pub fn get_object(self, arena: &Arena<'_>, index: u32) -> Option<ValueRef> {
        self.get_link(arena, index)?.value(arena)
    }

    /// Remove the entry at `index`.
    pub fn remove_object(self, arena: &mut Arena<'_>, index: u32) -> bool {
        self.remove_link(arena, index)
    }

    /// Whether the value handle `value` itself is in this list.
    ///
    /// This is identity, not [`ValueRef::compare`].
    pub fn has_object(self, arena: &Arena<'_>, value: ValueRef) -> bool {
        self.objects(arena).any(|v| v == value)
    }

    /// Position and link of the first entry whose key compares equal to
    /// `key`. Key-less links never match.
    pub fn find_key(self, arena: &Arena<'_>, key: ValueRef) -> Option<(u32, Link)> {
        self.links(arena)
            .enumerate()
            .find(|(_, link)| {
                link.key(arena)
                    .is_some_and(|k| ValueRef::compare(arena, k, key))
            })
            .map(|(i, link)| (i as u32, link))
    }

    /// Links from head to tail.
    pub fn links<'a>(self, arena: &'a Arena<'a>) -> Links<'a> {
        match self.header(arena) {
            Ok(header) => Links {
                arena,
                front: header.head.map(|o| Link::at(arena, o)),
                back: header.tail.map(|o| Link::at(arena, o)),
                remaining: header.count,
            },
            Err(_) => Links::empty(arena),
        }
    }

    /// Links from tail to head, following `prev`.
    pub fn links_rev<'a>(self, arena: &'a Arena<'a>) -> Rev<Links<'a>> {
        self.links(arena).rev()
    }

    /// Values from head to tail.
    pub fn objects<'a>(self, arena: &'a Arena<'a>) -> Objects<'a> {
        Objects {
            links: self.links(arena),
        }
    }
}

/// Read-modify-write the link stored at `offset`.
fn patch(
    arena: &mut Arena<'_>,
    offset: u32,
    f: impl FnOnce(&mut LinkNode),
) -> Result<(), ArenaError> {
    let link = Link::at(arena, offset);
    let mut node = link.node(arena)?;
    f(&mut node);
    arena.write(link.0, &node)
}

/// Iterator over the links of a [`List`].
///
/// Iterating from the back follows `prev` pointers from the tail.
#[derive(Clone, Debug)]
pub struct Links<'a> {
    arena: &'a Arena<'a>,
    front: Option<Link>,
    back: Option<Link>,
    remaining: u32,
}

impl<'a> Links<'a> {
    pub(crate) fn empty(arena: &'a Arena<'a>) -> Self {
        Self {
            arena,
            front: None,
            back: None,
            remaining: 0,
        }
    }
}

impl Iterator for Links<'_> {
    type Item = Link;

    fn next(&mut self) -> Option<Link> {
        if self.remaining == 0 {
            return None;
        }
        let link = self.front?;
        self.front = link.next(self.arena);
        self.remaining -= 1;
        Some(link)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining as usize))
    }
}

impl DoubleEndedIterator for Links<'_> {
    fn next_back(&mut self) -> Option<Link> {
        if self.remaining == 0 {
            return None;
        }
        let link = self.back?;
        self.back = link.prev(self.arena);
        self.remaining -= 1;
        Some(link)
    }
}

impl FusedIterator for Links<'_> {}

/// Iterator over the values of a [`List`].
#[derive(Clone, Debug)]
pub struct Objects<'a> {
    links: Links<'a>,
}

impl Iterator for Objects<'_> {
    type Item = ValueRef;

    fn next(&mut self) -> Option<ValueRef> {
        let arena = self.links.arena;
        self.links.find_map(|link| link.value(arena))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.links.size_hint()
    }
}
