//! The doubly-linked node underlying lists and maps.

use cinder_arena::{Arena, ArenaError, Ref};
use cinder_core::{ByteReader, ByteWriter, Record};

use crate::value::ValueRef;

/// On-arena layout of a link: four `u32` offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct LinkNode {
    pub(crate) prev: Option<u32>,
    pub(crate) next: Option<u32>,
    pub(crate) value: u32,
    pub(crate) key: Option<u32>,
}

impl Record for LinkNode {
    const SIZE: usize = 16;

    fn encode(&self, w: &mut ByteWriter<'_>) {
        w.put_slot(self.prev);
        w.put_slot(self.next);
        w.put_u32(self.value);
        w.put_slot(self.key);
    }

    fn decode(r: &mut ByteReader<'_>) -> Self {
        Self {
            prev: r.get_slot(),
            next: r.get_slot(),
            value: r.get_u32(),
            key: r.get_slot(),
        }
    }
}

/// Handle to a link: a value, an optional key and its neighbours.
///
/// Links never own each other; all of them live in the arena. A link may
/// belong to at most one list at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Link(pub(crate) Ref<LinkNode>);

impl Link {
    /// Allocate a detached link holding `value` and, for map entries, `key`.
    ///
    /// Both handles must belong to `arena`'s current generation.
    pub fn create(
        arena: &mut Arena<'_>,
        value: ValueRef,
        key: Option<ValueRef>,
    ) -> Result<Self, ArenaError> {
        arena.verify(value.0)?;
        if let Some(key) = key {
            arena.verify(key.0)?;
        }
        let node = LinkNode {
            prev: None,
            next: None,
            value: value.0.offset(),
            key: key.map(|k| k.0.offset()),
        };
        Ok(Self(arena.alloc(&node)?))
    }

    pub(crate) fn node(self, arena: &Arena<'_>) -> Result<LinkNode, ArenaError> {
        arena.read(self.0)
    }

    pub(crate) fn at(arena: &Arena<'_>, offset: u32) -> Self {
        Self(arena.rebind(offset))
    }

    /// The value this link carries.
    pub fn value(self, arena: &Arena<'_>) -> Option<ValueRef> {
        let node = self.node(arena).ok()?;
        Some(ValueRef(arena.rebind(node.value)))
    }

    /// The key this link carries, if it is a map entry.
    pub fn key(self, arena: &Arena<'_>) -> Option<ValueRef> {
        let node = self.node(arena).ok()?;
        node.key.map(|k| ValueRef(arena.rebind(k)))
    }

    /// The following link in its list.
    pub fn next(self, arena: &Arena<'_>) -> Option<Link> {
        let node = self.node(arena).ok()?;
        node.next.map(|n| Link::at(arena, n))
    }

    /// The preceding link in its list.
    pub fn prev(self, arena: &Arena<'_>) -> Option<Link> {
        let node = self.node(arena).ok()?;
        node.prev.map(|p| Link::at(arena, p))
    }
}
