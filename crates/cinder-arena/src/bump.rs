//! Linear bump arena over a caller-supplied buffer.
//!
//! An [`Arena`] hands out consecutive byte ranges of a fixed buffer by
//! advancing a cursor. Nothing is ever freed individually: [`Arena::reset`]
//! rewinds the cursor and retires every handle issued so far.

use std::fmt;
use std::ops::Range;

use cinder_core::{ArenaId, ByteReader, ByteWriter, Generation, Record};
use tracing::{debug, trace, warn};

use crate::config::ArenaConfig;
use crate::error::ArenaError;
use crate::handle::{Region, Ref};

/// Bump allocator bound to a borrowed byte buffer.
///
/// # Overflow
///
/// Allocation is never rejected up front. The cursor always advances by
/// the requested amount (plus alignment padding) and only then is checked
/// against capacity. A call that ends past capacity fails with
/// [`ArenaError::Overflow`], and since the cursor stays past capacity,
/// every later call fails too until [`reset`](Arena::reset). Overflow is
/// sticky; an exhausted arena is recovered as a whole, never piecemeal.
///
/// # Handles
///
/// Regions and record handles carry the arena's [`ArenaId`] and current
/// [`Generation`]. `reset()` and `init()` bump the generation, so handles
/// from before are rejected with [`ArenaError::StaleHandle`].
pub struct Arena<'heap> {
    heap: &'heap mut [u8],
    /// Next free offset. May exceed `capacity` after an overflow.
    cursor: usize,
    capacity: usize,
    id: ArenaId,
    generation: Generation,
    /// Whether the overflow of the current generation was already reported.
    overflow_reported: bool,
    config: ArenaConfig,
}

impl<'heap> Arena<'heap> {
    /// Bind an arena to the whole of `heap` with the default config.
    ///
    /// Buffers longer than the `u32` handle range are truncated to it.
    pub fn new(heap: &'heap mut [u8]) -> Self {
        let capacity = heap.len().min(ArenaConfig::DEFAULT_MAX_CAPACITY);
        Self::bind(heap, capacity, ArenaConfig::new())
    }

    /// Bind an arena to the first `capacity` bytes of `heap`.
    pub fn with_capacity(heap: &'heap mut [u8], capacity: usize) -> Result<Self, ArenaError> {
        Self::with_config(heap, capacity, ArenaConfig::new())
    }

    /// Bind an arena with an explicit configuration.
    ///
    /// Fails with [`ArenaError::InvalidConfig`] if the config is invalid,
    /// `capacity` exceeds the buffer, or `capacity` exceeds
    /// `config.max_capacity`.
    pub fn with_config(
        heap: &'heap mut [u8],
        capacity: usize,
        config: ArenaConfig,
    ) -> Result<Self, ArenaError> {
        config
            .validate()
            .map_err(|reason| ArenaError::InvalidConfig { reason })?;
        check_capacity(heap.len(), capacity, &config)?;
        Ok(Self::bind(heap, capacity, config))
    }

    fn bind(heap: &'heap mut [u8], capacity: usize, config: ArenaConfig) -> Self {
        let id = ArenaId::next();
        debug!(arena = %id, capacity, struct_align = config.struct_align, "arena initialised");
        Self {
            heap,
            cursor: 0,
            capacity,
            id,
            generation: Generation::default(),
            overflow_reported: false,
            config,
        }
    }

    /// Rebind this arena to a new buffer.
    ///
    /// The cursor returns to the start and the generation advances, so all
    /// handles issued against the previous buffer go stale. On error the
    /// arena is left untouched.
    pub fn init(&mut self, heap: &'heap mut [u8], capacity: usize) -> Result<(), ArenaError> {
        check_capacity(heap.len(), capacity, &self.config)?;
        self.heap = heap;
        self.capacity = capacity;
        self.rewind();
        debug!(arena = %self.id, capacity, generation = %self.generation, "arena rebound");
        Ok(())
    }

    // ── Allocation ──────────────────────────────────────────────

    /// Allocate exactly `n` bytes at the cursor, without alignment.
    pub fn allocate_bytes(&mut self, n: usize) -> Result<Region, ArenaError> {
        let start = self.cursor;
        self.cursor = start.saturating_add(n);
        if self.did_overflow() {
            return Err(self.overflow(n));
        }
        if self.config.zero_fill {
            self.heap[start..self.cursor].fill(0);
        }
        // start + n <= capacity <= u32::MAX, so both fit.
        Ok(Region::new(self.id, self.generation, start as u32, n as u32))
    }

    /// Move the cursor forward to the next address that is a multiple of
    /// `align`, then allocate `n` bytes.
    ///
    /// Alignment is computed on the absolute address of the buffer, not the
    /// offset, so the result is safe to reinterpret on targets that trap on
    /// misaligned access. `align == 0` is rejected without moving the cursor.
    pub fn allocate_aligned(&mut self, n: usize, align: usize) -> Result<Region, ArenaError> {
        if align == 0 {
            return Err(ArenaError::InvalidAlignment { align });
        }
        let pad = self.padding_for(align);
        self.cursor = self.cursor.saturating_add(pad);
        self.allocate_bytes(n)
    }

    /// Allocate `n` bytes aligned to `n` itself.
    ///
    /// Natural alignment for a primitive of width `n`. Zero-width requests
    /// use an alignment of one.
    pub fn allocate_var(&mut self, n: usize) -> Result<Region, ArenaError> {
        self.allocate_aligned(n, n.max(1))
    }

    /// Allocate `n` bytes aligned to the configured struct alignment
    /// (the pointer width by default).
    pub fn allocate_struct(&mut self, n: usize) -> Result<Region, ArenaError> {
        self.allocate_aligned(n, self.config.struct_align)
    }

    fn padding_for(&self, align: usize) -> usize {
        let addr = (self.heap.as_ptr() as usize).wrapping_add(self.cursor);
        match addr % align {
            0 => 0,
            rem => align - rem,
        }
    }

    fn overflow(&mut self, requested: usize) -> ArenaError {
        if !self.overflow_reported {
            self.overflow_reported = true;
            warn!(
                arena = %self.id,
                generation = %self.generation,
                requested,
                used = self.cursor,
                capacity = self.capacity,
                "arena overflow; further allocations fail until reset"
            );
        }
        ArenaError::Overflow {
            requested,
            used: self.cursor,
            capacity: self.capacity,
        }
    }

    // ── Introspection ───────────────────────────────────────────

    /// Bytes consumed so far, padding included.
    ///
    /// After an overflow this exceeds [`capacity`](Arena::capacity).
    pub fn used_bytes(&self) -> usize {
        self.cursor
    }

    /// Bytes left before the arena overflows. Zero once overflowed.
    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.cursor)
    }

    /// Whether the cursor has moved past capacity.
    pub fn did_overflow(&self) -> bool {
        self.cursor > self.capacity
    }

    /// Fixed capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The current generation.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// This arena's unique id.
    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// The configuration the arena was built with.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Rewind the cursor to the start of the buffer.
    ///
    /// Every region and record handle issued so far becomes stale. The
    /// buffer contents are not cleared.
    pub fn reset(&mut self) {
        self.rewind();
        trace!(arena = %self.id, generation = %self.generation, "arena reset");
    }

    fn rewind(&mut self) {
        self.cursor = 0;
        self.generation = self.generation.next();
        self.overflow_reported = false;
    }

    // ── Raw access ──────────────────────────────────────────────

    /// Bytes of a previously allocated region.
    pub fn bytes(&self, region: Region) -> Result<&[u8], ArenaError> {
        let range = self.resolve(
            region.arena,
            region.generation,
            region.offset,
            region.len as usize,
        )?;
        Ok(&self.heap[range])
    }

    /// Mutable bytes of a previously allocated region.
    pub fn bytes_mut(&mut self, region: Region) -> Result<&mut [u8], ArenaError> {
        let range = self.resolve(
            region.arena,
            region.generation,
            region.offset,
            region.len as usize,
        )?;
        Ok(&mut self.heap[range])
    }

    /// Check provenance and bounds of a handle, returning its byte range.
    fn resolve(
        &self,
        arena: ArenaId,
        generation: Generation,
        offset: u32,
        len: usize,
    ) -> Result<Range<usize>, ArenaError> {
        if arena != self.id {
            return Err(ArenaError::ForeignHandle {
                handle_arena: arena,
                arena: self.id,
            });
        }
        if generation != self.generation {
            return Err(ArenaError::StaleHandle {
                handle_generation: generation,
                arena_generation: self.generation,
            });
        }
        let used = self.cursor.min(self.capacity);
        let start = offset as usize;
        match start.checked_add(len) {
            Some(end) if end <= used => Ok(start..end),
            _ => Err(ArenaError::OutOfBounds {
                offset: start,
                len,
                used,
            }),
        }
    }

    // ── Typed records ───────────────────────────────────────────

    /// Allocate a struct-aligned record and encode `value` into it.
    pub fn alloc<T: Record>(&mut self, value: &T) -> Result<Ref<T>, ArenaError> {
        let region = self.allocate_struct(T::SIZE)?;
        let window = &mut self.heap[region.offset as usize..][..T::SIZE];
        value.encode(&mut ByteWriter::new(window));
        Ok(Ref::new(self.id, self.generation, region.offset))
    }

    /// Decode the record a handle points at.
    pub fn read<T: Record>(&self, r: Ref<T>) -> Result<T, ArenaError> {
        let range = self.resolve(r.arena, r.generation, r.offset, T::SIZE)?;
        Ok(T::decode(&mut ByteReader::new(&self.heap[range])))
    }

    /// Overwrite the record a handle points at.
    pub fn write<T: Record>(&mut self, r: Ref<T>, value: &T) -> Result<(), ArenaError> {
        let range = self.resolve(r.arena, r.generation, r.offset, T::SIZE)?;
        value.encode(&mut ByteWriter::new(&mut self.heap[range]));
        Ok(())
    }

    /// Check that a record handle can be resolved against this arena.
    ///
    /// Containers call this before storing a handle's offset inside another
    /// record, where the arena id and generation are no longer kept.
    pub fn verify<T: Record>(&self, r: Ref<T>) -> Result<(), ArenaError> {
        self.resolve(r.arena, r.generation, r.offset, T::SIZE)
            .map(|_| ())
    }

    /// Rebuild a raw region from an offset and length stored inside a
    /// record of this arena. Access through it is still bounds-checked.
    pub fn rebind_region(&self, offset: u32, len: u32) -> Region {
        Region::new(self.id, self.generation, offset, len)
    }

    /// Rebuild a handle from an offset stored inside a record of this arena.
    ///
    /// The handle is tagged with the current generation; reading it is
    /// still bounds-checked.
    pub fn rebind<T>(&self, offset: u32) -> Ref<T> {
        Ref::new(self.id, self.generation, offset)
    }
}

fn check_capacity(heap_len: usize, capacity: usize, config: &ArenaConfig) -> Result<(), ArenaError> {
    if capacity > heap_len {
        return Err(ArenaError::InvalidConfig {
            reason: format!("capacity {capacity} exceeds buffer length {heap_len}"),
        });
    }
    if capacity > config.max_capacity {
        return Err(ArenaError::InvalidConfig {
            reason: format!(
                "capacity {capacity} exceeds max_capacity {}",
                config.max_capacity
            ),
        });
    }
    Ok(())
}

impl fmt::Debug for Arena<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .field("used", &self.cursor)
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::AlignedHeap;

    const PTR: usize = std::mem::size_of::<usize>();

    #[derive(Debug, PartialEq)]
    struct Pair {
        a: u32,
        b: i64,
    }

    impl Record for Pair {
        const SIZE: usize = 12;

        fn encode(&self, w: &mut ByteWriter<'_>) {
            w.put_u32(self.a);
            w.put_i64(self.b);
        }

        fn decode(r: &mut ByteReader<'_>) -> Self {
            Self {
                a: r.get_u32(),
                b: r.get_i64(),
            }
        }
    }

    #[test]
    fn mixed_allocations_respect_alignment() {
        let mut heap = AlignedHeap::<64>::new();
        let mut arena = Arena::new(heap.as_mut_slice());

        let bytes = arena.allocate_bytes(15).unwrap();
        let short = arena.allocate_var(2).unwrap();
        let record = arena.allocate_struct(16).unwrap();

        assert_eq!(bytes.offset(), 0);
        assert_eq!(short.offset(), 16);
        assert_eq!(record.offset() as usize, 16 + PTR);
        assert!(!arena.did_overflow());

        arena.reset();
        assert_eq!(arena.used_bytes(), 0);
    }

    #[test]
    fn filling_exactly_to_capacity_is_not_overflow() {
        let mut heap = AlignedHeap::<64>::new();
        let mut arena = Arena::new(heap.as_mut_slice());
        arena.allocate_bytes(64).unwrap();
        assert_eq!(arena.used_bytes(), 64);
        assert_eq!(arena.remaining(), 0);
        assert!(!arena.did_overflow());
    }

    #[test]
    fn overflow_is_sticky_until_reset() {
        let mut heap = AlignedHeap::<64>::new();
        let mut arena = Arena::new(heap.as_mut_slice());
        arena.allocate_bytes(64).unwrap();

        let err = arena.allocate_bytes(1).unwrap_err();
        assert_eq!(
            err,
            ArenaError::Overflow {
                requested: 1,
                used: 65,
                capacity: 64
            }
        );
        assert!(arena.did_overflow());
        assert_eq!(arena.used_bytes(), 65);

        // Even an empty request fails: the cursor is still past capacity.
        assert!(arena.allocate_bytes(0).is_err());
        assert!(arena.allocate_struct(1).is_err());

        arena.reset();
        assert!(!arena.did_overflow());
        assert!(arena.allocate_bytes(8).is_ok());
    }

    #[test]
    fn zero_alignment_rejected_without_moving_cursor() {
        let mut heap = AlignedHeap::<16>::new();
        let mut arena = Arena::new(heap.as_mut_slice());
        arena.allocate_bytes(3).unwrap();
        assert_eq!(
            arena.allocate_aligned(4, 0),
            Err(ArenaError::InvalidAlignment { align: 0 })
        );
        assert_eq!(arena.used_bytes(), 3);
    }

    #[test]
    fn zero_width_var_uses_unit_alignment() {
        let mut heap = AlignedHeap::<16>::new();
        let mut arena = Arena::new(heap.as_mut_slice());
        arena.allocate_bytes(3).unwrap();
        let r = arena.allocate_var(0).unwrap();
        assert_eq!(r.offset(), 3);
        assert!(r.is_empty());
    }

    #[test]
    fn non_power_of_two_alignment_rounds_up() {
        let mut heap = AlignedHeap::<32>::new();
        let mut arena = Arena::new(heap.as_mut_slice());
        arena.allocate_bytes(1).unwrap();
        let r = arena.allocate_aligned(1, 3).unwrap();
        assert_eq!(r.offset(), 3);
    }

    #[test]
    fn allocations_are_zero_filled_after_reset() {
        let mut heap = AlignedHeap::<16>::new();
        let mut arena = Arena::new(heap.as_mut_slice());
        let r = arena.allocate_bytes(8).unwrap();
        arena.bytes_mut(r).unwrap().fill(0xAB);
        arena.reset();
        let r = arena.allocate_bytes(8).unwrap();
        assert!(arena.bytes(r).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn zero_fill_can_be_disabled() {
        let mut heap = AlignedHeap::<16>::new();
        let config = ArenaConfig {
            zero_fill: false,
            ..ArenaConfig::new()
        };
        let mut arena = Arena::with_config(heap.as_mut_slice(), 16, config).unwrap();
        let r = arena.allocate_bytes(4).unwrap();
        arena.bytes_mut(r).unwrap().fill(7);
        arena.reset();
        let r = arena.allocate_bytes(4).unwrap();
        assert_eq!(arena.bytes(r).unwrap(), &[7, 7, 7, 7]);
    }

    #[test]
    fn capacity_can_be_smaller_than_buffer() {
        let mut heap = AlignedHeap::<64>::new();
        let mut arena = Arena::with_capacity(heap.as_mut_slice(), 10).unwrap();
        assert_eq!(arena.capacity(), 10);
        assert!(arena.allocate_bytes(11).is_err());
    }

    #[test]
    fn capacity_larger_than_buffer_rejected() {
        let mut heap = AlignedHeap::<8>::new();
        let result = Arena::with_capacity(heap.as_mut_slice(), 9);
        assert!(matches!(result, Err(ArenaError::InvalidConfig { .. })));
    }

    #[test]
    fn compact_config_rejects_large_capacity() {
        let mut buf = vec![0u8; 70_000];
        let result = Arena::with_config(&mut buf, 70_000, ArenaConfig::compact());
        assert!(matches!(result, Err(ArenaError::InvalidConfig { .. })));
    }

    #[test]
    fn invalid_config_rejected() {
        let mut heap = AlignedHeap::<8>::new();
        let config = ArenaConfig {
            struct_align: 3,
            ..ArenaConfig::new()
        };
        let result = Arena::with_config(heap.as_mut_slice(), 8, config);
        assert!(matches!(result, Err(ArenaError::InvalidConfig { .. })));
    }

    #[test]
    fn reset_makes_regions_stale() {
        let mut heap = AlignedHeap::<32>::new();
        let mut arena = Arena::new(heap.as_mut_slice());
        let r = arena.allocate_bytes(4).unwrap();
        arena.reset();
        arena.allocate_bytes(4).unwrap();
        assert!(matches!(
            arena.bytes(r),
            Err(ArenaError::StaleHandle { .. })
        ));
    }

    #[test]
    fn regions_from_other_arenas_rejected() {
        let mut heap_a = AlignedHeap::<32>::new();
        let mut heap_b = AlignedHeap::<32>::new();
        let mut a = Arena::new(heap_a.as_mut_slice());
        let mut b = Arena::new(heap_b.as_mut_slice());
        let r = a.allocate_bytes(4).unwrap();
        b.allocate_bytes(4).unwrap();
        assert!(matches!(
            b.bytes(r),
            Err(ArenaError::ForeignHandle { .. })
        ));
    }

    #[test]
    fn rebound_offsets_are_bounds_checked() {
        let mut heap = AlignedHeap::<64>::new();
        let mut arena = Arena::new(heap.as_mut_slice());
        arena.alloc(&Pair { a: 1, b: 2 }).unwrap();
        let bogus: Ref<Pair> = arena.rebind(40);
        assert!(matches!(
            arena.read(bogus),
            Err(ArenaError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn records_round_trip_through_the_buffer() {
        let mut heap = AlignedHeap::<64>::new();
        let mut arena = Arena::new(heap.as_mut_slice());
        arena.allocate_bytes(1).unwrap();
        let r = arena.alloc(&Pair { a: 9, b: -3 }).unwrap();
        assert_eq!(r.offset() as usize % PTR, 0);
        assert_eq!(arena.read(r).unwrap(), Pair { a: 9, b: -3 });

        arena.write(r, &Pair { a: 10, b: 4 }).unwrap();
        assert_eq!(arena.read(r).unwrap(), Pair { a: 10, b: 4 });
        assert!(arena.verify(r).is_ok());
        assert_eq!(arena.rebind::<Pair>(r.offset()), r);
    }

    #[test]
    fn rebound_regions_resolve_to_the_same_bytes() {
        let mut heap = AlignedHeap::<16>::new();
        let mut arena = Arena::new(heap.as_mut_slice());
        let r = arena.allocate_bytes(3).unwrap();
        arena.bytes_mut(r).unwrap().copy_from_slice(b"abc");
        let again = arena.rebind_region(r.offset(), r.len());
        assert_eq!(again, r);
        assert_eq!(arena.bytes(again).unwrap(), b"abc");
    }

    #[test]
    fn init_rebinds_and_retires_handles() {
        let mut first = AlignedHeap::<32>::new();
        let mut second = AlignedHeap::<16>::new();
        let mut arena = Arena::new(first.as_mut_slice());
        let r = arena.alloc(&Pair { a: 1, b: 1 }).unwrap();
        let before = arena.generation();

        arena.init(second.as_mut_slice(), 16).unwrap();
        assert_eq!(arena.capacity(), 16);
        assert_eq!(arena.used_bytes(), 0);
        assert_eq!(arena.generation(), before.next());
        assert!(matches!(
            arena.read(r),
            Err(ArenaError::StaleHandle { .. })
        ));
    }

    #[test]
    fn failed_init_leaves_arena_untouched() {
        let mut first = AlignedHeap::<32>::new();
        let mut second = AlignedHeap::<8>::new();
        let mut arena = Arena::new(first.as_mut_slice());
        arena.allocate_bytes(5).unwrap();
        assert!(arena.init(second.as_mut_slice(), 16).is_err());
        assert_eq!(arena.used_bytes(), 5);
        assert_eq!(arena.capacity(), 32);
    }

    #[test]
    fn record_allocation_overflow_reports_error() {
        let mut heap = AlignedHeap::<16>::new();
        let mut arena = Arena::new(heap.as_mut_slice());
        arena.alloc(&Pair { a: 1, b: 1 }).unwrap();
        assert!(matches!(
            arena.alloc(&Pair { a: 2, b: 2 }),
            Err(ArenaError::Overflow { .. })
        ));
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Bytes(usize),
            Aligned(usize, usize),
            Var(usize),
            Struct(usize),
        }

        fn arb_op() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0usize..24).prop_map(Op::Bytes),
                (0usize..24, prop::sample::select(vec![1usize, 2, 4, 8, 16])).prop_map(|(n, a)| Op::Aligned(n, a)),
                prop::sample::select(vec![1usize, 2, 4, 8]).prop_map(Op::Var),
                (0usize..24).prop_map(Op::Struct),
            ]
        }

        fn apply(arena: &mut Arena<'_>, op: &Op) -> Result<Region, ArenaError> {
            match *op {
                Op::Bytes(n) => arena.allocate_bytes(n),
                Op::Aligned(n, a) => arena.allocate_aligned(n, a),
                Op::Var(n) => arena.allocate_var(n),
                Op::Struct(n) => arena.allocate_struct(n),
            }
        }

        proptest! {
            #[test]
            fn overflow_is_sticky(ops in proptest::collection::vec(arb_op(), 1..40)) {
                let mut heap = AlignedHeap::<128>::new();
                let mut arena = Arena::new(heap.as_mut_slice());
                let mut overflowed = false;
                for op in &ops {
                    let result = apply(&mut arena, op);
                    if overflowed {
                        prop_assert!(result.is_err());
                    }
                    prop_assert_eq!(result.is_err(), arena.did_overflow());
                    overflowed = arena.did_overflow();
                }
            }

            #[test]
            fn cursor_never_moves_backward(ops in proptest::collection::vec(arb_op(), 1..40)) {
                let mut heap = AlignedHeap::<128>::new();
                let mut arena = Arena::new(heap.as_mut_slice());
                let mut last = 0;
                for op in &ops {
                    let _ = apply(&mut arena, op);
                    prop_assert!(arena.used_bytes() >= last);
                    last = arena.used_bytes();
                }
            }

            #[test]
            fn aligned_regions_are_aligned_and_disjoint(ops in proptest::collection::vec(arb_op(), 1..40)) {
                let mut heap = AlignedHeap::<256>::new();
                let mut arena = Arena::new(heap.as_mut_slice());
                let mut end = 0u32;
                for op in &ops {
                    if let Ok(region) = apply(&mut arena, op) {
                        let align = match *op {
                            Op::Bytes(_) => 1,
                            Op::Aligned(_, a) => a,
                            Op::Var(n) => n,
                            Op::Struct(_) => PTR,
                        };
                        prop_assert_eq!(region.offset() as usize % align, 0);
                        prop_assert!(region.offset() >= end);
                        end = region.offset() + region.len();
                        prop_assert!(end as usize <= arena.capacity());
                    }
                }
            }
        }
    }
}
