//! End-to-end scenarios over a single arena: allocation layout, list
//! removal order, map re-assignment and handle provenance.

use cinder_arena::{Arena, ArenaError};
use cinder_model::{Link, List, Map, Value, ValueRef};
use cinder_test_utils::{
    int_list, list_ints, map_keys, scenario_heap, string_key, string_map, AlignedHeap,
};

const PTR: usize = std::mem::size_of::<usize>();

// ── Arena ───────────────────────────────────────────────────────────

#[test]
fn sixty_four_byte_arena_layout() {
    let mut heap = AlignedHeap::<64>::new();
    let mut arena = Arena::new(heap.as_mut_slice());

    let first = arena.allocate_bytes(15).unwrap();
    assert_eq!(first.offset(), 0);

    let short = arena.allocate_var(2).unwrap();
    assert_eq!(short.offset(), 16);

    let record = arena.allocate_struct(PTR).unwrap();
    assert_eq!(record.offset() as usize, 16 + PTR);

    assert!(!arena.did_overflow());
    arena.reset();
    assert_eq!(arena.used_bytes(), 0);
}

#[test]
fn overflow_poisons_model_construction_until_reset() {
    let mut heap = AlignedHeap::<64>::new();
    let mut arena = Arena::new(heap.as_mut_slice());

    assert!(arena.allocate_bytes(60).is_ok());
    assert!(matches!(
        List::new(&mut arena),
        Err(ArenaError::Overflow { .. })
    ));
    // A one-byte bool would have fitted in the leftover space.
    assert!(ValueRef::new_bool(&mut arena, true).is_err());
    assert!(arena.did_overflow());

    arena.reset();
    assert!(List::new(&mut arena).is_ok());
}

// ── List ────────────────────────────────────────────────────────────

#[test]
fn list_removals_shift_positions() {
    let mut heap = scenario_heap();
    let mut arena = Arena::new(heap.as_mut_slice());
    let list = List::new(&mut arena).unwrap();
    for (i, n) in (10..15).enumerate() {
        let v = ValueRef::new_int(&mut arena, n).unwrap();
        list.insert_object(&mut arena, v, i as u32).unwrap();
    }
    assert_eq!(list_ints(&arena, list), vec![10, 11, 12, 13, 14]);

    assert!(list.remove_link(&mut arena, 1));
    assert_eq!(list_ints(&arena, list), vec![10, 12, 13, 14]);

    assert!(list.remove_link(&mut arena, 2));
    assert_eq!(list_ints(&arena, list), vec![10, 12, 14]);

    assert!(list.remove_link(&mut arena, 0));
    assert_eq!(list_ints(&arena, list), vec![12, 14]);

    assert!(list.remove_link(&mut arena, 1));
    assert_eq!(list_ints(&arena, list), vec![12]);
    assert_eq!(list.size(&arena), 1);
}

#[test]
fn nested_lists_hold_each_other_by_handle() {
    let mut heap = scenario_heap();
    let mut arena = Arena::new(heap.as_mut_slice());
    let inner = int_list(&mut arena, &[1, 2]);
    let outer = List::new(&mut arena).unwrap();
    let v = ValueRef::new_list(&mut arena, inner).unwrap();
    outer.append_object(&mut arena, v).unwrap();

    let got = outer.get_object(&arena, 0).unwrap().get_list(&arena).unwrap();
    assert_eq!(got, inner);

    let three = ValueRef::new_int(&mut arena, 3).unwrap();
    got.append_object(&mut arena, three).unwrap();
    assert_eq!(list_ints(&arena, inner), vec![1, 2, 3]);
}

// ── Map ─────────────────────────────────────────────────────────────

#[test]
fn map_param_reassignment() {
    let mut heap = scenario_heap();
    let mut arena = Arena::new(heap.as_mut_slice());
    let map = Map::new(&mut arena).unwrap();
    assert_eq!(map.size(&arena), 0);

    let key = string_key(&mut arena, "param1");
    let v25 = ValueRef::new_int(&mut arena, 25).unwrap();
    map.set_object(&mut arena, key, v25).unwrap();
    assert_eq!(map.size(&arena), 1);
    assert_eq!(map.get_object(&arena, key).unwrap().get_int(&arena), 25);

    let again = string_key(&mut arena, "param1");
    let v28 = ValueRef::new_int(&mut arena, 28).unwrap();
    map.set_object(&mut arena, again, v28).unwrap();
    assert_eq!(map.size(&arena), 1);
    assert_eq!(map.get_object(&arena, key).unwrap().get_int(&arena), 28);

    assert!(map.remove_object(&mut arena, key));
    assert_eq!(map.size(&arena), 0);
}

#[test]
fn map_reassignment_moves_key_last() {
    let mut heap = scenario_heap();
    let mut arena = Arena::new(heap.as_mut_slice());
    let map = string_map(&mut arena, &[("x", 1), ("y", 2), ("z", 3)]);
    assert_eq!(map_keys(&arena, map), ["x", "y", "z"]);

    let x = string_key(&mut arena, "x");
    let v = ValueRef::new_int(&mut arena, 10).unwrap();
    map.set_object(&mut arena, x, v).unwrap();
    assert_eq!(map_keys(&arena, map), ["y", "z", "x"]);
    assert_eq!(map.size(&arena), 3);
}

#[test]
fn value_set_is_visible_through_containers() {
    let mut heap = scenario_heap();
    let mut arena = Arena::new(heap.as_mut_slice());
    let map = string_map(&mut arena, &[("mode", 1)]);
    let key = string_key(&mut arena, "mode");
    let value = map.get_object(&arena, key).unwrap();

    value.set(&mut arena, Value::Float(0.5)).unwrap();
    assert_eq!(map.get_object(&arena, key).unwrap().get_float(&arena), 0.5);
}

// ── Provenance ──────────────────────────────────────────────────────

#[test]
fn handles_from_before_reset_are_rejected() {
    let mut heap = scenario_heap();
    let mut arena = Arena::new(heap.as_mut_slice());
    let list = int_list(&mut arena, &[1, 2, 3]);
    let map = string_map(&mut arena, &[("a", 1)]);

    arena.reset();
    assert_eq!(list.size(&arena), 0);
    assert_eq!(list.get_object(&arena, 0), None);
    assert_eq!(map.size(&arena), 0);

    let v = ValueRef::new_int(&mut arena, 4).unwrap();
    assert!(matches!(
        list.append_object(&mut arena, v),
        Err(ArenaError::StaleHandle { .. })
    ));
}

#[test]
fn foreign_handles_cannot_be_stored() {
    let mut heap_a = scenario_heap();
    let mut heap_b = scenario_heap();
    let mut a = Arena::new(heap_a.as_mut_slice());
    let mut b = Arena::new(heap_b.as_mut_slice());

    let list_b = List::new(&mut b).unwrap();
    let value_a = ValueRef::new_int(&mut a, 1).unwrap();
    assert!(matches!(
        list_b.append_object(&mut b, value_a),
        Err(ArenaError::ForeignHandle { .. })
    ));

    let list_a = List::new(&mut a).unwrap();
    assert!(matches!(
        ValueRef::new_list(&mut b, list_a),
        Err(ArenaError::ForeignHandle { .. })
    ));

    let link_a = Link::create(&mut a, value_a, None).unwrap();
    assert!(list_b.append_link(&mut b, link_a).is_err());
    assert_eq!(list_b.size(&b), 0);
}
