//! Builders for common list and map fixtures.
//!
//! These panic on arena errors: a fixture that does not fit its heap is a
//! broken test, not a condition to handle.

use cinder_arena::Arena;
use cinder_model::{List, Map, ValueRef};

/// A string value holding `s`.
pub fn string_key(arena: &mut Arena<'_>, s: &str) -> ValueRef {
    ValueRef::new_string(arena, s).expect("string key fits the arena")
}

/// A list of `Int32` values appended in order.
pub fn int_list(arena: &mut Arena<'_>, values: &[i32]) -> List {
    let list = List::new(arena).expect("list header fits the arena");
    for &n in values {
        let v = ValueRef::new_int(arena, n).expect("int value fits the arena");
        list.append_object(arena, v).expect("link fits the arena");
    }
    list
}

/// A map from string keys to `Int32` values, set in order.
pub fn string_map(arena: &mut Arena<'_>, entries: &[(&str, i32)]) -> Map {
    let map = Map::new(arena).expect("map header fits the arena");
    for &(k, n) in entries {
        let key = string_key(arena, k);
        let v = ValueRef::new_int(arena, n).expect("int value fits the arena");
        map.set_object(arena, key, v).expect("entry fits the arena");
    }
    map
}

/// The `Int32` payloads of a list, head to tail.
pub fn list_ints(arena: &Arena<'_>, list: List) -> Vec<i32> {
    list.objects(arena).map(|v| v.get_int(arena)).collect()
}

/// The string keys of a map in iteration order.
pub fn map_keys(arena: &Arena<'_>, map: Map) -> Vec<String> {
    map.keys(arena)
        .filter_map(|k| k.get_str(arena).map(str::to_owned))
        .collect()
}
