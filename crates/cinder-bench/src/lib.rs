//! Benchmark workloads for the cinder arena and data model.
//!
//! - [`fill_mixed`]: allocate until the arena overflows, mixing widths
//! - [`build_keyed_map`]: a map of `n` string keys, for lookup benches

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use cinder_arena::{Arena, ArenaError};
use cinder_model::{Map, ValueRef};

/// Allocate a repeating pattern of raw, primitive and struct regions until
/// the arena overflows. Returns the number of successful allocations.
pub fn fill_mixed(arena: &mut Arena<'_>) -> usize {
    let mut count = 0;
    loop {
        let result = match count % 3 {
            0 => arena.allocate_bytes(5),
            1 => arena.allocate_var(8),
            _ => arena.allocate_struct(16),
        };
        if result.is_err() {
            return count;
        }
        count += 1;
    }
}

/// Key name used for entry `i` of [`build_keyed_map`].
pub fn key_name(i: usize) -> String {
    format!("key{i:04}")
}

/// Build a map of `n` entries `key{i} -> i`.
pub fn build_keyed_map(arena: &mut Arena<'_>, n: usize) -> Result<Map, ArenaError> {
    let map = Map::new(arena)?;
    for i in 0..n {
        let key = ValueRef::new_string(arena, key_name(i))?;
        let value = ValueRef::new_long(arena, i as i64)?;
        map.set_object(arena, key, value)?;
    }
    Ok(map)
}
