//! Test utilities for cinder development.
//!
//! Every test builds its own [`AlignedHeap`] and arena; nothing here is
//! shared between test functions. The [`fixtures`] module has builders for
//! the lists and maps most scenarios start from.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use cinder_arena::AlignedHeap;
pub use fixtures::{int_list, list_ints, map_keys, string_key, string_map};

/// Heap size that comfortably fits the fixture scenarios.
pub const SCENARIO_HEAP: usize = 4096;

/// A fresh heap of [`SCENARIO_HEAP`] bytes.
pub fn scenario_heap() -> Box<AlignedHeap<SCENARIO_HEAP>> {
    Box::new(AlignedHeap::new())
}
