//! Cinder: a bump arena over a caller-supplied buffer, and a small dynamic
//! data model (lists, maps, tagged values) living entirely inside it.
//!
//! This is the facade crate that re-exports the public API of the cinder
//! sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use cinder::prelude::*;
//!
//! let mut heap = AlignedHeap::<1024>::new();
//! let mut arena = Arena::new(heap.as_mut_slice());
//!
//! let config = Map::new(&mut arena)?;
//! let key = ValueRef::new_string(&mut arena, "retries")?;
//! let value = ValueRef::new_int(&mut arena, 3)?;
//! config.set_object(&mut arena, key, value)?;
//!
//! let probe = ValueRef::new_string(&mut arena, "retries")?;
//! assert_eq!(config.get_object(&arena, probe).map(|v| v.get_int(&arena)), Some(3));
//!
//! // Everything above goes stale at once.
//! arena.reset();
//! assert_eq!(config.size(&arena), 0);
//! # Ok::<(), ArenaError>(())
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `cinder-arena` | `Arena`, config, errors, handles |
//! | [`model`] | `cinder-model` | `Link`, `List`, `Map`, `ValueRef` |
//! | [`types`] | `cinder-core` | ids, `ValueKind`, the `Record` trait |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// The bump allocator and its handles (`cinder-arena`).
pub use cinder_arena as arena;

/// Lists, maps and variant values (`cinder-model`).
pub use cinder_model as model;

/// Ids, value kinds and record encoding (`cinder-core`).
pub use cinder_core as types;

/// Common imports for typical cinder usage.
pub mod prelude {
    pub use cinder_arena::{AlignedHeap, Arena, ArenaConfig, ArenaError, Ref, Region};
    pub use cinder_core::ValueKind;
    pub use cinder_model::{Link, List, Map, Value, ValueRef};
}
