//! Fixed-buffer bump arena with generation-tagged handles.
//!
//! The arena borrows a caller-owned byte buffer and hands out consecutive
//! ranges of it. There is no per-allocation free; the whole arena is reset
//! at once. Allocations are addressed by handles rather than pointers:
//!
//! ```text
//! Arena<'heap>
//! ├── heap: &'heap mut [u8]      (caller-owned, fixed capacity)
//! ├── cursor                     (bump pointer, sticky past capacity)
//! ├── ArenaId                    (unique per arena instance)
//! └── Generation                 (bumped on reset/init)
//!
//! Region  { arena, generation, offset, len }   raw bytes
//! Ref<T>  { arena, generation, offset }        typed Record
//! ```
//!
//! Every handle is checked against the arena id, generation and allocated
//! bounds before use, so a handle that outlived a reset is an error value,
//! not a dangling read. This crate contains no `unsafe` code.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod bump;
pub mod config;
pub mod error;
pub mod handle;
pub mod heap;

// Public re-exports for the primary API surface.
pub use bump::Arena;
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use handle::{Ref, Region};
pub use heap::AlignedHeap;
