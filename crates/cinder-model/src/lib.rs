//! Dynamic data model on top of a cinder arena.
//!
//! Lists, maps and tagged-union values built entirely from arena records:
//!
//! ```text
//! Map ──► List ──► Link ◄──► Link ◄──► Link
//!                   │  │
//!                   │  └── key:   ValueRef  (maps only)
//!                   └───── value: ValueRef ──► payload
//! ```
//!
//! Every type here is a small `Copy` handle. Reads take `&Arena`,
//! mutations take `&mut Arena`, and every entity becomes stale once its
//! arena is reset.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod link;
pub mod list;
pub mod map;
pub mod value;

pub use link::Link;
pub use list::{Links, List, Objects};
pub use map::{Entries, Map};
pub use value::{Value, ValueRef};
