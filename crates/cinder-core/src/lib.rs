//! Core types and traits for the cinder arena data model.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the identifiers used to tag arena handles, the closed set of value
//! kinds, and the fixed-layout [`Record`] encoding every arena-resident
//! structure goes through.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod id;
pub mod kind;
pub mod traits;

pub use codec::{ByteReader, ByteWriter, NONE_SLOT};
pub use id::{ArenaId, Generation};
pub use kind::ValueKind;
pub use traits::Record;
