//! Fixed-layout record encoding.

use crate::codec::{ByteReader, ByteWriter};

/// A structure with a fixed byte layout that can live inside an arena.
///
/// The arena never stores Rust values directly: every link, container
/// header and value header is encoded into an exact-size byte window on
/// allocation and decoded again on access. Implementations must write and
/// read exactly [`SIZE`](Record::SIZE) bytes.
pub trait Record: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Encode `self` into a window of exactly `SIZE` bytes.
    fn encode(&self, w: &mut ByteWriter<'_>);

    /// Decode a value from a window of exactly `SIZE` bytes.
    fn decode(r: &mut ByteReader<'_>) -> Self;
}
