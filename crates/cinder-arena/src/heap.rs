//! Fixed-size backing buffers.

/// A fixed byte buffer aligned to 16 bytes.
///
/// Arena alignment is computed on absolute addresses, so a buffer whose
/// start is already aligned makes offsets and addresses agree for every
/// alignment up to 16. Handy as a `static` or stack-allocated heap on
/// targets without an allocator.
#[repr(C, align(16))]
pub struct AlignedHeap<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> AlignedHeap<N> {
    /// Total size in bytes.
    pub const SIZE: usize = N;

    /// A zeroed buffer.
    pub const fn new() -> Self {
        Self { bytes: [0; N] }
    }

    /// Borrow the buffer for an arena.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Read-only view of the raw bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

impl<const N: usize> Default for AlignedHeap<N> {
    fn default() -> Self {
        Self::new()
    }
}
