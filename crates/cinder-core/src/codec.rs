//! Little-endian cursor codec for fixed-layout records.
//!
//! Records are written into exact-size byte windows handed out by the
//! arena. All integers are little-endian; optional record references are
//! stored as a `u32` offset with [`NONE_SLOT`] standing for "absent".
//! There is no padding and no self-describing schema.

/// Offset value marking an absent reference inside a record.
pub const NONE_SLOT: u32 = u32::MAX;

/// Sequential writer over a record's byte window.
///
/// # Panics
///
/// Every `put_*` method panics if the window is too short. Records size
/// their window from [`Record::SIZE`](crate::Record::SIZE), so this only
/// fires on a record whose `encode` disagrees with its declared size.
pub struct ByteWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> ByteWriter<'a> {
    /// Start writing at the beginning of `buf`.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes written so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn put(&mut self, bytes: &[u8]) {
        let end = self.pos + bytes.len();
        self.buf[self.pos..end].copy_from_slice(bytes);
        self.pos = end;
    }

    /// Write a single byte.
    pub fn put_u8(&mut self, v: u8) {
        self.put(&[v]);
    }

    /// Write a little-endian u32.
    pub fn put_u32(&mut self, v: u32) {
        self.put(&v.to_le_bytes());
    }

    /// Write a little-endian i32.
    pub fn put_i32(&mut self, v: i32) {
        self.put(&v.to_le_bytes());
    }

    /// Write a little-endian i64.
    pub fn put_i64(&mut self, v: i64) {
        self.put(&v.to_le_bytes());
    }

    /// Write a little-endian f64 (bit pattern preserved, NaN payloads included).
    pub fn put_f64(&mut self, v: f64) {
        self.put(&v.to_le_bytes());
    }

    /// Write an optional offset, using [`NONE_SLOT`] for `None`.
    pub fn put_slot(&mut self, v: Option<u32>) {
        self.put_u32(v.unwrap_or(NONE_SLOT));
    }

    /// Write `n` zero bytes.
    pub fn pad(&mut self, n: usize) {
        let end = self.pos + n;
        self.buf[self.pos..end].fill(0);
        self.pos = end;
    }
}

/// Sequential reader over a record's byte window.
///
/// # Panics
///
/// Every `get_*` method panics if the window is too short; see
/// [`ByteWriter`].
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Start reading at the beginning of `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    /// Read a single byte.
    pub fn get_u8(&mut self) -> u8 {
        self.take::<1>()[0]
    }

    /// Read a little-endian u32.
    pub fn get_u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take())
    }

    /// Read a little-endian i32.
    pub fn get_i32(&mut self) -> i32 {
        i32::from_le_bytes(self.take())
    }

    /// Read a little-endian i64.
    pub fn get_i64(&mut self) -> i64 {
        i64::from_le_bytes(self.take())
    }

    /// Read a little-endian f64.
    pub fn get_f64(&mut self) -> f64 {
        f64::from_le_bytes(self.take())
    }

    /// Read an optional offset written by [`ByteWriter::put_slot`].
    pub fn get_slot(&mut self) -> Option<u32> {
        match self.get_u32() {
            NONE_SLOT => None,
            v => Some(v),
        }
    }

    /// Skip `n` bytes.
    pub fn skip(&mut self, n: usize) {
        self.pos += n;
    }
}
