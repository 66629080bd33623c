//! Binary buffer writer.

/// An append-only binary writer over a growable byte vector.
///
/// # Example
///
/// ```
/// use structpack_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8(0x01);
/// writer.i32(2);
/// assert_eq!(writer.into_bytes(), [0x01, 0x02, 0x00, 0x00, 0x00]);
/// ```
#[derive(Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates a writer with preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True when nothing has been written yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes the writer and returns the written bytes.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// View of the written bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Writes an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    /// Writes a boolean as a single 0/1 byte.
    #[inline]
    pub fn bool(&mut self, val: bool) {
        self.buf.push(val as u8);
    }

    /// Writes a signed 32-bit integer (little-endian).
    #[inline]
    pub fn i32(&mut self, val: i32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes a signed 64-bit integer (little-endian).
    #[inline]
    pub fn i64(&mut self, val: i64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes an unsigned 64-bit integer (little-endian).
    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    /// Writes a 64-bit float as its IEEE-754 bit pattern (little-endian).
    ///
    /// NaN and infinity payloads are preserved bit-exact.
    #[inline]
    pub fn f64(&mut self, val: f64) {
        self.u64(val.to_bits());
    }

    /// Writes a raw byte slice.
    #[inline]
    pub fn buf(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes the UTF-8 bytes of a string. Returns the byte count written.
    #[inline]
    pub fn utf8(&mut self, s: &str) -> usize {
        self.buf.extend_from_slice(s.as_bytes());
        s.len()
    }
}
