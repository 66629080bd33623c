//! Bounds-checked binary buffer reader.

use std::str;

use crate::BufferError;

/// A cursor over a byte slice with an exclusive end bound.
///
/// Every read checks the remaining window first and leaves the cursor in
/// place on failure, so a decoder can keep using the reader after an error.
///
/// # Example
///
/// ```
/// use structpack_buffers::Reader;
///
/// let data = [0x2a, 0x00, 0x00, 0x00];
/// let mut reader = Reader::new(&data);
/// assert_eq!(reader.i32(), Ok(42));
/// assert_eq!(reader.remaining(), 0);
/// ```
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Reader<'a> {
    /// Creates a reader over the whole slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            end: data.len(),
        }
    }

    /// Current cursor position, relative to the slice start.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Number of readable bytes left in this reader's window.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.end - self.pos
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        if self.remaining() < n {
            Err(BufferError::EndOfBuffer)
        } else {
            Ok(())
        }
    }

    /// Advances the cursor by `n` bytes without reading them.
    pub fn skip(&mut self, n: usize) -> Result<(), BufferError> {
        self.check(n)?;
        self.pos += n;
        Ok(())
    }

    /// Splits off a sub-reader over the next `n` bytes and advances past them.
    ///
    /// The sub-reader cannot see past its window, which is what makes
    /// length-delimited field decoding safe against lying prefixes.
    pub fn window(&mut self, n: usize) -> Result<Reader<'a>, BufferError> {
        self.check(n)?;
        let sub = Reader {
            data: self.data,
            pos: self.pos,
            end: self.pos + n,
        };
        self.pos += n;
        Ok(sub)
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.data[self.pos];
        self.pos += 1;
        Ok(val)
    }

    /// Reads a signed 32-bit little-endian integer.
    #[inline]
    pub fn i32(&mut self) -> Result<i32, BufferError> {
        self.check(4)?;
        let val = i32::from_le_bytes(
            self.data[self.pos..self.pos + 4]
                .try_into()
                .map_err(|_| BufferError::EndOfBuffer)?,
        );
        self.pos += 4;
        Ok(val)
    }

    /// Reads a signed 64-bit little-endian integer.
    #[inline]
    pub fn i64(&mut self) -> Result<i64, BufferError> {
        self.check(8)?;
        let val = i64::from_le_bytes(
            self.data[self.pos..self.pos + 8]
                .try_into()
                .map_err(|_| BufferError::EndOfBuffer)?,
        );
        self.pos += 8;
        Ok(val)
    }

    /// Reads an unsigned 64-bit little-endian integer.
    #[inline]
    pub fn u64(&mut self) -> Result<u64, BufferError> {
        self.check(8)?;
        let val = u64::from_le_bytes(
            self.data[self.pos..self.pos + 8]
                .try_into()
                .map_err(|_| BufferError::EndOfBuffer)?,
        );
        self.pos += 8;
        Ok(val)
    }

    /// Reads a 64-bit float from its little-endian IEEE-754 bit pattern.
    #[inline]
    pub fn f64(&mut self) -> Result<f64, BufferError> {
        Ok(f64::from_bits(self.u64()?))
    }

    /// Reads `n` raw bytes.
    pub fn buf(&mut self, n: usize) -> Result<&'a [u8], BufferError> {
        self.check(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Reads `n` bytes as UTF-8. The cursor does not advance when the bytes
    /// are not valid UTF-8.
    pub fn utf8(&mut self, n: usize) -> Result<&'a str, BufferError> {
        self.check(n)?;
        let s = str::from_utf8(&self.data[self.pos..self.pos + n])
            .map_err(|_| BufferError::InvalidUtf8)?;
        self.pos += n;
        Ok(s)
    }
}
