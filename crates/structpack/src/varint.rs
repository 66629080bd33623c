//! Variable-length integer primitives.
//!
//! Lengths, counts and union discriminators all travel as unsigned varints:
//! 7 data bits per byte, least significant group first, high bit set on every
//! byte except the last. Encoding is always minimal; decoding accepts any
//! well-formed encoding of the same value, minimal or not.

use structpack_buffers::{Reader, Writer};

use crate::error::{DecodeError, SchemaError};

/// Reserved varint value that encodes "absent" for reference-typed values.
/// Never written as a real length or count.
pub const NULL_SENTINEL: u64 = u64::MAX;

/// Longest legal varint: ten bytes carry 70 bits, enough for any u64.
const MAX_VARINT_LEN: usize = 10;

/// Writes `value` as a minimal varint.
pub fn write_varint(writer: &mut Writer, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            writer.u8(byte);
            return;
        }
        writer.u8(byte | 0x80);
    }
}

/// Reads a varint. Fails with [`DecodeError::InvalidVarint`] when the
/// encoding runs past ten bytes or carries bits above the 64th.
pub fn read_varint(reader: &mut Reader) -> Result<u64, DecodeError> {
    let mut result: u64 = 0;
    let mut shift = 0u32;
    for _ in 0..MAX_VARINT_LEN {
        let byte = reader.u8()?;
        let bits = (byte & 0x7f) as u64;
        if shift >= 64 || (shift > 57 && (bits >> (64 - shift)) != 0) {
            return Err(DecodeError::InvalidVarint);
        }
        result |= bits << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
    Err(DecodeError::InvalidVarint)
}

/// Writes a length or count, or the null sentinel for an absent value.
///
/// A genuine length equal to the sentinel cannot be represented and fails
/// with [`SchemaError::LengthOverflow`].
pub fn write_length(writer: &mut Writer, length: Option<usize>) -> Result<(), SchemaError> {
    match length {
        Some(len) => {
            let len = len as u64;
            if len == NULL_SENTINEL {
                return Err(SchemaError::LengthOverflow);
            }
            write_varint(writer, len);
            Ok(())
        }
        None => {
            write_varint(writer, NULL_SENTINEL);
            Ok(())
        }
    }
}

/// Reads a length or count; `None` means the null sentinel was present.
pub fn read_length(reader: &mut Reader) -> Result<Option<u64>, DecodeError> {
    match read_varint(reader)? {
        NULL_SENTINEL => Ok(None),
        len => Ok(Some(len)),
    }
}
