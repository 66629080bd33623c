//! Byte-level buffer primitives shared by the structpack codec.
//!
//! All multi-byte integers are little-endian, matching the structpack wire
//! format. The [`Reader`] is fully bounds-checked: every read returns a
//! `Result` and the cursor never advances on failure.

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

/// Error raised by buffer reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BufferError {
    /// A read would run past the end of the buffer.
    #[error("end of buffer")]
    EndOfBuffer,
    /// The requested bytes are not valid UTF-8.
    #[error("invalid UTF-8")]
    InvalidUtf8,
}
