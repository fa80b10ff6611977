//! Structural tags and the extension protocol.
//!
//! Records open with `0x02` plus a sub-kind marker and close with `0x03`.
//! Many fields are preceded by a one-byte type tag that must match. An
//! extensible record ends with any number of `0x01, tag, payload` triples;
//! the first byte that is not `0x01` ends the sequence and is left unread.

use crate::codec::primitives::Reader;
use crate::error::DecodeError;

/// Opens a field block; followed by a sub-kind marker.
pub const BLOCK_OPEN: u8 = 0x02;
/// Closes a record.
pub const RECORD_CLOSE: u8 = 0x03;
/// Announces an extension block.
pub const EXTENSION_CONTINUE: u8 = 0x01;

// Field type tags
pub const TAG_A: u8 = b'A';
pub const TAG_B: u8 = b'B';
pub const TAG_D: u8 = b'D';
pub const TAG_E: u8 = b'E';
pub const TAG_F: u8 = b'F';
pub const TAG_G: u8 = b'G';
pub const TAG_H: u8 = b'H';
pub const TAG_K: u8 = b'K';
pub const TAG_L: u8 = b'L';
pub const TAG_P: u8 = b'P';

impl Reader<'_> {
    /// Reads one byte and fails unless it equals `expected`.
    pub fn expect_tag(&mut self, expected: u8) -> Result<(), DecodeError> {
        let offset = self.position();
        let actual = self.read_byte("tag")?;
        if actual != expected {
            return Err(DecodeError::TagMismatch {
                expected,
                actual,
                offset,
            });
        }
        Ok(())
    }

    /// Reads the block open marker and the block's sub-kind marker.
    pub fn open_block(&mut self, kind: u8) -> Result<(), DecodeError> {
        self.expect_tag(BLOCK_OPEN)?;
        self.expect_tag(kind)
    }

    /// Reads the record close marker.
    pub fn close_record(&mut self) -> Result<(), DecodeError> {
        self.expect_tag(RECORD_CLOSE)
    }

    /// Returns true and consumes the marker if an extension block follows.
    ///
    /// Otherwise the next byte is left unread (also at end of input, where
    /// the caller's next read reports the truncation).
    pub fn has_next_extension(&mut self) -> bool {
        if self.peek_byte() == Some(EXTENSION_CONTINUE) {
            self.advance(1);
            true
        } else {
            false
        }
    }

    /// Reads an extension tag, returning it with its offset for error reports.
    pub fn read_extension_tag(&mut self) -> Result<(u8, usize), DecodeError> {
        let offset = self.position();
        let tag = self.read_byte("extension tag")?;
        Ok((tag, offset))
    }

    /// Reads a type tag followed by a u32 length that must equal `expected`.
    pub fn expect_fixed_length(
        &mut self,
        tag: u8,
        expected: u32,
        field: &'static str,
    ) -> Result<(), DecodeError> {
        self.expect_tag(tag)?;
        let actual = self.read_u32(field)?;
        if actual != expected {
            return Err(DecodeError::InvalidFixedLength {
                field,
                expected,
                actual,
            });
        }
        Ok(())
    }
}

/// Builds the error for an extension tag a reader does not know.
pub fn unknown_extension(tag: u8, offset: usize) -> DecodeError {
    DecodeError::UnknownExtensionTag { tag, offset }
}
