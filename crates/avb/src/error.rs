//! Error types for AVB object-body decoding.

use thiserror::Error;

/// Broad classification of a [`DecodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// E001: Input ended before the record was complete
    Truncated,
    /// E002: Structural tag or fixed-length check failed
    Structure,
    /// E003: Extension, flag, value type, or class the decoder does not know
    Unsupported,
    /// E004: A count or length exceeds the configured limits
    Limit,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::Truncated => "E001",
            ErrorCode::Structure => "E002",
            ErrorCode::Unsupported => "E003",
            ErrorCode::Limit => "E004",
        }
    }
}

/// Error during object-body decoding.
///
/// Every variant is terminal for the object being decoded; no partial
/// property tree is returned alongside it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    // === E001: Truncated ===
    #[error("[E001] unexpected end of input at offset {offset} while reading {context}")]
    UnexpectedEnd { offset: usize, context: &'static str },

    // === E002: Structure ===
    #[error("[E002] tag mismatch at offset {offset}: expected 0x{expected:02X}, found 0x{actual:02X}")]
    TagMismatch { expected: u8, actual: u8, offset: usize },

    #[error("[E002] {field} length {actual} does not match required length {expected}")]
    InvalidFixedLength {
        field: &'static str,
        expected: u32,
        actual: u32,
    },

    #[error("[E002] {remaining} trailing bytes after record end at offset {offset}")]
    TrailingBytes { offset: usize, remaining: usize },

    // === E003: Unsupported ===
    #[error("[E003] unknown extension tag 0x{tag:02X} at offset {offset}")]
    UnknownExtensionTag { tag: u8, offset: usize },

    #[error("[E003] unknown track flags 0x{flags:04X}")]
    UnknownTrackFlags { flags: u16 },

    #[error("[E003] unknown value type: {value}")]
    UnknownValueType { value: u16 },

    #[error("[E003] unknown attribute type: {value}")]
    UnknownAttributeType { value: u32 },

    #[error("[E003] unknown class id '{}'", .fourcc.escape_ascii())]
    UnknownClass { fourcc: [u8; 4] },

    // === E004: Limits ===
    #[error("[E004] {field} length {len} exceeds maximum {max}")]
    LengthExceedsLimit {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

impl DecodeError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DecodeError::UnexpectedEnd { .. } => ErrorCode::Truncated,
            DecodeError::TagMismatch { .. }
            | DecodeError::InvalidFixedLength { .. }
            | DecodeError::TrailingBytes { .. } => ErrorCode::Structure,
            DecodeError::LengthExceedsLimit { .. } => ErrorCode::Limit,
            _ => ErrorCode::Unsupported,
        }
    }

    /// Returns the byte offset the error was detected at, when known.
    pub fn offset(&self) -> Option<usize> {
        match self {
            DecodeError::UnexpectedEnd { offset, .. }
            | DecodeError::TagMismatch { offset, .. }
            | DecodeError::TrailingBytes { offset, .. }
            | DecodeError::UnknownExtensionTag { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}
