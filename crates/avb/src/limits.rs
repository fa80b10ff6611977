//! Allocation limits applied while decoding.
//!
//! Counts and length prefixes come straight from the input, so each one is
//! checked against these bounds before anything is allocated for it.

/// Maximum number of elements in any count-prefixed list (reference lists,
/// tracks, control points, parameters, colors, attributes, bands).
pub const MAX_ELEMENT_COUNT: usize = 1 << 20;

/// Maximum number of secondary values attached to one control point.
pub const MAX_PER_POINT_COUNT: usize = u16::MAX as usize;

/// Maximum length in bytes of a 32-bit-prefixed blob or line map.
pub const MAX_BLOB_LEN: usize = 64 * 1024 * 1024;

/// Length of a MobID in bytes.
pub const MOB_ID_LEN: usize = 32;

/// Length of a raw UUID in bytes.
pub const UUID_LEN: usize = 16;

/// Sentinel 16-bit string length meaning "no data".
pub const ABSENT_STRING_LEN: u16 = 0xFFFF;
