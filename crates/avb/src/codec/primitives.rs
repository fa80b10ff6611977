//! Primitive decoding for AVB object bodies.
//!
//! All multi-byte values are little-endian. Strings carry a 16-bit length
//! prefix where `0xFFFF` means "no data"; blobs carry a 32-bit prefix with
//! no sentinel.

use uuid::Uuid;

use crate::error::DecodeError;
use crate::limits::{ABSENT_STRING_LEN, MAX_ELEMENT_COUNT, UUID_LEN};
use crate::model::{ObjectRef, StringEncoding, StringValue};

// =============================================================================
// DECODING
// =============================================================================

/// Reader for decoding one object body.
///
/// Wraps a byte slice and provides methods for reading primitives
/// with bounds checking and error handling. The position only moves
/// forward; lookahead goes through [`peek_byte`](Reader::peek_byte).
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader from a byte slice.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Returns the current position in the data.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns the remaining bytes.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// Returns the number of remaining bytes.
    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Returns true if all data has been consumed.
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Returns the next byte without consuming it.
    #[inline]
    pub fn peek_byte(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_byte(&mut self, context: &'static str) -> Result<u8, DecodeError> {
        match self.data.get(self.pos) {
            Some(&byte) => {
                self.pos += 1;
                Ok(byte)
            }
            None => Err(self.eof(context)),
        }
    }

    /// Reads exactly n bytes.
    #[inline]
    pub fn read_bytes(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining_len() {
            return Err(self.eof(context));
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Reads exactly N bytes into an array.
    #[inline]
    pub fn read_array<const N: usize>(&mut self, context: &'static str) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N, context)?);
        Ok(out)
    }

    /// Reads a signed byte.
    pub fn read_i8(&mut self, context: &'static str) -> Result<i8, DecodeError> {
        Ok(self.read_byte(context)? as i8)
    }

    #[inline]
    pub fn read_u16(&mut self, context: &'static str) -> Result<u16, DecodeError> {
        Ok(u16::from_le_bytes(self.read_array(context)?))
    }

    #[inline]
    pub fn read_i16(&mut self, context: &'static str) -> Result<i16, DecodeError> {
        Ok(i16::from_le_bytes(self.read_array(context)?))
    }

    #[inline]
    pub fn read_u32(&mut self, context: &'static str) -> Result<u32, DecodeError> {
        Ok(u32::from_le_bytes(self.read_array(context)?))
    }

    #[inline]
    pub fn read_i32(&mut self, context: &'static str) -> Result<i32, DecodeError> {
        Ok(i32::from_le_bytes(self.read_array(context)?))
    }

    #[inline]
    pub fn read_u64(&mut self, context: &'static str) -> Result<u64, DecodeError> {
        Ok(u64::from_le_bytes(self.read_array(context)?))
    }

    #[inline]
    pub fn read_i64(&mut self, context: &'static str) -> Result<i64, DecodeError> {
        Ok(i64::from_le_bytes(self.read_array(context)?))
    }

    /// Reads a little-endian f64. NaN and infinities are passed through.
    #[inline]
    pub fn read_f64(&mut self, context: &'static str) -> Result<f64, DecodeError> {
        Ok(f64::from_le_bytes(self.read_array(context)?))
    }

    /// Reads a decimal-exponent float: an i32 mantissa and an i16
    /// power-of-ten exponent, yielding `mantissa * 10^exponent`.
    pub fn read_exp10_f64(&mut self, context: &'static str) -> Result<f64, DecodeError> {
        let mantissa = self.read_i32(context)?;
        let exponent = self.read_i16(context)?;
        Ok(exp10_value(mantissa, exponent))
    }

    /// Reads a bool. Only `0x01` is true.
    #[inline]
    pub fn read_bool(&mut self, context: &'static str) -> Result<bool, DecodeError> {
        Ok(self.read_byte(context)? == 0x01)
    }

    /// Reads an object reference id.
    #[inline]
    pub fn read_ref(&mut self, context: &'static str) -> Result<ObjectRef, DecodeError> {
        self.read_u32(context)
    }

    /// Reads a 16-bit-length-prefixed byte string.
    ///
    /// A length of `0xFFFF` means absent and yields an empty slice with the
    /// reader left just past the length.
    pub fn read_bytes_prefixed16(&mut self, context: &'static str) -> Result<&'a [u8], DecodeError> {
        let len = self.read_u16(context)?;
        if len == ABSENT_STRING_LEN {
            return Ok(&[]);
        }
        self.read_bytes(len as usize, context)
    }

    /// Reads a 32-bit-length-prefixed byte string.
    pub fn read_bytes_prefixed32(
        &mut self,
        max_len: usize,
        field: &'static str,
    ) -> Result<&'a [u8], DecodeError> {
        let len = self.read_u32(field)? as usize;
        if len > max_len {
            return Err(DecodeError::LengthExceedsLimit {
                field,
                len,
                max: max_len,
            });
        }
        self.read_bytes(len, field)
    }

    /// Reads a 16-bit-length-prefixed string tagged with its encoding.
    pub fn read_string(
        &mut self,
        encoding: StringEncoding,
        context: &'static str,
    ) -> Result<StringValue, DecodeError> {
        let bytes = self.read_bytes_prefixed16(context)?;
        Ok(StringValue::new(encoding, bytes.to_vec()))
    }

    /// Reads 16 raw bytes as a UUID, in wire order.
    pub fn read_uuid(&mut self, context: &'static str) -> Result<Uuid, DecodeError> {
        Ok(Uuid::from_bytes(self.read_array::<UUID_LEN>(context)?))
    }

    /// Reads a u32 element count and checks it against `max`.
    pub fn read_count(&mut self, max: usize, field: &'static str) -> Result<usize, DecodeError> {
        let count = self.read_u32(field)? as usize;
        if count > max {
            return Err(DecodeError::LengthExceedsLimit {
                field,
                len: count,
                max,
            });
        }
        Ok(count)
    }

    /// Reads a u32 count followed by that many object references.
    pub fn read_ref_vec(&mut self, field: &'static str) -> Result<Vec<ObjectRef>, DecodeError> {
        let count = self.read_count(MAX_ELEMENT_COUNT, field)?;
        let mut refs = Vec::with_capacity(count.min(self.remaining_len() / 4));
        for _ in 0..count {
            refs.push(self.read_ref(field)?);
        }
        Ok(refs)
    }

    /// Skips bytes already checked with a lookahead.
    #[inline]
    pub(crate) fn advance(&mut self, n: usize) {
        debug_assert!(n <= self.remaining_len());
        self.pos += n;
    }

    fn eof(&self, context: &'static str) -> DecodeError {
        DecodeError::UnexpectedEnd {
            offset: self.pos,
            context,
        }
    }
}

/// Computes `mantissa * 10^exponent`.
///
/// Negative exponents divide by the power of ten (exact up to `1e22`), so
/// `2997e-2` yields the same `f64` as the literal `29.97`.
#[inline]
pub fn exp10_value(mantissa: i32, exponent: i16) -> f64 {
    let exponent = exponent as i32;
    if exponent >= 0 {
        mantissa as f64 * 10f64.powi(exponent)
    } else {
        mantissa as f64 / 10f64.powi(-exponent)
    }
}

// =============================================================================
// ENCODING (test fixtures)
// =============================================================================

/// Writer for building object bodies in tests.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct Writer {
    buf: Vec<u8>,
}

#[cfg(test)]
impl Writer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn write_byte(&mut self, byte: u8) -> &mut Self {
        self.buf.push(byte);
        self
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_i16(&mut self, value: i16) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_i32(&mut self, value: i32) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_u64(&mut self, value: u64) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_i64(&mut self, value: i64) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_f64(&mut self, value: f64) -> &mut Self {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_exp10(&mut self, mantissa: i32, exponent: i16) -> &mut Self {
        self.write_i32(mantissa).write_i16(exponent)
    }

    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.write_byte(value as u8)
    }

    /// Writes a block open marker followed by its sub-kind marker.
    pub fn open_block(&mut self, kind: u8) -> &mut Self {
        self.write_byte(0x02).write_byte(kind)
    }

    /// Writes an extension continue marker and the extension tag.
    pub fn extension(&mut self, tag: u8) -> &mut Self {
        self.write_byte(0x01).write_byte(tag)
    }

    pub fn close(&mut self) -> &mut Self {
        self.write_byte(0x03)
    }

    pub fn write_string16(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_u16(bytes.len() as u16).write_bytes(bytes)
    }

    pub fn write_bytes32(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_u32(bytes.len() as u32).write_bytes(bytes)
    }
}
