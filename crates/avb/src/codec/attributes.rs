//! Attribute list reader.
//!
//! Attribute blocks are not property trees: they decode to a flat list of
//! named, typed entries.

use crate::codec::primitives::Reader;
use crate::error::DecodeError;
use crate::limits::{MAX_BLOB_LEN, MAX_ELEMENT_COUNT};
use crate::model::{AttributeEntry, AttributeType, AttributeValue, StringEncoding};

const ATTRIBUTES_BLOCK: u8 = 0x01;

/// Reads an attribute block, including its close marker.
pub fn read_attributes(reader: &mut Reader<'_>) -> Result<Vec<AttributeEntry>, DecodeError> {
    reader.open_block(ATTRIBUTES_BLOCK)?;

    let count = reader.read_count(MAX_ELEMENT_COUNT, "attributes")?;
    // smallest entry is type + empty name + int
    let mut entries = Vec::with_capacity(count.min(reader.remaining_len() / 10));
    for _ in 0..count {
        entries.push(read_entry(reader)?);
    }

    reader.close_record()?;
    Ok(entries)
}

fn read_entry(reader: &mut Reader<'_>) -> Result<AttributeEntry, DecodeError> {
    let value = reader.read_u32("attribute.type")?;
    let attr_type = AttributeType::from_u32(value).ok_or(DecodeError::UnknownAttributeType { value })?;
    let name = reader.read_string(StringEncoding::MacRoman, "attribute.name")?;

    let value = match attr_type {
        AttributeType::Int => AttributeValue::Int(reader.read_i32("attribute.int")?),
        AttributeType::String => {
            AttributeValue::String(reader.read_string(StringEncoding::MacRoman, "attribute.string")?)
        }
        AttributeType::Object => AttributeValue::Object(reader.read_ref("attribute.object")?),
        AttributeType::Blob => AttributeValue::Blob(
            reader
                .read_bytes_prefixed32(MAX_BLOB_LEN, "attribute.blob")?
                .to_vec(),
        ),
    };

    Ok(AttributeEntry { name, value })
}
