//! Media descriptor chain: MediaDescriptor, MediaFileDescriptor,
//! DIDDescriptor and CDCIDescriptor.

use crate::codec::primitives::Reader;
use crate::codec::tags::{unknown_extension, TAG_A, TAG_B, TAG_D, TAG_E, TAG_G, TAG_H, TAG_P};
use crate::error::DecodeError;
use crate::limits::{MAX_BLOB_LEN, UUID_LEN};
use crate::model::{ClassKind, PropertyTree, PropertyValue, TreeKind};

const MEDIA_DESCRIPTOR_BLOCK: u8 = 0x03;
const MEDIA_FILE_DESCRIPTOR_BLOCK: u8 = 0x03;
const DID_BLOCK: u8 = 0x02;
const CDCI_BLOCK: u8 = 0x02;

// MediaDescriptor extensions
const EXT_UUID: u8 = 0x01;
const EXT_WCHAR: u8 = 0x02;
const EXT_ATTRIBUTES: u8 = 0x03;

// DIDDescriptor extensions
const EXT_FRAME_INDEX_BYTE_ORDER: u8 = 0x01;
const EXT_FRAME_SAMPLE_SIZE: u8 = 0x02;
const EXT_FIRST_FRAME_OFFSET: u8 = 0x03;
const EXT_CLIENT_FILL: u8 = 0x04;
const EXT_OFFSET_TO_RLE_FRAME_INDEX: u8 = 0x05;
const EXT_FRAME_START_OFFSET: u8 = 0x06;
const EXT_BOXES: u8 = 0x08;
const EXT_FRAMING_BOX: u8 = 0x09;
const EXT_TRANSFER_CHARACTERISTIC: u8 = 0x0A;
const EXT_COLOR_PRIMARIES: u8 = 0x0B;
const EXT_ESSENCE_COMPRESSION: u8 = 0x0C;
const EXT_ESSENCE_ELEMENT_SIZE_KIND: u8 = 0x0E;
const EXT_FRAME_CHECKED_WITH_MAPPER: u8 = 0x0F;

// CDCIDescriptor extensions
const EXT_ALPHA_SAMPLED_WIDTH: u8 = 0x01;
const EXT_IGNORE_BW: u8 = 0x02;

const BOX_LEN: usize = 8;

/// Reads the MediaDescriptor block, the root of the descriptor chain.
pub fn read_media_descriptor(
    reader: &mut Reader<'_>,
    kind: ClassKind,
) -> Result<PropertyTree, DecodeError> {
    reader.open_block(MEDIA_DESCRIPTOR_BLOCK)?;

    let mut tree = PropertyTree::new(TreeKind::Object(kind));
    tree.push_uint("mob_kind", reader.read_byte("mob_kind")?);
    tree.push_ref("locator", reader.read_ref("locator")?);
    tree.push_bool("intermediate", reader.read_bool("intermediate")?);
    tree.push_ref("physical_media", reader.read_ref("physical_media")?);

    while reader.has_next_extension() {
        let (tag, offset) = reader.read_extension_tag()?;
        match tag {
            EXT_UUID => {
                reader.expect_fixed_length(TAG_A, UUID_LEN as u32, "uuid")?;
                tree.push("uuid", PropertyValue::Uuid(reader.read_uuid("uuid")?));
            }
            EXT_WCHAR => {
                reader.expect_tag(TAG_A)?;
                let data = reader.read_bytes_prefixed32(MAX_BLOB_LEN, "wchar")?;
                tree.push("wchar", PropertyValue::Bytes(data.to_vec()));
            }
            EXT_ATTRIBUTES => {
                reader.expect_tag(TAG_H)?;
                tree.push_ref("attributes", reader.read_ref("attributes")?);
            }
            _ => return Err(unknown_extension(tag, offset)),
        }
    }

    Ok(tree)
}

/// Reads MediaDescriptor + the MediaFileDescriptor block.
pub fn read_media_file_descriptor(
    reader: &mut Reader<'_>,
    kind: ClassKind,
) -> Result<PropertyTree, DecodeError> {
    let mut tree = read_media_descriptor(reader, kind)?;
    reader.open_block(MEDIA_FILE_DESCRIPTOR_BLOCK)?;

    tree.push_double("edit_rate", reader.read_exp10_f64("edit_rate")?);
    tree.push_int("length", reader.read_i32("length")?);
    tree.push_int("is_omfi", reader.read_i16("is_omfi")?);
    tree.push_int("data_offset", reader.read_i32("data_offset")?);

    Ok(tree)
}

/// Reads the descriptor chain through the DIDDescriptor block and its
/// numbered extensions.
pub fn read_did_descriptor(
    reader: &mut Reader<'_>,
    kind: ClassKind,
) -> Result<PropertyTree, DecodeError> {
    let mut tree = read_media_file_descriptor(reader, kind)?;
    reader.open_block(DID_BLOCK)?;

    for name in [
        "stored_height",
        "stored_width",
        "sampled_height",
        "sampled_width",
        "sampled_x_offset",
        "sampled_y_offset",
        "display_height",
        "display_width",
        "display_x_offset",
        "display_y_offset",
    ] {
        tree.push_int(name, reader.read_i32(name)?);
    }
    tree.push_int("frame_layout", reader.read_i16("frame_layout")?);

    let aspect = vec![
        i64::from(reader.read_i32("aspect_ratio")?),
        i64::from(reader.read_i32("aspect_ratio")?),
    ];
    tree.push("aspect_ratio", PropertyValue::IntArray(aspect));

    // the line map is prefixed with its size in bytes
    let line_map_size = reader.read_count(MAX_BLOB_LEN, "line_map")?;
    let line_map_len = line_map_size / 4;
    let mut line_map = Vec::with_capacity(line_map_len.min(reader.remaining_len() / 4));
    for _ in 0..line_map_len {
        line_map.push(i64::from(reader.read_i32("line_map")?));
    }
    tree.push("line_map", PropertyValue::IntArray(line_map));

    tree.push_int("alpha_transparency", reader.read_i32("alpha_transparency")?);
    tree.push_bool("uniformness", reader.read_bool("uniformness")?);
    tree.push_int("did_image_size", reader.read_i32("did_image_size")?);
    tree.push_ref("next_did_desc", reader.read_ref("next_did_desc")?);

    let mut compress_method = reader.read_array::<4>("compress_method")?;
    compress_method.reverse();
    tree.push("compress_method", PropertyValue::Bytes(compress_method.to_vec()));

    tree.push_int("resolution_id", reader.read_i32("resolution_id")?);
    tree.push_int("image_alignment_factor", reader.read_i32("image_alignment_factor")?);

    while reader.has_next_extension() {
        let (tag, offset) = reader.read_extension_tag()?;
        match tag {
            EXT_FRAME_INDEX_BYTE_ORDER => {
                reader.expect_tag(TAG_E)?;
                tree.push_int("frame_index_byte_order", reader.read_i16("frame_index_byte_order")?);
            }
            EXT_FRAME_SAMPLE_SIZE => read_tagged_i32(reader, &mut tree, "frame_sample_size")?,
            EXT_FIRST_FRAME_OFFSET => read_tagged_i32(reader, &mut tree, "first_frame_offset")?,
            EXT_CLIENT_FILL => {
                read_tagged_i32(reader, &mut tree, "client_fill_start")?;
                read_tagged_i32(reader, &mut tree, "client_fill_end")?;
            }
            EXT_OFFSET_TO_RLE_FRAME_INDEX => {
                read_tagged_i32(reader, &mut tree, "offset_to_rle_frame_index")?
            }
            EXT_FRAME_START_OFFSET => read_tagged_i32(reader, &mut tree, "frame_start_offset")?,
            EXT_BOXES => {
                read_box(reader, &mut tree, "valid_box")?;
                read_box(reader, &mut tree, "essence_box")?;
                read_box(reader, &mut tree, "source_box")?;
            }
            EXT_FRAMING_BOX => {
                read_box(reader, &mut tree, "framing_box")?;
                read_tagged_i32(reader, &mut tree, "reformatting_option")?;
            }
            EXT_TRANSFER_CHARACTERISTIC => read_tagged_uuid(reader, &mut tree, "transfer_characteristic")?,
            EXT_COLOR_PRIMARIES => {
                read_tagged_uuid(reader, &mut tree, "color_primaries")?;
                read_tagged_uuid(reader, &mut tree, "coding_equations")?;
            }
            EXT_ESSENCE_COMPRESSION => read_tagged_uuid(reader, &mut tree, "essence_compression")?,
            EXT_ESSENCE_ELEMENT_SIZE_KIND => {
                reader.expect_tag(TAG_D)?;
                tree.push_int(
                    "essence_element_size_kind",
                    reader.read_byte("essence_element_size_kind")?,
                );
            }
            EXT_FRAME_CHECKED_WITH_MAPPER => {
                reader.expect_tag(TAG_B)?;
                tree.push_bool(
                    "frame_checked_with_mapper",
                    reader.read_bool("frame_checked_with_mapper")?,
                );
            }
            _ => return Err(unknown_extension(tag, offset)),
        }
    }

    Ok(tree)
}

/// Reads the full chain through the CDCIDescriptor block.
pub fn read_cdci_descriptor(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    let mut tree = read_did_descriptor(reader, ClassKind::CdciDescriptor)?;
    reader.open_block(CDCI_BLOCK)?;

    tree.push_uint("horizontal_subsampling", reader.read_u32("horizontal_subsampling")?);
    tree.push_uint("vertical_subsampling", reader.read_u32("vertical_subsampling")?);
    tree.push_uint("component_width", reader.read_u32("component_width")?);
    tree.push_int("color_siting", reader.read_i16("color_siting")?);
    tree.push_uint("black_ref_level", reader.read_u32("black_ref_level")?);
    tree.push_uint("white_ref_level", reader.read_u32("white_ref_level")?);
    tree.push_uint("color_range", reader.read_u32("color_range")?);
    tree.push_int("frame_index_offset", reader.read_i64("frame_index_offset")?);

    while reader.has_next_extension() {
        let (tag, offset) = reader.read_extension_tag()?;
        match tag {
            EXT_ALPHA_SAMPLED_WIDTH => {
                reader.expect_tag(TAG_H)?;
                tree.push_uint("alpha_sampled_width", reader.read_u32("alpha_sampled_width")?);
            }
            EXT_IGNORE_BW => {
                reader.expect_tag(TAG_H)?;
                tree.push_uint("ignore_bw", reader.read_u32("ignore_bw")?);
            }
            _ => return Err(unknown_extension(tag, offset)),
        }
    }

    Ok(tree)
}

fn read_tagged_i32(
    reader: &mut Reader<'_>,
    tree: &mut PropertyTree,
    name: &'static str,
) -> Result<(), DecodeError> {
    reader.expect_tag(TAG_G)?;
    tree.push_int(name, reader.read_i32(name)?);
    Ok(())
}

fn read_tagged_uuid(
    reader: &mut Reader<'_>,
    tree: &mut PropertyTree,
    name: &'static str,
) -> Result<(), DecodeError> {
    reader.expect_tag(TAG_P)?;
    tree.push(name, PropertyValue::Uuid(reader.read_uuid(name)?));
    Ok(())
}

/// Reads eight `'G'`-tagged i32 values into an int array.
fn read_box(
    reader: &mut Reader<'_>,
    tree: &mut PropertyTree,
    name: &'static str,
) -> Result<(), DecodeError> {
    let mut values = Vec::with_capacity(BOX_LEN);
    for _ in 0..BOX_LEN {
        reader.expect_tag(TAG_G)?;
        values.push(i64::from(reader.read_i32(name)?));
    }
    tree.push(name, PropertyValue::IntArray(values));
    Ok(())
}
