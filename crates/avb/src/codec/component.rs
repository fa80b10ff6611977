//! Component and clip family readers.
//!
//! Every reader here starts from the Component block and appends its own
//! block. None of them consume the record close marker.

use crate::codec::control_point::{read_control_points, read_value_type};
use crate::codec::mob_id::read_mob_id;
use crate::codec::primitives::Reader;
use crate::codec::tags::{unknown_extension, TAG_B, TAG_G, TAG_H};
use crate::error::DecodeError;
use crate::model::{ClassKind, PropertyTree, PropertyValue, StringEncoding, TreeKind};

// Block sub-kind markers
const COMPONENT_BLOCK: u8 = 0x03;
const CLIP_BLOCK: u8 = 0x01;
const SEQUENCE_BLOCK: u8 = 0x03;
const FILLER_BLOCK: u8 = 0x01;
const SOURCE_CLIP_BLOCK: u8 = 0x03;
const PARAMETER_CLIP_BLOCK: u8 = 0x01;
const TRACK_REFERENCE_BLOCK: u8 = 0x01;
const PARAMETER_ITEM_BLOCK: u8 = 0x02;

// Extension tags
const EXT_PARAM_LIST: u8 = 0x01;
const EXT_MOB_ID: u8 = 0x01;
const EXT_EXTRAP_KIND: u8 = 0x01;
const EXT_FIELDS: u8 = 0x02;
const EXT_CONTRIBS_TO_SIG: u8 = 0x01;

/// Reads the Component block shared by clips, sequences and track groups.
pub fn read_component(reader: &mut Reader<'_>, kind: ClassKind) -> Result<PropertyTree, DecodeError> {
    reader.open_block(COMPONENT_BLOCK)?;

    let mut tree = PropertyTree::new(TreeKind::Object(kind));
    tree.push_ref("left_bob", reader.read_ref("left_bob")?);
    tree.push_ref("right_bob", reader.read_ref("right_bob")?);
    tree.push_uint("media_kind_id", reader.read_u16("media_kind_id")?);
    tree.push_double("edit_rate", reader.read_exp10_f64("edit_rate")?);
    tree.push(
        "name",
        PropertyValue::String(reader.read_string(StringEncoding::MacRoman, "name")?),
    );
    tree.push(
        "effect_id",
        PropertyValue::String(reader.read_string(StringEncoding::MacRoman, "effect_id")?),
    );
    tree.push_ref("attributes", reader.read_ref("attributes")?);
    tree.push_ref("session_attrs", reader.read_ref("session_attrs")?);
    tree.push_ref("precomputed", reader.read_ref("precomputed")?);

    while reader.has_next_extension() {
        let (tag, offset) = reader.read_extension_tag()?;
        match tag {
            EXT_PARAM_LIST => {
                reader.expect_tag(TAG_H)?;
                tree.push_ref("param_list", reader.read_ref("param_list")?);
            }
            _ => return Err(unknown_extension(tag, offset)),
        }
    }

    Ok(tree)
}

/// Reads Component + the Clip block.
pub fn read_clip(reader: &mut Reader<'_>, kind: ClassKind) -> Result<PropertyTree, DecodeError> {
    let mut tree = read_component(reader, kind)?;
    reader.open_block(CLIP_BLOCK)?;
    tree.push_uint("length", reader.read_u32("length")?);
    Ok(tree)
}

pub fn read_sequence(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    let mut tree = read_component(reader, ClassKind::Sequence)?;
    reader.open_block(SEQUENCE_BLOCK)?;
    tree.push(
        "components",
        PropertyValue::ReferenceList(reader.read_ref_vec("components")?),
    );
    Ok(tree)
}

pub fn read_filler(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    let tree = read_clip(reader, ClassKind::Filler)?;
    reader.open_block(FILLER_BLOCK)?;
    Ok(tree)
}

/// Reads a SourceClip. The legacy mob id words are skipped; the MobID
/// arrives through extension 1 when present.
pub fn read_source_clip(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    let mut tree = read_clip(reader, ClassKind::SourceClip)?;
    reader.open_block(SOURCE_CLIP_BLOCK)?;

    reader.read_u32("mob_id_hi")?;
    reader.read_u32("mob_id_lo")?;
    tree.push_int("track_id", reader.read_i16("track_id")?);
    tree.push_int("start_time", reader.read_i32("start_time")?);

    while reader.has_next_extension() {
        let (tag, offset) = reader.read_extension_tag()?;
        match tag {
            EXT_MOB_ID => tree.push("mob_id", PropertyValue::MobId(read_mob_id(reader)?)),
            _ => return Err(unknown_extension(tag, offset)),
        }
    }

    Ok(tree)
}

/// Reads a ParameterClip and its keyframes.
///
/// An undeclared value type fails before the point count is read, even for
/// an empty track.
pub fn read_parameter_clip(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    let mut tree = read_clip(reader, ClassKind::ParameterClip)?;
    reader.open_block(PARAMETER_CLIP_BLOCK)?;

    tree.push_int("interp_kind", reader.read_i32("interp_kind")?);
    let value_type = read_value_type(reader)?;
    tree.push_int("value_type", value_type as u16);
    tree.push(
        "control_points",
        PropertyValue::ControlPoints(read_control_points(reader, value_type)?),
    );

    while reader.has_next_extension() {
        let (tag, offset) = reader.read_extension_tag()?;
        match tag {
            EXT_EXTRAP_KIND => {
                reader.expect_tag(TAG_G)?;
                tree.push_int("extrap_kind", reader.read_i32("extrap_kind")?);
            }
            EXT_FIELDS => {
                reader.expect_tag(TAG_G)?;
                tree.push_int("fields", reader.read_i32("fields")?);
            }
            _ => return Err(unknown_extension(tag, offset)),
        }
    }

    Ok(tree)
}

pub fn read_track_reference(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    let mut tree = read_clip(reader, ClassKind::TrackReference)?;
    reader.open_block(TRACK_REFERENCE_BLOCK)?;
    tree.push_int("relative_scope", reader.read_i16("relative_scope")?);
    tree.push_int("relative_track", reader.read_i16("relative_track")?);
    Ok(tree)
}

/// Reads a ParameterItem, a standalone record whose `value` field takes the
/// declared value type.
pub fn read_parameter_item(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    reader.open_block(PARAMETER_ITEM_BLOCK)?;

    let mut tree = PropertyTree::new(TreeKind::Object(ClassKind::ParameterItem));
    tree.push("uuid", PropertyValue::Uuid(reader.read_uuid("uuid")?));

    let value_type = reader.read_i16("value_type")?;
    tree.push_int("value_type", value_type);
    match value_type {
        1 => tree.push_int("value", reader.read_i32("value")?),
        2 => tree.push_double("value", reader.read_f64("value")?),
        4 => tree.push_ref("value", reader.read_ref("value")?),
        _ => {
            return Err(DecodeError::UnknownValueType {
                value: value_type as u16,
            });
        }
    }

    tree.push(
        "name",
        PropertyValue::String(reader.read_string(StringEncoding::MacRoman, "name")?),
    );
    tree.push_bool("enable", reader.read_bool("enable")?);
    tree.push_ref("control_track", reader.read_ref("control_track")?);

    while reader.has_next_extension() {
        let (tag, offset) = reader.read_extension_tag()?;
        match tag {
            EXT_CONTRIBS_TO_SIG => {
                reader.expect_tag(TAG_B)?;
                tree.push_bool("contribs_to_sig", reader.read_bool("contribs_to_sig")?);
            }
            _ => return Err(unknown_extension(tag, offset)),
        }
    }

    Ok(tree)
}
