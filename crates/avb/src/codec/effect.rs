//! Standalone effect records: parameter lists and graphic effects.

use crate::codec::primitives::Reader;
use crate::error::DecodeError;
use crate::limits::{MAX_BLOB_LEN, MAX_ELEMENT_COUNT};
use crate::model::{ClassKind, PropertyTree, PropertyValue, TreeKind};

const PARAMETER_LIST_BLOCK: u8 = 0x12;
const GRAPHIC_EFFECT_BLOCK: u8 = 0x01;

// Fixed-size part of one parameter, used to bound preallocation.
const MIN_PARAMETER_LEN: usize = 102;

/// Reads an EffectParameterList. Each entry becomes a child tree under
/// `parameters`; the record has no extensions.
pub fn read_effect_parameter_list(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    reader.open_block(PARAMETER_LIST_BLOCK)?;

    let mut tree = PropertyTree::new(TreeKind::Object(ClassKind::EffectParameterList));
    tree.push_int("orig_length", reader.read_i32("orig_length")?);
    tree.push_int("window_offset", reader.read_i32("window_offset")?);
    let count = reader.read_count(MAX_ELEMENT_COUNT, "parameters")?;
    tree.push_int("keyframe_size", reader.read_i32("keyframe_size")?);

    let mut parameters = Vec::with_capacity(count.min(reader.remaining_len() / MIN_PARAMETER_LEN));
    for _ in 0..count {
        parameters.push(read_parameter(reader)?);
    }
    tree.push("parameters", PropertyValue::Children(parameters));

    Ok(tree)
}

fn read_parameter(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    let mut param = PropertyTree::new(TreeKind::Parameter);

    for name in [
        "percent_time",
        "level",
        "pos_x",
        "floor_x",
        "ceil_x",
        "pos_y",
        "floor_y",
        "ceil_y",
        "scale_x",
        "scale_y",
        "crop_left",
        "crop_right",
        "crop_top",
        "crop_bottom",
    ] {
        param.push_int(name, reader.read_i32(name)?);
    }

    let mut bounds = Vec::with_capacity(4);
    for _ in 0..4 {
        bounds.push(i64::from(reader.read_i32("box")?));
    }
    param.push("box", PropertyValue::IntArray(bounds));

    for name in ["box_xscale", "box_yscale", "box_xpos", "box_ypos"] {
        param.push_bool(name, reader.read_bool(name)?);
    }

    param.push_int("border_width", reader.read_i32("border_width")?);
    param.push_int("border_soft", reader.read_i32("border_soft")?);

    for name in ["spill_gain2", "spill_gain", "spill_soft2", "spill_soft"] {
        param.push_int(name, reader.read_i16(name)?);
    }

    param.push_int("enable_key_flags", reader.read_i8("enable_key_flags")?);

    let color_count = reader.read_count(MAX_ELEMENT_COUNT, "colors")?;
    let mut colors = Vec::with_capacity(color_count.min(reader.remaining_len() / 4));
    for _ in 0..color_count {
        colors.push(i64::from(reader.read_i32("colors")?));
    }
    param.push("colors", PropertyValue::IntArray(colors));

    let user_param = reader.read_bytes_prefixed32(MAX_BLOB_LEN, "user_param")?;
    param.push("user_param", PropertyValue::Bytes(user_param.to_vec()));

    param.push_bool("selected", reader.read_bool("selected")?);

    Ok(param)
}

/// Reads a GraphicEffect: a single picture blob.
pub fn read_graphic_effect(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    reader.open_block(GRAPHIC_EFFECT_BLOCK)?;

    let mut tree = PropertyTree::new(TreeKind::Object(ClassKind::GraphicEffect));
    let pict_data = reader.read_bytes_prefixed32(MAX_BLOB_LEN, "pict_data")?;
    tree.push("pict_data", PropertyValue::Bytes(pict_data.to_vec()));

    Ok(tree)
}
