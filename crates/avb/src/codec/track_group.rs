//! TrackGroup family readers: the group itself, selectors, compositions,
//! rep sets and the time-warp effects.
//!
//! Track effects live in [`track_effect`](crate::codec::track_effect).

use crate::codec::component::read_component;
use crate::codec::mob_id::read_mob_id;
use crate::codec::primitives::Reader;
use crate::codec::tags::{unknown_extension, TAG_B, TAG_E, TAG_G, TAG_H, TAG_K};
use crate::error::DecodeError;
use crate::limits::MAX_ELEMENT_COUNT;
use crate::model::{ClassKind, PropertyTree, PropertyValue, TreeKind};

// Track flags, listed in field order
const TRACK_INDEX: u16 = 1 << 0;
const TRACK_ATTRIBUTES: u16 = 1 << 1;
const TRACK_SESSION_ATTR: u16 = 1 << 9;
const TRACK_COMPONENT: u16 = 1 << 2;
const TRACK_FILLER_PROXY: u16 = 1 << 3;
const TRACK_BOB_DATA: u16 = 1 << 4;
const TRACK_CONTROL_CODE: u16 = 1 << 5;
const TRACK_CONTROL_SUB_CODE: u16 = 1 << 6;
const TRACK_START_POS: u16 = 1 << 7;
const TRACK_READ_ONLY: u16 = 1 << 8;
const TRACK_RESERVED_MASK: u16 = 0xFC00;

// Block sub-kind markers
const TRACK_GROUP_BLOCK: u8 = 0x08;
const SELECTOR_BLOCK: u8 = 0x01;
const COMPOSITION_BLOCK: u8 = 0x02;
const REP_SET_BLOCK: u8 = 0x01;
const TIME_WARP_BLOCK: u8 = 0x02;
const CAPTURE_MASK_BLOCK: u8 = 0x01;
const MOTION_EFFECT_BLOCK: u8 = 0x03;
const REPEAT_BLOCK: u8 = 0x01;

// Extension tags
const EXT_LOCK_NUMBERS: u8 = 0x01;
const EXT_CREATION_TIME: u8 = 0x01;
const EXT_COMPOSITION_MOB_ID: u8 = 0x02;
const EXT_REP_SET_TYPE: u8 = 0x01;
const EXT_OFFSET_ADJUST: u8 = 0x01;
const EXT_SOURCE_PARAM_LIST: u8 = 0x02;
const EXT_NEW_SOURCE_CALCULATION: u8 = 0x03;

/// Reads Component + the TrackGroup block with its track list.
///
/// Each track is a child tree under `tracks`, holding only the fields its
/// flag word selects.
pub fn read_track_group(reader: &mut Reader<'_>, kind: ClassKind) -> Result<PropertyTree, DecodeError> {
    let mut tree = read_component(reader, kind)?;
    reader.open_block(TRACK_GROUP_BLOCK)?;

    tree.push_int("mc_mode", reader.read_byte("mc_mode")?);
    tree.push_int("length", reader.read_i32("length")?);
    tree.push_int("num_scalars", reader.read_i32("num_scalars")?);

    let track_count = reader.read_count(MAX_ELEMENT_COUNT, "tracks")?;
    // smallest track is a bare flag word
    let mut tracks = Vec::with_capacity(track_count.min(reader.remaining_len() / 2));
    for _ in 0..track_count {
        tracks.push(read_track(reader)?);
    }

    while reader.has_next_extension() {
        let (tag, offset) = reader.read_extension_tag()?;
        match tag {
            EXT_LOCK_NUMBERS => {
                for track in &mut tracks {
                    reader.expect_tag(TAG_E)?;
                    track.push_int("lock_number", reader.read_i16("lock_number")?);
                }
            }
            _ => return Err(unknown_extension(tag, offset)),
        }
    }

    tree.push("tracks", PropertyValue::Children(tracks));
    Ok(tree)
}

fn read_track(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    let flags = reader.read_u16("track_flags")?;
    if flags & TRACK_RESERVED_MASK != 0 {
        return Err(DecodeError::UnknownTrackFlags { flags });
    }

    let mut track = PropertyTree::new(TreeKind::Track);
    if flags & TRACK_INDEX != 0 {
        track.push_int("index", reader.read_i16("index")?);
    }
    if flags & TRACK_ATTRIBUTES != 0 {
        track.push_ref("attributes", reader.read_ref("attributes")?);
    }
    if flags & TRACK_SESSION_ATTR != 0 {
        track.push_ref("session_attr", reader.read_ref("session_attr")?);
    }
    if flags & TRACK_COMPONENT != 0 {
        track.push_ref("component", reader.read_ref("component")?);
    }
    if flags & TRACK_FILLER_PROXY != 0 {
        track.push_ref("filler_proxy", reader.read_ref("filler_proxy")?);
    }
    if flags & TRACK_BOB_DATA != 0 {
        track.push_ref("bob_data", reader.read_ref("bob_data")?);
    }
    if flags & TRACK_CONTROL_CODE != 0 {
        track.push_int("control_code", reader.read_i16("control_code")?);
    }
    if flags & TRACK_CONTROL_SUB_CODE != 0 {
        track.push_int("control_sub_code", reader.read_i16("control_sub_code")?);
    }
    if flags & TRACK_START_POS != 0 {
        track.push_int("start_pos", reader.read_i32("start_pos")?);
    }
    if flags & TRACK_READ_ONLY != 0 {
        track.push_bool("read_only", reader.read_bool("read_only")?);
    }

    Ok(track)
}

pub fn read_selector(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    let mut tree = read_track_group(reader, ClassKind::Selector)?;
    reader.open_block(SELECTOR_BLOCK)?;
    tree.push_bool("is_ganged", reader.read_bool("is_ganged")?);
    tree.push_uint("selected", reader.read_u16("selected")?);
    Ok(tree)
}

/// Reads a Composition (a mob). Like SourceClip, the legacy mob id words
/// are skipped in favor of the MobID extension.
pub fn read_composition(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    let mut tree = read_track_group(reader, ClassKind::Composition)?;
    reader.open_block(COMPOSITION_BLOCK)?;

    reader.read_u32("mob_id_hi")?;
    reader.read_u32("mob_id_lo")?;
    tree.push("last_modified", PropertyValue::Date(reader.read_u32("last_modified")?));
    tree.push_uint("mob_type_id", reader.read_byte("mob_type_id")?);
    tree.push_int("usage_code", reader.read_i32("usage_code")?);
    tree.push_ref("descriptor", reader.read_ref("descriptor")?);

    while reader.has_next_extension() {
        let (tag, offset) = reader.read_extension_tag()?;
        match tag {
            EXT_CREATION_TIME => {
                reader.expect_tag(TAG_G)?;
                tree.push("creation_time", PropertyValue::Date(reader.read_u32("creation_time")?));
            }
            EXT_COMPOSITION_MOB_ID => {
                tree.push("mob_id", PropertyValue::MobId(read_mob_id(reader)?));
            }
            _ => return Err(unknown_extension(tag, offset)),
        }
    }

    Ok(tree)
}

pub fn read_rep_set(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    let mut tree = read_track_group(reader, ClassKind::RepSet)?;
    reader.open_block(REP_SET_BLOCK)?;

    while reader.has_next_extension() {
        let (tag, offset) = reader.read_extension_tag()?;
        match tag {
            EXT_REP_SET_TYPE => {
                reader.expect_tag(TAG_G)?;
                tree.push_int("rep_set_type", reader.read_i32("rep_set_type")?);
            }
            _ => return Err(unknown_extension(tag, offset)),
        }
    }

    Ok(tree)
}

// =============================================================================
// TIME WARPS
// =============================================================================

/// Reads TrackGroup + the TimeWarp block.
pub fn read_time_warp(reader: &mut Reader<'_>, kind: ClassKind) -> Result<PropertyTree, DecodeError> {
    let mut tree = read_track_group(reader, kind)?;
    reader.open_block(TIME_WARP_BLOCK)?;
    tree.push_int("phase_offset", reader.read_i32("phase_offset")?);
    Ok(tree)
}

pub fn read_capture_mask(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    let mut tree = read_time_warp(reader, ClassKind::CaptureMask)?;
    reader.open_block(CAPTURE_MASK_BLOCK)?;
    tree.push_bool("is_double", reader.read_bool("is_double")?);
    tree.push_uint("mask_bits", reader.read_u32("mask_bits")?);
    Ok(tree)
}

/// Reads a MotionEffect; `rate` is a `[numerator, denominator]` pair.
pub fn read_motion_effect(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    let mut tree = read_time_warp(reader, ClassKind::MotionEffect)?;
    reader.open_block(MOTION_EFFECT_BLOCK)?;

    let num = reader.read_i32("rate")?;
    let den = reader.read_i32("rate")?;
    tree.push("rate", PropertyValue::IntArray(vec![i64::from(num), i64::from(den)]));

    while reader.has_next_extension() {
        let (tag, offset) = reader.read_extension_tag()?;
        match tag {
            EXT_OFFSET_ADJUST => {
                reader.expect_tag(TAG_K)?;
                tree.push_double("offset_adjust", reader.read_f64("offset_adjust")?);
            }
            EXT_SOURCE_PARAM_LIST => {
                reader.expect_tag(TAG_H)?;
                tree.push_ref("source_param_list", reader.read_ref("source_param_list")?);
            }
            EXT_NEW_SOURCE_CALCULATION => {
                reader.expect_tag(TAG_B)?;
                tree.push_bool(
                    "new_source_calculation",
                    reader.read_bool("new_source_calculation")?,
                );
            }
            _ => return Err(unknown_extension(tag, offset)),
        }
    }

    Ok(tree)
}

pub fn read_repeat(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    let tree = read_time_warp(reader, ClassKind::Repeat)?;
    reader.open_block(REPEAT_BLOCK)?;
    Ok(tree)
}
