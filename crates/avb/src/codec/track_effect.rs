//! Track and transition effect readers.

use crate::codec::primitives::Reader;
use crate::codec::tags::{unknown_extension, TAG_G, TAG_H};
use crate::codec::track_group::read_track_group;
use crate::error::DecodeError;
use crate::limits::{MAX_BLOB_LEN, MAX_ELEMENT_COUNT};
use crate::model::{ClassKind, PropertyTree, PropertyValue, StringEncoding, TreeKind};

const TRACK_EFFECT_BLOCK: u8 = 0x06;
const TRANSITION_BLOCK: u8 = 0x01;
const TRANSITION_INFO_BLOCK: u8 = 0x05;
const PAN_VOLUME_BLOCK: u8 = 0x05;
const EQUALIZER_BLOCK: u8 = 0x05;
const ASPI_PLUGIN_BLOCK: u8 = 0x01;

// The trackman extension tag differs between track and transition effects.
const EXT_TRACK_EFFECT_TRACKMAN: u8 = 0x02;
const EXT_TRANSITION_TRACKMAN: u8 = 0x01;
const EXT_SUPPORTS_SEPARATE_GAIN: u8 = 0x01;
const EXT_IS_TRIM_GAIN_EFFECT: u8 = 0x02;

/// Reads the global-info field set shared by track and transition effects.
fn read_effect_info(reader: &mut Reader<'_>, tree: &mut PropertyTree) -> Result<(), DecodeError> {
    tree.push_int("left_length", reader.read_i32("left_length")?);
    tree.push_int("right_length", reader.read_i32("right_length")?);
    tree.push_int("info_version", reader.read_i16("info_version")?);
    tree.push_int("info_current", reader.read_i32("info_current")?);
    tree.push_int("info_smooth", reader.read_i32("info_smooth")?);
    tree.push_int("info_color_item", reader.read_i16("info_color_item")?);
    tree.push_int("info_quality", reader.read_i16("info_quality")?);
    tree.push_int("info_is_reversed", reader.read_i8("info_is_reversed")?);
    tree.push_bool("info_aspect_on", reader.read_bool("info_aspect_on")?);
    tree.push_ref("keyframes", reader.read_ref("keyframes")?);
    tree.push_bool("info_force_software", reader.read_bool("info_force_software")?);
    tree.push_bool("info_never_hardware", reader.read_bool("info_never_hardware")?);
    Ok(())
}

/// Reads TrackGroup + the TrackEffect block.
pub fn read_track_effect(reader: &mut Reader<'_>, kind: ClassKind) -> Result<PropertyTree, DecodeError> {
    let mut tree = read_track_group(reader, kind)?;
    reader.open_block(TRACK_EFFECT_BLOCK)?;
    read_effect_info(reader, &mut tree)?;

    while reader.has_next_extension() {
        let (tag, offset) = reader.read_extension_tag()?;
        match tag {
            EXT_TRACK_EFFECT_TRACKMAN => {
                reader.expect_tag(TAG_H)?;
                tree.push_ref("trackman", reader.read_ref("trackman")?);
            }
            _ => return Err(unknown_extension(tag, offset)),
        }
    }

    Ok(tree)
}

/// Reads a TransitionEffect: a cut point, then the effect info in its own
/// block.
pub fn read_transition_effect(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    let mut tree = read_track_group(reader, ClassKind::TransitionEffect)?;
    reader.open_block(TRANSITION_BLOCK)?;
    tree.push_int("cutpoint", reader.read_i32("cutpoint")?);

    reader.open_block(TRANSITION_INFO_BLOCK)?;
    read_effect_info(reader, &mut tree)?;

    while reader.has_next_extension() {
        let (tag, offset) = reader.read_extension_tag()?;
        match tag {
            EXT_TRANSITION_TRACKMAN => {
                reader.expect_tag(TAG_H)?;
                tree.push_ref("trackman", reader.read_ref("trackman")?);
            }
            _ => return Err(unknown_extension(tag, offset)),
        }
    }

    Ok(tree)
}

pub fn read_pan_volume_effect(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    let mut tree = read_track_effect(reader, ClassKind::PanVolumeEffect)?;
    reader.open_block(PAN_VOLUME_BLOCK)?;

    tree.push_int("level", reader.read_i32("level")?);
    tree.push_int("pan", reader.read_i32("pan")?);
    tree.push_bool("suppress_validation", reader.read_bool("suppress_validation")?);
    tree.push_bool("level_set", reader.read_bool("level_set")?);
    tree.push_bool("pan_set", reader.read_bool("pan_set")?);

    while reader.has_next_extension() {
        let (tag, offset) = reader.read_extension_tag()?;
        match tag {
            EXT_SUPPORTS_SEPARATE_GAIN => {
                reader.expect_tag(TAG_G)?;
                tree.push_int(
                    "supports_separate_gain",
                    reader.read_i32("supports_separate_gain")?,
                );
            }
            EXT_IS_TRIM_GAIN_EFFECT => {
                reader.expect_tag(TAG_G)?;
                tree.push_int("is_trim_gain_effect", reader.read_i32("is_trim_gain_effect")?);
            }
            _ => return Err(unknown_extension(tag, offset)),
        }
    }

    Ok(tree)
}

/// Reads an EqualizerMultiBand; each band becomes a child tree under `bands`.
pub fn read_equalizer(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    let mut tree = read_track_effect(reader, ClassKind::EqualizerMultiBand)?;
    reader.open_block(EQUALIZER_BLOCK)?;

    let band_count = reader.read_count(MAX_ELEMENT_COUNT, "bands")?;
    let mut bands = Vec::with_capacity(band_count.min(reader.remaining_len() / 17));
    for _ in 0..band_count {
        let mut band = PropertyTree::new(TreeKind::Band);
        band.push_int("type", reader.read_i32("band.type")?);
        band.push_int("freq", reader.read_i32("band.freq")?);
        band.push_int("gain", reader.read_i32("band.gain")?);
        band.push_int("q", reader.read_i32("band.q")?);
        band.push_bool("enable", reader.read_bool("band.enable")?);
        bands.push(band);
    }
    tree.push("bands", PropertyValue::Children(bands));

    tree.push_bool("effect_enable", reader.read_bool("effect_enable")?);
    tree.push(
        "filter_name",
        PropertyValue::String(reader.read_string(StringEncoding::MacRoman, "filter_name")?),
    );

    Ok(tree)
}

/// Reads an ASPIPluginClip: a list of audio plugins, each carrying its saved
/// state chunks as child trees.
pub fn read_aspi_plugin_clip(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    let mut tree = read_track_effect(reader, ClassKind::AspiPluginClip)?;
    reader.open_block(ASPI_PLUGIN_BLOCK)?;

    let plugin_count = reader.read_count(MAX_ELEMENT_COUNT, "plugins")?;
    // name prefix, three ids and the chunk count
    let mut plugins = Vec::with_capacity(plugin_count.min(reader.remaining_len() / 18));
    for _ in 0..plugin_count {
        plugins.push(read_plugin(reader)?);
    }
    tree.push("plugins", PropertyValue::Children(plugins));

    Ok(tree)
}

fn read_plugin(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    let mut plugin = PropertyTree::new(TreeKind::Plugin);
    plugin.push(
        "name",
        PropertyValue::String(reader.read_string(StringEncoding::MacRoman, "plugin.name")?),
    );
    plugin.push_uint("manufacturer_id", reader.read_u32("plugin.manufacturer_id")?);
    plugin.push_uint("product_id", reader.read_u32("plugin.product_id")?);
    plugin.push_uint("plugin_id", reader.read_u32("plugin.plugin_id")?);

    let chunk_count = reader.read_count(MAX_ELEMENT_COUNT, "chunks")?;
    let mut chunks = Vec::with_capacity(chunk_count.min(reader.remaining_len() / 26));
    for _ in 0..chunk_count {
        // the data size comes first but the data itself last
        let size = reader.read_count(MAX_BLOB_LEN, "chunk.size")?;

        let mut chunk = PropertyTree::new(TreeKind::Chunk);
        chunk.push_int("version", reader.read_i32("chunk.version")?);
        chunk.push_uint("manufacturer_id", reader.read_u32("chunk.manufacturer_id")?);
        chunk.push_uint("product_id", reader.read_u32("chunk.product_id")?);
        chunk.push_uint("plugin_id", reader.read_u32("chunk.plugin_id")?);
        chunk.push_uint("chunk_id", reader.read_u32("chunk.chunk_id")?);
        chunk.push(
            "name",
            PropertyValue::String(reader.read_string(StringEncoding::MacRoman, "chunk.name")?),
        );
        let data = reader.read_bytes(size, "chunk.data")?;
        chunk.push("data", PropertyValue::Bytes(data.to_vec()));
        chunks.push(chunk);
    }
    plugin.push("chunks", PropertyValue::Children(chunks));

    Ok(plugin)
}
