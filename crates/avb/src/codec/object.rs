//! Object-body decoding entry points.
//!
//! The container layer hands over a class kind (or its four-character code)
//! and the raw body bytes; the matching reader runs on a fresh [`Reader`]
//! and the record must end with exactly one close marker.

use tracing::{debug, trace};

use crate::codec::attributes::read_attributes;
use crate::codec::component::{
    read_filler, read_parameter_clip, read_parameter_item, read_sequence, read_source_clip,
    read_track_reference,
};
use crate::codec::descriptor::{
    read_cdci_descriptor, read_did_descriptor, read_media_descriptor, read_media_file_descriptor,
};
use crate::codec::effect::{read_effect_parameter_list, read_graphic_effect};
use crate::codec::locator::read_file_locator;
use crate::codec::primitives::Reader;
use crate::codec::track_effect::{
    read_aspi_plugin_clip, read_equalizer, read_pan_volume_effect, read_track_effect,
    read_transition_effect,
};
use crate::codec::track_group::{
    read_capture_mask, read_composition, read_motion_effect, read_rep_set, read_repeat,
    read_selector, read_time_warp, read_track_group,
};
use crate::error::DecodeError;
use crate::model::{AttributeEntry, ClassKind, PropertyTree};

/// Options for decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Fail with [`DecodeError::TrailingBytes`] when bytes remain after the
    /// record close marker.
    ///
    /// Off by default: trailing bytes are logged and ignored.
    pub require_exhausted: bool,
}

impl DecodeOptions {
    /// Creates default (lenient) decoding options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that reject trailing bytes.
    pub fn strict() -> Self {
        Self {
            require_exhausted: true,
        }
    }
}

/// Decodes one object body of the given class.
pub fn decode_object(kind: ClassKind, bytes: &[u8]) -> Result<PropertyTree, DecodeError> {
    decode_object_with_options(kind, bytes, DecodeOptions::default())
}

/// Decodes one object body of the given class with the given options.
pub fn decode_object_with_options(
    kind: ClassKind,
    bytes: &[u8],
    options: DecodeOptions,
) -> Result<PropertyTree, DecodeError> {
    trace!(class = ?kind, len = bytes.len(), "decoding object body");

    let mut reader = Reader::new(bytes);
    let result = read_object(&mut reader, kind)
        .and_then(|tree| finish(&reader, options).map(|()| tree));

    if let Err(e) = &result {
        debug!(class = ?kind, error = %e, offset = ?e.offset(), "object decode failed");
    }
    result
}

/// Decodes one object body identified by its four-character class id.
///
/// Fails with [`DecodeError::UnknownClass`] for ids outside the registry.
pub fn decode_object_by_fourcc(fourcc: &[u8; 4], bytes: &[u8]) -> Result<PropertyTree, DecodeError> {
    let kind = ClassKind::from_fourcc(fourcc).ok_or(DecodeError::UnknownClass { fourcc: *fourcc })?;
    decode_object(kind, bytes)
}

/// Decodes a standalone attribute block.
pub fn decode_attributes(bytes: &[u8]) -> Result<Vec<AttributeEntry>, DecodeError> {
    decode_attributes_with_options(bytes, DecodeOptions::default())
}

/// Decodes a standalone attribute block with the given options.
pub fn decode_attributes_with_options(
    bytes: &[u8],
    options: DecodeOptions,
) -> Result<Vec<AttributeEntry>, DecodeError> {
    trace!(len = bytes.len(), "decoding attribute block");

    let mut reader = Reader::new(bytes);
    let result = read_attributes(&mut reader)
        .and_then(|entries| finish(&reader, options).map(|()| entries));

    if let Err(e) = &result {
        debug!(error = %e, offset = ?e.offset(), "attribute decode failed");
    }
    result
}

/// Runs the reader for `kind` and consumes the record close marker.
pub fn read_object(reader: &mut Reader<'_>, kind: ClassKind) -> Result<PropertyTree, DecodeError> {
    let tree = match kind {
        ClassKind::Sequence => read_sequence(reader)?,
        ClassKind::Filler => read_filler(reader)?,
        ClassKind::SourceClip => read_source_clip(reader)?,
        ClassKind::ParameterClip => read_parameter_clip(reader)?,
        ClassKind::ParameterItem => read_parameter_item(reader)?,
        ClassKind::TrackReference => read_track_reference(reader)?,
        ClassKind::TrackGroup => read_track_group(reader, kind)?,
        ClassKind::TrackEffect => read_track_effect(reader, kind)?,
        ClassKind::AspiPluginClip => read_aspi_plugin_clip(reader)?,
        ClassKind::Selector => read_selector(reader)?,
        ClassKind::Composition => read_composition(reader)?,
        ClassKind::TransitionEffect => read_transition_effect(reader)?,
        ClassKind::PanVolumeEffect => read_pan_volume_effect(reader)?,
        ClassKind::EqualizerMultiBand => read_equalizer(reader)?,
        ClassKind::TimeWarp => read_time_warp(reader, kind)?,
        ClassKind::CaptureMask => read_capture_mask(reader)?,
        ClassKind::MotionEffect => read_motion_effect(reader)?,
        ClassKind::Repeat => read_repeat(reader)?,
        ClassKind::RepSet => read_rep_set(reader)?,
        ClassKind::MediaDescriptor => read_media_descriptor(reader, kind)?,
        ClassKind::MediaFileDescriptor => read_media_file_descriptor(reader, kind)?,
        ClassKind::DidDescriptor => read_did_descriptor(reader, kind)?,
        ClassKind::CdciDescriptor => read_cdci_descriptor(reader)?,
        ClassKind::EffectParameterList => read_effect_parameter_list(reader)?,
        ClassKind::FileLocator => read_file_locator(reader)?,
        ClassKind::GraphicEffect => read_graphic_effect(reader)?,
    };
    reader.close_record()?;
    Ok(tree)
}

fn finish(reader: &Reader<'_>, options: DecodeOptions) -> Result<(), DecodeError> {
    let remaining = reader.remaining_len();
    if remaining == 0 {
        return Ok(());
    }
    if options.require_exhausted {
        return Err(DecodeError::TrailingBytes {
            offset: reader.position(),
            remaining,
        });
    }
    debug!(offset = reader.position(), remaining, "ignoring trailing bytes after record");
    Ok(())
}
