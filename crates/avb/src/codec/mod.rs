//! Binary decoding of AVB object bodies.
//!
//! Leaves first: [`primitives`] (byte cursor), [`tags`] (structural markers
//! and extension blocks), [`mob_id`] and [`control_point`] sub-encodings,
//! then one reader per class family. [`object`] dispatches on the class kind.

pub mod attributes;
pub mod component;
pub mod control_point;
pub mod descriptor;
pub mod effect;
pub mod locator;
pub mod mob_id;
pub mod object;
pub mod primitives;
pub mod tags;
pub mod track_effect;
pub mod track_group;

#[cfg(test)]
mod fixtures;

pub use attributes::read_attributes;
pub use mob_id::read_mob_id;
pub use object::{
    decode_attributes, decode_attributes_with_options, decode_object, decode_object_by_fourcc,
    decode_object_with_options, read_object, DecodeOptions,
};
pub use primitives::{exp10_value, Reader};
