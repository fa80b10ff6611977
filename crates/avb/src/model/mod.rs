//! Data model types for decoded AVB objects.
//!
//! This module contains the output side of the decoder:
//! - Class kinds and the four-character-code registry
//! - The property tree and its value variants
//! - MobIDs
//! - Attribute list entries

pub mod attribute;
pub mod class;
pub mod mob_id;
pub mod property;

pub use attribute::{AttributeEntry, AttributeType, AttributeValue};
pub use class::{ClassKind, MediaKind};
pub use mob_id::MobId;
pub use property::{
    ControlPoint, ControlPointTrack, ControlValue, ObjectRef, PerPointValue, Property,
    PropertyCategory, PropertyTree, PropertyValue, StringEncoding, StringValue, TimeOffset,
    TreeKind, ValueType,
};
