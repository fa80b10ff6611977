//! AVB: object-body decoder for Avid bin (`.avb`) media project containers.
//!
//! An AVB container stores a graph of typed objects (compositions, clips,
//! sequences, track groups, descriptors, keyframed parameters, attribute
//! lists). This crate decodes one object body at a time: given the class
//! kind and the raw bytes located by the container layer, it produces a
//! [`PropertyTree`] of named, typed fields.
//!
//! # Quick Start
//!
//! ```rust
//! use avb::{decode_object, ClassKind};
//!
//! // A Filler: Component block, Clip block, Filler block, close marker.
//! let bytes = [
//!     0x02, 0x03, // component block
//!     0, 0, 0, 0, 0, 0, 0, 0, // left/right bob
//!     1, 0, // media kind: picture
//!     25, 0, 0, 0, 0, 0, // edit rate 25e0
//!     0xFF, 0xFF, 0xFF, 0xFF, // no name, no effect id
//!     0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, // attributes, session attrs, precomputed
//!     0x02, 0x01, 100, 0, 0, 0, // clip block: length 100
//!     0x02, 0x01, // filler block
//!     0x03,
//! ];
//!
//! let tree = decode_object(ClassKind::Filler, &bytes).unwrap();
//! assert_eq!(tree.get_uint("length"), Some(100));
//! assert_eq!(tree.get_double("edit_rate"), Some(25.0));
//! assert!(tree.get_string("name").unwrap().is_empty());
//! ```
//!
//! # Modules
//!
//! - [`model`]: Output types (ClassKind, PropertyTree, MobId, AttributeEntry)
//! - [`codec`]: Byte cursor, tag protocol and per-class readers
//! - [`error`]: Error types
//! - [`limits`]: Allocation limits for decoding
//!
//! # Untrusted input
//!
//! Every read is bounds-checked and every count or length prefix is checked
//! against [`limits`] before allocation. Unknown extension tags, track flag
//! bits and type codes are errors; nothing is skipped. Object references are
//! returned as ids and never resolved.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;

// Re-export commonly used types at crate root
pub use codec::{
    decode_attributes, decode_attributes_with_options, decode_object, decode_object_by_fourcc,
    decode_object_with_options, DecodeOptions,
};
pub use error::{DecodeError, ErrorCode};
pub use model::{
    AttributeEntry, AttributeType, AttributeValue, ClassKind, ControlPoint, ControlPointTrack,
    ControlValue, MediaKind, MobId, ObjectRef, PerPointValue, Property, PropertyCategory,
    PropertyTree, PropertyValue, StringEncoding, StringValue, TimeOffset, TreeKind, ValueType,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
