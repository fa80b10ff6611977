//! Attribute list entries.

use crate::model::{ObjectRef, StringValue};

/// Wire type code of an attribute entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AttributeType {
    Int = 1,
    String = 2,
    Object = 3,
    Blob = 4,
}

impl AttributeType {
    /// Creates an AttributeType from its wire representation.
    pub fn from_u32(v: u32) -> Option<AttributeType> {
        match v {
            1 => Some(AttributeType::Int),
            2 => Some(AttributeType::String),
            3 => Some(AttributeType::Object),
            4 => Some(AttributeType::Blob),
            _ => None,
        }
    }
}

/// The payload of an attribute entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Int(i32),
    String(StringValue),
    Object(ObjectRef),
    Blob(Vec<u8>),
}

impl AttributeValue {
    pub fn attribute_type(&self) -> AttributeType {
        match self {
            AttributeValue::Int(_) => AttributeType::Int,
            AttributeValue::String(_) => AttributeType::String,
            AttributeValue::Object(_) => AttributeType::Object,
            AttributeValue::Blob(_) => AttributeType::Blob,
        }
    }
}

/// One named, typed entry of an attribute list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeEntry {
    pub name: StringValue,
    pub value: AttributeValue,
}
