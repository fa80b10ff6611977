//! The property tree: the generic decoded form of one object body.
//!
//! Every class reader emits into a `PropertyTree`. Fields are named by the
//! reader, kept in wire order, and never removed or replaced once added.

use std::borrow::Cow;

use uuid::Uuid;

use crate::model::{ClassKind, MediaKind, MobId};

/// An object id referring into the container's object table.
///
/// Never resolved by the decoder; zero conventionally means "no object".
pub type ObjectRef = u32;

/// Text encoding a string field was stored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringEncoding {
    /// Legacy single-byte Mac OS Roman.
    MacRoman,
    Utf8,
}

/// A byte string tagged with its source encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StringValue {
    pub encoding: StringEncoding,
    pub bytes: Vec<u8>,
}

impl StringValue {
    pub fn new(encoding: StringEncoding, bytes: Vec<u8>) -> Self {
        Self { encoding, bytes }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decodes the bytes to text, replacing anything undecodable.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        match self.encoding {
            StringEncoding::Utf8 => String::from_utf8_lossy(&self.bytes),
            StringEncoding::MacRoman => {
                if self.bytes.is_ascii() {
                    // ASCII is a subset of both encodings
                    String::from_utf8_lossy(&self.bytes)
                } else {
                    Cow::Owned(self.bytes.iter().map(|&b| mac_roman_char(b)).collect())
                }
            }
        }
    }
}

const MAC_ROMAN_HIGH: [char; 128] = [
    'Ä', 'Å', 'Ç', 'É', 'Ñ', 'Ö', 'Ü', 'á', 'à', 'â', 'ä', 'ã', 'å', 'ç', 'é', 'è',
    'ê', 'ë', 'í', 'ì', 'î', 'ï', 'ñ', 'ó', 'ò', 'ô', 'ö', 'õ', 'ú', 'ù', 'û', 'ü',
    '†', '°', '¢', '£', '§', '•', '¶', 'ß', '®', '©', '™', '´', '¨', '≠', 'Æ', 'Ø',
    '∞', '±', '≤', '≥', '¥', 'µ', '∂', '∑', '∏', 'π', '∫', 'ª', 'º', 'Ω', 'æ', 'ø',
    '¿', '¡', '¬', '√', 'ƒ', '≈', '∆', '«', '»', '…', '\u{a0}', 'À', 'Ã', 'Õ', 'Œ', 'œ',
    '–', '—', '“', '”', '‘', '’', '÷', '◊', 'ÿ', 'Ÿ', '⁄', '€', '‹', '›', 'ﬁ', 'ﬂ',
    '‡', '·', '‚', '„', '‰', 'Â', 'Ê', 'Á', 'Ë', 'È', 'Í', 'Î', 'Ï', 'Ì', 'Ó', 'Ô',
    '\u{f8ff}', 'Ò', 'Ú', 'Û', 'Ù', 'ı', 'ˆ', '˜', '¯', '˘', '˙', '˚', '¸', '˝', '˛', 'ˇ',
];

fn mac_roman_char(b: u8) -> char {
    if b < 0x80 {
        b as char
    } else {
        MAC_ROMAN_HIGH[(b - 0x80) as usize]
    }
}

/// Value type of a control-point track or parameter item (wire `u16`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ValueType {
    Int = 1,
    Double = 2,
    Reference = 4,
}

impl ValueType {
    /// Creates a ValueType from its wire representation.
    pub fn from_u16(v: u16) -> Option<ValueType> {
        match v {
            1 => Some(ValueType::Int),
            2 => Some(ValueType::Double),
            4 => Some(ValueType::Reference),
            _ => None,
        }
    }
}

/// A typed keyframe value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlValue {
    Int(i32),
    Double(f64),
    Reference(ObjectRef),
}

impl ControlValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            ControlValue::Int(_) => ValueType::Int,
            ControlValue::Double(_) => ValueType::Double,
            ControlValue::Reference(_) => ValueType::Reference,
        }
    }
}

/// Rational time offset of a control point.
///
/// Denominator and timescale are not checked for zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeOffset {
    pub numerator: i32,
    pub denominator: i32,
    pub timescale: i32,
}

/// A secondary value attached to a control point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerPointValue {
    /// Opaque role code.
    pub code: i16,
    /// Always `Int` or `Double`.
    pub value: ControlValue,
}

/// One keyframe.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPoint {
    pub offset: TimeOffset,
    pub value: ControlValue,
    pub per_point: Vec<PerPointValue>,
}

/// An ordered keyframe list with its declared value type.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlPointTrack {
    pub value_type: ValueType,
    pub points: Vec<ControlPoint>,
}

/// Category of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PropertyCategory {
    Bool,
    Int,
    Double,
    Date,
    String,
    Reference,
    ReferenceList,
    MobId,
    Uuid,
    Bytes,
    IntArray,
    ControlPoints,
    Children,
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    /// Signed integer from an 8/16/32/64-bit source width.
    Int(i64),
    /// Unsigned integer from an 8/16/32-bit source width.
    UInt(u64),
    Double(f64),
    /// Seconds since the Unix epoch.
    Date(u32),
    String(StringValue),
    Reference(ObjectRef),
    ReferenceList(Vec<ObjectRef>),
    MobId(MobId),
    Uuid(Uuid),
    Bytes(Vec<u8>),
    IntArray(Vec<i64>),
    ControlPoints(ControlPointTrack),
    Children(Vec<PropertyTree>),
}

impl PropertyValue {
    /// Returns the category of this value.
    pub fn category(&self) -> PropertyCategory {
        match self {
            PropertyValue::Bool(_) => PropertyCategory::Bool,
            PropertyValue::Int(_) | PropertyValue::UInt(_) => PropertyCategory::Int,
            PropertyValue::Double(_) => PropertyCategory::Double,
            PropertyValue::Date(_) => PropertyCategory::Date,
            PropertyValue::String(_) => PropertyCategory::String,
            PropertyValue::Reference(_) => PropertyCategory::Reference,
            PropertyValue::ReferenceList(_) => PropertyCategory::ReferenceList,
            PropertyValue::MobId(_) => PropertyCategory::MobId,
            PropertyValue::Uuid(_) => PropertyCategory::Uuid,
            PropertyValue::Bytes(_) => PropertyCategory::Bytes,
            PropertyValue::IntArray(_) => PropertyCategory::IntArray,
            PropertyValue::ControlPoints(_) => PropertyCategory::ControlPoints,
            PropertyValue::Children(_) => PropertyCategory::Children,
        }
    }

    /// Returns the value as a signed integer, if it is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(v) => Some(*v),
            PropertyValue::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }
}

/// A named field.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: &'static str,
    pub value: PropertyValue,
}

/// What a property tree describes, for downstream dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeKind {
    /// A top-level object body.
    Object(ClassKind),
    /// One track of a track group.
    Track,
    /// One entry of an effect parameter list.
    Parameter,
    /// One band of a multi-band equalizer.
    Band,
    /// One plugin of an ASPI plugin clip.
    Plugin,
    /// One saved state chunk of an ASPI plugin.
    Chunk,
}

/// Decoded fields of one object (or one nested record), in wire order.
///
/// Trees are filled by the decoder only. The `push*` builders are
/// crate-private, so outside this crate a tree can be inspected and cloned
/// but not populated.
///
/// ```compile_fail
/// use avb::{ClassKind, PropertyTree, TreeKind};
///
/// let mut tree = PropertyTree::new(TreeKind::Object(ClassKind::Filler));
/// tree.push_int("length", 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyTree {
    kind: TreeKind,
    properties: Vec<Property>,
}

impl PropertyTree {
    /// Creates an empty tree.
    pub fn new(kind: TreeKind) -> Self {
        Self {
            kind,
            properties: Vec::new(),
        }
    }

    pub fn kind(&self) -> TreeKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Appends a field.
    ///
    /// Readers use each name once; a repeated extension on the wire appends
    /// again and lookups keep returning the first value.
    pub(crate) fn push(&mut self, name: &'static str, value: PropertyValue) {
        self.properties.push(Property { name, value });
    }

    pub(crate) fn push_bool(&mut self, name: &'static str, value: bool) {
        self.push(name, PropertyValue::Bool(value));
    }

    pub(crate) fn push_int(&mut self, name: &'static str, value: impl Into<i64>) {
        self.push(name, PropertyValue::Int(value.into()));
    }

    pub(crate) fn push_uint(&mut self, name: &'static str, value: impl Into<u64>) {
        self.push(name, PropertyValue::UInt(value.into()));
    }

    pub(crate) fn push_double(&mut self, name: &'static str, value: f64) {
        self.push(name, PropertyValue::Double(value));
    }

    pub(crate) fn push_ref(&mut self, name: &'static str, value: ObjectRef) {
        self.push(name, PropertyValue::Reference(value));
    }

    /// Iterates fields in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.properties.iter()
    }

    /// Iterates field names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.properties.iter().map(|p| p.name)
    }

    /// Iterates the fields of one category, in insertion order.
    pub fn iter_category(&self, category: PropertyCategory) -> impl Iterator<Item = &Property> {
        self.properties
            .iter()
            .filter(move |p| p.value.category() == category)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns an integer field (signed or unsigned) as `i64`.
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name)?.as_i64()
    }

    pub fn get_uint(&self, name: &str) -> Option<u64> {
        match self.get(name)? {
            PropertyValue::UInt(v) => Some(*v),
            PropertyValue::Int(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn get_double(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            PropertyValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_date(&self, name: &str) -> Option<u32> {
        match self.get(name)? {
            PropertyValue::Date(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_string(&self, name: &str) -> Option<&StringValue> {
        match self.get(name)? {
            PropertyValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_ref(&self, name: &str) -> Option<ObjectRef> {
        match self.get(name)? {
            PropertyValue::Reference(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_ref_list(&self, name: &str) -> Option<&[ObjectRef]> {
        match self.get(name)? {
            PropertyValue::ReferenceList(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_mob_id(&self, name: &str) -> Option<&MobId> {
        match self.get(name)? {
            PropertyValue::MobId(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_uuid(&self, name: &str) -> Option<&Uuid> {
        match self.get(name)? {
            PropertyValue::Uuid(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_bytes(&self, name: &str) -> Option<&[u8]> {
        match self.get(name)? {
            PropertyValue::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_int_array(&self, name: &str) -> Option<&[i64]> {
        match self.get(name)? {
            PropertyValue::IntArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn get_control_points(&self, name: &str) -> Option<&ControlPointTrack> {
        match self.get(name)? {
            PropertyValue::ControlPoints(v) => Some(v),
            _ => None,
        }
    }

    /// Returns a nested child list such as `tracks` or `parameters`.
    pub fn children(&self, name: &str) -> Option<&[PropertyTree]> {
        match self.get(name)? {
            PropertyValue::Children(v) => Some(v),
            _ => None,
        }
    }

    /// Maps `media_kind_id` to a [`MediaKind`], for component trees.
    pub fn media_kind(&self) -> Option<MediaKind> {
        self.get_uint("media_kind_id").and_then(MediaKind::from_id)
    }
}

impl<'a> IntoIterator for &'a PropertyTree {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.properties.iter()
    }
}
