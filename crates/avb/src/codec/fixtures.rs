//! Byte-span builders shared by the reader tests, plus a schema-driven
//! encoder and tree generators for round-trip tests.

use std::iter::Peekable;
use std::slice;

use proptest::prelude::*;

use crate::codec::primitives::Writer;
use crate::model::{
    AttributeEntry, AttributeValue, ClassKind, ControlPoint, ControlPointTrack, ControlValue,
    PerPointValue, Property, PropertyTree, PropertyValue, StringEncoding, StringValue,
    TimeOffset, TreeKind, ValueType,
};

pub const SAMPLE_MOB_ID: [u8; 32] = [
    0x06, 0x0a, 0x2b, 0x34, 0x01, 0x01, 0x01, 0x01, 0x01, 0x01, 0x0f, 0x00, // label
    0x13, 0x00, 0x00, 0x00, // length, instance
    0x44, 0x4d, 0x8d, 0x5d, 0x7f, 0x7f, 0x80, 0x2a, // material data1..3
    0x06, 0x0e, 0x2b, 0x34, 0xc3, 0xdd, 0x9b, 0x3e, // material data4
];

/// Writes the Component block with fixed sample values and no extensions.
pub fn component(w: &mut Writer) {
    component_named(w, b"Clip");
}

pub fn component_named(w: &mut Writer, name: &[u8]) {
    w.open_block(0x03)
        .write_u32(11) // left_bob
        .write_u32(12) // right_bob
        .write_u16(1) // media_kind_id
        .write_exp10(2997, -2) // edit_rate
        .write_string16(name)
        .write_u16(0xFFFF) // effect_id absent
        .write_u32(21) // attributes
        .write_u32(22) // session_attrs
        .write_u32(23); // precomputed
}

/// Writes Component + Clip blocks with the given length.
pub fn clip(w: &mut Writer, length: u32) {
    component(w);
    w.open_block(0x01).write_u32(length);
}

/// Writes a MobID in its tagged wire form.
pub fn mob_id(w: &mut Writer, bytes: &[u8; 32]) {
    w.write_byte(b'A').write_u32(12).write_bytes(&bytes[..12]);
    for b in &bytes[12..16] {
        w.write_byte(b'D').write_byte(*b);
    }
    w.write_byte(b'H').write_bytes(&bytes[16..20]);
    w.write_byte(b'F').write_bytes(&bytes[20..22]);
    w.write_byte(b'F').write_bytes(&bytes[22..24]);
    w.write_byte(b'A').write_u32(8).write_bytes(&bytes[24..32]);
}

/// Writes Component + TrackGroup blocks with one component-only track per ref.
pub fn track_group(w: &mut Writer, components: &[u32]) {
    component(w);
    w.open_block(0x08)
        .write_byte(0) // mc_mode
        .write_i32(250) // length
        .write_i32(0) // num_scalars
        .write_u32(components.len() as u32);
    for (i, c) in components.iter().enumerate() {
        w.write_u16(0b0000_0101).write_i16(i as i16 + 1).write_u32(*c);
    }
}

/// Writes TrackGroup + the TrackEffect block with no extensions.
pub fn track_effect(w: &mut Writer) {
    track_group(w, &[31, 32]);
    w.open_block(0x06);
    effect_info(w);
}

/// Writes the global-info field set shared by track and transition effects.
pub fn effect_info(w: &mut Writer) {
    w.write_i32(10) // left_length
        .write_i32(20) // right_length
        .write_i16(1) // info_version
        .write_i32(0) // info_current
        .write_i32(0) // info_smooth
        .write_i16(0) // info_color_item
        .write_i16(2) // info_quality
        .write_byte(0xFF) // info_is_reversed
        .write_bool(true) // info_aspect_on
        .write_u32(40) // keyframes
        .write_bool(false) // info_force_software
        .write_bool(true); // info_never_hardware
}

/// Writes TrackGroup + the TimeWarp block.
pub fn time_warp(w: &mut Writer) {
    track_group(w, &[31]);
    w.open_block(0x02).write_i32(-5);
}

/// Writes the MediaDescriptor block with no extensions.
pub fn media_descriptor(w: &mut Writer) {
    w.open_block(0x03)
        .write_byte(2) // mob_kind
        .write_u32(50) // locator
        .write_bool(false) // intermediate
        .write_u32(51); // physical_media
}

/// Writes MediaDescriptor + MediaFileDescriptor blocks.
pub fn media_file_descriptor(w: &mut Writer) {
    media_descriptor(w);
    w.open_block(0x03)
        .write_exp10(25, 0) // edit_rate
        .write_i32(1000) // length
        .write_i16(0) // is_omfi
        .write_i32(0); // data_offset
}

/// Writes the descriptor chain through the DID block with no extensions.
pub fn did_descriptor(w: &mut Writer) {
    media_file_descriptor(w);
    w.open_block(0x02);
    for v in [1080, 1920, 1080, 1920, 0, 0, 1080, 1920, 0, 0] {
        w.write_i32(v);
    }
    w.write_i16(1) // frame_layout
        .write_i32(16)
        .write_i32(9) // aspect_ratio
        .write_u32(8)
        .write_i32(21)
        .write_i32(584) // line_map
        .write_i32(0) // alpha_transparency
        .write_bool(true) // uniformness
        .write_i32(0) // did_image_size
        .write_u32(0) // next_did_desc
        .write_bytes(b"1CVA") // compress_method, stored reversed
        .write_i32(1235) // resolution_id
        .write_i32(8192); // image_alignment_factor
}

// =============================================================================
// ROUND-TRIP ENCODING
// =============================================================================

/// One wire element of a record layout, in reader order.
///
/// Named variants map to exactly one property; the rest only shape bytes.
#[derive(Debug, Clone, Copy)]
pub enum Field {
    /// Block open marker plus sub-kind.
    Block(u8),
    /// Field type tag.
    Tag(u8),
    /// Legacy u32 word the readers discard; written as zero.
    Skip32,
    I8(&'static str),
    /// u8 stored as a signed property.
    Byte(&'static str),
    U8(&'static str),
    I16(&'static str),
    U16(&'static str),
    I32(&'static str),
    U32(&'static str),
    I64(&'static str),
    F64(&'static str),
    /// Decimal-exponent float; generated values are integral.
    Exp10(&'static str),
    Bool(&'static str),
    Ref(&'static str),
    Date(&'static str),
    Str(&'static str, StringEncoding),
    RefList(&'static str),
    Uuid(&'static str),
    /// `'A'` + u32 16 + UUID bytes.
    FixedUuid(&'static str),
    Bytes32(&'static str),
    MobId(&'static str),
    I32Array(&'static str, usize),
    /// u32 count, then i32 values.
    I32List(&'static str),
    /// u32 size in bytes, then i32 values.
    LineMap(&'static str),
    /// Four bytes stored in reverse order.
    Reversed4(&'static str),
    /// Eight `'G'`-tagged i32 values.
    TaggedBox(&'static str),
    /// u32 count of the named child list, written ahead of it.
    CountOf(&'static str),
    /// u32 length of the named byte field, written ahead of it.
    LenOf(&'static str),
    /// Bytes without a length prefix.
    Raw(&'static str),
    /// Child records, without a count.
    Records(&'static str, TreeKind, &'static [Field]),
    /// Track count, flag-selected track fields and the lock-number extension.
    Tracks,
    /// ParameterClip value type and keyframes.
    ControlPoints,
    /// ParameterItem value type and its typed value.
    TypedValue,
    /// Optional extension block.
    Ext(u8, &'static [Field]),
}

impl Field {
    /// Name of the first property this element produces.
    fn name(&self) -> Option<&'static str> {
        match *self {
            Field::I8(n)
            | Field::Byte(n)
            | Field::U8(n)
            | Field::I16(n)
            | Field::U16(n)
            | Field::I32(n)
            | Field::U32(n)
            | Field::I64(n)
            | Field::F64(n)
            | Field::Exp10(n)
            | Field::Bool(n)
            | Field::Ref(n)
            | Field::Date(n)
            | Field::Str(n, _)
            | Field::RefList(n)
            | Field::Uuid(n)
            | Field::FixedUuid(n)
            | Field::Bytes32(n)
            | Field::MobId(n)
            | Field::I32Array(n, _)
            | Field::I32List(n)
            | Field::LineMap(n)
            | Field::Reversed4(n)
            | Field::TaggedBox(n)
            | Field::Raw(n)
            | Field::Records(n, _, _) => Some(n),
            Field::Tracks => Some("tracks"),
            Field::ControlPoints | Field::TypedValue => Some("value_type"),
            Field::Block(_)
            | Field::Tag(_)
            | Field::Skip32
            | Field::CountOf(_)
            | Field::LenOf(_)
            | Field::Ext(..) => None,
        }
    }
}

use Field::*;

const MAC: StringEncoding = StringEncoding::MacRoman;

const COMPONENT: &[Field] = &[
    Block(0x03),
    Ref("left_bob"),
    Ref("right_bob"),
    U16("media_kind_id"),
    Exp10("edit_rate"),
    Str("name", MAC),
    Str("effect_id", MAC),
    Ref("attributes"),
    Ref("session_attrs"),
    Ref("precomputed"),
    Ext(0x01, &[Tag(b'H'), Ref("param_list")]),
];

const CLIP: &[Field] = &[Block(0x01), U32("length")];

const TRACK_GROUP: &[Field] = &[
    Block(0x08),
    Byte("mc_mode"),
    I32("length"),
    I32("num_scalars"),
    Tracks,
];

const EFFECT_INFO: &[Field] = &[
    I32("left_length"),
    I32("right_length"),
    I16("info_version"),
    I32("info_current"),
    I32("info_smooth"),
    I16("info_color_item"),
    I16("info_quality"),
    I8("info_is_reversed"),
    Bool("info_aspect_on"),
    Ref("keyframes"),
    Bool("info_force_software"),
    Bool("info_never_hardware"),
];

const TRACK_EFFECT: &[Field] = &[Block(0x06)];
const TRACK_EFFECT_EXT: &[Field] = &[Ext(0x02, &[Tag(b'H'), Ref("trackman")])];

const CHUNK: &[Field] = &[
    LenOf("data"),
    I32("version"),
    U32("manufacturer_id"),
    U32("product_id"),
    U32("plugin_id"),
    U32("chunk_id"),
    Str("name", MAC),
    Raw("data"),
];

const PLUGIN: &[Field] = &[
    Str("name", MAC),
    U32("manufacturer_id"),
    U32("product_id"),
    U32("plugin_id"),
    CountOf("chunks"),
    Records("chunks", TreeKind::Chunk, CHUNK),
];

const BAND: &[Field] = &[I32("type"), I32("freq"), I32("gain"), I32("q"), Bool("enable")];

const TIME_WARP: &[Field] = &[Block(0x02), I32("phase_offset")];

const MEDIA_DESCRIPTOR: &[Field] = &[
    Block(0x03),
    U8("mob_kind"),
    Ref("locator"),
    Bool("intermediate"),
    Ref("physical_media"),
    Ext(0x01, &[FixedUuid("uuid")]),
    Ext(0x02, &[Tag(b'A'), Bytes32("wchar")]),
    Ext(0x03, &[Tag(b'H'), Ref("attributes")]),
];

const MEDIA_FILE_DESCRIPTOR: &[Field] = &[
    Block(0x03),
    Exp10("edit_rate"),
    I32("length"),
    I16("is_omfi"),
    I32("data_offset"),
];

const DID_DESCRIPTOR: &[Field] = &[
    Block(0x02),
    I32("stored_height"),
    I32("stored_width"),
    I32("sampled_height"),
    I32("sampled_width"),
    I32("sampled_x_offset"),
    I32("sampled_y_offset"),
    I32("display_height"),
    I32("display_width"),
    I32("display_x_offset"),
    I32("display_y_offset"),
    I16("frame_layout"),
    I32Array("aspect_ratio", 2),
    LineMap("line_map"),
    I32("alpha_transparency"),
    Bool("uniformness"),
    I32("did_image_size"),
    Ref("next_did_desc"),
    Reversed4("compress_method"),
    I32("resolution_id"),
    I32("image_alignment_factor"),
    Ext(0x01, &[Tag(b'E'), I16("frame_index_byte_order")]),
    Ext(0x02, &[Tag(b'G'), I32("frame_sample_size")]),
    Ext(0x03, &[Tag(b'G'), I32("first_frame_offset")]),
    Ext(
        0x04,
        &[Tag(b'G'), I32("client_fill_start"), Tag(b'G'), I32("client_fill_end")],
    ),
    Ext(0x05, &[Tag(b'G'), I32("offset_to_rle_frame_index")]),
    Ext(0x06, &[Tag(b'G'), I32("frame_start_offset")]),
    Ext(
        0x08,
        &[TaggedBox("valid_box"), TaggedBox("essence_box"), TaggedBox("source_box")],
    ),
    Ext(0x09, &[TaggedBox("framing_box"), Tag(b'G'), I32("reformatting_option")]),
    Ext(0x0A, &[Tag(b'P'), Uuid("transfer_characteristic")]),
    Ext(
        0x0B,
        &[Tag(b'P'), Uuid("color_primaries"), Tag(b'P'), Uuid("coding_equations")],
    ),
    Ext(0x0C, &[Tag(b'P'), Uuid("essence_compression")]),
    Ext(0x0E, &[Tag(b'D'), Byte("essence_element_size_kind")]),
    Ext(0x0F, &[Tag(b'B'), Bool("frame_checked_with_mapper")]),
];

const PARAMETER: &[Field] = &[
    I32("percent_time"),
    I32("level"),
    I32("pos_x"),
    I32("floor_x"),
    I32("ceil_x"),
    I32("pos_y"),
    I32("floor_y"),
    I32("ceil_y"),
    I32("scale_x"),
    I32("scale_y"),
    I32("crop_left"),
    I32("crop_right"),
    I32("crop_top"),
    I32("crop_bottom"),
    I32Array("box", 4),
    Bool("box_xscale"),
    Bool("box_yscale"),
    Bool("box_xpos"),
    Bool("box_ypos"),
    I32("border_width"),
    I32("border_soft"),
    I16("spill_gain2"),
    I16("spill_gain"),
    I16("spill_soft2"),
    I16("spill_soft"),
    I8("enable_key_flags"),
    I32List("colors"),
    Bytes32("user_param"),
    Bool("selected"),
];

/// Track fields with their flag bits, in field order.
const TRACK_FIELDS: [(u16, Field); 10] = [
    (1 << 0, I16("index")),
    (1 << 1, Ref("attributes")),
    (1 << 9, Ref("session_attr")),
    (1 << 2, Ref("component")),
    (1 << 3, Ref("filler_proxy")),
    (1 << 4, Ref("bob_data")),
    (1 << 5, I16("control_code")),
    (1 << 6, I16("control_sub_code")),
    (1 << 7, I32("start_pos")),
    (1 << 8, Bool("read_only")),
];

/// Returns the full wire layout of `kind`, base classes first.
pub fn schema(kind: ClassKind) -> Vec<Field> {
    let parts: &[&[Field]] = match kind {
        ClassKind::Sequence => &[COMPONENT, &[Block(0x03), RefList("components")]],
        ClassKind::Filler => &[COMPONENT, CLIP, &[Block(0x01)]],
        ClassKind::SourceClip => &[
            COMPONENT,
            CLIP,
            &[
                Block(0x03),
                Skip32,
                Skip32,
                I16("track_id"),
                I32("start_time"),
                Ext(0x01, &[MobId("mob_id")]),
            ],
        ],
        ClassKind::ParameterClip => &[
            COMPONENT,
            CLIP,
            &[
                Block(0x01),
                I32("interp_kind"),
                ControlPoints,
                Ext(0x01, &[Tag(b'G'), I32("extrap_kind")]),
                Ext(0x02, &[Tag(b'G'), I32("fields")]),
            ],
        ],
        ClassKind::ParameterItem => &[&[
            Block(0x02),
            Uuid("uuid"),
            TypedValue,
            Str("name", MAC),
            Bool("enable"),
            Ref("control_track"),
            Ext(0x01, &[Tag(b'B'), Bool("contribs_to_sig")]),
        ]],
        ClassKind::TrackReference => &[
            COMPONENT,
            CLIP,
            &[Block(0x01), I16("relative_scope"), I16("relative_track")],
        ],
        ClassKind::TrackGroup => &[COMPONENT, TRACK_GROUP],
        ClassKind::TrackEffect => &[COMPONENT, TRACK_GROUP, TRACK_EFFECT, EFFECT_INFO, TRACK_EFFECT_EXT],
        ClassKind::AspiPluginClip => &[
            COMPONENT,
            TRACK_GROUP,
            TRACK_EFFECT,
            EFFECT_INFO,
            TRACK_EFFECT_EXT,
            &[
                Block(0x01),
                CountOf("plugins"),
                Records("plugins", TreeKind::Plugin, PLUGIN),
            ],
        ],
        ClassKind::Selector => &[
            COMPONENT,
            TRACK_GROUP,
            &[Block(0x01), Bool("is_ganged"), U16("selected")],
        ],
        ClassKind::Composition => &[
            COMPONENT,
            TRACK_GROUP,
            &[
                Block(0x02),
                Skip32,
                Skip32,
                Date("last_modified"),
                U8("mob_type_id"),
                I32("usage_code"),
                Ref("descriptor"),
                Ext(0x01, &[Tag(b'G'), Date("creation_time")]),
                Ext(0x02, &[MobId("mob_id")]),
            ],
        ],
        ClassKind::TransitionEffect => &[
            COMPONENT,
            TRACK_GROUP,
            &[Block(0x01), I32("cutpoint"), Block(0x05)],
            EFFECT_INFO,
            &[Ext(0x01, &[Tag(b'H'), Ref("trackman")])],
        ],
        ClassKind::PanVolumeEffect => &[
            COMPONENT,
            TRACK_GROUP,
            TRACK_EFFECT,
            EFFECT_INFO,
            TRACK_EFFECT_EXT,
            &[
                Block(0x05),
                I32("level"),
                I32("pan"),
                Bool("suppress_validation"),
                Bool("level_set"),
                Bool("pan_set"),
                Ext(0x01, &[Tag(b'G'), I32("supports_separate_gain")]),
                Ext(0x02, &[Tag(b'G'), I32("is_trim_gain_effect")]),
            ],
        ],
        ClassKind::EqualizerMultiBand => &[
            COMPONENT,
            TRACK_GROUP,
            TRACK_EFFECT,
            EFFECT_INFO,
            TRACK_EFFECT_EXT,
            &[
                Block(0x05),
                CountOf("bands"),
                Records("bands", TreeKind::Band, BAND),
                Bool("effect_enable"),
                Str("filter_name", MAC),
            ],
        ],
        ClassKind::TimeWarp => &[COMPONENT, TRACK_GROUP, TIME_WARP],
        ClassKind::CaptureMask => &[
            COMPONENT,
            TRACK_GROUP,
            TIME_WARP,
            &[Block(0x01), Bool("is_double"), U32("mask_bits")],
        ],
        ClassKind::MotionEffect => &[
            COMPONENT,
            TRACK_GROUP,
            TIME_WARP,
            &[
                Block(0x03),
                I32Array("rate", 2),
                Ext(0x01, &[Tag(b'K'), F64("offset_adjust")]),
                Ext(0x02, &[Tag(b'H'), Ref("source_param_list")]),
                Ext(0x03, &[Tag(b'B'), Bool("new_source_calculation")]),
            ],
        ],
        ClassKind::Repeat => &[COMPONENT, TRACK_GROUP, TIME_WARP, &[Block(0x01)]],
        ClassKind::RepSet => &[
            COMPONENT,
            TRACK_GROUP,
            &[Block(0x01), Ext(0x01, &[Tag(b'G'), I32("rep_set_type")])],
        ],
        ClassKind::MediaDescriptor => &[MEDIA_DESCRIPTOR],
        ClassKind::MediaFileDescriptor => &[MEDIA_DESCRIPTOR, MEDIA_FILE_DESCRIPTOR],
        ClassKind::DidDescriptor => &[MEDIA_DESCRIPTOR, MEDIA_FILE_DESCRIPTOR, DID_DESCRIPTOR],
        ClassKind::CdciDescriptor => &[
            MEDIA_DESCRIPTOR,
            MEDIA_FILE_DESCRIPTOR,
            DID_DESCRIPTOR,
            &[
                Block(0x02),
                U32("horizontal_subsampling"),
                U32("vertical_subsampling"),
                U32("component_width"),
                I16("color_siting"),
                U32("black_ref_level"),
                U32("white_ref_level"),
                U32("color_range"),
                I64("frame_index_offset"),
                Ext(0x01, &[Tag(b'H'), U32("alpha_sampled_width")]),
                Ext(0x02, &[Tag(b'H'), U32("ignore_bw")]),
            ],
        ],
        ClassKind::EffectParameterList => &[&[
            Block(0x12),
            I32("orig_length"),
            I32("window_offset"),
            CountOf("parameters"),
            I32("keyframe_size"),
            Records("parameters", TreeKind::Parameter, PARAMETER),
        ]],
        ClassKind::FileLocator => &[&[
            Block(0x02),
            Str("path", MAC),
            Ext(0x01, &[Tag(b'L'), Str("path_posix", MAC)]),
            Ext(0x02, &[Tag(b'L'), Str("path_utf8", StringEncoding::Utf8)]),
        ]],
        ClassKind::GraphicEffect => &[&[Block(0x01), Bytes32("pict_data")]],
    };
    parts.concat()
}

type Props<'t> = Peekable<slice::Iter<'t, Property>>;

/// Encodes an object tree in reader order, close marker included.
pub fn encode_object(tree: &PropertyTree) -> Vec<u8> {
    let TreeKind::Object(kind) = tree.kind() else {
        panic!("not an object tree: {:?}", tree.kind());
    };
    let mut w = Writer::new();
    encode_record(&mut w, tree, &schema(kind));
    w.close();
    w.into_bytes()
}

/// Encodes an attribute block, close marker included.
pub fn encode_attributes(entries: &[AttributeEntry]) -> Vec<u8> {
    let mut w = Writer::new();
    w.open_block(0x01).write_u32(entries.len() as u32);
    for entry in entries {
        let code = entry.value.attribute_type() as u32;
        w.write_u32(code).write_string16(&entry.name.bytes);
        match &entry.value {
            AttributeValue::Int(v) => w.write_i32(*v),
            AttributeValue::String(v) => w.write_string16(&v.bytes),
            AttributeValue::Object(v) => w.write_u32(*v),
            AttributeValue::Blob(v) => w.write_bytes32(v),
        };
    }
    w.close();
    w.into_bytes()
}

fn encode_record(w: &mut Writer, tree: &PropertyTree, fields: &[Field]) {
    let mut props = tree.iter().peekable();
    for field in fields {
        encode_field(w, tree, &mut props, *field);
    }
    if let Some(extra) = props.next() {
        panic!("{:?}: no layout for {}", tree.kind(), extra.name);
    }
}

fn next_value<'t>(props: &mut Props<'t>, name: &str) -> &'t PropertyValue {
    match props.next() {
        Some(prop) if prop.name == name => &prop.value,
        Some(prop) => panic!("expected {name}, found {}", prop.name),
        None => panic!("expected {name}, found end of tree"),
    }
}

fn int(props: &mut Props<'_>, name: &str) -> i64 {
    match next_value(props, name) {
        PropertyValue::Int(v) => *v,
        other => panic!("{name}: expected Int, found {other:?}"),
    }
}

fn uint(props: &mut Props<'_>, name: &str) -> u64 {
    match next_value(props, name) {
        PropertyValue::UInt(v) => *v,
        other => panic!("{name}: expected UInt, found {other:?}"),
    }
}

fn double(props: &mut Props<'_>, name: &str) -> f64 {
    match next_value(props, name) {
        PropertyValue::Double(v) => *v,
        other => panic!("{name}: expected Double, found {other:?}"),
    }
}

fn bytes<'t>(props: &mut Props<'t>, name: &str) -> &'t [u8] {
    match next_value(props, name) {
        PropertyValue::Bytes(v) => v,
        PropertyValue::String(v) => &v.bytes,
        other => panic!("{name}: expected bytes, found {other:?}"),
    }
}

fn int_array<'t>(props: &mut Props<'t>, name: &str) -> &'t [i64] {
    match next_value(props, name) {
        PropertyValue::IntArray(v) => v,
        other => panic!("{name}: expected IntArray, found {other:?}"),
    }
}

fn children<'t>(props: &mut Props<'t>, name: &str) -> &'t [PropertyTree] {
    match next_value(props, name) {
        PropertyValue::Children(v) => v,
        other => panic!("{name}: expected Children, found {other:?}"),
    }
}

fn write_control_value(w: &mut Writer, value: ControlValue) {
    match value {
        ControlValue::Int(v) => w.write_i32(v),
        ControlValue::Double(v) => w.write_f64(v),
        ControlValue::Reference(v) => w.write_u32(v),
    };
}

fn encode_field(w: &mut Writer, tree: &PropertyTree, props: &mut Props<'_>, field: Field) {
    match field {
        Block(kind) => {
            w.open_block(kind);
        }
        Tag(tag) => {
            w.write_byte(tag);
        }
        Skip32 => {
            w.write_u32(0);
        }
        I8(n) => {
            w.write_byte(int(props, n) as i8 as u8);
        }
        Byte(n) => {
            w.write_byte(int(props, n) as u8);
        }
        U8(n) => {
            w.write_byte(uint(props, n) as u8);
        }
        I16(n) => {
            w.write_i16(int(props, n) as i16);
        }
        U16(n) => {
            w.write_u16(uint(props, n) as u16);
        }
        I32(n) => {
            w.write_i32(int(props, n) as i32);
        }
        U32(n) => {
            w.write_u32(uint(props, n) as u32);
        }
        I64(n) => {
            w.write_i64(int(props, n));
        }
        F64(n) => {
            w.write_f64(double(props, n));
        }
        Exp10(n) => {
            let value = double(props, n);
            assert_eq!(value.fract(), 0.0, "{n}: only integral rates encode exactly");
            w.write_exp10(value as i32, 0);
        }
        Bool(n) => match next_value(props, n) {
            PropertyValue::Bool(v) => {
                w.write_bool(*v);
            }
            other => panic!("{n}: expected Bool, found {other:?}"),
        },
        Ref(n) => match next_value(props, n) {
            PropertyValue::Reference(v) => {
                w.write_u32(*v);
            }
            other => panic!("{n}: expected Reference, found {other:?}"),
        },
        Date(n) => match next_value(props, n) {
            PropertyValue::Date(v) => {
                w.write_u32(*v);
            }
            other => panic!("{n}: expected Date, found {other:?}"),
        },
        Str(n, _) => {
            w.write_string16(bytes(props, n));
        }
        RefList(n) => match next_value(props, n) {
            PropertyValue::ReferenceList(refs) => {
                w.write_u32(refs.len() as u32);
                for r in refs {
                    w.write_u32(*r);
                }
            }
            other => panic!("{n}: expected ReferenceList, found {other:?}"),
        },
        Uuid(n) | FixedUuid(n) => match next_value(props, n) {
            PropertyValue::Uuid(v) => {
                if matches!(field, FixedUuid(_)) {
                    w.write_byte(b'A').write_u32(16);
                }
                w.write_bytes(v.as_bytes());
            }
            other => panic!("{n}: expected Uuid, found {other:?}"),
        },
        Bytes32(n) => {
            w.write_bytes32(bytes(props, n));
        }
        MobId(n) => match next_value(props, n) {
            PropertyValue::MobId(id) => mob_id(w, id.as_bytes()),
            other => panic!("{n}: expected MobId, found {other:?}"),
        },
        I32Array(n, len) => {
            let values = int_array(props, n);
            assert_eq!(values.len(), len, "{n}");
            for v in values {
                w.write_i32(*v as i32);
            }
        }
        I32List(n) | LineMap(n) => {
            let values = int_array(props, n);
            let prefix = if matches!(field, LineMap(_)) { values.len() * 4 } else { values.len() };
            w.write_u32(prefix as u32);
            for v in values {
                w.write_i32(*v as i32);
            }
        }
        Reversed4(n) => {
            let mut code = bytes(props, n).to_vec();
            code.reverse();
            w.write_bytes(&code);
        }
        TaggedBox(n) => {
            for v in int_array(props, n) {
                w.write_byte(b'G').write_i32(*v as i32);
            }
        }
        CountOf(n) => {
            let count = tree.children(n).map_or(0, |c| c.len());
            w.write_u32(count as u32);
        }
        LenOf(n) => {
            let len = tree.get_bytes(n).map_or(0, |b| b.len());
            w.write_u32(len as u32);
        }
        Raw(n) => {
            w.write_bytes(bytes(props, n));
        }
        Records(n, _, fields) => {
            for child in children(props, n) {
                encode_record(w, child, fields);
            }
        }
        Tracks => encode_tracks(w, children(props, "tracks")),
        ControlPoints => {
            w.write_u16(int(props, "value_type") as u16);
            let track = match next_value(props, "control_points") {
                PropertyValue::ControlPoints(track) => track,
                other => panic!("control_points: expected ControlPoints, found {other:?}"),
            };
            w.write_u32(track.points.len() as u32);
            for point in &track.points {
                w.write_i32(point.offset.numerator)
                    .write_i32(point.offset.denominator)
                    .write_i32(point.offset.timescale);
                write_control_value(w, point.value);
                w.write_u16(point.per_point.len() as u16);
                for pp in &point.per_point {
                    w.write_i16(pp.code).write_u16(pp.value.value_type() as u16);
                    write_control_value(w, pp.value);
                }
            }
        }
        TypedValue => {
            w.write_i16(int(props, "value_type") as i16);
            match next_value(props, "value") {
                PropertyValue::Int(v) => w.write_i32(*v as i32),
                PropertyValue::Double(v) => w.write_f64(*v),
                PropertyValue::Reference(v) => w.write_u32(*v),
                other => panic!("value: unexpected {other:?}"),
            };
        }
        Ext(tag, fields) => {
            let first = fields.iter().find_map(Field::name);
            if first.is_some() && props.peek().map(|p| p.name) == first {
                w.extension(tag);
                for f in fields {
                    encode_field(w, tree, props, *f);
                }
            }
        }
    }
}

fn encode_tracks(w: &mut Writer, tracks: &[PropertyTree]) {
    w.write_u32(tracks.len() as u32);
    for track in tracks {
        let flags = TRACK_FIELDS
            .iter()
            .filter(|(_, f)| f.name().is_some_and(|n| track.contains(n)))
            .fold(0u16, |acc, (bit, _)| acc | bit);
        w.write_u16(flags);

        let mut props = track.iter().peekable();
        for (bit, field) in TRACK_FIELDS {
            if flags & bit != 0 {
                encode_field(w, track, &mut props, field);
            }
        }
        if let Some(prop) = props.next() {
            assert_eq!(prop.name, "lock_number");
        }
        assert!(props.next().is_none());
    }

    let locks: Vec<i64> = tracks.iter().filter_map(|t| t.get_int("lock_number")).collect();
    if !tracks.is_empty() && locks.len() == tracks.len() {
        w.extension(0x01);
        for lock in locks {
            w.write_byte(b'E').write_i16(lock as i16);
        }
    }
}

// =============================================================================
// TREE GENERATORS
// =============================================================================

type Parts = Vec<(&'static str, PropertyValue)>;

fn single<S: Strategy + 'static>(
    name: &'static str,
    strategy: S,
    f: impl Fn(S::Value) -> PropertyValue + 'static,
) -> BoxedStrategy<Parts> {
    strategy.prop_map(move |v| vec![(name, f(v))]).boxed()
}

fn arb_string(encoding: StringEncoding) -> impl Strategy<Value = StringValue> {
    prop::collection::vec(any::<u8>(), 0..8).prop_map(move |b| StringValue::new(encoding, b))
}

fn arb_int_array(len: impl Into<prop::collection::SizeRange>) -> impl Strategy<Value = PropertyValue> {
    prop::collection::vec(any::<i32>(), len)
        .prop_map(|v| PropertyValue::IntArray(v.into_iter().map(i64::from).collect()))
}

fn arb_control_value(value_type: ValueType) -> BoxedStrategy<ControlValue> {
    match value_type {
        ValueType::Int => any::<i32>().prop_map(ControlValue::Int).boxed(),
        ValueType::Double => (-1e9f64..1e9).prop_map(ControlValue::Double).boxed(),
        ValueType::Reference => any::<u32>().prop_map(ControlValue::Reference).boxed(),
    }
}

fn arb_control_point(value_type: ValueType) -> impl Strategy<Value = ControlPoint> {
    let per_point = (
        any::<i16>(),
        prop_oneof![
            arb_control_value(ValueType::Int),
            arb_control_value(ValueType::Double)
        ],
    )
        .prop_map(|(code, value)| PerPointValue { code, value });
    (
        any::<i32>(),
        any::<i32>(),
        any::<i32>(),
        arb_control_value(value_type),
        prop::collection::vec(per_point, 0..3),
    )
        .prop_map(|(numerator, denominator, timescale, value, per_point)| ControlPoint {
            offset: TimeOffset {
                numerator,
                denominator,
                timescale,
            },
            value,
            per_point,
        })
}

fn arb_fields(fields: &[Field]) -> BoxedStrategy<Parts> {
    let parts: Vec<BoxedStrategy<Parts>> = fields.iter().map(|f| arb_field(*f)).collect();
    parts
        .prop_map(|parts| parts.into_iter().flatten().collect())
        .boxed()
}

fn arb_record(kind: TreeKind, fields: &[Field]) -> BoxedStrategy<PropertyTree> {
    arb_fields(fields)
        .prop_map(move |parts| {
            let mut tree = PropertyTree::new(kind);
            for (name, value) in parts {
                tree.push(name, value);
            }
            tree
        })
        .boxed()
}

fn arb_track() -> impl Strategy<Value = (PropertyTree, i16)> {
    let values: Vec<BoxedStrategy<Parts>> = TRACK_FIELDS.iter().map(|(_, f)| arb_field(*f)).collect();
    (0u16..0x400, values, any::<i16>()).prop_map(|(flags, values, lock)| {
        let mut track = PropertyTree::new(TreeKind::Track);
        for ((bit, _), parts) in TRACK_FIELDS.iter().zip(values) {
            if flags & bit != 0 {
                for (name, value) in parts {
                    track.push(name, value);
                }
            }
        }
        (track, lock)
    })
}

fn arb_field(field: Field) -> BoxedStrategy<Parts> {
    match field {
        Block(_) | Tag(_) | Skip32 | CountOf(_) | LenOf(_) => Just(Vec::new()).boxed(),
        I8(n) => single(n, any::<i8>(), |v| PropertyValue::Int(v.into())),
        Byte(n) => single(n, any::<u8>(), |v| PropertyValue::Int(v.into())),
        U8(n) => single(n, any::<u8>(), |v| PropertyValue::UInt(v.into())),
        I16(n) => single(n, any::<i16>(), |v| PropertyValue::Int(v.into())),
        U16(n) => single(n, any::<u16>(), |v| PropertyValue::UInt(v.into())),
        I32(n) => single(n, any::<i32>(), |v| PropertyValue::Int(v.into())),
        U32(n) => single(n, any::<u32>(), |v| PropertyValue::UInt(v.into())),
        I64(n) => single(n, any::<i64>(), PropertyValue::Int),
        F64(n) => single(n, -1e9f64..1e9, PropertyValue::Double),
        Exp10(n) => single(n, any::<i32>(), |v| PropertyValue::Double(f64::from(v))),
        Bool(n) => single(n, any::<bool>(), PropertyValue::Bool),
        Ref(n) => single(n, any::<u32>(), PropertyValue::Reference),
        Date(n) => single(n, any::<u32>(), PropertyValue::Date),
        Str(n, encoding) => single(n, arb_string(encoding), PropertyValue::String),
        RefList(n) => single(
            n,
            prop::collection::vec(any::<u32>(), 0..4),
            PropertyValue::ReferenceList,
        ),
        Uuid(n) | FixedUuid(n) => single(n, prop::array::uniform16(any::<u8>()), |b| {
            PropertyValue::Uuid(uuid::Uuid::from_bytes(b))
        }),
        Bytes32(n) | Raw(n) => single(
            n,
            prop::collection::vec(any::<u8>(), 0..16),
            PropertyValue::Bytes,
        ),
        MobId(n) => single(n, prop::array::uniform32(any::<u8>()), |b| {
            PropertyValue::MobId(crate::model::MobId::from_bytes(b))
        }),
        I32Array(n, len) => single(n, arb_int_array(len), |v| v),
        I32List(n) | LineMap(n) => single(n, arb_int_array(0..4), |v| v),
        Reversed4(n) => single(n, prop::array::uniform4(any::<u8>()), |b| {
            PropertyValue::Bytes(b.to_vec())
        }),
        TaggedBox(n) => single(n, arb_int_array(8), |v| v),
        Records(n, kind, fields) => single(
            n,
            prop::collection::vec(arb_record(kind, fields), 0..3),
            PropertyValue::Children,
        ),
        Tracks => (prop::collection::vec(arb_track(), 0..4), any::<bool>())
            .prop_map(|(tracks, locked)| {
                let tracks = tracks
                    .into_iter()
                    .map(|(mut track, lock)| {
                        if locked {
                            track.push_int("lock_number", lock);
                        }
                        track
                    })
                    .collect();
                vec![("tracks", PropertyValue::Children(tracks))]
            })
            .boxed(),
        ControlPoints => prop_oneof![
            Just(ValueType::Int),
            Just(ValueType::Double),
            Just(ValueType::Reference)
        ]
        .prop_flat_map(|value_type| {
            prop::collection::vec(arb_control_point(value_type), 0..4).prop_map(move |points| {
                vec![
                    ("value_type", PropertyValue::Int(i64::from(value_type as u16))),
                    (
                        "control_points",
                        PropertyValue::ControlPoints(ControlPointTrack { value_type, points }),
                    ),
                ]
            })
        })
        .boxed(),
        TypedValue => prop_oneof![
            any::<i32>().prop_map(|v| (1i64, PropertyValue::Int(v.into()))),
            (-1e9f64..1e9).prop_map(|v| (2i64, PropertyValue::Double(v))),
            any::<u32>().prop_map(|v| (4i64, PropertyValue::Reference(v))),
        ]
        .prop_map(|(code, value)| vec![("value_type", PropertyValue::Int(code)), ("value", value)])
        .boxed(),
        Ext(_, fields) => prop::option::of(arb_fields(fields))
            .prop_map(Option::unwrap_or_default)
            .boxed(),
    }
}

/// Generates a well-formed tree for `kind`.
pub fn arb_object(kind: ClassKind) -> BoxedStrategy<PropertyTree> {
    arb_record(TreeKind::Object(kind), &schema(kind))
}

/// Generates attribute entries of every type.
pub fn arb_attributes() -> impl Strategy<Value = Vec<AttributeEntry>> {
    let value = prop_oneof![
        any::<i32>().prop_map(AttributeValue::Int),
        arb_string(StringEncoding::MacRoman).prop_map(AttributeValue::String),
        any::<u32>().prop_map(AttributeValue::Object),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(AttributeValue::Blob),
    ];
    let entry = (arb_string(StringEncoding::MacRoman), value)
        .prop_map(|(name, value)| AttributeEntry { name, value });
    prop::collection::vec(entry, 0..4)
}
