//! Class kinds and the four-character-code registry.
//!
//! The container layer identifies each object by a four-character class id.
//! `ClassKind` is the closed set of classes this crate can decode.

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

/// A decodable object class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Sequence,
    Filler,
    SourceClip,
    ParameterClip,
    ParameterItem,
    TrackReference,
    TrackGroup,
    TrackEffect,
    AspiPluginClip,
    Selector,
    Composition,
    TransitionEffect,
    PanVolumeEffect,
    EqualizerMultiBand,
    TimeWarp,
    CaptureMask,
    MotionEffect,
    Repeat,
    RepSet,
    MediaDescriptor,
    MediaFileDescriptor,
    DidDescriptor,
    CdciDescriptor,
    EffectParameterList,
    FileLocator,
    GraphicEffect,
}

impl ClassKind {
    /// All registered class kinds.
    pub const ALL: [ClassKind; 26] = [
        ClassKind::Sequence,
        ClassKind::Filler,
        ClassKind::SourceClip,
        ClassKind::ParameterClip,
        ClassKind::ParameterItem,
        ClassKind::TrackReference,
        ClassKind::TrackGroup,
        ClassKind::TrackEffect,
        ClassKind::AspiPluginClip,
        ClassKind::Selector,
        ClassKind::Composition,
        ClassKind::TransitionEffect,
        ClassKind::PanVolumeEffect,
        ClassKind::EqualizerMultiBand,
        ClassKind::TimeWarp,
        ClassKind::CaptureMask,
        ClassKind::MotionEffect,
        ClassKind::Repeat,
        ClassKind::RepSet,
        ClassKind::MediaDescriptor,
        ClassKind::MediaFileDescriptor,
        ClassKind::DidDescriptor,
        ClassKind::CdciDescriptor,
        ClassKind::EffectParameterList,
        ClassKind::FileLocator,
        ClassKind::GraphicEffect,
    ];

    /// Returns the four-character class id used by the container.
    ///
    /// `MediaDescriptor` is never stored on its own and has no class id; it
    /// is only reachable through [`decode_object`](crate::decode_object).
    pub fn fourcc(self) -> Option<[u8; 4]> {
        let fourcc = match self {
            ClassKind::Sequence => *b"SEQU",
            ClassKind::Filler => *b"FILL",
            ClassKind::SourceClip => *b"SCLP",
            ClassKind::ParameterClip => *b"PRCL",
            ClassKind::ParameterItem => *b"PRIT",
            ClassKind::TrackReference => *b"TRKR",
            ClassKind::TrackGroup => *b"TRKG",
            ClassKind::TrackEffect => *b"TKFX",
            ClassKind::AspiPluginClip => *b"ASPI",
            ClassKind::Selector => *b"SLCT",
            ClassKind::Composition => *b"CMPO",
            ClassKind::TransitionEffect => *b"TNFX",
            ClassKind::PanVolumeEffect => *b"PVOL",
            ClassKind::EqualizerMultiBand => *b"EQMB",
            ClassKind::TimeWarp => *b"WARP",
            ClassKind::CaptureMask => *b"MASK",
            ClassKind::MotionEffect => *b"SPED",
            ClassKind::Repeat => *b"REPT",
            ClassKind::RepSet => *b"RSET",
            ClassKind::MediaDescriptor => return None,
            ClassKind::MediaFileDescriptor => *b"MDFL",
            ClassKind::DidDescriptor => *b"DIDD",
            ClassKind::CdciDescriptor => *b"CDCI",
            ClassKind::EffectParameterList => *b"FXPS",
            ClassKind::FileLocator => *b"FILE",
            ClassKind::GraphicEffect => *b"GRFX",
        };
        Some(fourcc)
    }

    /// Looks up a class kind by its four-character class id.
    pub fn from_fourcc(fourcc: &[u8; 4]) -> Option<ClassKind> {
        REGISTRY.get(fourcc).copied()
    }

    /// Returns true for classes whose reader starts with the Component fields.
    pub fn is_component(self) -> bool {
        !matches!(
            self,
            ClassKind::ParameterItem
                | ClassKind::MediaDescriptor
                | ClassKind::MediaFileDescriptor
                | ClassKind::DidDescriptor
                | ClassKind::CdciDescriptor
                | ClassKind::EffectParameterList
                | ClassKind::FileLocator
                | ClassKind::GraphicEffect
        )
    }
}

lazy_static! {
    static ref REGISTRY: FxHashMap<[u8; 4], ClassKind> = {
        let mut map = FxHashMap::with_capacity_and_hasher(ClassKind::ALL.len(), Default::default());
        for kind in ClassKind::ALL {
            if let Some(fourcc) = kind.fourcc() {
                map.insert(fourcc, kind);
            }
        }
        map
    };
}

/// Media kind carried by a component's `media_kind_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Picture,
    Sound,
    Timecode,
    Edgecode,
    Attribute,
    EffectData,
    DescriptiveMetadata,
}

impl MediaKind {
    /// Maps a `media_kind_id` to a media kind. Zero and unknown ids map to `None`.
    pub fn from_id(id: u64) -> Option<MediaKind> {
        match id {
            1 => Some(MediaKind::Picture),
            2 => Some(MediaKind::Sound),
            3 => Some(MediaKind::Timecode),
            4 => Some(MediaKind::Edgecode),
            5 => Some(MediaKind::Attribute),
            6 => Some(MediaKind::EffectData),
            7 => Some(MediaKind::DescriptiveMetadata),
            _ => None,
        }
    }
}
