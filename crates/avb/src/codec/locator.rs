//! File locator reader.

use crate::codec::primitives::Reader;
use crate::codec::tags::{unknown_extension, TAG_L};
use crate::error::DecodeError;
use crate::model::{ClassKind, PropertyTree, PropertyValue, StringEncoding, TreeKind};

const FILE_LOCATOR_BLOCK: u8 = 0x02;

const EXT_PATH_POSIX: u8 = 0x01;
const EXT_PATH_UTF8: u8 = 0x02;

/// Reads a FileLocator: a legacy-encoded path, optionally followed by POSIX
/// and UTF-8 renditions of it.
pub fn read_file_locator(reader: &mut Reader<'_>) -> Result<PropertyTree, DecodeError> {
    reader.open_block(FILE_LOCATOR_BLOCK)?;

    let mut tree = PropertyTree::new(TreeKind::Object(ClassKind::FileLocator));
    tree.push(
        "path",
        PropertyValue::String(reader.read_string(StringEncoding::MacRoman, "path")?),
    );

    while reader.has_next_extension() {
        let (tag, offset) = reader.read_extension_tag()?;
        match tag {
            EXT_PATH_POSIX => {
                reader.expect_tag(TAG_L)?;
                let path = reader.read_string(StringEncoding::MacRoman, "path_posix")?;
                tree.push("path_posix", PropertyValue::String(path));
            }
            EXT_PATH_UTF8 => {
                reader.expect_tag(TAG_L)?;
                let path = reader.read_string(StringEncoding::Utf8, "path_utf8")?;
                tree.push("path_utf8", PropertyValue::String(path));
            }
            _ => return Err(unknown_extension(tag, offset)),
        }
    }

    Ok(tree)
}
