//! MobID decoding.

use crate::codec::primitives::Reader;
use crate::codec::tags::{TAG_A, TAG_D, TAG_F, TAG_H};
use crate::error::DecodeError;
use crate::limits::MOB_ID_LEN;
use crate::model::MobId;

const SMPTE_LABEL_LEN: u32 = 12;
const MATERIAL_TAIL_LEN: u32 = 8;

/// Reads a tagged MobID.
///
/// Wire layout: `'A'` + u32 12 + label, four `'D'` + byte fields, `'H'` + 4
/// bytes, two `'F'` + 2 bytes, `'A'` + u32 8 + 8 bytes.
pub fn read_mob_id(reader: &mut Reader<'_>) -> Result<MobId, DecodeError> {
    let mut bytes = [0u8; MOB_ID_LEN];

    reader.expect_fixed_length(TAG_A, SMPTE_LABEL_LEN, "mob_id.smpte_label")?;
    bytes[..12].copy_from_slice(reader.read_bytes(12, "mob_id.smpte_label")?);

    // length, instance high/mid/low
    for slot in &mut bytes[12..16] {
        reader.expect_tag(TAG_D)?;
        *slot = reader.read_byte("mob_id.instance")?;
    }

    reader.expect_tag(TAG_H)?;
    bytes[16..20].copy_from_slice(reader.read_bytes(4, "mob_id.material")?);
    reader.expect_tag(TAG_F)?;
    bytes[20..22].copy_from_slice(reader.read_bytes(2, "mob_id.material")?);
    reader.expect_tag(TAG_F)?;
    bytes[22..24].copy_from_slice(reader.read_bytes(2, "mob_id.material")?);

    reader.expect_fixed_length(TAG_A, MATERIAL_TAIL_LEN, "mob_id.material_tail")?;
    bytes[24..32].copy_from_slice(reader.read_bytes(8, "mob_id.material_tail")?);

    Ok(MobId::from_bytes(bytes))
}
