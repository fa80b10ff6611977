//! MobID: the 32-byte SMPTE UMID-like identifier of a mob.

use std::fmt;

use uuid::Uuid;

/// A 32-byte MobID in wire order.
///
/// Layout: 12-byte universal label, one length byte, three instance bytes
/// (high, mid, low), then a 16-byte material number whose first three
/// groups are stored little-endian.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MobId([u8; 32]);

impl MobId {
    /// Wraps 32 raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Returns the 12-byte universal label.
    pub fn label(&self) -> &[u8] {
        &self.0[..12]
    }

    pub fn length(&self) -> u8 {
        self.0[12]
    }

    pub fn instance_high(&self) -> u8 {
        self.0[13]
    }

    pub fn instance_mid(&self) -> u8 {
        self.0[14]
    }

    pub fn instance_low(&self) -> u8 {
        self.0[15]
    }

    /// Returns the material number as a UUID.
    pub fn material(&self) -> Uuid {
        let m = &self.0[16..];
        let d1 = u32::from_le_bytes([m[0], m[1], m[2], m[3]]);
        let d2 = u16::from_le_bytes([m[4], m[5]]);
        let d3 = u16::from_le_bytes([m[6], m[7]]);
        let mut d4 = [0u8; 8];
        d4.copy_from_slice(&m[8..16]);
        Uuid::from_fields(d1, d2, d3, &d4)
    }
}

impl fmt::Display for MobId {
    /// Formats as `urn:smpte:umid:` followed by eight dot-separated 4-byte hex groups.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let material = self.material();
        let mut umid = [0u8; 32];
        umid[..16].copy_from_slice(&self.0[..16]);
        umid[16..].copy_from_slice(material.as_bytes());

        f.write_str("urn:smpte:umid:")?;
        for (i, group) in umid.chunks(4).enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            for b in group {
                write!(f, "{:02x}", b)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for MobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MobId({})", self)
    }
}
