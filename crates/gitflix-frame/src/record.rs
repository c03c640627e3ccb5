use gitflix_types::FrameGeometry;

use crate::error::{FrameError, FrameResult};

/// `"GVCF"` read as a little-endian u32.
pub const FRAME_MAGIC: u32 = 0x4756_4346;

/// Fixed header size: magic + six u32 fields + type byte + 3 reserved bytes.
pub const HEADER_SIZE: usize = 32;

/// How a frame's payload was produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompressionKind {
    /// Entropy-coded pixels; decodable without any reference frame.
    Raw,
    /// Run-coded byte differences against the predecessor, then entropy-coded.
    Delta,
}

impl CompressionKind {
    /// Wire tag for the container's type byte.
    pub fn type_byte(&self) -> u8 {
        match self {
            Self::Raw => 0,
            Self::Delta => 1,
        }
    }

    /// Parse from the container's type byte. Byte 2 ("entropy") is reserved
    /// and never emitted; it is rejected along with everything else unknown.
    pub fn from_type_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Raw),
            1 => Some(Self::Delta),
            _ => None,
        }
    }
}

impl std::fmt::Display for CompressionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::Delta => write!(f, "delta"),
        }
    }
}

/// One frame as stored on disk: header fields plus the opaque payload.
///
/// The checksum always covers the payload only and is computed at
/// construction; a record in memory is valid by construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRecord {
    /// Position in the chain, starting at 0.
    pub frame_number: u32,
    /// Frame dimensions carried in the header.
    pub geometry: FrameGeometry,
    /// CRC-32 (ISO-HDLC) of `payload`.
    pub checksum: u32,
    /// Codec used for `payload`.
    pub kind: CompressionKind,
    /// Compressed frame bytes.
    pub payload: Vec<u8>,
}

impl FrameRecord {
    /// Build a record, computing the payload checksum.
    pub fn new(
        frame_number: u32,
        geometry: FrameGeometry,
        kind: CompressionKind,
        payload: Vec<u8>,
    ) -> Self {
        let checksum = crc32fast::hash(&payload);
        Self {
            frame_number,
            geometry,
            checksum,
            kind,
            payload,
        }
    }

    /// Total serialized size in bytes.
    pub fn serialized_len(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// Serialize to the byte-exact container layout.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.serialized_len());
        buf.extend_from_slice(&FRAME_MAGIC.to_le_bytes());
        buf.extend_from_slice(&self.frame_number.to_le_bytes());
        buf.extend_from_slice(&self.geometry.width.to_le_bytes());
        buf.extend_from_slice(&self.geometry.height.to_le_bytes());
        buf.extend_from_slice(&self.geometry.channels.to_le_bytes());
        buf.extend_from_slice(&(self.payload.len() as u32).to_le_bytes());
        buf.extend_from_slice(&self.checksum.to_le_bytes());
        buf.push(self.kind.type_byte());
        buf.extend_from_slice(&[0u8; 3]);
        buf.extend_from_slice(&self.payload);
        buf
    }

    /// Deserialize and fully validate a container against the configured
    /// frame target.
    pub fn deserialize(buf: &[u8], expected: FrameGeometry) -> FrameResult<Self> {
        if buf.len() < HEADER_SIZE {
            return Err(FrameError::Truncated {
                needed: HEADER_SIZE,
                available: buf.len(),
            });
        }

        let magic = read_u32(buf, 0);
        if magic != FRAME_MAGIC {
            return Err(FrameError::BadMagic {
                expected: FRAME_MAGIC,
                actual: magic,
            });
        }

        let frame_number = read_u32(buf, 4);
        let actual = FrameGeometry {
            width: read_u32(buf, 8),
            height: read_u32(buf, 12),
            channels: read_u32(buf, 16),
        };
        if actual != expected {
            return Err(FrameError::GeometryMismatch { expected, actual });
        }

        let compressed_size = read_u32(buf, 20) as usize;
        let checksum = read_u32(buf, 24);

        let kind = CompressionKind::from_type_byte(buf[28])
            .ok_or(FrameError::UnknownCompression(buf[28]))?;

        let reserved = [buf[29], buf[30], buf[31]];
        if reserved != [0, 0, 0] {
            return Err(FrameError::ReservedNonzero(reserved));
        }

        let needed = HEADER_SIZE + compressed_size;
        if buf.len() < needed {
            return Err(FrameError::Truncated {
                needed,
                available: buf.len(),
            });
        }
        let payload = buf[HEADER_SIZE..needed].to_vec();

        let computed = crc32fast::hash(&payload);
        if computed != checksum {
            return Err(FrameError::ChecksumMismatch {
                expected: checksum,
                actual: computed,
            });
        }

        Ok(Self {
            frame_number,
            geometry: actual,
            checksum,
            kind,
            payload,
        })
    }
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geom() -> FrameGeometry {
        FrameGeometry::new(8, 8, 3).unwrap()
    }

    fn sample() -> FrameRecord {
        FrameRecord::new(7, geom(), CompressionKind::Delta, vec![1, 2, 3, 4, 5])
    }

    #[test]
    fn roundtrip() {
        let record = sample();
        let bytes = record.serialize();
        let decoded = FrameRecord::deserialize(&bytes, geom()).unwrap();
        assert_eq!(record, decoded);
    }

    #[test]
    fn roundtrip_empty_payload() {
        let record = FrameRecord::new(0, geom(), CompressionKind::Raw, Vec::new());
        let bytes = record.serialize();
        assert_eq!(bytes.len(), HEADER_SIZE);
        let decoded = FrameRecord::deserialize(&bytes, geom()).unwrap();
        assert_eq!(record, decoded);
    }

    #[test]
    fn layout_offsets() {
        let record = sample();
        let bytes = record.serialize();
        assert_eq!(&bytes[0..4], &FRAME_MAGIC.to_le_bytes());
        assert_eq!(&bytes[4..8], &7u32.to_le_bytes());
        assert_eq!(&bytes[8..12], &8u32.to_le_bytes());
        assert_eq!(&bytes[12..16], &8u32.to_le_bytes());
        assert_eq!(&bytes[16..20], &3u32.to_le_bytes());
        assert_eq!(&bytes[20..24], &5u32.to_le_bytes());
        assert_eq!(bytes[28], 1);
        assert_eq!(&bytes[29..32], &[0, 0, 0]);
        assert_eq!(&bytes[32..], &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = sample().serialize();
        bytes[0] ^= 0xFF;
        let err = FrameRecord::deserialize(&bytes, geom()).unwrap_err();
        assert!(matches!(err, FrameError::BadMagic { .. }));
    }

    #[test]
    fn rejects_short_header() {
        let err = FrameRecord::deserialize(&[0u8; 10], geom()).unwrap_err();
        assert!(matches!(err, FrameError::Truncated { .. }));
    }

    #[test]
    fn rejects_truncated_payload() {
        let bytes = sample().serialize();
        let err = FrameRecord::deserialize(&bytes[..bytes.len() - 1], geom()).unwrap_err();
        assert!(matches!(err, FrameError::Truncated { .. }));
    }

    #[test]
    fn rejects_geometry_mismatch() {
        let bytes = sample().serialize();
        let other = FrameGeometry::new(4, 4, 3).unwrap();
        let err = FrameRecord::deserialize(&bytes, other).unwrap_err();
        assert!(matches!(err, FrameError::GeometryMismatch { .. }));
    }

    #[test]
    fn rejects_unknown_compression() {
        let mut bytes = sample().serialize();
        bytes[28] = 2; // reserved "entropy" tag
        let err = FrameRecord::deserialize(&bytes, geom()).unwrap_err();
        assert_eq!(err, FrameError::UnknownCompression(2));
    }

    #[test]
    fn rejects_nonzero_reserved() {
        let mut bytes = sample().serialize();
        bytes[30] = 1;
        let err = FrameRecord::deserialize(&bytes, geom()).unwrap_err();
        assert!(matches!(err, FrameError::ReservedNonzero(_)));
    }

    #[test]
    fn crc_catches_any_payload_bit_flip() {
        let record = sample();
        let clean = record.serialize();
        for byte in HEADER_SIZE..clean.len() {
            for bit in 0..8 {
                let mut corrupt = clean.clone();
                corrupt[byte] ^= 1 << bit;
                let err = FrameRecord::deserialize(&corrupt, geom()).unwrap_err();
                assert!(
                    matches!(err, FrameError::ChecksumMismatch { .. }),
                    "flip at byte {byte} bit {bit} not caught"
                );
            }
        }
    }

    #[test]
    fn type_byte_roundtrip() {
        for kind in [CompressionKind::Raw, CompressionKind::Delta] {
            assert_eq!(CompressionKind::from_type_byte(kind.type_byte()), Some(kind));
        }
        assert_eq!(CompressionKind::from_type_byte(2), None);
        assert_eq!(CompressionKind::from_type_byte(255), None);
    }

    #[test]
    fn kind_display() {
        assert_eq!(format!("{}", CompressionKind::Raw), "raw");
        assert_eq!(format!("{}", CompressionKind::Delta), "delta");
    }
}
