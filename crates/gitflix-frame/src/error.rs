use gitflix_types::FrameGeometry;

/// Errors from frame container serialization and deserialization.
///
/// Every variant is a "malformed frame" disposition: the record cannot be
/// trusted and the frame is lost.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FrameError {
    /// The buffer does not start with the frame magic.
    #[error("bad frame magic: expected {expected:#010x}, got {actual:#010x}")]
    BadMagic { expected: u32, actual: u32 },

    /// The buffer is shorter than the header plus declared payload.
    #[error("truncated frame record: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    /// The header dimensions do not match the configured target.
    #[error("frame geometry {actual} does not match configured target {expected}")]
    GeometryMismatch {
        expected: FrameGeometry,
        actual: FrameGeometry,
    },

    /// The compression type byte is not a known codec.
    #[error("unknown compression type: {0}")]
    UnknownCompression(u8),

    /// A reserved header byte was non-zero.
    #[error("reserved header bytes must be zero, got {0:02x?}")]
    ReservedNonzero([u8; 3]),

    /// The payload checksum did not verify.
    #[error("payload checksum mismatch: header {expected:#010x}, computed {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },
}

/// Result alias for container operations.
pub type FrameResult<T> = Result<T, FrameError>;
