/// Errors from foundation type construction and parsing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypeError {
    /// A hex string could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// A byte buffer had the wrong length.
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// A frame geometry dimension was zero.
    #[error("degenerate geometry: {width}x{height}x{channels}")]
    DegenerateGeometry {
        width: u32,
        height: u32,
        channels: u32,
    },

    /// A pixel buffer did not match its geometry.
    #[error("pixel buffer length {actual} does not match geometry ({expected} bytes)")]
    PixelLength { expected: usize, actual: usize },
}
