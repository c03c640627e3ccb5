use gitflix_types::FrameGeometry;

/// Errors from the compression engine.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    /// The entropy coder rejected its input.
    #[error("entropy coding failed: {0}")]
    Entropy(String),

    /// Entropy-decoded length does not match the frame geometry.
    #[error("decoded length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// The command stream ended mid-command.
    #[error("truncated delta command stream at offset {offset}")]
    TruncatedStream { offset: usize },

    /// The command stream is structurally invalid.
    #[error("corrupt delta command stream at offset {offset}: {reason}")]
    CorruptStream { offset: usize, reason: String },

    /// A byte difference does not fit the signed-8-bit wire range.
    /// Encoders fall back to RAW when this is raised.
    #[error("delta at byte {offset} outside signed range")]
    DeltaRange { offset: usize },

    /// The predecessor frame's geometry differs from the current frame's.
    #[error("predecessor geometry {actual} does not match frame geometry {expected}")]
    DimensionMismatch {
        expected: FrameGeometry,
        actual: FrameGeometry,
    },

    /// A DELTA frame was presented without a predecessor.
    #[error("delta frame has no reference predecessor")]
    MissingReference,
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
