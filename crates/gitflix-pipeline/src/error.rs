use std::path::PathBuf;

use gitflix_codec::CodecError;
use gitflix_frame::FrameError;
use gitflix_repo::RepoError;
use gitflix_types::{FrameGeometry, ObjectId, TypeError};

/// Failure reported by the presentation sink.
#[derive(Debug, thiserror::Error)]
#[error("presenter: {0}")]
pub struct PresenterError(pub String);

/// Errors from frame sources feeding the encoder.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// I/O failure reading frame data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A frame file had the wrong size for the configured geometry.
    #[error("frame file {path} has {actual} bytes, expected {expected}")]
    WrongSize {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    /// A pixel buffer failed validation.
    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Pipeline failures, each carrying the offending frame number or commit id.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Chain discovery failed before any frame was identified.
    #[error("chain walk: {0}")]
    Chain(RepoError),

    /// A frame blob could not be materialized from the store.
    #[error("commit {commit}: {source}")]
    Fetch { commit: ObjectId, source: RepoError },

    /// A frame commit could not be appended.
    #[error("frame {frame}: {source}")]
    Append { frame: u32, source: RepoError },

    /// A frame container failed validation.
    #[error("frame {frame}: {source}")]
    Container { frame: u32, source: FrameError },

    /// A frame failed to compress or decompress.
    #[error("frame {frame}: {source}")]
    Codec { frame: u32, source: CodecError },

    /// The presentation sink reported failure.
    #[error(transparent)]
    Presenter(#[from] PresenterError),

    /// The frame source failed.
    #[error("frame source: {0}")]
    Source(#[from] SourceError),

    /// A source yielded a frame that does not match the session target.
    #[error("source frame geometry {actual} does not match target {expected}")]
    SourceGeometry {
        expected: FrameGeometry,
        actual: FrameGeometry,
    },

    /// The decode worker thread panicked.
    #[error("decode worker panicked")]
    WorkerPanic,
}

/// Result alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
