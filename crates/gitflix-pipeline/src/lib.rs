//! Encoder and playback pipelines for GitFlix.
//!
//! Encoding is a single-threaded loop: pull ordered frames from a
//! [`FrameSource`], pick a compression mode per frame, serialize, and append
//! one commit per frame.
//!
//! Playback runs three concurrent activities: the repository's prefetcher
//! warms the blob cache, a decode worker turns commits back into raw frames,
//! and the presenter drains the bounded [`FrameQueue`] at the target rate.
//! A shared [`ExitFlag`] stops all of them; every blocking wait observes it
//! within one bounded poll interval.

pub mod encoder;
pub mod error;
pub mod pacer;
pub mod player;
pub mod presenter;
pub mod queue;
pub mod signal;
pub mod source;

pub use encoder::{encode_source, EncodeStats};
pub use error::{PipelineError, PipelineResult, PresenterError, SourceError};
pub use pacer::FramePacer;
pub use player::{play, play_ids, PlaybackStats, PlayerConfig};
pub use presenter::{HeadlessPresenter, Presenter};
pub use queue::{FrameQueue, Recv};
pub use signal::ExitFlag;
pub use source::{FrameSource, MemorySource, PatternSource, RgbSequenceSource};
