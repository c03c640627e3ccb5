use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use gitflix_codec as codec;
use gitflix_frame::{CompressionKind, FrameRecord};
use gitflix_repo::VideoRepo;
use gitflix_types::{FrameGeometry, ObjectId, RawFrame};

use crate::error::{PipelineError, PipelineResult};
use crate::pacer::FramePacer;
use crate::presenter::Presenter;
use crate::queue::{FrameQueue, Recv};
use crate::signal::ExitFlag;

/// Playback tuning knobs.
#[derive(Clone, Debug)]
pub struct PlayerConfig {
    /// Presentation rate when paced.
    pub target_fps: u32,
    /// Decoder-to-presenter queue depth.
    pub queue_capacity: usize,
    /// Bound on every blocking wait; cancellation latency.
    pub poll_interval: Duration,
    /// Pace presents to `target_fps`, or run flat-out.
    pub paced: bool,
    /// Warm the blob cache with the background prefetcher.
    pub prefetch: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            target_fps: 60,
            queue_capacity: 16,
            poll_interval: Duration::from_millis(16),
            paced: true,
            prefetch: true,
        }
    }
}

impl PlayerConfig {
    /// The configuration for playing a streamed id list: no pacing.
    pub fn flat_out() -> Self {
        Self {
            paced: false,
            ..Self::default()
        }
    }
}

/// Totals for one playback run.
#[derive(Clone, Debug, Default)]
pub struct PlaybackStats {
    /// Frames handed to the presenter.
    pub frames_presented: u64,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl PlaybackStats {
    /// Mean presentation rate over the run.
    pub fn mean_fps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.frames_presented as f64 / secs
        } else {
            0.0
        }
    }
}

/// Play the repository's full chain through the presenter.
pub fn play(
    repo: &Arc<VideoRepo>,
    presenter: &mut dyn Presenter,
    geometry: FrameGeometry,
    config: PlayerConfig,
) -> PipelineResult<PlaybackStats> {
    let chain = repo.walk_chain().map_err(PipelineError::Chain)?;
    play_ids(repo, presenter, geometry, config, chain)
}

/// Play an explicit ordered commit id list through the presenter.
///
/// Spawns the decode worker, optionally starts the prefetcher, and runs the
/// presenter loop on the calling thread. Per-frame failures are fatal: the
/// exit flag flips, both sides unwind, and the error surfaces with the
/// offending frame number or commit id.
pub fn play_ids(
    repo: &Arc<VideoRepo>,
    presenter: &mut dyn Presenter,
    geometry: FrameGeometry,
    config: PlayerConfig,
    chain: Vec<ObjectId>,
) -> PipelineResult<PlaybackStats> {
    info!(frames = chain.len(), paced = config.paced, "starting playback");
    presenter.init(geometry.width, geometry.height)?;

    if config.prefetch {
        repo.start_prefetch(chain.clone());
    }

    let queue = Arc::new(FrameQueue::new(config.queue_capacity, config.poll_interval));
    let exit = ExitFlag::new();

    let worker = {
        let repo = Arc::clone(repo);
        let queue = Arc::clone(&queue);
        let exit = exit.clone();
        thread::spawn(move || {
            let result = decode_loop(&repo, &queue, &exit, geometry, &chain);
            // Wake the presenter whether we finished or failed; failures
            // additionally abort any remaining hand-offs.
            queue.close();
            if result.is_err() {
                exit.set();
            }
            result
        })
    };

    let start = Instant::now();
    let mut pacer = FramePacer::new(config.target_fps);
    let mut stats = PlaybackStats::default();
    let mut presenter_error: Option<PipelineError> = None;

    loop {
        if exit.is_set() {
            break;
        }
        if presenter.should_close() {
            debug!("presenter requested close");
            exit.set();
            break;
        }
        match queue.recv(&exit) {
            Recv::Frame(frame) => {
                if let Err(e) = presenter.present(&frame) {
                    presenter_error = Some(e.into());
                    exit.set();
                    break;
                }
                stats.frames_presented += 1;
                if config.paced {
                    pacer.pace();
                }
                // The frame drops here: presented, then released.
            }
            Recv::Empty => continue,
            Recv::Closed => break,
        }
    }
    stats.elapsed = start.elapsed();

    // Shutdown order: flag, wake waiters, join the worker, stop the
    // prefetcher, drain the queue, release the sink.
    exit.set();
    queue.close();
    let worker_result = worker.join().map_err(|_| PipelineError::WorkerPanic)?;
    repo.stop_prefetch();
    let dropped = queue.drain();
    if dropped > 0 {
        debug!(dropped, "released undrained frames");
    }
    presenter.cleanup();

    worker_result?;
    if let Some(e) = presenter_error {
        return Err(e);
    }

    info!(
        frames = stats.frames_presented,
        fps = format!("{:.1}", stats.mean_fps()),
        "playback finished"
    );
    Ok(stats)
}

/// The decode worker: fetch, deserialize, decompress, enqueue — in chain
/// order, holding the previous frame for delta reconstruction.
fn decode_loop(
    repo: &VideoRepo,
    queue: &FrameQueue,
    exit: &ExitFlag,
    geometry: FrameGeometry,
    chain: &[ObjectId],
) -> PipelineResult<()> {
    let mut previous: Option<RawFrame> = None;

    for (index, commit_id) in chain.iter().enumerate() {
        if exit.is_set() {
            break;
        }
        let frame_index = index as u32;

        let bytes = repo.get_blob(commit_id).map_err(|source| PipelineError::Fetch {
            commit: *commit_id,
            source,
        })?;

        let record = FrameRecord::deserialize(&bytes, geometry).map_err(|source| {
            PipelineError::Container {
                frame: frame_index,
                source,
            }
        })?;

        let frame = match (record.kind, previous.as_ref()) {
            // Defensive recovery for malformed streams: a delta with no
            // reference is decoded as a keyframe.
            (CompressionKind::Delta, None) => {
                warn!(frame = frame_index, "delta frame with no predecessor, decoding as raw");
                codec::decode_raw(&record.payload, geometry)
            }
            _ => codec::decode_frame(&record, previous.as_ref()),
        }
        .map_err(|source| PipelineError::Codec {
            frame: frame_index,
            source,
        })?;

        // The presenter gets its own copy; the decoder keeps the frame as
        // the next delta reference.
        if !queue.send(frame.clone(), exit) {
            break;
        }
        previous = Some(frame);
    }
    Ok(())
}
