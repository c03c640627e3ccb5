use tracing::{debug, info};

use gitflix_codec as codec;
use gitflix_frame::{CompressionKind, FrameRecord};
use gitflix_repo::VideoRepo;
use gitflix_types::{FrameGeometry, ObjectId, RawFrame};

use crate::error::{PipelineError, PipelineResult};
use crate::source::FrameSource;

/// Totals for one encoding run.
#[derive(Clone, Debug, Default)]
pub struct EncodeStats {
    /// Frames committed to the chain.
    pub frames: u32,
    /// Frames stored as keyframes.
    pub raw_frames: u32,
    /// Frames stored as deltas.
    pub delta_frames: u32,
    /// Uncompressed input bytes consumed.
    pub input_bytes: u64,
    /// Serialized container bytes written.
    pub stored_bytes: u64,
}

impl EncodeStats {
    /// Input-to-stored ratio; 0 when nothing was stored.
    pub fn compression_ratio(&self) -> f64 {
        if self.stored_bytes == 0 {
            0.0
        } else {
            self.input_bytes as f64 / self.stored_bytes as f64
        }
    }
}

/// Encode an ordered frame stream into the repository, one commit per frame.
///
/// The first frame is a keyframe; later frames are deltas against the exact
/// frame the decoder will reconstruct, falling back to keyframes when the
/// byte differences exceed the signed wire range. Any failure aborts the
/// run; commits already written stay on disk but the chain simply ends at
/// the last good frame.
pub fn encode_source(
    repo: &VideoRepo,
    source: &mut dyn FrameSource,
    target: FrameGeometry,
) -> PipelineResult<EncodeStats> {
    let mut previous: Option<RawFrame> = None;
    let mut parent: Option<ObjectId> = None;
    let mut frame_index: u32 = 0;
    let mut stats = EncodeStats::default();

    while let Some(frame) = source.next_frame()? {
        if frame.geometry() != target {
            return Err(PipelineError::SourceGeometry {
                expected: target,
                actual: frame.geometry(),
            });
        }

        let (kind, payload) = codec::compress_frame(&frame, previous.as_ref())
            .map_err(|source| PipelineError::Codec {
                frame: frame_index,
                source,
            })?;
        let record = FrameRecord::new(frame_index, target, kind, payload);
        let bytes = record.serialize();

        let commit_id = repo
            .write_frame(&bytes, parent, frame_index, kind)
            .map_err(|source| PipelineError::Append {
                frame: frame_index,
                source,
            })?;

        stats.frames += 1;
        match kind {
            CompressionKind::Raw => stats.raw_frames += 1,
            CompressionKind::Delta => stats.delta_frames += 1,
        }
        stats.input_bytes += target.pixel_bytes() as u64;
        stats.stored_bytes += bytes.len() as u64;

        debug!(
            frame = frame_index,
            kind = %kind,
            payload = record.payload.len(),
            commit = %commit_id.short_hex(),
            "encoded frame"
        );

        previous = Some(frame);
        parent = Some(commit_id);
        frame_index += 1;
    }

    info!(
        frames = stats.frames,
        raw = stats.raw_frames,
        delta = stats.delta_frames,
        ratio = format!("{:.2}", stats.compression_ratio()),
        "encode complete"
    );
    Ok(stats)
}
