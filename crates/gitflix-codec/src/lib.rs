//! Frame compression engine for GitFlix.
//!
//! Two codecs over raw pixel buffers, both wrapping a deterministic lossless
//! entropy coder:
//!
//! - **RAW**: the pixel byte stream, entropy-coded. Decodable standalone.
//! - **DELTA**: a run-length transform of byte differences against the
//!   predecessor frame, then entropy-coded. Requires the predecessor's exact
//!   reconstruction to decode.
//!
//! The chain is drift-sensitive: every DELTA frame must decode against the
//! byte-exact predecessor the encoder used. [`compress_frame`] therefore
//! falls back to RAW whenever a byte difference would not survive the
//! signed-8-bit wire representation.

pub mod delta;
pub mod entropy;
pub mod error;

pub use error::{CodecError, CodecResult};

use gitflix_frame::{CompressionKind, FrameRecord};
use gitflix_types::{FrameGeometry, RawFrame};

/// Entropy-code a frame's pixels into a RAW payload.
pub fn encode_raw(frame: &RawFrame) -> CodecResult<Vec<u8>> {
    entropy::compress(frame.pixels())
}

/// Decode a RAW payload back into a frame.
///
/// Fails if the entropy-decoded length does not match the geometry.
pub fn decode_raw(payload: &[u8], geometry: FrameGeometry) -> CodecResult<RawFrame> {
    let pixels = entropy::decompress(payload)?;
    let expected = geometry.pixel_bytes();
    if pixels.len() != expected {
        return Err(CodecError::LengthMismatch {
            expected,
            actual: pixels.len(),
        });
    }
    // Length was just verified, so construction cannot fail.
    Ok(RawFrame::new(geometry, pixels).expect("length verified"))
}

/// Encode `current` as differences against `previous`.
///
/// Fails with [`CodecError::DeltaRange`] when any byte difference falls
/// outside the signed-8-bit range; callers fall back to RAW.
pub fn encode_delta(previous: &RawFrame, current: &RawFrame) -> CodecResult<Vec<u8>> {
    if previous.geometry() != current.geometry() {
        return Err(CodecError::DimensionMismatch {
            expected: current.geometry(),
            actual: previous.geometry(),
        });
    }
    let commands = delta::transform(previous.pixels(), current.pixels())?;
    entropy::compress(&commands)
}

/// Decode a DELTA payload against the predecessor's reconstruction.
pub fn decode_delta(
    payload: &[u8],
    previous: &RawFrame,
    geometry: FrameGeometry,
) -> CodecResult<RawFrame> {
    if previous.geometry() != geometry {
        return Err(CodecError::DimensionMismatch {
            expected: geometry,
            actual: previous.geometry(),
        });
    }
    let commands = entropy::decompress(payload)?;
    let pixels = delta::apply(&commands, previous.pixels())?;
    Ok(RawFrame::new(geometry, pixels).expect("apply preserves length"))
}

/// Select the compression mode for a frame and produce its payload.
///
/// The first frame of a chain (no predecessor) is always RAW. Later frames
/// are DELTA unless the range check fails, in which case they degrade to
/// RAW so the chain stays lossless.
pub fn compress_frame(
    current: &RawFrame,
    previous: Option<&RawFrame>,
) -> CodecResult<(CompressionKind, Vec<u8>)> {
    if let Some(prev) = previous {
        match encode_delta(prev, current) {
            Ok(payload) => return Ok((CompressionKind::Delta, payload)),
            Err(CodecError::DeltaRange { .. }) => {}
            Err(e) => return Err(e),
        }
    }
    Ok((CompressionKind::Raw, encode_raw(current)?))
}

/// Strict record decode: dispatch on the record's compression kind.
///
/// A DELTA record with no predecessor is rejected with
/// [`CodecError::MissingReference`]; lenient callers may instead attempt a
/// RAW decode themselves.
pub fn decode_frame(record: &FrameRecord, previous: Option<&RawFrame>) -> CodecResult<RawFrame> {
    match record.kind {
        CompressionKind::Raw => decode_raw(&record.payload, record.geometry),
        CompressionKind::Delta => match previous {
            Some(prev) => decode_delta(&record.payload, prev, record.geometry),
            None => Err(CodecError::MissingReference),
        },
    }
}
