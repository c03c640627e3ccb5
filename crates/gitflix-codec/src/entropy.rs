//! The opaque entropy stage shared by both codecs.
//!
//! zstd at a fixed level: deterministic, lossless, and round-trip-exact on
//! arbitrary byte inputs, which is all the frame format asks of it.

use crate::error::{CodecError, CodecResult};

/// zstd compression level for frame payloads.
const LEVEL: i32 = 3;

/// Compress an arbitrary byte stream.
pub fn compress(data: &[u8]) -> CodecResult<Vec<u8>> {
    zstd::encode_all(data, LEVEL).map_err(|e| CodecError::Entropy(e.to_string()))
}

/// Decompress a stream produced by [`compress`].
pub fn decompress(data: &[u8]) -> CodecResult<Vec<u8>> {
    zstd::decode_all(data).map_err(|e| CodecError::Entropy(e.to_string()))
}
