//! On-disk frame container for GitFlix.
//!
//! Every frame blob in a repository is one [`FrameRecord`] serialized to the
//! byte-exact layout below. The container is the interoperability contract:
//! any implementation that writes these bytes can be played back by any
//! other.
//!
//! # Layout
//!
//! Little-endian, no padding:
//!
//! ```text
//! [4 bytes: magic 0x47564346 ("GVCF")]
//! [4 bytes: frame_number]
//! [4 bytes: width]
//! [4 bytes: height]
//! [4 bytes: channels]
//! [4 bytes: compressed_size]
//! [4 bytes: CRC32 of payload (ISO-HDLC)]
//! [1 byte : compression type (0=raw, 1=delta)]
//! [3 bytes: reserved, must be zero]
//! [N bytes: payload]
//! ```

pub mod error;
pub mod record;

pub use error::{FrameError, FrameResult};
pub use record::{CompressionKind, FrameRecord, FRAME_MAGIC, HEADER_SIZE};
