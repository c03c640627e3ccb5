//! Foundation types for GitFlix.
//!
//! This crate provides the identity and pixel-buffer types used throughout
//! the GitFlix system. Every other GitFlix crate depends on `gitflix-types`.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Content-addressed identifier (BLAKE3 hash)
//! - [`FrameGeometry`] — The configured frame target (width, height, channels)
//! - [`RawFrame`] — An uncompressed RGB pixel buffer with validated length

pub mod error;
pub mod frame;
pub mod id;

pub use error::TypeError;
pub use frame::{FrameGeometry, RawFrame};
pub use id::ObjectId;
