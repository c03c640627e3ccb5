//! Content-addressed object storage for GitFlix.
//!
//! A video repository is a hash-keyed object store analogous to git's
//! `.git/objects/` directory. Every piece of data — frame blobs, trees,
//! commits — is stored as an immutable object identified by its BLAKE3 hash
//! (domain-separated by object kind).
//!
//! # Object Types
//!
//! - [`Blob`] — a serialized frame container (opaque bytes at this layer)
//! - [`Tree`] — a directory listing; video commits carry exactly one entry,
//!   the `frame.bin` blob
//! - [`Commit`] — tree reference, optional parent, free-form message; the
//!   parent links form the linear frame chain
//!
//! # Storage Backends
//!
//! Both backends implement the [`ObjectStore`] trait:
//!
//! - [`InMemoryObjectStore`] — `HashMap`-based store for tests and embedding
//! - [`FsObjectStore`] — loose objects on disk, one file per object
//!
//! # Design Rules
//!
//! 1. Objects are immutable once written (content-addressing guarantees this).
//! 2. Concurrent reads are always safe (objects are immutable).
//! 3. The store never interprets object contents beyond the kind tag.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;
pub use object::{Blob, Commit, EntryMode, ObjectKind, StoredObject, Tree, TreeEntry};
pub use traits::ObjectStore;
