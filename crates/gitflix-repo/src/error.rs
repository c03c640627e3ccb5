use gitflix_types::{ObjectId, TypeError};
use gitflix_store::StoreError;

/// Errors from repository session operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Underlying object store failure.
    #[error("object store: {0}")]
    Store(#[from] StoreError),

    /// A commit referenced by the chain is absent.
    #[error("missing commit object {0}")]
    MissingCommit(ObjectId),

    /// A commit's tree is absent.
    #[error("missing tree object {0}")]
    MissingTree(ObjectId),

    /// A tree's frame blob is absent.
    #[error("missing blob object {0}")]
    MissingBlob(ObjectId),

    /// A commit's tree has no frame entry.
    #[error("commit {0} has no frame.bin entry")]
    MissingFrameEntry(ObjectId),

    /// The parent links loop instead of terminating at a root.
    #[error("commit chain cycle at {0}")]
    ChainCycle(ObjectId),

    /// The HEAD file is unreadable.
    #[error("bad head reference: {0}")]
    BadHead(#[from] TypeError),
}

/// Result alias for repository operations.
pub type RepoResult<T> = Result<T, RepoError>;
