use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

use gitflix_frame::{CompressionKind, HEADER_SIZE};
use gitflix_store::{Blob, Commit, FsObjectStore, InMemoryObjectStore, ObjectStore, Tree};
use gitflix_types::ObjectId;

use crate::cache::BlobCache;
use crate::error::{RepoError, RepoResult};
use crate::head;
use crate::prefetch::Prefetcher;

/// The single tree entry every video commit carries.
pub const FRAME_ENTRY: &str = "frame.bin";

/// The object store behind its access guard.
///
/// The underlying store is not assumed reentrant-safe; the decode path and
/// the prefetcher serialize all store operations through this one mutex.
pub(crate) type SharedStore = Arc<Mutex<Box<dyn ObjectStore>>>;

/// Session tuning knobs.
#[derive(Clone, Debug)]
pub struct RepoConfig {
    /// Blob cache slots shared by the decoder and the prefetcher.
    pub cache_slots: usize,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self { cache_slots: 32 }
    }
}

/// A video repository session.
///
/// Owns the store guard, the shared blob cache, the chain tip, and the
/// optional background prefetcher. All owned resources are released when the
/// session is dropped; [`VideoRepo::close`] makes the teardown explicit.
pub struct VideoRepo {
    store: SharedStore,
    cache: Arc<BlobCache>,
    tip: Mutex<Option<ObjectId>>,
    head_root: Option<PathBuf>,
    prefetcher: Mutex<Option<Prefetcher>>,
}

impl VideoRepo {
    /// Create a new on-disk repository at `path`.
    pub fn init(path: &Path, config: RepoConfig) -> RepoResult<Self> {
        let store = FsObjectStore::init(path)?;
        let tip = head::load(path)?;
        Ok(Self::from_parts(
            Box::new(store),
            tip,
            Some(path.to_path_buf()),
            config,
        ))
    }

    /// Open an existing on-disk repository.
    pub fn open(path: &Path, config: RepoConfig) -> RepoResult<Self> {
        let store = FsObjectStore::open(path)?;
        let tip = head::load(path)?;
        Ok(Self::from_parts(
            Box::new(store),
            tip,
            Some(path.to_path_buf()),
            config,
        ))
    }

    /// An in-memory repository for tests and embedding.
    pub fn in_memory(config: RepoConfig) -> Self {
        Self::from_parts(Box::new(InMemoryObjectStore::new()), None, None, config)
    }

    fn from_parts(
        store: Box<dyn ObjectStore>,
        tip: Option<ObjectId>,
        head_root: Option<PathBuf>,
        config: RepoConfig,
    ) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            cache: Arc::new(BlobCache::new(config.cache_slots)),
            tip: Mutex::new(tip),
            head_root,
            prefetcher: Mutex::new(None),
        }
    }

    /// The current chain tip, `None` for an empty repository.
    pub fn tip(&self) -> Option<ObjectId> {
        *self.tip.lock().expect("tip lock poisoned")
    }

    /// The shared blob cache (exposed for inspection).
    pub fn cache(&self) -> &Arc<BlobCache> {
        &self.cache
    }

    /// Walk the commit chain from the root to the tip, oldest first.
    ///
    /// Implemented as an ancestry walk from the tip following `parent`
    /// links, then reversed.
    pub fn walk_chain(&self) -> RepoResult<Vec<ObjectId>> {
        let Some(tip) = self.tip() else {
            return Ok(Vec::new());
        };

        let store = self.store.lock().expect("store guard poisoned");
        let mut ids = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = Some(tip);

        while let Some(id) = cursor {
            if !seen.insert(id) {
                return Err(RepoError::ChainCycle(id));
            }
            let obj = store.read(&id)?.ok_or(RepoError::MissingCommit(id))?;
            let commit = Commit::from_stored_object(&obj)?;
            ids.push(id);
            cursor = commit.parent;
        }
        drop(store);

        ids.reverse();
        debug!(commits = ids.len(), "walked chain");
        Ok(ids)
    }

    /// Materialize the frame blob under a commit, cache-aware.
    ///
    /// The cache is consulted first; on miss the commit, its tree, the
    /// `frame.bin` entry, and the blob are resolved under one guard
    /// acquisition, and the result is inserted.
    pub fn get_blob(&self, commit_id: &ObjectId) -> RepoResult<Arc<Vec<u8>>> {
        if let Some(bytes) = self.cache.get(commit_id) {
            return Ok(bytes);
        }
        let bytes = Arc::new(resolve_frame_blob(&self.store, commit_id)?);
        self.cache.put(*commit_id, Arc::clone(&bytes));
        Ok(bytes)
    }

    /// Append one frame: blob, single-entry tree, and commit.
    ///
    /// Advances the session tip (persisting `HEAD` for on-disk stores) and
    /// returns the new commit id.
    pub fn write_frame(
        &self,
        frame_bytes: &[u8],
        parent: Option<ObjectId>,
        frame_index: u32,
        kind: CompressionKind,
    ) -> RepoResult<ObjectId> {
        let payload_len = frame_bytes.len().saturating_sub(HEADER_SIZE);
        let message = format!("Frame {frame_index:06} ({kind}, {payload_len} bytes)");

        let commit_id = {
            let store = self.store.lock().expect("store guard poisoned");
            let blob_id = store.write(&Blob::new(frame_bytes.to_vec()).to_stored_object())?;
            let tree = Tree::single_file(FRAME_ENTRY, blob_id);
            let tree_id = store.write(&tree.to_stored_object()?)?;
            let commit = Commit::new(tree_id, parent, message);
            store.write(&commit.to_stored_object()?)?
        };

        *self.tip.lock().expect("tip lock poisoned") = Some(commit_id);
        if let Some(root) = &self.head_root {
            head::store(root, &commit_id)?;
        }

        debug!(
            frame = frame_index,
            commit = %commit_id.short_hex(),
            kind = %kind,
            "appended frame commit"
        );
        Ok(commit_id)
    }

    /// Launch the background prefetcher over an ordered id list, replacing
    /// any previous one.
    pub fn start_prefetch(&self, ids: Vec<ObjectId>) {
        let prefetcher = Prefetcher::start(
            Arc::clone(&self.store),
            Arc::clone(&self.cache),
            ids,
        );
        let mut slot = self.prefetcher.lock().expect("prefetcher lock poisoned");
        if let Some(old) = slot.replace(prefetcher) {
            old.stop();
        }
    }

    /// Stop and join the prefetcher, if running.
    pub fn stop_prefetch(&self) {
        let taken = self
            .prefetcher
            .lock()
            .expect("prefetcher lock poisoned")
            .take();
        if let Some(prefetcher) = taken {
            prefetcher.stop();
        }
    }

    /// Tear the session down: stop the prefetcher and release the store.
    pub fn close(self) {
        self.stop_prefetch();
    }
}

impl Drop for VideoRepo {
    fn drop(&mut self) {
        self.stop_prefetch();
    }
}

/// Resolve commit → tree → `frame.bin` → blob bytes under one guard hold.
pub(crate) fn resolve_frame_blob(
    store: &SharedStore,
    commit_id: &ObjectId,
) -> RepoResult<Vec<u8>> {
    let store = store.lock().expect("store guard poisoned");

    let obj = store
        .read(commit_id)?
        .ok_or(RepoError::MissingCommit(*commit_id))?;
    let commit = Commit::from_stored_object(&obj)?;

    let tree_obj = store
        .read(&commit.tree)?
        .ok_or(RepoError::MissingTree(commit.tree))?;
    let tree = Tree::from_stored_object(&tree_obj)?;

    let entry = tree
        .get(FRAME_ENTRY)
        .ok_or(RepoError::MissingFrameEntry(*commit_id))?;
    let blob_obj = store
        .read(&entry.object_id)?
        .ok_or(RepoError::MissingBlob(entry.object_id))?;
    let blob = Blob::from_stored_object(&blob_obj)?;
    Ok(blob.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_n_frames(repo: &VideoRepo, n: u32) -> Vec<ObjectId> {
        let mut parent = None;
        let mut ids = Vec::new();
        for i in 0..n {
            let bytes = vec![i as u8; 64];
            let kind = if i == 0 {
                CompressionKind::Raw
            } else {
                CompressionKind::Delta
            };
            let id = repo.write_frame(&bytes, parent, i, kind).unwrap();
            parent = Some(id);
            ids.push(id);
        }
        ids
    }

    #[test]
    fn empty_repo_has_empty_chain() {
        let repo = VideoRepo::in_memory(RepoConfig::default());
        assert!(repo.tip().is_none());
        assert!(repo.walk_chain().unwrap().is_empty());
    }

    #[test]
    fn write_frame_advances_tip() {
        let repo = VideoRepo::in_memory(RepoConfig::default());
        let id0 = repo.write_frame(&[1; 40], None, 0, CompressionKind::Raw).unwrap();
        assert_eq!(repo.tip(), Some(id0));
        let id1 = repo
            .write_frame(&[2; 40], Some(id0), 1, CompressionKind::Delta)
            .unwrap();
        assert_eq!(repo.tip(), Some(id1));
    }

    #[test]
    fn walk_chain_is_oldest_first() {
        let repo = VideoRepo::in_memory(RepoConfig::default());
        let written = write_n_frames(&repo, 10);
        let walked = repo.walk_chain().unwrap();
        assert_eq!(walked, written);
    }

    #[test]
    fn get_blob_returns_frame_bytes() {
        let repo = VideoRepo::in_memory(RepoConfig::default());
        let ids = write_n_frames(&repo, 3);
        for (i, id) in ids.iter().enumerate() {
            let bytes = repo.get_blob(id).unwrap();
            assert_eq!(*bytes, vec![i as u8; 64]);
        }
    }

    #[test]
    fn get_blob_populates_cache() {
        let repo = VideoRepo::in_memory(RepoConfig::default());
        let ids = write_n_frames(&repo, 2);
        assert!(!repo.cache().contains(&ids[0]));
        repo.get_blob(&ids[0]).unwrap();
        assert!(repo.cache().contains(&ids[0]));
    }

    #[test]
    fn get_blob_missing_commit() {
        let repo = VideoRepo::in_memory(RepoConfig::default());
        let err = repo.get_blob(&ObjectId::from_bytes(b"ghost")).unwrap_err();
        assert!(matches!(err, RepoError::MissingCommit(_)));
    }

    #[test]
    fn commit_message_format() {
        let repo = VideoRepo::in_memory(RepoConfig::default());
        let frame_bytes = vec![0u8; HEADER_SIZE + 123];
        let id = repo
            .write_frame(&frame_bytes, None, 7, CompressionKind::Delta)
            .unwrap();

        let store = repo.store.lock().unwrap();
        let obj = store.read(&id).unwrap().unwrap();
        let commit = Commit::from_stored_object(&obj).unwrap();
        assert_eq!(commit.message, "Frame 000007 (delta, 123 bytes)");
    }

    #[test]
    fn fs_repo_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let written = {
            let repo = VideoRepo::init(dir.path(), RepoConfig::default()).unwrap();
            let ids = write_n_frames(&repo, 5);
            repo.close();
            ids
        };

        let repo = VideoRepo::open(dir.path(), RepoConfig::default()).unwrap();
        assert_eq!(repo.tip(), Some(written[4]));
        assert_eq!(repo.walk_chain().unwrap(), written);
        assert_eq!(*repo.get_blob(&written[2]).unwrap(), vec![2u8; 64]);
    }

    #[test]
    fn open_missing_repo_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(VideoRepo::open(&dir.path().join("absent"), RepoConfig::default()).is_err());
    }

    #[test]
    fn prefetch_warms_cache() {
        let repo = VideoRepo::in_memory(RepoConfig::default());
        let ids = write_n_frames(&repo, 8);

        repo.start_prefetch(ids.clone());
        repo.stop_prefetch(); // joins; the short list is done by then

        // With 8 frames and 32 slots, nothing was evicted.
        for id in &ids {
            assert!(repo.cache().contains(id), "prefetcher missed {id:?}");
        }
    }

    #[test]
    fn prefetch_stops_promptly_on_long_list() {
        let repo = VideoRepo::in_memory(RepoConfig::default());
        let ids = write_n_frames(&repo, 4);
        // A list far longer than the store contents: unknown ids are skipped
        // with a warning, and stop() must still return.
        let mut long: Vec<ObjectId> = ids.clone();
        long.extend((0..1000u32).map(|n| ObjectId::from_bytes(&n.to_le_bytes())));
        repo.start_prefetch(long);
        repo.stop_prefetch();
    }
}
