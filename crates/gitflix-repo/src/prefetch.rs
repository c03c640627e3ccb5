use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use gitflix_types::ObjectId;

use crate::cache::BlobCache;
use crate::session::{resolve_frame_blob, SharedStore};

/// Background look-ahead loader.
///
/// Walks the ordered commit id list sequentially, skipping ids already
/// cached, and populates the shared [`BlobCache`] ahead of the consumer. It
/// signals no progress; the decode path simply benefits from cache hits.
/// Store access goes through the same guard as the consumer's.
///
/// The thread terminates when the list is exhausted or the stop flag is
/// raised. Load failures are logged and skipped — the consumer hits the
/// same failure on its own read and surfaces it with full context.
pub struct Prefetcher {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Prefetcher {
    /// Spawn the prefetch thread over the given id list.
    pub(crate) fn start(store: SharedStore, cache: Arc<BlobCache>, ids: Vec<ObjectId>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            debug!(commits = ids.len(), "prefetcher started");
            for id in &ids {
                if flag.load(Ordering::Relaxed) {
                    break;
                }
                if cache.contains(id) {
                    continue;
                }
                match resolve_frame_blob(&store, id) {
                    Ok(bytes) => cache.put(*id, Arc::new(bytes)),
                    Err(e) => {
                        warn!(commit = %id.short_hex(), error = %e, "prefetch skipped commit");
                    }
                }
            }
            debug!("prefetcher finished");
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Raise the stop flag and join the thread.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("prefetcher thread panicked");
            }
        }
    }
}

impl Drop for Prefetcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
