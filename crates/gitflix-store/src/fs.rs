use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use gitflix_types::ObjectId;

use crate::error::{StoreError, StoreResult};
use crate::object::{ObjectKind, StoredObject};
use crate::traits::ObjectStore;

/// Loose-object filesystem store.
///
/// Objects live under `<root>/objects/aa/bbbb…` (first hex byte as the fan
/// directory, remaining 62 hex chars as the filename), mirroring git's loose
/// object layout. Each file is a one-byte kind tag followed by the raw
/// object data; the content hash is re-verified on every read.
pub struct FsObjectStore {
    objects_dir: PathBuf,
}

impl FsObjectStore {
    /// Create the on-disk layout at `root` and open the store.
    ///
    /// Idempotent: opening an existing repository is fine.
    pub fn init(root: &Path) -> StoreResult<Self> {
        let objects_dir = root.join("objects");
        fs::create_dir_all(&objects_dir)?;
        debug!(root = %root.display(), "initialized object store");
        Ok(Self { objects_dir })
    }

    /// Open an existing store, failing if the layout is missing.
    pub fn open(root: &Path) -> StoreResult<Self> {
        let objects_dir = root.join("objects");
        if !objects_dir.is_dir() {
            return Err(StoreError::NotARepository(root.to_path_buf()));
        }
        Ok(Self { objects_dir })
    }

    fn object_path(&self, id: &ObjectId) -> PathBuf {
        let hex = id.to_hex();
        self.objects_dir.join(&hex[..2]).join(&hex[2..])
    }
}

impl ObjectStore for FsObjectStore {
    fn read(&self, id: &ObjectId) -> StoreResult<Option<StoredObject>> {
        let path = self.object_path(id);
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let Some((&tag, data)) = bytes.split_first() else {
            return Err(StoreError::CorruptObject {
                id: *id,
                reason: "empty object file".into(),
            });
        };
        let kind = ObjectKind::from_type_byte(tag).ok_or_else(|| StoreError::CorruptObject {
            id: *id,
            reason: format!("unknown kind tag {tag}"),
        })?;

        let object = StoredObject::new(kind, data.to_vec());
        let computed = object.compute_id();
        if computed != *id {
            return Err(StoreError::HashMismatch { id: *id, computed });
        }
        Ok(Some(object))
    }

    fn write(&self, object: &StoredObject) -> StoreResult<ObjectId> {
        let id = object.compute_id();
        if id.is_null() {
            return Err(StoreError::NullObjectId);
        }

        let path = self.object_path(&id);
        if path.exists() {
            // Content-addressed: an existing file already holds these bytes.
            return Ok(id);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut bytes = Vec::with_capacity(1 + object.data.len());
        bytes.push(object.kind.type_byte());
        bytes.extend_from_slice(&object.data);
        fs::write(&path, &bytes)?;

        debug!(id = %id.short_hex(), kind = %object.kind, size = object.size, "wrote object");
        Ok(id)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(self.object_path(id).exists())
    }
}

impl std::fmt::Debug for FsObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsObjectStore")
            .field("objects_dir", &self.objects_dir)
            .finish()
    }
}
