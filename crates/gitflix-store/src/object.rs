use serde::{Deserialize, Serialize};
use gitflix_types::ObjectId;

use crate::error::{StoreError, StoreResult};

/// The kind of object stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Raw content: a serialized frame container.
    Blob,
    /// Directory listing mapping names to object references.
    Tree,
    /// A chain link: tree + optional parent + message.
    Commit,
}

impl ObjectKind {
    /// One-byte tag used by on-disk backends.
    pub fn type_byte(&self) -> u8 {
        match self {
            Self::Blob => 1,
            Self::Tree => 2,
            Self::Commit => 3,
        }
    }

    /// Parse from an on-disk tag byte.
    pub fn from_type_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(Self::Blob),
            2 => Some(Self::Tree),
            3 => Some(Self::Commit),
            _ => None,
        }
    }

    /// Domain tag prepended to every hash computation. Prevents cross-type
    /// collisions: a blob and a commit with identical bytes hash differently.
    fn hash_domain(&self) -> &'static str {
        match self {
            Self::Blob => "gitflix-blob-v1",
            Self::Tree => "gitflix-tree-v1",
            Self::Commit => "gitflix-commit-v1",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blob => write!(f, "blob"),
            Self::Tree => write!(f, "tree"),
            Self::Commit => write!(f, "commit"),
        }
    }
}

/// A stored object: kind tag + serialized data + cached size.
///
/// `StoredObject` is the unit of storage. The store never interprets the
/// contents of the data — it is a pure key-value store keyed by content hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// The type of this object.
    pub kind: ObjectKind,
    /// The serialized bytes of the object.
    pub data: Vec<u8>,
    /// The size of `data` in bytes.
    pub size: u64,
}

impl StoredObject {
    /// Create a new stored object from kind and data.
    pub fn new(kind: ObjectKind, data: Vec<u8>) -> Self {
        let size = data.len() as u64;
        Self { kind, data, size }
    }

    /// Compute the content-addressed ID for this object.
    pub fn compute_id(&self) -> ObjectId {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.kind.hash_domain().as_bytes());
        hasher.update(b":");
        hasher.update(&self.data);
        ObjectId::from_hash(*hasher.finalize().as_bytes())
    }
}

// ---------------------------------------------------------------------------
// Blob
// ---------------------------------------------------------------------------

/// Raw content object holding one serialized frame container.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub data: Vec<u8>,
}

impl Blob {
    /// Create a new blob from raw bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoredObject {
        StoredObject::new(ObjectKind::Blob, self.data.clone())
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        if obj.kind != ObjectKind::Blob {
            return Err(StoreError::CorruptObject {
                id: obj.compute_id(),
                reason: format!("expected blob, got {}", obj.kind),
            });
        }
        Ok(Self {
            data: obj.data.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tree
// ---------------------------------------------------------------------------

/// File mode for a tree entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryMode {
    /// Normal file (0o100644).
    Regular,
    /// Subtree / directory (0o040000).
    Directory,
}

impl EntryMode {
    /// Octal mode value (for display/serialization).
    pub fn mode_bits(&self) -> u32 {
        match self {
            Self::Regular => 0o100644,
            Self::Directory => 0o040000,
        }
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:06o}", self.mode_bits())
    }
}

/// A single entry in a tree object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// File mode.
    pub mode: EntryMode,
    /// Entry name.
    pub name: String,
    /// Content-addressed ID of the referenced object.
    pub object_id: ObjectId,
}

impl TreeEntry {
    /// Create a new tree entry.
    pub fn new(mode: EntryMode, name: impl Into<String>, object_id: ObjectId) -> Self {
        Self {
            mode,
            name: name.into(),
            object_id,
        }
    }
}

/// Directory listing object.
///
/// Video commits carry exactly one entry, the `frame.bin` blob, but the
/// structure supports arbitrary listings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    /// Entries, sorted by name for deterministic hashing.
    pub entries: Vec<TreeEntry>,
}

impl Tree {
    /// Create a new tree with the given entries, sorted by name.
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self { entries }
    }

    /// A tree holding a single regular file.
    pub fn single_file(name: impl Into<String>, blob_id: ObjectId) -> Self {
        Self {
            entries: vec![TreeEntry::new(EntryMode::Regular, name, blob_id)],
        }
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        let data =
            serde_json::to_vec(self).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(StoredObject::new(ObjectKind::Tree, data))
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        if obj.kind != ObjectKind::Tree {
            return Err(StoreError::CorruptObject {
                id: obj.compute_id(),
                reason: format!("expected tree, got {}", obj.kind),
            });
        }
        serde_json::from_slice(&obj.data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Commit
// ---------------------------------------------------------------------------

/// A chain link: one frame's tree plus the previous frame's commit.
///
/// The first commit of a chain has no parent. The message is free-form and
/// never affects decoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Root tree of this commit.
    pub tree: ObjectId,
    /// Parent commit, `None` for the chain root.
    pub parent: Option<ObjectId>,
    /// Human-readable summary.
    pub message: String,
}

impl Commit {
    /// Create a new commit.
    pub fn new(tree: ObjectId, parent: Option<ObjectId>, message: impl Into<String>) -> Self {
        Self {
            tree,
            parent,
            message: message.into(),
        }
    }

    /// Convert into a `StoredObject` for storage.
    pub fn to_stored_object(&self) -> StoreResult<StoredObject> {
        let data =
            serde_json::to_vec(self).map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(StoredObject::new(ObjectKind::Commit, data))
    }

    /// Decode from a `StoredObject`.
    pub fn from_stored_object(obj: &StoredObject) -> StoreResult<Self> {
        if obj.kind != ObjectKind::Commit {
            return Err(StoreError::CorruptObject {
                id: obj.compute_id(),
                reason: format!("expected commit, got {}", obj.kind),
            });
        }
        serde_json::from_slice(&obj.data).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_roundtrip() {
        let blob = Blob::new(b"frame bytes".to_vec());
        let stored = blob.to_stored_object();
        let decoded = Blob::from_stored_object(&stored).unwrap();
        assert_eq!(blob, decoded);
    }

    #[test]
    fn blob_kind_mismatch() {
        let stored = StoredObject::new(ObjectKind::Tree, b"not a blob".to_vec());
        let err = Blob::from_stored_object(&stored).unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
    }

    #[test]
    fn tree_roundtrip() {
        let tree = Tree::single_file("frame.bin", ObjectId::from_bytes(b"payload"));
        let stored = tree.to_stored_object().unwrap();
        let decoded = Tree::from_stored_object(&stored).unwrap();
        assert_eq!(tree, decoded);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.entries[0].mode, EntryMode::Regular);
    }

    #[test]
    fn tree_entries_sorted() {
        let tree = Tree::new(vec![
            TreeEntry::new(EntryMode::Regular, "zebra.bin", ObjectId::null()),
            TreeEntry::new(EntryMode::Regular, "alpha.bin", ObjectId::null()),
        ]);
        assert_eq!(tree.entries[0].name, "alpha.bin");
        assert_eq!(tree.entries[1].name, "zebra.bin");
    }

    #[test]
    fn tree_get_entry() {
        let tree = Tree::single_file("frame.bin", ObjectId::from_bytes(b"x"));
        assert!(tree.get("frame.bin").is_some());
        assert!(tree.get("missing").is_none());
        assert!(!tree.is_empty());
    }

    #[test]
    fn commit_roundtrip() {
        let commit = Commit::new(
            ObjectId::from_bytes(b"tree"),
            Some(ObjectId::from_bytes(b"parent")),
            "Frame 000001 (delta, 1234 bytes)",
        );
        let stored = commit.to_stored_object().unwrap();
        let decoded = Commit::from_stored_object(&stored).unwrap();
        assert_eq!(commit, decoded);
    }

    #[test]
    fn root_commit_has_no_parent() {
        let commit = Commit::new(ObjectId::from_bytes(b"tree"), None, "Frame 000000");
        let stored = commit.to_stored_object().unwrap();
        let decoded = Commit::from_stored_object(&stored).unwrap();
        assert!(decoded.parent.is_none());
    }

    #[test]
    fn commit_kind_mismatch() {
        let stored = Blob::new(b"data".to_vec()).to_stored_object();
        let err = Commit::from_stored_object(&stored).unwrap_err();
        assert!(matches!(err, StoreError::CorruptObject { .. }));
    }

    #[test]
    fn stored_object_id_deterministic() {
        let obj = StoredObject::new(ObjectKind::Blob, b"deterministic".to_vec());
        assert_eq!(obj.compute_id(), obj.compute_id());
    }

    #[test]
    fn different_kinds_produce_different_ids() {
        let data = b"same data".to_vec();
        let blob = StoredObject::new(ObjectKind::Blob, data.clone());
        let tree = StoredObject::new(ObjectKind::Tree, data.clone());
        let commit = StoredObject::new(ObjectKind::Commit, data);
        assert_ne!(blob.compute_id(), tree.compute_id());
        assert_ne!(blob.compute_id(), commit.compute_id());
        assert_ne!(tree.compute_id(), commit.compute_id());
    }

    #[test]
    fn type_byte_roundtrip() {
        for kind in [ObjectKind::Blob, ObjectKind::Tree, ObjectKind::Commit] {
            assert_eq!(ObjectKind::from_type_byte(kind.type_byte()), Some(kind));
        }
        assert_eq!(ObjectKind::from_type_byte(0), None);
        assert_eq!(ObjectKind::from_type_byte(255), None);
    }

    #[test]
    fn entry_mode_display() {
        assert_eq!(format!("{}", EntryMode::Regular), "100644");
        assert_eq!(format!("{}", EntryMode::Directory), "040000");
    }
}
