//! Tip reference persistence for filesystem repositories.
//!
//! The chain tip lives in a single `HEAD` file at the repository root,
//! holding the hex commit id. In-memory sessions keep the tip in the
//! session value only.

use std::fs;
use std::path::Path;

use gitflix_types::ObjectId;

use crate::error::RepoResult;

/// Name of the tip reference file.
pub const HEAD_FILE: &str = "HEAD";

/// Read the tip commit id, if one has been written.
pub fn load(root: &Path) -> RepoResult<Option<ObjectId>> {
    let path = root.join(HEAD_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(gitflix_store::StoreError::Io(e).into()),
    };
    Ok(Some(ObjectId::from_hex(&text)?))
}

/// Persist the tip commit id.
pub fn store(root: &Path, tip: &ObjectId) -> RepoResult<()> {
    fs::write(root.join(HEAD_FILE), format!("{}\n", tip.to_hex()))
        .map_err(|e| gitflix_store::StoreError::Io(e).into())
}
