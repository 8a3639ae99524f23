use crate::error::StorageError;
use std::fs;
use std::io;
use std::path::Path;

pub const DEFAULT_MARKER: &str = ".gstorage";

/// Reads the remote directory named by a marker file, e.g. `gs://bucket/dir`.
pub fn read_remote_path(path: &Path) -> Result<String, StorageError> {
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => StorageError::MarkerMissing(path.to_path_buf()),
        _ => StorageError::MarkerUnreadable {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let remote = text.trim().trim_end_matches('/');
    if remote.is_empty() {
        return Err(StorageError::MarkerEmpty(path.to_path_buf()));
    }
    Ok(remote.to_string())
}
