use crate::error::StorageError;

/// An object store that can list a directory and copy files in and out of it.
pub trait RemoteStorage {
    fn display(&self) -> String;

    /// Objects directly under `path` as `(name relative to path, size in bytes)`.
    /// Sub-directories are not included.
    fn list(&self, path: &str) -> Result<Vec<(String, u64)>, StorageError>;

    /// Copies every source to `destination`. Either side may be local or remote.
    fn copy(&self, sources: &[String], destination: &str) -> Result<(), StorageError>;
}
