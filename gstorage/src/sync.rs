use crate::error::StorageError;
use crate::local::list_local;
use crate::marker::read_remote_path;
use crate::reconcile::{Record, reconcile};
use crate::remote::RemoteStorage;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A local directory tied to a remote directory through its marker file.
pub struct Workspace<R> {
    remote: R,
    dir: PathBuf,
    marker: PathBuf,
}

impl<R: RemoteStorage> Workspace<R> {
    /// `marker` is resolved against `dir` unless it is absolute.
    pub fn new(remote: R, dir: impl Into<PathBuf>, marker: impl Into<PathBuf>) -> Self {
        Workspace {
            remote,
            dir: dir.into(),
            marker: marker.into(),
        }
    }

    pub fn remote_path(&self) -> Result<String, StorageError> {
        read_remote_path(&self.dir.join(&self.marker))
    }

    pub fn status(&self) -> Result<Vec<Record>, StorageError> {
        let base = self.remote_path()?;
        debug!(remote = %base, via = %self.remote.display(), "listing");
        let remote: BTreeMap<String, u64> = self.remote.list(&base)?.into_iter().collect();
        let local = list_local(&self.dir)?;
        debug!(local = local.len(), remote = remote.len(), "reconciling");
        Ok(reconcile(&local, &remote))
    }

    /// Uploads `filenames` from the local directory into the remote one.
    pub fn push(&self, filenames: &[String]) -> Result<(), StorageError> {
        if filenames.is_empty() {
            return Err(StorageError::NoFiles);
        }
        let base = self.remote_path()?;
        let sources: Vec<String> = filenames.iter().map(|f| self.local_arg(f)).collect();
        self.remote.copy(&sources, &format!("{base}/"))
    }

    /// Downloads `filenames` from the remote directory into the local one.
    pub fn pull(&self, filenames: &[String]) -> Result<(), StorageError> {
        if filenames.is_empty() {
            return Err(StorageError::NoFiles);
        }
        let base = self.remote_path()?;
        let sources: Vec<String> = filenames.iter().map(|f| format!("{base}/{f}")).collect();
        self.remote.copy(&sources, &self.dir.display().to_string())
    }

    fn local_arg(&self, name: &str) -> String {
        if self.dir == Path::new(".") {
            name.to_string()
        } else {
            self.dir.join(name).display().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::DEFAULT_MARKER;
    use crate::reconcile::Status;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct MemoryRemote {
        objects: Vec<(String, u64)>,
        listed: RefCell<Vec<String>>,
        copies: RefCell<Vec<(Vec<String>, String)>>,
        fail: bool,
    }

    impl RemoteStorage for MemoryRemote {
        fn display(&self) -> String {
            "memory".to_string()
        }

        fn list(&self, path: &str) -> Result<Vec<(String, u64)>, StorageError> {
            self.listed.borrow_mut().push(path.to_string());
            if self.fail {
                return Err(StorageError::CommandFailed {
                    command: "memory ls".to_string(),
                    detail: "BucketNotFoundException: 404".to_string(),
                });
            }
            Ok(self.objects.clone())
        }

        fn copy(&self, sources: &[String], destination: &str) -> Result<(), StorageError> {
            self.copies
                .borrow_mut()
                .push((sources.to_vec(), destination.to_string()));
            Ok(())
        }
    }

    fn workspace(remote: MemoryRemote) -> (TempDir, Workspace<MemoryRemote>) {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(DEFAULT_MARKER), "gs://bucket/dir\n").unwrap();
        let ws = Workspace::new(remote, temp.path(), DEFAULT_MARKER);
        (temp, ws)
    }

    #[test]
    fn status_compares_both_sides() {
        let remote = MemoryRemote {
            objects: vec![("a.txt".to_string(), 10), ("c.txt".to_string(), 5)],
            ..Default::default()
        };
        let (temp, ws) = workspace(remote);
        fs::write(temp.path().join("a.txt"), [0u8; 10]).unwrap();
        fs::write(temp.path().join("b.txt"), [0u8; 20]).unwrap();

        let records = ws.status().unwrap();
        let statuses: Vec<_> = records
            .iter()
            .map(|r| (r.name.as_str(), r.status()))
            .collect();
        assert_eq!(
            statuses,
            [
                ("a.txt", Status::Synced),
                ("b.txt", Status::LocalOnly),
                ("c.txt", Status::RemoteOnly),
            ]
        );
        assert_eq!(*ws.remote.listed.borrow(), ["gs://bucket/dir"]);
    }

    #[test]
    fn status_reports_listing_failure() {
        let remote = MemoryRemote {
            fail: true,
            ..Default::default()
        };
        let (_temp, ws) = workspace(remote);
        let err = ws.status().unwrap_err();
        assert!(err.to_string().contains("BucketNotFoundException"));
    }

    #[test]
    fn status_without_marker_never_lists() {
        let temp = TempDir::new().unwrap();
        let ws = Workspace::new(MemoryRemote::default(), temp.path(), DEFAULT_MARKER);
        assert!(matches!(ws.status(), Err(StorageError::MarkerMissing(_))));
        assert!(ws.remote.listed.borrow().is_empty());
    }

    #[test]
    fn push_appends_remote_directory() {
        let (temp, ws) = workspace(MemoryRemote::default());
        ws.push(&["a.txt".to_string(), "b.txt".to_string()]).unwrap();
        let copies = ws.remote.copies.borrow();
        let (sources, destination) = &copies[0];
        assert_eq!(
            *sources,
            [
                temp.path().join("a.txt").display().to_string(),
                temp.path().join("b.txt").display().to_string(),
            ]
        );
        assert_eq!(destination, "gs://bucket/dir/");
    }

    #[test]
    fn pull_prefixes_remote_directory() {
        let (temp, ws) = workspace(MemoryRemote::default());
        ws.pull(&["a.txt".to_string()]).unwrap();
        let copies = ws.remote.copies.borrow();
        assert_eq!(copies[0].0, ["gs://bucket/dir/a.txt"]);
        assert_eq!(copies[0].1, temp.path().display().to_string());
    }

    #[test]
    fn current_directory_arguments_stay_bare() {
        let remote = MemoryRemote::default();
        let ws = Workspace::new(remote, ".", "/nonexistent/marker");
        assert_eq!(ws.local_arg("a.txt"), "a.txt");
    }

    #[test]
    fn transfers_need_file_names() {
        let (_temp, ws) = workspace(MemoryRemote::default());
        assert!(matches!(ws.push(&[]), Err(StorageError::NoFiles)));
        assert!(matches!(ws.pull(&[]), Err(StorageError::NoFiles)));
        assert!(ws.remote.copies.borrow().is_empty());
    }
}
