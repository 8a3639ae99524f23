use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

fn is_ignored(name: &str) -> bool {
    name.starts_with('.') || name.ends_with('~')
}

/// Sizes of the regular files directly inside `dir`. Hidden files, editor
/// backups and anything that is not a regular file are left out.
pub fn list_local(dir: &Path) -> io::Result<BTreeMap<String, u64>> {
    let entries = fs::read_dir(dir)?.map(|entry| entry.map(|e| e.path()));
    Ok(file_sizes(entries))
}

fn file_sizes(entries: impl IntoIterator<Item = io::Result<PathBuf>>) -> BTreeMap<String, u64> {
    let mut files = BTreeMap::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            Err(err) => {
                debug!(%err, "skipping unreadable directory entry");
                continue;
            }
        };
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            warn!(path = %path.display(), "skipping non UTF-8 file name");
            continue;
        };
        if is_ignored(name) {
            continue;
        }
        // Follows symlinks; dangling links are skipped like any other non-file.
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {
                files.insert(name.to_string(), meta.len());
            }
            Ok(_) => (),
            Err(err) => debug!(file = %name, %err, "skipping unreadable entry"),
        }
    }
    files
}
