use crate::model::{Extraction, SkipReason};
use crate::safetensors::Safetensors;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Regular files in `dir` whose name ends in `.{extension}`, sorted by name.
pub fn candidates(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let suffix = format!(".{extension}");
    let mut found = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("cannot list {}", dir.display()))? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            debug!(path = %path.display(), "skipping non UTF-8 file name");
            continue;
        };
        if name.ends_with(&suffix) && path.is_file() {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

pub fn inspect(path: &Path) -> Extraction {
    let file = match Safetensors::open_file(path) {
        Ok(file) => file,
        Err(err) => return Extraction::Skipped(SkipReason::Unreadable(format!("{err:#}"))),
    };
    debug!(
        path = %path.display(),
        tensors = file.tensor_count(),
        "read header"
    );
    Extraction::from_metadata(file.extra_metadata())
}
