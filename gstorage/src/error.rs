use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("The file '{}' was not found.", .0.display())]
    MarkerMissing(PathBuf),

    #[error("An error occurred while reading '{}': {source}", .path.display())]
    MarkerUnreadable { path: PathBuf, source: io::Error },

    #[error("'{}' does not name a remote directory", .0.display())]
    MarkerEmpty(PathBuf),

    #[error("failed to run '{program}': {source}")]
    Spawn { program: String, source: io::Error },

    #[error("Error running '{command}': {detail}")]
    CommandFailed { command: String, detail: String },

    #[error("unexpected listing line {line:?}: {reason}")]
    Listing { line: String, reason: String },

    #[error("no file names given")]
    NoFiles,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
