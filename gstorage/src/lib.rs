//! Keeps a local directory in step with a Cloud Storage directory.
//!
//! The directory names its remote counterpart in a marker file (`.gstorage`).
//! [`Workspace::status`] lists both sides and classifies every file name,
//! [`Workspace::push`] and [`Workspace::pull`] copy named files across.
//! Remote access goes through [`RemoteStorage`]; [`Gsutil`] drives the
//! `gsutil` command line tool.

pub mod error;
pub mod gsutil;
pub mod local;
pub mod marker;
pub mod present;
pub mod reconcile;
pub mod remote;
pub mod sync;

pub use error::StorageError;
pub use gsutil::Gsutil;
pub use remote::RemoteStorage;
pub use sync::Workspace;
