//! Error types for the watch subsystem.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from watcher construction and registration.
///
/// Construction is all-or-nothing: any of these returned from
/// [`DocWatcher::new`](super::DocWatcher::new) means no OS watch
/// registrations are left behind.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Failed to initialize watcher: {reason}")]
    InitFailed { reason: String },

    #[error("Cannot walk root {path}: {reason}")]
    RootWalkFailed { path: PathBuf, reason: String },

    #[error("Cannot watch directory {path}: {reason}")]
    PathWatchFailed { path: PathBuf, reason: String },
}

impl From<notify::Error> for WatchError {
    fn from(e: notify::Error) -> Self {
        WatchError::InitFailed {
            reason: e.to_string(),
        }
    }
}
