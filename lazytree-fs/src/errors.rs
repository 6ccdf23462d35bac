use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted by file system directory listing.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("failed to list {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
