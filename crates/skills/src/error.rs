//! Error types for skill discovery and linking.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The workspace has no content root, so there is nothing to discover.
    #[error("content root {} does not exist; nothing to link", path.display())]
    ContentRootMissing { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] armory_config::Error),
}

impl Error {
    #[must_use]
    pub fn content_root_missing(path: impl Into<PathBuf>) -> Self {
        Self::ContentRootMissing { path: path.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
