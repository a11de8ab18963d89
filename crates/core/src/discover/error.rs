use std::path::PathBuf;
use thiserror::Error;

/// Errors that end a walk.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The tree could not be enumerated.
    #[error("Failed to walk {root}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The work queue stopped accepting items.
    #[error("Work queue closed while discovering")]
    QueueClosed,
}

impl DiscoveryError {
    /// Path the walk failed on, when known.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Walk { root, source } => source.path().or(Some(root.as_path())),
            Self::QueueClosed => None,
        }
    }
}
