//! Content digests used to decide whether two files hold the same bytes.
//!
//! Digests are SHA-256 over the full byte stream. They are used for equality
//! checks only; collisions are not defended against.

use sha2::{Digest, Sha256};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Default read buffer for hashing (1 MB).
pub const DEFAULT_HASH_BUFFER: usize = 1024 * 1024;

/// Errors that can occur while hashing a file.
#[derive(Debug, Error)]
pub enum HashError {
    /// The file could not be opened.
    #[error("Failed to open {path} for hashing")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file could not be read to completion.
    #[error("Failed to read {path} while hashing")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Path of the file that failed to hash.
    pub fn path(&self) -> &Path {
        match self {
            Self::Open { path, .. } | Self::Read { path, .. } => path,
        }
    }
}

/// Fixed-size digest of a file's content.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// Digest of an in-memory byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex rendering.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentDigest({})", &self.to_hex()[..16])
    }
}

/// Computes content digests by streaming a file through SHA-256.
///
/// Holds no mutable state, so one hasher can be shared between workers
/// hashing disjoint paths.
#[derive(Debug, Clone)]
pub struct Hasher {
    buffer_size: usize,
}

impl Hasher {
    /// Creates a hasher reading in chunks of `buffer_size` bytes.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    /// Reads the whole file at `path` and returns its digest.
    pub async fn digest(&self, path: &Path) -> Result<ContentDigest, HashError> {
        let mut file = File::open(path).await.map_err(|e| HashError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut buffer = vec![0u8; self.buffer_size];
        let mut hasher = Sha256::new();

        loop {
            let bytes_read = file.read(&mut buffer).await.map_err(|e| HashError::Read {
                path: path.to_path_buf(),
                source: e,
            })?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(ContentDigest(hasher.finalize().into()))
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_BUFFER)
    }
}

/// Digest of the file at `path` using the default buffer size.
pub async fn digest_file(path: &Path) -> Result<ContentDigest, HashError> {
    Hasher::default().digest(path).await
}
