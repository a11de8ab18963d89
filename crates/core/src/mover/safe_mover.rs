//! File system mover with duplicate detection and copy verification.

use async_trait::async_trait;
use std::ffi::{OsStr, OsString};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::config::MoverConfig;
use super::error::MoveError;
use super::traits::Mover;
use super::types::{MoveFailure, MoveOutcome, SkipReason, COLLISION_SUFFIX};
use crate::hasher::{ContentDigest, Hasher};

/// Suffix of in-progress copies inside a destination directory.
pub const PARTIAL_SUFFIX: &str = ".partial";

static PARTIAL_COUNTER: AtomicU64 = AtomicU64::new(0);

/// What occupies the destination names.
#[derive(Debug, PartialEq, Eq)]
enum Occupancy {
    /// Identical content already lives here.
    Duplicate(PathBuf),
    /// At least one name is still free.
    Open,
}

/// Mover that copies into the staging tree and verifies every copy.
///
/// The source is left in place. A destination name is never overwritten: an
/// identical file there makes the move a duplicate skip, a different file
/// makes the copy land under the `_01` variant of the name.
///
/// Copies are written and verified under a hidden `.partial` name, then
/// published with a hard link that fails if the name is taken. A file under
/// a final name is therefore always complete and verified.
#[derive(Debug, Clone)]
pub struct SafeMover {
    config: MoverConfig,
    hasher: Hasher,
}

impl SafeMover {
    /// Creates a mover with the given configuration.
    pub fn new(config: MoverConfig) -> Self {
        let hasher = Hasher::new(config.buffer_size);
        Self { config, hasher }
    }

    /// Creates a mover with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(MoverConfig::default())
    }

    /// `name` with the collision suffix inserted before its extension.
    pub fn disambiguated_name(name: &OsStr) -> OsString {
        let path = Path::new(name);
        let stem = path.file_stem().unwrap_or(name);

        let mut renamed = stem.to_os_string();
        renamed.push(COLLISION_SUFFIX);
        if let Some(ext) = path.extension() {
            renamed.push(".");
            renamed.push(ext);
        }
        renamed
    }

    /// A hidden name for an in-progress copy of `base_name`, unique within
    /// this process.
    fn partial_name(base_name: &OsStr) -> OsString {
        let mut name = OsString::from(".");
        name.push(base_name);
        name.push(format!(
            ".{}-{}{}",
            std::process::id(),
            PARTIAL_COUNTER.fetch_add(1, Ordering::Relaxed),
            PARTIAL_SUFFIX
        ));
        name
    }

    fn candidates(dest_dir: &Path, base_name: &OsStr) -> [PathBuf; 2] {
        [
            dest_dir.join(base_name),
            dest_dir.join(Self::disambiguated_name(base_name)),
        ]
    }

    async fn check_source(source: &Path) -> Result<(), MoveError> {
        let meta = fs::symlink_metadata(source).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                MoveError::SourceNotFound {
                    path: source.to_path_buf(),
                }
            } else {
                MoveError::Io(e)
            }
        })?;

        if !meta.file_type().is_file() {
            return Err(MoveError::NotRegularFile {
                path: source.to_path_buf(),
            });
        }
        Ok(())
    }

    async fn ensure_dir(&self, dir: &Path) -> Result<(), MoveError> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(self.config.directory_mode);

        builder
            .create(dir)
            .await
            .map_err(|e| MoveError::DirectoryCreationFailed {
                path: dir.to_path_buf(),
                source: e,
            })
    }

    /// Looks for identical content under the destination names before
    /// copying anything.
    async fn check_occupants(
        &self,
        source_digest: &ContentDigest,
        dest_dir: &Path,
        base_name: &OsStr,
    ) -> Result<Occupancy, MoveError> {
        let mut taken = 0;
        for candidate in Self::candidates(dest_dir, base_name) {
            if !fs::try_exists(&candidate).await? {
                continue;
            }
            if self.hasher.digest(&candidate).await? == *source_digest {
                return Ok(Occupancy::Duplicate(candidate));
            }
            taken += 1;
        }

        if taken == 2 {
            return Err(MoveError::CollisionUnresolved {
                path: dest_dir.join(Self::disambiguated_name(base_name)),
            });
        }
        Ok(Occupancy::Open)
    }

    /// Copies `source` into `partial`, which must not exist yet.
    async fn copy_to_partial(&self, source: &Path, partial: &Path) -> Result<u64, MoveError> {
        let dest_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(partial)
            .await
            .map_err(|e| MoveError::copy_failed(source.to_path_buf(), partial.to_path_buf(), e))?;

        match self.stream_copy(source, dest_file).await {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                discard(partial).await;
                Err(MoveError::copy_failed(
                    source.to_path_buf(),
                    partial.to_path_buf(),
                    e,
                ))
            }
        }
    }

    async fn stream_copy(&self, source: &Path, mut dest_file: File) -> std::io::Result<u64> {
        let mut source_file = File::open(source).await?;
        let mut buffer = vec![0u8; self.config.buffer_size.max(1)];
        let mut total_bytes = 0u64;

        loop {
            let bytes_read = source_file.read(&mut buffer).await?;
            if bytes_read == 0 {
                break;
            }
            dest_file.write_all(&buffer[..bytes_read]).await?;
            total_bytes += bytes_read as u64;
        }

        dest_file.flush().await?;
        dest_file.sync_all().await?;
        Ok(total_bytes)
    }

    /// Re-hashes a copy. A copy that does not match `expected` is deleted.
    async fn verify_or_discard(
        &self,
        expected: &ContentDigest,
        copy: &Path,
    ) -> Result<bool, MoveError> {
        let copy_digest = self.hasher.digest(copy).await?;
        if copy_digest == *expected {
            return Ok(true);
        }

        tracing::debug!(
            "Digest mismatch for {}: {} != {}",
            copy.display(),
            expected,
            copy_digest
        );
        fs::remove_file(copy)
            .await
            .map_err(|e| MoveError::CleanupFailed {
                path: copy.to_path_buf(),
                source: e,
            })?;
        Ok(false)
    }

    /// Links the verified `partial` under the first free destination name.
    ///
    /// A name taken by identical content makes the move a duplicate.
    async fn publish(
        &self,
        source: &Path,
        source_digest: &ContentDigest,
        partial: &Path,
        dest_dir: &Path,
        base_name: &OsStr,
    ) -> Result<MoveOutcome, MoveError> {
        for candidate in Self::candidates(dest_dir, base_name) {
            match fs::hard_link(partial, &candidate).await {
                Ok(()) => return Ok(MoveOutcome::Moved { destination: candidate }),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if self.hasher.digest(&candidate).await? == *source_digest {
                        return Ok(MoveOutcome::Skipped {
                            reason: SkipReason::Duplicate { existing: candidate },
                        });
                    }
                    tracing::debug!(
                        "{} holds different content, trying next name",
                        candidate.display()
                    );
                }
                Err(e) => {
                    return Err(MoveError::copy_failed(source.to_path_buf(), candidate, e));
                }
            }
        }

        Err(MoveError::CollisionUnresolved {
            path: dest_dir.join(Self::disambiguated_name(base_name)),
        })
    }
}

/// Best-effort removal of an in-progress copy.
async fn discard(partial: &Path) {
    if let Err(e) = fs::remove_file(partial).await {
        if e.kind() != ErrorKind::NotFound {
            tracing::warn!("Failed to remove partial copy {}: {}", partial.display(), e);
        }
    }
}

#[async_trait]
impl Mover for SafeMover {
    fn name(&self) -> &str {
        "safe"
    }

    async fn move_file(
        &self,
        source: &Path,
        dest_dir: &Path,
        base_name: &OsStr,
    ) -> Result<MoveOutcome, MoveError> {
        Self::check_source(source).await?;
        self.ensure_dir(dest_dir).await?;

        let source_digest = self.hasher.digest(source).await?;

        if let Occupancy::Duplicate(existing) = self
            .check_occupants(&source_digest, dest_dir, base_name)
            .await?
        {
            return Ok(MoveOutcome::Skipped {
                reason: SkipReason::Duplicate { existing },
            });
        }

        let partial = dest_dir.join(Self::partial_name(base_name));
        let bytes = self.copy_to_partial(source, &partial).await?;

        let verified = match self.verify_or_discard(&source_digest, &partial).await {
            Ok(verified) => verified,
            Err(e) => {
                discard(&partial).await;
                return Err(e);
            }
        };
        if !verified {
            return Ok(MoveOutcome::Failed {
                reason: MoveFailure::CopyMismatch {
                    destination: dest_dir.join(base_name),
                },
            });
        }

        let outcome = self
            .publish(source, &source_digest, &partial, dest_dir, base_name)
            .await;
        discard(&partial).await;

        if let Ok(MoveOutcome::Moved { destination }) = &outcome {
            tracing::debug!("Copied {} bytes to {}", bytes, destination.display());
        }
        outcome
    }
}
