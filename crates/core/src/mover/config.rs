//! Configuration for the mover module.

use serde::{Deserialize, Serialize};

/// Configuration for [`super::SafeMover`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoverConfig {
    /// Buffer size for copies and hashing, in bytes.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Permissions for created directories (Unix only, octal, before umask).
    #[serde(default = "default_dir_mode", alias = "dir_mode")]
    pub directory_mode: u32,
}

fn default_buffer_size() -> usize {
    8 * 1024 * 1024 // 8 MB
}

fn default_dir_mode() -> u32 {
    0o777
}

impl Default for MoverConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
            directory_mode: default_dir_mode(),
        }
    }
}

impl MoverConfig {
    /// Sets the buffer size for copies.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Sets the mode for created directories.
    pub fn with_directory_mode(mut self, mode: u32) -> Self {
        self.directory_mode = mode;
        self
    }
}
