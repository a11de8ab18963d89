//! Configuration for the worker pool.

use serde::{Deserialize, Serialize};

/// Configuration for [`super::WorkerPool`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of concurrent movers.
    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Attempts allowed per file before giving up on a copy that keeps
    /// failing verification. `None` retries without limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
}

fn default_worker_count() -> usize {
    5
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            worker_count: default_worker_count(),
            max_attempts: None,
        }
    }
}

impl PoolConfig {
    /// Sets the number of workers.
    pub fn with_workers(mut self, count: usize) -> Self {
        self.worker_count = count;
        self
    }

    /// Bounds the attempts per file.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PoolConfig::default();
        assert_eq!(config.worker_count, 5);
        assert_eq!(config.max_attempts, None);
    }

    #[test]
    fn test_config_builder() {
        let config = PoolConfig::default().with_workers(2).with_max_attempts(3);
        assert_eq!(config.worker_count, 2);
        assert_eq!(config.max_attempts, Some(3));
    }
}
