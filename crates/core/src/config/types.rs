use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::discover::DEFAULT_EXTENSIONS;
use crate::mover::MoverConfig;
use crate::pool::PoolConfig;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub collect: CollectConfig,
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

/// What to scan
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScanConfig {
    #[serde(default = "default_scan_root")]
    pub root: PathBuf,
    /// Allowed extensions, with the leading dot. Case-sensitive.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: default_scan_root(),
            extensions: default_extensions(),
        }
    }
}

fn default_scan_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

/// Where and how pictures are staged
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CollectConfig {
    #[serde(default = "default_collect_root")]
    pub root: PathBuf,
    #[serde(flatten)]
    pub mover: MoverConfig,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            root: default_collect_root(),
            mover: MoverConfig::default(),
        }
    }
}

fn default_collect_root() -> PathBuf {
    std::env::temp_dir().join("picsToCopy")
}

/// Target of the suggested sync command
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SyncConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// JSON-lines event log
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EventsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<PathBuf>,
    /// Events buffered before new ones are dropped.
    ///
    /// The log is lossy: when the writer falls behind by this many events,
    /// further events are dropped and counted, and the run reports the count.
    #[serde(default = "default_event_buffer")]
    pub buffer: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            log: None,
            buffer: default_event_buffer(),
        }
    }
}

fn default_event_buffer() -> usize {
    1000
}
