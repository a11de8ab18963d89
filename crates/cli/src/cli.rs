use clap::Parser;
use std::path::PathBuf;

use snapstage_core::Config;

/// Stage photos into a date-bucketed tree, ready to sync.
#[derive(Debug, Parser)]
#[command(name = "snapstage", version)]
#[command(about = "Copy pictures into <collect>/YYYY/MM/DD without losing or duplicating any")]
pub struct Cli {
    /// Configuration file (TOML). Runs on defaults when absent.
    #[arg(short, long, env = "SNAPSTAGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory to scan
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Collection root the dated tree is built under
    #[arg(long)]
    pub collect: Option<PathBuf>,

    /// Destination shown in the suggested rsync command
    #[arg(short, long)]
    pub target: Option<String>,

    /// Number of concurrent movers
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Give up on a file after this many failed copies (default: never)
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Also write every event as JSON lines to this file
    #[arg(long)]
    pub event_log: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    /// Applies flags on top of the loaded configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(source) = &self.source {
            config.scan.root = source.clone();
        }
        if let Some(collect) = &self.collect {
            config.collect.root = collect.clone();
        }
        if let Some(target) = &self.target {
            config.sync.target = Some(target.clone());
        }
        if let Some(workers) = self.workers {
            config.pool.worker_count = workers;
        }
        if let Some(attempts) = self.max_attempts {
            config.pool.max_attempts = Some(attempts);
        }
        if let Some(log) = &self.event_log {
            config.events.log = Some(log.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "snapstage",
            "--source",
            "/media/sd",
            "--collect",
            "/mnt/stage",
            "--target",
            "nas:/photos",
            "--workers",
            "2",
            "--max-attempts",
            "3",
        ]);
        let mut config = Config::default();
        cli.apply_to(&mut config);

        assert_eq!(config.scan.root, PathBuf::from("/media/sd"));
        assert_eq!(config.collect.root, PathBuf::from("/mnt/stage"));
        assert_eq!(config.sync.target.as_deref(), Some("nas:/photos"));
        assert_eq!(config.pool.worker_count, 2);
        assert_eq!(config.pool.max_attempts, Some(3));
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::parse_from(["snapstage"]);
        let mut config = Config::default();
        config.pool.worker_count = 9;
        cli.apply_to(&mut config);

        assert_eq!(config, {
            let mut expected = Config::default();
            expected.pool.worker_count = 9;
            expected
        });
    }
}
