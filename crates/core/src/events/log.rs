use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;

use super::{ChannelSink, EventEnvelope, OrganizeEvent};

/// One line of the JSON event log.
#[derive(Debug, Serialize)]
struct EventLine<'a> {
    timestamp: String,
    #[serde(flatten)]
    event: &'a OrganizeEvent,
}

/// Background task that appends received events to a JSON-lines file.
pub struct EventLogWriter {
    rx: mpsc::Receiver<EventEnvelope>,
    path: PathBuf,
}

impl EventLogWriter {
    /// Creates a writer draining `rx` into `path`.
    pub fn new(rx: mpsc::Receiver<EventEnvelope>, path: impl Into<PathBuf>) -> Self {
        Self {
            rx,
            path: path.into(),
        }
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Consumes events until every sender is dropped, returning how many were
    /// written.
    ///
    /// Spawn this with `tokio::spawn(writer.run())`.
    pub async fn run(mut self) -> std::io::Result<usize> {
        let file = File::create(&self.path).await?;
        let mut out = BufWriter::new(file);
        let mut written = 0;

        while let Some(envelope) = self.rx.recv().await {
            let line = EventLine {
                timestamp: envelope.timestamp.to_rfc3339(),
                event: &envelope.event,
            };
            match serde_json::to_string(&line) {
                Ok(json) => {
                    out.write_all(json.as_bytes()).await?;
                    out.write_all(b"\n").await?;
                    written += 1;
                }
                Err(e) => tracing::error!("Failed to serialize event: {}", e),
            }
        }

        out.flush().await?;
        Ok(written)
    }
}

/// Creates a channel sink and the writer that persists what it receives.
///
/// Events are dropped (and logged) when more than `buffer_size` are waiting.
pub fn create_event_log(path: impl Into<PathBuf>, buffer_size: usize) -> (ChannelSink, EventLogWriter) {
    let (tx, rx) = mpsc::channel(buffer_size.max(1));
    (ChannelSink::new(tx), EventLogWriter::new(rx, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventSink;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_writes_one_line_per_event() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("events.jsonl");
        let (sink, writer) = create_event_log(&path, 16);
        let task = tokio::spawn(writer.run());

        sink.record(OrganizeEvent::DiscoveryStarted {
            root: PathBuf::from("/pics"),
        });
        sink.record(OrganizeEvent::MoveFailed {
            source: PathBuf::from("/pics/a.jpg"),
            error: "boom".to_string(),
        });
        drop(sink);

        let written = task.await.unwrap().unwrap();
        assert_eq!(written, 2);

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "discovery_started");
        assert_eq!(lines[1]["type"], "move_failed");
        assert_eq!(lines[1]["error"], "boom");
        assert!(lines[0]["timestamp"].is_string());
    }
}
