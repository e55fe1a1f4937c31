//! JSONL transcript writer for council events.
//!
//! Each run gets its own `council-<timestamp>.jsonl` file. Every event becomes
//! one line carrying `seq`, `type` and `timestamp` next to its payload fields.

use council_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

struct TranscriptWriter {
    out: BufWriter<File>,
    seq: u64,
}

/// Run transcript logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex`. Flushes after every event and on `Drop`.
pub struct JsonlTranscriptLogger {
    writer: Mutex<TranscriptWriter>,
    path: PathBuf,
}

impl JsonlTranscriptLogger {
    /// Create a logger writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create transcript directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create transcript file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(TranscriptWriter {
                out: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    /// Create a fresh, timestamped transcript file inside `dir`
    pub fn create_in(dir: impl AsRef<Path>) -> Option<Self> {
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        Self::new(dir.as_ref().join(format!("council-{}.jsonl", stamp)))
    }

    /// Get the path to the transcript file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn record(event: ConversationEvent, seq: u64) -> Value {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    let mut map = match event.payload {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    map.insert("seq".to_string(), Value::from(seq));
    map.insert("type".to_string(), Value::from(event.event_type));
    map.insert("timestamp".to_string(), Value::String(timestamp));
    Value::Object(map)
}

impl ConversationLogger for JsonlTranscriptLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };

        writer.seq += 1;
        let Ok(line) = serde_json::to_string(&record(event, writer.seq)) else {
            return;
        };

        let _ = writeln!(writer.out, "{}", line);
        // A crashed run still leaves a readable prefix
        let _ = writer.out.flush();
    }
}

impl Drop for JsonlTranscriptLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.out.flush();
        }
    }
}
