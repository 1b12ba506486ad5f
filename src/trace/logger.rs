use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::trace::trace::TraceEvent;

/// JSONL sink for tally events. Tracing never fails a run: problems are
/// reported on stderr and the event is dropped.
pub struct TraceLogger {
    path: PathBuf,
    sink: Option<Mutex<File>>,
}

impl TraceLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let sink = match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Some(Mutex::new(file)),
            Err(e) => {
                eprintln!("Warning: could not open trace file '{}': {}", path.display(), e);
                None
            }
        };
        Self { path, sink }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Append one event as a single line.
    pub fn log(&self, event: &TraceEvent) {
        let Some(sink) = &self.sink else {
            return;
        };

        let mut line = match serde_json::to_vec(event) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("Warning: dropping {:?} trace event: {}", event.kind, e);
                return;
            }
        };
        line.push(b'\n');

        let Ok(mut file) = sink.lock() else {
            eprintln!("Warning: trace file '{}' is poisoned", self.path.display());
            return;
        };
        if let Err(e) = file.write_all(&line) {
            eprintln!("Warning: failed to write '{}': {}", self.path.display(), e);
        }
    }
}

impl std::fmt::Debug for TraceLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceLogger")
            .field("path", &self.path)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
