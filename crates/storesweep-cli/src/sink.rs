//! JSON-lines output sink with identity-key deduplication.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use storesweep_core::{identity_key, StoreRecord};

/// How many written records between periodic stats log lines.
const STATS_INTERVAL: u64 = 50;

/// Writes one normalized record per line, dropping duplicates.
///
/// Overlapping search cells report the same physical store more than once;
/// the identity-key set guarantees each store is written once per run.
/// Write failures are latched rather than panicking so the traversal's sink
/// callback stays infallible; callers must check [`RecordSink::finish`].
pub(crate) struct RecordSink {
    writer: BufWriter<File>,
    seen: HashSet<String>,
    written: u64,
    duplicates: u64,
    filtered: u64,
    error: Option<std::io::Error>,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct SinkStats {
    pub written: u64,
    pub duplicates: u64,
    pub filtered: u64,
}

impl RecordSink {
    pub(crate) fn create(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            seen: HashSet::new(),
            written: 0,
            duplicates: 0,
            filtered: 0,
            error: None,
        })
    }

    /// Counts a record dropped by the service filter before mapping.
    pub(crate) fn note_filtered(&mut self) {
        self.filtered += 1;
    }

    pub(crate) fn write(&mut self, record: &StoreRecord) {
        if self.error.is_some() {
            return;
        }

        if !self.seen.insert(identity_key(record)) {
            self.duplicates += 1;
            return;
        }

        let line = match serde_json::to_string(record) {
            Ok(line) => line,
            Err(e) => {
                self.error = Some(e.into());
                return;
            }
        };
        if let Err(e) = writeln!(self.writer, "{line}") {
            self.error = Some(e);
            return;
        }

        self.written += 1;
        if self.written % STATS_INTERVAL == 0 {
            tracing::info!(
                written = self.written,
                duplicates = self.duplicates,
                filtered = self.filtered,
                "sink stats"
            );
        }
    }

    /// Flushes and returns the run totals, surfacing any latched failure.
    pub(crate) fn finish(mut self) -> anyhow::Result<SinkStats> {
        if let Some(e) = self.error {
            return Err(e.into());
        }
        self.writer.flush()?;
        Ok(SinkStats {
            written: self.written,
            duplicates: self.duplicates,
            filtered: self.filtered,
        })
    }
}
