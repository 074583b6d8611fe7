use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use sha2::{Digest, Sha256};
use uuid::Uuid;

/// How a decomposition run ended: everything materialized, or some card
/// writes failed/skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStatus {
    Completed,
    Partial,
}

/// One decomposition run. Session-only; nothing here is persisted.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub source_path: PathBuf,
    pub cards_created: usize,
    pub timestamp_ms: u64,
    pub status: HistoryStatus,
    /// Digest of the source note at decomposition time, so a host can tell
    /// whether the note changed since the run.
    pub source_digest: String,
}

impl HistoryEntry {
    pub fn new(
        source_path: impl Into<PathBuf>,
        cards_created: usize,
        status: HistoryStatus,
        source_content: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_path: source_path.into(),
            cards_created,
            timestamp_ms: epoch_millis(),
            status,
            source_digest: content_digest(source_content),
        }
    }
}

/// Capped, in-memory log of decomposition runs, oldest evicted first.
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    limit: usize,
}

impl HistoryLog {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit,
        }
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
        while self.entries.len() > self.limit {
            self.entries.remove(0);
        }
    }

    /// Entries newest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Sha-256 hex digest of note content.
pub fn content_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Current timestamp in milliseconds.
fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn entry(name: &str) -> HistoryEntry {
        HistoryEntry::new(Path::new(name), 3, HistoryStatus::Completed, "content")
    }

    #[test]
    fn newest_entries_come_first() {
        let mut log = HistoryLog::new(10);
        log.record(entry("first.md"));
        log.record(entry("second.md"));

        let order: Vec<&Path> = log.entries().map(|e| e.source_path.as_path()).collect();
        assert_eq!(order, vec![Path::new("second.md"), Path::new("first.md")]);
    }

    #[test]
    fn oldest_entries_evicted_past_limit() {
        let mut log = HistoryLog::new(2);
        log.record(entry("a.md"));
        log.record(entry("b.md"));
        log.record(entry("c.md"));

        assert_eq!(log.len(), 2);
        let order: Vec<&Path> = log.entries().map(|e| e.source_path.as_path()).collect();
        assert_eq!(order, vec![Path::new("c.md"), Path::new("b.md")]);
    }

    #[test]
    fn digest_is_stable_hex() {
        let a = content_digest("same");
        let b = content_digest("same");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, content_digest("different"));
    }
}
