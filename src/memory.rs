use std::sync::Mutex;

use crate::level::{LevelCell, Severity};
use crate::record::LogRecord;
use crate::transport::{next_transport_id, Transport};

/// A transport that keeps every record it receives in memory.
///
/// Useful for asserting on rebroadcast and layer behavior in tests, and
/// for measuring host-integration overhead without any I/O.
pub struct MemoryTransport {
    id: u64,
    level: LevelCell,
    records: Mutex<Vec<LogRecord>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        MemoryTransport {
            id: next_transport_id(),
            level: LevelCell::new(Severity::Silly),
            records: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of everything received so far.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().expect("memory transport poisoned").clone()
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MemoryTransport {
    fn id(&self) -> u64 {
        self.id
    }

    fn level(&self) -> Severity {
        self.level.get()
    }

    fn set_level(&self, level: Severity) {
        self.level.set(level);
    }

    fn log(&self, record: &LogRecord) {
        self.records
            .lock()
            .expect("memory transport poisoned")
            .push(record.clone());
    }
}
