//! Injected diagnostic sink.
//!
//! Components that recover from failures silently (artwork fallback,
//! undecodable images, skipped catalog files) report what happened to a
//! [`DiagnosticSink`] handed to them at construction. The application wires
//! in [`LogSink`]; tests use [`MemorySink`] and inspect the records.

use std::cell::RefCell;
use std::rc::Rc;

use log::Level;

/// Receives diagnostic records from a named component.
pub trait DiagnosticSink {
    fn record(&self, level: Level, component: &str, message: &str);
}

/// Shared handle to a sink. Everything runs on one thread.
pub type SinkHandle = Rc<dyn DiagnosticSink>;

/// Forwards records to the `log` facade, using the component as the target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl LogSink {
    pub fn handle() -> SinkHandle {
        Rc::new(Self)
    }
}

impl DiagnosticSink for LogSink {
    fn record(&self, level: Level, component: &str, message: &str) {
        log::log!(target: component, level, "{message}");
    }
}

/// One captured record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagRecord {
    pub level: Level,
    pub component: String,
    pub message: String,
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: RefCell<Vec<DiagRecord>>,
}

impl MemorySink {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Snapshot of all records so far.
    pub fn records(&self) -> Vec<DiagRecord> {
        self.records.borrow().clone()
    }

    /// Whether any record at `level` contains `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.records
            .borrow()
            .iter()
            .any(|r| r.level == level && r.message.contains(needle))
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, level: Level, component: &str, message: &str) {
        self.records.borrow_mut().push(DiagRecord {
            level,
            component: component.to_string(),
            message: message.to_string(),
        });
    }
}
