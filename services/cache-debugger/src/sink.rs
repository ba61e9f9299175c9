//! Diagnostic sinks for comparison results.
//!
//! The comparer never logs through a global directly; it reports to a sink
//! passed in at construction. [`TracingSink`] forwards to `tracing`.
//! [`RecordingSink`] keeps every event in memory for assertions.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::{info, warn};

/// Emitted when a comparison pass begins.
pub const EVENT_COMPARER_STARTED: &str = "cache comparer started";

/// Emitted when a comparison pass ends, successfully or not.
pub const EVENT_COMPARER_FINISHED: &str = "cache comparer finished";

/// Emitted once per resource kind whose reconciliation is not empty.
pub const EVENT_CACHE_MISMATCH: &str = "cache mismatch";

/// Which collection a discrepancy belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Nodes,
    Pods,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nodes => write!(f, "nodes"),
            Self::Pods => write!(f, "pods"),
        }
    }
}

/// Receiver of comparer diagnostics.
pub trait DiagnosticSink: Send + Sync {
    /// Informational lifecycle event.
    fn info(&self, event: &str);

    /// A non-empty discrepancy for `resource`.
    fn warn(&self, event: &str, resource: ResourceKind, missed: &[String], redundant: &[String]);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn info(&self, event: &str) {
        info!(event, "{event}");
    }

    fn warn(&self, event: &str, resource: ResourceKind, missed: &[String], redundant: &[String]) {
        warn!(
            event,
            resource = %resource,
            missed = ?missed,
            redundant = ?redundant,
            "{event}: missed {resource}: {missed:?}; redundant {resource}: {redundant:?}"
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticLevel {
    Info,
    Warn,
}

/// A single captured diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticRecord {
    pub level: DiagnosticLevel,
    pub event: String,
    pub resource: Option<ResourceKind>,
    pub missed: Vec<String>,
    pub redundant: Vec<String>,
}

/// Captures diagnostics in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<DiagnosticRecord>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records captured so far, oldest first.
    pub fn records(&self) -> Vec<DiagnosticRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Warning records only.
    pub fn warnings(&self) -> Vec<DiagnosticRecord> {
        self.records()
            .into_iter()
            .filter(|r| r.level == DiagnosticLevel::Warn)
            .collect()
    }

    /// The warning for `resource`, if one was captured.
    pub fn warning_for(&self, resource: ResourceKind) -> Option<DiagnosticRecord> {
        self.warnings()
            .into_iter()
            .find(|r| r.resource == Some(resource))
    }

    /// Number of records with the given event name.
    pub fn count(&self, event: &str) -> usize {
        self.records().iter().filter(|r| r.event == event).count()
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn push(&self, record: DiagnosticRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }
}

impl DiagnosticSink for RecordingSink {
    fn info(&self, event: &str) {
        self.push(DiagnosticRecord {
            level: DiagnosticLevel::Info,
            event: event.to_string(),
            resource: None,
            missed: Vec::new(),
            redundant: Vec::new(),
        });
    }

    fn warn(&self, event: &str, resource: ResourceKind, missed: &[String], redundant: &[String]) {
        self.push(DiagnosticRecord {
            level: DiagnosticLevel::Warn,
            event: event.to_string(),
            resource: Some(resource),
            missed: missed.to_vec(),
            redundant: redundant.to_vec(),
        });
    }
}
