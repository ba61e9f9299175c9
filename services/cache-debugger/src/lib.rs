//! Scheduler cache debugger.
//!
//! Checks that the scheduler's in-memory cache agrees with the authoritative
//! node and pod listings and with the scheduling queue. It is read-only and
//! advisory: discrepancies are logged, never repaired.
//!
//! ## Modules
//!
//! - `comparer`: one comparison pass over nodes and pods
//! - `dumper`: logs the cache and the scheduling queue
//! - `debugger`: comparer plus dumper, triggered by SIGUSR2
//! - `worker`: runs the comparer on a fixed interval
//! - `listers`: read interfaces consumed from the scheduler
//! - `memory`: in-memory implementation of those interfaces
//! - `sink`: where comparer diagnostics go

pub mod comparer;
pub mod config;
pub mod debugger;
pub mod dumper;
pub mod error;
pub mod listers;
pub mod memory;
pub mod sink;
pub mod telemetry;
pub mod types;
pub mod worker;

// Re-export commonly used types
pub use comparer::{compare_nodes, compare_pods, CacheComparer, ComparisonReport};
pub use debugger::CacheDebugger;
pub use dumper::{CacheDump, CacheDumper};
pub use error::{CompareError, CompareResult, ReadError};
pub use listers::{CacheSnapshotProvider, NodeLister, PodLister, SchedulingQueue};
pub use memory::InMemoryCluster;
pub use sink::{DiagnosticSink, RecordingSink, ResourceKind, TracingSink};
pub use types::{CacheSnapshot, Node, NodeInfo, Pod};
pub use worker::CompareWorker;
