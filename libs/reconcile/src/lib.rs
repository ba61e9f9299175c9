//! Set reconciliation primitives.
//!
//! This library compares what a cache believes exists against what the
//! authoritative source says exists. Key concepts:
//!
//! - **Authoritative**: The system of record (e.g. the cluster's node list).
//! - **Cached**: A derived, possibly stale view of the same collection.
//! - **Missed**: Present authoritatively, absent from the cache.
//! - **Redundant**: Present in the cache, no longer authoritative.
//!
//! # Invariants
//!
//! - Reconciliation is total: every input, including empty ones, has a result
//! - Output is deterministic and sorted ascending
//! - `missed` is drawn only from the authoritative side and `redundant` only
//!   from the cached side, so the two never overlap
//! - Duplicates are matched one-for-one, never collapsed

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Result of reconciling an authoritative collection against a cached one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation<T> {
    /// Present authoritatively, absent from the cache. Sorted ascending.
    pub missed: Vec<T>,

    /// Present in the cache, absent authoritatively. Sorted ascending.
    pub redundant: Vec<T>,
}

impl<T> Reconciliation<T> {
    /// Returns true if the cache agrees with the authoritative source.
    pub fn is_consistent(&self) -> bool {
        self.missed.is_empty() && self.redundant.is_empty()
    }

    /// Total number of differing entries.
    pub fn discrepancy_count(&self) -> usize {
        self.missed.len() + self.redundant.len()
    }
}

impl<T> Default for Reconciliation<T> {
    fn default() -> Self {
        Self {
            missed: Vec::new(),
            redundant: Vec::new(),
        }
    }
}

/// Reconcile `authoritative` against `cached`.
///
/// Both inputs are copied and sorted, then walked with one cursor each. An
/// entry found on both sides is dropped; the smaller head of the two is
/// emitted as missed (authoritative side) or redundant (cached side). Once
/// one side runs out, everything left on the other side is emitted.
///
/// Inputs are not modified. Each duplicate matches at most one equal entry on
/// the other side, so surplus copies are reported.
pub fn reconcile<T>(authoritative: &[T], cached: &[T]) -> Reconciliation<T>
where
    T: Ord + Clone,
{
    let mut actual = authoritative.to_vec();
    let mut cache = cached.to_vec();
    actual.sort_unstable();
    cache.sort_unstable();

    let mut result = Reconciliation::default();
    let (mut i, mut j) = (0, 0);

    while i < actual.len() || j < cache.len() {
        let ordering = if i == actual.len() {
            Ordering::Greater
        } else if j == cache.len() {
            Ordering::Less
        } else {
            actual[i].cmp(&cache[j])
        };

        match ordering {
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                result.missed.push(actual[i].clone());
                i += 1;
            }
            Ordering::Greater => {
                result.redundant.push(cache[j].clone());
                j += 1;
            }
        }
    }

    result
}
