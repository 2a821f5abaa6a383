//! Append-only archive of completed run timelines.
//!
//! When a run finishes with the terminal stage observed, its timeline is
//! snapshotted into the [`ArchiveStore`] under the identifier of the
//! conversation's final assistant message. Entries are immutable once written
//! and the store grows monotonically for the session's lifetime; there is no
//! eviction and no cross-session persistence.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;

use crate::stage::StageDescriptor;
use crate::timeline::Timeline;

/// Immutable record of one completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchivedRun {
    timeline: Vec<StageDescriptor>,
    archived_at: DateTime<Utc>,
}

impl ArchivedRun {
    /// The archived timeline, in its original arrival order.
    #[must_use]
    pub fn timeline(&self) -> &[StageDescriptor] {
        &self.timeline
    }

    /// When the run was archived.
    #[must_use]
    pub fn archived_at(&self) -> DateTime<Utc> {
        self.archived_at
    }
}

/// Mapping from output-message identifier to an archived run timeline.
///
/// # Examples
///
/// ```
/// use waypoint::archive::ArchiveStore;
/// use waypoint::stage::{StageDescriptor, StageKind};
/// use waypoint::timeline::Timeline;
///
/// let mut timeline = Timeline::new();
/// timeline.apply(
///     StageKind::Finalize,
///     StageDescriptor::new("Finalizing Answer", "Composing and presenting the final answer."),
/// );
///
/// let mut archive = ArchiveStore::new();
/// assert!(archive.record("m1", &timeline));
/// assert_eq!(archive.timeline("m1").unwrap().len(), 1);
///
/// // Entries are write-once: a duplicate id keeps the original.
/// assert!(!archive.record("m1", &Timeline::new()));
/// assert_eq!(archive.timeline("m1").unwrap().len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ArchiveStore {
    runs: FxHashMap<String, ArchivedRun>,
}

impl ArchiveStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Archive a timeline snapshot under the given output identifier.
    ///
    /// Returns `true` on insertion. Archive entries are never mutated after
    /// insertion, so a duplicate identifier refuses the write, keeps the
    /// original entry, and returns `false`.
    pub fn record(&mut self, output_id: impl Into<String>, timeline: &Timeline) -> bool {
        match self.runs.entry(output_id.into()) {
            Entry::Occupied(existing) => {
                tracing::warn!(
                    output_id = %existing.key(),
                    "archive entry already exists; keeping the original"
                );
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(ArchivedRun {
                    timeline: timeline.snapshot(),
                    archived_at: Utc::now(),
                });
                true
            }
        }
    }

    /// Full record for a completed run, if archived.
    #[must_use]
    pub fn get(&self, output_id: &str) -> Option<&ArchivedRun> {
        self.runs.get(output_id)
    }

    /// Archived timeline for an output identifier, if present.
    #[must_use]
    pub fn timeline(&self, output_id: &str) -> Option<&[StageDescriptor]> {
        self.runs.get(output_id).map(ArchivedRun::timeline)
    }

    #[must_use]
    pub fn contains(&self, output_id: &str) -> bool {
        self.runs.contains_key(output_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Identifiers of all archived runs, in no particular order.
    pub fn output_ids(&self) -> impl Iterator<Item = &str> {
        self.runs.keys().map(String::as_str)
    }
}
