//! Live activity timeline and its merge policy.
//!
//! One [`Timeline`] exists per in-flight run, exclusively owned by the
//! session controller. Stage descriptors are merged in arrival order under a
//! fixed policy: repeatable kinds always append (their multiplicity is
//! meaningful), singleton kinds keep at most one live entry and are replaced
//! in place so their original position survives later updates.
//!
//! # Examples
//!
//! ```
//! use waypoint::stage::{StageDescriptor, StageKind};
//! use waypoint::timeline::Timeline;
//!
//! let mut timeline = Timeline::new();
//! timeline.apply(
//!     StageKind::Retrieval,
//!     StageDescriptor::new("Web Research", "Searching..."),
//! );
//! timeline.apply(
//!     StageKind::Retrieval,
//!     StageDescriptor::new("Web Research", "Gathered 3 sources."),
//! );
//!
//! // Repeatable kinds accumulate; duplicates are expected.
//! assert_eq!(timeline.len(), 2);
//! ```

use serde::Serialize;

use crate::stage::{ClassifiedStage, StageDescriptor, StageKind};

/// Ordered sequence of stage descriptors for one run.
///
/// Insertion order is meaningful and untouched entries are never reordered;
/// the presentation layer renders the entries verbatim, top to bottom.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Timeline {
    entries: Vec<StageDescriptor>,
}

impl Timeline {
    /// Creates an empty timeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a descriptor into the timeline under the kind's policy.
    ///
    /// Repeatable kinds append unconditionally. Singleton kinds replace the
    /// existing entry with the same title in place, or append when the kind
    /// has not been seen yet. Tolerates descriptors arriving in arbitrary
    /// stream order.
    pub fn apply(&mut self, kind: StageKind, descriptor: StageDescriptor) {
        if kind.is_repeatable() {
            self.entries.push(descriptor);
            return;
        }
        match self
            .entries
            .iter()
            .position(|entry| entry.title == descriptor.title)
        {
            Some(index) => self.entries[index] = descriptor,
            None => self.entries.push(descriptor),
        }
    }

    /// Convenience for merging a classifier output directly.
    pub fn apply_classified(&mut self, classified: ClassifiedStage) {
        self.apply(classified.kind, classified.descriptor);
    }

    /// The timeline's entries, in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[StageDescriptor] {
        &self.entries
    }

    /// Owned copy of the entries, for archiving or shipping to a renderer.
    #[must_use]
    pub fn snapshot(&self) -> Vec<StageDescriptor> {
        self.entries.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StageDescriptor> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a StageDescriptor;
    type IntoIter = std::slice::Iter<'a, StageDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
