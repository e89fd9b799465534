// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-ordered queue of mutations waiting for their delay to elapse.
//!
//! Effect delays (`data-delay`, stagger offsets) are scheduling offsets, not
//! waits. Firing pushes an entry with its due time; every poll drains the
//! entries whose time has come. Entries with equal due times drain in the
//! order they were scheduled.

use alloc::vec::Vec;

use crate::document::{Document, Mutation};
use crate::time::HostTime;
use crate::trace::{DeferredEvent, DeferredOutcome, Tracer};

#[derive(Debug)]
struct Entry<N> {
    due: HostTime,
    node: N,
    mutation: Mutation,
}

/// Pending mutations ordered by due time.
#[derive(Debug)]
pub struct DeferredQueue<N> {
    /// Sorted by due time, then by scheduling order.
    entries: Vec<Entry<N>>,
}

impl<N> Default for DeferredQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> DeferredQueue<N> {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Schedules `mutation` for `node` at `due`.
    pub fn schedule(&mut self, due: HostTime, node: N, mutation: Mutation) {
        // After every entry with an equal due time.
        let at = self.entries.partition_point(|e| e.due <= due);
        self.entries.insert(
            at,
            Entry {
                due,
                node,
                mutation,
            },
        );
    }

    /// Number of pending mutations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Due time of the earliest pending mutation.
    #[must_use]
    pub fn next_due(&self) -> Option<HostTime> {
        self.entries.first().map(|e| e.due)
    }

    /// Applies every mutation due at or before `now`.
    ///
    /// Mutations for nodes that are no longer attached are dropped. Returns
    /// the number applied.
    pub fn drain_due<D>(&mut self, doc: &mut D, now: HostTime, tracer: &mut Tracer<'_>) -> usize
    where
        D: Document<Node = N>,
    {
        let ready = self.entries.partition_point(|e| e.due <= now);
        let mut applied = 0;
        for entry in self.entries.drain(..ready) {
            let outcome = if doc.is_connected(&entry.node) {
                doc.apply(&entry.node, &entry.mutation);
                applied += 1;
                DeferredOutcome::Applied
            } else {
                DeferredOutcome::Detached
            };
            tracer.deferred(&DeferredEvent {
                due: entry.due,
                drained_at: now,
                outcome,
            });
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestDoc;

    #[test]
    fn drains_in_due_order_then_schedule_order() {
        let mut doc = TestDoc::new();
        let a = doc.add("div", &[], 0.0);
        let b = doc.add("div", &[], 0.0);
        let mut q = DeferredQueue::new();
        q.schedule(HostTime(300), a, Mutation::add_class("late"));
        q.schedule(HostTime(100), a, Mutation::style("width", "10%"));
        q.schedule(HostTime(100), a, Mutation::style("width", "20%"));
        q.schedule(HostTime(100), b, Mutation::add_class("early"));
        assert_eq!(q.next_due(), Some(HostTime(100)));

        assert_eq!(q.drain_due(&mut doc, HostTime(100), &mut Tracer::none()), 3);
        assert_eq!(doc.style(a, "width"), Some("20%"));
        assert!(doc.has_class(b, "early"));
        assert!(!doc.has_class(a, "late"));
        assert_eq!(q.len(), 1);

        assert_eq!(q.drain_due(&mut doc, HostTime(299), &mut Tracer::none()), 0);
        assert_eq!(q.drain_due(&mut doc, HostTime(300), &mut Tracer::none()), 1);
        assert!(doc.has_class(a, "late"));
        assert!(q.is_empty());
    }

    #[test]
    fn detached_nodes_are_dropped() {
        let mut doc = TestDoc::new();
        let gone = doc.add("div", &[], 0.0);
        doc.nodes[gone].detached = true;
        let mut q = DeferredQueue::new();
        q.schedule(HostTime(0), gone, Mutation::add_class("animate"));
        assert_eq!(q.drain_due(&mut doc, HostTime(10), &mut Tracer::none()), 0);
        assert!(!doc.has_class(gone, "animate"));
        assert!(q.is_empty());
    }
}
