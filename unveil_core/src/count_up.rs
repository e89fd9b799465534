// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Count-up number animation.
//!
//! A [`CountUp`] is a pure function of elapsed time: the displayed value at
//! elapsed `t` is `floor(target * min(t, duration) / duration)`, computed in
//! integer arithmetic. Frame rate does not affect the result, values never
//! move backwards, and the last frame shows exactly the target.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::document::{Document, Mutation};
use crate::time::{Duration, HostTime};
use crate::trace::{CountUpFinishedEvent, Tracer};

/// One count-up animation from zero to `target`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountUp {
    target: i64,
    duration: Duration,
    suffix: String,
    started: HostTime,
}

impl CountUp {
    /// Creates a count-up starting at `started`.
    #[must_use]
    pub fn new(target: i64, duration: Duration, suffix: impl Into<String>, started: HostTime) -> Self {
        Self {
            target,
            duration,
            suffix: suffix.into(),
            started,
        }
    }

    /// The end value.
    #[must_use]
    pub const fn target(&self) -> i64 {
        self.target
    }

    /// The value displayed at `now`.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the quotient lies between zero and target, which is an i64"
    )]
    pub fn value_at(&self, now: HostTime) -> i64 {
        let total = self.duration.ticks();
        let elapsed = now.saturating_duration_since(self.started).ticks().min(total);
        if elapsed == total {
            return self.target;
        }
        (i128::from(self.target) * i128::from(elapsed)).div_euclid(i128::from(total)) as i64
    }

    /// The text displayed at `now`: the value followed by the suffix.
    #[must_use]
    pub fn text_at(&self, now: HostTime) -> String {
        format!("{}{}", self.value_at(now), self.suffix)
    }

    /// Returns `true` once the full duration has elapsed.
    #[must_use]
    pub fn is_finished(&self, now: HostTime) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }

    /// Returns `true` if `next` is strictly closer to the target than `shown`.
    fn advances(&self, shown: i64, next: i64) -> bool {
        if self.target >= 0 { next > shown } else { next < shown }
    }
}

#[derive(Debug)]
struct Running<N> {
    node: N,
    count: CountUp,
    shown: Option<i64>,
}

/// The set of count-ups currently animating.
#[derive(Debug)]
pub struct CountUps<N> {
    running: Vec<Running<N>>,
    /// Latest time passed to `advance`.
    latest: HostTime,
}

impl<N: PartialEq> Default for CountUps<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: PartialEq> CountUps<N> {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            running: Vec::new(),
            latest: HostTime(0),
        }
    }

    /// Starts animating `node`, replacing any count-up already running on it.
    pub fn start(&mut self, node: N, count: CountUp) {
        self.running.retain(|r| r.node != node);
        self.running.push(Running {
            node,
            count,
            shown: None,
        });
    }

    /// Number of running count-ups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.running.len()
    }

    /// Returns `true` if nothing is animating.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// Writes the current value of every running count-up.
    ///
    /// Text is only rewritten when the displayed value moves toward the
    /// target. A `now` earlier than a previous call is treated as that call's
    /// time, so frame and scroll callbacks with slightly different clocks
    /// never make a count step back. Finished and detached count-ups are
    /// dropped.
    pub fn advance<D>(&mut self, doc: &mut D, now: HostTime, tracer: &mut Tracer<'_>)
    where
        D: Document<Node = N>,
    {
        self.latest = self.latest.max(now);
        let now = self.latest;
        self.running.retain_mut(|r| {
            if !doc.is_connected(&r.node) {
                return false;
            }
            let value = r.count.value_at(now);
            if r.shown.is_none_or(|shown| r.count.advances(shown, value)) {
                doc.apply(&r.node, &Mutation::SetText(r.count.text_at(now)));
                r.shown = Some(value);
            }
            if r.count.is_finished(now) {
                tracer.count_up_finished(&CountUpFinishedEvent {
                    target: r.count.target,
                    at: now,
                });
                return false;
            }
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestDoc;

    #[test]
    fn interpolates_on_elapsed_time() {
        let c = CountUp::new(250, Duration::from_millis(2000), "", HostTime::from_millis(1000));
        assert_eq!(c.value_at(HostTime::from_millis(0)), 0, "before start");
        assert_eq!(c.value_at(HostTime::from_millis(1000)), 0);
        assert_eq!(c.value_at(HostTime::from_millis(2000)), 125);
        assert_eq!(c.value_at(HostTime::from_millis(2999)), 249);
        assert_eq!(c.value_at(HostTime::from_millis(3000)), 250);
        assert_eq!(c.value_at(HostTime::from_millis(9000)), 250);
    }

    #[test]
    fn negative_target_floors_towards_negative_infinity() {
        let c = CountUp::new(-10, Duration::from_millis(1000), "", HostTime(0));
        assert_eq!(c.value_at(HostTime::from_millis(50)), -1);
        assert_eq!(c.value_at(HostTime::from_millis(1000)), -10);
    }

    #[test]
    fn zero_duration_shows_target_immediately() {
        let c = CountUp::new(7, Duration::ZERO, "+", HostTime(5));
        assert_eq!(c.text_at(HostTime(5)), "7+");
        assert!(c.is_finished(HostTime(5)));
    }

    #[test]
    fn advance_writes_only_changes_and_finishes_exactly() {
        let mut doc = TestDoc::new();
        let n = doc.add("span", &[], 0.0);
        let mut ups = CountUps::new();
        ups.start(n, CountUp::new(3, Duration::from_millis(300), "%", HostTime(0)));

        ups.advance(&mut doc, HostTime::from_millis(0), &mut Tracer::none());
        assert_eq!(doc.nodes[n].text, "0%");

        // Poke the text; an unchanged value must not rewrite it.
        doc.nodes[n].text = String::from("stale");
        ups.advance(&mut doc, HostTime::from_millis(50), &mut Tracer::none());
        assert_eq!(doc.nodes[n].text, "stale");

        ups.advance(&mut doc, HostTime::from_millis(310), &mut Tracer::none());
        assert_eq!(doc.nodes[n].text, "3%");
        assert!(ups.is_empty());
    }

    #[test]
    fn earlier_time_never_steps_the_count_back() {
        let mut doc = TestDoc::new();
        let n = doc.add("span", &[], 0.0);
        let mut ups = CountUps::default();
        ups.start(n, CountUp::new(250, Duration::from_millis(2000), "", HostTime::from_millis(1000)));

        ups.advance(&mut doc, HostTime::from_millis(1000), &mut Tracer::none());
        ups.advance(&mut doc, HostTime::from_millis(1500), &mut Tracer::none());
        assert_eq!(doc.nodes[n].text, "62");
        ups.advance(&mut doc, HostTime::from_millis(1490), &mut Tracer::none());
        assert_eq!(doc.nodes[n].text, "62");
        ups.advance(&mut doc, HostTime::from_millis(1520), &mut Tracer::none());
        assert_eq!(doc.nodes[n].text, "65");
    }

    #[test]
    fn negative_count_only_moves_down() {
        let c = CountUp::new(-10, Duration::from_millis(1000), "", HostTime(0));
        assert!(c.advances(-2, -3));
        assert!(!c.advances(-3, -2));
        assert!(!c.advances(-3, -3));
    }

    #[test]
    fn detached_count_up_is_dropped() {
        let mut doc = TestDoc::new();
        let n = doc.add("span", &[], 0.0);
        let mut ups = CountUps::new();
        ups.start(n, CountUp::new(10, Duration::from_millis(100), "", HostTime(0)));
        doc.nodes[n].detached = true;
        ups.advance(&mut doc, HostTime::from_millis(10), &mut Tracer::none());
        assert!(ups.is_empty());
        assert_eq!(doc.nodes[n].text, "");
    }
}
