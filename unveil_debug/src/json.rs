// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON Lines trace output.
//!
//! [`JsonLinesSink`] writes one JSON object per event, one per line. Every
//! object has an `"event"` field naming the event; times are in
//! microseconds (`"*_us"` fields).

use std::io::Write;

use serde_json::{Value, json};

use unveil_core::rule::RuleHandle;
use unveil_core::trace::{
    AttributeFallbackEvent, CountUpFinishedEvent, CrossingEvent, DeferredEvent, EffectFiredEvent,
    RuleRegisteredEvent, SessionEvent, TraceSink, UnboundEvent,
};

/// Writes trace events as JSON Lines.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: u64,
}

impl<W: Write> std::fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSink")
            .field("written", &self.written)
            .finish_non_exhaustive()
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink writing to `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Lines written so far.
    #[must_use]
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, value: &Value) {
        if serde_json::to_writer(&mut self.writer, value).is_ok()
            && self.writer.write_all(b"\n").is_ok()
        {
            self.written += 1;
        }
    }
}

fn rule(h: RuleHandle) -> Value {
    json!({ "index": h.index(), "generation": h.generation() })
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn on_rule_registered(&mut self, e: &RuleRegisteredEvent) {
        self.emit(&json!({
            "event": "rule_registered",
            "rule": rule(e.rule),
            "category": format!("{:?}", e.category),
            "bound": e.bound,
            "skipped": e.skipped,
        }));
    }

    fn on_crossing(&mut self, e: &CrossingEvent) {
        self.emit(&json!({
            "event": "crossing",
            "rule": rule(e.rule),
            "binding": e.binding,
            "fraction": e.fraction,
            "at_us": e.at.ticks(),
        }));
    }

    fn on_effect_fired(&mut self, e: &EffectFiredEvent) {
        self.emit(&json!({
            "event": "effect_fired",
            "rule": rule(e.rule),
            "category": format!("{:?}", e.category),
            "immediate": e.immediate,
            "deferred": e.deferred,
            "at_us": e.at.ticks(),
        }));
    }

    fn on_unbound(&mut self, e: &UnboundEvent) {
        self.emit(&json!({
            "event": "unbound",
            "rule": rule(e.rule),
            "binding": e.binding,
        }));
    }

    fn on_deferred(&mut self, e: &DeferredEvent) {
        self.emit(&json!({
            "event": "deferred",
            "outcome": format!("{:?}", e.outcome),
            "due_us": e.due.ticks(),
            "drained_at_us": e.drained_at.ticks(),
        }));
    }

    fn on_count_up_finished(&mut self, e: &CountUpFinishedEvent) {
        self.emit(&json!({
            "event": "count_up_finished",
            "target": e.target,
            "at_us": e.at.ticks(),
        }));
    }

    fn on_attribute_fallback(&mut self, e: &AttributeFallbackEvent) {
        self.emit(&json!({
            "event": "attribute_fallback",
            "attribute": e.attribute,
        }));
    }

    fn on_session(&mut self, e: &SessionEvent) {
        self.emit(&json!({
            "event": "session",
            "transition": format!("{:?}", e.transition),
            "rules": e.rules,
            "bindings": e.bindings,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unveil_core::time::HostTime;
    use unveil_core::trace::{DeferredOutcome, SessionTransition};

    fn lines(sink: JsonLinesSink<Vec<u8>>) -> Vec<Value> {
        String::from_utf8(sink.into_inner())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn one_object_per_line() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.on_deferred(&DeferredEvent {
            due: HostTime::from_millis(300),
            drained_at: HostTime::from_millis(316),
            outcome: DeferredOutcome::Applied,
        });
        sink.on_session(&SessionEvent {
            transition: SessionTransition::Refreshed,
            rules: 7,
            bindings: 12,
        });
        assert_eq!(sink.written(), 2);

        let events = lines(sink);
        assert_eq!(events[0]["event"], "deferred");
        assert_eq!(events[0]["outcome"], "Applied");
        assert_eq!(events[0]["drained_at_us"], 316_000);
        assert_eq!(events[1]["transition"], "Refreshed");
        assert_eq!(events[1]["bindings"], 12);
    }
}
