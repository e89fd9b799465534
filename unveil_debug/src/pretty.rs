// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Times are
//! printed in milliseconds.

use std::io::Write;

use unveil_core::rule::RuleHandle;
use unveil_core::time::HostTime;
use unveil_core::trace::{
    AttributeFallbackEvent, CountUpFinishedEvent, CrossingEvent, DeferredEvent, DeferredOutcome,
    EffectFiredEvent, RuleRegisteredEvent, SessionEvent, SessionTransition, TraceSink,
    UnboundEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn ms(t: HostTime) -> f64 {
    t.ticks() as f64 / 1000.0
}

fn rule(h: RuleHandle) -> String {
    format!("r{}.{}", h.index(), h.generation())
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_rule_registered(&mut self, e: &RuleRegisteredEvent) {
        let _ = writeln!(
            self.writer,
            "[rule] {} {:?} bound={} skipped={}",
            rule(e.rule),
            e.category,
            e.bound,
            e.skipped,
        );
    }

    fn on_crossing(&mut self, e: &CrossingEvent) {
        let _ = writeln!(
            self.writer,
            "[cross] {} binding={} fraction={:.3} at {:.1}ms",
            rule(e.rule),
            e.binding,
            e.fraction,
            ms(e.at),
        );
    }

    fn on_effect_fired(&mut self, e: &EffectFiredEvent) {
        let _ = writeln!(
            self.writer,
            "[fire] {} {:?} immediate={} deferred={} at {:.1}ms",
            rule(e.rule),
            e.category,
            e.immediate,
            e.deferred,
            ms(e.at),
        );
    }

    fn on_unbound(&mut self, e: &UnboundEvent) {
        let _ = writeln!(self.writer, "[unbind] {} binding={}", rule(e.rule), e.binding);
    }

    fn on_deferred(&mut self, e: &DeferredEvent) {
        let outcome = match e.outcome {
            DeferredOutcome::Applied => "applied",
            DeferredOutcome::Detached => "DETACHED",
        };
        let _ = writeln!(
            self.writer,
            "[deferred] {outcome} due {:.1}ms drained {:.1}ms",
            ms(e.due),
            ms(e.drained_at),
        );
    }

    fn on_count_up_finished(&mut self, e: &CountUpFinishedEvent) {
        let _ = writeln!(
            self.writer,
            "[count] target={} at {:.1}ms",
            e.target,
            ms(e.at),
        );
    }

    fn on_attribute_fallback(&mut self, e: &AttributeFallbackEvent) {
        let _ = writeln!(self.writer, "[fallback] {}", e.attribute);
    }

    fn on_session(&mut self, e: &SessionEvent) {
        let transition = match e.transition {
            SessionTransition::Destroyed => "destroyed",
            SessionTransition::Refreshed => "refreshed",
        };
        let _ = writeln!(
            self.writer,
            "[session] {transition} rules={} bindings={}",
            e.rules, e.bindings,
        );
    }
}
