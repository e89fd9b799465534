// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trace output to the browser console.
//!
//! [`ConsoleSink`] implements [`TraceSink`] and logs one line per event with
//! `console.debug`. Attribute fallbacks go to `console.warn`, since they
//! usually mean a typo in the page markup.

use alloc::format;
use alloc::string::String;

use unveil_core::time::HostTime;
use unveil_core::trace::{
    AttributeFallbackEvent, CountUpFinishedEvent, CrossingEvent, DeferredEvent, EffectFiredEvent,
    RuleRegisteredEvent, SessionEvent, TraceSink, UnboundEvent,
};
use wasm_bindgen::JsValue;
use web_sys::console;

/// Logs trace events to the browser console.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    lines: u64,
}

impl ConsoleSink {
    /// Creates a sink.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: 0 }
    }

    /// Number of lines logged so far.
    #[must_use]
    pub const fn lines(&self) -> u64 {
        self.lines
    }

    fn debug(&mut self, line: String) {
        self.lines += 1;
        console::debug_1(&JsValue::from_str(&line));
    }
}

fn ms(t: HostTime) -> f64 {
    t.ticks() as f64 / 1000.0
}

impl TraceSink for ConsoleSink {
    fn on_rule_registered(&mut self, e: &RuleRegisteredEvent) {
        self.debug(format!(
            "[unveil:rule] {:?} {:?} bound={} skipped={}",
            e.rule, e.category, e.bound, e.skipped
        ));
    }

    fn on_crossing(&mut self, e: &CrossingEvent) {
        self.debug(format!(
            "[unveil:cross] {:?} binding={} fraction={:.2} at={:.1}ms",
            e.rule,
            e.binding,
            e.fraction,
            ms(e.at)
        ));
    }

    fn on_effect_fired(&mut self, e: &EffectFiredEvent) {
        self.debug(format!(
            "[unveil:fire] {:?} {:?} now={} later={} at={:.1}ms",
            e.rule,
            e.category,
            e.immediate,
            e.deferred,
            ms(e.at)
        ));
    }

    fn on_unbound(&mut self, e: &UnboundEvent) {
        self.debug(format!("[unveil:unbind] {:?} binding={}", e.rule, e.binding));
    }

    fn on_deferred(&mut self, e: &DeferredEvent) {
        self.debug(format!(
            "[unveil:deferred] {:?} due={:.1}ms late={:.1}ms",
            e.outcome,
            ms(e.due),
            ms(e.drained_at) - ms(e.due)
        ));
    }

    fn on_count_up_finished(&mut self, e: &CountUpFinishedEvent) {
        self.debug(format!(
            "[unveil:count] finished at {} ({:.1}ms)",
            e.target,
            ms(e.at)
        ));
    }

    fn on_attribute_fallback(&mut self, e: &AttributeFallbackEvent) {
        self.lines += 1;
        console::warn_1(&JsValue::from_str(&format!(
            "[unveil] malformed {} attribute, using the default",
            e.attribute
        )));
    }

    fn on_session(&mut self, e: &SessionEvent) {
        self.debug(format!(
            "[unveil:session] {:?} rules={} bindings={}",
            e.transition, e.rules, e.bindings
        ));
    }
}
