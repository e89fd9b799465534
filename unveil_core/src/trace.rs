// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the dispatcher.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! dispatcher and page session call as rules are registered, elements cross
//! their thresholds, and effects fire. All method bodies default to no-ops,
//! so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::effect::EffectCategory;
use crate::rule::RuleHandle;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a rule's initial scan.
#[derive(Clone, Copy, Debug)]
pub struct RuleRegisteredEvent {
    /// The new rule.
    pub rule: RuleHandle,
    /// Effect category of the rule.
    pub category: EffectCategory,
    /// Elements bound by the scan.
    pub bound: u32,
    /// Matching elements skipped because another rule already observes them
    /// in the same category.
    pub skipped: u32,
}

/// Emitted when a bound element's visibility crosses its rule's threshold
/// from below.
#[derive(Clone, Copy, Debug)]
pub struct CrossingEvent {
    /// Rule that owns the binding.
    pub rule: RuleHandle,
    /// Binding slot (diagnostics only).
    pub binding: u32,
    /// Visible fraction at the crossing.
    pub fraction: f64,
    /// Poll time.
    pub at: HostTime,
}

/// Emitted when an effect fires.
#[derive(Clone, Copy, Debug)]
pub struct EffectFiredEvent {
    /// Rule whose effect fired.
    pub rule: RuleHandle,
    /// Effect category.
    pub category: EffectCategory,
    /// Mutations applied immediately.
    pub immediate: u32,
    /// Mutations queued for later.
    pub deferred: u32,
    /// Fire time.
    pub at: HostTime,
}

/// Emitted when a `Once` binding is released after firing.
#[derive(Clone, Copy, Debug)]
pub struct UnboundEvent {
    /// Rule that owned the binding.
    pub rule: RuleHandle,
    /// Binding slot (diagnostics only).
    pub binding: u32,
}

/// What happened to a deferred mutation when it came due.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeferredOutcome {
    /// The mutation was applied.
    Applied,
    /// The target had been detached; the mutation was dropped.
    Detached,
}

/// Emitted when a deferred mutation comes due.
#[derive(Clone, Copy, Debug)]
pub struct DeferredEvent {
    /// Scheduled time.
    pub due: HostTime,
    /// Time the queue was drained.
    pub drained_at: HostTime,
    /// Whether it was applied.
    pub outcome: DeferredOutcome,
}

/// Emitted when a count-up writes its final value.
#[derive(Clone, Copy, Debug)]
pub struct CountUpFinishedEvent {
    /// Final value written.
    pub target: i64,
    /// Completion time.
    pub at: HostTime,
}

/// Emitted when a malformed attribute was replaced by its default.
#[derive(Clone, Copy, Debug)]
pub struct AttributeFallbackEvent {
    /// Attribute name.
    pub attribute: &'static str,
}

/// Session lifecycle transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionTransition {
    /// All bindings were released.
    Destroyed,
    /// All rules were re-scanned.
    Refreshed,
}

/// Emitted on `destroy` and `refresh`.
#[derive(Clone, Copy, Debug)]
pub struct SessionEvent {
    /// Which transition happened.
    pub transition: SessionTransition,
    /// Registered rules.
    pub rules: u32,
    /// Bindings after the transition.
    pub bindings: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the dispatcher.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a rule is registered and scanned.
    fn on_rule_registered(&mut self, e: &RuleRegisteredEvent) {
        _ = e;
    }

    /// Called when an element crosses its threshold from below.
    fn on_crossing(&mut self, e: &CrossingEvent) {
        _ = e;
    }

    /// Called when an effect fires.
    fn on_effect_fired(&mut self, e: &EffectFiredEvent) {
        _ = e;
    }

    /// Called when a one-shot binding is released.
    fn on_unbound(&mut self, e: &UnboundEvent) {
        _ = e;
    }

    /// Called when a deferred mutation comes due.
    fn on_deferred(&mut self, e: &DeferredEvent) {
        _ = e;
    }

    /// Called when a count-up finishes.
    fn on_count_up_finished(&mut self, e: &CountUpFinishedEvent) {
        _ = e;
    }

    /// Called when an attribute falls back to its default.
    fn on_attribute_fallback(&mut self, e: &AttributeFallbackEvent) {
        _ = e;
    }

    /// Called on session teardown and refresh.
    fn on_session(&mut self, e: &SessionEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`RuleRegisteredEvent`].
    #[inline]
    pub fn rule_registered(&mut self, e: &RuleRegisteredEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_rule_registered(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CrossingEvent`].
    #[inline]
    pub fn crossing(&mut self, e: &CrossingEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_crossing(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`EffectFiredEvent`].
    #[inline]
    pub fn effect_fired(&mut self, e: &EffectFiredEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_effect_fired(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`UnboundEvent`].
    #[inline]
    pub fn unbound(&mut self, e: &UnboundEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_unbound(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DeferredEvent`].
    #[inline]
    pub fn deferred(&mut self, e: &DeferredEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_deferred(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CountUpFinishedEvent`].
    #[inline]
    pub fn count_up_finished(&mut self, e: &CountUpFinishedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_count_up_finished(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AttributeFallbackEvent`].
    #[inline]
    pub fn attribute_fallback(&mut self, e: &AttributeFallbackEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_attribute_fallback(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SessionEvent`].
    #[inline]
    pub fn session(&mut self, e: &SessionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_session(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
