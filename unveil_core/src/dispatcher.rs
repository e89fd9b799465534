// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The viewport-triggered animation dispatcher.
//!
//! [`ViewportTriggerDispatcher`] owns a set of [`TriggerRule`]s and the
//! elements they are bound to. Each call to
//! [`poll`](ViewportTriggerDispatcher::poll) measures every bound element,
//! fires effects for elements that crossed their rule's threshold since the
//! previous poll, and then advances deferred mutations and count-ups.
//!
//! # Lifecycle
//!
//! ```rust,ignore
//! let mut dispatcher = ViewportTriggerDispatcher::new();
//! let reveal = dispatcher.register(&mut doc, rule)?;
//!
//! // Every animation frame and scroll event:
//! dispatcher.poll(&mut doc, now);
//!
//! // Content was replaced:
//! dispatcher.refresh(&mut doc);
//! ```
//!
//! # Invariants
//!
//! - An element is bound to at most one rule per [`EffectCategory`]; a later
//!   rule skips elements an earlier rule already observes in that category.
//! - A [`FireMode::Once`] binding is released on its first crossing, so its
//!   effect runs at most once per element.
//! - Freshly bound elements start below threshold, so elements already in
//!   view fire on the first poll.
//!
//! `destroy` releases bindings only. Deferred mutations and count-ups that
//! are already running finish on later polls, and skip detached elements.

use alloc::format;
use alloc::vec::Vec;

use crate::count_up::CountUps;
use crate::deferred::DeferredQueue;
use crate::document::Document;
use crate::effect::{EffectCategory, FireContext};
use crate::error::{Error, Result};
use crate::geometry::Visibility;
use crate::rule::{FireMode, RuleHandle, RuleSlots, Selection, TriggerRule};
use crate::time::HostTime;
use crate::trace::{
    CrossingEvent, EffectFiredEvent, RuleRegisteredEvent, SessionEvent, SessionTransition,
    Tracer, UnboundEvent,
};

/// An element observed on behalf of one rule.
#[derive(Debug)]
struct Binding<N> {
    rule: RuleHandle,
    category: EffectCategory,
    node: N,
    /// Diagnostic id, unique for the dispatcher's lifetime.
    id: u32,
    /// Whether the threshold was met at the last poll.
    met: bool,
    /// Set when a `Once` binding fires; removed at the end of the poll.
    spent: bool,
}

/// Fires one-shot or repeatable effects as elements scroll into view.
#[derive(Debug)]
pub struct ViewportTriggerDispatcher<N> {
    rules: RuleSlots<N>,
    bindings: Vec<Binding<N>>,
    next_binding: u32,
    queue: DeferredQueue<N>,
    count_ups: CountUps<N>,
}

impl<N: Clone + PartialEq> Default for ViewportTriggerDispatcher<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Clone + PartialEq> ViewportTriggerDispatcher<N> {
    /// Creates a dispatcher with no rules.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rules: RuleSlots::new(),
            bindings: Vec::new(),
            next_binding: 0,
            queue: DeferredQueue::new(),
            count_ups: CountUps::new(),
        }
    }

    /// Registers `rule` and binds every element it currently selects.
    ///
    /// Each bound element receives its effect's pre-trigger state before this
    /// returns. Selecting nothing is not an error.
    pub fn register<D>(&mut self, doc: &mut D, rule: TriggerRule<N>) -> Result<RuleHandle>
    where
        D: Document<Node = N>,
    {
        self.register_traced(doc, rule, &mut Tracer::none())
    }

    /// Like [`register`](Self::register), emitting trace events.
    pub fn register_traced<D>(
        &mut self,
        doc: &mut D,
        rule: TriggerRule<N>,
        tracer: &mut Tracer<'_>,
    ) -> Result<RuleHandle>
    where
        D: Document<Node = N>,
    {
        let m = rule.root_margin;
        if ![m.top, m.right, m.bottom, m.left].iter().all(|v| v.is_finite()) {
            return Err(Error::InvalidRootMargin(format!("{m:?}")));
        }
        let handle = self.rules.insert(rule);
        self.scan(doc, handle, tracer);
        Ok(handle)
    }

    /// Removes a rule and releases its bindings.
    pub fn unregister(&mut self, handle: RuleHandle) -> Result<()> {
        self.rules.remove(handle).ok_or(Error::StaleHandle)?;
        self.bindings.retain(|b| b.rule != handle);
        Ok(())
    }

    /// Returns the rule for `handle`, if it is still registered.
    #[must_use]
    pub fn rule(&self, handle: RuleHandle) -> Option<&TriggerRule<N>> {
        self.rules.get(handle)
    }

    /// Number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Number of live bindings across all rules.
    #[must_use]
    pub fn bound_count(&self) -> usize {
        self.bindings.len()
    }

    /// Number of live bindings held by `handle`.
    #[must_use]
    pub fn bound_count_for(&self, handle: RuleHandle) -> usize {
        self.bindings.iter().filter(|b| b.rule == handle).count()
    }

    /// Returns `true` if any rule currently observes `node`.
    #[must_use]
    pub fn is_bound(&self, node: &N) -> bool {
        self.bindings.iter().any(|b| b.node == *node)
    }

    /// Number of deferred mutations waiting for their time.
    #[must_use]
    pub fn pending_deferred(&self) -> usize {
        self.queue.len()
    }

    /// Number of count-ups still animating.
    #[must_use]
    pub fn running_count_ups(&self) -> usize {
        self.count_ups.len()
    }

    /// Measures every binding and fires effects for new crossings, then
    /// advances deferred mutations and count-ups.
    pub fn poll<D>(&mut self, doc: &mut D, now: HostTime)
    where
        D: Document<Node = N>,
    {
        self.poll_traced(doc, now, &mut Tracer::none());
    }

    /// Like [`poll`](Self::poll), emitting trace events.
    pub fn poll_traced<D>(&mut self, doc: &mut D, now: HostTime, tracer: &mut Tracer<'_>)
    where
        D: Document<Node = N>,
    {
        let viewport = doc.viewport();
        let mut crossed = Vec::new();
        for (i, binding) in self.bindings.iter_mut().enumerate() {
            let Some(rule) = self.rules.get(binding.rule) else {
                continue;
            };
            let visibility = if doc.is_connected(&binding.node) {
                Visibility::measure(doc.bounds(&binding.node), rule.root_margin.apply(viewport))
            } else {
                Visibility::HIDDEN
            };
            let met = rule.threshold.is_met(visibility);
            if met && !binding.met {
                tracer.crossing(&CrossingEvent {
                    rule: binding.rule,
                    binding: binding.id,
                    fraction: visibility.fraction,
                    at: now,
                });
                crossed.push(i);
            }
            binding.met = met;
        }

        for i in crossed {
            let binding = &mut self.bindings[i];
            let Some(rule) = self.rules.get(binding.rule) else {
                continue;
            };
            let mut cx = FireContext {
                now,
                queue: &mut self.queue,
                count_ups: &mut self.count_ups,
            };
            let counts = rule.effect.fire(doc, &binding.node, &mut cx, tracer);
            tracer.effect_fired(&EffectFiredEvent {
                rule: binding.rule,
                category: binding.category,
                immediate: counts.immediate,
                deferred: counts.deferred,
                at: now,
            });
            if rule.fire_mode == FireMode::Once {
                binding.spent = true;
                tracer.unbound(&UnboundEvent {
                    rule: binding.rule,
                    binding: binding.id,
                });
            }
        }
        self.bindings.retain(|b| !b.spent);

        self.advance_traced(doc, now, tracer);
    }

    /// Applies due deferred mutations and writes count-up frames without
    /// measuring visibility.
    pub fn advance<D>(&mut self, doc: &mut D, now: HostTime)
    where
        D: Document<Node = N>,
    {
        self.advance_traced(doc, now, &mut Tracer::none());
    }

    /// Like [`advance`](Self::advance), emitting trace events.
    pub fn advance_traced<D>(&mut self, doc: &mut D, now: HostTime, tracer: &mut Tracer<'_>)
    where
        D: Document<Node = N>,
    {
        self.queue.drain_due(doc, now, tracer);
        self.count_ups.advance(doc, now, tracer);
    }

    /// Releases every binding. Rules stay registered. Calling this twice is
    /// the same as calling it once.
    pub fn destroy(&mut self) {
        self.destroy_traced(&mut Tracer::none());
    }

    /// Like [`destroy`](Self::destroy), emitting trace events.
    pub fn destroy_traced(&mut self, tracer: &mut Tracer<'_>) {
        self.bindings.clear();
        tracer.session(&SessionEvent {
            transition: SessionTransition::Destroyed,
            rules: count_u32(self.rules.len()),
            bindings: 0,
        });
    }

    /// Releases every binding and scans every rule again, binding elements
    /// inserted since the previous scan.
    pub fn refresh<D>(&mut self, doc: &mut D)
    where
        D: Document<Node = N>,
    {
        self.refresh_traced(doc, &mut Tracer::none());
    }

    /// Like [`refresh`](Self::refresh), emitting trace events.
    pub fn refresh_traced<D>(&mut self, doc: &mut D, tracer: &mut Tracer<'_>)
    where
        D: Document<Node = N>,
    {
        self.destroy_traced(tracer);
        for handle in self.rules.handles() {
            self.scan(doc, handle, tracer);
        }
        tracer.session(&SessionEvent {
            transition: SessionTransition::Refreshed,
            rules: count_u32(self.rules.len()),
            bindings: count_u32(self.bindings.len()),
        });
    }

    /// Binds every element `handle` selects, applying pre-trigger state.
    fn scan<D>(&mut self, doc: &mut D, handle: RuleHandle, tracer: &mut Tracer<'_>)
    where
        D: Document<Node = N>,
    {
        let Some(rule) = self.rules.get(handle) else {
            return;
        };
        let category = rule.effect.category();
        let nodes = match &rule.selection {
            Selection::Selector(selector) => doc.query_all(None, selector),
            Selection::Nodes(nodes) => nodes.clone(),
        };

        let (mut bound, mut skipped) = (0_u32, 0_u32);
        for node in nodes {
            if self
                .bindings
                .iter()
                .any(|b| b.category == category && b.node == node)
            {
                skipped += 1;
                continue;
            }
            if !rule.effect.prepare(doc, &node) {
                continue;
            }
            self.bindings.push(Binding {
                rule: handle,
                category,
                node,
                id: self.next_binding,
                met: false,
                spent: false,
            });
            self.next_binding = self.next_binding.wrapping_add(1);
            bound += 1;
        }

        tracer.rule_registered(&RuleRegisteredEvent {
            rule: handle,
            category,
            bound,
            skipped,
        });
    }
}

fn count_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::config::DispatcherConfig;
    use crate::effect::Effect;
    use crate::geometry::{RootMargin, Threshold};
    use crate::testing::TestDoc;

    fn reveal_rule() -> TriggerRule<usize> {
        TriggerRule::select("[data-animate]", Effect::Reveal)
            .unwrap()
            .with_config(DispatcherConfig::portfolio())
    }

    #[test]
    fn in_view_elements_fire_on_first_poll() {
        let mut doc = TestDoc::new();
        let seen = doc.add("div", &[("data-animate", "fade")], 100.0);
        let below = doc.add("div", &[("data-animate", "fade")], 2000.0);
        let mut d = ViewportTriggerDispatcher::new();
        d.register(&mut doc, reveal_rule()).unwrap();
        assert_eq!(d.bound_count(), 2);
        assert_eq!(doc.style(seen, "opacity"), Some("0"));

        d.poll(&mut doc, HostTime(0));
        assert!(doc.has_class(seen, "animate-fade"));
        assert!(!doc.has_class(below, "animate-fade"));
        assert!(!d.is_bound(&seen));
        assert!(d.is_bound(&below));
    }

    #[test]
    fn root_margin_delays_crossing() {
        let mut doc = TestDoc::new();
        // Top 50px visible in the viewport, but inside the -100px margin.
        let n = doc.add("div", &[("data-animate", "fade-up")], 750.0);
        let mut d = ViewportTriggerDispatcher::new();
        d.register(&mut doc, reveal_rule()).unwrap();
        d.poll(&mut doc, HostTime(0));
        assert!(!doc.has_class(n, "animate-fadeup"));

        doc.nodes[n].rect = doc.nodes[n].rect.with_origin((0.0, 600.0));
        d.poll(&mut doc, HostTime(1));
        assert!(doc.has_class(n, "animate-fadeup"));
    }

    #[test]
    fn repeatable_fires_on_each_entry() {
        let mut doc = TestDoc::new();
        let n = doc.add("div", &[], 0.0);
        let mut d = ViewportTriggerDispatcher::new();
        let rule = TriggerRule::new(
            Selection::Nodes(vec![n]),
            Effect::Custom(crate::effect::CustomEffect::new(|_: &usize| {
                vec![crate::document::Mutation::SetText("x".into())]
            })),
        )
        .with_fire_mode(FireMode::Repeatable);
        d.register(&mut doc, rule).unwrap();

        let mut fired = 0;
        for top in [0.0, 5000.0, 0.0, 0.0, 5000.0, 10.0] {
            doc.nodes[n].text.clear();
            doc.nodes[n].rect = doc.nodes[n].rect.with_origin((0.0, top));
            d.poll(&mut doc, HostTime(0));
            if doc.nodes[n].text == "x" {
                fired += 1;
            }
        }
        assert_eq!(fired, 3);
        assert!(d.is_bound(&n));
    }

    #[test]
    fn later_rule_skips_elements_in_same_category() {
        let mut doc = TestDoc::new();
        let n = doc.add("div", &[("data-animate", "fade")], 5000.0);
        let mut d = ViewportTriggerDispatcher::new();
        let first = d.register(&mut doc, reveal_rule()).unwrap();
        let second = d.register(&mut doc, reveal_rule()).unwrap();
        assert_eq!(d.bound_count_for(first), 1);
        assert_eq!(d.bound_count_for(second), 0);

        let lazy = TriggerRule::new(Selection::Nodes(vec![n]), Effect::LazyImage);
        let lazy = d.register(&mut doc, lazy).unwrap();
        assert_eq!(d.bound_count_for(lazy), 1, "different category");
    }

    #[test]
    fn unregister_invalidates_handle() {
        let mut doc = TestDoc::new();
        doc.add("div", &[("data-animate", "fade")], 5000.0);
        let mut d = ViewportTriggerDispatcher::new();
        let h = d.register(&mut doc, reveal_rule()).unwrap();
        d.unregister(h).unwrap();
        assert_eq!(d.bound_count(), 0);
        assert_eq!(d.unregister(h), Err(Error::StaleHandle));
        assert!(d.rule(h).is_none());
    }

    #[test]
    fn non_finite_margin_is_rejected() {
        let mut doc = TestDoc::new();
        let mut d = ViewportTriggerDispatcher::new();
        let rule = reveal_rule().with_root_margin(RootMargin::new(f64::NAN, 0.0, 0.0, 0.0));
        assert!(matches!(
            d.register(&mut doc, rule),
            Err(Error::InvalidRootMargin(_))
        ));
        assert_eq!(d.rule_count(), 0);
    }

    #[test]
    fn destroy_keeps_rules_and_pending_work() {
        let mut doc = TestDoc::new();
        let bar = doc.add("div", &[("data-progress", "60"), ("data-delay", "500")], 0.0);
        let mut d = ViewportTriggerDispatcher::new();
        let rule = TriggerRule::select("[data-progress]", Effect::Progress)
            .unwrap()
            .with_threshold(Threshold::HALF);
        d.register(&mut doc, rule).unwrap();
        d.poll(&mut doc, HostTime(0));
        assert_eq!(d.pending_deferred(), 1);

        d.destroy();
        d.destroy();
        assert_eq!(d.rule_count(), 1);
        assert_eq!(d.bound_count(), 0);

        d.advance(&mut doc, HostTime::from_millis(500));
        assert_eq!(doc.style(bar, "width"), Some("60%"));
    }

    #[test]
    fn detached_element_does_not_fire() {
        let mut doc = TestDoc::new();
        let n = doc.add("div", &[("data-animate", "fade")], 0.0);
        let mut d = ViewportTriggerDispatcher::new();
        d.register(&mut doc, reveal_rule()).unwrap();
        doc.nodes[n].detached = true;
        d.poll(&mut doc, HostTime(0));
        assert!(!doc.has_class(n, "animate-fade"));
        assert!(d.is_bound(&n));
    }
}
