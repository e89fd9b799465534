// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Effects: what happens to an element before and when it crosses into view.
//!
//! Every effect has two halves. The *pre-state* is applied once, when a rule
//! binds the element (hiding it, zeroing a bar's width). The *fire* half runs
//! on each qualifying crossing and either applies mutations immediately,
//! schedules them on the [`DeferredQueue`], or starts a [`CountUp`].
//!
//! Per-element parameters are read from `data-*` attributes at fire time, so
//! markup edits made before the crossing are honored.

use alloc::borrow::Cow;
use alloc::format;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use crate::attr::{self, ZeroPolicy, names};
use crate::count_up::{CountUp, CountUps};
use crate::deferred::DeferredQueue;
use crate::document::{Document, Mutation};
use crate::selector::Selector;
use crate::time::{Duration, HostTime};
use crate::trace::{AttributeFallbackEvent, Tracer};

/// Default stagger interval.
pub const DEFAULT_STAGGER_MS: u64 = 100;
/// Default count-up duration.
pub const DEFAULT_COUNT_DURATION_MS: u64 = 2000;
/// Offset between `.stagger-item` descendants of a legacy reveal.
pub const LEGACY_STAGGER_MS: u64 = 100;

/// Transition installed on progress bars before they fill.
pub const PROGRESS_TRANSITION: &str = "width 1.5s cubic-bezier(0.4, 0, 0.2, 1)";

/// Groups effects for the one-binding-per-element rule: an element is
/// observed by at most one rule per category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectCategory {
    /// `data-animate` reveals.
    Reveal,
    /// `data-stagger` containers.
    Stagger,
    /// `data-count` numbers.
    Count,
    /// `data-progress` bars.
    Progress,
    /// `.skill-progress` bars.
    SkillBar,
    /// `.reveal` family classes.
    LegacyReveal,
    /// `img[data-src]`.
    LazyImage,
    /// Caller-defined effects.
    Custom,
}

/// The `data-animate` reveal variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealKind {
    /// `fade`
    Fade,
    /// `fade-up`
    FadeUp,
    /// `fade-down`
    FadeDown,
    /// `slide-left`
    SlideLeft,
    /// `slide-right`
    SlideRight,
    /// `scale`
    Scale,
}

impl RevealKind {
    /// All variants, in markup order.
    pub const ALL: [Self; 6] = [
        Self::Fade,
        Self::FadeUp,
        Self::FadeDown,
        Self::SlideLeft,
        Self::SlideRight,
        Self::Scale,
    ];

    /// Parses a `data-animate` value.
    #[must_use]
    pub fn from_attribute(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.attribute() == value)
    }

    /// The `data-animate` value for this kind.
    #[must_use]
    pub const fn attribute(self) -> &'static str {
        match self {
            Self::Fade => "fade",
            Self::FadeUp => "fade-up",
            Self::FadeDown => "fade-down",
            Self::SlideLeft => "slide-left",
            Self::SlideRight => "slide-right",
            Self::Scale => "scale",
        }
    }

    /// The animation class added on fire.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Fade => "animate-fade",
            Self::FadeUp => "animate-fadeup",
            Self::FadeDown => "animate-fadedown",
            Self::SlideLeft => "animate-fadeInLeft",
            Self::SlideRight => "animate-fadeInRight",
            Self::Scale => "animate-scaleUp",
        }
    }

    fn pre_state(self) -> Vec<Mutation> {
        let mut pre = alloc::vec![Mutation::style("opacity", "0")];
        if self == Self::Scale {
            pre.push(Mutation::style("transform", "scale(0.8)"));
        }
        pre
    }
}

/// A caller-supplied effect: a pure function from the element to the
/// mutations to apply when it fires.
pub struct CustomEffect<N>(Rc<dyn Fn(&N) -> Vec<Mutation>>);

impl<N> CustomEffect<N> {
    /// Wraps `f`.
    pub fn new(f: impl Fn(&N) -> Vec<Mutation> + 'static) -> Self {
        Self(Rc::new(f))
    }
}

impl<N> Clone for CustomEffect<N> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<N> fmt::Debug for CustomEffect<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomEffect(..)")
    }
}

/// What a rule does to the elements it selects.
#[derive(Clone, Debug)]
pub enum Effect<N> {
    /// Hide, then add the `data-animate` class after `data-delay`.
    Reveal,
    /// Hide the children, then reveal child *i* at `i * data-stagger` ms.
    Stagger,
    /// Count the text up from zero to `data-count`.
    CountUp,
    /// Zero the width, then grow to `data-progress`% after `data-delay`.
    Progress,
    /// Zero the width, then set `data-percentage`%.
    SkillBar,
    /// Add `active` and animate `.stagger-item` descendants.
    LegacyReveal,
    /// Swap `data-src` into `src`.
    LazyImage,
    /// Run a caller-supplied function.
    Custom(CustomEffect<N>),
}

/// Mutation counts produced by one firing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FireCounts {
    /// Mutations applied during the firing.
    pub immediate: u32,
    /// Mutations queued for later.
    pub deferred: u32,
}

/// Mutable state an effect may touch when it fires.
#[derive(Debug)]
pub(crate) struct FireContext<'q, N> {
    pub(crate) now: HostTime,
    pub(crate) queue: &'q mut DeferredQueue<N>,
    pub(crate) count_ups: &'q mut CountUps<N>,
}

impl<N: Clone + PartialEq> FireContext<'_, N> {
    /// Applies `mutation` now when `delay` is zero, else queues it.
    fn apply_after<D>(
        &mut self,
        doc: &mut D,
        node: &N,
        delay: Duration,
        mutation: Mutation,
        counts: &mut FireCounts,
    ) where
        D: Document<Node = N>,
    {
        if delay.is_zero() {
            doc.apply(node, &mutation);
            counts.immediate += 1;
        } else {
            self.queue
                .schedule(self.now.saturating_add(delay), node.clone(), mutation);
            counts.deferred += 1;
        }
    }
}

fn note_fallback(tracer: &mut Tracer<'_>, fell_back: bool, attribute: &'static str) {
    if fell_back {
        tracer.attribute_fallback(&AttributeFallbackEvent { attribute });
    }
}

fn read_delay<D: Document>(doc: &D, node: &D::Node, tracer: &mut Tracer<'_>) -> Duration {
    let reading = attr::read_millis(
        doc.attribute(node, names::DELAY).as_deref(),
        0,
        ZeroPolicy::Keep,
    );
    note_fallback(tracer, reading.fell_back, names::DELAY);
    reading.value
}

fn width(percent: f64) -> Mutation {
    Mutation::style("width", format!("{percent}%"))
}

impl<N: Clone + PartialEq> Effect<N> {
    /// The category used for the one-binding-per-element rule.
    #[must_use]
    pub fn category(&self) -> EffectCategory {
        match self {
            Self::Reveal => EffectCategory::Reveal,
            Self::Stagger => EffectCategory::Stagger,
            Self::CountUp => EffectCategory::Count,
            Self::Progress => EffectCategory::Progress,
            Self::SkillBar => EffectCategory::SkillBar,
            Self::LegacyReveal => EffectCategory::LegacyReveal,
            Self::LazyImage => EffectCategory::LazyImage,
            Self::Custom(_) => EffectCategory::Custom,
        }
    }

    /// Applies the pre-trigger state to `node`.
    ///
    /// Returns `false` when the element cannot carry this effect and must not
    /// be bound: an unknown `data-animate` value or an unparsable
    /// `data-count`.
    pub(crate) fn prepare<D>(&self, doc: &mut D, node: &N) -> bool
    where
        D: Document<Node = N>,
    {
        match self {
            Self::Reveal => {
                let Some(kind) = doc
                    .attribute(node, names::ANIMATE)
                    .as_deref()
                    .and_then(RevealKind::from_attribute)
                else {
                    return false;
                };
                doc.apply_all(node, &kind.pre_state());
            }
            Self::Stagger => {
                for child in doc.children(node) {
                    doc.apply(&child, &Mutation::style("opacity", "0"));
                }
            }
            Self::CountUp => {
                return doc
                    .attribute(node, names::COUNT)
                    .as_deref()
                    .and_then(attr::parse_int)
                    .is_some();
            }
            Self::Progress => {
                doc.apply_all(
                    node,
                    &[
                        width(0.0),
                        Mutation::style("transition", PROGRESS_TRANSITION),
                    ],
                );
            }
            Self::SkillBar => doc.apply(node, &width(0.0)),
            Self::LegacyReveal | Self::LazyImage | Self::Custom(_) => {}
        }
        true
    }

    /// Runs the effect for one crossing of `node`.
    pub(crate) fn fire<D>(
        &self,
        doc: &mut D,
        node: &N,
        cx: &mut FireContext<'_, N>,
        tracer: &mut Tracer<'_>,
    ) -> FireCounts
    where
        D: Document<Node = N>,
    {
        let mut counts = FireCounts::default();
        match self {
            Self::Reveal => {
                let Some(kind) = doc
                    .attribute(node, names::ANIMATE)
                    .as_deref()
                    .and_then(RevealKind::from_attribute)
                else {
                    return counts;
                };
                let delay = read_delay(doc, node, tracer);
                doc.apply_all(
                    node,
                    &[
                        Mutation::style("animation-delay", format!("{}ms", delay.as_millis())),
                        Mutation::add_class(kind.class()),
                    ],
                );
                counts.immediate += 2;
            }
            Self::Stagger => {
                let interval = attr::read_millis(
                    doc.attribute(node, names::STAGGER).as_deref(),
                    DEFAULT_STAGGER_MS,
                    ZeroPolicy::UseDefault,
                );
                note_fallback(tracer, interval.fell_back, names::STAGGER);
                for (i, child) in (0_u64..).zip(doc.children(node)) {
                    cx.apply_after(
                        doc,
                        &child,
                        interval.value.saturating_mul(i),
                        Mutation::add_class("animate-fadeInUp"),
                        &mut counts,
                    );
                }
            }
            Self::CountUp => {
                let Some(target) = doc
                    .attribute(node, names::COUNT)
                    .as_deref()
                    .and_then(attr::parse_int)
                else {
                    return counts;
                };
                let duration = attr::read_millis(
                    doc.attribute(node, names::DURATION).as_deref(),
                    DEFAULT_COUNT_DURATION_MS,
                    ZeroPolicy::UseDefault,
                );
                note_fallback(tracer, duration.fell_back, names::DURATION);
                let suffix = doc.attribute(node, names::SUFFIX).unwrap_or_default();
                cx.count_ups.start(
                    node.clone(),
                    CountUp::new(target, duration.value, suffix, cx.now),
                );
                // The first frame is written by the next advance.
                counts.deferred += 1;
            }
            Self::Progress => {
                let percent = attr::read_percent(doc.attribute(node, names::PROGRESS).as_deref());
                note_fallback(tracer, percent.fell_back, names::PROGRESS);
                let delay = read_delay(doc, node, tracer);
                cx.apply_after(doc, node, delay, width(percent.value), &mut counts);
            }
            Self::SkillBar => {
                let percent =
                    attr::read_percent(doc.attribute(node, names::PERCENTAGE).as_deref());
                note_fallback(tracer, percent.fell_back, names::PERCENTAGE);
                doc.apply(node, &width(percent.value));
                counts.immediate += 1;
            }
            Self::LegacyReveal => {
                doc.apply(node, &Mutation::add_class("active"));
                counts.immediate += 1;
                let items = doc.query_all(Some(node), &Selector::class("stagger-item"));
                let step = Duration::from_millis(LEGACY_STAGGER_MS);
                for (i, item) in (0_u64..).zip(items) {
                    cx.apply_after(
                        doc,
                        &item,
                        step.saturating_mul(i),
                        Mutation::add_class("animate"),
                        &mut counts,
                    );
                }
            }
            Self::LazyImage => {
                if let Some(src) = doc.attribute(node, names::LAZY_SRC) {
                    doc.apply(
                        node,
                        &Mutation::SetAttribute {
                            name: Cow::Borrowed("src"),
                            value: src,
                        },
                    );
                    counts.immediate += 1;
                }
                doc.apply_all(
                    node,
                    &[
                        Mutation::add_class("fade-in"),
                        Mutation::RemoveAttribute(Cow::Borrowed(names::LAZY_SRC)),
                    ],
                );
                counts.immediate += 2;
            }
            Self::Custom(custom) => {
                let mutations = (custom.0)(node);
                doc.apply_all(node, &mutations);
                counts.immediate += u32::try_from(mutations.len()).unwrap_or(u32::MAX);
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestDoc;

    fn fire(
        effect: &Effect<usize>,
        doc: &mut TestDoc,
        node: usize,
        now: HostTime,
        queue: &mut DeferredQueue<usize>,
        count_ups: &mut CountUps<usize>,
    ) -> FireCounts {
        let mut cx = FireContext {
            now,
            queue,
            count_ups,
        };
        effect.fire(doc, &node, &mut cx, &mut Tracer::none())
    }

    #[test]
    fn reveal_class_names() {
        assert_eq!(RevealKind::FadeUp.class(), "animate-fadeup");
        assert_eq!(RevealKind::SlideRight.class(), "animate-fadeInRight");
        assert_eq!(RevealKind::from_attribute("scale"), Some(RevealKind::Scale));
        assert_eq!(RevealKind::from_attribute("spin"), None);
    }

    #[test]
    fn scale_reveal_pre_state_and_fire() {
        let mut doc = TestDoc::new();
        let n = doc.add("div", &[("data-animate", "scale"), ("data-delay", "200")], 0.0);
        let effect = Effect::Reveal;
        assert!(effect.prepare(&mut doc, &n));
        assert_eq!(doc.style(n, "opacity"), Some("0"));
        assert_eq!(doc.style(n, "transform"), Some("scale(0.8)"));

        let (mut q, mut c) = (DeferredQueue::new(), CountUps::new());
        let counts = fire(&effect, &mut doc, n, HostTime(0), &mut q, &mut c);
        assert_eq!(counts.immediate, 2);
        assert_eq!(doc.style(n, "animation-delay"), Some("200ms"));
        assert!(doc.has_class(n, "animate-scaleUp"));
    }

    #[test]
    fn unknown_reveal_kind_is_not_bound() {
        let mut doc = TestDoc::new();
        let n = doc.add("div", &[("data-animate", "spin")], 0.0);
        assert!(!Effect::Reveal.prepare(&mut doc, &n));
        assert_eq!(doc.style(n, "opacity"), None);
    }

    #[test]
    fn stagger_schedules_children() {
        let mut doc = TestDoc::new();
        let parent = doc.add("ul", &[("data-stagger", "0")], 0.0);
        let kids: Vec<usize> = (0..3).map(|_| doc.add_child(parent, &[])).collect();
        let effect = Effect::Stagger;
        assert!(effect.prepare(&mut doc, &parent));
        assert!(kids.iter().all(|&k| doc.style(k, "opacity") == Some("0")));

        let (mut q, mut c) = (DeferredQueue::new(), CountUps::new());
        let counts = fire(&effect, &mut doc, parent, HostTime::from_millis(10), &mut q, &mut c);
        assert_eq!(counts, FireCounts { immediate: 1, deferred: 2 });
        assert!(doc.has_class(kids[0], "animate-fadeInUp"));
        // Zero interval falls back to the default.
        assert_eq!(q.next_due(), Some(HostTime::from_millis(110)));
    }

    #[test]
    fn count_up_requires_parsable_target() {
        let mut doc = TestDoc::new();
        let good = doc.add("span", &[("data-count", "250")], 0.0);
        let bad = doc.add("span", &[("data-count", "many")], 0.0);
        assert!(Effect::CountUp.prepare(&mut doc, &good));
        assert!(!Effect::CountUp.prepare(&mut doc, &bad));

        let (mut q, mut c) = (DeferredQueue::new(), CountUps::new());
        fire(&Effect::CountUp, &mut doc, good, HostTime(0), &mut q, &mut c);
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn progress_waits_for_delay() {
        let mut doc = TestDoc::new();
        let bar = doc.add("div", &[("data-progress", "85"), ("data-delay", "300")], 0.0);
        assert!(Effect::Progress.prepare(&mut doc, &bar));
        assert_eq!(doc.style(bar, "width"), Some("0%"));
        assert_eq!(doc.style(bar, "transition"), Some(PROGRESS_TRANSITION));

        let (mut q, mut c) = (DeferredQueue::new(), CountUps::new());
        fire(&Effect::Progress, &mut doc, bar, HostTime(0), &mut q, &mut c);
        assert_eq!(doc.style(bar, "width"), Some("0%"));
        q.drain_due(&mut doc, HostTime::from_millis(300), &mut Tracer::none());
        assert_eq!(doc.style(bar, "width"), Some("85%"));
    }

    #[test]
    fn lazy_image_swaps_source() {
        let mut doc = TestDoc::new();
        let img = doc.add("img", &[("data-src", "me.webp")], 0.0);
        let (mut q, mut c) = (DeferredQueue::new(), CountUps::new());
        fire(&Effect::LazyImage, &mut doc, img, HostTime(0), &mut q, &mut c);
        assert_eq!(doc.attribute(&img, "src").as_deref(), Some("me.webp"));
        assert_eq!(doc.attribute(&img, "data-src"), None);
        assert!(doc.has_class(img, "fade-in"));
    }

    #[test]
    fn legacy_reveal_staggers_items() {
        let mut doc = TestDoc::new();
        let section = doc.add("section", &[], 0.0);
        let a = doc.add_child(section, &["stagger-item"]);
        let b = doc.add_child(section, &["stagger-item"]);
        let (mut q, mut c) = (DeferredQueue::new(), CountUps::new());
        fire(&Effect::LegacyReveal, &mut doc, section, HostTime(0), &mut q, &mut c);
        assert!(doc.has_class(section, "active"));
        assert!(doc.has_class(a, "animate"));
        assert!(!doc.has_class(b, "animate"));
        q.drain_due(&mut doc, HostTime::from_millis(100), &mut Tracer::none());
        assert!(doc.has_class(b, "animate"));
    }

    #[test]
    fn custom_effect_runs_closure() {
        let mut doc = TestDoc::new();
        let n = doc.add("div", &[], 0.0);
        let effect = Effect::Custom(CustomEffect::new(|_: &usize| {
            alloc::vec![Mutation::add_class("seen")]
        }));
        assert_eq!(effect.category(), EffectCategory::Custom);
        let (mut q, mut c) = (DeferredQueue::new(), CountUps::new());
        fire(&effect, &mut doc, n, HostTime(0), &mut q, &mut c);
        assert!(doc.has_class(n, "seen"));
    }
}
