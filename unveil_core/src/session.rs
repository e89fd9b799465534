// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-page session.
//!
//! [`PageSession`] bundles everything a page installs at load: the dispatcher
//! with the standard rule set from [`portfolio_rules`], the parallax
//! subscriber and the typing effects. The backend creates one session per
//! page and forwards frames and scroll events to it.

use alloc::string::String;
use alloc::vec::Vec;

use crate::config::SessionConfig;
use crate::dispatcher::ViewportTriggerDispatcher;
use crate::document::Document;
use crate::effect::{Effect, RevealKind};
use crate::error::Result;
use crate::parallax::ParallaxSubscriber;
use crate::rule::TriggerRule;
use crate::time::HostTime;
use crate::trace::Tracer;
use crate::typing::Typewriters;

/// Selector list matching every known `data-animate` value.
#[must_use]
pub fn reveal_selector() -> String {
    let mut selector = String::new();
    for kind in RevealKind::ALL {
        if !selector.is_empty() {
            selector.push_str(", ");
        }
        selector.push_str("[data-animate=\"");
        selector.push_str(kind.attribute());
        selector.push_str("\"]");
    }
    selector
}

/// The standard rule set, in registration order.
pub fn portfolio_rules<N>(config: &SessionConfig) -> Result<Vec<TriggerRule<N>>> {
    let mut rules = alloc::vec![
        TriggerRule::select(&reveal_selector(), Effect::Reveal)?.with_config(config.reveal),
        TriggerRule::select("[data-stagger]", Effect::Stagger)?.with_config(config.reveal),
        TriggerRule::select("[data-count]", Effect::CountUp)?.with_config(config.metrics),
        TriggerRule::select("[data-progress]", Effect::Progress)?.with_config(config.metrics),
    ];
    if config.skill_bars {
        rules.push(
            TriggerRule::select(".skill-progress", Effect::SkillBar)?.with_config(config.metrics),
        );
    }
    if config.legacy_reveal {
        rules.push(
            TriggerRule::select(
                ".reveal, .reveal-left, .reveal-right, .reveal-scale",
                Effect::LegacyReveal,
            )?
            .with_config(config.legacy),
        );
    }
    if config.lazy_images {
        rules.push(TriggerRule::select("img[data-src]", Effect::LazyImage)?.with_config(config.lazy));
    }
    Ok(rules)
}

/// Everything animated on one page.
#[derive(Debug)]
pub struct PageSession<N> {
    config: SessionConfig,
    dispatcher: ViewportTriggerDispatcher<N>,
    parallax: ParallaxSubscriber<N>,
    typing: Typewriters<N>,
}

impl<N: Clone + PartialEq> PageSession<N> {
    /// Creates an empty session.
    pub fn new(config: SessionConfig) -> Result<Self> {
        Ok(Self {
            config,
            dispatcher: ViewportTriggerDispatcher::new(),
            parallax: ParallaxSubscriber::new()?,
            typing: Typewriters::new()?,
        })
    }

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The dispatcher, for registering extra rules.
    pub fn dispatcher_mut(&mut self) -> &mut ViewportTriggerDispatcher<N> {
        &mut self.dispatcher
    }

    /// The dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &ViewportTriggerDispatcher<N> {
        &self.dispatcher
    }

    /// The parallax subscriber.
    #[must_use]
    pub fn parallax(&self) -> &ParallaxSubscriber<N> {
        &self.parallax
    }

    /// The running typing effects.
    #[must_use]
    pub fn typing(&self) -> &Typewriters<N> {
        &self.typing
    }

    /// Registers the standard rules, collects parallax elements and starts
    /// typing effects.
    pub fn install<D>(&mut self, doc: &mut D, now: HostTime) -> Result<()>
    where
        D: Document<Node = N>,
    {
        self.install_traced(doc, now, &mut Tracer::none())
    }

    /// Like [`install`](Self::install), emitting trace events.
    pub fn install_traced<D>(
        &mut self,
        doc: &mut D,
        now: HostTime,
        tracer: &mut Tracer<'_>,
    ) -> Result<()>
    where
        D: Document<Node = N>,
    {
        for rule in portfolio_rules(&self.config)? {
            self.dispatcher.register_traced(doc, rule, tracer)?;
        }
        if self.config.parallax {
            self.parallax.scan(doc, tracer);
        }
        if self.config.typing {
            self.typing.start(doc, now, tracer);
        }
        Ok(())
    }

    /// Updates parallax offsets for `scroll_y`.
    pub fn on_scroll<D>(&mut self, doc: &mut D, scroll_y: f64)
    where
        D: Document<Node = N>,
    {
        self.parallax.on_scroll(doc, scroll_y);
    }

    /// Polls visibility and advances every time-based effect.
    pub fn on_frame<D>(&mut self, doc: &mut D, now: HostTime)
    where
        D: Document<Node = N>,
    {
        self.on_frame_traced(doc, now, &mut Tracer::none());
    }

    /// Like [`on_frame`](Self::on_frame), emitting trace events.
    pub fn on_frame_traced<D>(&mut self, doc: &mut D, now: HostTime, tracer: &mut Tracer<'_>)
    where
        D: Document<Node = N>,
    {
        self.dispatcher.poll_traced(doc, now, tracer);
        self.typing.advance(doc, now);
    }

    /// Releases all bindings and parallax elements. Rules stay registered;
    /// effects already in flight finish.
    pub fn destroy(&mut self) {
        self.destroy_traced(&mut Tracer::none());
    }

    /// Like [`destroy`](Self::destroy), emitting trace events.
    pub fn destroy_traced(&mut self, tracer: &mut Tracer<'_>) {
        self.dispatcher.destroy_traced(tracer);
        self.parallax.clear();
    }

    /// Re-scans the page for every rule and parallax element.
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
        self.dispatcher.refresh_traced(doc, tracer);
        if self.config.parallax {
            self.parallax.scan(doc, tracer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DispatcherConfig;
    use crate::effect::EffectCategory;
    use crate::rule::FireMode;

    #[test]
    fn reveal_selector_lists_every_kind() {
        assert_eq!(
            reveal_selector(),
            "[data-animate=\"fade\"], [data-animate=\"fade-up\"], [data-animate=\"fade-down\"], \
             [data-animate=\"slide-left\"], [data-animate=\"slide-right\"], [data-animate=\"scale\"]"
        );
    }

    #[test]
    fn portfolio_rule_parameters() {
        let rules = portfolio_rules::<usize>(&SessionConfig::portfolio()).unwrap();
        assert_eq!(rules.len(), 7);
        let legacy = rules
            .iter()
            .find(|r| r.effect.category() == EffectCategory::LegacyReveal)
            .unwrap();
        assert_eq!(legacy.fire_mode, FireMode::Repeatable);
        assert_eq!(legacy.root_margin.bottom, -50.0);

        let count = &rules[2];
        assert_eq!(count.effect.category(), EffectCategory::Count);
        assert_eq!(count.threshold, DispatcherConfig::half_visible().threshold);
    }

    #[test]
    fn animations_only_skips_extras() {
        let rules = portfolio_rules::<usize>(&SessionConfig::animations_only()).unwrap();
        assert_eq!(rules.len(), 4);
    }

    #[test]
    fn session_installs_and_polls() {
        use crate::testing::TestDoc;

        let mut doc = TestDoc::new();
        let fade = doc.add("div", &[("data-animate", "fade")], 0.0);
        let hero = doc.add("h1", &[("data-typing", "Hey")], 0.0);
        let layer = doc.add("div", &[("data-parallax", "0.5")], 0.0);

        let mut session = PageSession::new(SessionConfig::portfolio()).unwrap();
        session.install(&mut doc, HostTime(0)).unwrap();
        assert_eq!(session.dispatcher().bound_count(), 1);
        assert_eq!(session.parallax().len(), 1);
        assert_eq!(session.typing().len(), 1);

        session.on_frame(&mut doc, HostTime::from_millis(16));
        assert!(doc.has_class(fade, "animate-fade"));

        session.on_scroll(&mut doc, 200.0);
        assert_eq!(doc.style(layer, "transform"), Some("translateY(-100px)"));

        session.on_frame(&mut doc, HostTime::from_millis(2000));
        assert_eq!(doc.nodes[hero].text, "Hey");

        session.destroy();
        assert!(session.parallax().is_empty());
        session.refresh(&mut doc);
        assert_eq!(session.parallax().len(), 1);
    }
}
