// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typewriter text for `[data-typing]` elements.
//!
//! Text appears one character at a time behind a blinking caret. Like the
//! count-up, progress is a function of elapsed time: after a 500 ms start
//! delay, character *k* appears at `500 + k * speed` ms, and the caret stops
//! blinking 500 ms after the text is complete.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use crate::attr::{self, ZeroPolicy, names};
use crate::document::{Document, Mutation};
use crate::error::Result;
use crate::selector::Selector;
use crate::time::{Duration, HostTime};
use crate::trace::{AttributeFallbackEvent, Tracer};

/// Delay before the first character.
pub const START_DELAY_MS: u64 = 500;
/// Delay between the last character and the caret going still.
pub const SETTLE_MS: u64 = 500;
/// Milliseconds per character when `data-typing-speed` is missing.
pub const DEFAULT_SPEED_MS: u64 = 100;

/// One element being typed out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Typewriter {
    text: Vec<char>,
    speed: Duration,
    started: HostTime,
}

impl Typewriter {
    /// Creates a typewriter that starts counting at `started`.
    #[must_use]
    pub fn new(text: &str, speed: Duration, started: HostTime) -> Self {
        Self {
            text: text.chars().collect(),
            speed,
            started,
        }
    }

    fn elapsed(&self, now: HostTime) -> Duration {
        now.saturating_duration_since(self.started)
    }

    /// Number of characters visible at `now`.
    #[must_use]
    pub fn visible_chars(&self, now: HostTime) -> usize {
        let Some(typing) = self
            .elapsed(now)
            .ticks()
            .checked_sub(Duration::from_millis(START_DELAY_MS).ticks())
        else {
            return 0;
        };
        let typed = match self.speed.ticks() {
            0 => self.text.len(),
            speed => usize::try_from(typing / speed + 1).unwrap_or(usize::MAX),
        };
        typed.min(self.text.len())
    }

    /// The text visible at `now`.
    #[must_use]
    pub fn text_at(&self, now: HostTime) -> String {
        self.text[..self.visible_chars(now)].iter().collect()
    }

    /// Time at which the caret stops blinking.
    #[must_use]
    pub fn settles_at(&self) -> HostTime {
        let len = u64::try_from(self.text.len()).unwrap_or(u64::MAX);
        self.started
            .saturating_add(Duration::from_millis(START_DELAY_MS))
            .saturating_add(self.speed.saturating_mul(len))
            .saturating_add(Duration::from_millis(SETTLE_MS))
    }
}

#[derive(Debug)]
struct Running<N> {
    node: N,
    writer: Typewriter,
    shown: usize,
}

/// All typing effects on the page.
#[derive(Debug)]
pub struct Typewriters<N> {
    selector: Selector,
    running: Vec<Running<N>>,
}

impl<N: Clone + PartialEq> Typewriters<N> {
    /// Creates an empty set for `[data-typing]`.
    pub fn new() -> Result<Self> {
        Ok(Self {
            selector: Selector::parse("[data-typing]")?,
            running: Vec::new(),
        })
    }

    /// Finds every `[data-typing]` element, clears its text, shows the caret
    /// and starts typing at `now`.
    pub fn start<D>(&mut self, doc: &mut D, now: HostTime, tracer: &mut Tracer<'_>)
    where
        D: Document<Node = N>,
    {
        for node in doc.query_all(None, &self.selector) {
            let text = doc.attribute(&node, names::TYPING).unwrap_or_default();
            let speed = attr::read_millis(
                doc.attribute(&node, names::TYPING_SPEED).as_deref(),
                DEFAULT_SPEED_MS,
                ZeroPolicy::UseDefault,
            );
            if speed.fell_back {
                tracer.attribute_fallback(&AttributeFallbackEvent {
                    attribute: names::TYPING_SPEED,
                });
            }
            doc.apply_all(
                &node,
                &[
                    Mutation::SetText(String::new()),
                    Mutation::style("border-right", "2px solid var(--accent-primary)"),
                    Mutation::style("padding-right", "5px"),
                    Mutation::style("animation", "blink 0.7s infinite"),
                ],
            );
            self.running.retain(|r| r.node != node);
            self.running.push(Running {
                node,
                writer: Typewriter::new(&text, speed.value, now),
                shown: 0,
            });
        }
    }

    /// Number of elements still typing or blinking.
    #[must_use]
    pub fn len(&self) -> usize {
        self.running.len()
    }

    /// Returns `true` when every effect has settled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// Writes the text visible at `now` and settles finished carets.
    pub fn advance<D>(&mut self, doc: &mut D, now: HostTime)
    where
        D: Document<Node = N>,
    {
        self.running.retain_mut(|r| {
            if !doc.is_connected(&r.node) {
                return false;
            }
            let visible = r.writer.visible_chars(now);
            if visible != r.shown {
                doc.apply(&r.node, &Mutation::SetText(r.writer.text_at(now)));
                r.shown = visible;
            }
            if now >= r.writer.settles_at() {
                doc.apply(&r.node, &Mutation::RemoveStyle(Cow::Borrowed("animation")));
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
    fn characters_follow_elapsed_time() {
        let w = Typewriter::new("héllo", Duration::from_millis(100), HostTime(0));
        assert_eq!(w.visible_chars(HostTime::from_millis(499)), 0);
        assert_eq!(w.text_at(HostTime::from_millis(500)), "h");
        assert_eq!(w.text_at(HostTime::from_millis(650)), "hé");
        assert_eq!(w.text_at(HostTime::from_millis(900)), "héllo");
        assert_eq!(w.text_at(HostTime::from_millis(5000)), "héllo");
        assert_eq!(w.settles_at(), HostTime::from_millis(1500));
    }

    #[test]
    fn start_sets_caret_and_advance_settles() {
        let mut doc = TestDoc::new();
        let n = doc.add("h1", &[("data-typing", "Hi"), ("data-typing-speed", "0")], 0.0);
        doc.nodes[n].text = String::from("placeholder");

        let mut t = Typewriters::new().unwrap();
        t.start(&mut doc, HostTime(0), &mut Tracer::none());
        assert_eq!(doc.nodes[n].text, "");
        assert_eq!(doc.style(n, "animation"), Some("blink 0.7s infinite"));

        // Zero speed falls back to 100 ms per character.
        t.advance(&mut doc, HostTime::from_millis(550));
        assert_eq!(doc.nodes[n].text, "H");
        t.advance(&mut doc, HostTime::from_millis(600));
        assert_eq!(doc.nodes[n].text, "Hi");
        assert_eq!(t.len(), 1);

        t.advance(&mut doc, HostTime::from_millis(1200));
        assert_eq!(doc.style(n, "animation"), None);
        assert_eq!(doc.style(n, "padding-right"), Some("5px"));
        assert!(t.is_empty());
    }
}
