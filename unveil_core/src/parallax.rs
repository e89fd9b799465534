// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-linked parallax.
//!
//! Unlike everything else in this crate, parallax is not visibility-gated:
//! every scroll event recomputes the offset of every `[data-parallax]`
//! element.

use alloc::format;
use alloc::vec::Vec;

use crate::attr::{self, ZeroPolicy, names};
use crate::document::{Document, Mutation};
use crate::error::Result;
use crate::selector::Selector;
use crate::trace::{AttributeFallbackEvent, Tracer};

/// Speed used when `data-parallax` is missing, malformed or zero.
pub const DEFAULT_SPEED: f64 = 0.5;

/// Vertical offset in px for `scroll_y` at `speed`.
#[must_use]
pub fn offset(scroll_y: f64, speed: f64) -> f64 {
    // Subtracting from zero keeps a zero offset positive.
    0.0 - scroll_y * speed
}

/// Moves `[data-parallax]` elements against the scroll direction.
#[derive(Debug)]
pub struct ParallaxSubscriber<N> {
    selector: Selector,
    elements: Vec<(N, f64)>,
}

impl<N: Clone + PartialEq> ParallaxSubscriber<N> {
    /// Creates a subscriber for `[data-parallax]`.
    pub fn new() -> Result<Self> {
        Self::with_selector("[data-parallax]")
    }

    /// Creates a subscriber for a custom selector. Speeds are still read from
    /// `data-parallax`.
    pub fn with_selector(selector: &str) -> Result<Self> {
        Ok(Self {
            selector: Selector::parse(selector)?,
            elements: Vec::new(),
        })
    }

    /// Collects matching elements and their speeds, replacing any previous
    /// scan.
    pub fn scan<D>(&mut self, doc: &D, tracer: &mut Tracer<'_>)
    where
        D: Document<Node = N>,
    {
        self.elements = doc
            .query_all(None, &self.selector)
            .into_iter()
            .map(|node| {
                let speed = attr::read_f64(
                    doc.attribute(&node, names::PARALLAX).as_deref(),
                    DEFAULT_SPEED,
                    ZeroPolicy::UseDefault,
                );
                if speed.fell_back {
                    tracer.attribute_fallback(&AttributeFallbackEvent {
                        attribute: names::PARALLAX,
                    });
                }
                (node, speed.value)
            })
            .collect();
    }

    /// Number of subscribed elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if no elements are subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Sets every element's transform for `scroll_y`.
    pub fn on_scroll<D>(&self, doc: &mut D, scroll_y: f64)
    where
        D: Document<Node = N>,
    {
        for (node, speed) in &self.elements {
            if doc.is_connected(node) {
                let y = offset(scroll_y, *speed);
                doc.apply(node, &Mutation::style("transform", format!("translateY({y}px)")));
            }
        }
    }

    /// Forgets every element.
    pub fn clear(&mut self) {
        self.elements.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestDoc;

    #[test]
    fn offset_is_negative_scaled_scroll() {
        assert_eq!(offset(200.0, 0.5), -100.0);
        assert!(offset(0.0, 0.3).is_sign_positive());
    }

    #[test]
    fn speeds_fall_back_and_apply_regardless_of_visibility() {
        let mut doc = TestDoc::new();
        let slow = doc.add("div", &[("data-parallax", "0.2")], 9000.0);
        let zero = doc.add("div", &[("data-parallax", "0")], 0.0);
        let junk = doc.add("div", &[("data-parallax", "fast")], 0.0);

        let mut p = ParallaxSubscriber::new().unwrap();
        p.scan(&doc, &mut Tracer::none());
        assert_eq!(p.len(), 3);

        p.on_scroll(&mut doc, 200.0);
        assert_eq!(doc.style(slow, "transform"), Some("translateY(-40px)"));
        assert_eq!(doc.style(zero, "transform"), Some("translateY(-100px)"));
        assert_eq!(doc.style(junk, "transform"), Some("translateY(-100px)"));
    }
}
