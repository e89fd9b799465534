// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session configuration presets.

use crate::geometry::{RootMargin, Threshold};
use crate::rule::FireMode;

/// Visibility parameters shared by a family of rules.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DispatcherConfig {
    /// Visible fraction required to fire.
    pub threshold: Threshold,
    /// Adjustment applied to the viewport before measuring.
    pub root_margin: RootMargin,
    /// Whether bindings survive firing.
    pub fire_mode: FireMode,
}

impl DispatcherConfig {
    /// Reveal and stagger animations: 15% visible, 100px above the bottom
    /// edge, once.
    #[must_use]
    pub const fn portfolio() -> Self {
        Self {
            threshold: Threshold::from_const(0.15),
            root_margin: RootMargin::new(0.0, 0.0, -100.0, 0.0),
            fire_mode: FireMode::Once,
        }
    }

    /// Counters and bars: half visible, no margin, once.
    #[must_use]
    pub const fn half_visible() -> Self {
        Self {
            threshold: Threshold::HALF,
            root_margin: RootMargin::NONE,
            fire_mode: FireMode::Once,
        }
    }

    /// `.reveal` classes: 10% visible, 50px above the bottom edge, every
    /// time the element re-enters.
    #[must_use]
    pub const fn legacy_reveal() -> Self {
        Self {
            threshold: Threshold::from_const(0.1),
            root_margin: RootMargin::new(0.0, 0.0, -50.0, 0.0),
            fire_mode: FireMode::Repeatable,
        }
    }

    /// Lazy images: any intersection, once.
    #[must_use]
    pub const fn any_intersection() -> Self {
        Self {
            threshold: Threshold::ZERO,
            root_margin: RootMargin::NONE,
            fire_mode: FireMode::Once,
        }
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self::portfolio()
    }
}

/// Everything [`PageSession`](crate::session::PageSession) installs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig {
    /// `data-animate` and `data-stagger` rules.
    pub reveal: DispatcherConfig,
    /// `data-count`, `data-progress` and `.skill-progress` rules.
    pub metrics: DispatcherConfig,
    /// `.reveal` family rule.
    pub legacy: DispatcherConfig,
    /// `img[data-src]` rule.
    pub lazy: DispatcherConfig,
    /// Install the parallax subscriber.
    pub parallax: bool,
    /// Start `data-typing` effects.
    pub typing: bool,
    /// Register the `.reveal` family rule.
    pub legacy_reveal: bool,
    /// Register the lazy image rule.
    pub lazy_images: bool,
    /// Register the skill-bar rule.
    pub skill_bars: bool,
}

impl SessionConfig {
    /// The full portfolio page setup.
    #[must_use]
    pub const fn portfolio() -> Self {
        Self {
            reveal: DispatcherConfig::portfolio(),
            metrics: DispatcherConfig::half_visible(),
            legacy: DispatcherConfig::legacy_reveal(),
            lazy: DispatcherConfig::any_intersection(),
            parallax: true,
            typing: true,
            legacy_reveal: true,
            lazy_images: true,
            skill_bars: true,
        }
    }

    /// Only the scroll-animation rules: reveal, stagger, count-up, progress
    /// and parallax.
    #[must_use]
    pub const fn animations_only() -> Self {
        Self {
            typing: false,
            legacy_reveal: false,
            lazy_images: false,
            skill_bars: false,
            ..Self::portfolio()
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::portfolio()
    }
}
