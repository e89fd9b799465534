// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trigger rules and their handles.

use alloc::vec::Vec;
use core::fmt;

use crate::config::DispatcherConfig;
use crate::effect::Effect;
use crate::error::Result;
use crate::geometry::{RootMargin, Threshold};
use crate::selector::Selector;

/// Whether a binding survives its first firing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FireMode {
    /// Unbind after the first crossing.
    #[default]
    Once,
    /// Stay bound and fire again on every new crossing from below.
    Repeatable,
}

/// Which elements a rule binds.
#[derive(Clone, Debug)]
pub enum Selection<N> {
    /// Every element matching the selector at scan time.
    Selector(Selector),
    /// An explicit group of nodes.
    Nodes(Vec<N>),
}

/// A parametrized trigger: which elements, when they count as visible, and
/// what happens when they become visible.
#[derive(Clone, Debug)]
pub struct TriggerRule<N> {
    /// Elements to bind.
    pub selection: Selection<N>,
    /// Visible fraction required to fire.
    pub threshold: Threshold,
    /// Adjustment applied to the viewport before measuring.
    pub root_margin: RootMargin,
    /// Whether bindings survive firing.
    pub fire_mode: FireMode,
    /// What firing does.
    pub effect: Effect<N>,
}

impl<N> TriggerRule<N> {
    /// Creates a rule with threshold zero, no margin, and [`FireMode::Once`].
    #[must_use]
    pub fn new(selection: Selection<N>, effect: Effect<N>) -> Self {
        Self {
            selection,
            threshold: Threshold::ZERO,
            root_margin: RootMargin::NONE,
            fire_mode: FireMode::Once,
            effect,
        }
    }

    /// Creates a rule selecting `selector`.
    pub fn select(selector: &str, effect: Effect<N>) -> Result<Self> {
        Ok(Self::new(Selection::Selector(Selector::parse(selector)?), effect))
    }

    /// Sets the threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the root margin.
    #[must_use]
    pub fn with_root_margin(mut self, root_margin: RootMargin) -> Self {
        self.root_margin = root_margin;
        self
    }

    /// Sets the fire mode.
    #[must_use]
    pub fn with_fire_mode(mut self, fire_mode: FireMode) -> Self {
        self.fire_mode = fire_mode;
        self
    }

    /// Takes threshold, margin and fire mode from `config`.
    #[must_use]
    pub fn with_config(self, config: DispatcherConfig) -> Self {
        self.with_threshold(config.threshold)
            .with_root_margin(config.root_margin)
            .with_fire_mode(config.fire_mode)
    }
}

/// A handle to a registered rule.
///
/// Contains both a slot index and a generation counter so that stale handles
/// are detected after the rule is unregistered and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleHandle {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl RuleHandle {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for RuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleHandle({}@gen{})", self.idx, self.generation)
    }
}

/// Slot storage for rules with generational handles.
#[derive(Debug)]
pub(crate) struct RuleSlots<N> {
    rules: Vec<Option<TriggerRule<N>>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
}

impl<N> RuleSlots<N> {
    pub(crate) const fn new() -> Self {
        Self {
            rules: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, rule: TriggerRule<N>) -> RuleHandle {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.rules[idx as usize] = Some(rule);
            idx
        } else {
            let idx = u32::try_from(self.rules.len()).unwrap_or(u32::MAX);
            self.rules.push(Some(rule));
            self.generation.push(0);
            idx
        };
        RuleHandle {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    pub(crate) fn remove(&mut self, handle: RuleHandle) -> Option<TriggerRule<N>> {
        self.get(handle)?;
        let rule = self.rules[handle.idx as usize].take();
        // Bump generation so old handles immediately fail validation.
        self.generation[handle.idx as usize] += 1;
        self.free_list.push(handle.idx);
        rule
    }

    pub(crate) fn get(&self, handle: RuleHandle) -> Option<&TriggerRule<N>> {
        let idx = handle.idx as usize;
        if self.generation.get(idx) != Some(&handle.generation) {
            return None;
        }
        self.rules[idx].as_ref()
    }

    pub(crate) fn len(&self) -> usize {
        self.rules.len() - self.free_list.len()
    }

    /// Live handles in slot order.
    pub(crate) fn handles(&self) -> Vec<RuleHandle> {
        self.rules
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_some())
            .map(|(i, _)| {
                let idx = u32::try_from(i).unwrap_or(u32::MAX);
                RuleHandle {
                    idx,
                    generation: self.generation[i],
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_prevents_stale_access() {
        let mut slots = RuleSlots::<usize>::new();
        let h1 = slots.insert(TriggerRule::new(Selection::Nodes(Vec::new()), Effect::Reveal));
        assert!(slots.remove(h1).is_some());
        let h2 = slots.insert(TriggerRule::new(Selection::Nodes(Vec::new()), Effect::LazyImage));
        // h2 reuses the same slot but has a different generation.
        assert_eq!(h1.index(), h2.index());
        assert_ne!(h1.generation(), h2.generation());
        assert!(slots.get(h1).is_none());
        assert!(slots.get(h2).is_some());
        assert!(slots.remove(h1).is_none());
        assert_eq!(slots.len(), 1);
        assert_eq!(slots.handles(), [h2]);
    }

    #[test]
    fn config_sets_visibility_parameters() {
        let rule = TriggerRule::<usize>::select("[data-count]", Effect::CountUp)
            .unwrap()
            .with_config(DispatcherConfig::portfolio());
        assert_eq!(rule.threshold.get(), 0.15);
        assert_eq!(rule.root_margin.bottom, -100.0);
        assert_eq!(rule.fire_mode, FireMode::Once);
    }
}
