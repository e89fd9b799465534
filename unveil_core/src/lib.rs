// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport-triggered reveal effects for static pages.
//!
//! `unveil_core` decides *when* page elements animate and *what* changes
//! when they do. It never touches a browser: the page is reached through
//! the [`Document`](document::Document) trait, time arrives as
//! [`HostTime`](time::HostTime) and effects come out as
//! [`Mutation`](document::Mutation)s. It is `no_std` compatible (with
//! `alloc`), so the same logic runs in the browser backend and in host
//! tests.
//!
//! # Architecture
//!
//! Each animation frame flows through the dispatcher:
//!
//! ```text
//!   Backend (frame + scroll source)
//!       │
//!       ▼
//!   TriggerRule ──► Dispatcher::register() ──► bindings (rule, node)
//!                                                   │
//!                 ┌─────────────────────────────────┘
//!                 ▼
//!   Dispatcher::poll() ──► Visibility::measure() ──► crossings
//!                                                       │
//!                 ┌─────────────────────────────────────┘
//!                 ▼
//!   Effect::fire() ──► Mutation ──► Document::apply()
//!        │
//!        └──► DeferredQueue / CountUps ──► Dispatcher::advance()
//! ```
//!
//! **[`dispatcher`]**: Binds rules to matching elements, detects threshold
//! crossings and fires effects. `Once` bindings are released after firing.
//!
//! **[`rule`]**: Trigger rules (selection, threshold, root margin, fire
//! mode, effect) and generational [`RuleHandle`](rule::RuleHandle)s.
//!
//! **[`effect`]**: The built-in effects and the custom-callback escape
//! hatch, with the attribute reading each one does.
//!
//! **[`geometry`]**: Thresholds, root margins and visibility ratios on top
//! of `kurbo` rectangles.
//!
//! **[`document`]**: The [`Document`](document::Document) trait backends
//! implement, and the mutations effects produce.
//!
//! **[`selector`]**: The CSS selector subset used by rules.
//!
//! **[`attr`]**: Lenient parsing of `data-*` attributes with fallbacks.
//!
//! **[`deferred`]** and **[`count_up`]**: Time-based work started by an
//! effect and finished by later frames.
//!
//! **[`parallax`]** and **[`typing`]**: Scroll-linked offsets and the
//! typewriter effect.
//!
//! **[`session`]**: The standard per-page rule set bundled with parallax
//! and typing.
//!
//! **[`chrome`]** and **[`particles`]**: Decisions behind the rest of the
//! page: navbar, menu, ripples, toasts, contact form, particle background.
//!
//! **[`config`]**: Named presets for rule and session parameters.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types,
//! with a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `serde` (disabled by default): Derives `Serialize` for the particle
//!   configuration.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod attr;
pub mod chrome;
pub mod config;
pub mod count_up;
pub mod deferred;
pub mod dispatcher;
pub mod document;
pub mod effect;
pub mod error;
pub mod geometry;
pub mod parallax;
pub mod particles;
pub mod rule;
pub mod selector;
pub mod session;
pub mod time;
pub mod trace;
pub mod typing;

#[cfg(test)]
mod testing;

pub use dispatcher::ViewportTriggerDispatcher;
pub use error::{Error, Result};
pub use rule::{FireMode, RuleHandle, TriggerRule};
