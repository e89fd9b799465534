// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser backend for unveil.
//!
//! This crate connects `unveil_core` to browser APIs:
//!
//! - [`RafLoop`]: `requestAnimationFrame` frame source
//! - [`ScrollListener`]: passive window scroll events
//! - [`DomDocument`]: the live page as a [`Document`]
//! - [`chrome::PageChrome`]: navbar, menu, ripples, toasts and forms
//! - [`particles`]: particle library entry point and CSS fallback
//! - [`ConsoleSink`]: trace events in the browser console

#![no_std]

extern crate alloc;

pub mod chrome;
mod console;
mod dom;
pub mod particles;
mod raf;
mod scroll;

pub use console::ConsoleSink;
pub use dom::DomDocument;
pub use raf::RafLoop;
pub use scroll::ScrollListener;
pub use unveil_core::document::Document;

use unveil_core::time::HostTime;

/// Returns the current host time from `performance.now()`.
#[must_use]
pub fn now() -> HostTime {
    HostTime::from_millis_f64(raf::performance_now())
}
