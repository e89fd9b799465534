// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic drivers for unveil.
//!
//! [`FakeDocument`] is an in-memory page: elements are laid out in page
//! coordinates, the viewport scrolls over them, and every applied
//! [`Mutation`] is recorded. [`FrameClock`] hands out frame times. Together
//! they let tests replay scroll-and-frame sequences without a browser.

#![no_std]

extern crate alloc;

mod clock;
mod document;

pub use clock::FrameClock;
pub use document::{NewElement, FakeDocument, NodeId};
pub use unveil_core::document::Mutation;
