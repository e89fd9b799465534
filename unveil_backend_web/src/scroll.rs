// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window scroll events.

use alloc::boxed::Box;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, Window};

/// A passive `scroll` listener on the window that reports `scrollY`.
///
/// The listener is removed when the value is dropped.
pub struct ScrollListener {
    window: Window,
    closure: Closure<dyn FnMut(Event)>,
}

impl ScrollListener {
    /// Registers `callback` for every scroll event of `window`.
    pub fn new(window: &Window, mut callback: impl FnMut(f64) + 'static) -> Result<Self, JsValue> {
        let source = window.clone();
        let closure = Closure::wrap(Box::new(move |_event: Event| {
            callback(source.scroll_y().unwrap_or(0.0));
        }) as Box<dyn FnMut(Event)>);

        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        window.add_event_listener_with_callback_and_add_event_listener_options(
            "scroll",
            closure.as_ref().unchecked_ref(),
            &options,
        )?;
        Ok(Self {
            window: window.clone(),
            closure,
        })
    }
}

impl Drop for ScrollListener {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("scroll", self.closure.as_ref().unchecked_ref());
    }
}

impl core::fmt::Debug for ScrollListener {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScrollListener").finish_non_exhaustive()
    }
}
