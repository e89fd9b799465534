// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Portfolio page demo: scroll-triggered animations driven by
//! `unveil_backend_web`.
//!
//! On load this installs the standard [`PageSession`] (reveals, staggers,
//! counters, progress and skill bars, lazy images, parallax and typing) and
//! the page chrome. The particle background follows once the library wait
//! has run out. A [`RafLoop`] forwards frames to the session and the chrome;
//! a [`ScrollListener`] forwards scroll offsets. Both paths read the same
//! clock, which never steps backwards.
//!
//! Build with: `wasm-pack build --target web demos/portfolio_web`
//!
//! The page may call the exported `refresh()` after inserting content,
//! `destroy()` before tearing the page down, and
//! `show_notification(message, kind)` to raise a toast.
//!
//! [`PageSession`]: unveil_core::session::PageSession
//! [`RafLoop`]: unveil_backend_web::RafLoop
//! [`ScrollListener`]: unveil_backend_web::ScrollListener

// This crate only runs in the browser; suppress dead-code warnings when
// cargo-checking on a native host target.
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

use std::cell::RefCell;
use std::rc::Rc;

use unveil_backend_web::chrome::{PageChrome, SharedChrome};
use unveil_backend_web::{ConsoleSink, DomDocument, RafLoop, ScrollListener, particles};
use unveil_core::chrome::NotificationKind;
use unveil_core::config::SessionConfig;
use unveil_core::particles::LibraryWait;
use unveil_core::session::PageSession;
use unveil_core::time::HostTime;
use unveil_core::trace::Tracer;
use wasm_bindgen::prelude::*;
use web_sys::Element;

struct App {
    dom: DomDocument,
    session: PageSession<Element>,
    chrome: SharedChrome,
    sink: Option<ConsoleSink>,
    particles: LibraryWait,
    clock: HostTime,
}

impl App {
    /// Latest time seen by either the frame or the scroll path.
    fn tick(&mut self, now: HostTime) -> HostTime {
        self.clock = self.clock.max(now);
        self.clock
    }

    fn frame(&mut self, now: HostTime) {
        let now = self.tick(now);
        if let Err(err) = particles::install_when_due(&mut self.particles, &self.dom, now) {
            web_sys::console::error_1(&err);
        }
        let Self {
            dom, session, sink, ..
        } = self;
        match sink {
            Some(sink) => session.on_frame_traced(dom, now, &mut Tracer::new(sink)),
            None => session.on_frame(dom, now),
        }
        self.chrome.borrow_mut().on_frame(now);
    }

    fn scroll(&mut self, scroll_y: f64) {
        self.session.on_scroll(&mut self.dom, scroll_y);
        let now = self.tick(unveil_backend_web::now());
        self.session.dispatcher_mut().poll(&mut self.dom, now);
        self.chrome.borrow().on_scroll(scroll_y);
    }
}

type SharedApp = Rc<RefCell<App>>;

thread_local! {
    static APP: RefCell<Option<SharedApp>> = const { RefCell::new(None) };
}

fn with_app(f: impl FnOnce(&mut App)) {
    let app = APP.with(|slot| slot.borrow().clone());
    if let Some(app) = app {
        f(&mut app.borrow_mut());
    }
}

/// Entry point, called automatically by `wasm_bindgen(start)`.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    let mut dom = DomDocument::new()?;
    let mut sink = cfg!(feature = "trace").then(ConsoleSink::new);

    let started = unveil_backend_web::now();
    let mut session = PageSession::new(SessionConfig::portfolio())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    let installed = match sink.as_mut() {
        Some(sink) => session.install_traced(&mut dom, started, &mut Tracer::new(sink)),
        None => session.install(&mut dom, started),
    };
    installed.map_err(|e| JsValue::from_str(&e.to_string()))?;

    let chrome = PageChrome::install(&dom)?;

    let app = Rc::new(RefCell::new(App {
        dom: dom.clone(),
        session,
        chrome,
        sink,
        particles: LibraryWait::starting(started),
        clock: started,
    }));
    APP.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&app)));

    let frame_app = Rc::clone(&app);
    let raf = RafLoop::new(move |now| frame_app.borrow_mut().frame(now));
    raf.start();

    let scroll_app = Rc::clone(&app);
    let scroll = ScrollListener::new(dom.window(), move |scroll_y| {
        scroll_app.borrow_mut().scroll(scroll_y);
    })?;

    // Both live as long as the page.
    std::mem::forget(raf);
    std::mem::forget(scroll);
    Ok(())
}

/// Re-scans the page after content was added.
#[wasm_bindgen]
pub fn refresh() {
    with_app(|app| app.session.refresh(&mut app.dom));
}

/// Releases every binding. Effects already in flight finish.
#[wasm_bindgen]
pub fn destroy() {
    with_app(|app| app.session.destroy());
}

/// Shows a toast. `kind` is `"success"`, `"error"` or anything else for info.
#[wasm_bindgen]
pub fn show_notification(message: &str, kind: &str) -> Result<(), JsValue> {
    let mut result = Ok(());
    with_app(|app| {
        result = app.chrome.borrow_mut().notify(
            message,
            NotificationKind::from_name(kind),
            unveil_backend_web::now(),
        );
    });
    result
}
