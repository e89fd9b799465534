// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page chrome wiring.
//!
//! [`PageChrome`] owns the navbar, scroll progress bar, back-to-top button,
//! mobile menu and the short-lived ripple and toast elements. Decisions come
//! from [`unveil_core::chrome`]; this module only touches the DOM. Ripples,
//! toasts and the delayed half of the hover reset are retired by
//! [`PageChrome::on_frame`] rather than by timers.

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::{Point, Rect};
use unveil_core::chrome::{
    CONTACT_SENT, FocusChange, MenuState, NotificationKind, Ripple, TOAST_FADE_ANIMATION, TOAST_STYLE,
    ToastPhase, anchor_target, back_to_top_visible, current_page, filter_shows, is_active_link,
    navbar_scrolled, reset_hover, scroll_progress, toast_phase, validate_contact,
};
use unveil_core::deferred::DeferredQueue;
use unveil_core::time::HostTime;
use unveil_core::trace::Tracer;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, Event, EventTarget, FormData, HtmlElement, HtmlFormElement, MouseEvent, Node,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, ScrollToOptions,
};

use crate::DomDocument;

/// A ripple or toast waiting to be retired.
#[derive(Debug)]
struct Transient {
    element: HtmlElement,
    shown: HostTime,
    fading: bool,
}

/// Navbar, progress bar, back-to-top, menu, ripples and toasts.
#[derive(Debug)]
pub struct PageChrome {
    dom: DomDocument,
    navbar: Option<Element>,
    progress_bar: Option<HtmlElement>,
    back_to_top: Option<HtmlElement>,
    menu_toggle: Option<Element>,
    nav_menu: Option<Element>,
    menu: MenuState,
    ripples: Vec<Transient>,
    toasts: Vec<Transient>,
    hover: DeferredQueue<Element>,
}

/// Chrome shared between the frame loop and event listeners.
pub type SharedChrome = Rc<RefCell<PageChrome>>;

fn set_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // Listeners live as long as the page.
    closure.forget();
    Ok(())
}

impl PageChrome {
    /// Sets up the page chrome and registers its event listeners.
    ///
    /// Missing optional elements (navbar, menu, filter, contact form) only
    /// disable their feature. The progress bar and back-to-top button are
    /// created when the page lacks them.
    pub fn install(dom: &DomDocument) -> Result<SharedChrome, JsValue> {
        let body = dom.body()?;

        let progress_bar = match dom.find(".scroll-progress") {
            Some(bar) => bar.dyn_into::<HtmlElement>().ok(),
            None => {
                let bar = dom.create("div")?;
                bar.set_class_name("scroll-progress");
                body.prepend_with_node_1(&bar)?;
                Some(bar)
            }
        };

        let back_to_top = match dom.find(".back-to-top") {
            Some(button) => button.dyn_into::<HtmlElement>().ok(),
            None => {
                let button = dom.create("button")?;
                button.set_class_name("back-to-top");
                button.set_inner_html("<i class=\"fas fa-arrow-up\"></i>");
                button.set_attribute("aria-label", "Back to top")?;
                body.append_child(&button)?;
                Some(button)
            }
        };

        let chrome = Rc::new(RefCell::new(Self {
            dom: dom.clone(),
            navbar: dom.find(".navbar"),
            progress_bar,
            back_to_top,
            menu_toggle: dom.find(".menu-toggle"),
            nav_menu: dom.find(".nav-menu"),
            menu: MenuState::default(),
            ripples: Vec::new(),
            toasts: Vec::new(),
            hover: DeferredQueue::new(),
        }));

        mark_active_links(dom)?;
        set_years(dom);
        wire_back_to_top(&chrome)?;
        wire_menu(&chrome)?;
        wire_anchors(dom)?;
        wire_ripples(&chrome)?;
        wire_filter(dom)?;
        wire_contact_forms(&chrome)?;
        wire_hover_reset(&chrome)?;

        chrome.borrow().on_scroll(dom.scroll_y());
        Ok(chrome)
    }

    /// Updates the navbar, back-to-top button and progress bar.
    pub fn on_scroll(&self, scroll_y: f64) {
        if let Some(navbar) = &self.navbar {
            set_class(navbar, "scrolled", navbar_scrolled(scroll_y));
        }
        if let Some(button) = &self.back_to_top {
            set_class(button, "visible", back_to_top_visible(scroll_y));
        }
        if let (Some(bar), Some(root)) = (&self.progress_bar, self.dom.document().document_element())
        {
            let percent = scroll_progress(
                scroll_y,
                f64::from(root.scroll_height()),
                f64::from(root.client_height()),
            );
            let _ = bar.style().set_property("width", &format!("{percent}%"));
        }
    }

    /// Retires ripples and advances toasts.
    pub fn on_frame(&mut self, now: HostTime) {
        if !self.hover.is_empty() {
            self.hover.drain_due(&mut self.dom, now, &mut Tracer::none());
        }
        self.ripples.retain(|ripple| {
            let alive = now.saturating_duration_since(ripple.shown) < Ripple::lifetime();
            if !alive {
                ripple.element.remove();
            }
            alive
        });
        self.toasts.retain_mut(|toast| {
            match toast_phase(now.saturating_duration_since(toast.shown)) {
                ToastPhase::Visible => true,
                ToastPhase::FadingOut => {
                    if !toast.fading {
                        let _ = toast
                            .element
                            .style()
                            .set_property("animation", TOAST_FADE_ANIMATION);
                        toast.fading = true;
                    }
                    true
                }
                ToastPhase::Removed => {
                    toast.element.remove();
                    false
                }
            }
        });
    }

    /// Shows a notification toast.
    pub fn notify(
        &mut self,
        message: &str,
        kind: NotificationKind,
        now: HostTime,
    ) -> Result<(), JsValue> {
        let toast = self.dom.create("div")?;
        toast.set_class_name(&kind.class_name());
        toast.set_text_content(Some(message));
        toast.set_attribute("style", TOAST_STYLE)?;
        self.dom.body()?.append_child(&toast)?;
        self.toasts.push(Transient {
            element: toast,
            shown: now,
            fading: false,
        });
        Ok(())
    }

    /// Number of toasts on screen.
    #[must_use]
    pub fn toast_count(&self) -> usize {
        self.toasts.len()
    }

    fn sync_menu(&self) {
        let open = self.menu.is_open();
        for el in [&self.menu_toggle, &self.nav_menu].into_iter().flatten() {
            set_class(el, "active", open);
        }
        if let Ok(body) = self.dom.body() {
            let _ = body
                .style()
                .set_property("overflow", self.menu.body_overflow());
        }
    }

    /// Opens or closes the mobile menu.
    pub fn toggle_menu(&mut self) {
        self.menu.toggle();
        self.sync_menu();
    }

    /// Closes the mobile menu.
    pub fn close_menu(&mut self) {
        self.menu.close();
        self.sync_menu();
    }

    fn add_ripple(&mut self, button: &HtmlElement, event: &MouseEvent) -> Result<(), JsValue> {
        if let Ok(existing) = button.query_selector_all(".ripple") {
            for old in crate::dom::elements(&existing) {
                old.remove();
            }
        }
        let r = button.get_bounding_client_rect();
        let ripple = Ripple::at(
            Rect::new(r.left(), r.top(), r.right(), r.bottom()),
            f64::from(button.client_width()),
            f64::from(button.client_height()),
            Point::new(f64::from(event.client_x()), f64::from(event.client_y())),
        );

        let span = self.dom.create("span")?;
        let style = span.style();
        style.set_property("width", &format!("{}px", ripple.diameter))?;
        style.set_property("height", &format!("{}px", ripple.diameter))?;
        style.set_property("left", &format!("{}px", ripple.left))?;
        style.set_property("top", &format!("{}px", ripple.top))?;
        span.class_list().add_1("ripple")?;
        button.append_child(&span)?;
        self.ripples.push(Transient {
            element: span,
            shown: crate::now(),
            fading: false,
        });
        Ok(())
    }
}

fn mark_active_links(dom: &DomDocument) -> Result<(), JsValue> {
    let path = dom.window().location().pathname()?;
    let page = current_page(&path);
    for link in dom.find_all(".nav-link") {
        if link
            .get_attribute("href")
            .is_some_and(|href| is_active_link(&href, page))
        {
            link.class_list().add_1("active")?;
        }
    }
    Ok(())
}

fn set_years(dom: &DomDocument) {
    let year = js_sys::Date::new_0().get_full_year();
    for el in dom.find_all("[data-year]") {
        el.set_text_content(Some(&format!("{year}")));
    }
}

/// Clears stuck `.project-card` hover lifts after a focus change.
fn reset_hover_now(chrome: &SharedChrome, change: FocusChange) {
    let chrome = &mut *chrome.borrow_mut();
    reset_hover(&mut chrome.dom, &mut chrome.hover, change, crate::now());
}

fn wire_hover_reset(chrome: &SharedChrome) -> Result<(), JsValue> {
    let (document, window) = {
        let chrome = chrome.borrow();
        (chrome.dom.document().clone(), chrome.dom.window().clone())
    };

    let visible = Rc::clone(chrome);
    let page = document.clone();
    listen(&document, "visibilitychange", move |_event| {
        if !page.hidden() {
            reset_hover_now(&visible, FocusChange::TabVisible);
        }
    })?;

    let blurred = Rc::clone(chrome);
    listen(&window, "blur", move |_event| {
        reset_hover_now(&blurred, FocusChange::WindowBlur);
    })?;

    let focused = Rc::clone(chrome);
    listen(&window, "focus", move |_event| {
        reset_hover_now(&focused, FocusChange::WindowFocus);
    })
}

fn wire_back_to_top(chrome: &SharedChrome) -> Result<(), JsValue> {
    let Some(button) = chrome.borrow().back_to_top.clone() else {
        return Ok(());
    };
    let window = chrome.borrow().dom.window().clone();
    listen(&button, "click", move |_event| {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        window.scroll_to_with_scroll_to_options(&options);
    })
}

fn wire_menu(chrome: &SharedChrome) -> Result<(), JsValue> {
    let (Some(toggle), Some(menu)) = (
        chrome.borrow().menu_toggle.clone(),
        chrome.borrow().nav_menu.clone(),
    ) else {
        return Ok(());
    };

    let state = Rc::clone(chrome);
    listen(&toggle, "click", move |_event| state.borrow_mut().toggle_menu())?;

    if let Ok(links) = menu.query_selector_all(".nav-link") {
        for link in crate::dom::elements(&links) {
            let state = Rc::clone(chrome);
            listen(&link, "click", move |_event| state.borrow_mut().close_menu())?;
        }
    }

    let state = Rc::clone(chrome);
    let document = chrome.borrow().dom.document().clone();
    listen(&document, "click", move |event| {
        let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
        let inside = |el: &Element| el.contains(target.as_ref());
        if !inside(&toggle) && !inside(&menu) {
            state.borrow_mut().close_menu();
        }
    })
}

fn wire_anchors(dom: &DomDocument) -> Result<(), JsValue> {
    for anchor in dom.find_all("a[href^=\"#\"]") {
        let page = dom.clone();
        let link = anchor.clone();
        listen(&anchor, "click", move |event| {
            let Some(href) = link.get_attribute("href") else {
                return;
            };
            let Some(target) = anchor_target(&href) else {
                return;
            };
            event.prevent_default();
            if let Some(el) = page.find(target) {
                let options = ScrollIntoViewOptions::new();
                options.set_behavior(ScrollBehavior::Smooth);
                options.set_block(ScrollLogicalPosition::Start);
                el.scroll_into_view_with_scroll_into_view_options(&options);
            }
        })?;
    }
    Ok(())
}

fn wire_ripples(chrome: &SharedChrome) -> Result<(), JsValue> {
    let buttons = chrome.borrow().dom.find_all(".btn");
    for button in buttons {
        let state = Rc::clone(chrome);
        listen(&button, "click", move |event| {
            let Some(button) = event
                .current_target()
                .and_then(|t| t.dyn_into::<HtmlElement>().ok())
            else {
                return;
            };
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                let _ = state.borrow_mut().add_ripple(&button, mouse);
            }
        })?;
    }
    Ok(())
}

fn wire_filter(dom: &DomDocument) -> Result<(), JsValue> {
    let buttons = dom.find_all("[data-filter]");
    let cards = dom.find_all("[data-category]");
    if buttons.is_empty() || cards.is_empty() {
        return Ok(());
    }
    let buttons = Rc::new(buttons);
    let cards = Rc::new(cards);
    for button in buttons.iter() {
        let all = Rc::clone(&buttons);
        let cards = Rc::clone(&cards);
        let clicked = button.clone();
        listen(button, "click", move |_event| {
            let filter = clicked.get_attribute("data-filter").unwrap_or_default();
            for other in all.iter() {
                set_class(other, "active", false);
            }
            set_class(&clicked, "active", true);
            for card in cards.iter() {
                let Some(card) = card.dyn_ref::<HtmlElement>() else {
                    continue;
                };
                let category = card.get_attribute("data-category");
                if filter_shows(&filter, category.as_deref()) {
                    let _ = card.style().set_property("display", "block");
                    set_class(card, "fade-in", true);
                } else {
                    let _ = card.style().set_property("display", "none");
                }
            }
        })?;
    }
    Ok(())
}

fn field(data: &FormData, name: &str) -> String {
    data.get(name).as_string().unwrap_or_default()
}

fn wire_contact_forms(chrome: &SharedChrome) -> Result<(), JsValue> {
    let forms = chrome.borrow().dom.find_all(".contact-form");
    for form in forms {
        let Ok(form) = form.dyn_into::<HtmlFormElement>() else {
            continue;
        };
        let state = Rc::clone(chrome);
        let target = form.clone();
        listen(&form, "submit", move |event| {
            event.prevent_default();
            let Ok(data) = FormData::new_with_form(&target) else {
                return;
            };
            let verdict = validate_contact(
                &field(&data, "name"),
                &field(&data, "email"),
                &field(&data, "message"),
            );
            let now = crate::now();
            let mut chrome = state.borrow_mut();
            let _ = match verdict {
                Ok(()) => {
                    target.reset();
                    chrome.notify(CONTACT_SENT, NotificationKind::Success, now)
                }
                Err(err) => chrome.notify(&format!("{err}"), NotificationKind::Error, now),
            };
        })?;
    }
    Ok(())
}
