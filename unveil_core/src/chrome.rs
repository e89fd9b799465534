// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Page chrome: the decisions behind the navbar, back-to-top button, scroll
//! progress bar, mobile menu, button ripples, project filter, contact form,
//! notification toasts and stuck hover states.
//!
//! Almost everything here is a pure function of its inputs. The browser
//! backend owns the listeners and element creation and calls into this
//! module for every decision. [`reset_hover`] is the exception: it writes
//! through a [`Document`] and a [`DeferredQueue`] so the backend can retire
//! its second half from the frame loop.

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Rect};
use thiserror::Error;

use crate::deferred::DeferredQueue;
use crate::document::{Document, Mutation};
use crate::selector::Selector;
use crate::time::{Duration, HostTime};

/// Scroll offset past which the navbar gets `scrolled`.
pub const NAVBAR_SCROLLED_AFTER: f64 = 100.0;
/// Scroll offset past which the back-to-top button gets `visible`.
pub const BACK_TO_TOP_AFTER: f64 = 300.0;
/// How long a ripple lives.
pub const RIPPLE_LIFETIME_MS: u64 = 650;
/// How long a toast stays fully visible.
pub const TOAST_VISIBLE_MS: u64 = 3000;
/// How long a toast takes to fade out.
pub const TOAST_FADE_MS: u64 = 300;

/// Returns `true` when the navbar should carry `scrolled`.
#[must_use]
pub fn navbar_scrolled(scroll_y: f64) -> bool {
    scroll_y > NAVBAR_SCROLLED_AFTER
}

/// Returns `true` when the back-to-top button should carry `visible`.
#[must_use]
pub fn back_to_top_visible(scroll_y: f64) -> bool {
    scroll_y > BACK_TO_TOP_AFTER
}

/// Scroll progress in percent, `0.0..=100.0`.
///
/// A page that does not scroll reports zero.
#[must_use]
pub fn scroll_progress(scroll_y: f64, scroll_height: f64, client_height: f64) -> f64 {
    let range = scroll_height - client_height;
    if range > 0.0 {
        (scroll_y / range * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// The file name of the current page, defaulting to `index.html`.
#[must_use]
pub fn current_page(pathname: &str) -> &str {
    match pathname.rsplit('/').next() {
        Some("") | None => "index.html",
        Some(page) => page,
    }
}

/// Returns `true` when a nav link with `href` points at `page`.
///
/// `Home.html` is an alias for `index.html`.
#[must_use]
pub fn is_active_link(href: &str, page: &str) -> bool {
    href == page || (page == "Home.html" && href == "index.html")
}

/// The in-page target of an anchor link, or `None` for a bare `#` or a link
/// to another page.
#[must_use]
pub fn anchor_target(href: &str) -> Option<&str> {
    (href.starts_with('#') && href != "#").then_some(href)
}

/// Open/closed state of the mobile menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MenuState {
    open: bool,
}

impl MenuState {
    /// Returns `true` while the menu is open.
    #[must_use]
    pub const fn is_open(self) -> bool {
        self.open
    }

    /// Flips the menu and returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Closes the menu.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// Value for `document.body.style.overflow`.
    #[must_use]
    pub const fn body_overflow(self) -> &'static str {
        if self.open { "hidden" } else { "" }
    }
}

/// Size and position of a ripple inside a button, in px relative to the
/// button's top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ripple {
    /// Width and height.
    pub diameter: f64,
    /// `left` offset.
    pub left: f64,
    /// `top` offset.
    pub top: f64,
}

impl Ripple {
    /// Centers a ripple on `click` (viewport coordinates) inside a button
    /// whose border box is `button` and whose client size is
    /// `client_width` by `client_height`.
    #[must_use]
    pub fn at(button: Rect, client_width: f64, client_height: f64, click: Point) -> Self {
        let diameter = client_width.max(client_height);
        let radius = diameter / 2.0;
        Self {
            diameter,
            left: click.x - button.x0 - radius,
            top: click.y - button.y0 - radius,
        }
    }

    /// How long the ripple element lives.
    #[must_use]
    pub const fn lifetime() -> Duration {
        Duration::from_millis(RIPPLE_LIFETIME_MS)
    }
}

/// Returns `true` when a project card in `category` is shown under `filter`.
#[must_use]
pub fn filter_shows(filter: &str, category: Option<&str>) -> bool {
    filter == "all" || category == Some(filter)
}

/// Notification toast flavor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Neutral message.
    #[default]
    Info,
    /// Something worked.
    Success,
    /// Something went wrong.
    Error,
}

impl NotificationKind {
    /// Parses a kind name, treating anything unknown as [`Info`](Self::Info).
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "success" => Self::Success,
            "error" => Self::Error,
            _ => Self::Info,
        }
    }

    /// The kind name used in class lists.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    /// The toast's `className`.
    #[must_use]
    pub fn class_name(self) -> String {
        format!("notification notification-{}", self.name())
    }
}

/// Inline style of a freshly shown toast.
pub const TOAST_STYLE: &str = "position: fixed; top: 20px; right: 20px; \
    padding: 1rem 1.5rem; background: var(--glass-bg); backdrop-filter: blur(10px); \
    border: 1px solid var(--glass-border); border-radius: var(--radius-lg); \
    color: var(--text-primary); box-shadow: var(--shadow-xl); z-index: 9999; \
    animation: slideInRight 0.3s ease;";

/// Animation applied when a toast starts fading out.
pub const TOAST_FADE_ANIMATION: &str = "fadeOut 0.3s ease";

/// Where a toast is in its life.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToastPhase {
    /// Fully shown.
    Visible,
    /// Playing the fade-out animation.
    FadingOut,
    /// Gone from the page.
    Removed,
}

/// The phase of a toast `elapsed` after it was shown.
#[must_use]
pub fn toast_phase(elapsed: Duration) -> ToastPhase {
    let visible = Duration::from_millis(TOAST_VISIBLE_MS);
    if elapsed < visible {
        ToastPhase::Visible
    } else if elapsed < visible + Duration::from_millis(TOAST_FADE_MS) {
        ToastPhase::FadingOut
    } else {
        ToastPhase::Removed
    }
}

/// Class of the cards whose hover lift can stay stuck.
pub const HOVER_CARD_CLASS: &str = "project-card";
/// How long `force-reset` stays on the cards once the tab is visible again.
pub const HOVER_RESET_MS: u64 = 100;
/// Delay between the window losing focus and the cards being lowered.
pub const BLUR_SETTLE_MS: u64 = 50;

/// A focus or visibility change after which a hover state may be stuck,
/// typically from opening a link in a new tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FocusChange {
    /// The tab became visible again.
    TabVisible,
    /// The window lost focus.
    WindowBlur,
    /// The window regained focus.
    WindowFocus,
}

impl FocusChange {
    /// Mutations applied to each card at once.
    #[must_use]
    pub fn immediate(self) -> Vec<Mutation> {
        match self {
            Self::TabVisible => alloc::vec![
                Mutation::add_class("force-reset"),
                Mutation::style("transform", "translateY(0)"),
            ],
            Self::WindowBlur => Vec::new(),
            Self::WindowFocus => alloc::vec![
                Mutation::RemoveStyle(Cow::Borrowed("transform")),
                Mutation::RemoveAttribute(Cow::Borrowed("style")),
            ],
        }
    }

    /// Mutations applied to each card after a delay.
    #[must_use]
    pub fn settled(self) -> Option<(Duration, Vec<Mutation>)> {
        match self {
            Self::TabVisible => Some((
                Duration::from_millis(HOVER_RESET_MS),
                alloc::vec![
                    Mutation::RemoveClass(Cow::Borrowed("force-reset")),
                    Mutation::RemoveStyle(Cow::Borrowed("transform")),
                ],
            )),
            Self::WindowBlur => Some((
                Duration::from_millis(BLUR_SETTLE_MS),
                alloc::vec![Mutation::style("transform", "translateY(0)")],
            )),
            Self::WindowFocus => None,
        }
    }
}

/// Clears stuck hover lifts on `.project-card` elements after `change`.
///
/// The immediate half is applied to `doc`; the settled half is scheduled on
/// `queue` relative to `now`.
pub fn reset_hover<D: Document>(
    doc: &mut D,
    queue: &mut DeferredQueue<D::Node>,
    change: FocusChange,
    now: HostTime,
) {
    let cards = doc.query_all(None, &Selector::class(HOVER_CARD_CLASS));
    let immediate = change.immediate();
    let settled = change.settled();
    for card in cards {
        doc.apply_all(&card, &immediate);
        if let Some((delay, mutations)) = &settled {
            for mutation in mutations {
                queue.schedule(now.saturating_add(*delay), card.clone(), mutation.clone());
            }
        }
    }
}

/// Why a contact form submission was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ContactError {
    /// A field was left empty.
    #[error("Please fill in all fields")]
    MissingField,
    /// The email address does not look like one.
    #[error("Please enter a valid email")]
    InvalidEmail,
}

/// Message shown after a successful submission.
pub const CONTACT_SENT: &str = "Message sent successfully!";

/// Checks a contact form's fields.
pub fn validate_contact(name: &str, email: &str, message: &str) -> Result<(), ContactError> {
    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err(ContactError::MissingField);
    }
    if is_plausible_email(email) {
        Ok(())
    } else {
        Err(ContactError::InvalidEmail)
    }
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // A dot with at least one character on each side.
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestDoc;
    use crate::trace::Tracer;

    fn cards(doc: &mut TestDoc) -> (usize, usize) {
        let grid = doc.add("section", &[], 0.0);
        let card = doc.add_child(grid, &[HOVER_CARD_CLASS]);
        let other = doc.add_child(grid, &["btn"]);
        (card, other)
    }

    #[test]
    fn visible_tab_forces_cards_down_then_releases() {
        let mut doc = TestDoc::new();
        let (card, other) = cards(&mut doc);
        let mut queue = DeferredQueue::new();
        let now = HostTime::from_millis(1000);

        reset_hover(&mut doc, &mut queue, FocusChange::TabVisible, now);
        assert!(doc.has_class(card, "force-reset"));
        assert_eq!(doc.style(card, "transform"), Some("translateY(0)"));
        assert!(!doc.has_class(other, "force-reset"));

        queue.drain_due(&mut doc, HostTime::from_millis(1099), &mut Tracer::none());
        assert!(doc.has_class(card, "force-reset"));
        queue.drain_due(&mut doc, HostTime::from_millis(1100), &mut Tracer::none());
        assert!(!doc.has_class(card, "force-reset"));
        assert_eq!(doc.style(card, "transform"), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn blur_lowers_cards_after_settling() {
        let mut doc = TestDoc::new();
        let (card, _) = cards(&mut doc);
        let mut queue = DeferredQueue::new();

        reset_hover(&mut doc, &mut queue, FocusChange::WindowBlur, HostTime(0));
        assert_eq!(doc.style(card, "transform"), None);
        assert_eq!(queue.next_due(), Some(HostTime::from_millis(BLUR_SETTLE_MS)));
        queue.drain_due(&mut doc, HostTime::from_millis(50), &mut Tracer::none());
        assert_eq!(doc.style(card, "transform"), Some("translateY(0)"));
    }

    #[test]
    fn focus_clears_inline_style() {
        let mut doc = TestDoc::new();
        let (card, _) = cards(&mut doc);
        doc.nodes[card].attrs.push((String::from("style"), String::from("opacity: 1")));
        doc.apply(&card, &Mutation::style("transform", "translateY(-8px)"));
        let mut queue = DeferredQueue::new();

        reset_hover(&mut doc, &mut queue, FocusChange::WindowFocus, HostTime(0));
        assert_eq!(doc.style(card, "transform"), None);
        assert_eq!(doc.attribute(&card, "style"), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn scroll_thresholds_are_exclusive() {
        assert!(!navbar_scrolled(100.0));
        assert!(navbar_scrolled(100.5));
        assert!(!back_to_top_visible(300.0));
        assert!(back_to_top_visible(301.0));
    }

    #[test]
    fn progress_handles_short_pages() {
        assert_eq!(scroll_progress(500.0, 2000.0, 1000.0), 50.0);
        assert_eq!(scroll_progress(0.0, 800.0, 800.0), 0.0);
        assert_eq!(scroll_progress(1200.0, 2000.0, 1000.0), 100.0);
    }

    #[test]
    fn active_link_rules() {
        assert_eq!(current_page("/site/projects.html"), "projects.html");
        assert_eq!(current_page("/"), "index.html");
        assert_eq!(current_page(""), "index.html");
        assert!(is_active_link("index.html", current_page("/")));
        assert!(is_active_link("index.html", "Home.html"));
        assert!(!is_active_link("about.html", "index.html"));
    }

    #[test]
    fn anchors() {
        assert_eq!(anchor_target("#about"), Some("#about"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("about.html"), None);
    }

    #[test]
    fn menu_locks_scrolling_while_open() {
        let mut menu = MenuState::default();
        assert!(menu.toggle());
        assert_eq!(menu.body_overflow(), "hidden");
        menu.close();
        assert!(!menu.is_open());
        assert_eq!(menu.body_overflow(), "");
    }

    #[test]
    fn ripple_is_centered_on_click() {
        let button = Rect::new(100.0, 50.0, 220.0, 90.0);
        let r = Ripple::at(button, 120.0, 40.0, Point::new(130.0, 70.0));
        assert_eq!(r.diameter, 120.0);
        assert_eq!(r.left, -30.0);
        assert_eq!(r.top, -40.0);
    }

    #[test]
    fn filter_matches_all_or_category() {
        assert!(filter_shows("all", None));
        assert!(filter_shows("web", Some("web")));
        assert!(!filter_shows("web", Some("ml")));
    }

    #[test]
    fn toast_lifecycle() {
        assert_eq!(toast_phase(Duration::from_millis(2999)), ToastPhase::Visible);
        assert_eq!(toast_phase(Duration::from_millis(3000)), ToastPhase::FadingOut);
        assert_eq!(toast_phase(Duration::from_millis(3300)), ToastPhase::Removed);
        assert_eq!(
            NotificationKind::from_name("error").class_name(),
            "notification notification-error"
        );
        assert_eq!(NotificationKind::from_name("warn"), NotificationKind::Info);
    }

    #[test]
    fn contact_validation() {
        assert_eq!(validate_contact("Ada", "ada@example.org", "hi"), Ok(()));
        assert_eq!(
            validate_contact("", "ada@example.org", "hi"),
            Err(ContactError::MissingField)
        );
        for bad in ["ada", "ada@example", "ada@.org", "a da@x.org", "a@b@c.org", "@x.org"] {
            assert_eq!(
                validate_contact("Ada", bad, "hi"),
                Err(ContactError::InvalidEmail),
                "{bad}"
            );
        }
    }
}
