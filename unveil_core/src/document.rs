// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The document contract that backends implement.
//!
//! `unveil_core` never touches a real DOM. Everything it needs from the page
//! goes through the [`Document`] trait, and every change it makes is a
//! [`Mutation`] handed back to [`Document::apply`].
//!
//! # Crate boundaries
//!
//! `unveil_core` owns selection, visibility math, effect policies and
//! timing. `unveil_backend_web` implements [`Document`] over `web_sys`
//! elements and drives the session from `requestAnimationFrame` and scroll
//! events. `unveil_harness` implements it in memory for tests.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! fn on_frame(now: HostTime) {
//!     // Visibility poll, deferred mutations, count-ups, typing.
//!     session.on_frame(&mut document, now);
//! }
//!
//! fn on_scroll(scroll_y: f64, now: HostTime) {
//!     session.on_scroll(&mut document, scroll_y);
//!     session.on_frame(&mut document, now);
//! }
//! ```

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::selector::Selector;

/// A change to one element.
///
/// Effects produce mutations; only the backend applies them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    /// Adds a class to the element's class list.
    AddClass(Cow<'static, str>),
    /// Removes a class from the element's class list.
    RemoveClass(Cow<'static, str>),
    /// Sets an inline style property.
    SetStyle {
        /// CSS property name, e.g. `"opacity"`.
        property: Cow<'static, str>,
        /// CSS value.
        value: String,
    },
    /// Removes an inline style property.
    RemoveStyle(Cow<'static, str>),
    /// Replaces the element's text content.
    SetText(String),
    /// Sets an attribute.
    SetAttribute {
        /// Attribute name.
        name: Cow<'static, str>,
        /// Attribute value.
        value: String,
    },
    /// Removes an attribute.
    RemoveAttribute(Cow<'static, str>),
}

impl Mutation {
    /// Shorthand for [`Mutation::SetStyle`].
    #[must_use]
    pub fn style(property: &'static str, value: impl Into<String>) -> Self {
        Self::SetStyle {
            property: Cow::Borrowed(property),
            value: value.into(),
        }
    }

    /// Shorthand for [`Mutation::AddClass`] with a static class name.
    #[must_use]
    pub const fn add_class(class: &'static str) -> Self {
        Self::AddClass(Cow::Borrowed(class))
    }
}

/// Read and write access to a page.
///
/// `Node` is the backend's element handle. It must be cheap to clone and
/// compare: the dispatcher stores one per bound element.
pub trait Document {
    /// Element handle.
    type Node: Clone + PartialEq;

    /// Returns all elements matching `selector` in document order, searching
    /// the whole document when `scope` is `None` and the descendants of
    /// `scope` otherwise.
    fn query_all(&self, scope: Option<&Self::Node>, selector: &Selector) -> Vec<Self::Node>;

    /// Returns the element children of `node` in document order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Returns the value of attribute `name` on `node`.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Returns the border box of `node` in viewport coordinates.
    fn bounds(&self, node: &Self::Node) -> Rect;

    /// Returns the viewport rectangle.
    fn viewport(&self) -> Rect;

    /// Returns `true` while `node` is attached to the document.
    fn is_connected(&self, node: &Self::Node) -> bool;

    /// Applies `mutation` to `node`.
    fn apply(&mut self, node: &Self::Node, mutation: &Mutation);

    /// Applies several mutations to `node` in order.
    fn apply_all(&mut self, node: &Self::Node, mutations: &[Mutation]) {
        for mutation in mutations {
            self.apply(node, mutation);
        }
    }
}
