// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The live page behind the [`Document`] trait.
//!
//! [`DomDocument`] answers the dispatcher's queries with `querySelectorAll`
//! and `getBoundingClientRect`, and applies [`Mutation`]s to class lists,
//! inline styles, text and attributes.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Rect;
use unveil_core::document::{Document, Mutation};
use unveil_core::selector::Selector;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use web_sys::{Element, HtmlElement, NodeList, Window};

/// The browser page, with `Element` handles as nodes.
#[derive(Clone)]
pub struct DomDocument {
    window: Window,
    document: web_sys::Document,
}

impl core::fmt::Debug for DomDocument {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomDocument").finish_non_exhaustive()
    }
}

impl DomDocument {
    /// Wraps the global window's document.
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        Ok(Self { window, document })
    }

    /// The window.
    #[must_use]
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// The underlying `web_sys` document.
    #[must_use]
    pub fn document(&self) -> &web_sys::Document {
        &self.document
    }

    /// Current vertical scroll offset.
    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    /// The `<body>` element.
    pub fn body(&self) -> Result<HtmlElement, JsValue> {
        self.document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))
    }

    /// Creates a detached element.
    pub fn create(&self, tag: &str) -> Result<HtmlElement, JsValue> {
        Ok(self.document.create_element(tag)?.unchecked_into())
    }

    /// First element matching a CSS selector.
    #[must_use]
    pub fn find(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    /// Every element matching a CSS selector.
    #[must_use]
    pub fn find_all(&self, selector: &str) -> Vec<Element> {
        self.document
            .query_selector_all(selector)
            .map(|list| elements(&list))
            .unwrap_or_default()
    }
}

/// Collects the `Element`s of a `NodeList`.
pub(crate) fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

impl Document for DomDocument {
    type Node = Element;

    fn query_all(&self, scope: Option<&Element>, selector: &Selector) -> Vec<Element> {
        let list = match scope {
            Some(scope) => scope.query_selector_all(selector.as_str()),
            None => self.document.query_selector_all(selector.as_str()),
        };
        list.map(|list| elements(&list)).unwrap_or_default()
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        let children = node.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .collect()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn bounds(&self, node: &Element) -> Rect {
        let r = node.get_bounding_client_rect();
        Rect::new(r.left(), r.top(), r.right(), r.bottom())
    }

    fn viewport(&self) -> Rect {
        let size = |value: Result<JsValue, JsValue>| value.ok().and_then(|v| v.as_f64());
        let width = size(self.window.inner_width()).unwrap_or(0.0);
        let height = size(self.window.inner_height()).unwrap_or(0.0);
        Rect::new(0.0, 0.0, width, height)
    }

    fn is_connected(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn apply(&mut self, node: &Element, mutation: &Mutation) {
        // DOM exceptions here only come from invalid names, which the
        // effects never produce.
        match mutation {
            Mutation::AddClass(class) => {
                let _ = node.class_list().add_1(class);
            }
            Mutation::RemoveClass(class) => {
                let _ = node.class_list().remove_1(class);
            }
            Mutation::SetStyle { property, value } => {
                if let Some(el) = node.dyn_ref::<HtmlElement>() {
                    let _ = el.style().set_property(property, value);
                }
            }
            Mutation::RemoveStyle(property) => {
                if let Some(el) = node.dyn_ref::<HtmlElement>() {
                    let _ = el.style().remove_property(property);
                }
            }
            Mutation::SetText(text) => node.set_text_content(Some(text)),
            Mutation::SetAttribute { name, value } => {
                let _ = node.set_attribute(name, value);
            }
            Mutation::RemoveAttribute(name) => {
                let _ = node.remove_attribute(name);
            }
        }
    }
}
