// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The in-memory page.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::{Rect, Size, Vec2};
use unveil_core::document::{Document, Mutation};
use unveil_core::selector::{Selector, SelectorTarget};

/// Handle to an element of a [`FakeDocument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Insertion index of the element.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Description of an element to insert.
#[derive(Clone, Debug, PartialEq)]
pub struct NewElement {
    tag: String,
    classes: Vec<String>,
    attributes: Vec<(String, String)>,
    text: String,
    size: Size,
}

impl NewElement {
    /// A 100 px square element with tag `tag`.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: Vec::new(),
            attributes: Vec::new(),
            text: String::new(),
            size: Size::new(100.0, 100.0),
        }
    }

    /// A `<div>`.
    #[must_use]
    pub fn div() -> Self {
        Self::new("div")
    }

    /// Adds a class.
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Sets an attribute.
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.retain(|(n, _)| n != name);
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    /// Sets the initial text content.
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Sets the element's size in px.
    #[must_use]
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.size = Size::new(width, height);
        self
    }
}

#[derive(Clone, Debug)]
struct Node {
    desc: NewElement,
    style: Vec<(String, String)>,
    parent: Option<NodeId>,
    /// Border box in page coordinates.
    page_rect: Rect,
    detached: bool,
}

impl SelectorTarget for Node {
    fn tag_name(&self) -> &str {
        &self.desc.tag
    }

    fn has_class(&self, class: &str) -> bool {
        self.desc.classes.iter().any(|c| c == class)
    }

    fn attribute_value(&self, name: &str) -> Option<&str> {
        self.desc
            .attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// An in-memory page with a scrollable viewport.
///
/// Elements are stacked at the page positions given on insertion; the
/// viewport shows page rows `scroll_y..scroll_y + height`. Every mutation
/// applied through [`Document::apply`] is appended to a log.
#[derive(Clone, Debug)]
pub struct FakeDocument {
    nodes: Vec<Node>,
    viewport: Size,
    scroll_y: f64,
    log: Vec<(NodeId, Mutation)>,
}

impl FakeDocument {
    /// An empty page with a `width` by `height` viewport.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            nodes: Vec::new(),
            viewport: Size::new(width, height),
            scroll_y: 0.0,
            log: Vec::new(),
        }
    }

    /// A 1280×800 desktop viewport.
    #[must_use]
    pub fn desktop() -> Self {
        Self::new(1280.0, 800.0)
    }

    /// Inserts a top-level element whose top edge is at page offset `top`.
    pub fn insert(&mut self, desc: NewElement, top: f64) -> NodeId {
        let page_rect = Rect::from_origin_size((0.0, top), desc.size);
        self.push(desc, None, page_rect)
    }

    /// Inserts a child of `parent` occupying the parent's box.
    pub fn insert_child(&mut self, parent: NodeId, desc: NewElement) -> NodeId {
        let page_rect = self.nodes[parent.0].page_rect;
        self.push(desc, Some(parent), page_rect)
    }

    fn push(&mut self, desc: NewElement, parent: Option<NodeId>, page_rect: Rect) -> NodeId {
        self.nodes.push(Node {
            desc,
            style: Vec::new(),
            parent,
            page_rect,
            detached: false,
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Removes `node` and its subtree from the page.
    pub fn detach(&mut self, node: NodeId) {
        self.nodes[node.0].detached = true;
    }

    /// Moves a top-level element so its top edge is at page offset `top`.
    pub fn move_to(&mut self, node: NodeId, top: f64) {
        let rect = &mut self.nodes[node.0].page_rect;
        *rect = Rect::from_origin_size((rect.x0, top), rect.size());
    }

    /// Scrolls the viewport to page offset `y`.
    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y;
    }

    /// Scrolls so that `node`'s top edge sits `from_top` px below the
    /// viewport's top edge.
    pub fn scroll_into_view(&mut self, node: NodeId, from_top: f64) {
        self.scroll_y = self.nodes[node.0].page_rect.y0 - from_top;
    }

    /// Current scroll offset.
    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Text content of `node`.
    #[must_use]
    pub fn text(&self, node: NodeId) -> &str {
        &self.nodes[node.0].desc.text
    }

    /// Inline style property of `node`.
    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.nodes[node.0]
            .style
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if `node` carries `class`.
    #[must_use]
    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.nodes[node.0].has_class(class)
    }

    /// Attribute value on `node`.
    #[must_use]
    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0].attribute_value(name)
    }

    /// Every mutation applied so far, in order.
    #[must_use]
    pub fn log(&self) -> &[(NodeId, Mutation)] {
        &self.log
    }

    /// Empties the mutation log.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// How many times `class` was added to `node`.
    #[must_use]
    pub fn class_added(&self, node: NodeId, class: &str) -> usize {
        self.log
            .iter()
            .filter(|(n, m)| *n == node && matches!(m, Mutation::AddClass(c) if c == class))
            .count()
    }

    /// Every text written to `node`, in order.
    #[must_use]
    pub fn texts_written(&self, node: NodeId) -> Vec<&str> {
        self.log
            .iter()
            .filter_map(|(n, m)| match m {
                Mutation::SetText(text) if *n == node => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.nodes[node.0].parent;
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.nodes[parent.0].parent;
        }
        false
    }

    fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }
}

impl Document for FakeDocument {
    type Node = NodeId;

    fn query_all(&self, scope: Option<&NodeId>, selector: &Selector) -> Vec<NodeId> {
        self.ids()
            .filter(|&id| scope.is_none_or(|&s| self.is_descendant(id, s)))
            .filter(|&id| self.is_connected(&id) && selector.matches(&self.nodes[id.0]))
            .collect()
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.ids()
            .filter(|&id| self.nodes[id.0].parent == Some(*node))
            .collect()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.attr(*node, name).map(ToString::to_string)
    }

    fn bounds(&self, node: &NodeId) -> Rect {
        self.nodes[node.0].page_rect - Vec2::new(0.0, self.scroll_y)
    }

    fn viewport(&self) -> Rect {
        Rect::from_origin_size((0.0, 0.0), self.viewport)
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        let mut current = Some(*node);
        while let Some(id) = current {
            if self.nodes[id.0].detached {
                return false;
            }
            current = self.nodes[id.0].parent;
        }
        true
    }

    fn apply(&mut self, node: &NodeId, mutation: &Mutation) {
        self.log.push((*node, mutation.clone()));
        let n = &mut self.nodes[node.0];
        match mutation {
            Mutation::AddClass(class) => {
                if !n.has_class(class) {
                    n.desc.classes.push(class.to_string());
                }
            }
            Mutation::RemoveClass(class) => n.desc.classes.retain(|c| c != class),
            Mutation::SetStyle { property, value } => {
                n.style.retain(|(p, _)| p != property);
                n.style.push((property.to_string(), value.clone()));
            }
            Mutation::RemoveStyle(property) => n.style.retain(|(p, _)| p != property),
            Mutation::SetText(text) => n.desc.text.clone_from(text),
            Mutation::SetAttribute { name, value } => {
                n.desc.attributes.retain(|(a, _)| a != name);
                n.desc.attributes.push((name.to_string(), value.clone()));
            }
            Mutation::RemoveAttribute(name) => n.desc.attributes.retain(|(a, _)| a != name),
        }
    }
}
