// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A flat in-memory document for unit tests.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::Rect;

use crate::document::{Document, Mutation};
use crate::selector::{Selector, SelectorTarget};

#[derive(Clone, Debug, Default)]
pub(crate) struct Node {
    pub tag: String,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, String)>,
    pub style: Vec<(String, String)>,
    pub text: String,
    pub parent: Option<usize>,
    pub rect: Rect,
    pub detached: bool,
}

impl SelectorTarget for Node {
    fn tag_name(&self) -> &str {
        &self.tag
    }
    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
    fn attribute_value(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug)]
pub(crate) struct TestDoc {
    pub nodes: Vec<Node>,
    pub viewport: Rect,
}

impl TestDoc {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            viewport: Rect::new(0.0, 0.0, 1000.0, 800.0),
        }
    }

    /// Adds an element 100px tall at `top`, returning its index.
    pub fn add(&mut self, tag: &str, attrs: &[(&str, &str)], top: f64) -> usize {
        self.nodes.push(Node {
            tag: tag.to_string(),
            attrs: attrs
                .iter()
                .map(|(n, v)| ((*n).to_string(), (*v).to_string()))
                .collect(),
            rect: Rect::new(0.0, top, 100.0, top + 100.0),
            ..Node::default()
        });
        self.nodes.len() - 1
    }

    pub fn add_child(&mut self, parent: usize, classes: &[&str]) -> usize {
        self.nodes.push(Node {
            tag: "div".to_string(),
            classes: classes.iter().map(|c| (*c).to_string()).collect(),
            parent: Some(parent),
            rect: self.nodes[parent].rect,
            ..Node::default()
        });
        self.nodes.len() - 1
    }

    pub fn style(&self, node: usize, property: &str) -> Option<&str> {
        self.nodes[node]
            .style
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, node: usize, class: &str) -> bool {
        self.nodes[node].has_class(class)
    }

    fn is_descendant(&self, mut node: usize, ancestor: usize) -> bool {
        while let Some(parent) = self.nodes[node].parent {
            if parent == ancestor {
                return true;
            }
            node = parent;
        }
        false
    }
}

impl Document for TestDoc {
    type Node = usize;

    fn query_all(&self, scope: Option<&usize>, selector: &Selector) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&i| scope.is_none_or(|&s| self.is_descendant(i, s)))
            .filter(|&i| !self.nodes[i].detached && selector.matches(&self.nodes[i]))
            .collect()
    }

    fn children(&self, node: &usize) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&i| self.nodes[i].parent == Some(*node))
            .collect()
    }

    fn attribute(&self, node: &usize, name: &str) -> Option<String> {
        self.nodes[*node].attribute_value(name).map(ToString::to_string)
    }

    fn bounds(&self, node: &usize) -> Rect {
        self.nodes[*node].rect
    }

    fn viewport(&self) -> Rect {
        self.viewport
    }

    fn is_connected(&self, node: &usize) -> bool {
        !self.nodes[*node].detached
    }

    fn apply(&mut self, node: &usize, mutation: &Mutation) {
        let node = &mut self.nodes[*node];
        match mutation {
            Mutation::AddClass(class) => {
                if !node.has_class(class) {
                    node.classes.push(class.to_string());
                }
            }
            Mutation::RemoveClass(class) => node.classes.retain(|c| c != class),
            Mutation::SetStyle { property, value } => {
                node.style.retain(|(p, _)| p != property);
                node.style.push((property.to_string(), value.clone()));
            }
            Mutation::RemoveStyle(property) => node.style.retain(|(p, _)| p != property),
            Mutation::SetText(text) => node.text.clone_from(text),
            Mutation::SetAttribute { name, value } => {
                node.attrs.retain(|(n, _)| n != name);
                node.attrs.push((name.to_string(), value.clone()));
            }
            Mutation::RemoveAttribute(name) => node.attrs.retain(|(n, _)| n != name),
        }
    }
}
