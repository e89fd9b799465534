// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small CSS selector subset.
//!
//! Rules select elements with the same selectors the markup contract uses:
//! comma-separated lists of compound selectors built from an optional tag,
//! `#id`, `.class`, `[attr]`, `[attr="value"]`, and `[attr^="prefix"]`.
//! Combinators and pseudo-classes are rejected at parse time.
//!
//! The browser backend hands [`Selector::as_str`] straight to
//! `querySelectorAll`; in-memory documents match with [`Selector::matches`].

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use crate::error::{Error, Result};

/// Read access to the parts of an element a [`Selector`] inspects.
pub trait SelectorTarget {
    /// Lower-case tag name, e.g. `"img"`.
    fn tag_name(&self) -> &str;
    /// Returns `true` if the element carries `class`.
    fn has_class(&self, class: &str) -> bool;
    /// Returns the value of attribute `name`, if present.
    fn attribute_value(&self, name: &str) -> Option<&str>;
}

/// How an attribute selector compares values.
#[derive(Clone, Debug, PartialEq, Eq)]
enum AttrTest {
    Present,
    Equals(String),
    Prefix(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct AttrSelector {
    name: String,
    test: AttrTest,
}

/// One compound selector, e.g. `img.lazy[data-src]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<AttrSelector>,
}

impl Compound {
    fn matches(&self, target: &impl SelectorTarget) -> bool {
        if let Some(tag) = &self.tag
            && !target.tag_name().eq_ignore_ascii_case(tag)
        {
            return false;
        }
        if let Some(id) = &self.id
            && target.attribute_value("id") != Some(id.as_str())
        {
            return false;
        }
        self.classes.iter().all(|c| target.has_class(c))
            && self.attributes.iter().all(|a| {
                let value = target.attribute_value(&a.name);
                match &a.test {
                    AttrTest::Present => value.is_some(),
                    AttrTest::Equals(expected) => value == Some(expected.as_str()),
                    AttrTest::Prefix(prefix) => {
                        value.is_some_and(|v| v.starts_with(prefix.as_str()))
                    }
                }
            })
    }
}

/// A parsed selector list.
#[derive(Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Compound>,
}

impl Selector {
    /// Parses a selector list.
    pub fn parse(source: &str) -> Result<Self> {
        let alternatives = source
            .split(',')
            .map(|part| parse_compound(part.trim()).map_err(|reason| invalid(source, reason)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            source: source.trim().to_string(),
            alternatives,
        })
    }

    /// Creates a selector matching a single class name.
    ///
    /// `class` must be a plain identifier; it is not validated.
    #[must_use]
    pub fn class(class: &str) -> Self {
        let mut source = String::with_capacity(class.len() + 1);
        source.push('.');
        source.push_str(class);
        Self {
            source,
            alternatives: alloc::vec![Compound {
                classes: alloc::vec![class.to_string()],
                ..Compound::default()
            }],
        }
    }

    /// Returns the selector text, suitable for `querySelectorAll`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns `true` if any alternative matches `target`.
    #[must_use]
    pub fn matches(&self, target: &impl SelectorTarget) -> bool {
        self.alternatives.iter().any(|c| c.matches(target))
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Selector({:?})", self.source)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn invalid(source: &str, reason: &'static str) -> Error {
    Error::InvalidSelector {
        selector: source.to_string(),
        reason,
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Splits a leading identifier off `input`.
fn take_ident(input: &str) -> (&str, &str) {
    let end = input.find(|c: char| !is_ident_char(c)).unwrap_or(input.len());
    input.split_at(end)
}

fn parse_compound(mut input: &str) -> core::result::Result<Compound, &'static str> {
    if input.is_empty() {
        return Err("empty compound selector");
    }
    let mut compound = Compound::default();

    let (tag, rest) = take_ident(input);
    if !tag.is_empty() {
        compound.tag = Some(tag.to_ascii_lowercase());
    }
    input = rest;

    while let Some(c) = input.chars().next() {
        match c {
            '.' | '#' => {
                let (name, rest) = take_ident(&input[1..]);
                if name.is_empty() {
                    return Err("missing class or id name");
                }
                if c == '.' {
                    compound.classes.push(name.to_string());
                } else {
                    compound.id = Some(name.to_string());
                }
                input = rest;
            }
            '[' => {
                let close = input.find(']').ok_or("unterminated attribute selector")?;
                compound.attributes.push(parse_attribute(&input[1..close])?);
                input = &input[close + 1..];
            }
            c if c.is_whitespace() || c == '>' || c == '+' || c == '~' => {
                return Err("combinators are not supported");
            }
            ':' => return Err("pseudo-classes are not supported"),
            _ => return Err("unexpected character"),
        }
    }
    Ok(compound)
}

fn parse_attribute(body: &str) -> core::result::Result<AttrSelector, &'static str> {
    let (name, rest) = take_ident(body.trim());
    if name.is_empty() {
        return Err("missing attribute name");
    }
    let rest = rest.trim();
    let test = if rest.is_empty() {
        AttrTest::Present
    } else if let Some(value) = rest.strip_prefix("^=") {
        AttrTest::Prefix(unquote(value)?)
    } else if let Some(value) = rest.strip_prefix('=') {
        AttrTest::Equals(unquote(value)?)
    } else {
        return Err("unsupported attribute operator");
    };
    Ok(AttrSelector {
        name: name.to_string(),
        test,
    })
}

fn unquote(value: &str) -> core::result::Result<String, &'static str> {
    let value = value.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = value.strip_prefix(quote) {
            return inner
                .strip_suffix(quote)
                .map(ToString::to_string)
                .ok_or("unterminated quoted value");
        }
    }
    if !value.is_empty() && value.chars().all(is_ident_char) {
        Ok(value.to_string())
    } else {
        Err("attribute value must be quoted")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct El {
        tag: &'static str,
        classes: &'static [&'static str],
        attrs: &'static [(&'static str, &'static str)],
    }

    impl SelectorTarget for El {
        fn tag_name(&self) -> &str {
            self.tag
        }
        fn has_class(&self, class: &str) -> bool {
            self.classes.iter().any(|c| *c == class)
        }
        fn attribute_value(&self, name: &str) -> Option<&str> {
            self.attrs.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
        }
    }

    #[test]
    fn attribute_list_matches_any_alternative() {
        let sel =
            Selector::parse(r#"[data-animate="fade"], [data-animate="fade-up"], [data-animate="fade-down"]"#)
                .unwrap();
        let up = El {
            tag: "div",
            classes: &[],
            attrs: &[("data-animate", "fade-up")],
        };
        let slide = El {
            tag: "div",
            classes: &[],
            attrs: &[("data-animate", "slide-left")],
        };
        assert!(sel.matches(&up));
        assert!(!sel.matches(&slide));
    }

    #[test]
    fn tag_class_and_prefix() {
        let img = El {
            tag: "IMG",
            classes: &["card"],
            attrs: &[("data-src", "a.png")],
        };
        assert!(Selector::parse("img[data-src]").unwrap().matches(&img));
        assert!(Selector::parse(".card").unwrap().matches(&img));
        assert!(!Selector::parse("a[data-src]").unwrap().matches(&img));

        let anchor = El {
            tag: "a",
            classes: &[],
            attrs: &[("href", "#about")],
        };
        assert!(Selector::parse(r##"a[href^="#"]"##).unwrap().matches(&anchor));
    }

    #[test]
    fn class_constructor_matches_parse() {
        assert_eq!(
            Selector::class("stagger-item"),
            Selector::parse(".stagger-item").unwrap()
        );
    }

    #[test]
    fn id_selector() {
        let el = El {
            tag: "div",
            classes: &[],
            attrs: &[("id", "particles-js")],
        };
        assert!(Selector::parse("#particles-js").unwrap().matches(&el));
    }

    #[test]
    fn unsupported_syntax_is_rejected() {
        assert!(matches!(
            Selector::parse(".a .b"),
            Err(Error::InvalidSelector { .. })
        ));
        assert!(Selector::parse("a:hover").is_err());
        assert!(Selector::parse("[data-x").is_err());
        assert!(Selector::parse("a,").is_err());
    }
}
