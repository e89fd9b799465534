// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility geometry.
//!
//! The dispatcher decides visibility the way an intersection observer does:
//! the *root* is the viewport grown (or shrunk) by a [`RootMargin`], and an
//! element's visible fraction is the share of its area that overlaps the
//! root. A [`Threshold`] is met once that fraction reaches the configured
//! value.

use alloc::string::ToString as _;
use alloc::vec::Vec;

use kurbo::{Insets, Rect};

use crate::error::{Error, Result};

/// A visibility threshold in `0.0..=1.0`.
///
/// Zero means "any intersection, including edge contact".
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct Threshold(f64);

impl Threshold {
    /// Fires on any intersection.
    pub const ZERO: Self = Self(0.0);
    /// Fires when half the element is visible.
    pub const HALF: Self = Self(0.5);

    /// Creates a threshold, rejecting values outside `0.0..=1.0` and NaN.
    pub fn new(value: f64) -> Result<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::ThresholdOutOfRange(value))
        }
    }

    /// Creates a threshold from a constant known to be in range.
    ///
    /// # Panics
    ///
    /// Panics if `value` is outside `0.0..=1.0`.
    #[must_use]
    pub const fn from_const(value: f64) -> Self {
        assert!(value >= 0.0 && value <= 1.0, "threshold must be within 0..=1");
        Self(value)
    }

    /// Returns the raw fraction.
    #[inline]
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Returns whether `visibility` satisfies this threshold.
    #[inline]
    #[must_use]
    pub fn is_met(self, visibility: Visibility) -> bool {
        visibility.intersecting && visibility.fraction >= self.0
    }
}

/// Signed pixel insets applied to the viewport before intersection testing.
///
/// Positive values grow the effective viewport, negative values shrink it,
/// matching CSS `rootMargin`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct RootMargin {
    /// Top inset in px.
    pub top: f64,
    /// Right inset in px.
    pub right: f64,
    /// Bottom inset in px.
    pub bottom: f64,
    /// Left inset in px.
    pub left: f64,
}

impl RootMargin {
    /// No margin: the root is exactly the viewport.
    pub const NONE: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a margin from explicit top, right, bottom, left insets.
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Parses CSS `margin` shorthand with one to four values.
    ///
    /// Each value is a pixel length (`-100px`) or a unitless number.
    ///
    /// ```
    /// # use unveil_core::geometry::RootMargin;
    /// let m = RootMargin::parse("0px 0px -100px 0px").unwrap();
    /// assert_eq!(m.bottom, -100.0);
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || Error::InvalidRootMargin(text.to_string());
        let values = text
            .split_whitespace()
            .map(|part| {
                let number = part.strip_suffix("px").unwrap_or(part);
                number.parse::<f64>().ok().filter(|v| v.is_finite())
            })
            .collect::<Option<Vec<f64>>>()
            .ok_or_else(invalid)?;

        match values.as_slice() {
            &[all] => Ok(Self::new(all, all, all, all)),
            &[vertical, horizontal] => Ok(Self::new(vertical, horizontal, vertical, horizontal)),
            &[top, horizontal, bottom] => Ok(Self::new(top, horizontal, bottom, horizontal)),
            &[top, right, bottom, left] => Ok(Self::new(top, right, bottom, left)),
            _ => Err(invalid()),
        }
    }

    /// Returns the margin as `kurbo` insets.
    #[must_use]
    pub const fn insets(self) -> Insets {
        Insets::new(self.left, self.top, self.right, self.bottom)
    }

    /// Applies the margin to `viewport`, producing the intersection root.
    #[must_use]
    pub fn apply(self, viewport: Rect) -> Rect {
        viewport + self.insets()
    }
}

/// The visibility of one element against an intersection root.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Visibility {
    /// Whether the element touches or overlaps the root.
    pub intersecting: bool,
    /// Visible share of the element's area, in `0.0..=1.0`.
    pub fraction: f64,
}

impl Visibility {
    /// An element entirely outside the root.
    pub const HIDDEN: Self = Self {
        intersecting: false,
        fraction: 0.0,
    };

    /// Computes the visibility of `element` against `root`.
    ///
    /// An inverted root (a margin that shrinks the viewport past zero size)
    /// intersects nothing. A zero-area element touching the root counts as
    /// fully visible.
    #[must_use]
    pub fn measure(element: Rect, root: Rect) -> Self {
        if root.width() < 0.0 || root.height() < 0.0 {
            return Self::HIDDEN;
        }
        let element = element.abs();
        let intersecting = element.x0 <= root.x1
            && element.x1 >= root.x0
            && element.y0 <= root.y1
            && element.y1 >= root.y0;
        if !intersecting {
            return Self::HIDDEN;
        }

        let area = element.area();
        let fraction = if area > 0.0 {
            let overlap = element.intersect(root);
            (overlap.area() / area).clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            intersecting: true,
            fraction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 1000.0, 800.0);

    #[test]
    fn threshold_range_is_checked() {
        assert!(Threshold::new(0.15).is_ok());
        assert!(Threshold::new(1.0).is_ok());
        assert_eq!(Threshold::new(1.5), Err(Error::ThresholdOutOfRange(1.5)));
        assert!(Threshold::new(f64::NAN).is_err());
    }

    #[test]
    fn root_margin_shorthand() {
        assert_eq!(
            RootMargin::parse("10px").unwrap(),
            RootMargin::new(10.0, 10.0, 10.0, 10.0)
        );
        assert_eq!(
            RootMargin::parse("0 -50px").unwrap(),
            RootMargin::new(0.0, -50.0, 0.0, -50.0)
        );
        assert_eq!(
            RootMargin::parse("1px 2px 3px").unwrap(),
            RootMargin::new(1.0, 2.0, 3.0, 2.0)
        );
        assert!(RootMargin::parse("").is_err());
        assert!(RootMargin::parse("5em").is_err());
        assert!(RootMargin::parse("1 2 3 4 5").is_err());
    }

    #[test]
    fn negative_bottom_margin_shrinks_root() {
        let root = RootMargin::new(0.0, 0.0, -100.0, 0.0).apply(VIEWPORT);
        assert_eq!(root, Rect::new(0.0, 0.0, 1000.0, 700.0));
    }

    #[test]
    fn fraction_of_partially_visible_element() {
        // 100px tall, top 25px inside the viewport.
        let el = Rect::new(0.0, 775.0, 100.0, 875.0);
        let vis = Visibility::measure(el, VIEWPORT);
        assert!(vis.intersecting);
        assert!((vis.fraction - 0.25).abs() < 1e-9, "got {}", vis.fraction);
        assert!(Threshold::from_const(0.15).is_met(vis));
        assert!(!Threshold::HALF.is_met(vis));
    }

    #[test]
    fn edge_contact_meets_zero_threshold_only() {
        let el = Rect::new(0.0, 800.0, 100.0, 900.0);
        let vis = Visibility::measure(el, VIEWPORT);
        assert!(vis.intersecting);
        assert_eq!(vis.fraction, 0.0);
        assert!(Threshold::ZERO.is_met(vis));
        assert!(!Threshold::from_const(0.01).is_met(vis));
    }

    #[test]
    fn zero_area_element_inside_is_fully_visible() {
        let el = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert_eq!(Visibility::measure(el, VIEWPORT).fraction, 1.0);
    }

    #[test]
    fn inverted_root_hides_everything() {
        let root = RootMargin::new(0.0, 0.0, -900.0, 0.0).apply(VIEWPORT);
        let el = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(Visibility::measure(el, root), Visibility::HIDDEN);
    }
}
