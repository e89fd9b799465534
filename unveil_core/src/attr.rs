// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The markup attribute contract and forgiving numeric parsing.
//!
//! Numbers in attributes are read the way the page's scripts always read
//! them: a leading numeric prefix is accepted (`"150ms"` is 150) and anything
//! unparsable falls back to a documented default. A [`Reading`] records
//! whether the fallback was taken so callers can trace it.

use crate::time::Duration;

/// Attribute names consumed from markup.
pub mod names {
    /// Effect kind for reveal animations (`fade`, `slide-left`, `scale`, ...).
    pub const ANIMATE: &str = "data-animate";
    /// Per-element fire delay in ms; also the progress-bar delay.
    pub const DELAY: &str = "data-delay";
    /// Stagger interval in ms, set on the container.
    pub const STAGGER: &str = "data-stagger";
    /// Count-up end value.
    pub const COUNT: &str = "data-count";
    /// Count-up duration in ms.
    pub const DURATION: &str = "data-duration";
    /// Text appended after the counted number.
    pub const SUFFIX: &str = "data-suffix";
    /// Progress-bar target width in percent.
    pub const PROGRESS: &str = "data-progress";
    /// Skill-bar target width in percent.
    pub const PERCENTAGE: &str = "data-percentage";
    /// Parallax scroll multiplier.
    pub const PARALLAX: &str = "data-parallax";
    /// Text typed out by the typing effect.
    pub const TYPING: &str = "data-typing";
    /// Typing speed in ms per character.
    pub const TYPING_SPEED: &str = "data-typing-speed";
    /// Deferred image source.
    pub const LAZY_SRC: &str = "data-src";
    /// Receives the current year.
    pub const YEAR: &str = "data-year";
    /// Project filter button value.
    pub const FILTER: &str = "data-filter";
    /// Project card category.
    pub const CATEGORY: &str = "data-category";
}

/// What a parsed zero means for an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZeroPolicy {
    /// Zero is a legitimate value (delays).
    Keep,
    /// Zero falls back to the default (intervals, durations, speeds).
    UseDefault,
}

/// A value read from an attribute, and whether the default was substituted
/// for a present-but-unusable value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading<T> {
    /// The value to use.
    pub value: T,
    /// `true` if the attribute was present but unusable.
    pub fell_back: bool,
}

impl<T> Reading<T> {
    const fn value(value: T) -> Self {
        Self {
            value,
            fell_back: false,
        }
    }

    const fn fallback(value: T) -> Self {
        Self {
            value,
            fell_back: true,
        }
    }
}

/// Parses a leading base-10 integer, like JavaScript's `parseInt`.
///
/// Leading whitespace and a sign are accepted; parsing stops at the first
/// non-digit. Returns `None` when no digits are found or on overflow.
#[must_use]
pub fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let magnitude = digits[..end].parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parses a leading decimal number, like JavaScript's `parseFloat`.
#[must_use]
pub fn parse_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        mantissa_digits += frac_end - frac_start;
        if frac_end > frac_start || mantissa_digits > 0 {
            end = frac_end;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    // Optional exponent, only consumed when complete.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'-' | b'+') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    text[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Reads a millisecond attribute. Negative values clamp to zero.
#[must_use]
pub fn read_millis(raw: Option<&str>, default_ms: u64, zero: ZeroPolicy) -> Reading<Duration> {
    let Some(raw) = raw else {
        return Reading::value(Duration::from_millis(default_ms));
    };
    match parse_int(raw) {
        Some(0) if zero == ZeroPolicy::UseDefault => {
            Reading::fallback(Duration::from_millis(default_ms))
        }
        Some(ms) => Reading::value(Duration::from_millis(u64::try_from(ms).unwrap_or(0))),
        None => Reading::fallback(Duration::from_millis(default_ms)),
    }
}

/// Reads a floating-point attribute.
#[must_use]
pub fn read_f64(raw: Option<&str>, default: f64, zero: ZeroPolicy) -> Reading<f64> {
    let Some(raw) = raw else {
        return Reading::value(default);
    };
    match parse_float(raw) {
        Some(v) if v == 0.0 && zero == ZeroPolicy::UseDefault => Reading::fallback(default),
        Some(v) => Reading::value(v),
        None => Reading::fallback(default),
    }
}

/// Reads a width percentage, clamped to `0.0..=100.0`; missing or malformed
/// values read as zero.
#[must_use]
pub fn read_percent(raw: Option<&str>) -> Reading<f64> {
    let reading = read_f64(raw, 0.0, ZeroPolicy::Keep);
    Reading {
        value: reading.value.clamp(0.0, 100.0),
        fell_back: reading.fell_back,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_int_takes_numeric_prefix() {
        assert_eq!(parse_int("150"), Some(150));
        assert_eq!(parse_int("  150ms"), Some(150));
        assert_eq!(parse_int("-20"), Some(-20));
        assert_eq!(parse_int("12.9"), Some(12));
        assert_eq!(parse_int("abc"), None);
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("-"), None);
    }

    #[test]
    fn parse_float_takes_numeric_prefix() {
        assert_eq!(parse_float("0.3"), Some(0.3));
        assert_eq!(parse_float(".5x"), Some(0.5));
        assert_eq!(parse_float("2."), Some(2.0));
        assert_eq!(parse_float("1e2px"), Some(100.0));
        assert_eq!(parse_float("3e"), Some(3.0));
        assert_eq!(parse_float("-0.25"), Some(-0.25));
        assert_eq!(parse_float("."), None);
        assert_eq!(parse_float("fast"), None);
    }

    #[test]
    fn malformed_duration_falls_back() {
        let r = read_millis(Some("abc"), 2000, ZeroPolicy::UseDefault);
        assert_eq!(r.value, Duration::from_millis(2000));
        assert!(r.fell_back);
    }

    #[test]
    fn zero_policy() {
        let stagger = read_millis(Some("0"), 100, ZeroPolicy::UseDefault);
        assert_eq!(stagger.value, Duration::from_millis(100));
        let delay = read_millis(Some("0"), 0, ZeroPolicy::Keep);
        assert_eq!(delay.value, Duration::ZERO);
        assert!(!delay.fell_back);
    }

    #[test]
    fn missing_attribute_is_not_a_fallback() {
        let r = read_f64(None, 0.5, ZeroPolicy::UseDefault);
        assert_eq!(r, Reading { value: 0.5, fell_back: false });
    }

    #[test]
    fn negative_delay_clamps_to_zero() {
        assert_eq!(
            read_millis(Some("-40"), 0, ZeroPolicy::Keep).value,
            Duration::ZERO
        );
    }

    #[test]
    fn percent_is_clamped() {
        assert_eq!(read_percent(Some("85")).value, 85.0);
        assert_eq!(read_percent(Some("140")).value, 100.0);
        assert_eq!(read_percent(Some("x")).value, 0.0);
        assert!(read_percent(Some("x")).fell_back);
    }
}
