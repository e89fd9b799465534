// Copyright 2026 the Unveil Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registration errors.
//!
//! Only programmer mistakes surface as errors: an out-of-range threshold, an
//! unparsable root margin or selector, or a stale [`RuleHandle`]. Problems in
//! page markup (missing elements, malformed attributes) never do; they fall
//! back to defaults instead.
//!
//! [`RuleHandle`]: crate::rule::RuleHandle

use alloc::string::String;

/// Errors returned when building or registering trigger rules.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// A visibility threshold was outside `0.0..=1.0` or not a number.
    #[error("visibility threshold {0} is outside 0..=1")]
    ThresholdOutOfRange(f64),
    /// A root margin did not parse as one to four pixel insets.
    #[error("invalid root margin `{0}`")]
    InvalidRootMargin(String),
    /// A selector used syntax outside the supported subset.
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector {
        /// The selector text as written.
        selector: String,
        /// What went wrong.
        reason: &'static str,
    },
    /// A rule handle referred to a rule that has been unregistered.
    #[error("rule handle is stale")]
    StaleHandle,
}

/// Shorthand for results carrying an [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;
