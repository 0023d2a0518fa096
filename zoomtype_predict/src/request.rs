// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The predictor capability: request and assignment types.

use std::fmt;

/// Opaque token a predictor threads from a parent box to the child box a
/// weight was assigned to.
///
/// The session stores the token against the child and hands it back,
/// untouched, when that child later expands. Predictors that need more than
/// a tag can key their own state off it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PredictorContext(u64);

impl PredictorContext {
    /// Wraps a predictor-defined tag.
    #[must_use]
    pub const fn new(tag: u64) -> Self {
        Self(tag)
    }

    /// The predictor-defined tag.
    #[must_use]
    pub const fn tag(self) -> u64 {
        self.0
    }
}

/// One prediction request: the state of the box being expanded.
#[derive(Copy, Clone, Debug)]
pub struct PredictRequest<'a> {
    /// The message accumulated from the session root to the box.
    pub message: &'a [char],
    /// The same message as text.
    pub text: &'a str,
    /// Every code point in the session's palette.
    pub code_points: &'a [char],
    /// The context token carried from the request that weighted this box,
    /// if any.
    pub context: Option<PredictorContext>,
}

/// One weight assignment produced by a predictor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WeightAssignment {
    /// The code point being weighted.
    pub code_point: char,
    /// Its new weight; palette code points not assigned stay at 1.
    pub weight: f64,
    /// Context to carry into the next request for the weighted symbol's
    /// box.
    pub context: Option<PredictorContext>,
}

impl WeightAssignment {
    /// A plain assignment with no carried context.
    #[must_use]
    pub const fn new(code_point: char, weight: f64) -> Self {
        Self {
            code_point,
            weight,
            context: None,
        }
    }
}

/// Error raised by a failing predictor.
///
/// The session treats this as recoverable: the expansion falls back to
/// uniform weights rather than stalling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PredictError {
    /// What went wrong, for diagnostics.
    pub reason: String,
}

impl PredictError {
    /// A new error with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PredictError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "prediction failed: {}", self.reason)
    }
}

impl std::error::Error for PredictError {}

/// The prediction capability consumed by a session.
///
/// Implementations must tolerate an empty message (start of session) and
/// repeated calls; the session invokes a predictor once per expansion of a
/// box, and again if that box is erased and later re-expands.
pub trait Predictor {
    /// Produces weight assignments for the children of the box described by
    /// `request`, pushing each through `emit`.
    ///
    /// ## Errors
    ///
    /// - [`PredictError`] on failure; the session falls back to uniform
    ///   weights for this expansion.
    fn predict(
        &mut self,
        request: PredictRequest<'_>,
        emit: &mut dyn FnMut(WeightAssignment),
    ) -> Result<(), PredictError>;
}
