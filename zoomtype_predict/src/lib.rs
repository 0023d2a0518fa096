// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zoomtype Predict: pluggable weight prediction for box expansion.
//!
//! A [`Predictor`] is the capability a session consults whenever a box's
//! children are first instantiated: given the message accumulated so far,
//! it pushes zero or more [`WeightAssignment`]s through a callback. Any
//! palette code point it does not mention keeps the default weight of 1, so
//! predictors only speak up about the symbols they care about.
//!
//! Implementations are selected at session configuration time; the session
//! never inspects which one it holds. This crate bundles:
//!
//! - [`UniformPredictor`]: says nothing, every symbol stays at weight 1.
//!   Also the fallback the session substitutes when a predictor fails.
//! - [`FrequencyPredictor`]: a fixed rule; boosts capitals at the start of
//!   input and after a full stop, vowels otherwise.
//! - [`RandomPredictor`]: random weights, seedable for deterministic tests.
//! - [`CompletionPredictor`]: boosts the next letter of any word-list
//!   completion of the trailing word.
//!
//! ## Minimal example
//!
//! ```
//! use zoomtype_predict::{FrequencyPredictor, PredictRequest, Predictor};
//!
//! let mut predictor = FrequencyPredictor::default();
//! let code_points: Vec<char> = ('a'..='z').chain('A'..='Z').collect();
//! let mut boosted = Vec::new();
//! predictor
//!     .predict(
//!         PredictRequest { message: &[], text: "", code_points: &code_points, context: None },
//!         &mut |assignment| boosted.push(assignment.code_point),
//!     )
//!     .unwrap();
//! // Start of input: capitals are favoured.
//! assert!(boosted.contains(&'A'));
//! assert!(!boosted.contains(&'e'));
//! ```

mod predictors;
mod request;

pub use predictors::{
    CompletionPredictor, FrequencyPredictor, RandomPredictor, UniformPredictor,
};
pub use request::{PredictError, PredictRequest, Predictor, PredictorContext, WeightAssignment};
