// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bundled predictor implementations.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::request::{PredictError, PredictRequest, Predictor, WeightAssignment};

/// The do-nothing predictor: every symbol keeps the default weight of 1.
///
/// Also the fallback behaviour when another predictor fails.
#[derive(Copy, Clone, Debug, Default)]
pub struct UniformPredictor;

impl Predictor for UniformPredictor {
    fn predict(
        &mut self,
        _request: PredictRequest<'_>,
        _emit: &mut dyn FnMut(WeightAssignment),
    ) -> Result<(), PredictError> {
        Ok(())
    }
}

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

/// A fixed-rule predictor.
///
/// At the start of input, and after a sentence boundary (full stop then
/// space), capital letters are favoured; everywhere else, vowels are.
#[derive(Copy, Clone, Debug)]
pub struct FrequencyPredictor {
    /// Weight given to vowels mid-sentence.
    pub vowel_weight: f64,
    /// Weight given to capitals at sentence starts.
    pub capital_weight: f64,
}

impl Default for FrequencyPredictor {
    fn default() -> Self {
        Self {
            vowel_weight: 5.0,
            capital_weight: 5.0,
        }
    }
}

impl FrequencyPredictor {
    fn at_sentence_start(message: &[char]) -> bool {
        match message {
            [] => true,
            [.., stop, space] => *stop == '.' && *space == ' ',
            _ => false,
        }
    }
}

impl Predictor for FrequencyPredictor {
    fn predict(
        &mut self,
        request: PredictRequest<'_>,
        emit: &mut dyn FnMut(WeightAssignment),
    ) -> Result<(), PredictError> {
        if Self::at_sentence_start(request.message) {
            // A capital is unchanged by uppercasing but changed by
            // lowercasing; the second test filters out numerals and
            // punctuation.
            for &code_point in request.code_points {
                if code_point.is_uppercase() {
                    emit(WeightAssignment::new(code_point, self.capital_weight));
                }
            }
        } else {
            for &vowel in VOWELS {
                if request.code_points.contains(&vowel) {
                    emit(WeightAssignment::new(vowel, self.vowel_weight));
                }
            }
        }
        Ok(())
    }
}

/// A predictor that assigns every palette symbol a random weight.
///
/// Useful for demonstrations and for exercising layout under shifting
/// weights. Seed it for deterministic behaviour in tests.
#[derive(Clone, Debug)]
pub struct RandomPredictor {
    rng: StdRng,
    low: f64,
    high: f64,
}

impl RandomPredictor {
    /// A predictor drawing weights uniformly from `low..high`.
    #[must_use]
    pub fn new(low: f64, high: f64) -> Self {
        Self::with_rng(StdRng::from_os_rng(), low, high)
    }

    /// A deterministic predictor for tests.
    #[must_use]
    pub fn seeded(seed: u64, low: f64, high: f64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), low, high)
    }

    fn with_rng(rng: StdRng, low: f64, high: f64) -> Self {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        Self { rng, low, high }
    }
}

impl Predictor for RandomPredictor {
    fn predict(
        &mut self,
        request: PredictRequest<'_>,
        emit: &mut dyn FnMut(WeightAssignment),
    ) -> Result<(), PredictError> {
        for &code_point in request.code_points {
            let weight = self.rng.random_range(self.low..=self.high);
            emit(WeightAssignment::new(code_point, weight));
        }
        Ok(())
    }
}

/// A completion-backed predictor over a fixed word list.
///
/// The trailing word of the message (everything after the last
/// non-alphabetic symbol) is matched as a prefix against the word list;
/// the immediate next letter of every completion is boosted.
#[derive(Clone, Debug)]
pub struct CompletionPredictor {
    words: Vec<String>,
    boost: f64,
}

impl CompletionPredictor {
    /// A predictor over `words`, boosting completion letters to `boost`.
    #[must_use]
    pub fn new(words: Vec<String>, boost: f64) -> Self {
        Self { words, boost }
    }

    fn trailing_word(message: &[char]) -> String {
        message
            .iter()
            .rev()
            .take_while(|code_point| code_point.is_alphabetic())
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect()
    }
}

impl Predictor for CompletionPredictor {
    fn predict(
        &mut self,
        request: PredictRequest<'_>,
        emit: &mut dyn FnMut(WeightAssignment),
    ) -> Result<(), PredictError> {
        let prefix = Self::trailing_word(request.message);
        let mut boosted = Vec::new();
        for word in &self.words {
            if word.len() > prefix.len() && word.starts_with(&prefix) {
                if let Some(next) = word[prefix.len()..].chars().next() {
                    if request.code_points.contains(&next) && !boosted.contains(&next) {
                        boosted.push(next);
                        emit(WeightAssignment::new(next, self.boost));
                    }
                }
            }
        }
        Ok(())
    }
}
