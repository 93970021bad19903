//! Neural G2P fallback for words no dictionary knows.
//!
//! The model itself is opaque: it takes a fixed-length row of grapheme
//! indices and returns one row of phoneme scores per output position. This
//! module owns the encode/decode contract around it and memoizes every
//! prediction, so a word always resolves to the same phonemes within a
//! process.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cache::PredictionCache;
use crate::error::Result;

use super::dictionary::normalize_word;
use super::g2p::G2p;
use super::symbols::{self, SymbolTable, END, PAD, RESERVED};

pub const DEFAULT_INPUT_LEN: usize = 32;
pub const DEFAULT_MAX_OUTPUT_LEN: usize = 32;

/// A grapheme-to-phoneme sequence model.
pub trait G2pModel: Send + Sync {
    /// Score every phoneme index at every output position.
    ///
    /// `graphemes` is already padded to the model's input length.
    fn infer(&self, graphemes: &[i64]) -> Result<Vec<Vec<f32>>>;
}

/// Input and output lengths for the model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelLimits {
    pub input_len: usize,
    pub max_output_len: usize,
}

impl Default for ModelLimits {
    fn default() -> Self {
        Self {
            input_len: DEFAULT_INPUT_LEN,
            max_output_len: DEFAULT_MAX_OUTPUT_LEN,
        }
    }
}

/// Encode a word as grapheme indices followed by the end symbol.
///
/// The row is truncated to `input_len` (the end symbol always survives) and
/// padded with [`PAD`].
pub fn encode_word(word: &str, table: &SymbolTable, input_len: usize) -> Vec<i64> {
    if input_len == 0 {
        return Vec::new();
    }
    let mut ids = table.tokenize(word);
    ids.truncate(input_len - 1);
    ids.push(END);
    ids.resize(input_len, PAD);
    ids.into_iter().map(|i| i as i64).collect()
}

/// Index of the highest score; the first one wins ties.
fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &s) in scores.iter().enumerate() {
        if s.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if s <= b => {}
            _ => best = Some((i, s)),
        }
    }
    best.map(|(i, _)| i)
}

/// Greedy decode of per-position scores into phoneme symbols.
///
/// Stops at the end symbol or after `max_len` positions. Other control
/// symbols are skipped.
pub fn decode_scores(scores: &[Vec<f32>], table: &SymbolTable, max_len: usize) -> Vec<String> {
    let mut out = Vec::new();
    for row in scores.iter().take(max_len) {
        let Some(idx) = argmax(row) else {
            continue;
        };
        if idx == END {
            break;
        }
        if idx < RESERVED {
            continue;
        }
        if let Some(symbol) = table.symbol(idx) {
            out.push(symbol.to_string());
        }
    }
    out
}

/// Memoizing wrapper around a [`G2pModel`].
#[derive(Clone)]
pub struct NeuralG2p {
    model: Arc<dyn G2pModel>,
    cache: Arc<PredictionCache>,
    limits: ModelLimits,
}

impl NeuralG2p {
    pub fn new(model: Arc<dyn G2pModel>, cache: Arc<PredictionCache>, limits: ModelLimits) -> Self {
        Self {
            model,
            cache,
            limits,
        }
    }

    /// Predict phonemes for a word, consulting the cache first.
    pub fn predict(&self, word: &str) -> Result<Vec<String>> {
        let key = normalize_word(word);
        if key.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(hit) = self.cache.get(&key) {
            log::debug!("Prediction cache hit: {}", key);
            return Ok(hit);
        }

        let input = encode_word(&key, symbols::graphemes(), self.limits.input_len);
        let scores = self.model.infer(&input)?;
        let phonemes = decode_scores(&scores, symbols::phonemes(), self.limits.max_output_len);
        log::debug!("Predicted {} -> {:?}", key, phonemes);

        self.cache.insert(key, phonemes.clone());
        Ok(phonemes)
    }
}

impl G2p for NeuralG2p {
    fn name(&self) -> &str {
        "neural"
    }

    fn query(&self, word: &str) -> Result<Option<Vec<String>>> {
        self.predict(word).map(Some)
    }
}
