//! Transition lengths by phonetic class.

use serde::{Deserialize, Serialize};

use crate::language::phonology::{alias_symbols, HARD_CONSONANTS, LONG_CONSONANTS, SHORT_CONSONANTS, VOWELS};

pub const DEFAULT_TRANSITION_MS: f64 = 30.0;

/// The class that decides an alias's transition multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionClass {
    /// Contains a long consonant.
    Long,
    /// Contains a plosive.
    Hard,
    /// A tapped r right after a vowel.
    ShortTrill,
    Default,
}

impl TransitionClass {
    /// Classify an alias. The first matching class wins.
    pub fn of(alias: &str) -> Self {
        let symbols = alias_symbols(alias);
        if symbols.iter().any(|s| LONG_CONSONANTS.contains(s)) {
            return Self::Long;
        }
        if symbols.iter().any(|s| HARD_CONSONANTS.contains(s)) {
            return Self::Hard;
        }
        let after_vowel = SHORT_CONSONANTS
            .iter()
            .any(|c| VOWELS.iter().any(|v| alias.contains(&format!("{v} {c}"))));
        if after_vowel {
            return Self::ShortTrill;
        }
        Self::Default
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Self::Long => 2.5,
            Self::Hard => 1.3,
            Self::ShortTrill => 0.5,
            Self::Default => 1.0,
        }
    }
}

/// Multiplier applied to the base transition length for `alias`.
pub fn transition_multiplier(alias: &str) -> f64 {
    TransitionClass::of(alias).multiplier()
}

/// Scales a base transition length per alias.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionPolicy {
    pub base_ms: f64,
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self {
            base_ms: DEFAULT_TRANSITION_MS,
        }
    }
}

impl TransitionPolicy {
    pub fn new(base_ms: f64) -> Self {
        Self { base_ms }
    }

    pub fn transition_ms(&self, alias: &str) -> f64 {
        self.base_ms * transition_multiplier(alias)
    }
}
