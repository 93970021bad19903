//! G2P resolution: an ordered chain of pronunciation sources.
//!
//! Every source (exact-match dictionaries, the neural fallback) implements
//! [`G2p`]. [`G2pFallbacks`] asks them in priority order and returns the first
//! non-empty answer, so callers only ever see `resolve(word)`.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::error;

use super::dictionary::{ensure_user_dictionary, PronunciationDictionary, ReplacementTable};
use super::dictionary::USER_DICTIONARY_NAME;
use super::neural::ModelLimits;
use super::pack::G2pPack;

/// A source of pronunciations.
pub trait G2p: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// Pronunciation of `word`, or `None` if this source has no entry.
    fn query(&self, word: &str) -> error::Result<Option<Vec<String>>>;
}

/// Pronunciation sources tried in priority order; first hit wins.
#[derive(Clone, Default)]
pub struct G2pFallbacks {
    sources: Vec<Arc<dyn G2p>>,
}

impl G2pFallbacks {
    pub fn new(sources: Vec<Arc<dyn G2p>>) -> Self {
        Self { sources }
    }

    /// Append a source with lower priority than all existing ones.
    pub fn push(&mut self, source: Arc<dyn G2p>) {
        self.sources.push(source);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Resolve a word to phonemes.
    ///
    /// Empty answers count as misses. A word no source knows resolves to an
    /// empty sequence; a failing source aborts the call.
    pub fn resolve(&self, word: &str) -> error::Result<Vec<String>> {
        for source in &self.sources {
            if let Some(phonemes) = source.query(word)? {
                if !phonemes.is_empty() {
                    log::debug!("{} -> {:?} ({})", word, phonemes, source.name());
                    return Ok(phonemes);
                }
            }
        }
        Ok(Vec::new())
    }
}

impl G2p for G2pFallbacks {
    fn name(&self) -> &str {
        "fallbacks"
    }

    fn query(&self, word: &str) -> error::Result<Option<Vec<String>>> {
        let phonemes = self.resolve(word)?;
        Ok(if phonemes.is_empty() { None } else { Some(phonemes) })
    }
}

/// Build the Welsh source chain.
///
/// Order: the voicebank's `arpasing.yaml`, the user's `arpasing.yaml` in
/// `data_dir` (created from the template when missing), the pack
/// dictionary, then the pack's neural model. Dictionaries that fail to load
/// are dropped from the chain.
pub fn build_welsh_chain(
    voicebank_dir: Option<&Path>,
    data_dir: &Path,
    pack: &G2pPack,
    limits: ModelLimits,
) -> Result<G2pFallbacks> {
    let replacements = ReplacementTable::welsh();
    let mut chain = G2pFallbacks::default();

    if let Some(dir) = voicebank_dir {
        let path = dir.join(USER_DICTIONARY_NAME);
        if let Some(dict) = PronunciationDictionary::load_optional(&path, &replacements) {
            chain.push(Arc::new(dict));
        }
    }

    let user_path = ensure_user_dictionary(data_dir)
        .with_context(|| format!("Failed to prepare data directory {}", data_dir.display()))?;
    if let Some(dict) = PronunciationDictionary::load_optional(&user_path, &replacements) {
        chain.push(Arc::new(dict));
    }

    chain.push(pack.dictionary());
    chain.push(Arc::new(pack.neural(limits)));

    log::info!("G2P chain: {}", chain.source_names().join(" -> "));
    Ok(chain)
}
