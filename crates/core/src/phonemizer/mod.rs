//! Word → alias phonemization for Welsh CVVC voicebanks.
//!
//! [`Phonemizer`] ties the pieces together: G2P resolution, segmentation
//! into syllables and an ending, alias synthesis against the voicebank, and
//! transition timing.

pub mod synthesize;
pub mod timing;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::PhonemizerConfig;
use crate::error;
use crate::language::g2p::{build_welsh_chain, G2pFallbacks};
use crate::language::neural::G2pModel;
use crate::language::pack;
use crate::language::segment::segment_word;
use crate::types::{Ending, PhonemeUnit, Syllable, WordResult};
use crate::voicebank::AliasInventory;

use self::synthesize::AliasSynthesizer;
use self::timing::TransitionPolicy;

pub struct Phonemizer {
    g2p: G2pFallbacks,
    inventory: Arc<dyn AliasInventory>,
    timing: TransitionPolicy,
}

impl Phonemizer {
    pub fn new(g2p: G2pFallbacks, inventory: Arc<dyn AliasInventory>, timing: TransitionPolicy) -> Self {
        Self {
            g2p,
            inventory,
            timing,
        }
    }

    /// Build a phonemizer from config, loading the G2P pack with `factory`.
    ///
    /// The pack is loaded once per process and shared.
    pub fn with_model_factory<F>(
        config: &PhonemizerConfig,
        inventory: Arc<dyn AliasInventory>,
        factory: F,
    ) -> Result<Self>
    where
        F: FnOnce(&[u8]) -> error::Result<Arc<dyn G2pModel>>,
    {
        config.validate()?;
        let pack_path = config.pack_path();
        let bytes = std::fs::read(&pack_path)
            .with_context(|| format!("Failed to read G2P pack {}", pack_path.display()))?;
        let pack = pack::load_shared(&bytes, factory)
            .with_context(|| format!("Failed to load G2P pack {}", pack_path.display()))?;
        let g2p = build_welsh_chain(
            config.voicebank_dir.as_deref(),
            &config.data_dir,
            &pack,
            config.model,
        )?;
        Ok(Self::new(g2p, inventory, TransitionPolicy::new(config.transition_ms)))
    }

    /// Build a phonemizer from config with the ONNX Runtime model backend.
    #[cfg(feature = "onnx")]
    pub fn from_config(config: &PhonemizerConfig, inventory: Arc<dyn AliasInventory>) -> Result<Self> {
        Self::with_model_factory(config, inventory, crate::language::onnx::OnnxG2pModel::factory)
    }

    /// Without the `onnx` feature there is no model backend to load.
    #[cfg(not(feature = "onnx"))]
    pub fn from_config(config: &PhonemizerConfig, inventory: Arc<dyn AliasInventory>) -> Result<Self> {
        Self::with_model_factory(config, inventory, |_| {
            Err(error::Error::Config(
                "built without the `onnx` feature; no G2P model backend".to_string(),
            ))
        })
    }

    pub fn resolve(&self, word: &str) -> error::Result<Vec<String>> {
        self.g2p.resolve(word)
    }

    pub fn synthesize(&self, syllable: &Syllable) -> Vec<String> {
        AliasSynthesizer::new(self.inventory.as_ref()).synthesize(syllable)
    }

    pub fn synthesize_ending(&self, ending: &Ending) -> Vec<String> {
        AliasSynthesizer::new(self.inventory.as_ref()).synthesize_ending(ending)
    }

    pub fn transition_multiplier(&self, alias: &str) -> f64 {
        timing::transition_multiplier(alias)
    }

    /// Phonemize one word sung at `tone`.
    pub fn phonemize_word(&self, word: &str, tone: i32) -> error::Result<WordResult> {
        let phonemes = self.resolve(word)?;
        let (syllables, ending) = segment_word(&phonemes, tone);

        let synth = AliasSynthesizer::new(self.inventory.as_ref());
        let mut aliases: Vec<String> = syllables.iter().flat_map(|s| synth.synthesize(s)).collect();
        if let Some(ending) = &ending {
            aliases.extend(synth.synthesize_ending(ending));
        }

        let units = aliases
            .into_iter()
            .map(|alias| PhonemeUnit {
                transition_ms: self.timing.transition_ms(&alias),
                alias,
            })
            .collect();

        Ok(WordResult {
            word: word.to_string(),
            phonemes,
            units,
        })
    }

    /// Phonemize every whitespace-separated word of a lyric line.
    pub fn phonemize_line(&self, line: &str, tone: i32) -> error::Result<Vec<WordResult>> {
        line.split_whitespace()
            .map(|word| self.phonemize_word(word, tone))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::PredictionCache;
    use crate::language::dictionary::{PronunciationDictionary, ReplacementTable};
    use crate::language::g2p::G2p;
    use crate::language::neural::tests::ScriptedModel;
    use crate::language::neural::{ModelLimits, NeuralG2p};
    use crate::language::pack::tests::build_pack;
    use crate::voicebank::AliasSet;
    use std::sync::atomic::Ordering;

    fn phonemizer(model: Arc<ScriptedModel>, aliases: &[&str]) -> Phonemizer {
        let dict = PronunciationDictionary::from_cmudict(
            "test",
            "cath c a th\nnant n a n t\n",
            &ReplacementTable::default(),
        );
        let neural = NeuralG2p::new(model, Arc::new(PredictionCache::new()), ModelLimits::default());
        let sources: Vec<Arc<dyn G2p>> = vec![Arc::new(dict), Arc::new(neural)];
        let g2p = G2pFallbacks::new(sources);
        let inventory = Arc::new(AliasSet::new(aliases.iter().copied()));
        Phonemizer::new(g2p, inventory, TransitionPolicy::default())
    }

    #[test]
    fn test_dictionary_word_bypasses_model() {
        let model = Arc::new(ScriptedModel::new(vec!["x"]));
        let p = phonemizer(model.clone(), &[]);
        assert_eq!(p.resolve("Cath").unwrap(), vec!["c", "a", "th"]);
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unknown_word_predicted_once() {
        let model = Arc::new(ScriptedModel::new(vec!["b", "o", "r", "e"]));
        let p = phonemizer(model.clone(), &[]);
        let first = p.resolve("bore").unwrap();
        let second = p.resolve("bore").unwrap();
        assert_eq!(first, vec!["b", "o", "r", "e"]);
        assert_eq!(first, second);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_phonemize_word_cath() {
        let model = Arc::new(ScriptedModel::new(vec![]));
        let p = phonemizer(model, &["- ca", "a th", "th -'"]);
        let result = p.phonemize_word("cath", 60).unwrap();
        let aliases: Vec<&str> = result.units.iter().map(|u| u.alias.as_str()).collect();
        assert_eq!(aliases, vec!["- ca", "a th", "th -'"]);
        // "- ca" contains c, a long consonant.
        assert!((result.units[0].transition_ms - 75.0).abs() < 1e-9);
        assert!((result.units[1].transition_ms - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_phonemize_word_cluster_ending() {
        let model = Arc::new(ScriptedModel::new(vec![]));
        let p = phonemizer(model, &["- na", "nt -"]);
        let result = p.phonemize_word("nant", 60).unwrap();
        let aliases: Vec<&str> = result.units.iter().map(|u| u.alias.as_str()).collect();
        assert_eq!(aliases, vec!["- na", "a n", "nt -"]);
    }

    #[test]
    fn test_phonemize_line() {
        let model = Arc::new(ScriptedModel::new(vec!["i"]));
        let p = phonemizer(model, &[]);
        let results = p.phonemize_line("cath  nant\t", 60).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].word, "nant");
    }

    #[test]
    fn test_with_model_factory_builds_chain() {
        let dir = tempfile::tempdir().unwrap();
        let pack_path = dir.path().join("pack.zip");
        std::fs::write(&pack_path, build_pack("dydd d y dd\n", b"factory-chain-model")).unwrap();

        let voicebank = dir.path().join("voicebank");
        std::fs::create_dir_all(&voicebank).unwrap();
        std::fs::write(
            voicebank.join("arpasing.yaml"),
            "entries:\n  - grapheme: dydd\n    phonemes: [d, ih, dh]\n",
        )
        .unwrap();

        let config = PhonemizerConfig {
            data_dir: dir.path().join("data"),
            voicebank_dir: Some(voicebank),
            pack_path: Some(pack_path),
            ..Default::default()
        };
        let p = Phonemizer::with_model_factory(&config, Arc::new(AliasSet::default()), |_| {
            Ok(Arc::new(ScriptedModel::new(vec!["a"])) as Arc<dyn G2pModel>)
        })
        .unwrap();

        // Voicebank dictionary wins over the pack dictionary.
        assert_eq!(p.resolve("dydd").unwrap(), vec!["d", "i", "dd"]);
        // Template dictionary was installed in the data dir.
        assert!(config.data_dir.join("arpasing.yaml").exists());
        assert_eq!(p.resolve("cymraeg").unwrap(), vec!["c", "U", "m", "r", "a", "g"]);
    }

    #[test]
    fn test_with_model_factory_missing_pack() {
        let dir = tempfile::tempdir().unwrap();
        let config = PhonemizerConfig {
            data_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let result = Phonemizer::with_model_factory(&config, Arc::new(AliasSet::default()), |_| {
            Ok(Arc::new(ScriptedModel::new(vec![])) as Arc<dyn G2pModel>)
        });
        assert!(result.is_err());
    }
}
