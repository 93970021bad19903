//! Phonemizer configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.
//! The data directory comes from `CYMRAEG_DATA_DIR` when set, otherwise
//! `~/.local/share/cymraeg`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::language::neural::ModelLimits;
use crate::phonemizer::timing::DEFAULT_TRANSITION_MS;
use crate::voicebank::Subbank;

/// Default G2P pack file name inside the data directory.
pub const PACK_NAME: &str = "g2p-cym.zip";

/// Get the data directory.
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CYMRAEG_DATA_DIR") {
        return PathBuf::from(dir);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".local").join("share").join("cymraeg")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhonemizerConfig {
    /// Holds the user dictionary and, by default, the G2P pack.
    pub data_dir: PathBuf,
    /// Voicebank folder; its `arpasing.yaml` takes priority over all others.
    pub voicebank_dir: Option<PathBuf>,
    /// G2P pack archive; defaults to `<data_dir>/g2p-cym.zip`.
    pub pack_path: Option<PathBuf>,
    /// Base transition length in milliseconds.
    pub transition_ms: f64,
    pub model: ModelLimits,
    pub subbanks: Vec<Subbank>,
}

impl Default for PhonemizerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            voicebank_dir: None,
            pack_path: None,
            transition_ms: DEFAULT_TRANSITION_MS,
            model: ModelLimits::default(),
            subbanks: Vec::new(),
        }
    }
}

impl PhonemizerConfig {
    /// Load a JSON config file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn pack_path(&self) -> PathBuf {
        self.pack_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(PACK_NAME))
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.transition_ms.is_finite() && self.transition_ms > 0.0) {
            return Err(Error::Config(format!(
                "transition_ms must be positive, got {}",
                self.transition_ms
            )));
        }
        if self.model.input_len < 2 {
            return Err(Error::Config(
                "model.input_len must leave room for the end symbol".to_string(),
            ));
        }
        if self.model.max_output_len == 0 {
            return Err(Error::Config("model.max_output_len must be at least 1".to_string()));
        }
        if let Some(s) = self.subbanks.iter().find(|s| s.low > s.high) {
            return Err(Error::Config(format!(
                "subbank {:?}/{:?} has an empty tone range {}..={}",
                s.prefix, s.suffix, s.low, s.high
            )));
        }
        Ok(())
    }
}
