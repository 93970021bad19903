//! Exact-match pronunciation dictionaries.
//!
//! Two on-disk formats are understood: CMUdict-style text (`WORD  PH PH ...`)
//! as shipped inside G2P packs, and OpenUtau-style YAML (`entries:` with
//! `grapheme` / `phonemes`) as found in voicebank folders. Each dictionary
//! translates foreign phoneme spellings through its [`ReplacementTable`] once,
//! at load time.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cache::atomic_write;

use super::g2p::G2p;

/// ARPAbet → Welsh phoneme spellings applied to user dictionaries.
pub const DEFAULT_REPLACEMENTS: &str = "aa=A;aar=Ar;ae=a;ah=U;ao=o;aor=or;eh=e;ehr=er;ey=E;\
ih=i;ihr=ir;iy=I;ow=O;uh=w;uhr=wr;uw=W;dh=dd;f=ff;hh=h;k=c;rr=r;v=f;x=ch;";

/// File name of the user and voicebank dictionaries.
pub const USER_DICTIONARY_NAME: &str = "arpasing.yaml";

const TEMPLATE: &str = include_str!("arpasing_template.yaml");

/// Phoneme spelling substitutions, identity rules removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplacementTable {
    rules: HashMap<String, String>,
}

impl ReplacementTable {
    /// Parse `from=to;from=to;...`. Malformed and identity rules are dropped.
    pub fn parse(text: &str) -> Self {
        let rules = text
            .split(';')
            .filter_map(|entry| entry.split_once('='))
            .map(|(from, to)| (from.trim(), to.trim()))
            .filter(|(from, to)| !from.is_empty() && !to.is_empty() && from != to)
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();
        Self { rules }
    }

    pub fn welsh() -> Self {
        Self::parse(DEFAULT_REPLACEMENTS)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn apply(&self, phoneme: &str) -> String {
        self.rules
            .get(phoneme)
            .cloned()
            .unwrap_or_else(|| phoneme.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct YamlDictionary {
    #[serde(default)]
    entries: Vec<YamlEntry>,
}

#[derive(Debug, Deserialize)]
struct YamlEntry {
    grapheme: String,
    #[serde(default)]
    phonemes: Vec<String>,
}

/// Normalize a word for dictionary and cache keys.
pub fn normalize_word(word: &str) -> String {
    word.trim().to_lowercase()
}

/// A word → phoneme sequence table, immutable after load.
#[derive(Debug, Clone, Default)]
pub struct PronunciationDictionary {
    name: String,
    entries: HashMap<String, Vec<String>>,
}

impl PronunciationDictionary {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            entries: HashMap::new(),
        }
    }

    /// Insert an entry, translating phonemes. Later duplicates of a word are ignored.
    pub fn insert(&mut self, word: &str, phonemes: &[String], replacements: &ReplacementTable) {
        let key = normalize_word(word);
        if key.is_empty() || phonemes.is_empty() {
            return;
        }
        self.entries
            .entry(key)
            .or_insert_with(|| phonemes.iter().map(|p| replacements.apply(p)).collect());
    }

    /// Parse CMUdict-style text.
    ///
    /// Lines starting with `;;;` are comments; `WORD(2)` variants collapse
    /// onto `WORD` and only the first pronunciation is kept.
    pub fn from_cmudict(name: &str, text: &str, replacements: &ReplacementTable) -> Self {
        let mut dict = Self::new(name);
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(";;;") {
                continue;
            }
            let mut parts = line.split_whitespace();
            let Some(word_raw) = parts.next() else {
                continue;
            };
            let word = word_raw.split('(').next().unwrap_or(word_raw);
            let phonemes: Vec<String> = parts.map(|s| s.to_string()).collect();
            dict.insert(word, &phonemes, replacements);
        }
        dict
    }

    /// Parse an OpenUtau-style YAML dictionary.
    pub fn from_yaml(
        name: &str,
        text: &str,
        replacements: &ReplacementTable,
    ) -> crate::error::Result<Self> {
        let parsed: YamlDictionary = serde_yaml::from_str(text)?;
        let mut dict = Self::new(name);
        for entry in parsed.entries {
            dict.insert(&entry.grapheme, &entry.phonemes, replacements);
        }
        Ok(dict)
    }

    /// Load a dictionary file, picking the format from the extension.
    pub fn load(path: &Path, replacements: &ReplacementTable) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dictionary {}", path.display()))?;
        let name = path.display().to_string();
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );
        let dict = if is_yaml {
            Self::from_yaml(&name, &text, replacements)
                .with_context(|| format!("Failed to parse dictionary {}", path.display()))?
        } else {
            Self::from_cmudict(&name, &text, replacements)
        };
        log::info!("Loaded {} entries from {}", dict.len(), path.display());
        Ok(dict)
    }

    /// Load a dictionary, treating any failure as "absent".
    ///
    /// Missing files are skipped quietly; unreadable or malformed ones are
    /// reported and skipped.
    pub fn load_optional(path: &Path, replacements: &ReplacementTable) -> Option<Self> {
        if !path.exists() {
            log::debug!("No dictionary at {}", path.display());
            return None;
        }
        match Self::load(path, replacements) {
            Ok(dict) => Some(dict),
            Err(e) => {
                log::error!("{:#}", e);
                None
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, word: &str) -> Option<&[String]> {
        self.entries.get(&normalize_word(word)).map(|p| p.as_slice())
    }
}

impl G2p for PronunciationDictionary {
    fn name(&self) -> &str {
        &self.name
    }

    fn query(&self, word: &str) -> crate::error::Result<Option<Vec<String>>> {
        Ok(self.lookup(word).map(|p| p.to_vec()))
    }
}

/// Make sure the user dictionary exists in `dir`, writing the template if not.
pub fn ensure_user_dictionary(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(USER_DICTIONARY_NAME);
    if !path.exists() {
        atomic_write(&path, TEMPLATE.as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Created dictionary template at {}", path.display());
    }
    Ok(path)
}
