//! The sample inventory side of alias synthesis.
//!
//! The synthesizer only ever asks two questions of a voicebank: does an
//! alias exist at a given pitch, and do two pitches fall in the same
//! subbank. [`AliasSet`] answers them from an `oto.ini` alias list.

use std::collections::HashSet;
use std::ops::RangeInclusive;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Existence queries against a voicebank's samples.
pub trait AliasInventory: Send + Sync {
    /// Whether `alias` can be played at pitch `tone`.
    fn has_alias(&self, alias: &str, tone: i32) -> bool;

    /// Whether two pitches are recorded in the same subbank.
    fn same_subbank(&self, _tone_a: i32, _tone_b: i32) -> bool {
        true
    }
}

impl AliasInventory for HashSet<String> {
    fn has_alias(&self, alias: &str, _tone: i32) -> bool {
        self.contains(alias)
    }
}

/// A pitch range recorded with its own alias prefix/suffix, e.g. `a_C4`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subbank {
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    /// Lowest MIDI note covered.
    pub low: i32,
    /// Highest MIDI note covered.
    pub high: i32,
}

impl Subbank {
    pub fn new(prefix: &str, suffix: &str, tones: RangeInclusive<i32>) -> Self {
        Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            low: *tones.start(),
            high: *tones.end(),
        }
    }

    pub fn covers(&self, tone: i32) -> bool {
        (self.low..=self.high).contains(&tone)
    }

    fn decorate(&self, alias: &str) -> String {
        format!("{}{}{}", self.prefix, alias, self.suffix)
    }
}

/// In-memory alias inventory.
#[derive(Debug, Clone, Default)]
pub struct AliasSet {
    aliases: HashSet<String>,
    subbanks: Vec<Subbank>,
}

impl AliasSet {
    pub fn new<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            aliases: aliases.into_iter().map(Into::into).collect(),
            subbanks: Vec::new(),
        }
    }

    pub fn with_subbanks(mut self, subbanks: Vec<Subbank>) -> Self {
        self.subbanks = subbanks;
        self
    }

    /// Collect aliases from `oto.ini` text.
    ///
    /// Each line is `file.wav=alias,offset,consonant,cutoff,preutter,overlap`;
    /// an empty alias falls back to the file stem.
    pub fn from_oto_ini(text: &str) -> Self {
        let mut aliases = HashSet::new();
        for line in text.lines() {
            let line = line.trim();
            let Some((file, params)) = line.split_once('=') else {
                continue;
            };
            let alias = params.split(',').next().unwrap_or("").trim();
            if !alias.is_empty() {
                aliases.insert(alias.to_string());
            } else if let Some(stem) = Path::new(file.trim()).file_stem() {
                aliases.insert(stem.to_string_lossy().to_string());
            }
        }
        Self {
            aliases,
            subbanks: Vec::new(),
        }
    }

    /// Load one or more `oto.ini` files into a single set.
    pub fn load_oto(paths: &[&Path]) -> Result<Self> {
        let mut set = Self::default();
        for path in paths {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let loaded = Self::from_oto_ini(&text);
            log::info!("Loaded {} aliases from {}", loaded.len(), path.display());
            set.aliases.extend(loaded.aliases);
        }
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    fn subbank_index(&self, tone: i32) -> Option<usize> {
        self.subbanks.iter().position(|s| s.covers(tone))
    }
}

impl AliasInventory for AliasSet {
    fn has_alias(&self, alias: &str, tone: i32) -> bool {
        if let Some(i) = self.subbank_index(tone) {
            if self.aliases.contains(&self.subbanks[i].decorate(alias)) {
                return true;
            }
        }
        self.aliases.contains(alias)
    }

    fn same_subbank(&self, tone_a: i32, tone_b: i32) -> bool {
        self.subbank_index(tone_a) == self.subbank_index(tone_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_oto_ini() {
        let text = "_ca.wav=- ca,100,50,-200,40,10\n\
                    _ca.wav=a t,300,50,-200,40,10\n\
                    t_end.wav=,0,0,0,0,0\n\
                    not an entry\n";
        let set = AliasSet::from_oto_ini(text);
        assert_eq!(set.len(), 3);
        assert!(set.has_alias("- ca", 60));
        assert!(set.has_alias("a t", 60));
        assert!(set.has_alias("t_end", 60));
        assert!(!set.has_alias("ca", 60));
    }

    #[test]
    fn test_subbank_suffix_lookup() {
        let set = AliasSet::new(["- ca_H", "ca"]).with_subbanks(vec![
            Subbank::new("", "", 0..=59),
            Subbank::new("", "_H", 60..=127),
        ]);
        assert!(set.has_alias("- ca", 64));
        assert!(!set.has_alias("- ca", 50));
        // Bare aliases remain usable at any pitch.
        assert!(set.has_alias("ca", 64));
    }

    #[test]
    fn test_same_subbank() {
        let set = AliasSet::new(["a"]).with_subbanks(vec![
            Subbank::new("", "", 0..=59),
            Subbank::new("", "_H", 60..=127),
        ]);
        assert!(set.same_subbank(48, 55));
        assert!(!set.same_subbank(55, 62));
        assert!(AliasSet::new(["a"]).same_subbank(10, 100));
    }

    #[test]
    fn test_load_oto_merges_files() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.ini");
        let b = dir.path().join("b.ini");
        std::fs::write(&a, "x.wav=- a,0,0,0,0,0\n").unwrap();
        std::fs::write(&b, "y.wav=a -,0,0,0,0,0\n").unwrap();
        let set = AliasSet::load_oto(&[a.as_path(), b.as_path()]).unwrap();
        assert_eq!(set.len(), 2);
        assert!(AliasSet::load_oto(&[dir.path().join("missing.ini").as_path()]).is_err());
    }

    #[test]
    fn test_hash_set_inventory() {
        let set: HashSet<String> = ["a -".to_string()].into_iter().collect();
        assert!(set.has_alias("a -", 0));
        assert!(set.same_subbank(0, 127));
    }
}
