//! Caching primitives shared by the G2P engine.
//!
//! Holds the in-memory prediction cache for neural G2P results, SHA-256
//! content hashing used to key loaded model artifacts, and atomic file
//! writes for the data directory.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use anyhow::Result;
use sha2::{Digest, Sha256};

/// Compute SHA-256 of a byte slice as a 64-character hex string.
pub fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Atomically write data to a file via temp file + rename.
pub fn atomic_write(target: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = target.with_extension("tmp");
    std::fs::write(&tmp_path, data)?;
    std::fs::rename(&tmp_path, target)?;
    Ok(())
}

/// Memoized neural G2P predictions, keyed by normalized word.
///
/// Entries are never evicted. Concurrent readers never block each other;
/// two simultaneous misses on the same word may both compute, and the last
/// write wins with an identical value.
#[derive(Debug, Default)]
pub struct PredictionCache {
    entries: RwLock<HashMap<String, Vec<String>>>,
}

impl PredictionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Vec<String>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    pub fn insert(&self, key: String, phonemes: Vec<String>) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, phonemes);
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_content_hash_deterministic() {
        let h1 = content_hash(b"hello world");
        let h2 = content_hash(b"hello world");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 64);
        assert_ne!(h1, content_hash(b"hello"));
    }

    #[test]
    fn test_atomic_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("arpasing.yaml");

        atomic_write(&path, b"entries: []").unwrap();
        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "entries: []");
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn test_prediction_cache_roundtrip() {
        let cache = PredictionCache::new();
        assert!(cache.get("cath").is_none());
        cache.insert("cath".to_string(), vec!["c".into(), "a".into(), "th".into()]);
        assert_eq!(cache.get("cath").unwrap(), vec!["c", "a", "th"]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_prediction_cache_concurrent_readers() {
        let cache = Arc::new(PredictionCache::new());
        cache.insert("ci".to_string(), vec!["c".into(), "i".into()]);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    cache.insert(format!("word{}", i), vec!["a".into()]);
                    cache.get("ci")
                })
            })
            .collect();

        for h in handles {
            assert_eq!(h.join().unwrap().unwrap(), vec!["c", "i"]);
        }
        assert_eq!(cache.len(), 9);
    }
}
