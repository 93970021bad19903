//! G2P packs: a zip archive holding a pronunciation dictionary (`dict.txt`)
//! and the neural model (`g2p.onnx`).
//!
//! Loading a pack is expensive, so every pack is loaded at most once per
//! process. Loaded packs are kept in a registry keyed by the SHA-256 of the
//! archive bytes and shared, together with their prediction cache, by every
//! engine built from them.

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::{Arc, Mutex};

use crate::cache::{content_hash, PredictionCache};
use crate::error::{Error, Result};

use super::dictionary::{PronunciationDictionary, ReplacementTable};
use super::neural::{G2pModel, ModelLimits, NeuralG2p};

pub const DICT_ENTRY: &str = "dict.txt";
pub const MODEL_ENTRY: &str = "g2p.onnx";

lazy_static::lazy_static! {
    static ref LOADED_PACKS: Mutex<HashMap<String, Arc<G2pPack>>> = Mutex::new(HashMap::new());
}

/// The raw members of a pack archive.
#[derive(Debug, Clone)]
pub struct PackContents {
    pub dictionary: String,
    pub model: Vec<u8>,
}

/// Extract `dict.txt` and `g2p.onnx` from pack bytes.
pub fn read_pack(bytes: &[u8]) -> Result<PackContents> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;

    let mut dictionary = String::new();
    archive
        .by_name(DICT_ENTRY)
        .map_err(|e| Error::Pack(format!("{}: {}", DICT_ENTRY, e)))?
        .read_to_string(&mut dictionary)?;

    let mut model = Vec::new();
    archive
        .by_name(MODEL_ENTRY)
        .map_err(|e| Error::Pack(format!("{}: {}", MODEL_ENTRY, e)))?
        .read_to_end(&mut model)?;

    Ok(PackContents { dictionary, model })
}

/// A loaded pack: dictionary, model session and prediction cache.
pub struct G2pPack {
    hash: String,
    dictionary: Arc<PronunciationDictionary>,
    model: Arc<dyn G2pModel>,
    cache: Arc<PredictionCache>,
}

impl G2pPack {
    pub fn new(hash: &str, dictionary: PronunciationDictionary, model: Arc<dyn G2pModel>) -> Self {
        Self {
            hash: hash.to_string(),
            dictionary: Arc::new(dictionary),
            model,
            cache: Arc::new(PredictionCache::new()),
        }
    }

    /// Build a pack from archive bytes, constructing the model with `factory`.
    pub fn from_bytes<F>(bytes: &[u8], factory: F) -> Result<Self>
    where
        F: FnOnce(&[u8]) -> Result<Arc<dyn G2pModel>>,
    {
        let hash = content_hash(bytes);
        let contents = read_pack(bytes)?;
        // Pack dictionaries are already in Welsh phoneme symbols.
        let dictionary =
            PronunciationDictionary::from_cmudict("pack", &contents.dictionary, &ReplacementTable::default());
        let model = factory(&contents.model)?;
        log::info!(
            "Loaded G2P pack {}... ({} dictionary entries, {} byte model)",
            &hash[..12],
            dictionary.len(),
            contents.model.len()
        );
        Ok(Self::new(&hash, dictionary, model))
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn dictionary(&self) -> Arc<PronunciationDictionary> {
        Arc::clone(&self.dictionary)
    }

    pub fn cache(&self) -> Arc<PredictionCache> {
        Arc::clone(&self.cache)
    }

    /// A neural fallback sharing this pack's model and cache.
    pub fn neural(&self, limits: ModelLimits) -> NeuralG2p {
        NeuralG2p::new(Arc::clone(&self.model), self.cache(), limits)
    }
}

/// Load a pack once per process and share it.
///
/// The registry lock is held across loading, so concurrent first callers
/// for the same pack load it exactly once.
pub fn load_shared<F>(bytes: &[u8], factory: F) -> Result<Arc<G2pPack>>
where
    F: FnOnce(&[u8]) -> Result<Arc<dyn G2pModel>>,
{
    let hash = content_hash(bytes);
    let mut packs = LOADED_PACKS.lock().unwrap_or_else(|e| e.into_inner());
    if let Some(pack) = packs.get(&hash) {
        log::debug!("Reusing loaded G2P pack {}...", &hash[..12]);
        return Ok(Arc::clone(pack));
    }
    let pack = Arc::new(G2pPack::from_bytes(bytes, factory)?);
    packs.insert(hash, Arc::clone(&pack));
    Ok(pack)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::language::neural::tests::ScriptedModel;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub(crate) fn build_pack(dict: &str, model: &[u8]) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            let options = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated);
            zip.start_file(DICT_ENTRY, options).unwrap();
            zip.write_all(dict.as_bytes()).unwrap();
            zip.start_file(MODEL_ENTRY, options).unwrap();
            zip.write_all(model).unwrap();
            zip.finish().unwrap();
        }
        buf.into_inner()
    }

    #[test]
    fn test_read_pack() {
        let bytes = build_pack("bore b o r e\n", b"onnx");
        let contents = read_pack(&bytes).unwrap();
        assert_eq!(contents.dictionary, "bore b o r e\n");
        assert_eq!(contents.model, b"onnx");
    }

    #[test]
    fn test_read_pack_missing_member() {
        let mut buf = Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            zip.start_file(DICT_ENTRY, zip::write::SimpleFileOptions::default()).unwrap();
            zip.write_all(b"nos n o s\n").unwrap();
            zip.finish().unwrap();
        }
        let err = read_pack(&buf.into_inner()).unwrap_err();
        assert!(matches!(err, Error::Pack(ref m) if m.contains(MODEL_ENTRY)));
    }

    #[test]
    fn test_read_pack_not_a_zip() {
        assert!(matches!(read_pack(b"garbage"), Err(Error::Pack(_))));
    }

    #[test]
    fn test_from_bytes_loads_dictionary() {
        let bytes = build_pack("bore b o r e\n", b"onnx");
        let pack = G2pPack::from_bytes(&bytes, |model| {
            assert_eq!(model, b"onnx");
            Ok(Arc::new(ScriptedModel::new(vec!["a"])) as Arc<dyn G2pModel>)
        })
        .unwrap();
        assert_eq!(pack.dictionary().lookup("bore").unwrap(), ["b", "o", "r", "e"]);
        assert_eq!(pack.hash(), content_hash(&bytes));
    }

    #[test]
    fn test_load_shared_loads_once() {
        let bytes = build_pack("shared s h a r e d\n", b"model-once");
        let loads = AtomicUsize::new(0);
        let factory = |_: &[u8]| {
            loads.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(ScriptedModel::new(vec!["a"])) as Arc<dyn G2pModel>)
        };

        let a = load_shared(&bytes, factory).unwrap();
        let b = load_shared(&bytes, factory).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Arc::ptr_eq(&a.cache(), &b.cache()));
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_load_shared_factory_error_not_registered() {
        let bytes = build_pack("broken b r o c e n\n", b"model-broken");
        let result = load_shared(&bytes, |_| Err(Error::Inference("no session".to_string())));
        assert!(result.is_err());

        let retry = load_shared(&bytes, |_| {
            Ok(Arc::new(ScriptedModel::new(vec!["a"])) as Arc<dyn G2pModel>)
        });
        assert!(retry.is_ok());
    }
}
