//! Welsh CVVC phonemizer core: grapheme-to-phoneme resolution and
//! syllable-to-alias synthesis for concatenative singing voicebanks.

pub mod cache;
pub mod config;
pub mod error;
pub mod language;
pub mod phonemizer;
pub mod types;
pub mod voicebank;

pub use error::{Error, Result};
pub use phonemizer::Phonemizer;
