use serde::{Deserialize, Serialize};

/// One syllable as the alias synthesizer sees it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Syllable {
    /// Vowel of the previous syllable; empty at the start of a word.
    pub prev_v: String,
    /// Consonants between the previous vowel and this one.
    pub cc: Vec<String>,
    pub v: String,
    /// Pitch (MIDI note number) of this syllable.
    pub tone: i32,
    /// Pitch of the note carrying the previous vowel.
    pub vowel_tone: i32,
    /// Whether the host allows the previous alias to be held through this syllable.
    #[serde(default)]
    pub can_alias_be_extended: bool,
}

impl Syllable {
    pub fn is_starting(&self) -> bool {
        self.prev_v.is_empty()
    }
}

/// The tail of a word: its last vowel and any consonants after it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Ending {
    pub prev_v: String,
    pub cc: Vec<String>,
    pub tone: i32,
}

/// An alias to play, with its transition length.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhonemeUnit {
    pub alias: String,
    /// Crossfade into this unit, in milliseconds.
    pub transition_ms: f64,
}

/// The full phonemization of one word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordResult {
    pub word: String,
    pub phonemes: Vec<String>,
    pub units: Vec<PhonemeUnit>,
}
