//! Split a word's phonemes into syllables and a word-final ending.
//!
//! Every consonant before a vowel joins that vowel's cluster; consonants
//! after the last vowel form the ending.

use crate::types::{Ending, Syllable};

use super::phonology::is_vowel;

/// Segment one word sung on a single pitch.
///
/// Returns no syllables and no ending for a word without vowels.
pub fn segment_word(phonemes: &[String], tone: i32) -> (Vec<Syllable>, Option<Ending>) {
    let mut syllables = Vec::new();
    let mut prev_v = String::new();
    let mut cc: Vec<String> = Vec::new();

    for phoneme in phonemes {
        if is_vowel(phoneme) {
            syllables.push(Syllable {
                prev_v: std::mem::replace(&mut prev_v, phoneme.clone()),
                cc: std::mem::take(&mut cc),
                v: phoneme.clone(),
                tone,
                vowel_tone: tone,
                can_alias_be_extended: false,
            });
        } else {
            cc.push(phoneme.clone());
        }
    }

    if syllables.is_empty() {
        if !cc.is_empty() {
            log::debug!("No vowel in {:?}, nothing to sing", cc);
        }
        return (syllables, None);
    }

    let ending = Ending { prev_v, cc, tone };
    (syllables, Some(ending))
}
