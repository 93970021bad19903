//! Welsh phoneme classes used by the segmenter, the alias synthesizer and
//! the transition timing policy.

use std::collections::HashSet;

lazy_static::lazy_static! {
    /// Vowels, including the tone-marked `'` variants.
    pub static ref VOWELS: HashSet<&'static str> = {
        [
            "a", "A", "e", "E", "i", "I", "o", "O", "u", "U", "w", "W", "y", "Y",
            "a'", "A'", "e'", "E'", "i'", "I'", "o'", "O'", "u'", "U'", "w'", "W'", "y'", "Y'",
        ].into_iter().collect()
    };

    pub static ref CONSONANTS: HashSet<&'static str> = {
        [
            "b", "c", "ch", "d", "dd", "f", "ff", "g", "h", "l", "ll", "m", "n", "ng",
            "p", "q", "r", "rh", "s", "sh", "t", "th",
        ].into_iter().collect()
    };

    /// Plosives. A cluster starting with one of these gets no standalone `- C` unit.
    pub static ref HARD_CONSONANTS: HashSet<&'static str> = {
        ["b", "c", "d", "g", "p", "t"].into_iter().collect()
    };

    /// Consonants that need the longest transitions.
    pub static ref LONG_CONSONANTS: HashSet<&'static str> = {
        ["c", "g", "p", "s", "sh", "t"].into_iter().collect()
    };

    /// The tapped r, shortened after a vowel.
    pub static ref SHORT_CONSONANTS: HashSet<&'static str> = {
        ["r"].into_iter().collect()
    };

    static ref MAX_SYMBOL_CHARS: usize = VOWELS
        .iter()
        .chain(CONSONANTS.iter())
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(1);
}

pub fn is_vowel(phoneme: &str) -> bool {
    VOWELS.contains(phoneme)
}

pub fn is_hard(phoneme: &str) -> bool {
    HARD_CONSONANTS.contains(phoneme)
}

/// Split an alias into the phoneme symbols it mentions.
///
/// Spaces and the `-` and `_` markers separate symbols; within a run the
/// longest known symbol wins, and unknown characters are skipped. A `'`
/// that does not complete a tone-marked vowel is dropped.
pub fn alias_symbols(alias: &str) -> Vec<&'static str> {
    let mut out = Vec::new();
    for run in alias.split(|c: char| c.is_whitespace() || c == '-' || c == '_') {
        let chars: Vec<char> = run.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            let window = (*MAX_SYMBOL_CHARS).min(chars.len() - i);
            let hit = (1..=window).rev().find_map(|len| {
                let candidate: String = chars[i..i + len].iter().collect();
                VOWELS
                    .get(candidate.as_str())
                    .or_else(|| CONSONANTS.get(candidate.as_str()))
                    .map(|s| (*s, len))
            });
            match hit {
                Some((symbol, len)) => {
                    out.push(symbol);
                    i += len;
                }
                None => i += 1,
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vowel_consonant_disjoint() {
        assert!(VOWELS.is_disjoint(&CONSONANTS));
        assert!(is_vowel("a'"));
        assert!(CONSONANTS.contains("ll"));
        assert!(!CONSONANTS.contains("a"));
    }

    #[test]
    fn test_class_sets_are_consonants() {
        for set in [&*HARD_CONSONANTS, &*LONG_CONSONANTS, &*SHORT_CONSONANTS] {
            assert!(set.iter().all(|c| CONSONANTS.contains(c)));
        }
    }

    #[test]
    fn test_alias_symbols_markers() {
        assert_eq!(alias_symbols("- ca"), vec!["c", "a"]);
        assert_eq!(alias_symbols("a t"), vec!["a", "t"]);
        assert_eq!(alias_symbols("t -'"), vec!["t"]);
        assert_eq!(alias_symbols("_sta"), vec!["s", "t", "a"]);
    }

    #[test]
    fn test_alias_symbols_longest_match() {
        assert_eq!(alias_symbols("cha"), vec!["ch", "a"]);
        assert_eq!(alias_symbols("a' ll"), vec!["a'", "ll"]);
        assert_eq!(alias_symbols("ngo"), vec!["ng", "o"]);
    }
}
