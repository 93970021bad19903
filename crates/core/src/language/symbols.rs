//! Grapheme and phoneme symbol tables for the Welsh G2P model.
//!
//! Both tables reserve indices 0..=3 for control symbols; real symbols start
//! at [`RESERVED`]. The two tables are independent: different alphabets and
//! different cardinalities.

use std::collections::HashMap;

pub const PAD: usize = 0;
pub const START: usize = 1;
pub const END: usize = 2;
pub const UNKNOWN: usize = 3;
/// Number of reserved control slots at the start of every table.
pub const RESERVED: usize = 4;

const WELSH_GRAPHEMES: &[&str] = &[
    "-", "a", "b", "c", "ch", "d", "dd", "e", "f", "ff", "g", "h", "i", "l", "ll", "m", "n",
    "ng", "o", "p", "ph", "r", "rh", "s", "t", "th", "u", "w", "y", "â", "ê", "î", "ô", "û",
    "ŵ", "ŷ",
];

const WELSH_PHONEMES: &[&str] = &[
    "a", "A", "Ar", "b", "c", "ch", "d", "dd", "e", "E", "er", "f", "ff", "g", "h", "i", "I",
    "ir", "l", "ll", "m", "n", "ng", "o", "O", "or", "p", "q", "r", "rh", "s", "sh", "t", "th",
    "u", "U", "w", "W", "wr", "y", "Y",
];

lazy_static::lazy_static! {
    static ref GRAPHEMES: SymbolTable = SymbolTable::new(WELSH_GRAPHEMES);
    static ref PHONEMES: SymbolTable = SymbolTable::new(WELSH_PHONEMES);
}

/// The process-wide Welsh grapheme table.
pub fn graphemes() -> &'static SymbolTable {
    &GRAPHEMES
}

/// The process-wide Welsh phoneme table.
pub fn phonemes() -> &'static SymbolTable {
    &PHONEMES
}

/// A bijective mapping between symbol strings and indices.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    symbols: Vec<String>,
    indexes: HashMap<String, usize>,
    /// Longest symbol in chars, bounds the greedy tokenizer window.
    max_chars: usize,
}

impl SymbolTable {
    /// Build a table from real symbols; the first of them gets index [`RESERVED`].
    pub fn new(symbols: &[&str]) -> Self {
        let mut table = Self {
            symbols: Vec::with_capacity(symbols.len()),
            indexes: HashMap::with_capacity(symbols.len()),
            max_chars: 0,
        };
        for &s in symbols {
            if s.is_empty() || table.indexes.contains_key(s) {
                log::warn!("Skipping duplicate or empty symbol {:?}", s);
                continue;
            }
            table.indexes.insert(s.to_string(), table.symbols.len() + RESERVED);
            table.symbols.push(s.to_string());
            table.max_chars = table.max_chars.max(s.chars().count());
        }
        table
    }

    /// Number of slots including the reserved control symbols.
    pub fn len(&self) -> usize {
        self.symbols.len() + RESERVED
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.indexes.get(symbol).copied()
    }

    /// Symbol at `index`, or `None` for control slots and out-of-range indices.
    pub fn symbol(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(RESERVED)
            .and_then(|i| self.symbols.get(i))
            .map(|s| s.as_str())
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.indexes.contains_key(symbol)
    }

    /// Split text into table symbols by greedy longest match.
    ///
    /// Characters that start no known symbol become [`UNKNOWN`].
    pub fn tokenize(&self, text: &str) -> Vec<usize> {
        let chars: Vec<char> = text.chars().collect();
        let mut out = Vec::with_capacity(chars.len());
        let mut i = 0;
        while i < chars.len() {
            let window = self.max_chars.min(chars.len() - i);
            let hit = (1..=window).rev().find_map(|len| {
                let candidate: String = chars[i..i + len].iter().collect();
                self.index_of(&candidate).map(|idx| (idx, len))
            });
            match hit {
                Some((idx, len)) => {
                    out.push(idx);
                    i += len;
                }
                None => {
                    out.push(UNKNOWN);
                    i += 1;
                }
            }
        }
        out
    }

    /// Map symbols to indices; unknown symbols map to [`UNKNOWN`].
    pub fn encode<S: AsRef<str>>(&self, symbols: &[S]) -> Vec<usize> {
        symbols
            .iter()
            .map(|s| self.index_of(s.as_ref()).unwrap_or(UNKNOWN))
            .collect()
    }

    /// Map indices back to symbols, dropping control slots.
    pub fn decode(&self, indices: &[usize]) -> Vec<String> {
        indices
            .iter()
            .filter_map(|&i| self.symbol(i).map(|s| s.to_string()))
            .collect()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_symbols_start_after_reserved() {
        assert_eq!(graphemes().index_of("-"), Some(RESERVED));
        assert_eq!(graphemes().index_of("a"), Some(5));
        assert_eq!(phonemes().index_of("a"), Some(RESERVED));
        assert_eq!(graphemes().symbol(PAD), None);
        assert_eq!(graphemes().symbol(UNKNOWN), None);
    }

    #[test]
    fn test_tables_are_independent() {
        assert_ne!(graphemes().len(), phonemes().len());
        assert!(phonemes().contains("sh"));
        assert!(!graphemes().contains("sh"));
    }

    #[test]
    fn test_encode_decode_identity() {
        for table in [graphemes(), phonemes()] {
            let all: Vec<&str> = table.symbols().collect();
            let encoded = table.encode(&all);
            assert_eq!(table.decode(&encoded), all);
        }
    }

    #[test]
    fn test_tokenize_prefers_digraphs() {
        let g = graphemes();
        let ids = g.tokenize("llanddwyn");
        let back = g.decode(&ids);
        assert_eq!(back, vec!["ll", "a", "n", "dd", "w", "y", "n"]);
    }

    #[test]
    fn test_tokenize_unknown_char() {
        let g = graphemes();
        let ids = g.tokenize("kaz");
        assert_eq!(ids[0], UNKNOWN);
        assert_eq!(ids[1], g.index_of("a").unwrap());
        assert_eq!(ids[2], UNKNOWN);
    }

    #[test]
    fn test_tokenize_accented() {
        let g = graphemes();
        assert_eq!(g.decode(&g.tokenize("tŷ")), vec!["t", "ŷ"]);
    }

    #[test]
    fn test_duplicates_skipped() {
        let t = SymbolTable::new(&["a", "b", "a"]);
        assert_eq!(t.len(), RESERVED + 2);
        assert_eq!(t.index_of("b"), Some(RESERVED + 1));
    }
}
