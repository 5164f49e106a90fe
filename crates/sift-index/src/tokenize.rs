//! Tokenizer chain.
//!
//! Tokenizers transform a token list into another token list; the first
//! one in a chain receives the whole (normalized) input as a single
//! token. Chaining a splitter with expanders gives the usual index-time
//! variants:
//!
//! ```rust
//! use sift_index::tokenize::{self, Tokenizer, Whitespace, LeftEdge, Unique};
//!
//! let chain: Vec<Box<dyn Tokenizer>> =
//!     vec![Box::new(Whitespace), Box::new(LeftEdge::new(2)), Box::new(Unique)];
//! assert_eq!(
//!     tokenize::tokenize("hello he", &chain),
//!     vec!["he", "hel", "hell", "hello"]
//! );
//! ```

/// A single tokenization step, token list in, token list out.
pub trait Tokenizer {
    fn apply(&self, tokens: Vec<String>) -> Vec<String>;
}

/// Run `input` through `chain` front to back. An empty chain produces no
/// tokens.
pub fn tokenize(input: &str, chain: &[Box<dyn Tokenizer>]) -> Vec<String> {
    if chain.is_empty() {
        return Vec::new();
    }
    let mut tokens = vec![input.to_string()];
    for t in chain {
        tokens = t.apply(tokens);
    }
    tokens
}

/// Splits on whitespace.
pub struct Whitespace;

impl Tokenizer for Whitespace {
    fn apply(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .iter()
            .flat_map(|t| t.split_whitespace())
            .map(str::to_string)
            .collect()
    }
}

/// Expands each token into its prefixes of length `min` and up, the
/// classic edge n-gram used for autocomplete ("hello" with `min` 1 gives
/// "h", "he", "hel", "hell", "hello").
pub struct LeftEdge {
    min: usize,
}

impl LeftEdge {
    pub fn new(min: usize) -> Self {
        LeftEdge { min: min.max(1) }
    }
}

impl Tokenizer for LeftEdge {
    fn apply(&self, tokens: Vec<String>) -> Vec<String> {
        let mut out = Vec::new();
        for t in tokens {
            let chars: Vec<char> = t.chars().collect();
            if chars.len() < self.min {
                out.push(t);
                continue;
            }
            for end in self.min..=chars.len() {
                out.push(chars[..end].iter().collect());
            }
        }
        out
    }
}

/// Expands each token into its character n-grams of a fixed size; tokens
/// shorter than the window pass through unchanged.
pub struct CharNgram {
    size: usize,
}

impl CharNgram {
    pub fn new(size: usize) -> Self {
        CharNgram { size: size.max(1) }
    }
}

impl Tokenizer for CharNgram {
    fn apply(&self, tokens: Vec<String>) -> Vec<String> {
        let mut out = Vec::new();
        for t in tokens {
            let chars: Vec<char> = t.chars().collect();
            if chars.len() < self.size {
                out.push(t);
                continue;
            }
            for window in chars.windows(self.size) {
                out.push(window.iter().collect());
            }
        }
        out
    }
}

/// Drops duplicate tokens, keeping first occurrences in order.
pub struct Unique;

impl Tokenizer for Unique {
    fn apply(&self, tokens: Vec<String>) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        tokens.into_iter().filter(|t| seen.insert(t.clone())).collect()
    }
}

/// Pads the first token with a leading marker and the last with a
/// trailing one, so edge n-grams can tell word boundaries apart.
pub struct Surround {
    pad: String,
}

impl Surround {
    pub fn new(pad: &str) -> Self {
        Surround {
            pad: pad.to_string(),
        }
    }
}

impl Tokenizer for Surround {
    fn apply(&self, mut tokens: Vec<String>) -> Vec<String> {
        if tokens.is_empty() {
            return tokens;
        }
        tokens[0] = format!("{}{}", self.pad, tokens[0]);
        let last = tokens.len() - 1;
        tokens[last] = format!("{}{}", tokens[last], self.pad);
        tokens
    }
}

/// Passes tokens through unchanged.
pub struct Noop;

impl Tokenizer for Noop {
    fn apply(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
    }
}

/// Replaces each token with its 4-character soundex code, so similarly
/// pronounced words collide ("robert" and "rupert" both encode to R163).
pub struct Soundex;

const SOUNDEX_EMPTY: &str = "0000";

/// Classic soundex: keep the first letter, encode the rest by consonant
/// class, skip repeats, pad with zeros to 4 characters.
pub fn encode_soundex(word: &str) -> String {
    fn class_of(c: char) -> Option<char> {
        match c {
            'B' | 'F' | 'P' | 'V' => Some('1'),
            'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' => Some('2'),
            'D' | 'T' => Some('3'),
            'L' => Some('4'),
            'M' | 'N' => Some('5'),
            'R' => Some('6'),
            _ => None,
        }
    }

    let mut chars = word.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return SOUNDEX_EMPTY.to_string(),
    };

    let mut out = String::with_capacity(4);
    out.push(first.to_ascii_uppercase());
    let mut prev = first.to_ascii_uppercase();
    for c in chars {
        let upper = c.to_ascii_uppercase();
        if let Some(code) = class_of(upper) {
            if upper != prev {
                out.push(code);
                if out.len() == 4 {
                    break;
                }
                prev = upper;
            }
        }
    }
    while out.len() < 4 {
        out.push('0');
    }
    out
}

impl Tokenizer for Soundex {
    fn apply(&self, tokens: Vec<String>) -> Vec<String> {
        tokens.iter().map(|t| encode_soundex(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(parts: Vec<Box<dyn Tokenizer>>) -> Vec<Box<dyn Tokenizer>> {
        parts
    }

    #[test]
    fn test_whitespace_splits() {
        let c = chain(vec![Box::new(Whitespace)]);
        assert_eq!(tokenize("hello  world\tnow", &c), vec!["hello", "world", "now"]);
    }

    #[test]
    fn test_empty_chain_produces_nothing() {
        assert_eq!(tokenize("hello", &[]), Vec::<String>::new());
    }

    #[test]
    fn test_left_edge_prefixes() {
        let c = chain(vec![Box::new(Whitespace), Box::new(LeftEdge::new(1))]);
        assert_eq!(
            tokenize("hello world", &c),
            vec!["h", "he", "hel", "hell", "hello", "w", "wo", "wor", "worl", "world"]
        );
    }

    #[test]
    fn test_char_ngram() {
        let c = chain(vec![Box::new(Whitespace), Box::new(CharNgram::new(2))]);
        assert_eq!(tokenize("abcd x", &c), vec!["ab", "bc", "cd", "x"]);
    }

    #[test]
    fn test_unique_keeps_first_occurrence() {
        let c = chain(vec![Box::new(Whitespace), Box::new(Unique)]);
        assert_eq!(tokenize("a b a c b", &c), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_surround_pads_the_edges() {
        let c = chain(vec![Box::new(Whitespace), Box::new(Surround::new("$"))]);
        assert_eq!(tokenize("h he hel", &c), vec!["$h", "he", "hel$"]);
    }

    #[test]
    fn test_soundex_codes() {
        assert_eq!(encode_soundex("robert"), "R163");
        assert_eq!(encode_soundex("rupert"), "R163");
        assert_eq!(encode_soundex("sofia"), "S100");
        assert_eq!(encode_soundex(""), "0000");
    }
}
