//! Analyzer: a normalizer chain plus separate index-time and search-time
//! tokenizer chains.
//!
//! Index and search tokenization differ on purpose: an autocomplete field
//! indexes every prefix of every word but searches with plain whitespace
//! tokens, so "ams" finds "amsterdam" without expanding the query.

use crate::normalize::{self, Normalizer};
use crate::tokenize::{self, CharNgram, LeftEdge, Noop, Soundex, Surround, Tokenizer, Unique, Whitespace};

/// Bundles the full analysis chain for one field.
pub struct Analyzer {
    normalizers: Vec<Box<dyn Normalizer>>,
    search: Vec<Box<dyn Tokenizer>>,
    index: Vec<Box<dyn Tokenizer>>,
}

impl Analyzer {
    pub fn new(
        normalizers: Vec<Box<dyn Normalizer>>,
        search: Vec<Box<dyn Tokenizer>>,
        index: Vec<Box<dyn Tokenizer>>,
    ) -> Self {
        Analyzer {
            normalizers,
            search,
            index,
        }
    }

    /// Produce the terms to store for `input` at index time.
    pub fn analyze_index(&self, input: &str) -> Vec<String> {
        tokenize::tokenize(&normalize::normalize(input, &self.normalizers), &self.index)
    }

    /// Produce the terms to look up for `input` at search time.
    pub fn analyze_search(&self, input: &str) -> Vec<String> {
        tokenize::tokenize(&normalize::normalize(input, &self.normalizers), &self.search)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        default_analyzer()
    }
}

/// Whitespace tokens over the basic normalizer chain.
pub fn default_analyzer() -> Analyzer {
    Analyzer::new(
        normalize::basic_chain(),
        vec![Box::new(Whitespace)],
        vec![Box::new(Whitespace)],
    )
}

/// No analysis at all: the value is the term. For keyword/id fields.
pub fn id_analyzer() -> Analyzer {
    Analyzer::new(
        vec![Box::new(normalize::Noop)],
        vec![Box::new(Noop)],
        vec![Box::new(Noop)],
    )
}

/// Indexes every word prefix, searches with plain words.
pub fn autocomplete_analyzer() -> Analyzer {
    Analyzer::new(
        normalize::basic_chain(),
        vec![Box::new(Whitespace)],
        vec![Box::new(Whitespace), Box::new(LeftEdge::new(1))],
    )
}

/// Character 2-grams with edge markers, for typo-tolerant matching.
pub fn fuzzy_analyzer() -> Analyzer {
    let make = || -> Vec<Box<dyn Tokenizer>> {
        vec![
            Box::new(Whitespace),
            Box::new(CharNgram::new(2)),
            Box::new(Unique),
            Box::new(Surround::new("$")),
        ]
    };
    Analyzer::new(normalize::basic_chain(), make(), make())
}

/// Phonetic matching via soundex codes.
pub fn soundex_analyzer() -> Analyzer {
    let make = || -> Vec<Box<dyn Tokenizer>> { vec![Box::new(Whitespace), Box::new(Soundex)] };
    Analyzer::new(normalize::basic_chain(), make(), make())
}
