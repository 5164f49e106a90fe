//! Normalizer chain.
//!
//! Normalizers run on the whole input string before tokenization, in the
//! order given:
//!
//! ```rust
//! use sift_index::normalize::{self, Normalizer};
//!
//! let chain = normalize::basic_chain();
//! assert_eq!(normalize::normalize("Hęllö  wÖrld year2019 ", &chain), "hello world year 2019");
//! ```

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// A single normalization step, `string -> string`.
pub trait Normalizer {
    fn apply(&self, input: &str) -> String;
}

/// Run `input` through `chain` front to back.
pub fn normalize(input: &str, chain: &[Box<dyn Normalizer>]) -> String {
    let mut out = input.to_string();
    for n in chain {
        out = n.apply(&out);
    }
    out
}

/// The usual chain for text fields: unaccent, lowercase, split glued
/// digits, strip punctuation, trim.
pub fn basic_chain() -> Vec<Box<dyn Normalizer>> {
    vec![
        Box::new(Unaccent),
        Box::new(LowerCase),
        Box::new(SpaceBetweenDigits),
        Box::new(Cleanup),
        Box::new(Trim),
    ]
}

pub struct LowerCase;

impl Normalizer for LowerCase {
    fn apply(&self, input: &str) -> String {
        input.to_lowercase()
    }
}

/// Strips leading and trailing whitespace.
pub struct Trim;

impl Normalizer for Trim {
    fn apply(&self, input: &str) -> String {
        input.trim().to_string()
    }
}

pub struct Noop;

impl Normalizer for Noop {
    fn apply(&self, input: &str) -> String {
        input.to_string()
    }
}

/// Folds accented letters to their base form: NFKD decomposition with
/// combining marks removed, plus a fix-up table for letters whose
/// diacritic is part of the letter and does not decompose (ł, ø, đ, ...).
pub struct Unaccent;

fn fold_non_decomposing(c: char) -> char {
    match c {
        'ł' => 'l',
        'Ł' => 'L',
        'ø' => 'o',
        'Ø' => 'O',
        'đ' => 'd',
        'Đ' => 'D',
        'ħ' => 'h',
        'Ħ' => 'H',
        'ŧ' => 't',
        'Ŧ' => 'T',
        'ƒ' => 'f',
        'ɨ' => 'i',
        'ɇ' => 'e',
        'ɉ' => 'j',
        'ꞃ' => 'r',
        'ɏ' => 'y',
        'ⱥ' => 'a',
        'ƀ' => 'b',
        'ȼ' => 'c',
        'ꝁ' => 'k',
        'ꝉ' => 'l',
        'ꝑ' => 'p',
        'ꝙ' => 'q',
        'ȥ' => 'z',
        other => other,
    }
}

impl Normalizer for Unaccent {
    fn apply(&self, input: &str) -> String {
        if input.is_ascii() {
            return input.to_string();
        }
        input
            .nfkd()
            .filter(|c| !is_combining_mark(*c))
            .map(fold_non_decomposing)
            .collect()
    }
}

/// Replaces every run of non-alphanumeric characters with a single space.
pub struct Cleanup;

impl Normalizer for Cleanup {
    fn apply(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut in_gap = false;
        for c in input.chars() {
            if c.is_alphanumeric() {
                out.push(c);
                in_gap = false;
            } else if !in_gap {
                out.push(' ');
                in_gap = true;
            }
        }
        out
    }
}

/// Inserts a space at every letter/digit boundary, so "year2019" becomes
/// "year 2019" and matches either token. A '-' adjoining digits counts as
/// part of the number.
pub struct SpaceBetweenDigits;

impl Normalizer for SpaceBetweenDigits {
    fn apply(&self, input: &str) -> String {
        if !input.chars().any(|c| c.is_numeric()) {
            return input.to_string();
        }
        let mut out = String::with_capacity(input.len() * 2);
        let mut digit_mode = false;
        let mut prev: Option<char> = None;
        for c in input.chars() {
            let is_digit = c.is_numeric() || c == '-';
            match prev {
                None => digit_mode = is_digit,
                Some(p) => {
                    if c != ' ' && is_digit != digit_mode {
                        digit_mode = is_digit;
                        if p != ' ' {
                            out.push(' ');
                        }
                    }
                }
            }
            out.push(c);
            prev = Some(c);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_trim() {
        let chain: Vec<Box<dyn Normalizer>> = vec![Box::new(LowerCase), Box::new(Trim)];
        assert_eq!(normalize("  HeLLo ", &chain), "hello");
    }

    #[test]
    fn test_unaccent_folds_diacritics() {
        assert_eq!(Unaccent.apply("Hęllö"), "Hello");
        assert_eq!(Unaccent.apply("Łódź"), "Lodz");
        assert_eq!(Unaccent.apply("café"), "cafe");
        // ascii fast path leaves input alone
        assert_eq!(Unaccent.apply("plain"), "plain");
    }

    #[test]
    fn test_cleanup_collapses_punctuation_runs() {
        assert_eq!(Cleanup.apply("a--b..c"), "a b c");
        assert_eq!(Cleanup.apply("!?a"), " a");
    }

    #[test]
    fn test_space_between_digits() {
        assert_eq!(SpaceBetweenDigits.apply("year2019"), "year 2019");
        assert_eq!(SpaceBetweenDigits.apply("a1b2"), "a 1 b 2");
        assert_eq!(SpaceBetweenDigits.apply("nodigits"), "nodigits");
    }

    #[test]
    fn test_basic_chain_end_to_end() {
        let chain = basic_chain();
        assert_eq!(normalize("Hęllö  wÖrld year2019 ", &chain), "hello world year 2019");
    }
}
