use std::collections::{BTreeSet, HashSet};

use anyhow::{Context, Result};
use regex::Regex;

use super::WordTokenizer;

pub(super) const DEFAULT_STOP_WORDS: &[&str] = &[
    "abbot",
    "king",
    "bishop",
    "child",
    "saint",
    "pope",
    "monastery",
    "priest",
    "river",
    "martyrs",
    "monk",
];

const PLURAL_MARKER: &str = "(s)";

/// Tokens that cannot carry a split fragment on their own.
#[derive(Debug, Clone)]
pub(super) struct StopWords {
    words: HashSet<String>,
}

impl Default for StopWords {
    fn default() -> Self {
        Self::from_words(DEFAULT_STOP_WORDS.iter().copied())
    }
}

impl StopWords {
    pub(super) fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|word| word.as_ref().trim().to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        Self { words }
    }

    /// Expects an already lower-cased token.
    pub(super) fn contains(&self, token: &str) -> bool {
        self.words.contains(token)
    }

    pub(super) fn len(&self) -> usize {
        self.words.len()
    }
}

/// Derives the normalized search forms of a subject phrase.
///
/// Variants are lower-case, space-joined word tokens. A phrase yields:
/// - `"B A"` for a `"A, B"` name with exactly one comma,
/// - one variant per `/`, `(`, `)` or `,` separated fragment that has at least
///   one multi-character token and at least one token outside the stop words,
/// - a plural sibling of each such fragment when the phrase contains `(s)`.
#[derive(Debug, Clone)]
pub(super) struct VariantGenerator {
    tokenizer: WordTokenizer,
    delimiters: Regex,
    stop_words: StopWords,
}

impl VariantGenerator {
    pub(super) fn new(stop_words: StopWords) -> Result<Self> {
        Ok(Self {
            tokenizer: WordTokenizer::new()?,
            delimiters: Regex::new(r"[/(),]")
                .context("failed to compile fragment delimiter regex")?,
            stop_words,
        })
    }

    /// Returns the sorted, deduplicated variants of `phrase`.
    pub(super) fn generate(&self, phrase: &str) -> Vec<String> {
        let original = phrase.trim();
        let mut variants = BTreeSet::new();

        if let Some(inverted) = self.inverted_name(original) {
            variants.insert(inverted);
        }

        let pluralize = phrase.contains(PLURAL_MARKER);
        for fragment in self.delimiters.split(original) {
            let tokens = self.tokenizer.lowercase_tokens(fragment);
            if !self.is_substantive(&tokens) {
                continue;
            }

            variants.insert(tokens.join(" "));
            if pluralize {
                variants.insert(pluralized(&tokens));
            }
        }

        variants.into_iter().collect()
    }

    fn inverted_name(&self, original: &str) -> Option<String> {
        if original.matches(',').count() != 1 {
            return None;
        }

        let (surname, given) = original.split_once(',')?;
        let (surname, given) = (surname.trim(), given.trim());
        if surname.is_empty() || given.is_empty() {
            return None;
        }

        let mut tokens = self.tokenizer.lowercase_tokens(given);
        tokens.extend(self.tokenizer.lowercase_tokens(surname));
        if tokens.is_empty() {
            return None;
        }

        Some(tokens.join(" "))
    }

    fn is_substantive(&self, tokens: &[String]) -> bool {
        if tokens.is_empty() {
            return false;
        }

        // single letters are leftovers such as the "s" of "(s)"
        if tokens.iter().all(|token| token.chars().count() <= 1) {
            return false;
        }

        !tokens.iter().all(|token| self.stop_words.contains(token))
    }
}

/// A last token already ending in `s` is left as is, so the sibling collapses
/// into the singular variant.
fn pluralized(tokens: &[String]) -> String {
    let mut tokens = tokens.to_vec();
    if let Some(last) = tokens.last_mut() {
        if !last.ends_with('s') {
            last.push('s');
        }
    }
    tokens.join(" ")
}
