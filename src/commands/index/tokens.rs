use anyhow::{Context, Result};
use regex::Regex;

/// Splits text into word tokens (runs of letters, digits and underscores).
#[derive(Debug, Clone)]
pub(super) struct WordTokenizer {
    word: Regex,
}

impl WordTokenizer {
    pub(super) fn new() -> Result<Self> {
        Ok(Self {
            word: Regex::new(r"\w+").context("failed to compile word token regex")?,
        })
    }

    pub(super) fn tokens<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.word.find_iter(text).map(|found| found.as_str())
    }

    pub(super) fn lowercase_tokens(&self, text: &str) -> Vec<String> {
        self.tokens(text).map(str::to_lowercase).collect()
    }
}

pub(super) fn capitalize(token: &str) -> String {
    let mut characters = token.chars();
    match characters.next() {
        Some(first) => first.to_uppercase().chain(characters).collect(),
        None => String::new(),
    }
}
