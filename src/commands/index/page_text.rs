use std::collections::HashSet;

use anyhow::{Context, Result};
use regex::Regex;

use super::WordTokenizer;

const DASHES: &[char] = &['-', '\u{2010}', '\u{2011}', '\u{2012}', '\u{2013}', '\u{2014}'];

/// One page's cleaned search text and the page number a reader sees.
#[derive(Debug, Clone)]
pub(super) struct PageRecord {
    pub(super) ordinal: usize,
    pub(super) printed_page: u32,
    pub(super) printed_page_detected: bool,
    pub(super) text: String,
    pub(super) words: Vec<String>,
    pub(super) vocabulary: HashSet<String>,
}

#[derive(Debug, Clone)]
pub(super) struct PageNormalizer {
    tokenizer: WordTokenizer,
    footnote_marker: Regex,
    page_number: Regex,
}

impl PageNormalizer {
    pub(super) fn new() -> Result<Self> {
        Ok(Self {
            tokenizer: WordTokenizer::new()?,
            footnote_marker: Regex::new(r"(\p{L})[0-9]{1,3}\b")
                .context("failed to compile footnote marker regex")?,
            page_number: Regex::new(r"\b([0-9]{1,4})\b")
                .context("failed to compile page number regex")?,
        })
    }

    /// Builds the record for the page at `ordinal`, or `None` when the page
    /// has no extractable text.
    pub(super) fn normalize(&self, ordinal: usize, raw: Option<&str>) -> Option<PageRecord> {
        let raw = raw.filter(|text| !text.trim().is_empty())?;

        let joined = join_wrapped_lines(raw);
        let without_markers = self.footnote_marker.replace_all(&joined, "${1}");
        let text = split_letter_dashes(&without_markers).to_lowercase();

        let words = self
            .tokenizer
            .tokens(&text)
            .map(ToOwned::to_owned)
            .collect::<Vec<String>>();
        let vocabulary = words.iter().cloned().collect();

        let detected = self.printed_page_number(raw);
        let printed_page = detected.unwrap_or_else(|| ordinal_fallback(ordinal));

        Some(PageRecord {
            ordinal,
            printed_page,
            printed_page_detected: detected.is_some(),
            text,
            words,
            vocabulary,
        })
    }

    /// Last 1-4 digit number on the first line, else on the last line.
    /// A printed `0` is a detected number, not a miss.
    pub(super) fn printed_page_number(&self, raw: &str) -> Option<u32> {
        let lines = raw.trim().lines().collect::<Vec<&str>>();
        let (Some(first), Some(last)) = (lines.first(), lines.last()) else {
            return None;
        };

        [first, last].into_iter().find_map(|line| {
            self.page_number
                .captures_iter(line)
                .last()
                .and_then(|captures| captures.get(1))
                .and_then(|value| value.as_str().parse::<u32>().ok())
        })
    }
}

fn ordinal_fallback(ordinal: usize) -> u32 {
    u32::try_from(ordinal).map_or(u32::MAX, |value| value.saturating_add(1))
}

/// Joins lines with single spaces; a line ending in `-` is glued to the next
/// one with the hyphen dropped.
pub(super) fn join_wrapped_lines(raw: &str) -> String {
    let mut joined = String::with_capacity(raw.len());
    let mut previous_hyphenated = false;

    for line in raw.lines() {
        if previous_hyphenated {
            joined.truncate(joined.trim_end().len());
            joined.pop();
            joined.push_str(line.trim_start());
        } else {
            if !joined.is_empty() {
                joined.push(' ');
            }
            joined.push_str(line);
        }

        previous_hyphenated = line.trim_end().ends_with('-');
    }

    joined.trim().to_string()
}

/// Replaces a dash squeezed between two letters with a space.
pub(super) fn split_letter_dashes(text: &str) -> String {
    let characters = text.chars().collect::<Vec<char>>();

    characters
        .iter()
        .enumerate()
        .map(|(index, &character)| {
            let between_letters = index > 0
                && characters[index - 1].is_alphabetic()
                && characters
                    .get(index + 1)
                    .is_some_and(|next| next.is_alphabetic());
            if between_letters && DASHES.contains(&character) {
                ' '
            } else {
                character
            }
        })
        .collect()
}
