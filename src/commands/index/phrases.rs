use std::path::Path;

use anyhow::Result;

use crate::util::read_utf8;

pub(super) fn load_phrases(path: &Path) -> Result<Vec<String>> {
    Ok(parse_phrases(&read_utf8(path)?))
}

/// One trimmed phrase per non-blank line.
pub(super) fn parse_phrases(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Words from a stop-word file, one per non-blank line.
pub(super) fn load_word_list(path: &Path) -> Result<Vec<String>> {
    Ok(parse_phrases(&read_utf8(path)?))
}
