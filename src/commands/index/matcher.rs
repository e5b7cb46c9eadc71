use crate::cli::MatchMode;

use super::PageRecord;

#[derive(Debug, Clone, Copy, Default)]
pub(super) struct Matcher {
    mode: MatchMode,
}

impl Matcher {
    pub(super) fn new(mode: MatchMode) -> Self {
        Self { mode }
    }

    /// Whole-word test of a variant's tokens against a page.
    pub(super) fn matches(&self, tokens: &[String], page: &PageRecord) -> bool {
        if tokens.is_empty() {
            return false;
        }

        match self.mode {
            MatchMode::Tokens => tokens
                .iter()
                .all(|token| page.vocabulary.contains(token.as_str())),
            MatchMode::Phrase => page
                .words
                .windows(tokens.len())
                .any(|window| window == tokens),
        }
    }
}
