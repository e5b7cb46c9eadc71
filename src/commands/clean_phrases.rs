use anyhow::{Context, Result};
use regex::Regex;
use tracing::info;

use crate::cli::CleanPhrasesArgs;
use crate::util::{read_utf8, write_text};

pub fn run(args: CleanPhrasesArgs) -> Result<()> {
    let cleaner = PhraseCleaner::new()?;
    let raw = read_utf8(&args.input)?;

    let mut cleaned = String::with_capacity(raw.len());
    let mut changed = 0usize;
    for line in raw.lines() {
        let phrase = cleaner.clean_line(line);
        if phrase != line {
            changed += 1;
        }
        cleaned.push_str(&phrase);
        cleaned.push('\n');
    }

    write_text(&args.output, &cleaned)?;
    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        lines = raw.lines().count(),
        changed,
        "cleaned phrase list"
    );

    Ok(())
}

/// Strips trailing page citations (`12`, `4-5`, `p. 7, 9–11`) and leftover
/// punctuation from raw index lines.
#[derive(Debug, Clone)]
pub struct PhraseCleaner {
    page_citation: Regex,
    trailing_punctuation: Regex,
}

impl PhraseCleaner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            page_citation: Regex::new(
                r"[\s,:;.-]*(p\.\s*)?\d+([–,-]\d+)?(,\s*(p\.\s*)?\d+([–,-]\d+)?)*\s*$",
            )
            .context("failed to compile page citation regex")?,
            trailing_punctuation: Regex::new(r"[\s:;.,\-–]+$")
                .context("failed to compile trailing punctuation regex")?,
        })
    }

    pub fn clean_line(&self, line: &str) -> String {
        let without_citation = self.page_citation.replace(line.trim(), "");
        self.trailing_punctuation
            .replace(&without_citation, "")
            .into_owned()
    }
}
