use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};

use crate::util::read_utf8;

const PDFTOTEXT: &str = "pdftotext";
const PAGE_BREAK: char = '\u{000C}';

/// Text-extraction view of a paged document.
pub(super) trait PageSource {
    fn page_count(&self) -> usize;

    /// Raw text of the page at `ordinal`, or `None` if the page has none.
    fn page_text(&self, ordinal: usize) -> Option<&str>;
}

#[derive(Debug, Clone, Default)]
pub(super) struct ExtractedDocument {
    pages: Vec<String>,
}

impl PageSource for ExtractedDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, ordinal: usize) -> Option<&str> {
        self.pages
            .get(ordinal)
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
    }
}

impl ExtractedDocument {
    pub(super) fn from_pages(pages: Vec<String>) -> Self {
        Self { pages }
    }

    /// PDFs go through pdftotext; anything else is read as form-feed separated text.
    pub(super) fn open(path: &Path, max_pages: Option<usize>) -> Result<Self> {
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);

        if is_pdf {
            Self::from_pdf(path, max_pages)
        } else {
            Self::from_text_file(path, max_pages)
        }
    }

    pub(super) fn from_pdf(path: &Path, max_pages: Option<usize>) -> Result<Self> {
        let output = pdftotext_command(path, max_pages)
            .output()
            .with_context(|| format!("failed to execute pdftotext for {}", path.display()))?;

        if !output.status.success() {
            bail!(
                "pdftotext failed for {} ({}): {}",
                path.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        Ok(Self::from_pages(split_pages(&raw, max_pages)))
    }

    pub(super) fn from_text_file(path: &Path, max_pages: Option<usize>) -> Result<Self> {
        let raw = read_utf8(path)?;
        Ok(Self::from_pages(split_pages(&raw, max_pages)))
    }
}

/// UTF-8 text of every page (or the first `max_pages`) on stdout, pages
/// separated by form feeds.
pub(super) fn pdftotext_command(path: &Path, max_pages: Option<usize>) -> Command {
    let mut command = Command::new(PDFTOTEXT);
    command.args(["-enc", "UTF-8", "-f", "1"]);
    if let Some(last_page) = max_pages {
        command.args(["-l", &last_page.to_string()]);
    }
    command.arg(path).arg("-");
    command
}

fn split_pages(raw: &str, max_pages: Option<usize>) -> Vec<String> {
    let mut pages = raw
        .split(PAGE_BREAK)
        .map(|chunk| chunk.replace('\u{0000}', ""))
        .collect::<Vec<String>>();

    let kept = pages
        .iter()
        .rposition(|page| !page.trim().is_empty())
        .map_or(0, |last| last + 1);
    pages.truncate(max_pages.map_or(kept, |limit| limit.min(kept)));

    pages
}

/// First line of the `pdftotext -v` banner, if the tool is installed.
pub(super) fn pdftotext_version() -> Option<String> {
    let output = Command::new(PDFTOTEXT).arg("-v").output().ok()?;

    // poppler prints the banner on stderr
    let banner = [output.stderr, output.stdout].concat();
    String::from_utf8_lossy(&banner)
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(ToOwned::to_owned)
}
