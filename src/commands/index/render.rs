use std::fmt::Write as _;

use anyhow::Result;

use crate::model::{IndexDocument, IndexDocumentEntry, IndexDocumentVariant};

use super::{IndexEntry, SubjectIndex, VariantPages, WordTokenizer, capitalize};

const VARIANT_INDENT: &str = "    ";

/// Lays out a finished index as the text report or its JSON twin.
///
/// Phrases and their variants are sorted case-insensitively; ties keep
/// load order.
#[derive(Debug, Clone)]
pub(super) struct ReportRenderer {
    tokenizer: WordTokenizer,
    not_found_label: String,
}

impl ReportRenderer {
    pub(super) fn new(not_found_label: &str) -> Result<Self> {
        Ok(Self {
            tokenizer: WordTokenizer::new()?,
            not_found_label: not_found_label.to_string(),
        })
    }

    pub(super) fn render_text(&self, index: &SubjectIndex) -> Result<String> {
        let mut report = String::new();

        for entry in sorted_entries(index) {
            writeln!(report, "{}", entry.phrase)?;
            for variant in sorted_variants(entry) {
                writeln!(
                    report,
                    "{}{}: {}",
                    VARIANT_INDENT,
                    self.display_variant(&entry.phrase, &variant.variant),
                    self.page_list(&variant.pages)
                )?;
            }
            writeln!(report)?;
        }

        Ok(report)
    }

    pub(super) fn render_json(&self, index: &SubjectIndex) -> IndexDocument {
        let entries = sorted_entries(index)
            .into_iter()
            .map(|entry| IndexDocumentEntry {
                phrase: entry.phrase.clone(),
                variants: sorted_variants(entry)
                    .into_iter()
                    .map(|variant| IndexDocumentVariant {
                        variant: variant.variant.clone(),
                        display: self.display_variant(&entry.phrase, &variant.variant),
                        pages: variant.pages.clone(),
                    })
                    .collect(),
            })
            .collect();

        IndexDocument { entries }
    }

    /// Restores the phrase's own casing for each variant token; tokens the
    /// phrase does not contain are capitalized.
    pub(super) fn display_variant(&self, phrase: &str, variant: &str) -> String {
        let phrase_tokens = self.tokenizer.tokens(phrase).collect::<Vec<&str>>();

        variant
            .split_whitespace()
            .map(|token| {
                phrase_tokens
                    .iter()
                    .find(|candidate| candidate.to_lowercase() == token)
                    .map(|candidate| (*candidate).to_string())
                    .unwrap_or_else(|| capitalize(token))
            })
            .collect::<Vec<String>>()
            .join(" ")
    }

    fn page_list(&self, pages: &[u32]) -> String {
        if pages.is_empty() {
            return self.not_found_label.clone();
        }

        pages
            .iter()
            .map(u32::to_string)
            .collect::<Vec<String>>()
            .join(", ")
    }
}

fn sorted_entries(index: &SubjectIndex) -> Vec<&IndexEntry> {
    let mut entries = index.entries().iter().collect::<Vec<&IndexEntry>>();
    entries.sort_by_cached_key(|entry| entry.phrase.to_lowercase());
    entries
}

fn sorted_variants(entry: &IndexEntry) -> Vec<&VariantPages> {
    let mut variants = entry.variants.iter().collect::<Vec<&VariantPages>>();
    variants.sort_by_cached_key(|variant| variant.variant.to_lowercase());
    variants
}
