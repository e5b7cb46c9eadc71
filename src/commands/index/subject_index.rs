use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use super::{Matcher, PageRecord, VariantGenerator};

#[derive(Debug, Clone)]
pub(super) struct VariantPages {
    pub(super) variant: String,
    pub(super) tokens: Vec<String>,
    pub(super) pages: Vec<u32>,
}

impl VariantPages {
    fn new(variant: String) -> Self {
        let tokens = variant.split_whitespace().map(ToOwned::to_owned).collect();
        Self {
            variant,
            tokens,
            pages: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub(super) struct IndexEntry {
    pub(super) phrase: String,
    pub(super) variants: Vec<VariantPages>,
}

/// Phrase -> variant -> pages accumulator, filled by one sequential scan.
///
/// Variants are fixed at construction. Page lists only grow, in scan order,
/// and never hold the same page twice.
#[derive(Debug, Clone, Default)]
pub(super) struct SubjectIndex {
    entries: Vec<IndexEntry>,
    duplicate_phrase_count: usize,
}

impl SubjectIndex {
    pub(super) fn build(phrases: &[String], generator: &VariantGenerator) -> Self {
        let mut seen = HashSet::new();
        let mut index = Self::default();

        for phrase in phrases {
            if !seen.insert(phrase.as_str()) {
                debug!(phrase = %phrase, "duplicate phrase collapsed");
                index.duplicate_phrase_count += 1;
                continue;
            }

            let variants = generator
                .generate(phrase)
                .into_iter()
                .map(VariantPages::new)
                .collect();
            index.entries.push(IndexEntry {
                phrase: phrase.clone(),
                variants,
            });
        }

        index
    }

    pub(super) fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    pub(super) fn duplicate_phrase_count(&self) -> usize {
        self.duplicate_phrase_count
    }

    /// Appends `page` to one variant's list. Returns false if it was already there.
    pub(super) fn record_match(&mut self, entry: usize, variant: usize, page: u32) -> bool {
        let Some(pages) = self
            .entries
            .get_mut(entry)
            .and_then(|found| found.variants.get_mut(variant))
            .map(|found| &mut found.pages)
        else {
            return false;
        };

        if pages.contains(&page) {
            return false;
        }
        pages.push(page);
        true
    }

    /// Records every variant matching `page`; returns how many were new.
    pub(super) fn scan_page(&mut self, page: &PageRecord, matcher: &Matcher) -> usize {
        let mut hits = Vec::new();
        for (entry_index, entry) in self.entries.iter().enumerate() {
            for (variant_index, variant) in entry.variants.iter().enumerate() {
                if matcher.matches(&variant.tokens, page) {
                    hits.push((entry_index, variant_index));
                }
            }
        }

        hits.into_iter()
            .filter(|&(entry, variant)| self.record_match(entry, variant, page.printed_page))
            .count()
    }

    /// Phrases generating each variant string.
    pub(super) fn variant_owners(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut owners = BTreeMap::<&str, Vec<&str>>::new();
        for entry in &self.entries {
            for variant in &entry.variants {
                owners
                    .entry(variant.variant.as_str())
                    .or_default()
                    .push(entry.phrase.as_str());
            }
        }
        owners
    }

    pub(super) fn variant_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.variants.len()).sum()
    }

    pub(super) fn unmatched_variant_count(&self) -> usize {
        self.entries
            .iter()
            .flat_map(|entry| entry.variants.iter())
            .filter(|variant| variant.pages.is_empty())
            .count()
    }

    pub(super) fn empty_phrase_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.variants.is_empty())
            .count()
    }
}
