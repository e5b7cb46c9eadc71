use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::cli::{IndexArgs, MatchMode};
use crate::model::{IndexCounts, IndexPaths, IndexRunManifest, SourceHash, ToolVersions};
use crate::util::{now_utc_string, sha256_file, utc_compact_string, write_json_pretty, write_text};

use super::*;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(super) struct ScanStats {
    pub(super) page_count: usize,
    pub(super) pages_scanned: usize,
    pub(super) pages_skipped: usize,
    pub(super) printed_page_fallback_count: usize,
    pub(super) matches_recorded: usize,
}

pub fn run(args: IndexArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));
    let mut warnings = Vec::<String>::new();

    info!(
        run_id = %run_id,
        document = %args.document.display(),
        phrases = %args.phrases.display(),
        match_mode = args.match_mode.as_str(),
        "starting index"
    );

    let phrases = load_phrases(&args.phrases)?;
    if phrases.is_empty() {
        let message = format!("no phrases found in {}", args.phrases.display());
        warn!(path = %args.phrases.display(), "phrase list is empty");
        warnings.push(message);
    }

    let stop_words = resolve_stop_words(&args.stop_words, args.stop_words_path.as_deref())?;
    info!(
        phrase_count = phrases.len(),
        stop_word_count = stop_words.len(),
        "loaded phrases"
    );

    let generator = VariantGenerator::new(stop_words)?;
    let mut index = SubjectIndex::build(&phrases, &generator);
    if index.duplicate_phrase_count() > 0 {
        warnings.push(format!(
            "{} duplicate phrases were collapsed",
            index.duplicate_phrase_count()
        ));
    }

    let shared_variant_count = index
        .variant_owners()
        .values()
        .filter(|owners| owners.len() > 1)
        .count();
    info!(
        variant_count = index.variant_count(),
        shared_variant_count,
        empty_phrase_count = index.empty_phrase_count(),
        "generated variants"
    );

    let document = ExtractedDocument::open(&args.document, args.max_pages)?;
    let normalizer = PageNormalizer::new()?;
    let matcher = Matcher::new(args.match_mode);
    let stats = scan_document(&document, &normalizer, &matcher, &mut index);

    if stats.pages_scanned == 0 {
        warn!(document = %args.document.display(), "no page had extractable text");
        warnings.push(format!(
            "no page of {} had extractable text",
            args.document.display()
        ));
    }

    let renderer = ReportRenderer::new(&args.not_found_label)?;
    let report = renderer.render_text(&index)?;
    write_text(&args.output, &report)?;
    info!(path = %args.output.display(), "wrote index report");

    if let Some(json_path) = &args.json_output {
        write_json_pretty(json_path, &renderer.render_json(&index))?;
        info!(path = %json_path.display(), "wrote index json");
    }

    let counts = IndexCounts {
        phrase_count: index.entries().len(),
        variant_count: index.variant_count(),
        shared_variant_count,
        empty_phrase_count: index.empty_phrase_count(),
        page_count: stats.page_count,
        pages_scanned: stats.pages_scanned,
        pages_skipped: stats.pages_skipped,
        printed_page_fallback_count: stats.printed_page_fallback_count,
        matches_recorded: stats.matches_recorded,
        unmatched_variant_count: index.unmatched_variant_count(),
    };

    if let Some(manifest_path) = &args.manifest_path {
        let manifest = IndexRunManifest {
            manifest_version: 1,
            run_id: run_id.clone(),
            status: "completed".to_string(),
            started_at,
            updated_at: now_utc_string(),
            command: render_index_command(&args),
            match_mode: args.match_mode.as_str().to_string(),
            tool_versions: ToolVersions {
                pdftotext: pdftotext_version(),
            },
            paths: IndexPaths {
                document: args.document.display().to_string(),
                phrases: args.phrases.display().to_string(),
                output: args.output.display().to_string(),
                json_output: args
                    .json_output
                    .as_ref()
                    .map(|path| path.display().to_string()),
            },
            source_hashes: vec![source_hash(&args.document)?, source_hash(&args.phrases)?],
            counts: counts.clone(),
            warnings,
        };
        write_json_pretty(manifest_path, &manifest)?;
        info!(path = %manifest_path.display(), "wrote index run manifest");
    }

    info!(
        run_id = %run_id,
        pages_scanned = counts.pages_scanned,
        pages_skipped = counts.pages_skipped,
        matches = counts.matches_recorded,
        unmatched_variants = counts.unmatched_variant_count,
        "index completed"
    );

    Ok(())
}

/// Single in-order pass over the document; the index is only touched here.
pub(super) fn scan_document<S: PageSource>(
    source: &S,
    normalizer: &PageNormalizer,
    matcher: &Matcher,
    index: &mut SubjectIndex,
) -> ScanStats {
    let mut stats = ScanStats {
        page_count: source.page_count(),
        ..ScanStats::default()
    };

    for ordinal in 0..source.page_count() {
        let Some(page) = normalizer.normalize(ordinal, source.page_text(ordinal)) else {
            debug!(page_pdf = ordinal + 1, "page has no extractable text, skipped");
            stats.pages_skipped += 1;
            continue;
        };

        if !page.printed_page_detected {
            debug!(
                page_pdf = page.ordinal + 1,
                "no printed page number on first or last line, using position"
            );
            stats.printed_page_fallback_count += 1;
        }

        let recorded = index.scan_page(&page, matcher);
        debug!(
            page_pdf = page.ordinal + 1,
            printed_page = page.printed_page,
            chars = page.text.len(),
            recorded,
            "scanned page"
        );

        stats.pages_scanned += 1;
        stats.matches_recorded += recorded;
    }

    stats
}

pub(super) fn resolve_stop_words(words: &[String], path: Option<&Path>) -> Result<StopWords> {
    if words.is_empty() && path.is_none() {
        return Ok(StopWords::default());
    }

    let mut combined = words.to_vec();
    if let Some(path) = path {
        combined.extend(load_word_list(path)?);
    }

    Ok(StopWords::from_words(combined))
}

fn source_hash(path: &Path) -> Result<SourceHash> {
    Ok(SourceHash {
        path: path.display().to_string(),
        sha256: sha256_file(path)?,
    })
}

fn render_index_command(args: &IndexArgs) -> String {
    let mut command = vec![
        "book-index".to_string(),
        "index".to_string(),
        "--document".to_string(),
        args.document.display().to_string(),
        "--phrases".to_string(),
        args.phrases.display().to_string(),
        "--output".to_string(),
        args.output.display().to_string(),
    ];

    if let Some(path) = &args.json_output {
        command.push("--json-output".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.manifest_path {
        command.push("--manifest-path".to_string());
        command.push(path.display().to_string());
    }
    if args.match_mode != MatchMode::Tokens {
        command.push("--match-mode".to_string());
        command.push(args.match_mode.as_str().to_string());
    }
    for word in &args.stop_words {
        command.push("--stop-word".to_string());
        command.push(word.clone());
    }
    if let Some(path) = &args.stop_words_path {
        command.push("--stop-words-path".to_string());
        command.push(path.display().to_string());
    }
    command.push("--not-found-label".to_string());
    command.push(args.not_found_label.clone());
    if let Some(max_pages) = args.max_pages {
        command.push("--max-pages".to_string());
        command.push(max_pages.to_string());
    }

    command.join(" ")
}
