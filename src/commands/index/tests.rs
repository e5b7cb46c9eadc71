use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::cli::{IndexArgs, MatchMode};

use super::run::{ScanStats, resolve_stop_words, scan_document};
use super::*;

fn generator() -> VariantGenerator {
    VariantGenerator::new(StopWords::default()).expect("variant regexes compile")
}

fn normalizer() -> PageNormalizer {
    PageNormalizer::new().expect("page regexes compile")
}

fn page(ordinal: usize, raw: &str) -> PageRecord {
    normalizer()
        .normalize(ordinal, Some(raw))
        .expect("page has text")
}

fn phrases(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn scratch_dir(name: &str) -> PathBuf {
    let stamp = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    let dir = std::env::temp_dir().join(format!(
        "book_index_{}_{}_{}",
        name,
        std::process::id(),
        stamp
    ));
    fs::create_dir_all(&dir).expect("scratch dir is creatable");
    dir
}

struct SparseDocument {
    pages: Vec<Option<String>>,
}

impl PageSource for SparseDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, ordinal: usize) -> Option<&str> {
        self.pages.get(ordinal).and_then(|page| page.as_deref())
    }
}

#[test]
fn generate_is_sorted_and_repeatable() {
    let generator = generator();

    let first = generator.generate("Smith, John");
    let second = generator.generate("Smith, John");

    assert_eq!(first, second);
    assert_eq!(first, vec!["john", "john smith", "smith"]);
}

#[test]
fn generate_inverts_names_even_when_fragments_are_stop_words() {
    assert_eq!(generator().generate("King, Monk"), vec!["monk king"]);
}

#[test]
fn generate_skips_inversion_for_more_than_two_comma_parts() {
    assert_eq!(
        generator().generate("Bede, the Venerable, Saint"),
        vec!["bede", "the venerable"]
    );
}

#[test]
fn generate_adds_plural_siblings_for_optional_s() {
    assert_eq!(generator().generate("Relic(s)"), vec!["relic", "relics"]);
    assert_eq!(generator().generate("Cross(s)"), vec!["cross"]);
}

#[test]
fn generate_splits_on_slashes_and_parentheses() {
    assert_eq!(
        generator().generate("Cuthbert/Cuthberht (Lindisfarne)"),
        vec!["cuthberht", "cuthbert", "lindisfarne"]
    );
}

#[test]
fn generate_drops_single_letter_and_stop_word_fragments() {
    assert!(generator().generate("A / B").is_empty());
    assert!(generator().generate("King").is_empty());
    assert_eq!(generator().generate("King Alfred"), vec!["king alfred"]);
}

#[test]
fn generate_uses_configured_stop_words() {
    let generator = VariantGenerator::new(StopWords::from_words(["Abbey"]))
        .expect("variant regexes compile");

    assert!(generator.generate("Abbey").is_empty());
    assert_eq!(generator.generate("King"), vec!["king"]);
}

#[test]
fn resolve_stop_words_defaults_and_overrides() {
    let defaults = resolve_stop_words(&[], None).expect("defaults resolve");
    assert!(defaults.contains("monk"));
    assert_eq!(defaults.len(), DEFAULT_STOP_WORDS.len());

    let dir = scratch_dir("stop_words");
    let path = dir.join("stop_words.txt");
    fs::write(&path, "Saint\n\n  river \n").expect("stop word file is writable");

    let custom = resolve_stop_words(&["Abbey".to_string()], Some(path.as_path()))
        .expect("file resolves");
    assert!(custom.contains("abbey"));
    assert!(custom.contains("saint"));
    assert!(custom.contains("river"));
    assert!(!custom.contains("monk"));
}

#[test]
fn normalize_rejoins_hyphenated_line_wraps() {
    let record = page(0, "reli-\ngion");

    assert!(record.text.contains("religion"));
    assert!(!record.text.contains("reli gion"));
    assert!(!record.text.contains('-'));
    assert_eq!(record.words, vec!["religion"]);
}

#[test]
fn normalize_joins_lines_and_lowercases() {
    let record = page(0, "The Abbey\nof Whitby");

    assert_eq!(record.text, "the abbey of whitby");
}

#[test]
fn normalize_removes_footnote_markers_but_keeps_numbers() {
    let record = page(0, "Bede3 wrote in the year 731 of Cuthbert12.");

    assert_eq!(record.text, "bede wrote in the year 731 of cuthbert.");
}

#[test]
fn normalize_keeps_long_or_embedded_digit_runs() {
    let record = page(0, "Bede1234 and B52s");

    assert_eq!(record.text, "bede1234 and b52s");
}

#[test]
fn normalize_splits_letters_joined_by_dashes() {
    let record = page(0, "Anglo-Saxon church\u{2014}state");

    assert_eq!(record.text, "anglo saxon church state");
}

#[test]
fn normalize_skips_pages_without_text() {
    let normalizer = normalizer();

    assert!(normalizer.normalize(0, None).is_none());
    assert!(normalizer.normalize(0, Some("  \n\t ")).is_none());
}

#[test]
fn printed_page_number_prefers_first_line_and_last_number() {
    let normalizer = normalizer();

    assert_eq!(
        normalizer.printed_page_number("Chapter 3 The Church 45\nbody 99\n7"),
        Some(45)
    );
    assert_eq!(
        normalizer.printed_page_number("The Church\nbody 99\n7"),
        Some(7)
    );
    assert_eq!(
        normalizer.printed_page_number("Year 12345\nnothing here"),
        None
    );
}

#[test]
fn printed_page_falls_back_to_position() {
    let record = page(4, "no digits\nhere either");

    assert_eq!(record.printed_page, 5);
    assert!(!record.printed_page_detected);
}

#[test]
fn printed_page_zero_is_kept() {
    let record = page(6, "0\nbody text");

    assert_eq!(record.printed_page, 0);
    assert!(record.printed_page_detected);
}

#[test]
fn join_wrapped_lines_glues_hyphenated_wraps() {
    assert_eq!(join_wrapped_lines("reli-\ngion"), "religion");
    assert_eq!(
        join_wrapped_lines("reli-  \n  gion and\nfaith"),
        "religion and faith"
    );
}

#[test]
fn join_wrapped_lines_keeps_trailing_hyphen_on_last_line() {
    assert_eq!(join_wrapped_lines("  first\nsecond-"), "first second-");
}

#[test]
fn split_letter_dashes_handles_chains_and_spaced_dashes() {
    assert_eq!(split_letter_dashes("anglo-saxon-era"), "anglo saxon era");
    assert_eq!(split_letter_dashes("war\u{2014}peace"), "war peace");
    assert_eq!(
        split_letter_dashes("pages 4-5 and a - b"),
        "pages 4-5 and a - b"
    );
}

#[test]
fn token_mode_matches_words_in_any_order() {
    let matcher = Matcher::new(MatchMode::Tokens);
    let record = page(0, "Smith met John at the abbeys");

    assert!(matcher.matches(&["john".to_string(), "smith".to_string()], &record));
    assert!(!matcher.matches(&["abbey".to_string()], &record));
}

#[test]
fn phrase_mode_requires_contiguous_tokens() {
    let matcher = Matcher::new(MatchMode::Phrase);
    let scattered = page(0, "Smith met John");
    let adjacent = page(1, "then John, Smith left");
    let tokens = vec!["john".to_string(), "smith".to_string()];

    assert!(!matcher.matches(&tokens, &scattered));
    assert!(matcher.matches(&tokens, &adjacent));
}

#[test]
fn scan_page_records_each_page_once() {
    let mut index = SubjectIndex::build(&phrases(&["Abbey"]), &generator());
    let matcher = Matcher::default();
    let record = page(0, "5\nthe abbey and the abbey church");

    assert_eq!(index.scan_page(&record, &matcher), 1);
    assert_eq!(index.scan_page(&record, &matcher), 0);
    assert_eq!(index.entries()[0].variants[0].pages, vec![5]);
}

#[test]
fn record_match_keeps_scan_order() {
    let mut index = SubjectIndex::build(&phrases(&["Abbey"]), &generator());

    assert!(index.record_match(0, 0, 10));
    assert!(index.record_match(0, 0, 3));
    assert!(!index.record_match(0, 0, 10));
    assert!(!index.record_match(3, 0, 1));
    assert_eq!(index.entries()[0].variants[0].pages, vec![10, 3]);
}

#[test]
fn build_collapses_duplicates_and_tracks_shared_variants() {
    let index = SubjectIndex::build(
        &phrases(&["Whitby", "Whitby", "Synod/Whitby", "(s)"]),
        &generator(),
    );

    assert_eq!(index.entries().len(), 3);
    assert_eq!(index.duplicate_phrase_count(), 1);
    assert_eq!(index.empty_phrase_count(), 1);
    assert_eq!(
        index.variant_owners().get("whitby"),
        Some(&vec!["Whitby", "Synod/Whitby"])
    );
}

#[test]
fn scan_document_indexes_pages_in_order() {
    let document = SparseDocument {
        pages: vec![
            Some("John Smith visited the abbey\n5".to_string()),
            None,
            Some("The abbey again".to_string()),
        ],
    };
    let mut index = SubjectIndex::build(&phrases(&["Smith, John", "Abbey"]), &generator());

    let stats = scan_document(&document, &normalizer(), &Matcher::default(), &mut index);

    assert_eq!(
        stats,
        ScanStats {
            page_count: 3,
            pages_scanned: 2,
            pages_skipped: 1,
            printed_page_fallback_count: 1,
            matches_recorded: 5,
        }
    );

    let smith = &index.entries()[0];
    let john_smith = smith
        .variants
        .iter()
        .find(|variant| variant.variant == "john smith")
        .expect("inverted variant exists");
    assert_eq!(john_smith.pages, vec![5]);

    let abbey = &index.entries()[1];
    assert_eq!(abbey.variants[0].variant, "abbey");
    assert_eq!(abbey.variants[0].pages, vec![5, 3]);
}

#[test]
fn render_text_sorts_and_restores_casing() {
    let mut index = SubjectIndex::build(
        &phrases(&["Smith, John", "Abbey", "A / B", "Relic(s)"]),
        &generator(),
    );
    let record = page(0, "John Smith and the abbey relics\n5");
    index.scan_page(&record, &Matcher::default());

    let renderer = ReportRenderer::new("No encontrada").expect("renderer builds");
    let report = renderer.render_text(&index).expect("report renders");

    assert_eq!(
        report,
        "A / B\n\n\
         Abbey\n    Abbey: 5\n\n\
         Relic(s)\n    Relic: No encontrada\n    Relics: 5\n\n\
         Smith, John\n    John: 5\n    John Smith: 5\n    Smith: 5\n\n"
    );
}

#[test]
fn display_variant_capitalizes_tokens_missing_from_phrase() {
    let renderer = ReportRenderer::new("not found").expect("renderer builds");

    assert_eq!(renderer.display_variant("de Vere, Edward", "edward de vere"), "Edward de Vere");
    assert_eq!(renderer.display_variant("Relic(s)", "relics"), "Relics");
    assert_eq!(renderer.display_variant("ÆLFRIC", "ælfric"), "ÆLFRIC");
}

#[test]
fn render_json_mirrors_report_order() {
    let mut index = SubjectIndex::build(&phrases(&["Whitby", "abbey"]), &generator());
    index.scan_page(&page(0, "Whitby abbey\n12"), &Matcher::default());

    let renderer = ReportRenderer::new("not found").expect("renderer builds");
    let document = renderer.render_json(&index);

    assert_eq!(document.entries.len(), 2);
    assert_eq!(document.entries[0].phrase, "abbey");
    assert_eq!(document.entries[0].variants[0].display, "abbey");
    assert_eq!(document.entries[1].phrase, "Whitby");
    assert_eq!(document.entries[1].variants[0].pages, vec![12]);
}

#[test]
fn text_document_splits_on_form_feeds() {
    let dir = scratch_dir("document");
    let path = dir.join("book.txt");
    fs::write(&path, "page one\n\u{000C}  \n\u{000C}page\u{0000} three\n\u{000C}\n\u{000C} ")
        .expect("document is writable");

    let document = ExtractedDocument::open(&path, None).expect("text document opens");
    assert_eq!(document.page_count(), 3);
    assert_eq!(document.page_text(0), Some("page one\n"));
    assert_eq!(document.page_text(1), None);
    assert_eq!(document.page_text(2), Some("page three\n"));
    assert_eq!(document.page_text(3), None);

    let limited = ExtractedDocument::open(&path, Some(1)).expect("text document opens");
    assert_eq!(limited.page_count(), 1);
}

#[test]
fn pdftotext_command_limits_pages_and_writes_stdout() {
    let args = |max_pages| {
        pdftotext_command(Path::new("book.pdf"), max_pages)
            .get_args()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect::<Vec<String>>()
    };

    assert_eq!(
        args(Some(3)),
        ["-enc", "UTF-8", "-f", "1", "-l", "3", "book.pdf", "-"]
    );
    assert_eq!(args(None), ["-enc", "UTF-8", "-f", "1", "book.pdf", "-"]);
}

#[test]
fn missing_inputs_are_fatal() {
    let dir = scratch_dir("missing");

    assert!(load_phrases(&dir.join("absent.txt")).is_err());
    assert!(ExtractedDocument::open(&dir.join("absent.txt"), None).is_err());
}

#[test]
fn run_writes_report_json_and_manifest() {
    let dir = scratch_dir("run");
    let document = dir.join("book.txt");
    let phrase_list = dir.join("phrases.txt");
    fs::write(
        &document,
        "5\nJohn Smith visited the abbey\n\u{000C}\u{000C}Nothing relevant here\n",
    )
    .expect("document is writable");
    fs::write(&phrase_list, "Smith, John\n\n  Abbey  \nCuthbert\n").expect("phrases are writable");

    let args = IndexArgs {
        document: document.clone(),
        phrases: phrase_list.clone(),
        output: dir.join("out").join("index.txt"),
        json_output: Some(dir.join("index.json")),
        manifest_path: Some(dir.join("manifest.json")),
        match_mode: MatchMode::Tokens,
        stop_words: Vec::new(),
        stop_words_path: None,
        not_found_label: "not found".to_string(),
        max_pages: None,
    };

    run(args).expect("index run succeeds");

    let report = fs::read_to_string(dir.join("out").join("index.txt")).expect("report exists");
    assert_eq!(
        report,
        "Abbey\n    Abbey: 5\n\n\
         Cuthbert\n    Cuthbert: not found\n\n\
         Smith, John\n    John: 5\n    John Smith: 5\n    Smith: 5\n\n"
    );

    let json: serde_json::Value = serde_json::from_slice(
        &fs::read(dir.join("index.json")).expect("json exists"),
    )
    .expect("json parses");
    assert_eq!(json["entries"][0]["phrase"], "Abbey");

    let manifest: serde_json::Value = serde_json::from_slice(
        &fs::read(dir.join("manifest.json")).expect("manifest exists"),
    )
    .expect("manifest parses");
    assert_eq!(manifest["status"], "completed");
    assert_eq!(manifest["match_mode"], "tokens");
    assert_eq!(manifest["counts"]["phrase_count"], 3);
    assert_eq!(manifest["counts"]["page_count"], 3);
    assert_eq!(manifest["counts"]["pages_scanned"], 2);
    assert_eq!(manifest["counts"]["pages_skipped"], 1);
    assert_eq!(manifest["counts"]["unmatched_variant_count"], 1);
    assert_eq!(manifest["source_hashes"].as_array().map(Vec::len), Some(2));
}
