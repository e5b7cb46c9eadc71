use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SourceHash {
    pub path: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolVersions {
    pub pdftotext: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexPaths {
    pub document: String,
    pub phrases: String,
    pub output: String,
    pub json_output: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IndexCounts {
    pub phrase_count: usize,
    pub variant_count: usize,
    pub shared_variant_count: usize,
    pub empty_phrase_count: usize,
    pub page_count: usize,
    pub pages_scanned: usize,
    pub pages_skipped: usize,
    pub printed_page_fallback_count: usize,
    pub matches_recorded: usize,
    pub unmatched_variant_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub match_mode: String,
    pub tool_versions: ToolVersions,
    pub paths: IndexPaths,
    pub source_hashes: Vec<SourceHash>,
    pub counts: IndexCounts,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexDocument {
    pub entries: Vec<IndexDocumentEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexDocumentEntry {
    pub phrase: String,
    pub variants: Vec<IndexDocumentVariant>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexDocumentVariant {
    pub variant: String,
    pub display: String,
    pub pages: Vec<u32>,
}
