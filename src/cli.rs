use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "book-index",
    version,
    about = "Back-of-book subject index generation from extracted page text"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Index(IndexArgs),
    CleanPhrases(CleanPhrasesArgs),
}

#[derive(Args, Debug, Clone)]
pub struct IndexArgs {
    /// PDF file, or pre-extracted text with pages separated by form feeds.
    #[arg(long)]
    pub document: PathBuf,

    /// Subject phrases, one per line.
    #[arg(long)]
    pub phrases: PathBuf,

    #[arg(long, default_value = "indice_generado.txt")]
    pub output: PathBuf,

    #[arg(long)]
    pub json_output: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = MatchMode::Tokens)]
    pub match_mode: MatchMode,

    #[arg(long = "stop-word")]
    pub stop_words: Vec<String>,

    #[arg(long)]
    pub stop_words_path: Option<PathBuf>,

    #[arg(long, default_value = "not found")]
    pub not_found_label: String,

    #[arg(long)]
    pub max_pages: Option<usize>,
}

/// How a variant is matched against a page's words.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum MatchMode {
    /// Every token appears somewhere on the page, in any order.
    #[default]
    Tokens,
    /// Tokens appear contiguously and in order.
    Phrase,
}

impl MatchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tokens => "tokens",
            Self::Phrase => "phrase",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CleanPhrasesArgs {
    /// Raw phrase lines, possibly ending in page citations.
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub output: PathBuf,
}
