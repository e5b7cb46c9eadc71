mod document;
mod matcher;
mod page_text;
mod phrases;
mod render;
mod run;
mod subject_index;
#[cfg(test)]
mod tests;
mod tokens;
mod variants;

pub use run::run;

use document::*;
use matcher::*;
use page_text::*;
use phrases::*;
use render::*;
use subject_index::*;
use tokens::*;
use variants::*;
