pub mod clean_phrases;
pub mod index;
