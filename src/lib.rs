// src/lib.rs
//! SEO content research: keyword and search-result gathering, competitor page
//! summaries, language-model outline synthesis, and a tolerant label-based
//! section extractor for the generated outline text.

pub mod config;
pub mod extractors;
pub mod research;
pub mod storage;
pub mod utils;
