// src/extractors/mod.rs
pub mod labels;
pub mod lists;
pub mod outline;
pub mod section;

// Re-export key extraction types for convenience
pub use labels::{find_label, LabelMatch, LabelPattern};
pub use lists::{parse_headings, parse_list_items, strip_list_marker, OutlineHeading};
pub use outline::{ContentIntent, ContentOutline, KeywordAnalysis, OutlineBody};
pub use section::{ExtractionResult, SectionDefinition, SectionExtractor, SectionSpec};
