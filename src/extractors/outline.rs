// src/extractors/outline.rs

use crate::extractors::lists::{parse_headings, parse_list_items, OutlineHeading};
use crate::extractors::section::{ExtractionResult, SectionDefinition, SectionExtractor};
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

// --- Section names ---
pub const PRIMARY_KEYWORD: &str = "Primary keyword";
pub const SECONDARY_KEYWORDS: &str = "Secondary keywords";
pub const META_TITLE: &str = "Meta Title";
pub const META_DESCRIPTION: &str = "Meta Description";
pub const SLUG: &str = "Slug";
pub const OUTLINE: &str = "Outline";
pub const WRITING_GUIDELINES: &str = "Writing Guidelines";
pub const ARTICLE_TYPE: &str = "Article Type Prediction";
pub const JUSTIFICATION: &str = "Justification";
pub const INTENT: &str = "Intent";

const H1_OPTIONS: &str = "H1 Options";
const INTRODUCTION: &str = "Introduction";
const CONCLUSION: &str = "Conclusion";
const FAQ: &str = "FAQ";

/// Footer label written after the model's outline when the document is assembled.
pub const FOOTER_LABEL: &str = "Generated for:";

/// Sections of a generated content outline, in the order the model is asked to write them.
pub fn outline_definition() -> SectionDefinition {
    SectionDefinition::new()
        .section(PRIMARY_KEYWORD, "Primary keyword:", Some("Secondary keywords:"))
        .section(SECONDARY_KEYWORDS, "Secondary keywords:", Some("Meta title:"))
        .section(META_TITLE, "Meta title:", Some("Meta description:"))
        .section(META_DESCRIPTION, "Meta description:", Some("Slug:"))
        .section(SLUG, "Slug:", Some("Outline:"))
        .section(OUTLINE, "Outline:", Some("Writing Guidelines:"))
        .section(WRITING_GUIDELINES, "Writing Guidelines:", Some("Article Type Prediction:"))
        .section(ARTICLE_TYPE, "Article Type Prediction:", Some("Justification:"))
        .section(JUSTIFICATION, "Justification:", Some(FOOTER_LABEL))
}

/// Sections of the keyword-selection answer.
pub fn keyword_analysis_definition() -> SectionDefinition {
    SectionDefinition::new()
        .section(PRIMARY_KEYWORD, "Primary keyword:", Some("Secondary keywords:"))
        .section(SECONDARY_KEYWORDS, "Secondary keywords:", Some("Intent:"))
        .section(INTENT, "Intent:", None)
}

fn outline_body_definition() -> SectionDefinition {
    SectionDefinition::new()
        .section(H1_OPTIONS, "H1:", Some("Introduction:"))
        .section(INTRODUCTION, "Introduction:", Some("H2:"))
        .section(CONCLUSION, "Conclusion:", Some("FAQ:"))
        .section(FAQ, "FAQ:", None)
}

static OUTLINE_EXTRACTOR: Lazy<SectionExtractor> = Lazy::new(|| {
    SectionExtractor::new(&outline_definition()).expect("Failed to compile OUTLINE_EXTRACTOR")
});

static OUTLINE_BODY_EXTRACTOR: Lazy<SectionExtractor> = Lazy::new(|| {
    SectionExtractor::new(&outline_body_definition()).expect("Failed to compile OUTLINE_BODY_EXTRACTOR")
});

static KEYWORD_EXTRACTOR: Lazy<SectionExtractor> = Lazy::new(|| {
    SectionExtractor::new(&keyword_analysis_definition()).expect("Failed to compile KEYWORD_EXTRACTOR")
});

// The template asks for `H1:Options`; models echo the word back in front of the titles
static H1_OPTIONS_WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^options\b\s*:?").expect("Failed to compile H1_OPTIONS_WORD_RE")
});

/// Shared extractor for full outline documents.
pub fn outline_extractor() -> &'static SectionExtractor {
    &OUTLINE_EXTRACTOR
}

// --- Keyword analysis ---

/// Search intent the keyword analysis settles on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentIntent {
    Informational,
    Commercial,
    Transactional,
    Navigational,
    Other(String),
}

impl From<&str> for ContentIntent {
    fn from(value: &str) -> Self {
        let value = value.trim().trim_end_matches('.');
        match value.to_ascii_lowercase().as_str() {
            "informational" => ContentIntent::Informational,
            "commercial" => ContentIntent::Commercial,
            "transactional" => ContentIntent::Transactional,
            "navigational" => ContentIntent::Navigational,
            _ => ContentIntent::Other(value.to_string()),
        }
    }
}

impl From<String> for ContentIntent {
    fn from(value: String) -> Self {
        ContentIntent::from(value.as_str())
    }
}

impl From<ContentIntent> for String {
    fn from(intent: ContentIntent) -> Self {
        intent.to_string()
    }
}

impl fmt::Display for ContentIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentIntent::Informational => write!(f, "informational"),
            ContentIntent::Commercial => write!(f, "commercial"),
            ContentIntent::Transactional => write!(f, "transactional"),
            ContentIntent::Navigational => write!(f, "navigational"),
            ContentIntent::Other(other) => write!(f, "{}", other),
        }
    }
}

/// Primary/secondary keyword choice returned by the keyword-selection prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    pub primary_keyword: String,
    pub secondary_keywords: Vec<String>,
    pub intent: ContentIntent,
}

impl KeywordAnalysis {
    /// Parses the model's answer. A blank primary keyword falls back to `query`.
    pub fn parse(response: &str, query: &str) -> Result<Self, ExtractError> {
        let sections = KEYWORD_EXTRACTOR.extract(response)?;

        let primary = first_line(sections.content(PRIMARY_KEYWORD));
        let primary_keyword = if primary.is_empty() {
            tracing::warn!("Keyword analysis named no primary keyword, using query '{}'", query);
            query.trim().to_string()
        } else {
            primary.to_string()
        };

        Ok(Self {
            primary_keyword,
            secondary_keywords: split_keywords(sections.content(SECONDARY_KEYWORDS)),
            intent: ContentIntent::from(first_line(sections.content(INTENT))),
        })
    }
}

// --- Content outline ---

/// The `Outline:` section broken into its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineBody {
    pub h1_options: Vec<String>,
    pub introduction: String,
    pub headings: Vec<OutlineHeading>,
    pub conclusion: String,
    pub faq: Vec<String>,
}

impl OutlineBody {
    /// Parses the text of the `Outline:` section. Empty text gives an empty body.
    pub fn parse(text: &str) -> Self {
        let Ok(parts) = OUTLINE_BODY_EXTRACTOR.extract(text) else {
            return Self::default();
        };

        let h1 = parts.content(H1_OPTIONS);
        let h1 = match H1_OPTIONS_WORD_RE.find(h1) {
            Some(m) => &h1[m.end()..],
            None => h1,
        };

        Self {
            h1_options: parse_list_items(h1),
            introduction: parts.content(INTRODUCTION).to_string(),
            headings: parse_headings(text),
            conclusion: parts.content(CONCLUSION).to_string(),
            faq: parse_list_items(parts.content(FAQ)),
        }
    }
}

/// A generated SEO content outline, split into display sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentOutline {
    pub primary_keyword: String,
    pub secondary_keywords: Vec<String>,
    pub meta_title: String,
    pub meta_description: String,
    pub slug: String,
    pub outline: OutlineBody,
    pub writing_guidelines: Vec<String>,
    pub article_type: String,
    pub justification: Vec<String>,
}

impl ContentOutline {
    /// Extracts and structures a full outline document.
    pub fn parse(document: &str) -> Result<Self, ExtractError> {
        let sections = OUTLINE_EXTRACTOR.extract(document)?;
        Ok(Self::from_sections(&sections))
    }

    pub fn from_sections(sections: &ExtractionResult) -> Self {
        Self {
            primary_keyword: unquote(first_line(sections.content(PRIMARY_KEYWORD))).to_string(),
            secondary_keywords: split_keywords(sections.content(SECONDARY_KEYWORDS)),
            meta_title: unquote(sections.content(META_TITLE)).to_string(),
            meta_description: unquote(sections.content(META_DESCRIPTION)).to_string(),
            slug: unquote(first_line(sections.content(SLUG))).to_string(),
            outline: OutlineBody::parse(sections.content(OUTLINE)),
            writing_guidelines: parse_list_items(sections.content(WRITING_GUIDELINES)),
            article_type: sections.content(ARTICLE_TYPE).to_string(),
            justification: parse_list_items(sections.content(JUSTIFICATION)),
        }
    }
}

fn first_line(text: &str) -> &str {
    text.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("")
}

fn unquote(text: &str) -> &str {
    let text = text.trim();
    for (open, close) in [('"', '"'), ('\'', '\''), ('“', '”')] {
        if let Some(inner) = text.strip_prefix(open).and_then(|t| t.strip_suffix(close)) {
            return inner.trim();
        }
    }
    text
}

/// Comma- or line-separated keywords, list markers and blanks dropped.
fn split_keywords(text: &str) -> Vec<String> {
    parse_list_items(text)
        .iter()
        .flat_map(|line| line.split(','))
        .map(|k| unquote(k).to_string())
        .filter(|k| !k.is_empty())
        .collect()
}
