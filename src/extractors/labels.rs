// src/extractors/labels.rs

use crate::utils::error::ExtractError;
use regex::Regex;

// Optional markdown emphasis or heading marker in front of a label, only at the start of a line
const LABEL_PREFIX: &str = r"(?:(?m:^)[ \t]*(?:\*\*|__|#{1,6}[ \t]+)[ \t]*)?";
// A colon inside a label: flexible whitespace on the same line, tolerates `**Label**:` and `Label:**`
const LABEL_COLON: &str = r"[ \t]*(?:\*\*|__)?[ \t]*:(?:\*\*|__)?";
// Trailing emphasis after a colon-less label
const LABEL_SUFFIX: &str = r"(?:[ \t]*(?:\*\*|__))?";

/// Byte span of a label located in a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelMatch {
    pub start: usize,
    pub end: usize,
}

/// A compiled, drift-tolerant matcher for one human-authored label such as `"Meta title:"`.
///
/// Matching runs in two tiers:
/// 1. the label as written, case-insensitive, each colon allowing surrounding whitespace;
/// 2. the label with every colon removed, so `Meta title Hello` and `Meta titleHello`
///    still locate `Meta title:`.
///
/// A label with no colon only has the first tier. A label with no words never matches.
#[derive(Debug, Clone)]
pub struct LabelPattern {
    label: String,
    exact: Option<Regex>,
    colon_stripped: Option<Regex>,
}

impl LabelPattern {
    pub fn new(label: &str) -> Result<Self, ExtractError> {
        let exact = compile(label_pattern(label, true))?;
        let colon_stripped = if label.contains(':') {
            compile(label_pattern(label, false))?
        } else {
            None
        };

        Ok(Self {
            label: label.to_string(),
            exact,
            colon_stripped,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Locates the label at or after `search_from`.
    /// Returns `None` when the label is absent or `search_from` is not a valid offset.
    pub fn find(&self, document: &str, search_from: usize) -> Option<LabelMatch> {
        if search_from > document.len() || !document.is_char_boundary(search_from) {
            tracing::trace!("Search offset {} is outside the document for label '{}'", search_from, self.label);
            return None;
        }

        let tiers = [("exact", &self.exact), ("colon-stripped", &self.colon_stripped)];
        for (tier, re) in tiers {
            let Some(re) = re else { continue };
            if let Some(m) = re.find_at(document, search_from) {
                tracing::trace!("Matched label '{}' ({} tier) at {}..{}", self.label, tier, m.start(), m.end());
                return Some(LabelMatch {
                    start: m.start(),
                    end: m.end(),
                });
            }
        }

        tracing::trace!("Label '{}' not found after offset {}", self.label, search_from);
        None
    }

    /// Offset immediately after the matched label text.
    pub fn find_end(&self, document: &str, search_from: usize) -> Option<usize> {
        self.find(document, search_from).map(|m| m.end)
    }
}

/// One-shot label lookup: the offset right after `label` in `document`, or `None`.
pub fn find_label(document: &str, label: &str, search_from: usize) -> Option<usize> {
    match LabelPattern::new(label) {
        Ok(pattern) => pattern.find_end(document, search_from),
        Err(e) => {
            tracing::warn!("Could not build matcher for label '{}': {}", label, e);
            None
        }
    }
}

fn compile(pattern: Option<String>) -> Result<Option<Regex>, ExtractError> {
    pattern
        .map(|p| Regex::new(&p).map_err(|e| ExtractError::RegexError(format!("'{}': {}", p, e))))
        .transpose()
}

/// Builds the regex source for a label, or `None` if the label holds no words.
fn label_pattern(label: &str, keep_colons: bool) -> Option<String> {
    let label = label.trim();
    if !label.chars().any(|c| !c.is_whitespace() && c != ':') {
        return None;
    }

    let mut body = String::new();
    for (i, segment) in label.split(':').enumerate() {
        if i > 0 {
            body.push_str(if keep_colons { LABEL_COLON } else { r"\s*" });
        }
        let words: Vec<String> = segment.split_whitespace().map(regex::escape).collect();
        if words.is_empty() {
            continue;
        }
        if i > 0 && keep_colons {
            body.push_str(r"\s*");
        }
        body.push_str(&words.join(r"\s+"));
    }

    let starts_with_word = label
        .chars()
        .next()
        .map_or(false, |c| c.is_alphanumeric() || c == '_');
    let boundary = if starts_with_word { r"\b" } else { "" };
    let suffix = if keep_colons && label.contains(':') { "" } else { LABEL_SUFFIX };

    Some(format!("(?i){}{}{}{}", LABEL_PREFIX, boundary, body, suffix))
}
