// src/extractors/lists.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// A single leading bullet (`-`, `*`, `•`) or ordinal (`3.`, `3)`) followed by whitespace or end of line
static LIST_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[-*•]|\d+[.)])(?:\s+|$)").expect("Failed to compile LIST_MARKER_RE")
});

// `H2: Title` / `**H2:** Title` / `**H3**: Point`, level captured in group 1, text in group 2.
// The colon is required; prose such as "H2 tags should..." is not a heading.
static HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:\*\*|__)?H([23])(?:\*\*|__)?[ \t]*:(?:\*\*|__)?\s*(.*)$")
        .expect("Failed to compile HEADING_RE")
});

/// One `H2` heading of an outline body with its `H3` points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineHeading {
    pub h2: String,
    pub h3: Vec<String>,
}

/// Removes one leading bullet or ordinal marker; other lines come back unchanged.
pub fn strip_list_marker(line: &str) -> &str {
    match LIST_MARKER_RE.find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// Splits text into list items: one per non-blank line, markers stripped.
pub fn parse_list_items(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| strip_list_marker(line).trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Groups `H2:` lines and the `H3:` lines under them.
///
/// Lines are classified after stripping a list marker, so `  - H3: point` is an
/// H3 point. `H3` lines before the first `H2` and lines of any other kind are
/// ignored.
pub fn parse_headings(text: &str) -> Vec<OutlineHeading> {
    let mut headings: Vec<OutlineHeading> = Vec::new();

    for line in text.lines() {
        let line = strip_list_marker(line.trim());
        let Some(caps) = HEADING_RE.captures(line) else { continue };
        let body = caps.get(2).map_or("", |m| m.as_str()).trim();

        match &caps[1] {
            "2" => headings.push(OutlineHeading {
                h2: body.to_string(),
                h3: Vec::new(),
            }),
            _ => match headings.last_mut() {
                Some(current) if !body.is_empty() => current.h3.push(body.to_string()),
                Some(_) => {}
                None => tracing::trace!("Ignoring H3 line before any H2: '{}'", body),
            },
        }
    }

    headings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullets_and_ordinals() {
        assert_eq!(parse_list_items("- one\n- two\n3. three"), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_blank_lines_and_unmarked_lines() {
        let text = "\n  Word count target: 2000  \n\n* Content tone: Professional\n12) Key takeaways\n-\n";
        assert_eq!(
            parse_list_items(text),
            vec!["Word count target: 2000", "Content tone: Professional", "Key takeaways"]
        );
    }

    #[test]
    fn test_only_one_marker_is_stripped() {
        assert_eq!(strip_list_marker("- - nested"), "- nested");
        assert_eq!(strip_list_marker("1. 2. twice"), "2. twice");
        // Hyphenated words and decimals are not markers
        assert_eq!(strip_list_marker("-dash"), "-dash");
        assert_eq!(strip_list_marker("3.5 stars"), "3.5 stars");
    }

    #[test]
    fn test_nested_headings() {
        let headings = parse_headings("H2: A\nH3: a1\nH3: a2\nH2: B\nH3: b1");
        assert_eq!(
            headings,
            vec![
                OutlineHeading { h2: "A".into(), h3: vec!["a1".into(), "a2".into()] },
                OutlineHeading { h2: "B".into(), h3: vec!["b1".into()] },
            ]
        );

        let json = serde_json::to_string(&headings).unwrap();
        assert_eq!(json, r#"[{"h2":"A","h3":["a1","a2"]},{"h2":"B","h3":["b1"]}]"#);
    }

    #[test]
    fn test_bulleted_headings_and_noise() {
        let text = "Introduction: hook the reader\n\
                    H3: orphan point\n\
                    **H2:** Why it matters\n  - H3: Cost\n  - h3: Time\n\n\
                    H2: Getting started\n   * H3: Step one\nSome stray note\n\
                    Conclusion: wrap up";
        let headings = parse_headings(text);

        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].h2, "Why it matters");
        assert_eq!(headings[0].h3, vec!["Cost", "Time"]);
        assert_eq!(headings[1].h2, "Getting started");
        assert_eq!(headings[1].h3, vec!["Step one"]);
    }

    #[test]
    fn test_no_headings() {
        assert!(parse_headings("just prose\n- and a bullet").is_empty());
        assert!(parse_headings("H20 is not a heading").is_empty());
    }

    #[test]
    fn test_heading_prefix_needs_colon() {
        let headings = parse_headings("H2: Basics\nH3: Setup\nH2 and H3 tags should use the keyword\nH3 headings stay short");
        assert_eq!(
            headings,
            vec![OutlineHeading { h2: "Basics".into(), h3: vec!["Setup".into()] }]
        );
        assert_eq!(parse_headings("**H2**: Pricing")[0].h2, "Pricing");
    }
}
