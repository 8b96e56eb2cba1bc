// src/extractors/section.rs

// --- Imports ---
use crate::extractors::labels::{LabelMatch, LabelPattern};
use crate::utils::error::ExtractError;
use serde::ser::{Serialize, SerializeMap, Serializer};

// --- Data Structures ---

/// One named span of a document: text after `start_label`, up to `end_label` if given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpec {
    pub name: String,
    pub start_label: String,
    pub end_label: Option<String>,
}

/// Ordered list of sections to pull out of a document.
///
/// Each end label is an independent lookup; it conventionally repeats the
/// next entry's start label but is never resolved against it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionDefinition {
    entries: Vec<SectionSpec>,
}

impl SectionDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a section (builder style).
    pub fn section(mut self, name: &str, start_label: &str, end_label: Option<&str>) -> Self {
        self.entries.push(SectionSpec {
            name: name.to_string(),
            start_label: start_label.to_string(),
            end_label: end_label.map(str::to_string),
        });
        self
    }

    pub fn entries(&self) -> &[SectionSpec] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N, S> FromIterator<(N, S, Option<S>)> for SectionDefinition
where
    N: AsRef<str>,
    S: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (N, S, Option<S>)>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |def, (name, start, end)| {
            def.section(name.as_ref(), start.as_ref(), end.as_ref().map(|e| e.as_ref()))
        })
    }
}

/// Section name to trimmed content, in definition order.
/// Every requested section is present; absent ones hold an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    sections: Vec<(String, String)>,
}

impl ExtractionResult {
    /// Content of a section, if it was requested.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, content)| content.as_str())
    }

    /// Content of a section, empty when absent or not requested.
    pub fn content(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sections.iter().map(|(n, c)| (n.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Names of sections whose content came back empty.
    pub fn missing(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, content)| content.is_empty())
            .map(|(name, _)| name)
            .collect()
    }
}

// Serialized as a JSON object that keeps definition order
impl Serialize for ExtractionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for (name, content) in &self.sections {
            map.serialize_entry(name, content)?;
        }
        map.end()
    }
}

struct CompiledSection {
    name: String,
    start: LabelPattern,
    end: Option<LabelPattern>,
}

// --- Main Extractor Structure ---

/// Applies a [`SectionDefinition`] to documents.
///
/// Label patterns are compiled once; the extractor holds no per-call state and
/// can be shared across threads.
pub struct SectionExtractor {
    sections: Vec<CompiledSection>,
    origin: usize,
}

impl SectionExtractor {
    pub fn new(definition: &SectionDefinition) -> Result<Self, ExtractError> {
        let sections = definition
            .entries()
            .iter()
            .map(|spec| {
                Ok(CompiledSection {
                    name: spec.name.clone(),
                    start: LabelPattern::new(&spec.start_label)?,
                    end: spec.end_label.as_deref().map(LabelPattern::new).transpose()?,
                })
            })
            .collect::<Result<Vec<_>, ExtractError>>()?;

        Ok(Self { sections, origin: 0 })
    }

    /// Sets the fixed offset every start label is searched from (default 0).
    pub fn with_origin(mut self, origin: usize) -> Self {
        self.origin = origin;
        self
    }

    /// Extracts every section of the definition from `document`.
    ///
    /// Start labels are each looked up from the same origin, so sections may
    /// overlap or appear in any order. A section whose start label is missing is
    /// recorded as empty; a missing end label extends the section to the end of
    /// the document. Only an empty document is an error.
    pub fn extract(&self, document: &str) -> Result<ExtractionResult, ExtractError> {
        if document.trim().is_empty() {
            return Err(ExtractError::MalformedDocument("document is empty".to_string()));
        }

        let sections = self
            .sections
            .iter()
            .map(|section| (section.name.clone(), self.extract_one(section, document).to_string()))
            .collect::<Vec<_>>();

        let result = ExtractionResult { sections };
        let missing = result.missing();
        if !missing.is_empty() {
            tracing::debug!("Sections with no content: {:?}", missing);
        }
        Ok(result)
    }

    /// Same as [`extract`](Self::extract) for raw bytes; non-UTF-8 input is malformed.
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<ExtractionResult, ExtractError> {
        let document = std::str::from_utf8(bytes)
            .map_err(|e| ExtractError::MalformedDocument(format!("not valid UTF-8 text: {}", e)))?;
        self.extract(document)
    }

    fn extract_one<'d>(&self, section: &CompiledSection, document: &'d str) -> &'d str {
        let Some(LabelMatch { end: content_start, .. }) = section.start.find(document, self.origin) else {
            tracing::debug!("Start label '{}' not found for section '{}'", section.start.label(), section.name);
            return "";
        };

        let content_end = match &section.end {
            Some(end_label) => match end_label.find(document, content_start) {
                Some(m) => m.start,
                None => {
                    tracing::debug!(
                        "End label '{}' not found for section '{}', taking rest of document",
                        end_label.label(),
                        section.name
                    );
                    document.len()
                }
            },
            None => document.len(),
        };

        document[content_start..content_end].trim()
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn meta_definition() -> SectionDefinition {
        SectionDefinition::new()
            .section("Meta Title", "Meta title:", Some("Meta description:"))
            .section("Meta Description", "Meta description:", Some("Slug:"))
            .section("Slug", "Slug:", None)
    }

    #[test]
    fn test_extracts_all_sections() {
        let extractor = SectionExtractor::new(&meta_definition()).unwrap();
        let result = extractor
            .extract("Meta title: Hello\nMeta description: World\nSlug: foo")
            .unwrap();

        let pairs: Vec<_> = result.iter().collect();
        assert_eq!(
            pairs,
            vec![("Meta Title", "Hello"), ("Meta Description", "World"), ("Slug", "foo")]
        );
    }

    #[test]
    fn test_missing_final_section_is_empty() {
        let extractor = SectionExtractor::new(&meta_definition()).unwrap();
        let result = extractor.extract("Meta title: Hello\nMeta description: World").unwrap();

        assert_eq!(result.get("Meta Title"), Some("Hello"));
        assert_eq!(result.get("Meta Description"), Some("World"));
        assert_eq!(result.get("Slug"), Some(""));
        assert_eq!(result.missing(), vec!["Slug"]);
    }

    #[test]
    fn test_missing_start_label_does_not_affect_others() {
        let extractor = SectionExtractor::new(&meta_definition()).unwrap();
        let result = extractor.extract("Meta description: World\nSlug: foo").unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result.content("Meta Title"), "");
        assert_eq!(result.content("Meta Description"), "World");
        assert_eq!(result.content("Slug"), "foo");
    }

    #[test]
    fn test_unmatched_end_label_runs_to_end_of_document() {
        let def = SectionDefinition::new().section("Intro", "Introduction:", Some("Conclusion:"));
        let extractor = SectionExtractor::new(&def).unwrap();
        let result = extractor.extract("Introduction:\n  first\n  second  \n").unwrap();

        assert_eq!(result.content("Intro"), "first\n  second");
    }

    #[test]
    fn test_lookups_are_independent_of_order() {
        // Slug is listed first in the definition but appears last in the document.
        let def = SectionDefinition::new()
            .section("Slug", "Slug:", None)
            .section("Meta Title", "Meta title:", Some("Slug:"));
        let extractor = SectionExtractor::new(&def).unwrap();
        let result = extractor.extract("Meta title: Hello\nSlug: foo").unwrap();

        assert_eq!(result.content("Slug"), "foo");
        assert_eq!(result.content("Meta Title"), "Hello");
    }

    #[test]
    fn test_origin_skips_leading_text() {
        let doc = "Slug: draft\n---\nSlug: final";
        let def = SectionDefinition::new().section("Slug", "Slug:", None);
        let origin = doc.find("---").unwrap();
        let extractor = SectionExtractor::new(&def).unwrap().with_origin(origin);

        assert_eq!(extractor.extract(doc).unwrap().content("Slug"), "final");
    }

    #[test]
    fn test_extraction_is_idempotent_and_leaves_document_intact() {
        let doc = String::from("Meta title:Hello\nmeta DESCRIPTION World\nSlug : foo");
        let before = doc.clone();
        let extractor = SectionExtractor::new(&meta_definition()).unwrap();

        let first = extractor.extract(&doc).unwrap();
        let second = extractor.extract(&doc).unwrap();

        assert_eq!(first, second);
        assert_eq!(doc, before);
        assert_eq!(first.content("Meta Title"), "Hello");
        assert_eq!(first.content("Meta Description"), "World");
        assert_eq!(first.content("Slug"), "foo");
    }

    #[test]
    fn test_empty_document_is_malformed() {
        let extractor = SectionExtractor::new(&meta_definition()).unwrap();
        assert!(matches!(extractor.extract(""), Err(ExtractError::MalformedDocument(_))));
        assert!(matches!(extractor.extract(" \n\t"), Err(ExtractError::MalformedDocument(_))));
    }

    #[test]
    fn test_non_utf8_bytes_are_malformed() {
        let extractor = SectionExtractor::new(&meta_definition()).unwrap();
        assert!(matches!(
            extractor.extract_bytes(&[0x53, 0x6c, 0xff, 0xfe]),
            Err(ExtractError::MalformedDocument(_))
        ));
        let ok = extractor.extract_bytes(b"Slug: foo").unwrap();
        assert_eq!(ok.content("Slug"), "foo");
    }

    #[test]
    fn test_definition_from_tuples() {
        let def: SectionDefinition = vec![
            ("Meta Title", "Meta title:", Some("Slug:")),
            ("Slug", "Slug:", None),
        ]
        .into_iter()
        .collect();

        assert_eq!(def.len(), 2);
        assert_eq!(def.entries()[1].end_label, None);
        assert_eq!(def.entries()[0].end_label.as_deref(), Some("Slug:"));
    }

    #[test]
    fn test_serializes_in_definition_order() {
        let extractor = SectionExtractor::new(&meta_definition()).unwrap();
        let result = extractor.extract("Slug: foo\nMeta title: Hello").unwrap();
        let json = serde_json::to_string(&result).unwrap();

        // Slug has no end label, so it runs to the end of the document.
        assert_eq!(json, r#"{"Meta Title":"Hello","Meta Description":"","Slug":"foo\nMeta title: Hello"}"#);
    }

    #[test]
    fn test_value_markup_before_end_label_is_kept() {
        let extractor = SectionExtractor::new(&meta_definition()).unwrap();

        let result = extractor
            .extract("Meta title: **Learn CRM**\nMeta description: World\nSlug: foo")
            .unwrap();
        assert_eq!(result.content("Meta Title"), "**Learn CRM**");

        let result = extractor
            .extract("Meta title: Learn C#\nMeta description: F# basics #\nSlug: foo")
            .unwrap();
        assert_eq!(result.content("Meta Title"), "Learn C#");
        assert_eq!(result.content("Meta Description"), "F# basics #");

        let result = extractor
            .extract("Meta title: Hello\nMeta description: __Great tools__ \n\nSlug: foo")
            .unwrap();
        assert_eq!(result.content("Meta Description"), "__Great tools__");
        assert_eq!(result.content("Slug"), "foo");
    }

    #[test]
    fn test_emphasized_labels_at_line_start() {
        let extractor = SectionExtractor::new(&meta_definition()).unwrap();
        let result = extractor
            .extract("**Meta title:** Hello\n## Meta description: World\n__Slug__: foo")
            .unwrap();

        assert_eq!(result.content("Meta Title"), "Hello");
        assert_eq!(result.content("Meta Description"), "World");
        assert_eq!(result.content("Slug"), "foo");
    }

    #[test]
    fn test_shared_across_threads() {
        let extractor = std::sync::Arc::new(SectionExtractor::new(&meta_definition()).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let extractor = std::sync::Arc::clone(&extractor);
                std::thread::spawn(move || {
                    let document = format!("Meta title: T{}\nMeta description: D{}\nSlug: s{}", i, i, i);
                    extractor.extract(&document).unwrap().content("Slug").to_string()
                })
            })
            .collect();

        let slugs: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(slugs, vec!["s0", "s1", "s2", "s3"]);
    }
}
