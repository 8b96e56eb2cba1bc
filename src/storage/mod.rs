// src/storage/mod.rs
use crate::extractors::{ContentOutline, ExtractionResult};
use crate::utils::error::StorageError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const OUTLINE_FILE: &str = "outline.txt";
const SECTIONS_FILE: &str = "sections.json";
const STRUCTURED_FILE: &str = "outline.json";
const METADATA_FILE: &str = "metadata.json";

pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Directory for one query: `/base_dir/<query-slug>/`
    pub fn query_dir(&self, query: &str) -> PathBuf {
        self.base_dir.join(slugify(query))
    }

    fn ensure_query_dir(&self, query: &str) -> Result<PathBuf, StorageError> {
        let target_dir = self.query_dir(query);
        if !target_dir.exists() {
            fs::create_dir_all(&target_dir).map_err(StorageError::IoError)?;
        }
        Ok(target_dir)
    }

    /// Writes the raw document, its sections and the structured outline. Returns the query directory.
    pub fn save_outline(
        &self,
        query: &str,
        document: &str,
        sections: &ExtractionResult,
        outline: &ContentOutline,
    ) -> Result<PathBuf, StorageError> {
        let target_dir = self.ensure_query_dir(query)?;

        let document_path = target_dir.join(OUTLINE_FILE);
        fs::write(&document_path, document).map_err(StorageError::IoError)?;
        tracing::info!("Saved outline document to {}", document_path.display());

        write_json(&target_dir.join(SECTIONS_FILE), sections)?;
        write_json(&target_dir.join(STRUCTURED_FILE), outline)?;

        Ok(target_dir)
    }

    /// Saves metadata about the extraction in JSON format
    pub fn save_metadata(
        &self,
        query: &str,
        keywords: &[String],
        document: &str,
        sections: &ExtractionResult,
    ) -> Result<PathBuf, StorageError> {
        let target_dir = self.ensure_query_dir(query)?;
        let file_path = target_dir.join(METADATA_FILE);

        let metadata = serde_json::json!({
            "query": query,
            "keywords": keywords,
            "section_count": sections.len(),
            "sections_found": sections.len() - sections.missing().len(),
            "missing_sections": sections.missing(),
            "content_length": document.len(),
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });
        write_json(&file_path, &metadata)?;

        Ok(file_path)
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| StorageError::SerializationError(e.to_string()))?;
    fs::write(path, json).map_err(StorageError::IoError)?;
    tracing::info!("Saved {}", path.display());
    Ok(())
}

/// Lowercase ASCII alphanumerics joined by single dashes; "untitled" when nothing is left.
pub fn slugify(query: &str) -> String {
    let mut slug = String::with_capacity(query.len());
    for c in query.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');

    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::outline::outline_extractor;

    const DOCUMENT: &str = "Primary keyword: crm software\nSecondary keywords: crm tools, sales crm\n\
                            Meta title: CRM Software Guide\nMeta description: Compare tools.\nSlug: crm-software\n";

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("  Best CRM Software (2026)! "), "best-crm-software-2026");
        assert_eq!(slugify("crm/erp -- tools"), "crm-erp-tools");
        assert_eq!(slugify("???"), "untitled");
    }

    #[test]
    fn test_new_creates_base_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path().join("nested").join("output");

        StorageManager::new(&base).unwrap();
        assert!(base.is_dir());
    }

    #[test]
    fn test_save_outline_and_metadata() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = StorageManager::new(tmp.path()).unwrap();
        let sections = outline_extractor().extract(DOCUMENT).unwrap();
        let outline = ContentOutline::from_sections(&sections);

        let dir = storage.save_outline("CRM Software", DOCUMENT, &sections, &outline).unwrap();
        assert_eq!(dir, tmp.path().join("crm-software"));
        assert_eq!(fs::read_to_string(dir.join(OUTLINE_FILE)).unwrap(), DOCUMENT);

        let saved: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join(SECTIONS_FILE)).unwrap()).unwrap();
        assert_eq!(saved["Meta Title"], "CRM Software Guide");

        let saved: ContentOutline =
            serde_json::from_str(&fs::read_to_string(dir.join(STRUCTURED_FILE)).unwrap()).unwrap();
        assert_eq!(saved, outline);

        let keywords = vec!["crm software".to_string(), "crm tools".to_string()];
        let path = storage.save_metadata("CRM Software", &keywords, DOCUMENT, &sections).unwrap();
        let metadata: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();

        assert_eq!(metadata["query"], "CRM Software");
        assert_eq!(metadata["keywords"][1], "crm tools");
        assert_eq!(metadata["section_count"], 9);
        assert_eq!(metadata["sections_found"], 5);
        assert!(metadata["missing_sections"].as_array().unwrap().iter().any(|s| s == "Outline"));
        assert_eq!(metadata["content_length"], DOCUMENT.len());
        assert!(metadata["extraction_timestamp"].is_string());
    }
}
