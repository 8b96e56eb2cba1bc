// src/research/page.rs
use crate::research::firecrawl::ScrapedPage;
use once_cell::sync::Lazy;
use scraper::{node::Node, ElementRef, Html, Selector};
use serde::Serialize;

const MAX_HEADINGS: usize = 8;

// --- CSS Selectors (Lazy Static) ---
static LIST_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("ul, ol").expect("Failed to compile LIST_SELECTOR"));
static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("Failed to compile TABLE_SELECTOR"));
static IMAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("Failed to compile IMAGE_SELECTOR"));
static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("Failed to compile LINK_SELECTOR"));
static HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6").expect("Failed to compile HEADING_SELECTOR")
});
static OUTLINE_HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1, h2, h3").expect("Failed to compile OUTLINE_HEADING_SELECTOR"));
static PARAGRAPH_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("Failed to compile PARAGRAPH_SELECTOR"));

/// Element counts of a competitor page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContentElements {
    pub lists: usize,
    pub tables: usize,
    pub images: usize,
    pub links: usize,
    pub headings: usize,
}

/// Paragraph count and mean paragraph length in words.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentStructure {
    pub paragraphs: usize,
    pub avg_paragraph_words: f64,
}

impl ContentStructure {
    fn from_word_counts<I: IntoIterator<Item = usize>>(counts: I) -> Self {
        let counts: Vec<usize> = counts.into_iter().filter(|&n| n > 0).collect();
        if counts.is_empty() {
            return Self::default();
        }
        let total: usize = counts.iter().sum();
        Self {
            paragraphs: counts.len(),
            avg_paragraph_words: total as f64 / counts.len() as f64,
        }
    }
}

/// Shape of a competitor page, summarized for the outline prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSummary {
    pub url: String,
    pub word_count: usize,
    pub headings: Vec<String>,
    pub elements: ContentElements,
    pub structure: ContentStructure,
}

impl PageSummary {
    /// Summarizes HTML with `scraper`; markdown or plain text only gets a word count.
    pub fn from_page(page: &ScrapedPage) -> Self {
        if !looks_like_html(&page.content) {
            // Blank lines separate markdown paragraphs
            let blocks = page.content.split("\n\n").map(|block| block.split_whitespace().count());
            return Self {
                url: page.url.clone(),
                word_count: page.content.split_whitespace().count(),
                headings: Vec::new(),
                elements: ContentElements::default(),
                structure: ContentStructure::from_word_counts(blocks),
            };
        }

        let document = Html::parse_document(&page.content);
        let headings = document
            .select(&OUTLINE_HEADING_SELECTOR)
            .map(|h| h.text().collect::<Vec<_>>().join(" "))
            .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|text| !text.is_empty())
            .take(MAX_HEADINGS)
            .collect();

        Self {
            url: page.url.clone(),
            word_count: visible_word_count(&document),
            headings,
            elements: ContentElements {
                lists: document.select(&LIST_SELECTOR).count(),
                tables: document.select(&TABLE_SELECTOR).count(),
                images: document.select(&IMAGE_SELECTOR).count(),
                links: document.select(&LINK_SELECTOR).count(),
                headings: document.select(&HEADING_SELECTOR).count(),
            },
            structure: ContentStructure::from_word_counts(
                document
                    .select(&PARAGRAPH_SELECTOR)
                    .map(|p| p.text().flat_map(str::split_whitespace).count()),
            ),
        }
    }
}

fn looks_like_html(content: &str) -> bool {
    let head = content.trim_start();
    head.starts_with('<') || content.contains("</")
}

/// Words in text nodes outside `<script>`, `<style>` and `<noscript>`.
fn visible_word_count(document: &Html) -> usize {
    document
        .root_element()
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text_node) => {
                let hidden = node
                    .parent()
                    .and_then(ElementRef::wrap)
                    .map_or(false, |el| matches!(el.value().name(), "script" | "style" | "noscript"));
                (!hidden).then(|| text_node.text.split_whitespace().count())
            }
            _ => None,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(content: &str) -> ScrapedPage {
        ScrapedPage {
            url: "https://a.example/crm".to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_html_summary() {
        let html = r#"
            <!DOCTYPE html>
            <html><head><title>CRM</title><style>body { color: red; }</style></head><body>
            <h1>Best CRM   Software</h1>
            <p>Pick a CRM that fits your team.</p>
            <script>var tracking = "ignore these words";</script>
            <h2>Pricing</h2>
            <ul><li>Free tier</li><li>Pro tier</li></ul>
            <table><tr><td>Plan</td></tr></table>
            <img src="a.png"/><a href="/x">Compare plans</a>
            <h4>Footnote</h4>
            </body></html>
        "#;
        let summary = PageSummary::from_page(&page(html));

        assert_eq!(summary.headings, vec!["Best CRM Software", "Pricing"]);
        assert_eq!(
            summary.elements,
            ContentElements { lists: 1, tables: 1, images: 1, links: 1, headings: 3 }
        );
        // CRM(title) + 3 + 7 + 1 + 2 + 2 + 1 + 2 + 1
        assert_eq!(summary.word_count, 20);
        assert_eq!(summary.structure, ContentStructure { paragraphs: 1, avg_paragraph_words: 7.0 });
    }

    #[test]
    fn test_paragraph_structure_skips_empty_paragraphs() {
        let html = "<html><body><p>One two three four</p><p>  </p><p>Five <b>six</b></p></body></html>";
        let summary = PageSummary::from_page(&page(html));

        assert_eq!(summary.structure, ContentStructure { paragraphs: 2, avg_paragraph_words: 3.0 });
    }

    #[test]
    fn test_markdown_summary() {
        let summary = PageSummary::from_page(&page("# CRM guide\n\nPick the right tool."));

        assert_eq!(summary.word_count, 7);
        assert_eq!(summary.structure, ContentStructure { paragraphs: 2, avg_paragraph_words: 3.5 });
        assert!(summary.headings.is_empty());
        assert_eq!(summary.elements, ContentElements::default());
    }
}
