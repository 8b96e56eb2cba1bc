// src/research/prompts.rs
use crate::extractors::outline::FOOTER_LABEL;
use crate::extractors::ContentIntent;
use crate::research::models::{KeywordData, OrganicResult, RelatedQuestion, RelatedSearch, SerpResponse};
use crate::research::page::PageSummary;
use chrono::{DateTime, TimeZone};
use std::fmt::Write;

const TOP_ARTICLES: usize = 5;

pub const KEYWORD_SYSTEM_PROMPT: &str = "You are an expert in SEO and keyword analysis. \
Given a list of suggested keywords and their metrics, determine the primary keyword and three relevant secondary keywords.\n\
- The primary keyword is the main search query that best represents the user's intent.\n\
- The secondary keywords should complement the primary keyword, enhance content optimization, and improve search ranking.\n\
- If a suggested secondary keyword is irrelevant, redundant, or suboptimal, replace it with a more suitable one.\n\
- If none of the suggested secondary keywords are appropriate, generate three new ones that match the primary keyword's intent and ranking potential.\n\
- The content intent should be one of: informational, commercial, transactional, or navigational.\n\
- Do not include numbers (e.g., 2025, top 10, best 5) or dates in the primary or secondary keywords.\n\n\
Format the output exactly as follows, one item per line:\n\
Primary keyword: <primary_keyword>\n\
Secondary keywords: <keyword1>, <keyword2>, <keyword3>\n\
Intent: <content_intent>";

/// User turn of the keyword-selection exchange.
pub fn keyword_user_prompt(query: &str, keywords: &[KeywordData]) -> String {
    let data = serde_json::to_string_pretty(keywords).unwrap_or_else(|_| "[]".to_string());
    format!(
        "Primary keyword: {}\nHere is the keyword data:\n{}\n\nIdentify three secondary keywords.",
        query, data
    )
}

/// System prompt asking for the line-labeled outline the extractor parses.
pub fn outline_system_prompt(topic: &str, secondary_keywords: &[String], intent: &ContentIntent) -> String {
    let secondary = secondary_keywords.join(", ");
    format!(
        r#"Create a comprehensive SEO article outline for: {topic}

Target Audience:
- Primary: Business owners, entrepreneurs, and startup founders in the USA
- Secondary: Business leaders and aspiring entrepreneurs
- Industry level: Intermediate

SEO Elements to Include:
1. Recommended meta title (50-60 characters)
2. Meta description (130-155 characters)
3. Primary keyword: {topic}
   Secondary keywords: {secondary}
4. Search intent: {intent}
5. Suggested internal linking topics and internal linking methods (pillar pages, related articles, product pages)
6. Types of external sources to reference
7. If a date is mentioned in the H1 tag use only the present year

Please structure the output exactly as follows:

Primary keyword: [Insert primary keyword]
Secondary keywords: [Insert secondary keywords]

Meta title: [Insert optimized title]
Meta description: [Insert compelling description]

Slug: [Insert primary keyword as slug]

Outline:

H1:Options [Provide 3-5 title options]

Introduction: [Outline approach and key points]

H2: [Main section title]
  - H3: [Subsection points]
  - H3: [Subsection points]
[Continue with all H2 and H3 sections]

Conclusion: [Outline approach]

FAQ:
1. [Question 1]
2. [Question 2]
3. [Question 3]
4. [Question 4]
5. [Question 5]

Writing Guidelines:
- Word count target: [Predict based on the competitor analysis]
- Content tone: Professional
- Statistics/data placement
- Expert quote areas
- Visual content opportunities
- Content upgrades/lead magnets
- Key takeaways
- Internal/external linking strategy

Article Type Prediction:

Based on SERP analysis, competitor data, and {topic}, the best article format for this topic is:
[Insert predicted article type - e.g., "How-To Guide," "Listicle," "Comparison Blog," "Technical Article," "Product Review"]

Justification:
- [Explain why this format is ideal based on user search behavior, top-ranking content structures, and competitor trends]
"#
    )
}

/// User turn of the outline exchange: search landscape plus competitor summaries.
pub fn outline_context(
    serp: &SerpResponse,
    intent: &ContentIntent,
    secondary_keywords: &[String],
    competitors: &[PageSummary],
) -> String {
    format!(
        "\nSearch Query: {}\n\nContent Parameters:\nArticle Intent: {}\nSecondary Keywords: {}\n\n\
         Top Ranking Articles:\n{}\n\nPeople Also Ask Questions:\n{}\n\nRelated Searches:\n{}\n\n\
         Competitor Content Analysis:\n{}\n",
        serp.search_parameters.q,
        intent,
        secondary_keywords.join(", "),
        format_top_articles(&serp.organic_results),
        format_questions(&serp.related_questions),
        format_related_searches(&serp.related_searches),
        format_competitors(competitors),
    )
}

fn format_top_articles(results: &[OrganicResult]) -> String {
    results
        .iter()
        .take(TOP_ARTICLES)
        .map(|r| format!("- {}\n  URL: {}", r.title, r.link))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_questions(questions: &[RelatedQuestion]) -> String {
    questions
        .iter()
        .map(|q| format!("- {}", q.question))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_related_searches(searches: &[RelatedSearch]) -> String {
    searches
        .iter()
        .map(|s| format!("- {}", s.query))
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_competitors(pages: &[PageSummary]) -> String {
    let mut out = String::new();
    for page in pages {
        // Writing to a String cannot fail
        let _ = write!(
            out,
            "\nURL: {}\nWord Count: {}\nHeadings: {}\nLists: {}, Tables: {}, Images: {}\n\
             Paragraphs: {} (avg {:.0} words)\n",
            page.url,
            page.word_count,
            page.headings.join(" | "),
            page.elements.lists,
            page.elements.tables,
            page.elements.images,
            page.structure.paragraphs,
            page.structure.avg_paragraph_words,
        );
    }
    out
}

/// The stored outline document: a title line, the model's outline, and a footer.
pub fn outline_document<Tz>(topic: &str, outline: &str, generated_at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "Content brief for: \"{}\"\n\n{}\n\n{} {}\nDate: {}\n",
        topic,
        outline.trim(),
        FOOTER_LABEL,
        topic,
        generated_at.format("%Y-%m-%d %H:%M:%S"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractors::ContentOutline;
    use crate::research::page::{ContentElements, ContentStructure};
    use chrono::Utc;

    #[test]
    fn test_outline_prompt_carries_template_labels() {
        let prompt = outline_system_prompt(
            "crm software",
            &["crm tools".to_string(), "sales crm".to_string()],
            &ContentIntent::Commercial,
        );

        assert!(prompt.contains("Secondary keywords: crm tools, sales crm"));
        assert!(prompt.contains("Search intent: commercial"));
        for label in ["Meta title:", "Slug:", "Outline:", "Writing Guidelines:", "Article Type Prediction:", "Justification:"] {
            assert!(prompt.contains(label), "missing {}", label);
        }
    }

    #[test]
    fn test_keyword_user_prompt_embeds_metrics() {
        let data = vec![KeywordData {
            keyword: "crm tools".into(),
            metrics: Default::default(),
        }];
        let prompt = keyword_user_prompt("crm", &data);

        assert!(prompt.starts_with("Primary keyword: crm\n"));
        assert!(prompt.contains("\"keyword\": \"crm tools\""));
    }

    #[test]
    fn test_context_sections() {
        let serp: SerpResponse = serde_json::from_value(serde_json::json!({
            "search_parameters": {"q": "crm software"},
            "organic_results": [{"title": "CRM guide", "link": "https://a.example/crm"}],
            "related_questions": [{"question": "What is CRM?"}],
            "related_searches": [{"query": "free crm"}]
        }))
        .unwrap();
        let competitors = vec![PageSummary {
            url: "https://a.example/crm".into(),
            word_count: 1800,
            headings: vec!["CRM guide".into(), "Pricing".into()],
            elements: ContentElements { lists: 2, ..Default::default() },
            structure: ContentStructure { paragraphs: 24, avg_paragraph_words: 61.4 },
        }];
        let context = outline_context(&serp, &ContentIntent::Informational, &["free crm".into()], &competitors);

        assert!(context.contains("Search Query: crm software"));
        assert!(context.contains("- CRM guide\n  URL: https://a.example/crm"));
        assert!(context.contains("- What is CRM?"));
        assert!(context.contains("- free crm"));
        assert!(context.contains("Word Count: 1800\nHeadings: CRM guide | Pricing\nLists: 2"));
        assert!(context.contains("Paragraphs: 24 (avg 61 words)"));
    }

    #[test]
    fn test_document_footer_stays_out_of_sections() {
        let body = "Slug: crm-software\n\nJustification:\n- Guides dominate the results";
        let at = Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap();
        let document = outline_document("crm software", body, &at);

        assert!(document.starts_with("Content brief for: \"crm software\""));
        assert!(document.ends_with("Date: 2026-10-17 09:30:00\n"));

        let outline = ContentOutline::parse(&document).unwrap();
        assert_eq!(outline.slug, "crm-software");
        assert_eq!(outline.justification, vec!["Guides dominate the results"]);
    }
}
