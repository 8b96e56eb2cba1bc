// src/research/pipeline.rs
use crate::config::ApiConfig;
use crate::extractors::outline::outline_extractor;
use crate::extractors::{ContentOutline, ExtractionResult, KeywordAnalysis};
use crate::research::client::RetryPolicy;
use crate::research::firecrawl::ScrapeClient;
use crate::research::models::{KeywordData, KeywordMetrics, OrganicResult};
use crate::research::moz::KeywordClient;
use crate::research::openai::{ChatClient, CompletionOptions};
use crate::research::page::PageSummary;
use crate::research::progress::ProgressStage;
use crate::research::prompts;
use crate::research::serp::{SerpClient, DEFAULT_NUM_RESULTS};
use crate::utils::error::ResearchError;
use crate::utils::AppError;
use serde::Serialize;
use std::collections::HashSet;

const MAX_SUGGESTIONS: usize = 10;
const SERP_CANDIDATES: usize = 7;
const MAX_COMPETITORS: usize = 5;
// Pages the scraping API cannot handle
const EXCLUDED_DOMAINS: [&str; 4] = ["youtube.com", "reddit.com", "twitter.com", "facebook.com"];

const OUTLINE_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: Some(0.7),
    max_tokens: Some(3000),
};

/// Everything produced by one research run.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchReport {
    pub query: String,
    pub keyword_data: Vec<KeywordData>,
    pub analysis: KeywordAnalysis,
    pub competitors: Vec<PageSummary>,
    pub document: String,
    pub sections: ExtractionResult,
    pub outline: ContentOutline,
}

/// Query in, structured content outline out.
pub struct ResearchPipeline {
    keywords: KeywordClient,
    serp: SerpClient,
    scraper: ScrapeClient,
    chat: ChatClient,
    keyword_model: String,
    outline_model: String,
}

impl ResearchPipeline {
    pub fn new(config: &ApiConfig) -> Result<Self, ResearchError> {
        Ok(Self {
            keywords: KeywordClient::new(config)?,
            serp: SerpClient::new(config)?,
            scraper: ScrapeClient::new(config)?,
            chat: ChatClient::new(config)?,
            keyword_model: config.keyword_model.clone(),
            outline_model: config.outline_model.clone(),
        })
    }

    /// Applies one retry policy to every client.
    pub fn with_retry(self, retry: RetryPolicy) -> Self {
        Self {
            keywords: self.keywords.with_retry(retry),
            serp: self.serp.with_retry(retry),
            scraper: self.scraper.with_retry(retry),
            chat: self.chat.with_retry(retry),
            ..self
        }
    }

    /// Runs the full research flow, reporting each stage to `on_progress` as it starts.
    pub async fn run<P>(&self, query: &str, mut on_progress: P) -> Result<ResearchReport, AppError>
    where
        P: FnMut(ProgressStage),
    {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::Config("Search query is empty".to_string()));
        }
        on_progress(ProgressStage::Starting);

        // 1. Keyword suggestions and their metrics
        on_progress(ProgressStage::KeywordSuggestions);
        let suggestions = self.keywords.suggestions(query).await?;
        if suggestions.is_empty() {
            return Err(AppError::Processing(format!("No suggested keywords found for '{}'", query)));
        }

        on_progress(ProgressStage::KeywordMetrics);
        let keyword_data = self.collect_metrics(&suggestions).await;
        tracing::info!("Collected metrics for {} of {} suggested keywords", keyword_data.len(), suggestions.len());

        // 2. Primary/secondary keyword choice
        on_progress(ProgressStage::KeywordAnalysis);
        let response = self
            .chat
            .complete(
                &self.keyword_model,
                prompts::KEYWORD_SYSTEM_PROMPT,
                &prompts::keyword_user_prompt(query, &keyword_data),
                CompletionOptions::default(),
            )
            .await?;
        let analysis = KeywordAnalysis::parse(&response, query)?;
        tracing::info!(
            "Primary keyword: '{}', secondary: {:?}, intent: {}",
            analysis.primary_keyword,
            analysis.secondary_keywords,
            analysis.intent
        );

        // 3. Search landscape for the primary keyword
        on_progress(ProgressStage::SearchResults);
        let serp = self.serp.search(&analysis.primary_keyword, DEFAULT_NUM_RESULTS).await?;

        on_progress(ProgressStage::AnalyzerSetup);
        let urls = select_competitor_urls(&serp.organic_results);
        tracing::info!("Selected {} competitor pages to scrape", urls.len());

        // 4. Competitor pages
        on_progress(ProgressStage::CompetitorScrape);
        let competitors: Vec<PageSummary> = self
            .scraper
            .scrape_all(&urls)
            .await
            .iter()
            .map(PageSummary::from_page)
            .collect();

        // 5. Outline synthesis and parsing
        on_progress(ProgressStage::OutlineSynthesis);
        let topic = serp.search_parameters.q.as_str();
        let system_prompt = prompts::outline_system_prompt(topic, &analysis.secondary_keywords, &analysis.intent);
        let context = prompts::outline_context(&serp, &analysis.intent, &analysis.secondary_keywords, &competitors);
        let body = self
            .chat
            .complete(&self.outline_model, &system_prompt, &context, OUTLINE_OPTIONS)
            .await?;

        let document = prompts::outline_document(topic, &body, &chrono::Local::now());
        let sections = outline_extractor().extract(&document)?;
        let missing = sections.missing();
        if !missing.is_empty() {
            tracing::warn!("Outline is missing sections: {:?}", missing);
        }
        let outline = ContentOutline::from_sections(&sections);

        on_progress(ProgressStage::Complete);
        Ok(ResearchReport {
            query: query.to_string(),
            keyword_data,
            analysis,
            competitors,
            document,
            sections,
            outline,
        })
    }

    /// Metrics for the first suggestions. Duplicates and keywords the API has no data for
    /// are skipped; a keyword whose lookup failed is kept with empty metrics.
    async fn collect_metrics(&self, suggestions: &[String]) -> Vec<KeywordData> {
        let mut seen = HashSet::new();
        let mut data = Vec::new();

        for keyword in suggestions.iter().take(MAX_SUGGESTIONS) {
            if !seen.insert(keyword.as_str()) {
                continue;
            }
            match self.keywords.metrics(keyword).await {
                Ok(Some(metrics)) => data.push(KeywordData {
                    keyword: keyword.clone(),
                    metrics,
                }),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!("Metrics lookup failed for '{}', keeping it without metrics: {}", keyword, e);
                    data.push(KeywordData {
                        keyword: keyword.clone(),
                        metrics: KeywordMetrics::default(),
                    });
                }
            }
        }

        data
    }
}

/// Up to five scrapeable links from the top organic results.
pub fn select_competitor_urls(results: &[OrganicResult]) -> Vec<String> {
    results
        .iter()
        .take(SERP_CANDIDATES)
        .map(|r| r.link.trim())
        .filter(|link| !link.is_empty())
        .filter(|link| {
            let lower = link.to_lowercase();
            !EXCLUDED_DOMAINS.iter().any(|domain| lower.contains(domain))
        })
        .take(MAX_COMPETITORS)
        .map(str::to_string)
        .collect()
}
