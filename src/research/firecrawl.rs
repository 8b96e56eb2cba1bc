// src/research/firecrawl.rs
use crate::config::ApiConfig;
use crate::research::client::{build_http_client, check_status, RetryPolicy};
use crate::research::models::{ScrapeRequest, ScrapeResponse};
use crate::utils::error::ResearchError;

const SERVICE: &str = "Firecrawl";

/// Raw content of one competitor page.
#[derive(Debug, Clone)]
pub struct ScrapedPage {
    pub url: String,
    pub content: String,
}

/// Page scraping through the Firecrawl API.
pub struct ScrapeClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    retry: RetryPolicy,
}

impl ScrapeClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ResearchError> {
        Ok(Self {
            http: build_http_client(config.request_timeout)?,
            endpoint: format!("{}/v1/scrape", config.endpoints.firecrawl.trim_end_matches('/')),
            api_key: config.firecrawl_api_key.clone(),
            retry: config.retry,
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Scrapes one URL. Content is the page HTML, or markdown when no HTML came back.
    pub async fn scrape(&self, url: &str) -> Result<ScrapedPage, ResearchError> {
        let request = ScrapeRequest {
            url,
            formats: ["markdown", "html"],
        };

        let (http, endpoint, api_key, request) = (&self.http, &self.endpoint, &self.api_key, &request);
        let content = self
            .retry
            .run(SERVICE, || async move {
                let response = http.post(endpoint).bearer_auth(api_key).json(request).send().await?;
                check_status(SERVICE, response.status())?;

                let body: ScrapeResponse = response
                    .json()
                    .await
                    .map_err(|e| ResearchError::Parse(format!("{} response: {}", SERVICE, e)))?;
                if !body.success {
                    let reason = body.error.unwrap_or_else(|| "unknown error".to_string());
                    return Err(ResearchError::Parse(format!("{} could not scrape {}: {}", SERVICE, url, reason)));
                }

                body.data
                    .and_then(|data| data.html.or(data.markdown))
                    .filter(|content| !content.trim().is_empty())
                    .ok_or(ResearchError::EmptyResponse(SERVICE))
            })
            .await?;

        tracing::info!("Successfully scraped: {} ({} bytes)", url, content.len());
        Ok(ScrapedPage {
            url: url.to_string(),
            content,
        })
    }

    /// Scrapes each URL in turn; pages that still fail after retries are skipped.
    pub async fn scrape_all(&self, urls: &[String]) -> Vec<ScrapedPage> {
        let mut pages = Vec::with_capacity(urls.len());
        for url in urls {
            match self.scrape(url).await {
                Ok(page) => pages.push(page),
                Err(e) => tracing::error!("Error scraping {}: {}", url, e),
            }
        }
        pages
    }
}
