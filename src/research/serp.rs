// src/research/serp.rs
use crate::config::ApiConfig;
use crate::research::client::{build_http_client, check_status, RetryPolicy};
use crate::research::models::SerpResponse;
use crate::utils::error::ResearchError;

const SERVICE: &str = "SerpAPI";
pub const DEFAULT_NUM_RESULTS: u32 = 10;

/// Google results through SerpAPI.
pub struct SerpClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    retry: RetryPolicy,
}

impl SerpClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ResearchError> {
        Ok(Self {
            http: build_http_client(config.request_timeout)?,
            endpoint: format!("{}/search", config.endpoints.serpapi.trim_end_matches('/')),
            api_key: config.serpapi_key.clone(),
            retry: config.retry,
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Search results for `query` (US English). A rejected key fails without retrying.
    pub async fn search(&self, query: &str, num_results: u32) -> Result<SerpResponse, ResearchError> {
        tracing::info!("Fetching search results for: {}", query);
        let num = num_results.to_string();
        let params = [
            ("q", query),
            ("api_key", self.api_key.as_str()),
            ("num", num.as_str()),
            ("hl", "en"),
            ("gl", "us"),
        ];

        let (http, endpoint, params) = (&self.http, &self.endpoint, &params);
        let mut serp: SerpResponse = self
            .retry
            .run(SERVICE, || async move {
                let response = http.get(endpoint).query(params).send().await?;
                let status = response.status();
                tracing::debug!("{} response status: {}", SERVICE, status);
                check_status(SERVICE, status)?;

                response
                    .json::<SerpResponse>()
                    .await
                    .map_err(|e| ResearchError::Parse(format!("{} response: {}", SERVICE, e)))
            })
            .await?;

        if serp.search_parameters.q.is_empty() {
            serp.search_parameters.q = query.to_string();
        }
        tracing::info!(
            "Received {} organic results, {} related questions",
            serp.organic_results.len(),
            serp.related_questions.len()
        );
        Ok(serp)
    }
}
