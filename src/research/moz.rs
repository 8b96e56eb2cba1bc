// src/research/moz.rs
use crate::config::ApiConfig;
use crate::research::client::{build_http_client, check_status, RetryPolicy};
use crate::research::models::{
    JsonRpcRequest, JsonRpcResponse, KeywordMetrics, KeywordParams, KeywordParamsData, MetricsResult,
    SerpQuery, SuggestionsResult,
};
use crate::utils::error::ResearchError;
use serde::de::DeserializeOwned;

const SERVICE: &str = "Moz";
const SUGGESTIONS_METHOD: &str = "data.keyword.suggestions.list";
const METRICS_METHOD: &str = "data.keyword.metrics.fetch";

/// Keyword suggestions and metrics over the Moz JSON-RPC API.
pub struct KeywordClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    retry: RetryPolicy,
}

impl KeywordClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ResearchError> {
        Ok(Self {
            http: build_http_client(config.request_timeout)?,
            endpoint: format!("{}/jsonrpc", config.endpoints.moz.trim_end_matches('/')),
            token: config.moz_api_token.clone(),
            retry: config.retry,
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Suggested keywords for a search query, in the order returned.
    pub async fn suggestions(&self, query: &str) -> Result<Vec<String>, ResearchError> {
        tracing::info!("Fetching keyword suggestions for: {}", query);
        let result: Option<SuggestionsResult> = self.call(SUGGESTIONS_METHOD, query).await?;
        let suggestions: Vec<String> = result
            .map(|r| r.suggestions)
            .unwrap_or_default()
            .into_iter()
            .map(|s| s.keyword.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        tracing::debug!("Received {} keyword suggestions", suggestions.len());
        Ok(suggestions)
    }

    /// Metrics for one keyword. `Ok(None)` when the API has no data for it (404);
    /// a response that carries no metrics gives empty metrics.
    pub async fn metrics(&self, keyword: &str) -> Result<Option<KeywordMetrics>, ResearchError> {
        let result: Option<MetricsResult> = self.call(METRICS_METHOD, keyword).await?;
        match result {
            Some(MetricsResult { keyword_metrics }) => Ok(Some(keyword_metrics.unwrap_or_default())),
            None => {
                tracing::warn!("No keyword metrics for: {} (skipping)", keyword);
                Ok(None)
            }
        }
    }

    /// One JSON-RPC call, retried per policy. A 404 means "no data" and yields `None`;
    /// a missing `result` is read as an empty one.
    async fn call<T: DeserializeOwned + Default>(&self, method: &str, keyword: &str) -> Result<Option<T>, ResearchError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: method,
            method,
            params: KeywordParams {
                data: KeywordParamsData {
                    serp_query: SerpQuery::us_desktop(keyword),
                },
            },
        };

        let (http, endpoint, token, request) = (&self.http, &self.endpoint, &self.token, &request);
        self.retry
            .run(SERVICE, || async move {
                let response = http
                    .post(endpoint)
                    .header("x-moz-token", token)
                    .json(request)
                    .send()
                    .await?;

                let status = response.status();
                if status == reqwest::StatusCode::NOT_FOUND {
                    return Ok(None);
                }
                check_status(SERVICE, status)?;

                let body: JsonRpcResponse<T> = response
                    .json()
                    .await
                    .map_err(|e| ResearchError::Parse(format!("{} {} response: {}", SERVICE, method, e)))?;
                if let Some(err) = body.error {
                    return Err(ResearchError::Parse(format!(
                        "{} {} returned JSON-RPC error {}: {}",
                        SERVICE, method, err.code, err.message
                    )));
                }
                Ok(Some(body.result.unwrap_or_default()))
            })
            .await
    }
}
