// src/research/openai.rs
use crate::config::ApiConfig;
use crate::research::client::{build_http_client, check_status, RetryPolicy};
use crate::research::models::{ChatMessage, ChatRequest, ChatResponse};
use crate::utils::error::ResearchError;

const SERVICE: &str = "OpenAI";

/// Sampling settings for one completion; unset values use the API defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompletionOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

/// Chat completions client.
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    retry: RetryPolicy,
}

impl ChatClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ResearchError> {
        Ok(Self {
            http: build_http_client(config.request_timeout)?,
            endpoint: format!("{}/v1/chat/completions", config.endpoints.openai.trim_end_matches('/')),
            api_key: config.openai_api_key.clone(),
            retry: config.retry,
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sends a system + user exchange and returns the first choice's text.
    pub async fn complete(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
        options: CompletionOptions,
    ) -> Result<String, ResearchError> {
        let request = ChatRequest {
            model,
            messages: vec![
                ChatMessage { role: "system", content: system_prompt },
                ChatMessage { role: "user", content: user_prompt },
            ],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };
        tracing::debug!("Requesting {} completion ({} prompt bytes)", model, system_prompt.len() + user_prompt.len());

        let (http, endpoint, api_key, request) = (&self.http, &self.endpoint, &self.api_key, &request);
        let content = self
            .retry
            .run(SERVICE, || async move {
                let response = http.post(endpoint).bearer_auth(api_key).json(request).send().await?;
                check_status(SERVICE, response.status())?;

                let body: ChatResponse = response
                    .json()
                    .await
                    .map_err(|e| ResearchError::Parse(format!("{} response: {}", SERVICE, e)))?;

                body.choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .filter(|content| !content.trim().is_empty())
                    .ok_or(ResearchError::EmptyResponse(SERVICE))
            })
            .await?;

        tracing::debug!("Received {} completion ({} bytes)", model, content.len());
        Ok(content)
    }
}
