// src/research/models.rs
use serde::{Deserialize, Serialize};
use serde_json::Number;

// --- Keyword metrics API (JSON-RPC 2.0) ---

#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: &'a str,
    pub method: &'a str,
    pub params: KeywordParams<'a>,
}

#[derive(Debug, Serialize)]
pub struct KeywordParams<'a> {
    pub data: KeywordParamsData<'a>,
}

#[derive(Debug, Serialize)]
pub struct KeywordParamsData<'a> {
    pub serp_query: SerpQuery<'a>,
}

/// Keyword lookups are always US English desktop Google results.
#[derive(Debug, Serialize)]
pub struct SerpQuery<'a> {
    pub keyword: &'a str,
    pub locale: &'static str,
    pub device: &'static str,
    pub engine: &'static str,
}

impl<'a> SerpQuery<'a> {
    pub fn us_desktop(keyword: &'a str) -> Self {
        Self {
            keyword,
            locale: "en-US",
            device: "desktop",
            engine: "google",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SuggestionsResult {
    #[serde(default)]
    pub suggestions: Vec<KeywordSuggestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeywordSuggestion {
    pub keyword: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct MetricsResult {
    pub keyword_metrics: Option<KeywordMetrics>,
}

/// Metrics as reported; any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordMetrics {
    pub volume: Option<Number>,
    pub difficulty: Option<Number>,
    pub organic_ctr: Option<Number>,
    pub priority: Option<Number>,
}

/// A suggested keyword with its metrics, as handed to the keyword-selection prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordData {
    pub keyword: String,
    #[serde(flatten)]
    pub metrics: KeywordMetrics,
}

// --- Search results API ---

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SerpResponse {
    #[serde(default)]
    pub search_parameters: SearchParameters,
    #[serde(default)]
    pub organic_results: Vec<OrganicResult>,
    #[serde(default)]
    pub related_questions: Vec<RelatedQuestion>,
    #[serde(default)]
    pub related_searches: Vec<RelatedSearch>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParameters {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganicResult {
    pub position: Option<u32>,
    pub title: String,
    pub link: String,
    pub displayed_link: String,
    pub date: String,
    pub snippet: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedQuestion {
    pub question: String,
    pub snippet: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelatedSearch {
    pub query: String,
}

// --- Scraping API ---

#[derive(Debug, Serialize)]
pub struct ScrapeRequest<'a> {
    pub url: &'a str,
    pub formats: [&'static str; 2],
}

#[derive(Debug, Deserialize)]
pub struct ScrapeResponse {
    #[serde(default)]
    pub success: bool,
    pub data: Option<ScrapeData>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScrapeData {
    pub html: Option<String>,
    pub markdown: Option<String>,
}

// --- Chat completion API ---

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponseMessage {
    pub content: Option<String>,
}
