// src/utils/error.rs
use thiserror::Error;

// Errors raised while talking to the keyword, search, scraping and model APIs
#[derive(Error, Debug)]
pub enum ResearchError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("{service} returned HTTP {status}")]
    Http {
        service: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("{0} rejected the credentials (401 Unauthorized)")]
    Unauthorized(&'static str),

    #[error("Failed to parse API response: {0}")]
    Parse(String),

    #[error("{0} returned an empty response")]
    EmptyResponse(&'static str),

    #[error("{service} failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        service: &'static str,
        attempts: u32,
        last_error: String,
    },
}

impl ResearchError {
    /// Whether another attempt could plausibly succeed.
    /// Transport failures, throttling and server errors are retryable;
    /// auth, client and parse errors are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ResearchError::Network(e) => !e.is_decode() && !e.is_builder(),
            ResearchError::Http { status, .. } => {
                *status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            ResearchError::EmptyResponse(_) => true,
            ResearchError::Unauthorized(_)
            | ResearchError::Parse(_)
            | ResearchError::RetriesExhausted { .. } => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Regular expression error: {0}")]
    RegexError(String),

    #[error("Malformed document: {0}")]
    MalformedDocument(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Research API call failed: {0}")]
    Research(#[from] ResearchError),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
