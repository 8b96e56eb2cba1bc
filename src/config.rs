// src/config.rs
use crate::research::client::{Backoff, RetryPolicy};
use crate::utils::AppError;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_MOZ_BASE_URL: &str = "https://api.moz.com";
pub const DEFAULT_SERPAPI_BASE_URL: &str = "https://serpapi.com";
pub const DEFAULT_FIRECRAWL_BASE_URL: &str = "https://api.firecrawl.dev";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

const DEFAULT_KEYWORD_MODEL: &str = "gpt-4";
const DEFAULT_OUTLINE_MODEL: &str = "gpt-4-1106-preview";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY_SECS: u64 = 2;
const DEFAULT_RETRY_MAX_DELAY_SECS: u64 = 30;

/// Base URLs of the external services. Overridable so tests can point at a mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub moz: String,
    pub serpapi: String,
    pub firecrawl: String,
    pub openai: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            moz: DEFAULT_MOZ_BASE_URL.to_string(),
            serpapi: DEFAULT_SERPAPI_BASE_URL.to_string(),
            firecrawl: DEFAULT_FIRECRAWL_BASE_URL.to_string(),
            openai: DEFAULT_OPENAI_BASE_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// Every service served from one base URL.
    pub fn all(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            moz: base.clone(),
            serpapi: base.clone(),
            firecrawl: base.clone(),
            openai: base,
        }
    }
}

/// Credentials and settings for the research pipeline.
/// Passed explicitly to each client; nothing here is global.
#[derive(Clone)]
pub struct ApiConfig {
    pub moz_api_token: String,
    pub openai_api_key: String,
    pub serpapi_key: String,
    pub firecrawl_api_key: String,
    pub endpoints: Endpoints,
    pub keyword_model: String,
    pub outline_model: String,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

// Keys stay out of logs
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("moz_api_token", &"<redacted>")
            .field("openai_api_key", &"<redacted>")
            .field("serpapi_key", &"<redacted>")
            .field("firecrawl_api_key", &"<redacted>")
            .field("endpoints", &self.endpoints)
            .field("keyword_model", &self.keyword_model)
            .field("outline_model", &self.outline_model)
            .field("request_timeout", &self.request_timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

impl ApiConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| AppError::Config(format!("Required environment variable '{}' is not set", key)))
        };

        let number = |key: &str, default: u64| match get(key) {
            Some(value) => value
                .parse::<u64>()
                .map_err(|_| AppError::Config(format!("{} must be a whole number, got '{}'", key, value))),
            None => Ok(default),
        };

        let defaults = Endpoints::default();
        let request_timeout = Duration::from_secs(number("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?);

        let attempts = number("RETRY_ATTEMPTS", u64::from(DEFAULT_RETRY_ATTEMPTS))?;
        let delay = Duration::from_secs(number("RETRY_DELAY_SECS", DEFAULT_RETRY_DELAY_SECS)?);
        let backoff = match get("RETRY_BACKOFF").map(|v| v.to_ascii_lowercase()).as_deref() {
            None | Some("fixed") => Backoff::Fixed(delay),
            Some("exponential") => Backoff::Exponential {
                base: delay,
                max: Duration::from_secs(number("RETRY_MAX_DELAY_SECS", DEFAULT_RETRY_MAX_DELAY_SECS)?),
            },
            Some(other) => {
                return Err(AppError::Config(format!(
                    "RETRY_BACKOFF must be 'fixed' or 'exponential', got '{}'",
                    other
                )))
            }
        };
        let retry = RetryPolicy {
            max_attempts: u32::try_from(attempts).unwrap_or(u32::MAX).max(1),
            backoff,
        };

        Ok(Self {
            moz_api_token: require("MOZ_API_TOKEN")?,
            openai_api_key: require("OPENAI_API_KEY")?,
            serpapi_key: require("SERPAPI_KEY")?,
            firecrawl_api_key: require("FIRECRAWL_API_KEY")?,
            endpoints: Endpoints {
                moz: get("MOZ_BASE_URL").unwrap_or(defaults.moz),
                serpapi: get("SERPAPI_BASE_URL").unwrap_or(defaults.serpapi),
                firecrawl: get("FIRECRAWL_BASE_URL").unwrap_or(defaults.firecrawl),
                openai: get("OPENAI_BASE_URL").unwrap_or(defaults.openai),
            },
            keyword_model: get("OPENAI_KEYWORD_MODEL").unwrap_or_else(|| DEFAULT_KEYWORD_MODEL.to_string()),
            outline_model: get("OPENAI_OUTLINE_MODEL").unwrap_or_else(|| DEFAULT_OUTLINE_MODEL.to_string()),
            request_timeout,
            retry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const KEYS: [(&str, &str); 4] = [
        ("MOZ_API_TOKEN", "moz"),
        ("OPENAI_API_KEY", "sk-test"),
        ("SERPAPI_KEY", "serp"),
        ("FIRECRAWL_API_KEY", "fc"),
    ];

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_lookup(lookup_from(&KEYS)).unwrap();

        assert_eq!(config.openai_api_key, "sk-test");
        assert_eq!(config.endpoints, Endpoints::default());
        assert_eq!(config.keyword_model, "gpt-4");
        assert_eq!(config.outline_model, "gpt-4-1106-preview");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn test_missing_or_blank_key_is_config_error() {
        let err = ApiConfig::from_lookup(lookup_from(&KEYS[..3])).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("FIRECRAWL_API_KEY")));

        let mut pairs = KEYS.to_vec();
        pairs[2] = ("SERPAPI_KEY", "   ");
        let err = ApiConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("SERPAPI_KEY")));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = KEYS.to_vec();
        pairs.push(("SERPAPI_BASE_URL", "http://localhost:9000"));
        pairs.push(("OPENAI_OUTLINE_MODEL", "gpt-4o"));
        pairs.push(("REQUEST_TIMEOUT_SECS", "5"));
        let config = ApiConfig::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.endpoints.serpapi, "http://localhost:9000");
        assert_eq!(config.endpoints.moz, DEFAULT_MOZ_BASE_URL);
        assert_eq!(config.outline_model, "gpt-4o");
        assert_eq!(config.request_timeout, Duration::from_secs(5));

        pairs.push(("REQUEST_TIMEOUT_SECS", "soon"));
        let lookup = lookup_from(&pairs);
        assert!(ApiConfig::from_lookup(lookup).is_err());
    }

    #[test]
    fn test_retry_settings() {
        let mut pairs = KEYS.to_vec();
        pairs.push(("RETRY_ATTEMPTS", "5"));
        pairs.push(("RETRY_BACKOFF", "Exponential"));
        pairs.push(("RETRY_DELAY_SECS", "1"));
        pairs.push(("RETRY_MAX_DELAY_SECS", "8"));
        let config = ApiConfig::from_lookup(lookup_from(&pairs)).unwrap();

        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(
            config.retry.backoff,
            Backoff::Exponential { base: Duration::from_secs(1), max: Duration::from_secs(8) }
        );

        let mut pairs = KEYS.to_vec();
        pairs.push(("RETRY_ATTEMPTS", "0"));
        let config = ApiConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.retry.max_attempts, 1);

        pairs.push(("RETRY_BACKOFF", "jittered"));
        let err = ApiConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("RETRY_BACKOFF")));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = ApiConfig::from_lookup(lookup_from(&KEYS)).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-test"));
        assert!(debug.contains("<redacted>"));
    }
}
