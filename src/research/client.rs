// src/research/client.rs
use crate::utils::error::ResearchError;
use std::future::Future;
use std::time::Duration;

const USER_AGENT: &str = concat!("outline_research/", env!("CARGO_PKG_VERSION"));

/// Creates a reqwest client shared by one service wrapper.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, ResearchError> {
    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Maps a non-success status to the matching error. 401 is never retried.
pub fn check_status(service: &'static str, status: reqwest::StatusCode) -> Result<(), ResearchError> {
    if status.is_success() {
        return Ok(());
    }
    tracing::error!("HTTP error status: {} from {}", status, service);
    if status == reqwest::StatusCode::UNAUTHORIZED {
        tracing::warn!("Received 401 Unauthorized from {} - check the API key.", service);
        return Err(ResearchError::Unauthorized(service));
    }
    Err(ResearchError::Http { service, status })
}

/// Delay between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    Fixed(Duration),
    /// `base * 2^(attempt - 1)`, capped at `max`.
    Exponential { base: Duration, max: Duration },
}

impl Backoff {
    /// Delay after the given (1-based) failed attempt.
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { base, max } => {
                let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
                base.saturating_mul(factor).min(max)
            }
        }
    }
}

/// Capped retry around one API call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    /// 3 attempts, 2 seconds apart.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::Fixed(Duration::from_secs(2)),
        }
    }
}

impl RetryPolicy {
    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Backoff::Fixed(Duration::ZERO),
        }
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or the
    /// attempts run out. Exhaustion is reported as [`ResearchError::RetriesExhausted`].
    pub async fn run<T, F, Fut>(&self, service: &'static str, mut op: F) -> Result<T, ResearchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ResearchError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            tracing::debug!("{} attempt {}/{}", service, attempt, max_attempts);

            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => {
                    tracing::error!("{} failed with a non-retryable error: {}", service, e);
                    return Err(e);
                }
                Err(e) if attempt >= max_attempts => {
                    tracing::error!("{} failed after {} attempts: {}", service, attempt, e);
                    return Err(ResearchError::RetriesExhausted {
                        service,
                        attempts: attempt,
                        last_error: e.to_string(),
                    });
                }
                Err(e) => {
                    let delay = self.backoff.delay(attempt);
                    tracing::warn!("{} attempt {} failed ({}), retrying in {:?}", service, attempt, e, delay);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }
}
