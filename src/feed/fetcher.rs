use crate::app::AppEvent;
use crate::feed::parser::parse_feed;
use crate::feed::types::FeedDocument;
use futures::StreamExt;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur while loading the feed document.
///
/// Every variant is recoverable: the UI shows the message and offers a retry.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the 30-second timeout
    #[error("Request timed out")]
    Timeout,
    /// Body was not a valid feed document
    #[error("Parse error: {0}")]
    Parse(String),
    /// Server returned 429 Too Many Requests after max retries
    #[error("Rate limited after {0} retries")]
    RateLimited(u32),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
    /// The fetch task panicked before producing a result
    #[error("Fetch task failed: {0}")]
    TaskPanicked(String),
}

/// Backoff settings for transient failures (429, 5xx, truncated bodies).
///
/// Delay before retry `n` (0-based) is `base_delay * 2^n`. Client errors
/// (4xx other than 429) and parse failures are never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// No retries at all; the first failure is final.
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Loads the feed document from a fixed URL.
///
/// Cheap to clone: `reqwest::Client` is reference counted internally, so a
/// clone can be moved into a spawned fetch task.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: reqwest::Client,
    url: String,
    retry: RetryPolicy,
}

impl FeedFetcher {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetches and parses the feed document.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Network`] - connection or TLS errors
    /// - [`FetchError::Timeout`] - request exceeded 30 seconds
    /// - [`FetchError::HttpStatus`] - non-2xx response (5xx only after retries)
    /// - [`FetchError::RateLimited`] - 429 response after max retries
    /// - [`FetchError::ResponseTooLarge`] - body exceeded 10MB
    /// - [`FetchError::IncompleteResponse`] - body shorter than Content-Length after retries
    /// - [`FetchError::Parse`] - body is not a feed document
    ///
    /// `event_tx` receives a [`AppEvent::FeedRateLimited`] before each 429 backoff.
    pub async fn fetch(
        &self,
        event_tx: Option<&mpsc::Sender<AppEvent>>,
    ) -> Result<FeedDocument, FetchError> {
        let mut retry_count = 0;

        let bytes = loop {
            let response = tokio::time::timeout(REQUEST_TIMEOUT, self.client.get(&self.url).send())
                .await
                .map_err(|_| FetchError::Timeout)?
                .map_err(FetchError::Network)?;

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                if retry_count >= self.retry.max_retries {
                    return Err(FetchError::RateLimited(self.retry.max_retries));
                }

                let delay = self.retry.delay_for(retry_count);
                tracing::warn!(
                    url = %self.url,
                    retry = retry_count,
                    delay_ms = delay.as_millis() as u64,
                    "Rate limited, backing off"
                );

                if let Some(tx) = event_tx {
                    let _ = tx
                        .send(AppEvent::FeedRateLimited {
                            delay_secs: delay.as_secs(),
                        })
                        .await;
                }

                tokio::time::sleep(delay).await;
                retry_count += 1;
                continue;
            }

            if status.is_server_error() {
                if retry_count >= self.retry.max_retries {
                    return Err(FetchError::HttpStatus(status.as_u16()));
                }

                let delay = self.retry.delay_for(retry_count);
                tracing::warn!(
                    url = %self.url,
                    status = %status,
                    retry = retry_count,
                    delay_ms = delay.as_millis() as u64,
                    "Server error, retrying after delay"
                );

                tokio::time::sleep(delay).await;
                retry_count += 1;
                continue;
            }

            // 4xx fails immediately
            if !status.is_success() {
                return Err(FetchError::HttpStatus(status.as_u16()));
            }

            match read_limited_bytes(response, MAX_FEED_SIZE).await {
                Ok(bytes) => break bytes,
                Err(FetchError::IncompleteResponse { expected, received }) => {
                    if retry_count >= self.retry.max_retries {
                        return Err(FetchError::IncompleteResponse { expected, received });
                    }

                    let delay = self.retry.delay_for(retry_count);
                    tracing::debug!(
                        url = %self.url,
                        expected,
                        received,
                        attempt = retry_count + 1,
                        "Retrying incomplete download"
                    );

                    tokio::time::sleep(delay).await;
                    retry_count += 1;
                    continue;
                }
                Err(e) => return Err(e),
            }
        };

        let doc = parse_feed(&bytes).map_err(|e| FetchError::Parse(format!("{:#}", e)))?;

        tracing::info!(
            url = %self.url,
            articles = doc.articles.len(),
            bytes = bytes.len(),
            "Feed loaded"
        );

        Ok(doc)
    }
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
