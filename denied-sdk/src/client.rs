//! Denied API client

use crate::check::{Action, CheckRequest, CheckResponse, Resource, Subject};
use crate::error::{ApiError, DeniedError, RetryConfig};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;

/// Default service base URL
const DEFAULT_BASE_URL: &str = "https://api.denied.dev";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-api-key";

/// Client for the Denied authorization decision service
///
/// # Example
///
/// ```no_run
/// use denied_sdk::{Denied, Subject, Resource};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // Reads DENIED_URL and DENIED_API_KEY from the environment
/// let client = Denied::from_env()?;
///
/// let response = client
///     .check(
///         Subject::new("user", "alice"),
///         "read",
///         Resource::new("document", "report-42"),
///         None,
///     )
///     .await?;
///
/// if response.decision {
///     println!("allowed");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Denied {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    retry_config: RetryConfig,
}

impl std::fmt::Debug for Denied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Denied")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("retry_config", &self.retry_config)
            .finish()
    }
}

impl Denied {
    /// Create a client for an explicit base URL with default settings
    pub fn new(base_url: impl Into<String>) -> Result<Self, DeniedError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a client from the environment
    ///
    /// Reads the base URL from `DENIED_URL` (falling back to the hosted
    /// service) and the API key from `DENIED_API_KEY` when set.
    pub fn from_env() -> Result<Self, DeniedError> {
        let mut builder = Self::builder();
        if let Ok(url) = std::env::var("DENIED_URL") {
            builder = builder.base_url(url);
        }
        if let Ok(api_key) = std::env::var("DENIED_API_KEY") {
            builder = builder.api_key(api_key);
        }
        builder.build()
    }

    /// Create a builder for more advanced configuration
    pub fn builder() -> DeniedBuilder {
        DeniedBuilder::new()
    }

    /// The base URL this client targets
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check whether a subject may perform an action on a resource
    ///
    /// Sends a single check to `POST /pdp/check` and returns the decision
    /// with any explanation the decision point attached.
    pub async fn check(
        &self,
        subject: Subject,
        action: impl Into<Action>,
        resource: Resource,
        context: Option<Value>,
    ) -> Result<CheckResponse, DeniedError> {
        let request = CheckRequest::new(subject, action, resource, context);
        self.check_request(&request).await
    }

    /// Check a pre-built [`CheckRequest`]
    pub async fn check_request(
        &self,
        request: &CheckRequest,
    ) -> Result<CheckResponse, DeniedError> {
        let url = format!("{}/pdp/check", self.base_url);
        self.post_with_retry(&url, request).await
    }

    /// Perform a set of checks in a single request
    ///
    /// Sends the batch to `POST /pdp/check/bulk`; the response carries one
    /// decision per request, in order.
    pub async fn bulk_check(
        &self,
        requests: &[CheckRequest],
    ) -> Result<Vec<CheckResponse>, DeniedError> {
        let url = format!("{}/pdp/check/bulk", self.base_url);
        self.post_with_retry(&url, &requests).await
    }

    fn build_headers(&self) -> Result<HeaderMap, DeniedError> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            let value = HeaderValue::from_str(api_key).map_err(|_| {
                DeniedError::Configuration("API key contains invalid header characters".to_string())
            })?;
            headers.insert(API_KEY_HEADER, value);
        }
        Ok(headers)
    }

    /// Execute a POST request with automatic retry
    ///
    /// This is a shared helper that handles:
    /// - Exponential backoff with jitter
    /// - Retry-After header parsing
    /// - Retryable error detection (429, 5xx, network errors)
    async fn post_with_retry<T, B>(&self, url: &str, body: &B) -> Result<T, DeniedError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let headers = self.build_headers()?;
        let mut last_error: Option<DeniedError> = None;

        for attempt in 0..=self.retry_config.max_retries {
            let request = self.client.post(url).headers(headers.clone()).json(body);

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let data = response.json::<T>().await.map_err(|e| {
                            DeniedError::InvalidResponse(format!(
                                "Failed to parse response: {}",
                                e
                            ))
                        })?;
                        return Ok(data);
                    }

                    let status_code = status.as_u16();
                    let retry_after = RetryConfig::parse_retry_after(response.headers());
                    let error_body = response.text().await.unwrap_or_default();
                    let error = parse_error_response(&error_body, status_code);

                    if attempt < self.retry_config.max_retries
                        && DeniedError::is_retryable_status(status_code)
                    {
                        let delay = retry_after
                            .unwrap_or_else(|| self.retry_config.delay_for_attempt(attempt));
                        tokio::time::sleep(delay).await;
                        last_error = Some(error);
                        continue;
                    }

                    return Err(error);
                }
                Err(e) => {
                    let error = DeniedError::from_reqwest_error(e);

                    if attempt < self.retry_config.max_retries && error.is_retryable() {
                        let delay = self.retry_config.delay_for_attempt(attempt);
                        tokio::time::sleep(delay).await;
                        last_error = Some(error);
                        continue;
                    }

                    return Err(error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DeniedError::Other("Max retries exceeded".to_string())))
    }
}

/// Parse an error response body into a structured error
fn parse_error_response(body: &str, status_code: u16) -> DeniedError {
    match serde_json::from_str::<ApiError>(body) {
        Ok(api_error) => DeniedError::from_api_error(&api_error, status_code),
        Err(_) => {
            // Non-JSON error body; classify on status alone
            let message = if body.is_empty() {
                format!("HTTP {}", status_code)
            } else {
                format!("HTTP {}: {}", status_code, body)
            };
            DeniedError::from_api_error(
                &ApiError {
                    error_type: None,
                    message,
                },
                status_code,
            )
        }
    }
}

/// Builder for Denied client configuration
///
/// Create with [`Denied::builder()`] and configure using the fluent API.
pub struct DeniedBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
    retry_config: Option<RetryConfig>,
}

impl DeniedBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout: None,
            retry_config: None,
        }
    }

    /// Set the service base URL (default: the hosted service)
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the API key sent in the `X-API-Key` header
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the request timeout (default: 60s)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the maximum number of retries (default: 2)
    ///
    /// Set to 0 to disable retries.
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        let mut config = self.retry_config.take().unwrap_or_default();
        config.max_retries = max_retries;
        self.retry_config = Some(config);
        self
    }

    /// Set custom retry configuration
    pub fn retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = Some(config);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<Denied, DeniedError> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if base_url.is_empty() {
            return Err(DeniedError::Configuration(
                "base URL must not be empty".to_string(),
            ));
        }
        // A trailing slash would produce "//pdp/check" paths
        let base_url = base_url.trim_end_matches('/').to_string();

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DeniedError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Denied {
            client,
            base_url,
            api_key: self.api_key,
            retry_config: self.retry_config.unwrap_or_default(),
        })
    }
}
