//! Error types for the Denied SDK

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// API Error Types
// ============================================================================

/// Error payload returned by the Denied service
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    #[serde(alias = "detail")]
    pub message: String,
}

// ============================================================================
// SDK Error Types
// ============================================================================

/// Errors that can occur when talking to the Denied service
#[derive(Debug, Error)]
pub enum DeniedError {
    /// Authentication failed (invalid or missing API key)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limited by the service
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Service unavailable or overloaded
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Invalid request (bad parameters, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid response (failed to parse the service's reply)
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A `"type://id"` entity reference failed to parse
    #[error("Invalid entity reference: {0}")]
    InvalidUri(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error (bad base URL, etc.)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl DeniedError {
    /// Returns true if this error is retryable
    ///
    /// Retryable errors are rate limiting, service unavailability, and
    /// network failures. Everything else indicates a request the service
    /// already rejected deterministically.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DeniedError::RateLimited(_)
                | DeniedError::ServiceUnavailable(_)
                | DeniedError::Network(_)
        )
    }

    /// Returns true if this HTTP status code warrants a retry
    ///
    /// Connection-level failures are handled separately; for statuses this
    /// covers 408, 409, 429 and all 5xx.
    pub fn is_retryable_status(status_code: u16) -> bool {
        matches!(status_code, 408 | 409 | 429 | 500..=599)
    }

    /// Classify an error payload from the service into an error variant
    pub fn from_api_error(error: &ApiError, status_code: u16) -> Self {
        let msg = error.message.clone();

        match status_code {
            401 | 403 => DeniedError::Authentication(msg),
            429 => DeniedError::RateLimited(msg),
            503 => DeniedError::ServiceUnavailable(msg),
            400 | 404 | 422 => DeniedError::InvalidRequest(msg),
            500..=599 => DeniedError::ServiceUnavailable(msg),
            _ => DeniedError::Other(msg),
        }
    }

    /// Classify a transport-level error into an error variant
    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DeniedError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            DeniedError::Network(format!("Connection failed: {}", err))
        } else if err.is_request() {
            DeniedError::Network(format!("Request failed: {}", err))
        } else if let Some(status) = err.status() {
            match status.as_u16() {
                401 | 403 => DeniedError::Authentication(err.to_string()),
                429 => DeniedError::RateLimited(err.to_string()),
                500..=599 => DeniedError::ServiceUnavailable(err.to_string()),
                _ => DeniedError::Other(err.to_string()),
            }
        } else {
            DeniedError::Other(err.to_string())
        }
    }
}

/// Configuration for automatic retry behavior
///
/// Exponential backoff: base_delay × 2^attempt with jitter, capped at
/// max_delay. `Retry-After` response headers take precedence when present.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 2)
    pub max_retries: u32,

    /// Base delay for exponential backoff (default: 100ms)
    pub base_delay: Duration,

    /// Maximum delay between retries (default: 8s)
    pub max_delay: Duration,

    /// Jitter factor (0.0-1.0) to add randomness to delays (default: 0.25)
    pub jitter: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(8),
            jitter: 0.25,
        }
    }
}

impl RetryConfig {
    /// Create a new retry config with the specified max retries
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Disable retries
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Calculate the delay for a given retry attempt (0-indexed)
    ///
    /// Uses exponential backoff with jitter: base_delay × 2^attempt × (1 ± jitter)
    pub(crate) fn delay_for_attempt(&self, attempt: u32) -> Duration {
        use rand::Rng;

        let base = self.base_delay.as_secs_f64() * 2_f64.powi(attempt as i32);

        let jitter_range = base * self.jitter;
        let jitter = if jitter_range > 0.0 {
            rand::thread_rng().gen_range(-jitter_range..=jitter_range)
        } else {
            0.0
        };
        let delay_secs = (base + jitter).max(0.0);

        let delay = Duration::from_secs_f64(delay_secs);
        delay.min(self.max_delay)
    }

    /// Parse a retry delay from the `Retry-After` response header
    ///
    /// Only the seconds form is handled; HTTP dates are ignored.
    pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<Duration> {
        let value = headers.get(reqwest::header::RETRY_AFTER)?;
        let s = value.to_str().ok()?;
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable_rate_limited() {
        let err = DeniedError::RateLimited("Too many requests".to_string());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_is_retryable_service_unavailable() {
        let err = DeniedError::ServiceUnavailable("503 Service Unavailable".to_string());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_is_retryable_network() {
        let err = DeniedError::Network("Connection refused".to_string());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_is_not_retryable_authentication() {
        let err = DeniedError::Authentication("Invalid API key".to_string());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_is_not_retryable_invalid_request() {
        let err = DeniedError::InvalidRequest("Bad parameters".to_string());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_is_not_retryable_invalid_uri() {
        let err = DeniedError::InvalidUri("missing separator".to_string());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_retryable_status_codes() {
        assert!(DeniedError::is_retryable_status(408));
        assert!(DeniedError::is_retryable_status(409));
        assert!(DeniedError::is_retryable_status(429));
        assert!(DeniedError::is_retryable_status(500));
        assert!(DeniedError::is_retryable_status(503));
        assert!(!DeniedError::is_retryable_status(400));
        assert!(!DeniedError::is_retryable_status(401));
        assert!(!DeniedError::is_retryable_status(404));
    }

    #[test]
    fn test_from_api_error_authentication() {
        let api_error = ApiError {
            error_type: None,
            message: "Unauthorized".to_string(),
        };
        let err = DeniedError::from_api_error(&api_error, 401);
        assert!(matches!(err, DeniedError::Authentication(_)));

        let err = DeniedError::from_api_error(&api_error, 403);
        assert!(matches!(err, DeniedError::Authentication(_)));
    }

    #[test]
    fn test_from_api_error_rate_limited() {
        let api_error = ApiError {
            error_type: None,
            message: "Too many requests".to_string(),
        };
        let err = DeniedError::from_api_error(&api_error, 429);
        assert!(matches!(err, DeniedError::RateLimited(_)));
    }

    #[test]
    fn test_from_api_error_service_unavailable() {
        let api_error = ApiError {
            error_type: None,
            message: "down for maintenance".to_string(),
        };
        let err = DeniedError::from_api_error(&api_error, 503);
        assert!(matches!(err, DeniedError::ServiceUnavailable(_)));

        let err = DeniedError::from_api_error(&api_error, 500);
        assert!(matches!(err, DeniedError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_from_api_error_invalid_request() {
        let api_error = ApiError {
            error_type: None,
            message: "bad payload".to_string(),
        };
        for status in [400, 404, 422] {
            let err = DeniedError::from_api_error(&api_error, status);
            assert!(matches!(err, DeniedError::InvalidRequest(_)));
        }
    }

    #[test]
    fn test_from_api_error_unknown() {
        let api_error = ApiError {
            error_type: None,
            message: "I'm a teapot".to_string(),
        };
        let err = DeniedError::from_api_error(&api_error, 418);
        assert!(matches!(err, DeniedError::Other(_)));
    }

    #[test]
    fn test_retry_config_new() {
        let config = RetryConfig::new(5);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.base_delay, Duration::from_millis(100));
        assert_eq!(config.max_delay, Duration::from_secs(8));
    }

    #[test]
    fn test_retry_config_disabled() {
        let config = RetryConfig::disabled();
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn test_delay_for_attempt_respects_max() {
        let config = RetryConfig {
            max_retries: 10,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(5),
            jitter: 0.0,
        };

        // Attempt 10 would be 1s * 2^10 = 1024s, but capped at 5s
        let delay = config.delay_for_attempt(10);
        assert_eq!(delay, Duration::from_secs(5));
    }

    #[test]
    fn test_delay_for_attempt_with_jitter() {
        let config = RetryConfig {
            max_retries: 5,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(10),
            jitter: 0.25,
        };

        // First attempt should be around 100ms ± 25%
        let delay = config.delay_for_attempt(0);
        assert!(delay.as_millis() >= 75);
        assert!(delay.as_millis() <= 125);
    }

    #[test]
    fn test_error_display() {
        let err = DeniedError::Authentication("Invalid key".to_string());
        let display = format!("{}", err);
        assert!(display.contains("Authentication failed"));
        assert!(display.contains("Invalid key"));

        let err = DeniedError::InvalidUri("expected \"type://id\"".to_string());
        assert!(format!("{}", err).contains("Invalid entity reference"));
    }

    #[test]
    fn test_error_from_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: DeniedError = json_err.into();
        assert!(matches!(err, DeniedError::Json(_)));
    }
}
