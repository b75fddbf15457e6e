//! Configuration for the tool authorization gate.

use std::time::Duration;

use crate::error::AuthorizationError;

/// Base URL used when neither the builder nor `DENIED_URL` supplies one.
///
/// Points at a local decision point, which is where development setups run
/// the service.
const DEFAULT_LOCAL_URL: &str = "http://localhost:8421";

/// Default timeout for authorization checks.
///
/// Deliberately short: the check sits on the hot path of every tool call.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of retry attempts for failed checks.
const DEFAULT_RETRY_ATTEMPTS: u32 = 2;

/// How to treat tool calls when the decision service cannot be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailMode {
    /// Deny tool execution when the service is unavailable (default, secure).
    #[default]
    Closed,

    /// Allow tool execution when the service is unavailable.
    ///
    /// Use only where availability matters more than enforcement.
    Open,
}

impl std::fmt::Display for FailMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailMode::Closed => f.write_str("closed"),
            FailMode::Open => f.write_str("open"),
        }
    }
}

/// Configuration for the authorization gate.
///
/// # Example
///
/// ```
/// use denied_agent::{AuthorizationConfig, FailMode};
///
/// let config = AuthorizationConfig::builder()
///     .denied_url("https://auth.company.com")
///     .fail_mode(FailMode::Closed)
///     .user_id("user-123")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct AuthorizationConfig {
    /// URL of the Denied authorization service.
    pub denied_url: String,

    /// API key for the Denied service.
    pub denied_api_key: Option<String>,

    /// How to handle authorization service failures.
    pub fail_mode: FailMode,

    /// Number of retry attempts for failed authorization checks.
    pub retry_attempts: u32,

    /// Timeout for authorization service requests.
    pub timeout: Duration,

    /// Whether to copy tool arguments into the resource properties.
    pub extract_tool_args: bool,

    /// User ID identifying the subject. Defaults to a generic agent identity.
    pub user_id: Option<String>,

    /// Session ID included in the subject properties.
    pub session_id: Option<String>,
}

impl AuthorizationConfig {
    /// Create a builder seeded with environment defaults.
    pub fn builder() -> AuthorizationConfigBuilder {
        AuthorizationConfigBuilder::new()
    }

    /// Build a configuration entirely from the environment.
    ///
    /// Reads `DENIED_URL` (falling back to a local decision point) and
    /// `DENIED_API_KEY`.
    pub fn from_env() -> Result<Self, AuthorizationError> {
        Self::builder().build()
    }
}

/// Builder for [`AuthorizationConfig`].
///
/// Unset fields fall back to environment variables and then to defaults at
/// [`build`](Self::build) time.
#[derive(Debug, Default)]
pub struct AuthorizationConfigBuilder {
    denied_url: Option<String>,
    denied_api_key: Option<String>,
    fail_mode: Option<FailMode>,
    retry_attempts: Option<u32>,
    timeout: Option<Duration>,
    extract_tool_args: Option<bool>,
    user_id: Option<String>,
    session_id: Option<String>,
}

impl AuthorizationConfigBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Set the Denied service URL (default: `DENIED_URL` or the local service)
    pub fn denied_url(mut self, url: impl Into<String>) -> Self {
        self.denied_url = Some(url.into());
        self
    }

    /// Set the API key (default: `DENIED_API_KEY`)
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.denied_api_key = Some(api_key.into());
        self
    }

    /// Set the failure handling mode (default: [`FailMode::Closed`])
    pub fn fail_mode(mut self, fail_mode: FailMode) -> Self {
        self.fail_mode = Some(fail_mode);
        self
    }

    /// Set the number of retry attempts (default: 2)
    pub fn retry_attempts(mut self, retry_attempts: u32) -> Self {
        self.retry_attempts = Some(retry_attempts);
        self
    }

    /// Set the request timeout (default: 5s)
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Control whether tool arguments land in resource properties (default: true)
    pub fn extract_tool_args(mut self, extract: bool) -> Self {
        self.extract_tool_args = Some(extract);
        self
    }

    /// Set the user ID for the subject
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Set the session ID for the subject properties
    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Build the configuration, applying environment and hard defaults.
    pub fn build(self) -> Result<AuthorizationConfig, AuthorizationError> {
        let denied_url = self
            .denied_url
            .or_else(|| std::env::var("DENIED_URL").ok())
            .unwrap_or_else(|| DEFAULT_LOCAL_URL.to_string());

        if denied_url.is_empty() {
            return Err(AuthorizationError::Configuration(
                "denied_url must be provided or DENIED_URL must be set".to_string(),
            ));
        }

        let denied_api_key = self
            .denied_api_key
            .or_else(|| std::env::var("DENIED_API_KEY").ok());

        Ok(AuthorizationConfig {
            denied_url,
            denied_api_key,
            fail_mode: self.fail_mode.unwrap_or_default(),
            retry_attempts: self.retry_attempts.unwrap_or(DEFAULT_RETRY_ATTEMPTS),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            extract_tool_args: self.extract_tool_args.unwrap_or(true),
            user_id: self.user_id,
            session_id: self.session_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = AuthorizationConfig::builder()
            .denied_url("http://auth.internal")
            .build()
            .unwrap();

        assert_eq!(config.denied_url, "http://auth.internal");
        assert_eq!(config.fail_mode, FailMode::Closed);
        assert_eq!(config.retry_attempts, 2);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert!(config.extract_tool_args);
        assert!(config.user_id.is_none());
        assert!(config.session_id.is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let config = AuthorizationConfig::builder()
            .denied_url("http://auth.internal")
            .api_key("key-123")
            .fail_mode(FailMode::Open)
            .retry_attempts(5)
            .timeout(Duration::from_secs(1))
            .extract_tool_args(false)
            .user_id("user-1")
            .session_id("session-1")
            .build()
            .unwrap();

        assert_eq!(config.denied_api_key.as_deref(), Some("key-123"));
        assert_eq!(config.fail_mode, FailMode::Open);
        assert_eq!(config.retry_attempts, 5);
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert!(!config.extract_tool_args);
        assert_eq!(config.user_id.as_deref(), Some("user-1"));
        assert_eq!(config.session_id.as_deref(), Some("session-1"));
    }

    #[test]
    fn test_builder_rejects_empty_url() {
        let result = AuthorizationConfig::builder().denied_url("").build();
        assert!(matches!(
            result,
            Err(AuthorizationError::Configuration(_))
        ));
    }

    #[test]
    fn test_fail_mode_display() {
        assert_eq!(FailMode::Closed.to_string(), "closed");
        assert_eq!(FailMode::Open.to_string(), "open");
    }
}
