//! The tool authorization gate.
//!
//! The gate sits between an agent framework and its tools: every tool call is
//! turned into an authorization check against the Denied service, and the
//! returned decision tells the framework whether to run the tool. Service
//! failures never surface as errors; the configured [`FailMode`] decides the
//! outcome instead, so the gate always produces a usable decision.

use serde_json::Value;

use denied_sdk::Denied;

use crate::config::{AuthorizationConfig, FailMode};
use crate::error::AuthorizationError;
use crate::mapper::ContextMapper;

/// The gate's verdict for a single tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolDecision {
    /// The tool call may proceed.
    Allow,

    /// The tool call must be blocked.
    Deny {
        /// Why the call was blocked, suitable for showing to the agent.
        reason: String,
    },
}

impl ToolDecision {
    /// True when the tool call may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, ToolDecision::Allow)
    }

    /// The denial reason, if this is a denial.
    pub fn reason(&self) -> Option<&str> {
        match self {
            ToolDecision::Allow => None,
            ToolDecision::Deny { reason } => Some(reason),
        }
    }
}

/// Authorizes tool calls against the Denied decision service.
///
/// # Example
///
/// ```no_run
/// use denied_agent::{AuthorizationConfig, ToolGate};
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AuthorizationConfig::builder()
///     .denied_url("http://localhost:8421")
///     .user_id("user-123")
///     .build()?;
/// let gate = ToolGate::new(config)?;
///
/// let decision = gate
///     .evaluate("Bash", Some(&json!({"command": "rm -rf build/"})))
///     .await;
///
/// if !decision.is_allowed() {
///     println!("blocked: {}", decision.reason().unwrap_or_default());
/// }
/// # Ok(())
/// # }
/// ```
pub struct ToolGate {
    client: Denied,
    config: AuthorizationConfig,
    mapper: ContextMapper,
}

impl ToolGate {
    /// Create a gate with a client built from the configuration.
    pub fn new(config: AuthorizationConfig) -> Result<Self, AuthorizationError> {
        let mut builder = Denied::builder()
            .base_url(&config.denied_url)
            .timeout(config.timeout)
            .max_retries(config.retry_attempts);
        if let Some(api_key) = &config.denied_api_key {
            builder = builder.api_key(api_key);
        }
        let client = builder
            .build()
            .map_err(|e| AuthorizationError::Configuration(e.to_string()))?;

        Ok(Self::with_client(client, config))
    }

    /// Create a gate around a preconfigured client.
    ///
    /// The client's own retry and timeout settings apply; the configuration
    /// still governs failure handling and context extraction.
    pub fn with_client(client: Denied, config: AuthorizationConfig) -> Self {
        let mapper = ContextMapper::new(config.clone());
        log::info!(
            "created tool authorization gate: url={}, fail_mode={}",
            client.base_url(),
            config.fail_mode
        );
        Self {
            client,
            config,
            mapper,
        }
    }

    /// Replace the context mapper, e.g. to attach custom properties.
    pub fn with_mapper(mut self, mapper: ContextMapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Evaluate a tool call.
    ///
    /// Builds the check request (inferring the semantic action from the tool
    /// name and arguments), asks the decision service, and maps the answer to
    /// a [`ToolDecision`]. When the service cannot be reached after the
    /// configured retries, [`FailMode::Closed`] denies and [`FailMode::Open`]
    /// allows.
    pub async fn evaluate(&self, tool_name: &str, tool_input: Option<&Value>) -> ToolDecision {
        let request = self.mapper.check_request(tool_name, tool_input);

        log::debug!(
            "checking authorization: tool={}, action={}, subject={}",
            tool_name,
            request.action,
            request.subject.id
        );

        match self.client.check_request(&request).await {
            Ok(response) if response.decision => {
                log::debug!("authorization allowed: tool={}", tool_name);
                ToolDecision::Allow
            }
            Ok(response) => {
                let reason = response
                    .reason()
                    .unwrap_or("Authorization denied")
                    .to_string();
                log::info!(
                    "authorization denied: tool={}, reason={}",
                    tool_name,
                    reason
                );
                ToolDecision::Deny { reason }
            }
            Err(err) => {
                log::warn!(
                    "authorization service unavailable: tool={}, fail_mode={}, error={}",
                    tool_name,
                    self.config.fail_mode,
                    err
                );
                match self.config.fail_mode {
                    FailMode::Closed => ToolDecision::Deny {
                        reason: "Authorization service unavailable (fail-closed mode)".to_string(),
                    },
                    FailMode::Open => {
                        log::warn!("allowing tool={} in fail-open mode", tool_name);
                        ToolDecision::Allow
                    }
                }
            }
        }
    }
}
