//! Error types for the agent integration.

use thiserror::Error;

/// Errors raised by the authorization integration.
#[derive(Debug, Error)]
pub enum AuthorizationError {
    /// An authorization check explicitly denied access.
    #[error("authorization denied: {reason}")]
    Denied {
        /// Reason given by the decision point, if any.
        reason: String,
    },

    /// The authorization service was unavailable or returned an error.
    #[error("authorization service error: {0}")]
    Service(#[from] denied_sdk::DeniedError),

    /// The integration was misconfigured.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl AuthorizationError {
    /// Create a denial error, substituting a generic reason when none exists.
    pub fn denied(reason: Option<&str>) -> Self {
        AuthorizationError::Denied {
            reason: reason.unwrap_or("Authorization denied").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_with_reason() {
        let err = AuthorizationError::denied(Some("missing role"));
        assert_eq!(err.to_string(), "authorization denied: missing role");
    }

    #[test]
    fn test_denied_without_reason() {
        let err = AuthorizationError::denied(None);
        assert_eq!(err.to_string(), "authorization denied: Authorization denied");
    }

    #[test]
    fn test_service_error_wraps_sdk_error() {
        let sdk_err = denied_sdk::DeniedError::Network("connection refused".to_string());
        let err: AuthorizationError = sdk_err.into();
        assert!(err.to_string().contains("connection refused"));
    }
}
