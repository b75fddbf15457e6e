//! Request and response types for authorization checks
//!
//! These types follow the AuthZEN evaluation model: a [`Subject`] performs an
//! [`Action`] on a [`Resource`], optionally qualified by request context, and
//! the decision point answers with a boolean decision plus optional
//! explanation.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DeniedError;

/// Parse a `"type://id"` entity reference into its parts.
fn parse_entity_uri(s: &str) -> Result<(String, String), DeniedError> {
    match s.split_once("://") {
        Some((entity_type, id)) if !entity_type.is_empty() && !id.is_empty() => {
            Ok((entity_type.to_string(), id.to_string()))
        }
        _ => Err(DeniedError::InvalidUri(format!(
            "expected \"type://id\", got {:?}",
            s
        ))),
    }
}

/// The acting entity (user, service, agent) in an authorization check.
///
/// # Example
///
/// ```
/// use denied_sdk::Subject;
///
/// let subject = Subject::new("user", "alice").with_property("role", "admin");
///
/// // Or parse from a "type://id" reference
/// let subject: Subject = "user://alice".parse().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Type of the entity (e.g. `user`, `service`)
    #[serde(rename = "type")]
    pub subject_type: String,

    /// Unique identifier scoped to the type
    pub id: String,

    /// Additional properties of the entity
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Value>,
}

impl Subject {
    /// Create a subject with no extra properties
    pub fn new(subject_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            subject_type: subject_type.into(),
            id: id.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Attach a property to the subject
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Replace all properties on the subject
    pub fn with_properties(mut self, properties: BTreeMap<String, Value>) -> Self {
        self.properties = properties;
        self
    }
}

impl FromStr for Subject {
    type Err = DeniedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (subject_type, id) = parse_entity_uri(s)?;
        Ok(Self {
            subject_type,
            id,
            properties: BTreeMap::new(),
        })
    }
}

/// The entity being acted upon in an authorization check.
///
/// Construction mirrors [`Subject`]; a `"type://id"` reference parses via
/// [`FromStr`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Type of the entity (e.g. `document`, `tool`)
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Unique identifier scoped to the type
    pub id: String,

    /// Additional properties of the entity
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Value>,
}

impl Resource {
    /// Create a resource with no extra properties
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Attach a property to the resource
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Replace all properties on the resource
    pub fn with_properties(mut self, properties: BTreeMap<String, Value>) -> Self {
        self.properties = properties;
        self
    }
}

impl FromStr for Resource {
    type Err = DeniedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (resource_type, id) = parse_entity_uri(s)?;
        Ok(Self {
            resource_type,
            id,
            properties: BTreeMap::new(),
        })
    }
}

/// The operation being authorized.
///
/// Plain action names convert directly:
///
/// ```
/// use denied_sdk::Action;
///
/// let action: Action = "read".into();
/// assert_eq!(action.name, "read");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Name of the action (e.g. `read`, `delete`)
    pub name: String,

    /// Additional properties of the action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Value>>,
}

impl Action {
    /// Create an action with no extra properties
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: None,
        }
    }
}

impl From<&str> for Action {
    fn from(name: &str) -> Self {
        Action::new(name)
    }
}

impl From<String> for Action {
    fn from(name: String) -> Self {
        Action::new(name)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A single authorization check request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRequest {
    /// The subject performing the action
    pub subject: Subject,

    /// The resource being acted on
    pub resource: Resource,

    /// The action being performed
    pub action: Action,

    /// Additional context for the authorization check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl CheckRequest {
    /// Build a check request from its parts
    pub fn new(
        subject: Subject,
        action: impl Into<Action>,
        resource: Resource,
        context: Option<Value>,
    ) -> Self {
        Self {
            subject,
            resource,
            action: action.into(),
            context,
        }
    }
}

/// Explanation attached to an authorization decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResponseContext {
    /// The reason for the decision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// The rules that triggered the decision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<String>>,
}

/// The decision point's answer to a check request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Whether the action is allowed
    pub decision: bool,

    /// Additional context about the decision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<CheckResponseContext>,
}

impl CheckResponse {
    /// The reason the decision point gave, if any
    pub fn reason(&self) -> Option<&str> {
        self.context.as_ref().and_then(|c| c.reason.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_from_uri() {
        let subject: Subject = "user://alice".parse().unwrap();
        assert_eq!(subject.subject_type, "user");
        assert_eq!(subject.id, "alice");
        assert!(subject.properties.is_empty());
    }

    #[test]
    fn test_resource_from_uri() {
        let resource: Resource = "document://report-42".parse().unwrap();
        assert_eq!(resource.resource_type, "document");
        assert_eq!(resource.id, "report-42");
    }

    #[test]
    fn test_invalid_uri_rejected() {
        for bad in ["alice", "://alice", "user://", "user:alice", ""] {
            let result: Result<Subject, _> = bad.parse();
            assert!(
                matches!(result, Err(DeniedError::InvalidUri(_))),
                "expected InvalidUri for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_uri_id_may_contain_slashes() {
        let resource: Resource = "file://tmp/notes.txt".parse().unwrap();
        assert_eq!(resource.resource_type, "file");
        assert_eq!(resource.id, "tmp/notes.txt");
    }

    #[test]
    fn test_check_request_serialization() {
        let request = CheckRequest::new(
            Subject::new("user", "alice").with_property("role", "admin"),
            "read",
            Resource::new("document", "report-42"),
            None,
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["subject"]["type"], "user");
        assert_eq!(json["subject"]["id"], "alice");
        assert_eq!(json["subject"]["properties"]["role"], "admin");
        assert_eq!(json["resource"]["type"], "document");
        assert_eq!(json["action"]["name"], "read");
        // Absent context and empty properties stay off the wire
        assert!(json.get("context").is_none());
        assert!(json["resource"].get("properties").is_none());
    }

    #[test]
    fn test_check_response_deserialization() {
        let response: CheckResponse = serde_json::from_str(
            r#"{"decision": false, "context": {"reason": "no matching policy", "rules": ["default-deny"]}}"#,
        )
        .unwrap();

        assert!(!response.decision);
        assert_eq!(response.reason(), Some("no matching policy"));
        assert_eq!(
            response.context.unwrap().rules,
            Some(vec!["default-deny".to_string()])
        );
    }

    #[test]
    fn test_check_response_without_context() {
        let response: CheckResponse = serde_json::from_str(r#"{"decision": true}"#).unwrap();
        assert!(response.decision);
        assert_eq!(response.reason(), None);
    }

    #[test]
    fn test_action_from_str_conversion() {
        let action: Action = "delete".into();
        assert_eq!(action.name, "delete");
        assert_eq!(action.to_string(), "delete");
    }
}
