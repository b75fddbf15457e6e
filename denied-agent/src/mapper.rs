//! Mapping from tool invocations to authorization check requests.

use std::collections::BTreeMap;

use serde_json::Value;

use denied_sdk::{CheckRequest, Resource, Subject};

use crate::action::classify_action;
use crate::config::AuthorizationConfig;

/// Subject id used when no user id is configured.
const DEFAULT_SUBJECT_ID: &str = "agent";

/// Builds [`CheckRequest`]s from tool invocations.
///
/// Agent frameworks report tool calls as a name plus structured arguments;
/// the mapper translates that event into the subject/action/resource triple
/// the decision point evaluates. Subject identity comes from the
/// configuration (the tool-call event itself carries no user context), the
/// resource is the tool, and the action is inferred from the tool name and
/// arguments.
#[derive(Debug, Clone)]
pub struct ContextMapper {
    config: AuthorizationConfig,
    subject_properties: BTreeMap<String, Value>,
    resource_properties: BTreeMap<String, Value>,
}

impl ContextMapper {
    /// Create a mapper with no custom properties.
    pub fn new(config: AuthorizationConfig) -> Self {
        Self {
            config,
            subject_properties: BTreeMap::new(),
            resource_properties: BTreeMap::new(),
        }
    }

    /// Attach custom properties to every subject (e.g. `role`).
    pub fn with_subject_properties(mut self, properties: BTreeMap<String, Value>) -> Self {
        self.subject_properties = properties;
        self
    }

    /// Attach custom properties to every resource (e.g. `scope`).
    pub fn with_resource_properties(mut self, properties: BTreeMap<String, Value>) -> Self {
        self.resource_properties = properties;
        self
    }

    /// Build the subject for a check.
    ///
    /// Identity is captured at configuration time; the configured user id
    /// (or a generic agent identity) becomes the subject id, and the
    /// configured ids are repeated in the properties for policy matching.
    pub fn subject(&self) -> Subject {
        let mut properties = self.subject_properties.clone();

        if let Some(user_id) = &self.config.user_id {
            properties.insert("user_id".to_string(), Value::from(user_id.clone()));
        }
        if let Some(session_id) = &self.config.session_id {
            properties.insert("session_id".to_string(), Value::from(session_id.clone()));
        }

        let subject_id = self
            .config
            .user_id
            .clone()
            .unwrap_or_else(|| DEFAULT_SUBJECT_ID.to_string());

        Subject::new("user", subject_id).with_properties(properties)
    }

    /// Build the resource for a tool invocation.
    pub fn resource(&self, tool_name: &str, tool_input: Option<&Value>) -> Resource {
        let mut properties = self.resource_properties.clone();
        properties.insert("tool_name".to_string(), Value::from(tool_name));

        if self.config.extract_tool_args {
            if let Some(input) = tool_input.filter(|input| !input.is_null()) {
                properties.insert("tool_input".to_string(), input.clone());
            }
        }

        Resource::new("tool", tool_name).with_properties(properties)
    }

    /// Build a complete check request for a tool invocation.
    pub fn check_request(&self, tool_name: &str, tool_input: Option<&Value>) -> CheckRequest {
        let subject = self.subject();
        let resource = self.resource(tool_name, tool_input);
        let action = classify_action(tool_name, tool_input);

        CheckRequest::new(subject, action, resource, None)
    }
}
