//! Agent framework integration for the Denied authorization service
//!
//! This crate turns tool-invocation events into authorization checks. Given
//! the tool name and arguments an agent framework reports before running a
//! tool, it infers the semantic action being performed (read, create, update,
//! delete, or execute), builds a check request, and asks the Denied decision
//! point whether the call is permitted.
//!
//! # Quick Start
//!
//! ```no_run
//! use denied_agent::{AuthorizationConfig, ToolGate};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads DENIED_URL / DENIED_API_KEY from the environment
//! let config = AuthorizationConfig::builder()
//!     .user_id("user-123")
//!     .build()?;
//! let gate = ToolGate::new(config)?;
//!
//! // Wire this into the framework's tool-permission hook
//! let decision = gate
//!     .evaluate("Bash", Some(&json!({"command": "cat /etc/passwd"})))
//!     .await;
//!
//! if decision.is_allowed() {
//!     // run the tool
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Action inference
//!
//! Policies are written against semantic actions, not tool names.
//! [`classify_action`] maps both built-in tool names (`Read`, `Write`,
//! `Edit`, ...) and conventional verb-prefixed names (`get_user`,
//! `delete_file`, ...) to one of the five actions. Shell commands are
//! classified from their command text, since a shell tool can do anything:
//!
//! ```
//! use denied_agent::{classify_action, ToolAction};
//! use serde_json::json;
//!
//! assert_eq!(classify_action("get_user", None), ToolAction::Read);
//! assert_eq!(
//!     classify_action("Bash", Some(&json!({"command": "ls -la"}))),
//!     ToolAction::Read,
//! );
//! assert_eq!(
//!     classify_action("Bash", Some(&json!({"command": "rm file.txt"}))),
//!     ToolAction::Delete,
//! );
//! ```
//!
//! # Failure handling
//!
//! The gate never errors on a tool call. When the decision service is
//! unreachable, [`FailMode::Closed`] (the default) denies the call and
//! [`FailMode::Open`] lets it through.

mod action;
mod config;
mod error;
mod gate;
mod mapper;

pub use action::{classify_action, ToolAction};
pub use config::{AuthorizationConfig, AuthorizationConfigBuilder, FailMode};
pub use error::AuthorizationError;
pub use gate::{ToolDecision, ToolGate};
pub use mapper::ContextMapper;
