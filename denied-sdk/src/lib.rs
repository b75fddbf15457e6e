//! Client SDK for the Denied authorization decision service
//!
//! Denied is a remote policy decision point (PDP): given a subject, an action,
//! and a resource, it answers whether the action is permitted and optionally
//! explains why. This crate provides the async client, the AuthZEN-style
//! request/response types, and retry handling for the outbound call.
//!
//! # Quick Start
//!
//! ```no_run
//! use denied_sdk::{Denied, Subject, Resource};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Requires DENIED_URL / DENIED_API_KEY environment variables
//! let client = Denied::from_env()?;
//!
//! let response = client
//!     .check(
//!         Subject::new("user", "alice").with_property("role", "analyst"),
//!         "read",
//!         Resource::new("document", "report-42"),
//!         None,
//!     )
//!     .await?;
//!
//! if !response.decision {
//!     println!("denied: {}", response.reason().unwrap_or("no reason given"));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Entity references
//!
//! Subjects and resources can be parsed from compact `"type://id"` strings:
//!
//! ```
//! use denied_sdk::{Subject, Resource};
//!
//! let subject: Subject = "user://alice".parse().unwrap();
//! let resource: Resource = "document://report-42".parse().unwrap();
//! ```
//!
//! # Bulk checks
//!
//! Multiple checks can travel in one request:
//!
//! ```no_run
//! use denied_sdk::{CheckRequest, Denied, Resource, Subject};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Denied::from_env()?;
//! let requests = vec![
//!     CheckRequest::new(
//!         Subject::new("user", "alice"),
//!         "read",
//!         Resource::new("document", "1"),
//!         None,
//!     ),
//!     CheckRequest::new(
//!         Subject::new("user", "alice"),
//!         "delete",
//!         Resource::new("document", "1"),
//!         None,
//!     ),
//! ];
//! let decisions = client.bulk_check(&requests).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Retry Configuration
//!
//! Transient failures (429, 5xx, network errors) are retried with exponential
//! backoff and jitter:
//!
//! ```
//! use denied_sdk::{Denied, RetryConfig};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Denied::builder()
//!     .base_url("http://localhost:8421")
//!     .max_retries(5)
//!     .build()?;
//!
//! // Or with full control
//! let client = Denied::builder()
//!     .base_url("http://localhost:8421")
//!     .retry_config(RetryConfig {
//!         max_retries: 3,
//!         base_delay: Duration::from_millis(100),
//!         max_delay: Duration::from_secs(5),
//!         jitter: 0.25,
//!     })
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// Domain modules
pub mod check;
mod client;
mod error;

// Client types
pub use client::{Denied, DeniedBuilder};

// Error types
pub use error::{ApiError, DeniedError, RetryConfig};

// Check types
pub use check::{Action, CheckRequest, CheckResponse, CheckResponseContext, Resource, Subject};
