//! Basic Authorization Check Example
//!
//! Performs a single permission check against the Denied service.
//!
//! Requires DENIED_URL (and usually DENIED_API_KEY) in the environment.
//!
//! Run with: cargo run --example basic_check

use denied_sdk::{Denied, Resource, Subject};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Denied::from_env()?;

    let response = client
        .check(
            Subject::new("user", "alice").with_property("role", "analyst"),
            "read",
            Resource::new("document", "quarterly-report"),
            None,
        )
        .await?;

    if response.decision {
        println!("allowed");
    } else {
        println!("denied: {}", response.reason().unwrap_or("no reason given"));
    }

    Ok(())
}
