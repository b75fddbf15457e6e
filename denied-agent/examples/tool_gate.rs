//! Tool Authorization Gate Example
//!
//! Demonstrates gating tool calls through the Denied decision service:
//!
//! 1. A read-only tool call (classified as `read`)
//! 2. A shell command that deletes files (classified as `delete`)
//! 3. An unknown custom tool (falls back to `execute`)
//!
//! Requires a running Denied service; point DENIED_URL at it (defaults to
//! http://localhost:8421).
//!
//! Run with: cargo run --example tool_gate

use denied_agent::{AuthorizationConfig, FailMode, ToolGate};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AuthorizationConfig::builder()
        .user_id("example-user")
        .fail_mode(FailMode::Closed)
        .build()?;
    let gate = ToolGate::new(config)?;

    let calls = [
        ("Read", json!({"file_path": "/tmp/notes.txt"})),
        ("Bash", json!({"command": "rm -rf build/"})),
        ("frobnicate_widgets", json!({})),
    ];

    for (tool_name, tool_input) in &calls {
        let decision = gate.evaluate(tool_name, Some(tool_input)).await;
        match decision.reason() {
            None => println!("{tool_name}: allowed"),
            Some(reason) => println!("{tool_name}: denied ({reason})"),
        }
    }

    Ok(())
}
