//! Semantic action inference for tool invocations.
//!
//! Authorization policies are written in terms of semantic actions (read,
//! create, update, delete, execute), but agent frameworks hand us tool names.
//! This module bridges the two: [`classify_action`] maps a tool invocation to
//! exactly one [`ToolAction`] using ordered pattern tables with
//! first-match-wins semantics.
//!
//! Shell-execution tools get special treatment. A `Bash` invocation can read,
//! write, delete, or run arbitrary programs depending on its command string,
//! so when a command is present the command text is classified instead of the
//! tool name.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The semantic action inferred from a tool invocation.
///
/// Serializes to the lowercase action names the Denied policy language uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolAction {
    /// Inspect data without modifying it
    Read,
    /// Bring new data into existence
    Create,
    /// Modify existing data in place
    Update,
    /// Destroy existing data
    Delete,
    /// Run something; also the fallback when nothing more specific matches
    Execute,
}

impl ToolAction {
    /// Lowercase action name (`"read"`, `"create"`, ...)
    pub fn as_str(self) -> &'static str {
        match self {
            ToolAction::Read => "read",
            ToolAction::Create => "create",
            ToolAction::Update => "update",
            ToolAction::Delete => "delete",
            ToolAction::Execute => "execute",
        }
    }
}

impl std::fmt::Display for ToolAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ToolAction> for denied_sdk::Action {
    fn from(action: ToolAction) -> Self {
        denied_sdk::Action::new(action.as_str())
    }
}

/// The tool whose command string is classified instead of its name.
const SHELL_TOOL_NAME: &str = "bash";

lazy_static! {
    /// Rules matched against tool names, in priority order.
    ///
    /// Exact built-in tool names come first. Among the verb-fragment rules,
    /// ordering resolves overlaps between vocabularies:
    /// - execute fragments precede everything else so `run_query` is an
    ///   execution, not a read;
    /// - `add_*_member` and `share` precede the create fragments so
    ///   `add_team_member` resolves to update even though it contains `add`;
    /// - the generic read fragments come last because they are the most
    ///   likely to appear as incidental substrings of more specific verbs.
    ///
    /// Fragments only match as whole `_`-delimited tokens (or at the very
    /// start/end of the name), so `read` inside `already_created` never
    /// matches.
    static ref TOOL_NAME_RULES: Vec<(Regex, ToolAction)> = vec![
        // Built-in tool names (exact matches)
        (
            Regex::new(r"(?i)^(read|glob|grep|webfetch|websearch|listmcpresourcestool|readmcpresourcetool)$").unwrap(),
            ToolAction::Read,
        ),
        (
            Regex::new(r"(?i)^(write|notebookedit)$").unwrap(),
            ToolAction::Create,
        ),
        (
            Regex::new(r"(?i)^(edit|multiedit)$").unwrap(),
            ToolAction::Update,
        ),
        // Bash only reaches this rule when no command string was supplied
        (
            Regex::new(r"(?i)^(bash|task|todowrite|killshell)$").unwrap(),
            ToolAction::Execute,
        ),
        // Verb fragments (tool naming conventions such as `read_file`)
        (
            Regex::new(r"(?i)(^|_)(execute|run|call|invoke|batch)(_|$)").unwrap(),
            ToolAction::Execute,
        ),
        (
            Regex::new(r"(?i)(^|_)(share|add_.*_member)(_|$)").unwrap(),
            ToolAction::Update,
        ),
        (
            Regex::new(r"(?i)(^|_)(merge|fork|copy|move)(_|$)").unwrap(),
            ToolAction::Update,
        ),
        (
            Regex::new(r"(?i)(^|_)(lock|unlock|restore)(_|$)").unwrap(),
            ToolAction::Update,
        ),
        (
            Regex::new(r"(?i)(^|_)(delete|remove|drop|unshare)(_|$)").unwrap(),
            ToolAction::Delete,
        ),
        (
            Regex::new(r"(?i)(^|_)(update|modify|edit|change|set|patch|rename|mark)(_|$)").unwrap(),
            ToolAction::Update,
        ),
        (
            Regex::new(r"(?i)(^|_)(write|create|add|insert|post|save|send|upload)(_|$)").unwrap(),
            ToolAction::Create,
        ),
        (
            Regex::new(r"(?i)(^|_)(read|get|fetch|load|list|search|query|retrieve)(_|$)").unwrap(),
            ToolAction::Read,
        ),
    ];

    /// Rules matched against shell command text, in priority order.
    ///
    /// Output redirection comes first: `echo hello > file.txt` creates a file
    /// regardless of the verb. Destructive and mutating verbs precede the
    /// read-only inspection verbs, and `sed -i` must be caught before `sed`
    /// would fall through to the default. Verbs match on word boundaries so
    /// `rm` never fires inside `format`.
    ///
    /// Note the deliberate divergence from the tool-name table: shell `cp`
    /// genuinely creates a new file (create), while an API verb like
    /// `copy_item` is treated as a structural update.
    static ref SHELL_COMMAND_RULES: Vec<(Regex, ToolAction)> = vec![
        // Output redirection (`>` or `>>`), ignoring pipe-adjacent `>`
        (
            Regex::new(r"(^|[^|])>>?").unwrap(),
            ToolAction::Create,
        ),
        // File creation / copy / transfer
        (
            Regex::new(r"(?i)\b(cp|mv|mkdir|touch|rsync|scp)\b").unwrap(),
            ToolAction::Create,
        ),
        // Downloads that write to disk
        (
            Regex::new(r"(?i)\b(curl|wget)\b.*\s--?o(utput)?\b").unwrap(),
            ToolAction::Create,
        ),
        // Stream duplication / direct disk writes
        (
            Regex::new(r"(?i)\b(tee|dd)\b").unwrap(),
            ToolAction::Create,
        ),
        // Deletion
        (
            Regex::new(r"(?i)\b(rm|rmdir|unlink)\b").unwrap(),
            ToolAction::Delete,
        ),
        // In-place stream editing
        (
            Regex::new(r"(?i)\bsed\b.*\s-i\b").unwrap(),
            ToolAction::Update,
        ),
        // Permission / ownership changes
        (
            Regex::new(r"(?i)\b(chmod|chown|chgrp)\b").unwrap(),
            ToolAction::Update,
        ),
        // Read-only inspection
        (
            Regex::new(r"(?i)\b(cat|head|tail|less|more|grep|find|ls|pwd|whoami|id|echo|file|stat|wc|diff|which|type|env|printenv|date|uname)\b").unwrap(),
            ToolAction::Read,
        ),
    ];
}

/// Infer the semantic action for a tool invocation.
///
/// Total over its inputs: any tool name and any argument value produce
/// exactly one action, with [`ToolAction::Execute`] as the fallback. Matching
/// is case-insensitive throughout.
///
/// When `tool_name` is the shell-execution tool and `tool_input` carries a
/// non-empty `command` string, the command text is classified and the
/// tool-name rules are never consulted. A shell invocation without a command
/// falls through to tool-name classification.
///
/// # Examples
///
/// ```
/// use denied_agent::{classify_action, ToolAction};
/// use serde_json::json;
///
/// assert_eq!(classify_action("Read", None), ToolAction::Read);
/// assert_eq!(classify_action("get_user", None), ToolAction::Read);
/// assert_eq!(classify_action("delete_file", None), ToolAction::Delete);
/// assert_eq!(
///     classify_action("Bash", Some(&json!({"command": "rm file.txt"}))),
///     ToolAction::Delete,
/// );
/// assert_eq!(classify_action("unknown_tool", None), ToolAction::Execute);
/// ```
pub fn classify_action(tool_name: &str, tool_input: Option<&Value>) -> ToolAction {
    if tool_name.eq_ignore_ascii_case(SHELL_TOOL_NAME) {
        if let Some(command) = tool_input
            .and_then(|input| input.get("command"))
            .and_then(Value::as_str)
            .filter(|command| !command.is_empty())
        {
            return classify_shell_command(command);
        }
    }

    for (pattern, action) in TOOL_NAME_RULES.iter() {
        if pattern.is_match(tool_name) {
            return *action;
        }
    }

    ToolAction::Execute
}

/// Classify a shell command string.
fn classify_shell_command(command: &str) -> ToolAction {
    for (pattern, action) in SHELL_COMMAND_RULES.iter() {
        if pattern.is_match(command) {
            return *action;
        }
    }

    ToolAction::Execute
}
