//! Output formatting for CLI commands.
//!
//! Every command renders either human-readable text or JSON. `ndjson`
//! emits one compact JSON document per line, which the chat REPL uses for
//! per-turn records.

use std::fmt::Write;

use serde::Serialize;

use crate::agent::TurnReport;
use crate::core::{AgentId, AgentRole};

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
    /// One compact JSON document per line.
    Ndjson,
}

impl OutputFormat {
    /// Parses a format name. Unknown names fall back to text.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            "ndjson" | "jsonl" => Self::Ndjson,
            _ => Self::Text,
        }
    }

    /// Serializes `value` in this format's JSON flavour.
    #[must_use]
    pub fn to_json<T: Serialize + ?Sized>(self, value: &T) -> String {
        let rendered = match self {
            Self::Ndjson => serde_json::to_string(value),
            Self::Text | Self::Json => serde_json::to_string_pretty(value),
        };
        rendered.unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
    }

    /// Whether this format produces JSON.
    #[must_use]
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json | Self::Ndjson)
    }
}

/// Formats the role registry.
#[must_use]
pub fn format_roles(roles: &[&AgentRole], format: OutputFormat) -> String {
    if format.is_json() {
        return format.to_json(roles);
    }

    let width = roles.iter().map(|r| r.id.as_str().len()).max().unwrap_or(0);
    let mut output = String::new();
    for role in roles {
        let kind = if role.id.is_specialist() {
            "specialist"
        } else {
            "rewrite"
        };
        let _ = writeln!(
            output,
            "{:<width$}  {:<10}  {}: {}",
            role.id.as_str(),
            kind,
            role.name,
            role.description
        );
    }
    output
}

/// Formats the outcome of one turn.
#[must_use]
pub fn format_turn(report: &TurnReport, format: OutputFormat) -> String {
    if format.is_json() {
        return format.to_json(report);
    }

    let mut output = report.text.clone();
    output.push('\n');
    output
}

/// Text footer with routing and cost details, shown in verbose mode.
#[must_use]
pub fn format_turn_footer(report: &TurnReport) -> String {
    let agent = report.agent.map_or("critic", AgentId::as_str);
    format!(
        "---\nAgent: {agent} | Calls: {} | Tokens: {} | Time: {:.1}s\n",
        report.model_calls,
        report.usage.total_tokens,
        report.elapsed.as_secs_f64()
    )
}

/// Formats a routing decision.
#[must_use]
pub fn format_classification(query: &str, agent: AgentId, raw: &str, format: OutputFormat) -> String {
    if format.is_json() {
        let json = serde_json::json!({
            "query": query,
            "agent": agent,
            "raw": raw,
            "fallback": raw.trim().to_lowercase() != agent.as_str(),
        });
        return format.to_json(&json);
    }
    format!("{agent}\n")
}
