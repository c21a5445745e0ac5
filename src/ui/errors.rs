//! ui::errors
//!
//! User-facing rendering of failed API calls.
//!
//! # Design
//!
//! A failed call becomes a [`CommandError`]. For humans the message names
//! the operation, the HTTP status, the raw API body, and a remediation hint
//! chosen by status. In agent mode the same facts are serialized as an
//! [`AgentError`] JSON document so the caller can branch on `error_code`.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::client::ApiError;

/// A command failure ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// Prose for humans.
    #[error("{0}")]
    Message(String),

    /// A JSON document for agents; printed without decoration.
    #[error("{0}")]
    Structured(String),
}

/// `{"status": "error", "error_code": 404, ...}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentError {
    pub status: &'static str,
    #[serde(skip_serializing_if = "is_zero")]
    pub error_code: u16,
    pub error_message: String,
    pub operation: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_response: Option<Value>,
}

fn is_zero(code: &u16) -> bool {
    *code == 0
}

/// Remediation hint for a status code.
pub fn status_hint(status: u16) -> Option<&'static str> {
    match status {
        500.. => Some(
            "The Datadog API is experiencing issues. Please try again later or check https://status.datadoghq.com/",
        ),
        429 => Some("You are being rate limited. Please wait a moment and try again."),
        403 => Some("Access denied. Verify your API/App keys have the required permissions."),
        401 => Some(
            "Authentication failed. Run 'pup auth login' or verify your DD_API_KEY and DD_APP_KEY.",
        ),
        404 => Some("Resource not found. Verify the ID or check if the resource was deleted."),
        400.. => Some("Invalid request. Check your parameters and try again."),
        _ => None,
    }
}

/// Next steps offered to agents.
pub fn agent_suggestions(status: u16) -> Vec<String> {
    let suggestions: &[&str] = match status {
        500.. => &["Retry after a short delay", "Check https://status.datadoghq.com/"],
        429 => &["Wait and retry with backoff"],
        403 => &["Verify your API/App keys have required permissions"],
        401 => &["Run 'pup auth login'", "Set DD_API_KEY and DD_APP_KEY"],
        404 => &["Verify the resource ID", "Check if the resource was deleted"],
        _ => &[],
    };
    suggestions.iter().map(|s| s.to_string()).collect()
}

/// Turn a failed call into a displayable error.
pub fn format_api_error(operation: &str, err: &ApiError, agent_mode: bool) -> CommandError {
    let Some(status) = err.status() else {
        return CommandError::Message(format!("failed to {}: {}", operation, err));
    };
    let body = err.body().filter(|b| !b.trim().is_empty());

    if agent_mode {
        let document = AgentError {
            status: "error",
            error_code: status,
            error_message: err.to_string(),
            operation: operation.to_string(),
            suggestions: agent_suggestions(status),
            api_response: body.map(|b| {
                serde_json::from_str(b).unwrap_or_else(|_| Value::String(b.to_string()))
            }),
        };
        if let Ok(json) = serde_json::to_string_pretty(&document) {
            return CommandError::Structured(json);
        }
    }

    let mut message = format!("failed to {}: {} (status: {})", operation, err, status);
    if let Some(body) = body {
        message.push_str("\nAPI Response: ");
        message.push_str(body);
    }
    if let Some(hint) = status_hint(status) {
        message.push_str("\n\n");
        message.push_str(hint);
    }
    CommandError::Message(message)
}
