//! ui::output
//!
//! Rendering of successful results.
//!
//! # Design
//!
//! Every command hands a `serde_json::Value` to [`format_output`]. In agent
//! mode the value is wrapped in an [`AgentEnvelope`] and always rendered as
//! JSON; otherwise the configured [`OutputFormat`] decides. Object keys come
//! out sorted because `serde_json::Map` is ordered by key.
//!
//! # Tables
//!
//! Rows are taken from a top-level array, from a `data` wrapper, or from a
//! single object. Nested objects are flattened one level (`attributes.host`)
//! and well-known columns are placed first.

use std::fmt;
use std::str::FromStr;

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Most columns a table will show.
pub const MAX_COLUMNS: usize = 12;

/// Longest cell before truncation, in characters.
const MAX_CELL_CHARS: usize = 50;

/// Columns shown first when present.
const PRIORITY_COLUMNS: &[&str] = &[
    "id",
    "title",
    "name",
    "type",
    "status",
    "state",
    "severity",
    "created_at",
    "updated_at",
    "created",
    "modified",
    "attributes.timestamp",
    "attributes.service",
    "attributes.host",
    "attributes.status",
    "attributes.message",
];

/// Output format for successful results.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
    Yaml,
}

impl OutputFormat {
    pub const VALID: &'static [&'static str] = &["json", "table", "yaml"];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            "yaml" => Ok(OutputFormat::Yaml),
            other => Err(format!(
                "invalid output format '{}', must be one of: {}",
                other,
                Self::VALID.join(", ")
            )),
        }
    }
}

/// Errors while rendering.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Extra context attached to agent-mode output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_action: Option<String>,
    pub command: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl Metadata {
    /// Metadata for `command`, counting rows when the result is a list.
    pub fn for_command(command: impl Into<String>, data: &Value) -> Self {
        Self {
            count: extract_rows(data).map(|rows| rows.len()),
            command: command.into(),
            ..Default::default()
        }
    }
}

/// `{"status": "success", "data": ..., "metadata": ...}`
#[derive(Debug, Serialize)]
pub struct AgentEnvelope<'a> {
    pub status: &'static str,
    pub data: &'a Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<&'a Metadata>,
}

/// Render a result for printing.
pub fn format_output(
    data: &Value,
    metadata: Option<&Metadata>,
    format: OutputFormat,
    agent_mode: bool,
) -> Result<String, OutputError> {
    if agent_mode {
        let envelope = AgentEnvelope {
            status: "success",
            data,
            metadata,
        };
        return Ok(serde_json::to_string_pretty(&envelope)?);
    }

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(data)?;
            Ok(yaml.trim_end().to_string())
        }
        OutputFormat::Table => Ok(render_table(data)),
    }
}

/// Empty table with the house style.
pub fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Render a JSON value as a table, or `No results found`.
pub fn render_table(value: &Value) -> String {
    let rows: Vec<Value> = extract_rows(value)
        .unwrap_or_else(|| vec![value])
        .into_iter()
        .filter(|row| row.is_object())
        .map(flatten_row)
        .collect();

    if rows.is_empty() {
        return "No results found".to_string();
    }

    let headers = choose_headers(&rows);
    let mut table = table();
    table.set_header(headers.iter().map(String::as_str));
    for row in &rows {
        table.add_row(headers.iter().map(|h| format_cell(row.get(h.as_str()))));
    }
    table.to_string()
}

/// Rows of a list result: a top-level array, or whatever `data` holds.
///
/// Returns `None` for a single object with no `data` key, and for scalars.
pub fn extract_rows(value: &Value) -> Option<Vec<&Value>> {
    match value {
        Value::Array(items) => Some(items.iter().collect()),
        Value::Object(map) => match map.get("data") {
            Some(data @ Value::Array(_)) => extract_rows(data),
            Some(data @ Value::Object(_)) => Some(vec![data]),
            _ => None,
        },
        _ => None,
    }
}

/// Flatten one level of nesting into dot-separated keys.
fn flatten_row(row: &Value) -> Value {
    let Value::Object(map) = row else {
        return row.clone();
    };

    let mut flat = Map::new();
    for (key, value) in map {
        match value {
            Value::Object(inner) => {
                for (inner_key, inner_value) in inner {
                    flat.insert(format!("{}.{}", key, inner_key), inner_value.clone());
                }
            }
            other => {
                flat.insert(key.clone(), other.clone());
            }
        }
    }
    Value::Object(flat)
}

fn choose_headers(rows: &[Value]) -> Vec<String> {
    let mut discovered: Vec<&str> = Vec::new();
    for row in rows {
        if let Value::Object(map) = row {
            for key in map.keys() {
                if !discovered.contains(&key.as_str()) {
                    discovered.push(key);
                }
            }
        }
    }

    let mut headers: Vec<String> = PRIORITY_COLUMNS
        .iter()
        .filter(|p| discovered.contains(*p))
        .map(|p| p.to_string())
        .collect();
    for key in discovered {
        if headers.len() >= MAX_COLUMNS {
            break;
        }
        if !headers.iter().any(|h| h == key) {
            headers.push(key.to_string());
        }
    }
    headers.truncate(MAX_COLUMNS);
    headers
}

/// Compact single-cell rendering of a JSON value.
pub fn format_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => truncate(s),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Array(items)) if items.len() <= 3 => {
            let inner: Vec<String> = items.iter().map(|v| format_cell(Some(v))).collect();
            format!("[{}]", inner.join(", "))
        }
        Some(Value::Array(items)) => format!("[{} items]", items.len()),
        Some(Value::Object(map)) => format!("{{{} fields}}", map.len()),
    }
}

fn truncate(s: &str) -> String {
    if s.chars().count() <= MAX_CELL_CHARS {
        return s.to_string();
    }
    let kept: String = s.chars().take(MAX_CELL_CHARS - 3).collect();
    format!("{}...", kept)
}
