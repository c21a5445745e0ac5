//! cli::schema
//!
//! Machine-readable description of the command tree for AI agents.
//!
//! # Design
//!
//! The schema is derived from the clap tree at runtime, so it never drifts
//! from what the parser accepts. Hand-written guidance (query syntax, time
//! formats, workflows) is attached alongside. Commands and subcommands are
//! sorted by name so output is stable.
//!
//! A command is read-only unless its name is a write verb; a group is
//! read-only when every child is.

use std::collections::BTreeMap;

use clap::{ArgAction, CommandFactory};
use serde::Serialize;
use serde_json::Value;

use super::args::Cli;

/// Leaf command names that change state.
const WRITE_VERBS: &[&str] = &[
    "activate",
    "add",
    "archive",
    "assign",
    "cancel",
    "create",
    "deactivate",
    "delete",
    "import",
    "login",
    "logout",
    "refresh",
    "remove",
    "set",
    "unarchive",
    "update",
    "update-priority",
    "update-status",
];

/// Top-level document.
#[derive(Debug, Clone, Serialize)]
pub struct AgentSchema {
    pub version: &'static str,
    pub description: &'static str,
    pub auth: AuthHelp,
    pub global_flags: Vec<FlagSchema>,
    pub commands: Vec<CommandSchema>,
    pub query_syntax: BTreeMap<&'static str, &'static str>,
    pub time_formats: TimeFormats,
    pub workflows: Vec<Workflow>,
    pub best_practices: Vec<&'static str>,
    pub anti_patterns: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthHelp {
    pub oauth: &'static str,
    pub api_keys: &'static str,
}

/// One node of the command tree.
#[derive(Debug, Clone, Serialize)]
pub struct CommandSchema {
    pub name: String,
    pub full_path: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub read_only: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<FlagSchema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<CommandSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlagSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimeFormats {
    pub relative: Vec<&'static str>,
    pub absolute: Vec<&'static str>,
    pub examples: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Workflow {
    pub name: &'static str,
    pub steps: Vec<&'static str>,
}

/// Build the full schema.
pub fn build_schema() -> AgentSchema {
    let root = Cli::command();
    let global_flags = root
        .get_arguments()
        .filter(|arg| arg.is_global_set())
        .filter_map(flag_schema)
        .collect();

    let mut commands: Vec<CommandSchema> = root
        .get_subcommands()
        .filter(|sub| sub.get_name() != "help")
        .map(|sub| command_schema(sub, ""))
        .collect();
    commands.sort_by(|a, b| a.name.cmp(&b.name));

    AgentSchema {
        version: env!("CARGO_PKG_VERSION"),
        description: "Pup - Datadog API CLI. OAuth2 or API key authentication for \
            monitors, dashboards, SLOs, cases, CI Visibility, RUM, security and more.",
        auth: AuthHelp {
            oauth: "pup auth login (browser OAuth2 with PKCE; tokens stored per site and refreshed automatically)",
            api_keys: "Set DD_API_KEY + DD_APP_KEY + DD_SITE environment variables",
        },
        global_flags,
        commands,
        query_syntax: query_syntax(),
        time_formats: TimeFormats {
            relative: vec!["30s", "5m", "1h", "4h", "1d", "7d", "1w", "5minutes", "2 hours"],
            absolute: vec!["Unix timestamp in milliseconds", "RFC3339 (2024-01-01T00:00:00Z)"],
            examples: vec![
                "--from=1h (one hour ago)",
                "--from=30m --to=now",
                "--from=7d --to=1d (seven days ago to one day ago)",
                "--from=2024-01-01T00:00:00Z --to=2024-01-02T00:00:00Z",
            ],
        },
        workflows: workflows(),
        best_practices: vec![
            "Pass --from explicitly on event queries; defaults differ between commands",
            "Start with a narrow window (1h) and widen only when nothing is found",
            "Filter monitors with --tags or --name rather than listing everything",
            "Use 'pup monitors search' for full-text queries and 'pup monitors list' for tag filters",
            "Keep JSON output for parsing; --output=table is for people",
            "Run 'pup test' first when a command fails with 401 or 403",
        ],
        anti_patterns: vec![
            "Don't start with a large --limit; refine the query instead",
            "Don't retry a 401 or 403 unchanged: 401 means re-authenticate, 403 means missing permissions",
            "Don't run delete, cancel or archive commands without confirming the ID with a get first",
            "Don't expect stored bearer tokens to work for API key management or error tracking; those need DD_API_KEY and DD_APP_KEY",
        ],
    }
}

/// Schema for `path`, a list of words or dot-separated segments.
///
/// A known path keeps the whole document but narrows `commands` to the
/// matched node. Unknown or empty paths give the full schema.
pub fn schema_for(path: &[String]) -> Value {
    let mut schema = build_schema();
    let segments: Vec<&str> = path
        .iter()
        .flat_map(|p| p.split(|c: char| c == '.' || c.is_whitespace()))
        .filter(|s| !s.is_empty())
        .collect();

    if let Some(node) = find(&schema.commands, &segments).cloned() {
        schema.commands = vec![node];
    }
    serde_json::to_value(&schema).unwrap_or(Value::Null)
}

fn find<'a>(commands: &'a [CommandSchema], segments: &[&str]) -> Option<&'a CommandSchema> {
    let (first, rest) = segments.split_first()?;
    let node = commands.iter().find(|c| c.name == *first)?;
    if rest.is_empty() {
        Some(node)
    } else {
        find(&node.subcommands, rest)
    }
}

fn command_schema(cmd: &clap::Command, parent: &str) -> CommandSchema {
    let name = cmd.get_name().to_string();
    let full_path = if parent.is_empty() {
        name.clone()
    } else {
        format!("{} {}", parent, name)
    };

    let mut subcommands: Vec<CommandSchema> = cmd
        .get_subcommands()
        .filter(|sub| sub.get_name() != "help")
        .map(|sub| command_schema(sub, &full_path))
        .collect();
    subcommands.sort_by(|a, b| a.name.cmp(&b.name));

    let read_only = if subcommands.is_empty() {
        !WRITE_VERBS.contains(&name.as_str())
    } else {
        subcommands.iter().all(|sub| sub.read_only)
    };

    let local = || cmd.get_arguments().filter(|arg| !arg.is_global_set());
    let args = local()
        .filter(|arg| arg.is_positional())
        .map(|arg| format!("<{}>", arg.get_id().as_str().to_uppercase()))
        .collect();
    let flags = local().filter_map(flag_schema).collect();

    CommandSchema {
        name,
        full_path,
        description: cmd.get_about().map(|a| a.to_string()).unwrap_or_default(),
        read_only,
        args,
        flags,
        subcommands,
    }
}

fn flag_schema(arg: &clap::Arg) -> Option<FlagSchema> {
    let long = arg.get_long()?;
    if matches!(long, "help" | "version") {
        return None;
    }
    let is_bool = matches!(arg.get_action(), ArgAction::SetTrue | ArgAction::SetFalse);
    let default = arg
        .get_default_values()
        .iter()
        .map(|v| v.to_string_lossy().into_owned())
        .reduce(|a, b| format!("{},{}", a, b))
        .or_else(|| is_bool.then(|| "false".to_string()));
    let values = arg
        .get_possible_values()
        .iter()
        .filter(|v| !v.is_hide_set())
        .map(|v| v.get_name().to_string())
        .collect();

    Some(FlagSchema {
        name: format!("--{}", long),
        kind: if is_bool { "bool" } else { "string" },
        default,
        values: if is_bool { Vec::new() } else { values },
        description: arg.get_help().map(|h| h.to_string()).unwrap_or_default(),
    })
}

fn query_syntax() -> BTreeMap<&'static str, &'static str> {
    BTreeMap::from([
        (
            "cicd",
            "@ci.pipeline.name:<name> @ci.status:error @git.branch:main env:ci",
        ),
        (
            "events",
            "sources:nagios,pagerduty status:error priority:normal tags:env:prod",
        ),
        (
            "monitors",
            "--name for substring match, --tags for comma-separated tags, search --query for full text (status:Alert, type:metric)",
        ),
        (
            "rum",
            "@type:error @session.type:user @view.url_path:/checkout service:<app-name>",
        ),
        (
            "security",
            "@workflow.rule.type:log_detection source:cloudtrail status:critical",
        ),
    ])
}

fn workflows() -> Vec<Workflow> {
    vec![
        Workflow {
            name: "Monitor status check",
            steps: vec![
                "pup monitors list --tags=\"env:production\" --limit=100",
                "pup monitors search --query=\"status:Alert\"",
                "pup monitors get <monitor_id>",
            ],
        },
        Workflow {
            name: "Service health overview",
            steps: vec![
                "pup slos list",
                "pup slos status <slo_id> --from=7d",
                "pup monitors list --tags=\"team:<team_name>\"",
            ],
        },
        Workflow {
            name: "CI failure triage",
            steps: vec![
                "pup cicd pipelines list --query=\"@ci.status:error\" --from=1d",
                "pup cicd tests search --query=\"@test.status:fail\" --from=1d",
                "pup cicd flaky-tests search",
            ],
        },
        Workflow {
            name: "Vendor outage check",
            steps: vec![
                "pup status-pages third-party --active",
                "pup status-pages third-party --search=<provider>",
            ],
        },
        Workflow {
            name: "Security review",
            steps: vec![
                "pup security signals search --query=\"status:critical\" --from=1d",
                "pup security rules list",
                "pup security findings search --query=\"cloud_provider:aws\"",
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_sorted_without_help() {
        let schema = build_schema();
        let names: Vec<&str> = schema.commands.iter().map(|c| c.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(!names.contains(&"help"));
        assert!(names.contains(&"monitors"));
    }

    #[test]
    fn global_flags_listed_once() {
        let schema = build_schema();
        let globals: Vec<&str> = schema.global_flags.iter().map(|f| f.name.as_str()).collect();
        assert!(globals.contains(&"--output"));
        assert!(globals.contains(&"--yes"));
        assert!(globals.contains(&"--agent"));

        let monitors = schema.commands.iter().find(|c| c.name == "monitors").unwrap();
        let list = monitors.subcommands.iter().find(|c| c.name == "list").unwrap();
        assert!(list.flags.iter().all(|f| f.name != "--output"));
        assert!(list.flags.iter().any(|f| f.name == "--limit"));
    }

    #[test]
    fn read_only_rules() {
        let schema = build_schema();
        let monitors = schema.commands.iter().find(|c| c.name == "monitors").unwrap();
        assert!(!monitors.read_only);
        let sub = |name: &str| monitors.subcommands.iter().find(|c| c.name == name).unwrap();
        assert!(sub("list").read_only);
        assert!(!sub("delete").read_only);
        assert_eq!(sub("get").full_path, "monitors get");
        assert_eq!(sub("get").args, vec!["<MONITOR_ID>".to_string()]);

        let synthetics = schema.commands.iter().find(|c| c.name == "synthetics").unwrap();
        assert!(synthetics.read_only);
    }

    #[test]
    fn flag_types_and_defaults() {
        let schema = build_schema();
        let yes = schema.global_flags.iter().find(|f| f.name == "--yes").unwrap();
        assert_eq!(yes.kind, "bool");
        assert_eq!(yes.default.as_deref(), Some("false"));

        let output = schema.global_flags.iter().find(|f| f.name == "--output").unwrap();
        assert_eq!(output.kind, "string");
        assert!(output.values.contains(&"table".to_string()));
    }

    #[test]
    fn subtree_by_dots_or_words() {
        let by_dots = schema_for(&["rum.apps".to_string()]);
        assert_eq!(by_dots["commands"].as_array().map(Vec::len), Some(1));
        assert_eq!(by_dots["commands"][0]["full_path"], "rum apps");
        assert!(by_dots["auth"].is_object());
        assert!(by_dots["workflows"].is_array());

        let by_words = schema_for(&["rum".to_string(), "apps".to_string()]);
        assert_eq!(by_dots, by_words);
    }

    #[test]
    fn unknown_subtree_falls_back() {
        let schema = schema_for(&["nope".to_string()]);
        let full = serde_json::to_value(build_schema()).unwrap();
        assert_eq!(schema["commands"], full["commands"]);
        assert!(schema_for(&[])["workflows"].is_array());
    }
}
