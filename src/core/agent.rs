//! core::agent
//!
//! AI coding assistant detection.
//!
//! # Design
//!
//! Assistants announce themselves through environment variables. The
//! detector table is checked in order and the first variable set to `1`
//! or `true` wins, so more specific assistants are listed before the
//! catch-all `AGENT`. `FORCE_AGENT_MODE` enables agent mode without
//! naming an assistant.
//!
//! The detected name is appended to the User-Agent so API-side usage can
//! be attributed.

use super::{is_truthy, EnvLookup};

/// A detected assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentInfo {
    /// Stable identifier, e.g. `claude-code`
    pub name: &'static str,
    /// The variable that triggered detection
    pub env_var: &'static str,
}

/// Assistant name and the variables that announce it, in priority order.
static DETECTORS: &[(&str, &[&str])] = &[
    ("claude-code", &["CLAUDECODE", "CLAUDE_CODE"]),
    ("cursor", &["CURSOR_AGENT"]),
    ("codex", &["CODEX", "OPENAI_CODEX"]),
    ("opencode", &["OPENCODE"]),
    ("aider", &["AIDER"]),
    ("cline", &["CLINE"]),
    ("windsurf", &["WINDSURF_AGENT"]),
    ("github-copilot", &["GITHUB_COPILOT"]),
    ("amazon-q", &["AMAZON_Q", "AWS_Q_DEVELOPER"]),
    ("gemini-code", &["GEMINI_CODE_ASSIST"]),
    ("sourcegraph-cody", &["SRC_CODY"]),
    ("generic-agent", &["AGENT"]),
];

/// Variable that forces agent mode on.
pub const FORCE_AGENT_MODE: &str = "FORCE_AGENT_MODE";

/// Find the first assistant whose variable is truthy.
pub fn detect(env: EnvLookup<'_>) -> Option<AgentInfo> {
    DETECTORS.iter().find_map(|&(name, env_vars)| {
        env_vars
            .iter()
            .find(|&&var| env(var).is_some_and(|v| is_truthy(&v)))
            .map(|&env_var| AgentInfo { name, env_var })
    })
}

/// `FORCE_AGENT_MODE` is truthy.
pub fn is_forced(env: EnvLookup<'_>) -> bool {
    env(FORCE_AGENT_MODE).is_some_and(|v| is_truthy(&v))
}

/// User-Agent header value.
///
/// `pup/<version> (rust; os <os>; arch <arch>[; ai-agent <name>])`
pub fn user_agent(agent: Option<&AgentInfo>) -> String {
    let mut ua = format!(
        "pup/{} (rust; os {}; arch {}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    if let Some(agent) = agent {
        ua.push_str("; ai-agent ");
        ua.push_str(agent.name);
    }
    ua.push(')');
    ua
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with(key: &'static str, value: &'static str) -> impl Fn(&str) -> Option<String> {
        move |k: &str| (k == key).then(|| value.to_string())
    }

    #[test]
    fn nothing_set_detects_nothing() {
        let env = |_: &str| None;
        assert!(detect(&env).is_none());
        assert!(!is_forced(&env));
    }

    #[test]
    fn detects_by_any_listed_variable() {
        let agent = detect(&env_with("AWS_Q_DEVELOPER", "true")).unwrap();
        assert_eq!(agent.name, "amazon-q");
        assert_eq!(agent.env_var, "AWS_Q_DEVELOPER");
    }

    #[test]
    fn only_truthy_values_count() {
        assert!(detect(&env_with("CURSOR_AGENT", "0")).is_none());
        assert!(detect(&env_with("CURSOR_AGENT", "yes")).is_none());
        assert!(detect(&env_with("CURSOR_AGENT", "TRUE")).is_some());
    }

    #[test]
    fn earlier_detectors_win() {
        let env = |k: &str| match k {
            "AGENT" | "CODEX" => Some("1".to_string()),
            _ => None,
        };
        assert_eq!(detect(&env).map(|a| a.name), Some("codex"));
    }

    #[test]
    fn force_agent_mode() {
        assert!(is_forced(&env_with(FORCE_AGENT_MODE, "1")));
        assert!(detect(&env_with(FORCE_AGENT_MODE, "1")).is_none());
    }

    #[test]
    fn user_agent_format() {
        let plain = user_agent(None);
        assert!(plain.starts_with("pup/"));
        assert!(plain.contains("(rust; os "));
        assert!(plain.ends_with(')'));
        assert!(!plain.contains("ai-agent"));

        let agent = AgentInfo {
            name: "cursor",
            env_var: "CURSOR_AGENT",
        };
        assert!(user_agent(Some(&agent)).ends_with("; ai-agent cursor)"));
    }
}
