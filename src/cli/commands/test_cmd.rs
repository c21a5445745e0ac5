//! test command - Show resolved configuration without calling the API
//!
//! Credentials are masked: the first 8 and last 4 characters of keys of
//! 12 characters or more, nothing of shorter ones. The report is always
//! printed; missing credentials then fail the command.

use anyhow::Result;
use serde_json::json;

use crate::core::agent;
use crate::session::Session;

/// Mask a credential for display.
pub fn mask_key(value: Option<&str>) -> String {
    match value {
        None => "(not set - using OAuth2 or will prompt)".to_string(),
        Some(v) if v.chars().count() < 12 => "(too short - may be invalid)".to_string(),
        Some(v) => {
            let chars: Vec<char> = v.chars().collect();
            let head: String = chars[..8].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{}...{}", head, tail)
        }
    }
}

pub fn run(session: &mut Session) -> Result<()> {
    let config = session.config();
    let report = json!({
        "site": config.site,
        "api_url": config.api_base_url(),
        "api_key": mask_key(config.api_key.as_deref()),
        "app_key": mask_key(config.app_key.as_deref()),
        "access_token": config.access_token.is_some(),
        "output": config.output.as_str(),
        "auto_approve": config.auto_approve,
        "agent_mode": config.agent_mode,
        "agent": config.agent.map(|a| a.name),
        "config_file": config.path().map(|p| p.display().to_string()),
        "user_agent": agent::user_agent(config.agent.as_ref()),
        "auth_ready": config.validate_auth().is_ok(),
    });

    if session.config().agent_mode {
        session.emit_for("test", &report)?;
        return Ok(session.config().validate_auth()?);
    }

    let lines = [
        format!("Site:          {}", report["site"].as_str().unwrap_or_default()),
        format!("API URL:       {}", report["api_url"].as_str().unwrap_or_default()),
        format!("API Key:       {}", report["api_key"].as_str().unwrap_or_default()),
        format!("App Key:       {}", report["app_key"].as_str().unwrap_or_default()),
        format!(
            "Bearer token:  {}",
            if report["access_token"] == true { "set" } else { "not set" }
        ),
        format!("Output:        {}", report["output"].as_str().unwrap_or_default()),
        format!("Auto-approve:  {}", report["auto_approve"]),
        format!("Agent mode:    {}", report["agent_mode"]),
    ];
    for line in lines {
        session.println(line)?;
    }
    if report["auth_ready"] == true {
        session.println("Configuration looks valid.")
    } else {
        session.println("No credentials configured. Run 'pup auth login' or set DD_API_KEY and DD_APP_KEY.")?;
        Ok(session.config().validate_auth()?)
    }
}
