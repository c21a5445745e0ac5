//! core::config::schema
//!
//! Configuration file schema.
//!
//! # Location
//!
//! Searched in order:
//! 1. `$PUP_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/pup/config.toml`
//! 3. `~/.config/pup/config.toml` (canonical write location)
//!
//! # Validation
//!
//! Values are validated after parsing. Unknown keys are rejected so a
//! typo never silently falls back to a default.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::ui::output::OutputFormat;

/// On-disk configuration.
///
/// # Example
///
/// ```toml
/// site = "datadoghq.eu"
/// output = "table"
/// auto_approve = false
///
/// [secrets]
/// provider = "file"
///
/// [aliases]
/// errors = "logs search --query=status:error --from=1h"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PupConfig {
    /// Datadog site (e.g. "datadoghq.com", "us5.datadoghq.com")
    pub site: Option<String>,

    /// API key, overridden by `DD_API_KEY`
    pub api_key: Option<String>,

    /// Application key, overridden by `DD_APP_KEY`
    pub app_key: Option<String>,

    /// Bearer access token, overridden by `DD_ACCESS_TOKEN`
    pub access_token: Option<String>,

    /// Default output format
    pub output: Option<String>,

    /// Skip confirmation prompts
    pub auto_approve: Option<bool>,

    /// Secret storage settings
    pub secrets: Option<SecretsConfig>,

    /// User-defined command aliases
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub aliases: BTreeMap<String, String>,
}

impl PupConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(site) = &self.site {
            if site.trim().is_empty() {
                return Err(ConfigError::InvalidValue("site cannot be empty".to_string()));
            }
        }

        if let Some(output) = &self.output {
            output
                .parse::<OutputFormat>()
                .map_err(ConfigError::InvalidValue)?;
        }

        if let Some(secrets) = &self.secrets {
            secrets.validate()?;
        }

        Ok(())
    }
}

/// Secrets configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SecretsConfig {
    /// Provider to use ("file" or "keychain")
    pub provider: Option<String>,
}

impl SecretsConfig {
    /// Valid secret providers.
    pub const VALID_PROVIDERS: &'static [&'static str] = &["file", "keychain"];

    /// Validate the secrets configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(provider) = &self.provider {
            if !Self::VALID_PROVIDERS.contains(&provider.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid secrets provider '{}', must be one of: {}",
                    provider,
                    Self::VALID_PROVIDERS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

/// A standalone alias file accepted by `pup alias import`.
///
/// Either a `[aliases]` table or a flat table of `name = "command"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AliasFile {
    Wrapped { aliases: BTreeMap<String, String> },
    Flat(BTreeMap<String, String>),
}

impl AliasFile {
    /// Consume the file and return its alias table.
    pub fn into_aliases(self) -> BTreeMap<String, String> {
        match self {
            AliasFile::Wrapped { aliases } => aliases,
            AliasFile::Flat(aliases) => aliases,
        }
    }
}
