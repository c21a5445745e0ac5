//! core::config
//!
//! Configuration loading and resolution.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. Environment variables (`DD_SITE`, `DD_API_KEY`, `DD_APP_KEY`,
//!    `DD_ACCESS_TOKEN`, `DD_OUTPUT`, `DD_AUTO_APPROVE`, `DD_CLI_AUTO_APPROVE`)
//! 4. CLI flags (applied by [`Config::apply_flags`])
//!
//! Empty environment values are ignored and fall through to the file.
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. `$PUP_CONFIG` if set (used even when the file does not exist yet)
//! 2. `$XDG_CONFIG_HOME/pup/config.toml`
//! 3. `~/.config/pup/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use pup::core::config::Config;
//!
//! let result = Config::load().unwrap();
//! for warning in &result.warnings {
//!     eprintln!("warning: {}", warning.message);
//! }
//! let config = result.config;
//! println!("Site: {}", config.site);
//! println!("API: {}", config.api_base_url());
//! ```

pub mod schema;

pub use schema::{AliasFile, PupConfig, SecretsConfig};

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::agent::{self, AgentInfo};
use super::{is_truthy, EnvLookup};
use crate::ui::output::OutputFormat;

/// Site used when neither the environment nor the config file sets one.
pub const DEFAULT_SITE: &str = "datadoghq.com";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("DD_SITE is required")]
    MissingSite,

    #[error(
        "authentication required: set DD_ACCESS_TOKEN for bearer auth, run 'pup auth login' \
         to store a token, or set DD_API_KEY and DD_APP_KEY for API key auth"
    )]
    MissingCredentials,

    #[error("alias '{0}' not found")]
    AliasNotFound(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// A non-fatal problem noticed while resolving configuration.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// Where the offending value came from (env var name or file path).
    pub source: String,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The resolved configuration.
    pub config: Config,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Resolved runtime configuration.
///
/// Built once per invocation and owned by the session.
#[derive(Clone, Default)]
pub struct Config {
    /// Datadog site, e.g. `datadoghq.com`
    pub site: String,
    /// API key for key-pair auth
    pub api_key: Option<String>,
    /// Application key for key-pair auth
    pub app_key: Option<String>,
    /// Bearer token (env, file, or secret store)
    pub access_token: Option<String>,
    /// Output format for successful results
    pub output: OutputFormat,
    /// Skip confirmation prompts
    pub auto_approve: bool,
    /// Wrap output for machine consumption
    pub agent_mode: bool,
    /// Detected AI agent, if any
    pub agent: Option<AgentInfo>,
    /// User aliases
    pub aliases: BTreeMap<String, String>,
    /// Secret store provider name
    pub secrets_provider: String,
    /// Base URL override (`PUP_MOCK_SERVER`)
    pub base_url_override: Option<String>,
    /// Raw file contents, rewritten when aliases change
    file: PupConfig,
    /// Where the file was (or will be) written
    path: Option<PathBuf>,
}

// Custom Debug to avoid exposing credentials
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("site", &self.site)
            .field("has_api_key", &self.api_key.is_some())
            .field("has_app_key", &self.app_key.is_some())
            .field("has_access_token", &self.access_token.is_some())
            .field("output", &self.output)
            .field("auto_approve", &self.auto_approve)
            .field("agent_mode", &self.agent_mode)
            .field("aliases", &self.aliases.len())
            .field("path", &self.path)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment and default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed.
    /// A missing config file is not an error (defaults are used).
    pub fn load() -> Result<ConfigLoadResult, ConfigError> {
        Self::load_with_env(&super::process_env)
    }

    /// Load configuration using an injected environment lookup.
    pub fn load_with_env(env: EnvLookup<'_>) -> Result<ConfigLoadResult, ConfigError> {
        let path = Self::config_path(env);
        let file = match &path {
            Some(p) if p.exists() => {
                debug!(path = %p.display(), "loading config file");
                Self::read_config(p)?
            }
            _ => PupConfig::default(),
        };
        file.validate()?;
        Ok(Self::resolve(file, path, env))
    }

    /// Locate the config file.
    ///
    /// Returns the first existing candidate, or the canonical location
    /// when none exist. `$PUP_CONFIG` always wins when set.
    pub fn config_path(env: EnvLookup<'_>) -> Option<PathBuf> {
        if let Some(explicit) = non_empty(env, "PUP_CONFIG") {
            return Some(PathBuf::from(explicit));
        }

        let xdg = non_empty(env, "XDG_CONFIG_HOME")
            .map(|dir| PathBuf::from(dir).join("pup/config.toml"));
        if let Some(path) = &xdg {
            if path.exists() {
                return xdg;
            }
        }

        let home = dirs::home_dir().map(|home| home.join(".config/pup/config.toml"));
        match (&home, &xdg) {
            (Some(path), _) if path.exists() => home,
            (_, Some(_)) => xdg,
            _ => home,
        }
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<PupConfig, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Apply environment overrides on top of a parsed file.
    pub fn resolve(file: PupConfig, path: Option<PathBuf>, env: EnvLookup<'_>) -> ConfigLoadResult {
        let mut warnings = Vec::new();

        let site = non_empty(env, "DD_SITE")
            .or_else(|| file.site.clone().filter(|s| !s.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_SITE.to_string());

        let api_key = non_empty(env, "DD_API_KEY").or_else(|| file.api_key.clone());
        let app_key = non_empty(env, "DD_APP_KEY").or_else(|| file.app_key.clone());
        let access_token =
            non_empty(env, "DD_ACCESS_TOKEN").or_else(|| file.access_token.clone());

        let file_output = file
            .output
            .as_deref()
            .and_then(|o| o.parse::<OutputFormat>().ok())
            .unwrap_or_default();
        let output = match non_empty(env, "DD_OUTPUT") {
            Some(value) => match value.parse::<OutputFormat>() {
                Ok(format) => format,
                Err(message) => {
                    warnings.push(ConfigWarning {
                        message,
                        source: "DD_OUTPUT".to_string(),
                    });
                    file_output
                }
            },
            None => file_output,
        };

        let agent = agent::detect(env);
        let agent_mode = agent.is_some() || agent::is_forced(env);

        let auto_approve = non_empty(env, "DD_AUTO_APPROVE").is_some_and(|v| is_truthy(&v))
            || non_empty(env, "DD_CLI_AUTO_APPROVE").is_some_and(|v| is_truthy(&v))
            || file.auto_approve.unwrap_or(false)
            || agent_mode;

        let secrets_provider = file
            .secrets
            .as_ref()
            .and_then(|s| s.provider.clone())
            .unwrap_or_else(|| crate::secrets::DEFAULT_PROVIDER.to_string());

        let config = Config {
            site,
            api_key: api_key.filter(|k| !k.is_empty()),
            app_key: app_key.filter(|k| !k.is_empty()),
            access_token: access_token.filter(|t| !t.is_empty()),
            output,
            auto_approve,
            agent_mode,
            agent,
            aliases: file.aliases.clone(),
            secrets_provider,
            base_url_override: non_empty(env, "PUP_MOCK_SERVER"),
            file,
            path,
        };

        ConfigLoadResult { config, warnings }
    }

    /// Apply global CLI flags. Flags only ever tighten toward automation.
    pub fn apply_flags(&mut self, output: Option<OutputFormat>, yes: bool, agent: bool) {
        if let Some(format) = output {
            self.output = format;
        }
        if agent {
            self.agent_mode = true;
        }
        if yes || self.agent_mode {
            self.auto_approve = true;
        }
    }

    /// Check that enough is configured to talk to the API.
    pub fn validate_auth(&self) -> Result<(), ConfigError> {
        if self.site.trim().is_empty() {
            return Err(ConfigError::MissingSite);
        }
        if self.access_token.is_none() && !self.has_api_keys() {
            return Err(ConfigError::MissingCredentials);
        }
        Ok(())
    }

    /// Both halves of the key pair are present.
    pub fn has_api_keys(&self) -> bool {
        self.api_key.is_some() && self.app_key.is_some()
    }

    /// API host for the configured site.
    ///
    /// On-call sites are used verbatim; all others get the `api.` prefix.
    pub fn api_host(&self) -> String {
        if self.site.contains("oncall") {
            self.site.clone()
        } else {
            format!("api.{}", self.site)
        }
    }

    /// Base URL for API requests.
    pub fn api_base_url(&self) -> String {
        match &self.base_url_override {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.api_host()),
        }
    }

    /// Path the config was loaded from, or will be written to.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Directory holding the config file and the file secret store.
    pub fn config_dir(&self) -> Option<&Path> {
        self.path.as_deref().and_then(Path::parent)
    }

    // =========================================================================
    // Aliases
    // =========================================================================

    /// Look up an alias.
    pub fn alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }

    /// Add or replace an alias and persist it.
    pub fn set_alias(&mut self, name: &str, command: &str) -> Result<PathBuf, ConfigError> {
        self.file
            .aliases
            .insert(name.to_string(), command.to_string());
        self.aliases = self.file.aliases.clone();
        self.save()
    }

    /// Remove an alias and persist the change.
    pub fn delete_alias(&mut self, name: &str) -> Result<PathBuf, ConfigError> {
        if self.file.aliases.remove(name).is_none() {
            return Err(ConfigError::AliasNotFound(name.to_string()));
        }
        self.aliases = self.file.aliases.clone();
        self.save()
    }

    /// Merge aliases from a TOML file over the existing ones.
    ///
    /// Returns the number of aliases imported.
    pub fn import_aliases(&mut self, source: &Path) -> Result<usize, ConfigError> {
        let contents = fs::read_to_string(source).map_err(|e| ConfigError::ReadError {
            path: source.to_path_buf(),
            source: e,
        })?;
        let parsed: AliasFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: source.to_path_buf(),
            message: e.to_string(),
        })?;

        let imported = parsed.into_aliases();
        let count = imported.len();
        self.file.aliases.extend(imported);
        self.aliases = self.file.aliases.clone();
        self.save()?;
        Ok(count)
    }

    /// Persist the file portion of the config.
    fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = self.path.clone().ok_or(ConfigError::NoHomeDir)?;
        Self::write_config_atomic(&path, &self.file)?;
        debug!(path = %path.display(), "wrote config file");
        Ok(path)
    }

    /// Write a config file atomically.
    fn write_config_atomic<T: serde::Serialize>(
        path: &Path,
        config: &T,
    ) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        // Temp file in the same directory so the rename stays on one filesystem
        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }
}

/// Read an environment variable, treating empty values as unset.
fn non_empty(env: EnvLookup<'_>, key: &str) -> Option<String> {
    env(key).filter(|v| !v.trim().is_empty())
}
