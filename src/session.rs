//! session
//!
//! Per-invocation application context.
//!
//! # Design
//!
//! A [`Session`] is built once in `main` and passed by `&mut` to every
//! command handler. It owns the resolved configuration, the output writer,
//! the input reader used for confirmations, and the lazily built API
//! client. Nothing in the crate reaches for process-wide state; tests build
//! a session over buffers and a [`MockApi`](crate::client::mock::MockApi).
//!
//! # Client Selection
//!
//! [`get_client`](Session::get_client) builds the default client on first
//! use and reuses it afterwards. Endpoints that reject bearer tokens are
//! routed through [`get_client_for_endpoint`](Session::get_client_for_endpoint),
//! which forces API-key credentials and fails fast, before any network call,
//! when the keys are missing.
//!
//! # Stored Credentials
//!
//! Without `DD_ACCESS_TOKEN`, the session picks up what `pup auth login`
//! stored for the site: OAuth tokens first, then a pasted bearer token. An
//! OAuth token near expiry is refreshed once, before the first request.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::{OAuthClient, OAuthManager, TokenSet};
use crate::client::{
    default_api_key_client_factory, default_client_factory, endpoints, ApiRequest, ClientError,
    ClientFactory, DatadogApi, Method,
};
use crate::core::config::Config;
use crate::core::files::{self, FileError};
use crate::secrets::{self, SecretError, SecretStore};
use crate::ui::errors::format_api_error;
use crate::ui::output::{format_output, Metadata};
use crate::ui::prompts;

/// Public feed of third-party provider outages.
pub const THIRD_PARTY_OUTAGES_URL: &str = "https://updog.ai/data/third-party-outages.json";

/// Application context threaded through every command.
pub struct Session {
    config: Config,
    out: Box<dyn Write>,
    input: Box<dyn BufRead>,
    client: Option<Arc<dyn DatadogApi>>,
    client_factory: ClientFactory,
    api_key_client_factory: ClientFactory,
    third_party_url: String,
    /// Stored OAuth tokens need a refresh before the first request.
    refresh_pending: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("has_client", &self.client.is_some())
            .field("third_party_url", &self.third_party_url)
            .field("refresh_pending", &self.refresh_pending)
            .finish()
    }
}

impl Session {
    /// Session over stdout/stdin with the real client factories.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            out: Box::new(io::stdout()),
            input: Box::new(io::BufReader::new(io::stdin())),
            client: None,
            client_factory: default_client_factory(),
            api_key_client_factory: default_api_key_client_factory(),
            third_party_url: THIRD_PARTY_OUTAGES_URL.to_string(),
            refresh_pending: false,
        }
    }

    /// Load configuration from the environment and attach any stored token.
    pub fn from_env() -> Result<Self> {
        let loaded = Config::load().context("failed to load configuration")?;
        for warning in &loaded.warnings {
            warn!(source = %warning.source, "{}", warning.message);
        }

        Ok(Self::new(loaded.config).with_stored_credentials())
    }

    /// Fill in the bearer token from the secret store unless one is set.
    pub fn with_stored_credentials(mut self) -> Self {
        if self.config.access_token.is_some() {
            return self;
        }
        match stored_credentials(&self.config) {
            Stored::Token(token) => self.config.access_token = Some(token),
            Stored::NeedsRefresh => self.refresh_pending = true,
            Stored::Nothing => {}
        }
        self
    }

    pub fn with_output(mut self, out: Box<dyn Write>) -> Self {
        self.out = out;
        self
    }

    pub fn with_input(mut self, input: Box<dyn BufRead>) -> Self {
        self.input = input;
        self
    }

    pub fn with_client_factory(mut self, factory: ClientFactory) -> Self {
        self.client_factory = factory;
        self
    }

    pub fn with_api_key_client_factory(mut self, factory: ClientFactory) -> Self {
        self.api_key_client_factory = factory;
        self
    }

    /// Route every request, OAuth-capable or not, to `api`.
    pub fn with_api(self, api: Arc<dyn DatadogApi>) -> Self {
        let fallback = Arc::clone(&api);
        self.with_client_factory(Box::new(move |_| Ok(Arc::clone(&api))))
            .with_api_key_client_factory(Box::new(move |_| Ok(Arc::clone(&fallback))))
    }

    pub fn with_third_party_url(mut self, url: impl Into<String>) -> Self {
        self.third_party_url = url.into();
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub fn third_party_url(&self) -> &str {
        &self.third_party_url
    }

    /// Writer for command output.
    pub fn out(&mut self) -> &mut dyn Write {
        self.out.as_mut()
    }

    /// JSON request body from `--file`; `-` reads the session input.
    pub fn read_body(&mut self, path: &str) -> Result<Value, FileError> {
        files::read_json_file(path, self.input.as_mut())
    }

    /// Secret store selected by configuration.
    pub fn secret_store(&self) -> Result<Box<dyn SecretStore>, SecretError> {
        secrets::create_store(&self.config.secrets_provider, self.config.config_dir())
    }

    /// OAuth state for the configured site.
    pub fn oauth_manager(&self) -> Result<OAuthManager, SecretError> {
        Ok(OAuthManager::new(
            &self.config.site,
            self.secret_store()?,
            OAuthClient::for_config(&self.config),
        ))
    }

    /// Refresh stored OAuth tokens once if they were stale at startup.
    ///
    /// A failed refresh is logged and leaves the session without a bearer
    /// token, so the usual missing-credentials error follows.
    async fn refresh_stored_token(&mut self) {
        if !std::mem::take(&mut self.refresh_pending) {
            return;
        }
        let manager = match self.oauth_manager() {
            Ok(manager) => manager,
            Err(e) => {
                warn!("cannot refresh OAuth token: {}", e);
                return;
            }
        };
        match manager.access_token().await {
            Ok(token) => {
                self.config.access_token = Some(token);
                self.client = None;
            }
            Err(e) => warn!("cannot refresh OAuth token: {}", e),
        }
    }

    // =========================================================================
    // Clients
    // =========================================================================

    /// The default client, built on first use.
    pub fn get_client(&mut self) -> Result<Arc<dyn DatadogApi>, ClientError> {
        if let Some(ref client) = self.client {
            return Ok(Arc::clone(client));
        }
        let client = (self.client_factory)(&self.config)?;
        debug!(scheme = ?client.auth_scheme(), "created API client");
        self.client = Some(Arc::clone(&client));
        Ok(client)
    }

    /// A client able to call `method path`.
    ///
    /// # Errors
    ///
    /// [`ClientError::Authentication`] when the endpoint rejects bearer
    /// tokens and no API key pair is configured.
    pub fn get_client_for_endpoint(
        &mut self,
        method: Method,
        path: &str,
    ) -> Result<Arc<dyn DatadogApi>, ClientError> {
        if !endpoints::requires_api_key_fallback(method, path) {
            return self.get_client();
        }
        if !self.config.has_api_keys() {
            return Err(ClientError::Authentication {
                method,
                path: path.to_string(),
            });
        }
        debug!(%method, path, "endpoint requires API keys");
        (self.api_key_client_factory)(&self.config)
    }

    /// Send a request and turn failures into display-ready errors.
    ///
    /// `operation` completes the sentence "failed to ...".
    pub async fn call(&mut self, operation: &str, request: ApiRequest) -> Result<Value> {
        self.refresh_stored_token().await;
        let client = self.get_client_for_endpoint(request.method, &request.path)?;
        match client.send(request).await {
            Ok(value) => Ok(value),
            Err(err) => Err(format_api_error(operation, &err, self.config.agent_mode).into()),
        }
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Print a result in the configured format.
    pub fn emit(&mut self, data: &Value, metadata: Option<&Metadata>) -> Result<()> {
        let rendered = format_output(data, metadata, self.config.output, self.config.agent_mode)?;
        writeln!(self.out, "{}", rendered)?;
        Ok(())
    }

    /// Print a result, attaching command metadata in agent mode.
    pub fn emit_for(&mut self, command: &str, data: &Value) -> Result<()> {
        if self.config.agent_mode {
            let metadata = Metadata::for_command(command, data);
            self.emit(data, Some(&metadata))
        } else {
            self.emit(data, None)
        }
    }

    pub fn println(&mut self, line: impl Display) -> Result<()> {
        writeln!(self.out, "{}", line)?;
        Ok(())
    }

    /// Ask before a destructive action.
    ///
    /// Always true under auto-approve. A decline prints the cancellation
    /// notice and returns false.
    pub fn confirm(&mut self, message: &str) -> bool {
        if self.config.auto_approve {
            return true;
        }
        let confirmed = prompts::confirm(message, self.input.as_mut(), self.out.as_mut());
        if !confirmed {
            let _ = writeln!(self.out, "{}", prompts::CANCELLED);
        }
        confirmed
    }
}

/// What the secret store holds for the configured site.
enum Stored {
    Token(String),
    NeedsRefresh,
    Nothing,
}

fn stored_credentials(config: &Config) -> Stored {
    let store = match secrets::create_store(&config.secrets_provider, config.config_dir()) {
        Ok(store) => store,
        Err(e) => {
            debug!(error = %e, "secret store unavailable");
            return Stored::Nothing;
        }
    };

    match store.get(&TokenSet::secret_key(&config.site)) {
        Ok(Some(json)) => match TokenSet::parse(&json) {
            Ok(tokens) if !tokens.is_expired() => return Stored::Token(tokens.access_token),
            Ok(tokens) if tokens.can_refresh() => return Stored::NeedsRefresh,
            Ok(_) => warn!("stored OAuth token expired; run 'pup auth login'"),
            Err(e) => warn!("ignoring stored OAuth tokens: {}", e),
        },
        Ok(None) => {}
        Err(e) => warn!("ignoring stored OAuth tokens: {}", e),
    }

    match store.get(&secrets::token_key(&config.site)) {
        Ok(Some(token)) => Stored::Token(token),
        Ok(None) => Stored::Nothing,
        Err(e) => {
            warn!("ignoring stored token: {}", e);
            Stored::Nothing
        }
    }
}
