//! client::factory
//!
//! Client construction from resolved configuration.
//!
//! # Design
//!
//! Commands never construct clients directly. The session holds a
//! [`ClientFactory`] and calls it at most once for the default client; tests
//! swap in a factory that returns a [`MockApi`](super::mock::MockApi).
//!
//! # Credential Precedence
//!
//! The default factory prefers a bearer token when one is available and
//! falls back to the API/application key pair. The API-key factory always
//! uses the key pair and is used for endpoints that reject bearer tokens.

use std::sync::Arc;

use super::datadog::{Credentials, DatadogClient};
use super::traits::{ClientError, DatadogApi};
use crate::core::agent;
use crate::core::config::Config;

/// Builds a client for a configuration.
pub type ClientFactory =
    Box<dyn Fn(&Config) -> Result<Arc<dyn DatadogApi>, ClientError> + Send + Sync>;

/// Bearer token when present, otherwise API keys.
pub fn default_client_factory() -> ClientFactory {
    Box::new(|config: &Config| {
        config
            .validate_auth()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;
        let credentials = match config.access_token {
            Some(ref token) => Credentials::Bearer(token.clone()),
            None => api_key_credentials(config)?,
        };
        build(config, credentials)
    })
}

/// Always API keys.
pub fn default_api_key_client_factory() -> ClientFactory {
    Box::new(|config: &Config| build(config, api_key_credentials(config)?))
}

fn api_key_credentials(config: &Config) -> Result<Credentials, ClientError> {
    match (&config.api_key, &config.app_key) {
        (Some(api_key), Some(app_key)) => Ok(Credentials::ApiKeys {
            api_key: api_key.clone(),
            app_key: app_key.clone(),
        }),
        _ => Err(ClientError::Configuration(
            "DD_API_KEY and DD_APP_KEY are required".to_string(),
        )),
    }
}

fn build(config: &Config, credentials: Credentials) -> Result<Arc<dyn DatadogApi>, ClientError> {
    let user_agent = agent::user_agent(config.agent.as_ref());
    let client = DatadogClient::new(config.api_base_url(), credentials, &user_agent)?;
    Ok(Arc::new(client))
}
