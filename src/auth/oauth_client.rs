//! auth::oauth_client
//!
//! HTTP side of the Datadog OAuth2 flow.
//!
//! # Endpoints
//!
//! - `POST {api}/api/v2/oauth2/register`: dynamic client registration
//! - `GET {app}/oauth2/v1/authorize`: browser step, built as a URL only
//! - `POST {api}/oauth2/v1/token`: code exchange and refresh, form encoded
//!
//! `{api}` is `https://api.<site>` and `{app}` is `https://app.<site>`.
//! Both can be pointed elsewhere for tests.
//!
//! # Example
//!
//! ```ignore
//! use pup::auth::OAuthClient;
//!
//! let client = OAuthClient::for_site("datadoghq.com");
//! let creds = client.register("http://127.0.0.1:8000/oauth/callback").await?;
//! let tokens = client.refresh(&creds.client_id, &refresh_token).await?;
//! ```

use std::fmt;

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::errors::AuthError;
use super::pkce::CHALLENGE_METHOD;
use super::token_set::ClientCredentials;
use crate::core::config::Config;

/// Name sent with dynamic client registration.
pub const CLIENT_NAME: &str = "datadog-api-claude-plugin";

const REGISTER_PATH: &str = "/api/v2/oauth2/register";
const AUTHORIZE_PATH: &str = "/oauth2/v1/authorize";
const TOKEN_PATH: &str = "/oauth2/v1/token";

/// Scopes requested at login.
pub const DEFAULT_SCOPES: &[&str] = &[
    "apm_read",
    "cases_read",
    "cases_write",
    "dashboards_read",
    "dashboards_write",
    "events_read",
    "hosts_read",
    "incident_notification_settings_read",
    "incident_notification_settings_write",
    "incident_read",
    "incident_settings_read",
    "incident_settings_write",
    "incident_write",
    "logs_read_data",
    "logs_read_index_data",
    "metrics_read",
    "monitors_downtime",
    "monitors_read",
    "monitors_write",
    "rum_apps_read",
    "rum_apps_write",
    "rum_retention_filters_read",
    "rum_retention_filters_write",
    "security_monitoring_filters_read",
    "security_monitoring_findings_read",
    "security_monitoring_rules_read",
    "security_monitoring_signals_read",
    "slos_corrections",
    "slos_read",
    "slos_write",
    "synthetics_global_variable_read",
    "synthetics_private_location_read",
    "synthetics_read",
    "timeseries_query",
    "usage_read",
    "user_access_read",
    "user_self_profile_read",
];

/// Successful response from the token endpoint.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    #[serde(default = "bearer")]
    pub token_type: String,

    #[serde(default)]
    pub expires_in: i64,

    #[serde(default)]
    pub refresh_token: String,

    #[serde(default)]
    pub scope: String,
}

fn bearer() -> String {
    "Bearer".to_string()
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct RegistrationRequest<'a> {
    client_name: &'a str,
    redirect_uris: [&'a str; 1],
    grant_types: [&'a str; 2],
}

#[derive(Deserialize)]
struct RegistrationResponse {
    client_id: String,
    #[serde(default)]
    client_name: Option<String>,
    #[serde(default)]
    redirect_uris: Vec<String>,
}

/// Error body from OAuth endpoints.
#[derive(Deserialize)]
struct OAuthErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Client for registration and the token endpoint of one site.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: Client,
    site: String,
    api_base: String,
    app_base: String,
    user_agent: String,
}

impl OAuthClient {
    pub fn for_site(site: &str) -> Self {
        Self::with_base_urls(
            site,
            &format!("https://api.{}", site),
            &format!("https://app.{}", site),
        )
    }

    /// Honors the mock server override and the agent-aware User-Agent.
    pub fn for_config(config: &Config) -> Self {
        let app_base = config
            .base_url_override
            .clone()
            .unwrap_or_else(|| format!("https://app.{}", config.site));
        let mut client = Self::with_base_urls(&config.site, &config.api_base_url(), &app_base);
        client.user_agent = crate::core::agent::user_agent(config.agent.as_ref());
        client
    }

    pub fn with_base_urls(site: &str, api_base: &str, app_base: &str) -> Self {
        Self {
            http: Client::new(),
            site: site.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            app_base: app_base.trim_end_matches('/').to_string(),
            user_agent: crate::core::agent::user_agent(None),
        }
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Ok(ua) = HeaderValue::from_str(&self.user_agent) {
            headers.insert(USER_AGENT, ua);
        }
        headers
    }

    /// Register a public client that redirects to `redirect_uri`.
    pub async fn register(&self, redirect_uri: &str) -> Result<ClientCredentials, AuthError> {
        let request = RegistrationRequest {
            client_name: CLIENT_NAME,
            redirect_uris: [redirect_uri],
            grant_types: ["authorization_code", "refresh_token"],
        };
        debug!(site = %self.site, redirect_uri, "registering OAuth client");

        let response = self
            .http
            .post(format!("{}{}", self.api_base, REGISTER_PATH))
            .headers(self.headers())
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::CREATED && status != StatusCode::OK {
            return Err(AuthError::Registration(describe_failure(status, &body)));
        }

        let registered: RegistrationResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::Registration(format!("unexpected response: {}", e)))?;
        Ok(ClientCredentials {
            client_id: registered.client_id,
            client_name: registered.client_name.unwrap_or_else(|| CLIENT_NAME.to_string()),
            redirect_uris: if registered.redirect_uris.is_empty() {
                vec![redirect_uri.to_string()]
            } else {
                registered.redirect_uris
            },
            registered_at: Utc::now().timestamp(),
            site: self.site.clone(),
        })
    }

    /// URL the user opens to grant access.
    pub fn authorize_url(
        &self,
        client_id: &str,
        redirect_uri: &str,
        state: &str,
        code_challenge: &str,
        scopes: &[&str],
    ) -> Result<String, AuthError> {
        let scope = scopes.join(" ");
        let url = Url::parse_with_params(
            &format!("{}{}", self.app_base, AUTHORIZE_PATH),
            &[
                ("response_type", "code"),
                ("client_id", client_id),
                ("redirect_uri", redirect_uri),
                ("state", state),
                ("scope", scope.as_str()),
                ("code_challenge", code_challenge),
                ("code_challenge_method", CHALLENGE_METHOD),
            ],
        )
        .map_err(|e| AuthError::Authorization(format!("invalid authorize URL: {}", e)))?;
        Ok(url.into())
    }

    /// Trade an authorization code for tokens.
    pub async fn exchange_code(
        &self,
        client_id: &str,
        code: &str,
        redirect_uri: &str,
        code_verifier: &str,
    ) -> Result<TokenResponse, AuthError> {
        debug!(site = %self.site, "exchanging authorization code");
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("client_id", client_id),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("code_verifier", code_verifier),
        ])
        .await
    }

    pub async fn refresh(
        &self,
        client_id: &str,
        refresh_token: &str,
    ) -> Result<TokenResponse, AuthError> {
        debug!(site = %self.site, "refreshing access token");
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("client_id", client_id),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn token_request(&self, params: &[(&str, &str)]) -> Result<TokenResponse, AuthError> {
        let form: Vec<(&str, &str)> = params
            .iter()
            .copied()
            .filter(|(_, value)| !value.is_empty())
            .collect();

        let response = self
            .http
            .post(format!("{}{}", self.api_base, TOKEN_PATH))
            .headers(self.headers())
            .form(&form)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AuthError::TokenRequest(describe_failure(status, &body)));
        }
        serde_json::from_str(&body)
            .map_err(|e| AuthError::TokenRequest(format!("unexpected response: {}", e)))
    }
}

/// Status plus the OAuth error code, never the raw body.
fn describe_failure(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<OAuthErrorBody>(body) {
        Ok(err) => match err.error_description.filter(|d| !d.is_empty()) {
            Some(description) => format!("{} ({}): {}", err.error, status.as_u16(), description),
            None => format!("{} ({})", err.error, status.as_u16()),
        },
        Err(_) => format!("HTTP {}", status),
    }
}
