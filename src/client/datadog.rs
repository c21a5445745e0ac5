//! client::datadog
//!
//! HTTP client for the Datadog REST API.
//!
//! # Authentication
//!
//! Credentials are fixed at construction and baked into the default headers:
//! either `Authorization: Bearer <token>` or the `DD-API-KEY` and
//! `DD-APPLICATION-KEY` pair. Header values are marked sensitive so they
//! never appear in reqwest's debug output.
//!
//! # Responses
//!
//! Any 2xx response decodes to JSON, with an empty body mapping to `null`.
//! Everything else becomes [`ApiError::Status`] carrying the raw body.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::debug;

use super::traits::{ApiError, ApiRequest, AuthScheme, ClientError, DatadogApi, Method};

/// Credentials for a client.
#[derive(Clone)]
pub enum Credentials {
    Bearer(String),
    ApiKeys { api_key: String, app_key: String },
}

impl Credentials {
    pub fn scheme(&self) -> AuthScheme {
        match self {
            Credentials::Bearer(_) => AuthScheme::Bearer,
            Credentials::ApiKeys { .. } => AuthScheme::ApiKeys,
        }
    }

    fn headers(&self) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        match self {
            Credentials::Bearer(token) => {
                headers.insert(AUTHORIZATION, sensitive(&format!("Bearer {}", token))?);
            }
            Credentials::ApiKeys { api_key, app_key } => {
                headers.insert("DD-API-KEY", sensitive(api_key)?);
                headers.insert("DD-APPLICATION-KEY", sensitive(app_key)?);
            }
        }
        Ok(headers)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Bearer(_) => f.write_str("Bearer([REDACTED])"),
            Credentials::ApiKeys { .. } => f.write_str("ApiKeys([REDACTED])"),
        }
    }
}

fn sensitive(value: &str) -> Result<HeaderValue, ClientError> {
    let mut header = HeaderValue::from_str(value)
        .map_err(|_| ClientError::Configuration("credential contains invalid characters".into()))?;
    header.set_sensitive(true);
    Ok(header)
}

/// Datadog API client.
pub struct DatadogClient {
    http: Client,
    base_url: String,
    scheme: AuthScheme,
}

impl std::fmt::Debug for DatadogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatadogClient")
            .field("base_url", &self.base_url)
            .field("scheme", &self.scheme)
            .finish()
    }
}

impl DatadogClient {
    /// Build a client for `base_url` (for example `https://api.datadoghq.com`).
    pub fn new(
        base_url: impl Into<String>,
        credentials: Credentials,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let http = Client::builder()
            .default_headers(credentials.headers()?)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            scheme: credentials.scheme(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl DatadogApi for DatadogClient {
    fn auth_scheme(&self) -> AuthScheme {
        self.scheme
    }

    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        };
        debug!(method = %request.method, path = %request.path, "sending request");

        let mut builder = self.http.request(method, self.url(&request.path));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        decode_response(response).await
    }
}

async fn decode_response(response: Response) -> Result<Value, ApiError> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    debug!(status = status.as_u16(), bytes = text.len(), "received response");

    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            body: (!text.trim().is_empty()).then_some(text),
        });
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Unauthenticated GET of a public JSON document.
pub async fn fetch_public_json(url: &str, user_agent: &str) -> Result<Value, ApiError> {
    let http = Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|e| ApiError::Network(e.to_string()))?;
    let response = http
        .get(url)
        .header(ACCEPT, "application/json")
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    decode_response(response).await
}
