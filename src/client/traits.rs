//! client::traits
//!
//! The API boundary every command talks through.
//!
//! # Design
//!
//! One request type and one error type cover every endpoint. Commands build
//! an [`ApiRequest`], send it through a [`DatadogApi`], and get back either
//! decoded JSON or an [`ApiError`] that always exposes the HTTP status and
//! raw body the same way. Formatting code never inspects transport details.
//!
//! # Example
//!
//! ```ignore
//! use pup::client::{ApiRequest, DatadogApi};
//!
//! async fn list(api: &dyn DatadogApi) -> Result<serde_json::Value, pup::client::ApiError> {
//!     api.send(ApiRequest::get("/api/v1/monitor").query("page_size", 50)).await
//! }
//! ```

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// HTTP verbs used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single REST call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path beginning with `/api/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, path).body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Put, path).body(body)
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Patch, path).body(body)
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Append a query parameter only when a value is present.
    pub fn query_opt<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Query value for `key`, if set.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A failed API call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("{status} {reason}")]
    Status {
        status: u16,
        reason: String,
        body: Option<String>,
    },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The response body was not valid JSON.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body, when the server sent one.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } => body.as_deref(),
            _ => None,
        }
    }
}

/// How a client authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>`
    Bearer,
    /// `DD-API-KEY` + `DD-APPLICATION-KEY`
    ApiKeys,
}

/// Failures building a client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("failed to create client: {0}")]
    Configuration(String),

    #[error(
        "endpoint {method} {path} does not support OAuth authentication. \
         Please set DD_API_KEY and DD_APP_KEY environment variables"
    )]
    Authentication { method: Method, path: String },
}

/// A client that can execute API requests.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so one client can be shared
/// behind an `Arc` for the life of the process.
#[async_trait]
pub trait DatadogApi: Send + Sync {
    /// How this client authenticates.
    fn auth_scheme(&self) -> AuthScheme;

    /// Execute a request. Empty success bodies decode to `null`.
    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError>;
}
