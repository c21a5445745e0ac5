//! client::mock
//!
//! In-memory API for deterministic tests.
//!
//! # Design
//!
//! Responses are canned per method and path. Every request is recorded so
//! tests can assert on exactly what a command sent. Unmatched requests get
//! the default response, `{}` unless changed.
//!
//! # Example
//!
//! ```
//! use pup::client::mock::MockApi;
//! use pup::client::{ApiRequest, DatadogApi, Method};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let api = MockApi::new().respond(Method::Get, "/api/v1/monitor", json!([{"id": 1}]));
//!
//! let value = api.send(ApiRequest::get("/api/v1/monitor")).await.unwrap();
//! assert_eq!(value[0]["id"], 1);
//! assert_eq!(api.requests().len(), 1);
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::traits::{ApiError, ApiRequest, AuthScheme, DatadogApi, Method};

/// Mock API for testing.
///
/// Clones share state, so a test can keep a handle while the session owns
/// another.
#[derive(Debug, Clone)]
pub struct MockApi {
    inner: Arc<Mutex<MockApiInner>>,
}

#[derive(Debug)]
struct MockApiInner {
    scheme: AuthScheme,
    responses: HashMap<(Method, String), Value>,
    default_response: Value,
    fail_on: Option<FailOn>,
    requests: Vec<ApiRequest>,
}

/// Which requests should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Every request fails with the error.
    Any(ApiError),
    /// Only requests matching the method and path fail.
    Request {
        method: Method,
        path: String,
        error: ApiError,
    },
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockApiInner {
                scheme: AuthScheme::ApiKeys,
                responses: HashMap::new(),
                default_response: json!({}),
                fail_on: None,
                requests: Vec::new(),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockApiInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Report a different authentication scheme.
    pub fn with_scheme(self, scheme: AuthScheme) -> Self {
        self.state().scheme = scheme;
        self
    }

    /// Answer `method path` with `value`.
    pub fn respond(self, method: Method, path: &str, value: Value) -> Self {
        self.state()
            .responses
            .insert((method, path.to_string()), value);
        self
    }

    /// Answer unmatched requests with `value`.
    pub fn default_response(self, value: Value) -> Self {
        self.state().default_response = value;
        self
    }

    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.state().fail_on = Some(fail_on);
        self
    }

    pub fn clear_fail_on(&self) {
        self.state().fail_on = None;
    }

    /// All requests received, oldest first.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state().requests.clone()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.state().requests.last().cloned()
    }
}

#[async_trait]
impl DatadogApi for MockApi {
    fn auth_scheme(&self) -> AuthScheme {
        self.state().scheme
    }

    async fn send(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let mut state = self.state();
        state.requests.push(request.clone());

        match &state.fail_on {
            Some(FailOn::Any(error)) => return Err(error.clone()),
            Some(FailOn::Request {
                method,
                path,
                error,
            }) if *method == request.method && *path == request.path => {
                return Err(error.clone())
            }
            _ => {}
        }

        Ok(state
            .responses
            .get(&(request.method, request.path))
            .cloned()
            .unwrap_or_else(|| state.default_response.clone()))
    }
}
