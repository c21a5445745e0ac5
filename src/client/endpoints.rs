//! client::endpoints
//!
//! Endpoints that reject OAuth bearer tokens.
//!
//! # Matching
//!
//! Each entry is a method and a path. A path ending in `/` matches the
//! bare collection and any request path under it (so `/api/v2/api_keys/`
//! covers `/api/v2/api_keys` and `/api/v2/api_keys/abc`); other paths
//! must match exactly. The method must always match.

use super::traits::Method;

use Method::{Delete, Get, Patch, Post, Put};

static API_KEY_ONLY: &[(Method, &str)] = &[
    // Logs
    (Post, "/api/v2/logs/events"),
    (Post, "/api/v2/logs/events/search"),
    (Post, "/api/v2/logs/analytics/aggregate"),
    (Get, "/api/v2/logs/config/archives"),
    (Get, "/api/v2/logs/config/archives/"),
    (Delete, "/api/v2/logs/config/archives/"),
    (Get, "/api/v2/logs/config/custom_destinations"),
    (Get, "/api/v2/logs/config/custom_destinations/"),
    (Get, "/api/v2/logs/config/metrics"),
    (Get, "/api/v2/logs/config/metrics/"),
    (Delete, "/api/v2/logs/config/metrics/"),
    // RUM, including retention filters nested under applications/
    (Get, "/api/v2/rum/applications"),
    (Get, "/api/v2/rum/applications/"),
    (Post, "/api/v2/rum/applications"),
    (Patch, "/api/v2/rum/applications/"),
    (Delete, "/api/v2/rum/applications/"),
    (Get, "/api/v2/rum/metrics"),
    (Get, "/api/v2/rum/metrics/"),
    (Post, "/api/v2/rum/events/search"),
    // API and application keys
    (Get, "/api/v2/api_keys"),
    (Get, "/api/v2/api_keys/"),
    (Post, "/api/v2/api_keys"),
    (Delete, "/api/v2/api_keys/"),
    (Get, "/api/v2/application_keys"),
    (Get, "/api/v2/application_keys/"),
    (Post, "/api/v2/application_keys"),
    (Patch, "/api/v2/application_keys/"),
    (Delete, "/api/v2/application_keys/"),
    // Events
    (Post, "/api/v2/events/search"),
    // Error tracking
    (Post, "/api/v2/error_tracking/issues/search"),
    (Get, "/api/v2/error_tracking/issues/"),
    (Post, "/api/v2/error-tracking/issues/search"),
    (Get, "/api/v2/error-tracking/issues/"),
    // Fleet automation
    (Get, "/api/v2/fleet/agents"),
    (Get, "/api/v2/fleet/agents/"),
    (Get, "/api/v2/fleet/deployments"),
    (Get, "/api/v2/fleet/deployments/"),
    (Post, "/api/v2/fleet/deployments/configure"),
    (Post, "/api/v2/fleet/deployments/upgrade"),
    (Post, "/api/v2/fleet/deployments/"),
    (Delete, "/api/v2/fleet/deployments/"),
    (Get, "/api/v2/fleet/schedules"),
    (Get, "/api/v2/fleet/schedules/"),
    (Post, "/api/v2/fleet/schedules"),
    (Patch, "/api/v2/fleet/schedules/"),
    (Delete, "/api/v2/fleet/schedules/"),
    (Post, "/api/v2/fleet/schedules/"),
    // Notebooks
    (Get, "/api/v1/notebooks"),
    (Post, "/api/v1/notebooks"),
    (Get, "/api/v1/notebooks/"),
    (Put, "/api/v1/notebooks/"),
    (Delete, "/api/v1/notebooks/"),
];

/// The endpoint cannot be called with a bearer token.
pub fn requires_api_key_fallback(method: Method, path: &str) -> bool {
    let path = path.split('?').next().unwrap_or(path);
    API_KEY_ONLY.iter().any(|&(m, pattern)| {
        m == method
            && match pattern.strip_suffix('/') {
                Some(prefix) => path == prefix || path.starts_with(pattern),
                None => path == pattern,
            }
    })
}

/// The endpoint accepts a bearer token.
pub fn supports_oauth(method: Method, path: &str) -> bool {
    !requires_api_key_fallback(method, path)
}
