//! client
//!
//! Datadog API access.
//!
//! Commands depend only on [`DatadogApi`]. [`DatadogClient`] talks HTTP,
//! [`mock::MockApi`] answers from memory, and [`endpoints`] knows which
//! paths refuse bearer tokens.

pub mod datadog;
pub mod endpoints;
pub mod factory;
pub mod mock;
pub mod traits;

pub use datadog::{fetch_public_json, Credentials, DatadogClient};
pub use factory::{default_api_key_client_factory, default_client_factory, ClientFactory};
pub use traits::{ApiError, ApiRequest, AuthScheme, ClientError, DatadogApi, Method};
