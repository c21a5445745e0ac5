//! auth
//!
//! OAuth2 browser login for Datadog.
//!
//! # Flow
//!
//! 1. Bind a loopback callback server ([`CallbackServer`])
//! 2. Register a public client for the site, or reuse the stored one
//! 3. Open the authorize URL with a PKCE challenge and a random `state`
//! 4. Exchange the redirected code for tokens and store them per site
//!
//! Later invocations load the stored [`TokenSet`]; once it is within
//! [`EXPIRY_BUFFER_SECS`] of expiry, [`OAuthManager::access_token`]
//! refreshes it before the first request.
//!
//! # Security
//!
//! Token values are redacted from `Debug` output and error messages.

mod callback;
mod errors;
mod manager;
mod oauth_client;
mod pkce;
mod token_set;

pub use callback::{CallbackParams, CallbackServer, CALLBACK_PATH, CALLBACK_PORTS, CALLBACK_TIMEOUT};
pub use errors::AuthError;
pub use manager::OAuthManager;
pub use oauth_client::{OAuthClient, TokenResponse, CLIENT_NAME, DEFAULT_SCOPES};
pub use pkce::{generate_state, PkceChallenge, CHALLENGE_METHOD};
pub use token_set::{ClientCredentials, TokenSet, EXPIRY_BUFFER_SECS};
