//! auth::errors
//!
//! Error types for OAuth login and token refresh.
//!
//! Messages never carry token values; server error bodies are reduced to
//! the OAuth `error` code and description.

use thiserror::Error;

/// Errors from OAuth operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No OAuth session is stored for the site.
    #[error("not logged in to {0}. Run 'pup auth login'.")]
    NotAuthenticated(String),

    /// The access token expired and cannot be refreshed.
    #[error("OAuth session for {0} expired. Run 'pup auth login' again.")]
    Expired(String),

    /// Dynamic client registration was rejected.
    #[error("client registration failed: {0}")]
    Registration(String),

    /// The token endpoint rejected an exchange or refresh.
    #[error("token request failed: {0}")]
    TokenRequest(String),

    /// The browser redirect reported an error or carried no code.
    #[error("authorization failed: {0}")]
    Authorization(String),

    /// The redirect's `state` did not match the one we sent.
    #[error("OAuth state mismatch; ignoring a callback that did not come from this login")]
    StateMismatch,

    /// Nobody completed the browser step in time.
    #[error("timed out waiting for the browser to complete login")]
    CallbackTimeout,

    /// Every callback port was taken.
    #[error("no callback port available (tried {0})")]
    NoCallbackPort(String),

    /// Stored tokens or client credentials could not be parsed.
    #[error("invalid stored credentials: {0}")]
    InvalidStored(String),

    #[error("secret store error: {0}")]
    SecretStore(String),

    #[error("network error: {0}")]
    Network(String),

    /// The loopback callback server failed.
    #[error("callback server error: {0}")]
    Callback(String),
}

impl AuthError {
    /// Resolved by running `pup auth login` again.
    pub fn needs_reauth(&self) -> bool {
        matches!(
            self,
            AuthError::NotAuthenticated(_) | AuthError::Expired(_) | AuthError::InvalidStored(_)
        )
    }
}

impl From<crate::secrets::SecretError> for AuthError {
    fn from(err: crate::secrets::SecretError) -> Self {
        AuthError::SecretStore(err.to_string())
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        AuthError::Network(err.without_url().to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        AuthError::Callback(err.to_string())
    }
}
