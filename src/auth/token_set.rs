//! auth::token_set
//!
//! Stored OAuth state for one site.
//!
//! # Storage
//!
//! Both records live in the [`SecretStore`](crate::secrets::SecretStore) as
//! JSON, keyed per site:
//!
//! - [`TokenSet::secret_key`]: access and refresh tokens
//! - [`ClientCredentials::secret_key`]: the dynamically registered client
//!
//! # Security
//!
//! [`TokenSet`] implements `Debug` by hand so token values never reach
//! logs or `{:?}` output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::AuthError;
use super::oauth_client::TokenResponse;

/// Refresh this long before the access token actually expires.
pub const EXPIRY_BUFFER_SECS: i64 = 300;

/// Tokens from the most recent exchange or refresh.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    pub access_token: String,

    /// Empty when the server issued none.
    #[serde(default)]
    pub refresh_token: String,

    #[serde(default = "default_token_type")]
    pub token_type: String,

    /// Lifetime of the access token in seconds, from `issued_at`.
    pub expires_in: i64,

    /// Unix seconds.
    pub issued_at: i64,

    #[serde(default)]
    pub scope: String,

    /// Client the tokens were issued to; needed for refresh.
    #[serde(default)]
    pub client_id: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl TokenSet {
    pub fn secret_key(site: &str) -> String {
        format!("pup.oauth.tokens.{}", site)
    }

    /// Build from a token endpoint response received at `now`.
    pub fn from_response(response: TokenResponse, client_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            token_type: response.token_type,
            expires_in: response.expires_in,
            issued_at: now.timestamp(),
            scope: response.scope,
            client_id: client_id.to_string(),
        }
    }

    /// A refresh response may omit the refresh token; keep ours then.
    pub fn refreshed(&self, response: TokenResponse, now: DateTime<Utc>) -> Self {
        let mut next = Self::from_response(response, &self.client_id, now);
        if next.refresh_token.is_empty() {
            next.refresh_token = self.refresh_token.clone();
        }
        if next.scope.is_empty() {
            next.scope = self.scope.clone();
        }
        next
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.issued_at.saturating_add(self.expires_in), 0)
    }

    /// Expired, or within [`EXPIRY_BUFFER_SECS`] of it.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        let deadline = self
            .issued_at
            .saturating_add(self.expires_in)
            .saturating_sub(EXPIRY_BUFFER_SECS);
        now.timestamp() >= deadline
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn can_refresh(&self) -> bool {
        !self.refresh_token.is_empty()
    }

    pub fn parse(json: &str) -> Result<Self, AuthError> {
        serde_json::from_str(json).map_err(|e| AuthError::InvalidStored(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, AuthError> {
        serde_json::to_string_pretty(self).map_err(|e| AuthError::InvalidStored(e.to_string()))
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &if self.can_refresh() { "[REDACTED]" } else { "" })
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("issued_at", &self.issued_at)
            .field("scope", &self.scope)
            .field("client_id", &self.client_id)
            .finish()
    }
}

/// A client registered through dynamic client registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_name: String,
    pub redirect_uris: Vec<String>,
    /// Unix seconds.
    pub registered_at: i64,
    pub site: String,
}

impl ClientCredentials {
    pub fn secret_key(site: &str) -> String {
        format!("pup.oauth.client.{}", site)
    }

    /// The registration can be reused for a login redirecting to `uri`.
    pub fn allows_redirect(&self, uri: &str) -> bool {
        self.redirect_uris.iter().any(|registered| registered == uri)
    }

    pub fn parse(json: &str) -> Result<Self, AuthError> {
        serde_json::from_str(json).map_err(|e| AuthError::InvalidStored(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, AuthError> {
        serde_json::to_string_pretty(self).map_err(|e| AuthError::InvalidStored(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn tokens(issued_at: i64, expires_in: i64) -> TokenSet {
        TokenSet {
            access_token: "access-secret".into(),
            refresh_token: "refresh-secret".into(),
            token_type: "Bearer".into(),
            expires_in,
            issued_at,
            scope: "monitors_read".into(),
            client_id: "client-1".into(),
        }
    }

    fn response(access: &str, refresh: &str) -> TokenResponse {
        serde_json::from_value(serde_json::json!({
            "access_token": access,
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": refresh,
        }))
        .unwrap()
    }

    mod expiry {
        use super::*;

        #[test]
        fn expires_five_minutes_early() {
            let t = tokens(1_000, 3_600);
            assert!(!t.is_expired_at(at(1_000)));
            assert!(!t.is_expired_at(at(4_299)));
            assert!(t.is_expired_at(at(4_300)));
            assert!(t.is_expired_at(at(10_000)));
        }

        #[test]
        fn short_lived_tokens_are_already_stale() {
            assert!(tokens(1_000, 60).is_expired_at(at(1_000)));
        }

        #[test]
        fn extreme_values_do_not_overflow() {
            let t = tokens(i64::MAX, i64::MAX);
            assert!(!t.is_expired_at(at(0)));
            assert!(t.expires_at().is_none());
        }

        #[test]
        fn expires_at_is_issue_plus_lifetime() {
            assert_eq!(tokens(1_000, 3_600).expires_at(), Some(at(4_600)));
        }
    }

    mod refresh {
        use super::*;

        #[test]
        fn keeps_refresh_token_when_omitted() {
            let old = tokens(1_000, 3_600);
            let next = old.refreshed(response("new-access", ""), at(5_000));
            assert_eq!(next.access_token, "new-access");
            assert_eq!(next.refresh_token, "refresh-secret");
            assert_eq!(next.issued_at, 5_000);
            assert_eq!(next.client_id, "client-1");
            assert_eq!(next.scope, "monitors_read");
        }

        #[test]
        fn rotates_refresh_token() {
            let next = tokens(1_000, 3_600).refreshed(response("a", "rotated"), at(5_000));
            assert_eq!(next.refresh_token, "rotated");
        }

        #[test]
        fn no_refresh_token() {
            let mut t = tokens(1_000, 3_600);
            t.refresh_token.clear();
            assert!(!t.can_refresh());
        }
    }

    mod storage {
        use super::*;

        #[test]
        fn keys_are_per_site() {
            assert_eq!(TokenSet::secret_key("datadoghq.eu"), "pup.oauth.tokens.datadoghq.eu");
            assert_eq!(
                ClientCredentials::secret_key("datadoghq.eu"),
                "pup.oauth.client.datadoghq.eu"
            );
        }

        #[test]
        fn defaults_fill_missing_fields() {
            let t = TokenSet::parse(r#"{"access_token":"a","expires_in":10,"issued_at":5}"#).unwrap();
            assert_eq!(t.token_type, "Bearer");
            assert!(t.refresh_token.is_empty());
            assert!(t.client_id.is_empty());
        }

        #[test]
        fn garbage_is_invalid_stored() {
            assert!(matches!(
                TokenSet::parse("not json"),
                Err(AuthError::InvalidStored(_))
            ));
        }

        #[test]
        fn json_keeps_every_field() {
            let t = tokens(1_000, 3_600);
            assert_eq!(TokenSet::parse(&t.to_json().unwrap()).unwrap(), t);
        }

        #[test]
        fn redirect_reuse() {
            let creds = ClientCredentials {
                client_id: "c".into(),
                client_name: "pup".into(),
                redirect_uris: vec!["http://127.0.0.1:8000/oauth/callback".into()],
                registered_at: 0,
                site: "datadoghq.com".into(),
            };
            assert!(creds.allows_redirect("http://127.0.0.1:8000/oauth/callback"));
            assert!(!creds.allows_redirect("http://127.0.0.1:8080/oauth/callback"));
        }
    }

    #[test]
    fn debug_redacts_tokens() {
        let rendered = format!("{:?}", tokens(1_000, 3_600));
        assert!(!rendered.contains("access-secret"));
        assert!(!rendered.contains("refresh-secret"));
        assert!(rendered.contains("client-1"));
    }
}
