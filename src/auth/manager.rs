//! auth::manager
//!
//! OAuthManager - stored OAuth state for one site, with refresh.
//!
//! # Refresh
//!
//! [`access_token`](OAuthManager::access_token) returns the stored token
//! while it is outside the expiry buffer. Past that point it refreshes with
//! the stored refresh token, saves the new set, and returns the new token.
//! Without a refresh token the session is reported as expired.
//!
//! # Example
//!
//! ```ignore
//! use pup::auth::{OAuthClient, OAuthManager};
//!
//! let store = secrets::create_store("file", config.config_dir())?;
//! let manager = OAuthManager::new("datadoghq.com", store, OAuthClient::for_site("datadoghq.com"));
//! let token = manager.access_token().await?;
//! ```

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info};

use super::callback::CallbackServer;
use super::errors::AuthError;
use super::oauth_client::{OAuthClient, DEFAULT_SCOPES};
use super::pkce::{generate_state, PkceChallenge};
use super::token_set::{ClientCredentials, TokenSet};
use crate::secrets::SecretStore;

/// OAuth state for one site, backed by a [`SecretStore`].
pub struct OAuthManager {
    site: String,
    store: Box<dyn SecretStore>,
    client: OAuthClient,
}

impl OAuthManager {
    pub fn new(site: &str, store: Box<dyn SecretStore>, client: OAuthClient) -> Self {
        Self {
            site: site.to_string(),
            store,
            client,
        }
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn load_tokens(&self) -> Result<Option<TokenSet>, AuthError> {
        match self.store.get(&TokenSet::secret_key(&self.site))? {
            Some(json) => Ok(Some(TokenSet::parse(&json)?)),
            None => Ok(None),
        }
    }

    pub fn save_tokens(&self, tokens: &TokenSet) -> Result<(), AuthError> {
        self.store
            .set(&TokenSet::secret_key(&self.site), &tokens.to_json()?)?;
        Ok(())
    }

    pub fn load_client(&self) -> Result<Option<ClientCredentials>, AuthError> {
        match self.store.get(&ClientCredentials::secret_key(&self.site))? {
            Some(json) => Ok(Some(ClientCredentials::parse(&json)?)),
            None => Ok(None),
        }
    }

    fn save_client(&self, creds: &ClientCredentials) -> Result<(), AuthError> {
        self.store
            .set(&ClientCredentials::secret_key(&self.site), &creds.to_json()?)?;
        Ok(())
    }

    /// Forget tokens and the registered client.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.store.delete(&TokenSet::secret_key(&self.site))?;
        self.store.delete(&ClientCredentials::secret_key(&self.site))?;
        Ok(())
    }

    /// A usable access token, refreshing when needed.
    ///
    /// # Errors
    ///
    /// - [`AuthError::NotAuthenticated`] when nothing is stored
    /// - [`AuthError::Expired`] when the token is stale and cannot be refreshed
    /// - [`AuthError::TokenRequest`] when the server rejects the refresh
    pub async fn access_token(&self) -> Result<String, AuthError> {
        let tokens = self
            .load_tokens()?
            .ok_or_else(|| AuthError::NotAuthenticated(self.site.clone()))?;
        if !tokens.is_expired() {
            return Ok(tokens.access_token);
        }
        if !tokens.can_refresh() {
            return Err(AuthError::Expired(self.site.clone()));
        }
        Ok(self.refresh(&tokens).await?.access_token)
    }

    /// Refresh `tokens` and store the result.
    pub async fn refresh(&self, tokens: &TokenSet) -> Result<TokenSet, AuthError> {
        if !tokens.can_refresh() {
            return Err(AuthError::Expired(self.site.clone()));
        }
        let client_id = if tokens.client_id.is_empty() {
            self.load_client()?
                .map(|creds| creds.client_id)
                .ok_or_else(|| AuthError::Expired(self.site.clone()))?
        } else {
            tokens.client_id.clone()
        };

        let response = self.client.refresh(&client_id, &tokens.refresh_token).await?;
        let mut refreshed = tokens.refreshed(response, Utc::now());
        refreshed.client_id = client_id;
        self.save_tokens(&refreshed)?;
        info!(site = %self.site, "refreshed OAuth access token");
        Ok(refreshed)
    }

    /// Stored registration if it accepts `redirect_uri`, otherwise a new one.
    pub async fn client_for(&self, redirect_uri: &str) -> Result<ClientCredentials, AuthError> {
        match self.load_client() {
            Ok(Some(creds)) if creds.allows_redirect(redirect_uri) => {
                debug!(site = %self.site, "reusing registered OAuth client");
                return Ok(creds);
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "ignoring unreadable client registration"),
        }
        let creds = self.client.register(redirect_uri).await?;
        self.save_client(&creds)?;
        Ok(creds)
    }

    /// Browser login.
    ///
    /// `show_url` receives the authorize URL; it is expected to open a
    /// browser or print the link. The callback `server` then waits up to
    /// `timeout` for the redirect.
    pub async fn login<F>(
        &self,
        server: &CallbackServer,
        timeout: Duration,
        show_url: F,
    ) -> Result<TokenSet, AuthError>
    where
        F: FnOnce(&str),
    {
        let redirect_uri = server.redirect_uri();
        let creds = self.client_for(&redirect_uri).await?;
        let pkce = PkceChallenge::generate();
        let state = generate_state();

        let url = self.client.authorize_url(
            &creds.client_id,
            &redirect_uri,
            &state,
            &pkce.challenge,
            DEFAULT_SCOPES,
        )?;
        show_url(&url);

        let code = server.wait_for_code(&state, timeout).await?;
        let response = self
            .client
            .exchange_code(&creds.client_id, &code, &redirect_uri, &pkce.verifier)
            .await?;
        let tokens = TokenSet::from_response(response, &creds.client_id, Utc::now());
        self.save_tokens(&tokens)?;
        info!(site = %self.site, "stored OAuth tokens");
        Ok(tokens)
    }
}

impl std::fmt::Debug for OAuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthManager")
            .field("site", &self.site)
            .field("provider", &self.store.provider())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secrets::FileSecretStore;
    use serde_json::json;
    use std::collections::HashMap;
    use tempfile::TempDir;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SITE: &str = "datadoghq.com";

    fn manager(dir: &TempDir, server: &MockServer) -> OAuthManager {
        OAuthManager::new(
            SITE,
            Box::new(FileSecretStore::in_dir(dir.path())),
            OAuthClient::with_base_urls(SITE, &server.uri(), &server.uri()),
        )
    }

    fn stored(issued_at: i64, refresh_token: &str) -> TokenSet {
        TokenSet {
            access_token: "old-access".into(),
            refresh_token: refresh_token.into(),
            token_type: "Bearer".into(),
            expires_in: 3600,
            issued_at,
            scope: "monitors_read".into(),
            client_id: "client-1".into(),
        }
    }

    fn token_body(access: &str, refresh: &str) -> serde_json::Value {
        json!({
            "access_token": access,
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": refresh,
            "scope": "monitors_read",
        })
    }

    mod access_token {
        use super::*;

        #[tokio::test]
        async fn fresh_token_skips_network() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(500))
                .expect(0)
                .mount(&server)
                .await;
            let dir = TempDir::new().unwrap();
            let m = manager(&dir, &server);
            m.save_tokens(&stored(Utc::now().timestamp(), "r")).unwrap();

            assert_eq!(m.access_token().await.unwrap(), "old-access");
        }

        #[tokio::test]
        async fn expired_token_is_refreshed_and_saved() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/oauth2/v1/token"))
                .and(body_string_contains("grant_type=refresh_token"))
                .and(body_string_contains("refresh_token=old-refresh"))
                .and(body_string_contains("client_id=client-1"))
                .respond_with(ResponseTemplate::new(200).set_body_json(token_body("new-access", "new-refresh")))
                .expect(1)
                .mount(&server)
                .await;
            let dir = TempDir::new().unwrap();
            let m = manager(&dir, &server);
            m.save_tokens(&stored(1_000, "old-refresh")).unwrap();

            assert_eq!(m.access_token().await.unwrap(), "new-access");
            let saved = m.load_tokens().unwrap().unwrap();
            assert_eq!(saved.refresh_token, "new-refresh");
            assert_eq!(saved.client_id, "client-1");
            assert!(!saved.is_expired());
        }

        #[tokio::test]
        async fn rejected_refresh_is_token_error() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/oauth2/v1/token"))
                .respond_with(
                    ResponseTemplate::new(400)
                        .set_body_json(json!({"error": "invalid_grant", "error_description": "revoked"})),
                )
                .mount(&server)
                .await;
            let dir = TempDir::new().unwrap();
            let m = manager(&dir, &server);
            m.save_tokens(&stored(1_000, "old-refresh")).unwrap();

            let err = m.access_token().await.unwrap_err();
            assert!(matches!(err, AuthError::TokenRequest(_)));
            assert!(err.to_string().contains("invalid_grant"));
            assert!(!err.to_string().contains("old-refresh"));
        }

        #[tokio::test]
        async fn expired_without_refresh_token() {
            let server = MockServer::start().await;
            let dir = TempDir::new().unwrap();
            let m = manager(&dir, &server);
            m.save_tokens(&stored(1_000, "")).unwrap();

            assert!(matches!(m.access_token().await, Err(AuthError::Expired(_))));
        }

        #[tokio::test]
        async fn nothing_stored() {
            let server = MockServer::start().await;
            let dir = TempDir::new().unwrap();
            let m = manager(&dir, &server);
            assert!(matches!(
                m.access_token().await,
                Err(AuthError::NotAuthenticated(_))
            ));
        }
    }

    mod registration {
        use super::*;

        #[tokio::test]
        async fn registers_once_per_redirect() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/api/v2/oauth2/register"))
                .and(body_string_contains("datadog-api-claude-plugin"))
                .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                    "client_id": "dcr-client",
                    "client_name": "datadog-api-claude-plugin",
                    "redirect_uris": ["http://127.0.0.1:8000/oauth/callback"],
                })))
                .expect(2)
                .mount(&server)
                .await;
            let dir = TempDir::new().unwrap();
            let m = manager(&dir, &server);

            let first = m.client_for("http://127.0.0.1:8000/oauth/callback").await.unwrap();
            assert_eq!(first.client_id, "dcr-client");
            assert_eq!(first.site, SITE);
            let again = m.client_for("http://127.0.0.1:8000/oauth/callback").await.unwrap();
            assert_eq!(again, first);

            m.client_for("http://127.0.0.1:8080/oauth/callback").await.unwrap();
        }

        #[tokio::test]
        async fn registration_failure() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/api/v2/oauth2/register"))
                .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": "access_denied"})))
                .mount(&server)
                .await;
            let dir = TempDir::new().unwrap();
            let err = manager(&dir, &server)
                .client_for("http://127.0.0.1:8000/oauth/callback")
                .await
                .unwrap_err();
            assert_eq!(err.to_string(), "client registration failed: access_denied (403)");
        }
    }

    #[tokio::test]
    async fn login_exchanges_code_with_verifier() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/oauth2/register"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"client_id": "dcr-client"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/oauth2/v1/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=browser-code"))
            .and(body_string_contains("code_verifier="))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_body("fresh", "r1")))
            .expect(1)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let m = manager(&dir, &server);
        let callback = CallbackServer::bind_first(&[0]).await.unwrap();
        let redirect_uri = callback.redirect_uri();

        let tokens = m
            .login(&callback, Duration::from_secs(10), |url| {
                let query: HashMap<String, String> = reqwest::Url::parse(url)
                    .unwrap()
                    .query_pairs()
                    .into_owned()
                    .collect();
                assert_eq!(query["client_id"], "dcr-client");
                assert_eq!(query["code_challenge_method"], "S256");
                let target = format!(
                    "{}?code=browser-code&state={}",
                    query["redirect_uri"], query["state"]
                );
                tokio::spawn(async move {
                    let _ = reqwest::get(target).await;
                });
            })
            .await
            .unwrap();

        assert_eq!(tokens.access_token, "fresh");
        assert_eq!(tokens.client_id, "dcr-client");
        assert_eq!(m.load_tokens().unwrap().unwrap(), tokens);
        let creds = m.load_client().unwrap().unwrap();
        assert_eq!(creds.redirect_uris, vec![redirect_uri]);

        m.logout().unwrap();
        assert!(m.load_tokens().unwrap().is_none());
        assert!(m.load_client().unwrap().is_none());
    }
}
