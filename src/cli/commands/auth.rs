//! cli::commands::auth
//!
//! Browser login and stored credentials.
//!
//! # Design
//!
//! - `login` runs the OAuth2 browser flow from [`crate::auth`]; `--token`
//!   stores a pasted bearer token instead
//! - Everything is kept per site in the configured secret store
//! - `login`, `logout`, `status` and `refresh` never print a token
//! - `token` prints it on purpose, for piping into other tools
//!
//! # Example
//!
//! ```bash
//! # Browser login
//! pup auth login
//!
//! # Non-interactive
//! pup auth login --token "$DD_TOKEN"
//!
//! # Check status
//! pup auth status
//! ```

use anyhow::{bail, Context as _, Result};
use serde_json::json;
use tracing::warn;

use crate::auth::{AuthError, CallbackServer, OAuthManager, TokenSet, CALLBACK_TIMEOUT};
use crate::cli::args::AuthAction;
use crate::secrets::{self, SecretStore};
use crate::session::Session;
use crate::ui::prompts;

pub async fn run(session: &mut Session, action: AuthAction) -> Result<()> {
    let store = session
        .secret_store()
        .context("Failed to initialize secret store")?;
    let key = secrets::token_key(&session.config().site);

    match action {
        AuthAction::Login {
            token: Some(token),
            ..
        } => store_token(session, store.as_ref(), &key, token),
        AuthAction::Login {
            token: None,
            no_browser,
        } => browser_login(session, !no_browser).await,
        AuthAction::Logout => logout(session, store.as_ref(), &key),
        AuthAction::Status => status(session, store.as_ref(), &key),
        AuthAction::Token => print_token(session, store.as_ref(), &key).await,
        AuthAction::Refresh => refresh(session).await,
    }
}

fn manager(session: &Session) -> Result<OAuthManager> {
    session
        .oauth_manager()
        .context("Failed to initialize secret store")
}

async fn browser_login(session: &mut Session, open_browser: bool) -> Result<()> {
    let manager = manager(session)?;
    let server = CallbackServer::bind().await?;
    let site = session.config().site.clone();

    let out = session.out();
    let tokens = manager
        .login(&server, CALLBACK_TIMEOUT, |url| {
            let _ = writeln!(out, "Log in to {} by opening this URL:\n\n  {}\n", site, url);
            if open_browser {
                if let Err(e) = open::that(url) {
                    warn!("could not open a browser: {}", e);
                }
            }
            let _ = writeln!(out, "Waiting for the browser to finish...");
            let _ = out.flush();
        })
        .await?;

    session.println(format!(
        "Logged in to {}. Token expires {}.",
        site,
        describe_expiry(&tokens)
    ))
}

fn store_token(
    session: &mut Session,
    store: &dyn SecretStore,
    key: &str,
    token: String,
) -> Result<()> {
    let token = match token {
        t if !t.is_empty() => t,
        _ if session.config().agent_mode => {
            bail!("Token required. Use --token <TOKEN> in agent mode.")
        }
        _ => prompts::password("Datadog access token: ").context("Failed to read token")?,
    };
    validate_token(&token)?;

    store.set(key, &token).context("Failed to store token")?;
    let site = session.config().site.clone();
    session.println(format!("Token stored for {}.", site))
}

fn logout(session: &mut Session, store: &dyn SecretStore, key: &str) -> Result<()> {
    store
        .delete(key)
        .context("Failed to remove stored token")?;
    manager(session)?
        .logout()
        .context("Failed to remove stored OAuth credentials")?;
    let site = session.config().site.clone();
    session.println(format!("Logged out from {}.", site))
}

fn status(session: &mut Session, store: &dyn SecretStore, key: &str) -> Result<()> {
    let stored = store.exists(key)?;
    let oauth = manager(session)?.load_tokens()?;
    let site = session.config().site.clone();
    let has_token = session.config().access_token.is_some();
    let has_keys = session.config().has_api_keys();

    let oauth_status = match &oauth {
        None => "no token",
        Some(tokens) if tokens.is_expired() => "expired",
        Some(_) => "valid",
    };

    if session.config().agent_mode {
        let report = json!({
            "site": site,
            "authenticated": oauth_status == "valid" || has_token || has_keys,
            "status": oauth_status,
            "expires_at": oauth.as_ref().and_then(TokenSet::expires_at).map(|t| t.to_rfc3339()),
            "has_refresh": oauth.as_ref().is_some_and(TokenSet::can_refresh),
            "token_type": oauth.as_ref().map(|t| t.token_type.clone()),
            "stored_token": stored,
            "access_token": has_token,
            "api_keys": has_keys,
            "secrets_provider": store.provider(),
        });
        return session.emit_for("auth status", &report);
    }

    let configured = |yes: bool| if yes { "configured" } else { "not configured" };
    session.println(format!("Site: {}", site))?;
    match &oauth {
        Some(tokens) => session.println(format!(
            "OAuth: {}, expires {}{}",
            oauth_status,
            describe_expiry(tokens),
            if tokens.can_refresh() { " (refreshable)" } else { "" }
        ))?,
        None => session.println("OAuth: not logged in")?,
    }
    session.println(format!("Bearer token: {}", configured(has_token)))?;
    session.println(format!("API keys: {}", configured(has_keys)))?;
    if !has_token && !has_keys && oauth.is_none() {
        session.println("Run 'pup auth login' or set DD_API_KEY and DD_APP_KEY.")?;
    }
    Ok(())
}

/// OAuth token first, refreshed if stale; then a pasted token.
async fn print_token(session: &mut Session, store: &dyn SecretStore, key: &str) -> Result<()> {
    let token = match manager(session)?.access_token().await {
        Ok(token) => token,
        Err(AuthError::NotAuthenticated(site)) => match store.get(key)? {
            Some(token) => token,
            None => bail!("No token stored for {}. Run 'pup auth login' first.", site),
        },
        Err(e) => return Err(e.into()),
    };
    session.println(token)
}

async fn refresh(session: &mut Session) -> Result<()> {
    let manager = manager(session)?;
    let tokens = manager
        .load_tokens()?
        .ok_or_else(|| AuthError::NotAuthenticated(manager.site().to_string()))?;
    let refreshed = manager.refresh(&tokens).await?;
    let site = session.config().site.clone();
    session.println(format!(
        "Token for {} refreshed. It expires {}.",
        site,
        describe_expiry(&refreshed)
    ))
}

fn describe_expiry(tokens: &TokenSet) -> String {
    match tokens.expires_at() {
        Some(at) => format!("at {}", at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)),
        None => "at an unknown time".to_string(),
    }
}

/// Basic shape checks; the token is not verified against the API.
pub fn validate_token(token: &str) -> Result<()> {
    if token.is_empty() {
        bail!("Token cannot be empty.");
    }

    if token.len() < 10 {
        bail!("Token appears to be too short.");
    }

    if token.contains(' ') {
        bail!("Token should not contain spaces.");
    }

    if token.contains('\n') || token.contains('\r') {
        bail!("Token should not contain newlines.");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_token_rejects_empty() {
        assert!(validate_token("").is_err());
    }

    #[test]
    fn validate_token_rejects_short() {
        assert!(validate_token("abc").is_err());
    }

    #[test]
    fn validate_token_rejects_spaces() {
        assert!(validate_token("token with spaces").is_err());
    }

    #[test]
    fn validate_token_rejects_newlines() {
        assert!(validate_token("token\nwith\nnewlines").is_err());
        assert!(validate_token("token\rwith\rcarriage").is_err());
    }

    #[test]
    fn validate_token_accepts_valid() {
        assert!(validate_token("ddoat_0123456789abcdef").is_ok());
    }

    mod stored {
        use super::*;
        use crate::core::config::{Config, PupConfig};
        use crate::secrets::FileSecretStore;
        use std::io::{self, Write};
        use std::sync::{Arc, Mutex};
        use tempfile::TempDir;
        use wiremock::matchers::{body_string_contains, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        const SITE: &str = "datadoghq.com";

        #[derive(Clone, Default)]
        struct Buf(Arc<Mutex<Vec<u8>>>);

        impl Write for Buf {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        impl Buf {
            fn text(&self) -> String {
                String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
            }
        }

        fn session_in(dir: &TempDir, server: Option<&MockServer>) -> (Session, Buf) {
            let mock = server.map(|s| s.uri());
            let env = move |key: &str| match key {
                "DD_SITE" => Some(SITE.to_string()),
                "PUP_MOCK_SERVER" => mock.clone(),
                _ => None,
            };
            let config: Config =
                Config::resolve(PupConfig::default(), Some(dir.path().join("config.toml")), &env)
                    .config;
            let buf = Buf::default();
            (Session::new(config).with_output(Box::new(buf.clone())), buf)
        }

        fn store(dir: &TempDir) -> FileSecretStore {
            FileSecretStore::in_dir(dir.path())
        }

        fn tokens(issued_at: i64, refresh: &str) -> TokenSet {
            TokenSet {
                access_token: "stored-access".into(),
                refresh_token: refresh.into(),
                token_type: "Bearer".into(),
                expires_in: 3600,
                issued_at,
                scope: String::new(),
                client_id: "client-1".into(),
            }
        }

        fn save_tokens(dir: &TempDir, tokens: &TokenSet) {
            store(dir)
                .set(&TokenSet::secret_key(SITE), &tokens.to_json().unwrap())
                .unwrap();
        }

        #[tokio::test]
        async fn login_with_token_stores_it() {
            let dir = TempDir::new().unwrap();
            let (mut session, out) = session_in(&dir, None);

            let action = AuthAction::Login {
                token: Some("ddoat_0123456789abcdef".into()),
                no_browser: false,
            };
            run(&mut session, action).await.unwrap();

            assert_eq!(
                store(&dir).get(&secrets::token_key(SITE)).unwrap().as_deref(),
                Some("ddoat_0123456789abcdef")
            );
            assert!(out.text().contains("Token stored for datadoghq.com"));
            assert!(!out.text().contains("ddoat_"));
        }

        #[tokio::test]
        async fn invalid_pasted_token_is_not_stored() {
            let dir = TempDir::new().unwrap();
            let (mut session, _) = session_in(&dir, None);

            let action = AuthAction::Login {
                token: Some("short".into()),
                no_browser: true,
            };
            assert!(run(&mut session, action).await.is_err());
            assert!(!store(&dir).exists(&secrets::token_key(SITE)).unwrap());
        }

        #[tokio::test]
        async fn logout_removes_both_kinds_of_token() {
            let dir = TempDir::new().unwrap();
            store(&dir).set(&secrets::token_key(SITE), "pasted-token-123").unwrap();
            save_tokens(&dir, &tokens(chrono::Utc::now().timestamp(), "r"));
            let (mut session, out) = session_in(&dir, None);

            run(&mut session, AuthAction::Logout).await.unwrap();

            assert!(!store(&dir).exists(&secrets::token_key(SITE)).unwrap());
            assert!(!store(&dir).exists(&TokenSet::secret_key(SITE)).unwrap());
            assert!(out.text().contains("Logged out from datadoghq.com"));
        }

        #[tokio::test]
        async fn token_prefers_fresh_oauth_token() {
            let dir = TempDir::new().unwrap();
            store(&dir).set(&secrets::token_key(SITE), "pasted-token-123").unwrap();
            save_tokens(&dir, &tokens(chrono::Utc::now().timestamp(), "r"));
            let (mut session, out) = session_in(&dir, None);

            run(&mut session, AuthAction::Token).await.unwrap();
            assert_eq!(out.text().trim(), "stored-access");
        }

        #[tokio::test]
        async fn token_falls_back_to_pasted_token() {
            let dir = TempDir::new().unwrap();
            store(&dir).set(&secrets::token_key(SITE), "pasted-token-123").unwrap();
            let (mut session, out) = session_in(&dir, None);

            run(&mut session, AuthAction::Token).await.unwrap();
            assert_eq!(out.text().trim(), "pasted-token-123");
        }

        #[tokio::test]
        async fn token_without_credentials_fails() {
            let dir = TempDir::new().unwrap();
            let (mut session, _) = session_in(&dir, None);

            let err = run(&mut session, AuthAction::Token).await.unwrap_err();
            assert!(err.to_string().contains("pup auth login"));
        }

        #[tokio::test]
        async fn refresh_saves_rotated_tokens() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/oauth2/v1/token"))
                .and(body_string_contains("refresh_token=old"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "access_token": "refreshed-access",
                    "expires_in": 3600,
                    "refresh_token": "rotated",
                })))
                .expect(1)
                .mount(&server)
                .await;

            let dir = TempDir::new().unwrap();
            save_tokens(&dir, &tokens(chrono::Utc::now().timestamp(), "old"));
            let (mut session, out) = session_in(&dir, Some(&server));

            run(&mut session, AuthAction::Refresh).await.unwrap();

            let saved = store(&dir).require(&TokenSet::secret_key(SITE)).unwrap();
            let saved = TokenSet::parse(&saved).unwrap();
            assert_eq!(saved.access_token, "refreshed-access");
            assert_eq!(saved.refresh_token, "rotated");
            assert!(out.text().contains("refreshed"));
            assert!(!out.text().contains("refreshed-access"));
        }

        #[tokio::test]
        async fn refresh_without_login_fails() {
            let dir = TempDir::new().unwrap();
            let (mut session, _) = session_in(&dir, None);

            let err = run(&mut session, AuthAction::Refresh).await.unwrap_err();
            assert!(err.downcast_ref::<AuthError>().is_some_and(AuthError::needs_reauth));
        }

        #[tokio::test]
        async fn status_reports_expired_oauth_token() {
            let dir = TempDir::new().unwrap();
            save_tokens(&dir, &tokens(1_000, "r"));
            let (mut session, out) = session_in(&dir, None);
            session.config_mut().agent_mode = true;

            run(&mut session, AuthAction::Status).await.unwrap();

            let report: serde_json::Value = serde_json::from_str(&out.text()).unwrap();
            assert_eq!(report["data"]["status"], "expired");
            assert_eq!(report["data"]["has_refresh"], true);
            assert_eq!(report["data"]["authenticated"], false);
            assert_eq!(report["data"]["secrets_provider"], "file");
        }
    }
}
