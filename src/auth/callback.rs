//! auth::callback
//!
//! Loopback HTTP server that receives the authorization redirect.
//!
//! The server binds the first free port of [`CALLBACK_PORTS`] on
//! 127.0.0.1, answers one request to [`CALLBACK_PATH`] with a small HTML
//! page, and hands the authorization code back. Requests to other paths
//! (a browser asking for a favicon, say) get a 404 and are otherwise ignored.

use std::time::Duration;

use reqwest::Url;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tracing::debug;

use super::errors::AuthError;

/// Ports tried in order; the registered redirect URI names one of them.
pub const CALLBACK_PORTS: &[u16] = &[8000, 8080, 8888, 9000];

pub const CALLBACK_PATH: &str = "/oauth/callback";

/// How long the browser step may take.
pub const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

/// Query parameters of the redirect.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl CallbackParams {
    /// Parse the request line of an HTTP request.
    ///
    /// `None` unless it targets [`CALLBACK_PATH`].
    pub fn from_request_line(line: &str) -> Option<Self> {
        let target = line.split_whitespace().nth(1)?;
        let url = Url::parse(&format!("http://127.0.0.1{}", target)).ok()?;
        if url.path() != CALLBACK_PATH {
            return None;
        }

        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            let slot = match &*key {
                "code" => &mut params.code,
                "state" => &mut params.state,
                "error" => &mut params.error,
                "error_description" => &mut params.error_description,
                _ => continue,
            };
            *slot = Some(value.into_owned());
        }
        Some(params)
    }

    /// The authorization code, once the redirect is known to be ours.
    pub fn into_code(self, expected_state: &str) -> Result<String, AuthError> {
        if let Some(error) = self.error {
            let message = match self.error_description {
                Some(description) if !description.is_empty() => {
                    format!("{}: {}", error, description)
                }
                _ => error,
            };
            return Err(AuthError::Authorization(message));
        }
        if self.state.as_deref() != Some(expected_state) {
            return Err(AuthError::StateMismatch);
        }
        self.code
            .filter(|code| !code.is_empty())
            .ok_or_else(|| AuthError::Authorization("redirect carried no authorization code".into()))
    }
}

/// A bound loopback listener waiting for one redirect.
#[derive(Debug)]
pub struct CallbackServer {
    listener: TcpListener,
    port: u16,
}

impl CallbackServer {
    pub async fn bind() -> Result<Self, AuthError> {
        Self::bind_first(CALLBACK_PORTS).await
    }

    /// Bind the first port of `ports` that is free. Port 0 picks any.
    pub async fn bind_first(ports: &[u16]) -> Result<Self, AuthError> {
        for &port in ports {
            match TcpListener::bind(("127.0.0.1", port)).await {
                Ok(listener) => {
                    let port = listener.local_addr()?.port();
                    debug!(port, "OAuth callback server listening");
                    return Ok(Self { listener, port });
                }
                Err(e) => debug!(port, error = %e, "callback port unavailable"),
            }
        }
        let tried: Vec<String> = ports.iter().map(u16::to_string).collect();
        Err(AuthError::NoCallbackPort(tried.join(", ")))
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://127.0.0.1:{}{}", self.port, CALLBACK_PATH)
    }

    /// Serve until the redirect arrives or `timeout` passes.
    pub async fn wait_for_code(
        &self,
        expected_state: &str,
        timeout: Duration,
    ) -> Result<String, AuthError> {
        tokio::time::timeout(timeout, self.serve(expected_state))
            .await
            .map_err(|_| AuthError::CallbackTimeout)?
    }

    async fn serve(&self, expected_state: &str) -> Result<String, AuthError> {
        loop {
            let (mut stream, peer) = self.listener.accept().await?;
            let request_line = read_request(&mut stream).await?;

            let Some(params) = CallbackParams::from_request_line(&request_line) else {
                debug!(%peer, "ignoring request outside the callback path");
                respond(&mut stream, "404 Not Found", &page("Not found", "")).await?;
                continue;
            };

            let outcome = params.into_code(expected_state);
            let body = match &outcome {
                Ok(_) => page(
                    "Login successful",
                    "You can close this window and return to the terminal.",
                ),
                Err(e) => page("Login failed", &e.to_string()),
            };
            let status = if outcome.is_ok() { "200 OK" } else { "400 Bad Request" };
            respond(&mut stream, status, &body).await?;
            return outcome;
        }
    }
}

/// The request line; headers are drained so the response is not reset.
async fn read_request(stream: &mut TcpStream) -> Result<String, AuthError> {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;
    loop {
        let mut header = String::new();
        let read = reader.read_line(&mut header).await?;
        if read == 0 || header.trim().is_empty() {
            break;
        }
    }
    Ok(request_line)
}

async fn respond(stream: &mut TcpStream, status: &str, body: &str) -> Result<(), AuthError> {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

fn page(title: &str, message: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><title>pup - {title}</title></head>\
         <body style=\"font-family: sans-serif; text-align: center; margin-top: 4em\">\
         <h1>{title}</h1><p>{message}</p></body></html>",
        title = escape_html(title),
        message = escape_html(message),
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    mod params {
        use super::*;

        #[test]
        fn parses_code_and_state() {
            let params = CallbackParams::from_request_line(
                "GET /oauth/callback?code=abc%20def&state=s1 HTTP/1.1\r\n",
            )
            .unwrap();
            assert_eq!(params.code.as_deref(), Some("abc def"));
            assert_eq!(params.into_code("s1").unwrap(), "abc def");
        }

        #[test]
        fn other_paths_are_ignored() {
            assert!(CallbackParams::from_request_line("GET /favicon.ico HTTP/1.1").is_none());
            assert!(CallbackParams::from_request_line("garbage").is_none());
        }

        #[test]
        fn state_must_match() {
            let params =
                CallbackParams::from_request_line("GET /oauth/callback?code=c&state=evil HTTP/1.1")
                    .unwrap();
            assert!(matches!(params.into_code("s1"), Err(AuthError::StateMismatch)));

            let missing = CallbackParams::from_request_line("GET /oauth/callback?code=c HTTP/1.1")
                .unwrap();
            assert!(matches!(missing.into_code("s1"), Err(AuthError::StateMismatch)));
        }

        #[test]
        fn server_error_wins() {
            let params = CallbackParams::from_request_line(
                "GET /oauth/callback?error=access_denied&error_description=User+denied&state=s1 HTTP/1.1",
            )
            .unwrap();
            let err = params.into_code("s1").unwrap_err();
            assert_eq!(err.to_string(), "authorization failed: access_denied: User denied");
        }

        #[test]
        fn empty_code_is_an_error() {
            let params =
                CallbackParams::from_request_line("GET /oauth/callback?code=&state=s1 HTTP/1.1")
                    .unwrap();
            assert!(matches!(params.into_code("s1"), Err(AuthError::Authorization(_))));
        }
    }

    #[test]
    fn pages_escape_messages() {
        let html = page("Login failed", "<script>alert('x')</script>");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    mod server {
        use super::*;
        use tokio::io::AsyncReadExt;

        async fn get(port: u16, target: &str) -> String {
            let mut stream = TcpStream::connect(("127.0.0.1", port)).await.unwrap();
            let request = format!("GET {} HTTP/1.1\r\nHost: 127.0.0.1\r\n\r\n", target);
            stream.write_all(request.as_bytes()).await.unwrap();
            let mut response = String::new();
            stream.read_to_string(&mut response).await.unwrap();
            response
        }

        #[tokio::test]
        async fn returns_code_after_stray_request() {
            let server = CallbackServer::bind_first(&[0]).await.unwrap();
            let port = server.port();
            assert!(server.redirect_uri().ends_with("/oauth/callback"));

            let browser = tokio::spawn(async move {
                let stray = get(port, "/favicon.ico").await;
                let callback = get(port, "/oauth/callback?code=the-code&state=s1").await;
                (stray, callback)
            });

            let code = server.wait_for_code("s1", Duration::from_secs(10)).await.unwrap();
            assert_eq!(code, "the-code");

            let (stray, callback) = browser.await.unwrap();
            assert!(stray.starts_with("HTTP/1.1 404"));
            assert!(callback.starts_with("HTTP/1.1 200"));
            assert!(callback.contains("Login successful"));
        }

        #[tokio::test]
        async fn mismatched_state_fails_login() {
            let server = CallbackServer::bind_first(&[0]).await.unwrap();
            let port = server.port();
            let browser =
                tokio::spawn(async move { get(port, "/oauth/callback?code=c&state=other").await });

            let err = server.wait_for_code("s1", Duration::from_secs(10)).await.unwrap_err();
            assert!(matches!(err, AuthError::StateMismatch));
            assert!(browser.await.unwrap().starts_with("HTTP/1.1 400"));
        }

        #[tokio::test]
        async fn times_out() {
            let server = CallbackServer::bind_first(&[0]).await.unwrap();
            let err = server
                .wait_for_code("s1", Duration::from_millis(50))
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::CallbackTimeout));
        }

        #[tokio::test]
        async fn falls_through_taken_ports() {
            let taken = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
            let busy = taken.local_addr().unwrap().port();
            let server = CallbackServer::bind_first(&[busy, 0]).await.unwrap();
            assert_ne!(server.port(), busy);

            let err = CallbackServer::bind_first(&[busy]).await.unwrap_err();
            assert!(matches!(err, AuthError::NoCallbackPort(ref ports) if ports == &busy.to_string()));
        }
    }
}
