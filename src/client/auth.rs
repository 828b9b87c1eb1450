//! Email/password authentication against the account service.
//!
//! Login returns an opaque token that the session stores as-is. Registration
//! only creates the account; the user logs in afterwards.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};
use crate::session::AuthToken;

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Client for the account service.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: Client,
    base: Url,
}

impl AuthClient {
    /// Create a client for the service rooted at `base`.
    pub fn new(http: Client, base: Url) -> Self {
        Self { http, base }
    }

    fn endpoint(&self, action: &str) -> Url {
        let path = format!("{}/api/auth/{action}", self.base.path().trim_end_matches('/'));
        let mut url = self.base.clone();
        url.set_path(&path);
        url
    }

    /// Exchange credentials for a token.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthToken> {
        let url = self.endpoint("login");
        tracing::debug!(%url, "Logging in");

        let body = self.post(url, &LoginRequest { email, password }, "Login failed").await?;
        body.token
            .and_then(AuthToken::new)
            .ok_or_else(|| Error::auth("Login response did not include a token"))
    }

    /// Create an account.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<()> {
        let url = self.endpoint("register");
        tracing::debug!(%url, "Registering account");

        self.post(url, &RegisterRequest { name, email, password }, "Registration failed").await?;
        Ok(())
    }

    async fn post<B: Serialize>(&self, url: Url, body: &B, fallback: &str) -> Result<AuthResponse> {
        let response = self.http.post(url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;
        let parsed: AuthResponse = serde_json::from_str(&text).unwrap_or_default();

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Auth service rejected request");
            let message =
                parsed.message.filter(|m| !m.trim().is_empty()).unwrap_or_else(|| fallback.into());
            return Err(Error::auth(message));
        }

        Ok(parsed)
    }
}
