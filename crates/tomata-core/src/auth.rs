//! Backend auth client.
//!
//! Thin JSON client for the account backend (`/auth/*`). The timer core
//! never depends on this; it exists for hosts that want login state.
//! Credentials live in the OS keyring, looked up by key, and the client
//! itself is stateless between calls.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AuthError;
use crate::storage::Config;

/// Thin wrapper around the OS keyring for credential storage.
pub mod keyring_store {
    use crate::error::AuthError;

    const SERVICE: &str = "tomata";

    pub fn get(key: &str) -> Result<Option<String>, AuthError> {
        let entry =
            keyring::Entry::new(SERVICE, key).map_err(|e| AuthError::Keyring(e.to_string()))?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(AuthError::Keyring(e.to_string())),
        }
    }

    pub fn set(key: &str, value: &str) -> Result<(), AuthError> {
        let entry =
            keyring::Entry::new(SERVICE, key).map_err(|e| AuthError::Keyring(e.to_string()))?;
        entry
            .set_password(value)
            .map_err(|e| AuthError::Keyring(e.to_string()))
    }

    pub fn delete(key: &str) -> Result<(), AuthError> {
        let entry =
            keyring::Entry::new(SERVICE, key).map_err(|e| AuthError::Keyring(e.to_string()))?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(AuthError::Keyring(e.to_string())),
        }
    }
}

const TOKEN_KEY: &str = "auth_token";

/// An authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
}

/// A user plus the bearer token that proves it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct TokenData {
    token: String,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

/// JSON client for the account backend.
pub struct AuthClient {
    base_url: String,
    http: reqwest::Client,
}

impl AuthClient {
    pub fn new(base_url: &str) -> Result<Self, AuthError> {
        // Validate early; requests use plain path concatenation.
        Url::parse(base_url)?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, AuthError> {
        Self::new(&config.api.base_url)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let response = self
            .http
            .post(self.endpoint("/auth/login"))
            .json(&LoginBody { email, password })
            .send()
            .await?;
        parse_envelope::<AuthSession>(response).await
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, AuthError> {
        let response = self
            .http
            .post(self.endpoint("/auth/register"))
            .json(&RegisterBody {
                username,
                email,
                password,
            })
            .send()
            .await?;
        parse_envelope::<AuthSession>(response).await
    }

    /// Validate a token against `/auth/me`.
    pub async fn check_auth(&self, token: &str) -> Result<AuthSession, AuthError> {
        let response = self
            .http
            .get(self.endpoint("/auth/me"))
            .bearer_auth(token)
            .send()
            .await?;
        parse_envelope::<AuthSession>(response).await
    }

    /// Exchange a token for a fresh one.
    pub async fn refresh_token(&self, token: &str) -> Result<String, AuthError> {
        let response = self
            .http
            .post(self.endpoint("/auth/refresh"))
            .bearer_auth(token)
            .send()
            .await?;
        Ok(parse_envelope::<TokenData>(response).await?.token)
    }

    /// Invalidate the session server-side. Local credentials are the
    /// caller's to clear.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        let response = self
            .http
            .post(self.endpoint("/auth/logout"))
            .bearer_auth(token)
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }

    // ── Stored credentials ───────────────────────────────────────────

    pub fn stored_token() -> Result<Option<String>, AuthError> {
        keyring_store::get(TOKEN_KEY)
    }

    pub fn store_token(token: &str) -> Result<(), AuthError> {
        keyring_store::set(TOKEN_KEY, token)
    }

    pub fn clear_token() -> Result<(), AuthError> {
        keyring_store::delete(TOKEN_KEY)
    }
}

async fn parse_envelope<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, AuthError> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }
    let envelope: Envelope<T> = response.json().await?;
    match envelope.data {
        Some(data) if envelope.success => Ok(data),
        _ => Err(AuthError::Api {
            message: envelope
                .message
                .or(envelope.error)
                .unwrap_or_else(|| "request failed".to_string()),
        }),
    }
}

/// Pull a human-readable message out of an error response body.
async fn error_from_response(response: reqwest::Response) -> AuthError {
    let status = response.status();
    let message = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| {
            body.get("message")
                .or_else(|| body.get("error"))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("request failed (HTTP {status})"));
    AuthError::Api { message }
}
