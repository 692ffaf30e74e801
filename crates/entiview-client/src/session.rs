//! Credential exchange
//!
//! [`SessionClient::authenticate`] trades [`Credentials`] for a [`Keypass`].

use crate::error::AuthError;
use crate::transport::{Request, Transport};
use serde::Deserialize;
use serde_json::json;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// Path of the credential exchange endpoint
pub const AUTH_PATH: [&str; 2] = ["sydney", "auth"];

/// Username and password for one submit attempt
///
/// Consumed by [`SessionClient::authenticate`]; never stored.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create credentials
    #[inline]
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Username
    #[inline]
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check whether either part is empty or whitespace
    #[inline]
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.username.trim().is_empty() || self.password.trim().is_empty()
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque session token issued by the credential exchange
///
/// The server alone decides validity; there is no client-side expiry.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Keypass(String);

impl Keypass {
    /// Wrap a token string
    #[inline]
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Token text, for placing into a request
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for Keypass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Keypass(<redacted>)")
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    keypass: Option<String>,
}

/// Performs the credential exchange
#[derive(Clone)]
pub struct SessionClient {
    transport: Arc<dyn Transport>,
}

impl SessionClient {
    /// Create a client over a transport
    #[inline]
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Exchange credentials for a keypass
    ///
    /// Blank credentials are rejected before any request is built.
    ///
    /// # Errors
    /// - `AuthError::EmptyCredentials` for a blank username or password
    /// - `AuthError::Rejected` for a non-success status
    /// - `AuthError::EmptyResponse` for a success status without a keypass
    /// - `AuthError::NetworkFailure` if the transport fails
    pub async fn authenticate(&self, credentials: Credentials) -> Result<Keypass, AuthError> {
        if credentials.is_blank() {
            tracing::debug!("blank credentials rejected locally");
            return Err(AuthError::EmptyCredentials);
        }

        let Credentials { username, password } = credentials;
        let request = Request::post(AUTH_PATH, json!({ "username": username, "password": password }));

        let response = self.transport.send(request).await.map_err(|err| {
            tracing::warn!(error = %err, "credential exchange failed in transport");
            AuthError::from(err)
        })?;

        if !response.is_success() {
            let rejection = response.rejection();
            tracing::info!(status = rejection.status, "credentials rejected");
            return Err(AuthError::Rejected(rejection));
        }

        let keypass = serde_json::from_str::<LoginResponse>(&response.body)
            .ok()
            .and_then(|body| body.keypass)
            .filter(|token| !token.trim().is_empty())
            .map(Keypass)
            .ok_or(AuthError::EmptyResponse)?;

        tracing::info!("credential exchange succeeded");
        Ok(keypass)
    }
}

impl Debug for SessionClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClient").finish_non_exhaustive()
    }
}
