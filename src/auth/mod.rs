//! Credential service client.
//!
//! The catalog service does not authenticate callers itself; a separate
//! credential service issues short-lived bearer tokens. This module holds the
//! client for that handshake plus the `Credentials` type used to decorate
//! catalog requests. Token issuance failures surface unchanged to the caller
//! of a resolution, with no retry.

use crate::client::{ClientConfig, check_response_status, normalize_url, translate_reqwest_error};
use crate::error::{ImageError, Result};
use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[cfg(test)]
mod tests;

/// Credentials attached to catalog service requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// No authentication (catalogs that allow anonymous reads)
    Anonymous,

    /// HTTP Basic authentication
    Basic { username: String, password: String },

    /// Bearer token issued by the credential service
    Bearer { token: String },
}

impl Credentials {
    /// Creates anonymous credentials.
    pub fn anonymous() -> Self {
        Self::Anonymous
    }

    /// Creates Basic authentication credentials.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Creates Bearer token credentials.
    ///
    /// # Examples
    ///
    /// ```
    /// use vmimage::auth::Credentials;
    ///
    /// let creds = Credentials::bearer("gAAAAABh...");
    /// assert_eq!(creds.to_header_value().unwrap(), "Bearer gAAAAABh...");
    /// ```
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Returns the Authorization header value for these credentials.
    pub fn to_header_value(&self) -> Option<String> {
        match self {
            Self::Anonymous => None,
            Self::Basic { username, password } => {
                use base64::{Engine as _, engine::general_purpose};
                let credentials = format!("{}:{}", username, password);
                let encoded = general_purpose::STANDARD.encode(credentials);
                Some(format!("Basic {}", encoded))
            }
            Self::Bearer { token } => Some(format!("Bearer {}", token)),
        }
    }
}

/// Opaque authentication parameters supplied by the host.
///
/// All fields are optional: an empty config means anonymous catalog access,
/// and a config carrying a pre-issued `token` skips the credential service
/// round-trip entirely. Password authentication requires `auth_url`,
/// `username` and `password`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialsConfig {
    /// Base URL of the credential service
    #[serde(default)]
    pub auth_url: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Optional project scope requested with the token
    #[serde(default)]
    pub project: Option<String>,

    /// Pre-issued token; when present no authentication request is made
    #[serde(default)]
    pub token: Option<String>,
}

impl CredentialsConfig {
    /// Returns true when no authentication parameters are set at all.
    pub fn is_empty(&self) -> bool {
        self.auth_url.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.project.is_none()
            && self.token.is_none()
    }
}

/// An authenticated session holding a bearer token.
///
/// The token is valid for the lifetime the credential service granted it;
/// this library holds it only for the duration of one resolution call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    /// Returns the bearer token for this session.
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Client for the credential service token API.
#[derive(Debug)]
pub struct CredentialClient {
    http_client: HttpClient,
    auth_url: Option<String>,
    config: CredentialsConfig,
}

impl CredentialClient {
    /// Creates a credential client with default transport configuration.
    pub fn new(config: CredentialsConfig) -> Result<Self> {
        Self::with_config(config, ClientConfig::default())
    }

    /// Creates a credential client with custom transport configuration.
    pub fn with_config(config: CredentialsConfig, client_config: ClientConfig) -> Result<Self> {
        let auth_url = match config.auth_url.as_deref() {
            Some(url) => Some(normalize_url(url)?),
            None => None,
        };

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(client_config.timeout_seconds))
            .pool_max_idle_per_host(client_config.max_idle_per_host)
            .build()
            .map_err(|e| {
                ImageError::network_with_source("Failed to create HTTP client", e)
            })?;

        Ok(Self {
            http_client,
            auth_url,
            config,
        })
    }

    /// Authenticates against the credential service and returns a session.
    ///
    /// A config carrying a pre-issued `token` short-circuits without any
    /// network traffic. Otherwise this posts the configured identity to the
    /// token endpoint; the issued token arrives in the `X-Subject-Token`
    /// response header.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required parameters (auth_url, username, password) are missing
    /// - The credential service rejects the identity (401/403)
    /// - The credential service is unreachable or returns a server error
    /// - The response carries no token header
    pub fn authenticate(&self) -> Result<Session> {
        if let Some(token) = &self.config.token {
            return Ok(Session {
                token: token.clone(),
            });
        }

        let auth_url = self.auth_url.as_deref().ok_or_else(|| {
            ImageError::config("credential configuration is missing auth_url")
        })?;
        let username = self.config.username.as_deref().ok_or_else(|| {
            ImageError::config("credential configuration is missing username")
        })?;
        let password = self.config.password.as_deref().ok_or_else(|| {
            ImageError::config("credential configuration is missing password")
        })?;

        let mut body = serde_json::json!({
            "auth": {
                "identity": {
                    "methods": ["password"],
                    "password": {
                        "user": {
                            "name": username,
                            "domain": { "id": "default" },
                            "password": password,
                        }
                    }
                }
            }
        });
        if let Some(project) = &self.config.project {
            body["auth"]["scope"] = serde_json::json!({
                "project": { "name": project, "domain": { "id": "default" } }
            });
        }

        let url = format!("{}/v3/auth/tokens", auth_url);
        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| translate_reqwest_error(e, auth_url))?;

        // Grab the token header before the status check consumes the response
        let token = response
            .headers()
            .get("X-Subject-Token")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        check_response_status(response)?;

        let token = token.ok_or_else(|| {
            ImageError::validation("token response missing X-Subject-Token header")
        })?;

        Ok(Session { token })
    }

    /// Returns the bearer token held by a session.
    pub fn get_token<'a>(&self, session: &'a Session) -> &'a str {
        session.token()
    }
}
