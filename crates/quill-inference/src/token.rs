//! OAuth client-credentials access tokens for the Baidu AI platform.

use std::time::Duration;

use quill_core::defaults::TOKEN_REFRESH_MARGIN_SECS;
use quill_core::{Error, Result};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use crate::http::{read_json, trim_base};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    refresh_at: Instant,
}

/// Fetches and caches an access token until shortly before it expires.
pub struct AccessTokenProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    secret_key: String,
    timeout_secs: u64,
    cached: Mutex<Option<CachedToken>>,
}

impl AccessTokenProvider {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            timeout_secs,
            cached: Mutex::new(None),
        }
    }

    /// A valid token, fetching a new one when none is cached or the cached
    /// one is about to expire.
    pub async fn token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(entry) = cached.as_ref() {
            if Instant::now() < entry.refresh_at {
                return Ok(entry.token.clone());
            }
        }

        let (token, expires_in) = self.fetch().await?;
        let lifetime = expires_in.saturating_sub(TOKEN_REFRESH_MARGIN_SECS);
        *cached = Some(CachedToken {
            token: token.clone(),
            refresh_at: Instant::now() + Duration::from_secs(lifetime),
        });
        Ok(token)
    }

    /// Drop the cached token so the next call fetches a fresh one.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    async fn fetch(&self) -> Result<(String, u64)> {
        let url = format!("{}/oauth/2.0/token", self.base_url);
        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.api_key.as_str()),
                ("client_secret", self.secret_key.as_str()),
            ])
            .timeout(Duration::from_secs(self.timeout_secs))
            .send()
            .await
            .map_err(|e| Error::Request(format!("Token request failed: {}", e)))?;

        let body: TokenResponse = read_json(response, "Token endpoint").await?;
        match body.access_token {
            Some(token) if !token.is_empty() => {
                let expires_in = body.expires_in.unwrap_or(0);
                debug!(
                    subsystem = "inference",
                    component = "access_token",
                    expires_in,
                    "Fetched access token"
                );
                Ok((token, expires_in))
            }
            _ => Err(Error::service(format!(
                "No access_token in token response: {}",
                body.error_description
                    .or(body.error)
                    .unwrap_or_else(|| "unknown error".to_string())
            ))),
        }
    }
}
