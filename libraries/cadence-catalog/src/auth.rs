//! Client-credentials token cache.
//!
//! One credential is shared by every request. Refreshing happens while the
//! cache lock is held, so callers that arrive mid-refresh wait for the
//! in-flight exchange and reuse its result instead of starting their own.

use crate::error::{body_error, CatalogError, Result};
use crate::types::{present, TokenResponse};
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Subtracted from the provider's lifetime before a token counts as expired.
const EXPIRY_MARGIN_SECS: u64 = 300;

#[derive(Debug, Clone)]
struct Credential {
    access_token: String,
    expires_at: Instant,
}

impl Credential {
    fn is_valid(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Token state for the catalog, starting empty.
pub(crate) struct CredentialCache {
    http: Client,
    token_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
    slot: Mutex<Option<Credential>>,
}

impl CredentialCache {
    pub(crate) fn new(
        http: Client,
        token_url: String,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Self {
        Self {
            http,
            token_url,
            client_id,
            client_secret,
            slot: Mutex::new(None),
        }
    }

    pub(crate) fn has_client_id(&self) -> bool {
        present(self.client_id.as_deref())
    }

    pub(crate) fn has_client_secret(&self) -> bool {
        present(self.client_secret.as_deref())
    }

    /// `(has_access_token, is_token_valid)`
    pub(crate) async fn state(&self) -> (bool, bool) {
        let slot = self.slot.lock().await;
        match slot.as_ref() {
            Some(credential) => (true, credential.is_valid(Instant::now())),
            None => (false, false),
        }
    }

    /// A valid bearer token, exchanging for a new one if needed.
    pub(crate) async fn bearer(&self) -> Result<String> {
        let (Some(client_id), Some(client_secret)) =
            (self.client_id.as_deref(), self.client_secret.as_deref())
        else {
            return Err(CatalogError::NotConfigured);
        };
        if !self.has_client_id() || !self.has_client_secret() {
            return Err(CatalogError::NotConfigured);
        }

        let mut slot = self.slot.lock().await;
        if let Some(credential) = slot.as_ref() {
            if credential.is_valid(Instant::now()) {
                return Ok(credential.access_token.clone());
            }
            debug!("Catalog credential expired");
        }

        let credential = self.exchange(client_id, client_secret).await?;
        let token = credential.access_token.clone();
        *slot = Some(credential);

        Ok(token)
    }

    async fn exchange(&self, client_id: &str, client_secret: &str) -> Result<Credential> {
        debug!(url = %self.token_url, "Requesting catalog credential");

        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(client_id, Some(client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CatalogError::Timeout
                } else {
                    CatalogError::Request(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Catalog credential exchange failed");
            return Err(CatalogError::Unavailable(format!(
                "credential exchange failed with status {}",
                status.as_u16()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| body_error(e, "token response"))?;

        let lifetime = token.expires_in.saturating_sub(EXPIRY_MARGIN_SECS);
        info!(expires_in = token.expires_in, "Obtained catalog credential");

        Ok(Credential {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_validity_is_strict() {
        let now = Instant::now();
        let credential = Credential {
            access_token: "t".to_string(),
            expires_at: now,
        };
        assert!(!credential.is_valid(now));
        assert!(credential.is_valid(now - Duration::from_millis(1)));
    }

    #[tokio::test]
    async fn missing_secret_is_not_configured() {
        let cache = CredentialCache::new(
            Client::new(),
            "http://127.0.0.1:9/token".to_string(),
            Some("id".to_string()),
            None,
        );
        assert!(matches!(cache.bearer().await, Err(CatalogError::NotConfigured)));
        assert_eq!(cache.state().await, (false, false));
    }
}
