//! HTTP client for the catalog Web API.

use crate::auth::CredentialCache;
use crate::catalog::TrackCatalog;
use crate::error::{body_error, CatalogError, Result};
use crate::types::{
    CatalogConfig, CatalogStatus, CatalogTrack, FeaturedPlaylists, FeaturedResponse,
    SearchResponse, SearchResults, TracksResponse, MAX_TRACK_IDS,
};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Catalog client holding one shared credential cache.
///
/// # Example
///
/// ```ignore
/// use cadence_catalog::{CatalogClient, CatalogConfig, TrackCatalog};
///
/// let client = CatalogClient::new(CatalogConfig::with_credentials("id", "secret"))?;
/// let results = client.search_tracks("daft punk", 20, 0).await?;
/// println!("{} of {} tracks", results.items.len(), results.total);
/// ```
pub struct CatalogClient {
    http: Client,
    api_base_url: String,
    credentials: CredentialCache,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let api_base_url = normalize_url(&config.api_base_url)?;
        let token_url = normalize_url(&config.token_url)?;

        if config.timeout_secs == 0 {
            return Err(CatalogError::InvalidUrl(
                "timeout must be at least one second".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
            .user_agent(format!("Cadence/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let credentials =
            CredentialCache::new(http.clone(), token_url, config.client_id, config.client_secret);

        Ok(Self {
            http,
            api_base_url,
            credentials,
        })
    }

    /// Get the API base URL.
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let token = self.credentials.bearer().await?;
        let url = format!("{}{}", self.api_base_url, path);
        debug!(url = %url, "Catalog request");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    warn!(url = %url, "Catalog request timed out");
                    CatalogError::Timeout
                } else {
                    warn!(url = %url, error = %e, "Catalog request failed");
                    CatalogError::Request(e)
                }
            })?;

        let response = check_status(response, path).await?;

        response.json().await.map_err(|e| {
            let err = body_error(e, "catalog response");
            warn!(url = %url, error = %err, "Catalog response body failed");
            err
        })
    }
}

#[async_trait]
impl TrackCatalog for CatalogClient {
    async fn search_tracks(&self, query: &str, limit: u32, offset: u32) -> Result<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CatalogError::InvalidQuery(
                "search query cannot be empty".into(),
            ));
        }

        let response: SearchResponse = self
            .get_json(
                "/search",
                &[
                    ("q", query.to_string()),
                    ("type", "track".to_string()),
                    ("limit", limit.to_string()),
                    ("offset", offset.to_string()),
                ],
            )
            .await?;

        Ok(SearchResults {
            items: response.tracks.items,
            total: response.tracks.total,
        })
    }

    async fn get_track(&self, external_id: &str) -> Result<CatalogTrack> {
        let id = cadence_core::validation::normalize_external_id(external_id)
            .map_err(|e| CatalogError::InvalidQuery(e.to_string()))?;

        self.get_json(&format!("/tracks/{id}"), &[]).await
    }

    async fn get_tracks_by_ids(&self, ids: &[String]) -> Result<Vec<CatalogTrack>> {
        let ids = ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .take(MAX_TRACK_IDS)
            .map(|id| {
                cadence_core::validation::normalize_external_id(id)
                    .map_err(|e| CatalogError::InvalidQuery(e.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        if ids.is_empty() {
            return Err(CatalogError::InvalidQuery(
                "at least one track id is required".into(),
            ));
        }

        let response: TracksResponse = self
            .get_json("/tracks", &[("ids", ids.join(","))])
            .await?;

        // Unknown ids come back as nulls
        Ok(response.tracks.into_iter().flatten().collect())
    }

    async fn featured_playlists(&self, limit: u32, offset: u32) -> Result<FeaturedPlaylists> {
        let response: FeaturedResponse = self
            .get_json(
                "/browse/featured-playlists",
                &[("limit", limit.to_string()), ("offset", offset.to_string())],
            )
            .await?;

        Ok(response.into())
    }

    async fn status(&self) -> CatalogStatus {
        let (has_access_token, is_token_valid) = self.credentials.state().await;
        let has_client_id = self.credentials.has_client_id();
        let has_client_secret = self.credentials.has_client_secret();

        CatalogStatus {
            has_client_id,
            has_client_secret,
            has_access_token,
            is_token_valid,
            is_configured: has_client_id && has_client_secret,
        }
    }
}

async fn check_status(response: Response, path: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_text = response.text().await.unwrap_or_default();
    if status == StatusCode::NOT_FOUND {
        debug!(path, "Catalog returned 404");
        return Err(CatalogError::NotFound(path.to_string()));
    }

    warn!(status = %status, path, error = %error_text, "Catalog API error");
    Err(CatalogError::Unavailable(format!(
        "catalog responded with status {}",
        status.as_u16()
    )))
}

fn normalize_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidUrl("URL cannot be empty".into()));
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(CatalogError::InvalidUrl(
            "URL must start with http:// or https://".into(),
        ));
    }

    Ok(trimmed.to_string())
}
