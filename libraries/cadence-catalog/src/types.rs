//! Catalog configuration and the track shapes returned by the Web API.

use cadence_core::types::NewSong;
use serde::{Deserialize, Deserializer, Serialize};

/// Default Web API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Default client-credentials token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Provider limit for multi-track lookups.
pub const MAX_TRACK_IDS: usize = 50;

/// Connection settings for the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// OAuth client id
    pub client_id: Option<String>,
    /// OAuth client secret
    pub client_secret: Option<String>,
    /// Base URL of the Web API (e.g., "https://api.spotify.com/v1")
    pub api_base_url: String,
    /// Client-credentials token endpoint
    pub token_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl CatalogConfig {
    /// Config with credentials and default endpoints.
    pub fn with_credentials(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret.into()),
            ..Self::default()
        }
    }

    /// Both credentials are present and non-blank
    pub fn is_configured(&self) -> bool {
        present(self.client_id.as_deref()) && present(self.client_secret.as_deref())
    }
}

pub(crate) fn present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

// =============================================================================
// Track Types
// =============================================================================

/// A track as the catalog describes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTrack {
    pub id: String,
    pub name: String,
    pub artists: Vec<CatalogArtist>,
    pub album: CatalogAlbum,
    pub duration_ms: u32,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub explicit: bool,
    #[serde(default)]
    pub popularity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogArtist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogAlbum {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<CatalogImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogImage {
    pub url: String,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
}

impl CatalogTrack {
    /// Artist names joined with `", "`
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|artist| artist.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Map to the canonical song input. The first album image is used as
    /// artwork.
    pub fn to_new_song(&self) -> NewSong {
        NewSong {
            external_id: self.id.clone(),
            name: self.name.clone(),
            artist: self.artist_names(),
            album: self.album.name.clone(),
            duration_ms: self.duration_ms,
            image_url: self.album.images.first().map(|image| image.url.clone()),
            preview_url: self.preview_url.clone(),
        }
    }
}

/// One page of search hits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub items: Vec<CatalogTrack>,
    pub total: u64,
}

// =============================================================================
// Browse Types
// =============================================================================

/// An editorial playlist from the catalog's browse listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedPlaylist {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub owner_name: Option<String>,
    pub track_count: u64,
}

/// One page of the featured listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeaturedPlaylists {
    /// Editorial headline for the listing, when the catalog sends one
    pub message: Option<String>,
    pub items: Vec<FeaturedPlaylist>,
    pub total: u64,
}

/// Credential and configuration state, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStatus {
    pub has_client_id: bool,
    pub has_client_secret: bool,
    pub has_access_token: bool,
    pub is_token_valid: bool,
    pub is_configured: bool,
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    /// Token validity in seconds
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub tracks: TrackPage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrackPage {
    pub items: Vec<CatalogTrack>,
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TracksResponse {
    pub tracks: Vec<Option<CatalogTrack>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeaturedResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub playlists: FeaturedPage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeaturedPage {
    /// The catalog pads pages with nulls for playlists it can no longer serve
    #[serde(default)]
    pub items: Vec<Option<FeaturedItem>>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeaturedItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<CatalogImage>,
    #[serde(default)]
    pub owner: Option<FeaturedOwner>,
    #[serde(default)]
    pub tracks: Option<FeaturedTracks>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeaturedOwner {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeaturedTracks {
    #[serde(default)]
    pub total: u64,
}

impl From<FeaturedItem> for FeaturedPlaylist {
    fn from(item: FeaturedItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description.filter(|d| !d.trim().is_empty()),
            image_url: item.images.into_iter().next().map(|image| image.url),
            owner_name: item.owner.and_then(|owner| owner.display_name),
            track_count: item.tracks.map_or(0, |tracks| tracks.total),
        }
    }
}

impl From<FeaturedResponse> for FeaturedPlaylists {
    fn from(response: FeaturedResponse) -> Self {
        Self {
            message: response.message,
            items: response
                .playlists
                .items
                .into_iter()
                .flatten()
                .map(FeaturedPlaylist::from)
                .collect(),
            total: response.playlists.total,
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
