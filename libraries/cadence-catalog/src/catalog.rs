use crate::error::Result;
use crate::types::{CatalogStatus, CatalogTrack, FeaturedPlaylists, SearchResults};
use async_trait::async_trait;

/// Read-only lookups against the external track catalog.
///
/// The server holds this as `Arc<dyn TrackCatalog>` so tests can swap in an
/// in-memory fake.
#[async_trait]
pub trait TrackCatalog: Send + Sync {
    /// Search tracks by free text. The query must be non-blank.
    async fn search_tracks(&self, query: &str, limit: u32, offset: u32) -> Result<SearchResults>;

    /// Fetch a single track. `NotFound` if the catalog does not know it.
    async fn get_track(&self, external_id: &str) -> Result<CatalogTrack>;

    /// Fetch up to 50 tracks; extra ids are ignored and unknown ids are
    /// dropped from the result.
    async fn get_tracks_by_ids(&self, ids: &[String]) -> Result<Vec<CatalogTrack>>;

    /// Editorial playlists from the browse listing
    async fn featured_playlists(&self, limit: u32, offset: u32) -> Result<FeaturedPlaylists>;

    /// Credential and configuration state
    async fn status(&self) -> CatalogStatus;
}
