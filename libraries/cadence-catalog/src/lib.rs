//! Cadence Catalog Client
//!
//! Client library for a Spotify-compatible track catalog Web API.
//!
//! # Features
//!
//! - **Credentials**: client-credentials exchange with a shared, coalesced token cache
//! - **Search**: paged free-text track search
//! - **Lookup**: single and batched track lookup by catalog id
//! - **Browse**: the featured playlist listing
//! - **Mapping**: catalog tracks to canonical song input
//!
//! # Example
//!
//! ```ignore
//! use cadence_catalog::{CatalogClient, CatalogConfig, TrackCatalog};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CatalogClient::new(CatalogConfig::with_credentials("id", "secret"))?;
//!
//!     let track = client.get_track("4uLU6hMCjMI75M1A2tKUQC").await?;
//!     let song = track.to_new_song();
//!     println!("{} by {}", song.name, song.artist);
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod catalog;
mod client;
mod error;
mod types;

pub use catalog::TrackCatalog;
pub use client::CatalogClient;
pub use error::{CatalogError, Result};
pub use types::{
    CatalogAlbum, CatalogArtist, CatalogConfig, CatalogImage, CatalogStatus, CatalogTrack,
    FeaturedPlaylist, FeaturedPlaylists, SearchResults, DEFAULT_API_BASE_URL, DEFAULT_TOKEN_URL,
    MAX_TRACK_IDS,
};
