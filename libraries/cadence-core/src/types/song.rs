/// Song domain types
use crate::types::SongId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical track record, one per external catalog id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    /// Internal identifier referenced by playlists
    pub id: SongId,

    /// Catalog id, immutable and unique
    pub external_id: String,

    /// Track title
    pub name: String,

    /// Contributing artists, joined with ", "
    pub artist: String,

    /// Album title
    pub album: String,

    /// Track length in milliseconds
    pub duration_ms: u32,

    /// Cover art
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Short audio preview
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,

    /// When the song was first cached
    pub created_at: DateTime<Utc>,

    /// Last correction edit
    pub updated_at: DateTime<Utc>,
}

/// Song data as received from a client or mapped from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSong {
    /// Catalog id
    pub external_id: String,
    /// Track title
    pub name: String,
    /// Flattened artist names
    pub artist: String,
    /// Album title
    pub album: String,
    /// Track length in milliseconds
    pub duration_ms: u32,
    /// Cover art
    #[serde(default)]
    pub image_url: Option<String>,
    /// Short audio preview
    #[serde(default)]
    pub preview_url: Option<String>,
}

/// Correction edit; the external id can't be changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSong {
    pub name: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration_ms: Option<u32>,
    pub image_url: Option<String>,
    pub preview_url: Option<String>,
}

impl UpdateSong {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.artist.is_none()
            && self.album.is_none()
            && self.duration_ms.is_none()
            && self.image_url.is_none()
            && self.preview_url.is_none()
    }
}

/// Song with the number of playlists that reference it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularSong {
    #[serde(flatten)]
    pub song: Song,
    pub playlist_count: i64,
}
