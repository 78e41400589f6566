/// Playlist domain types
use crate::types::{PlaylistId, Song, SongId, UserId, UserSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Playlist as stored: song references only, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Owner user ID, immutable after creation
    pub owner_id: UserId,

    /// Playlist name (1-100 chars)
    pub name: String,

    /// Optional description (up to 500 chars)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Ordered, duplicate free song references
    pub song_ids: Vec<SongId>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last rename, re-describe or membership change
    pub updated_at: DateTime<Utc>,
}

/// Playlist with its songs and owner resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDetail {
    #[serde(flatten)]
    pub playlist: Playlist,

    /// Songs in playlist order
    pub songs: Vec<Song>,

    /// Owner's public profile
    pub owner: UserSummary,
}

/// Request to create a playlist
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylist {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial playlist update
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlaylist {
    pub name: Option<String>,
    /// An empty description clears it
    pub description: Option<String>,
}

/// Aggregate figures for one playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistStats {
    pub song_count: u64,
    pub total_duration_ms: u64,
    pub total_duration_formatted: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlaylistStats {
    /// Summarise a hydrated playlist
    pub fn from_detail(detail: &PlaylistDetail) -> Self {
        let total_duration_ms = detail
            .songs
            .iter()
            .map(|song| u64::from(song.duration_ms))
            .sum();

        Self {
            song_count: detail.songs.len() as u64,
            total_duration_ms,
            total_duration_formatted: format_duration(total_duration_ms),
            created_at: detail.playlist.created_at,
            updated_at: detail.playlist.updated_at,
        }
    }
}

/// Render a millisecond total as `"1h 5m"` or `"3m 20s"`
pub fn format_duration(milliseconds: u64) -> String {
    let seconds = milliseconds / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes % 60)
    } else {
        format!("{}m {}s", minutes, seconds % 60)
    }
}
