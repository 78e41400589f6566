/// Library service - canonical songs and the add-track flow
use crate::error::{Result, ServerError};
use cadence_catalog::TrackCatalog;
use cadence_core::types::{NewSong, PlaylistDetail, PlaylistId, Song, UserId};
use cadence_core::validation;
use cadence_storage::{playlists, songs, StorageError};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Outcome of adding a catalog track
#[derive(Debug, Clone)]
pub struct AddTrackResult {
    pub song: Song,
    /// This call created the cached song
    pub created: bool,
    /// Target playlist after the add, when one was given
    pub playlist: Option<PlaylistDetail>,
    /// The song was already a member of the target playlist
    pub already_in_playlist: bool,
}

impl AddTrackResult {
    pub fn message(&self) -> &'static str {
        match (self.playlist.is_some(), self.already_in_playlist, self.created) {
            (true, true, _) => "Song is already in the playlist",
            (true, false, _) => "Song added to playlist",
            (false, _, true) => "Song added to library",
            (false, _, false) => "Song already in library",
        }
    }
}

#[derive(Clone)]
pub struct LibraryService {
    pool: SqlitePool,
    catalog: Arc<dyn TrackCatalog>,
}

impl LibraryService {
    pub fn new(pool: SqlitePool, catalog: Arc<dyn TrackCatalog>) -> Self {
        Self { pool, catalog }
    }

    pub fn catalog(&self) -> &Arc<dyn TrackCatalog> {
        &self.catalog
    }

    /// Cache a catalog track and optionally append it to a playlist
    ///
    /// A track that is already cached is used as is, without asking the
    /// catalog. Catalog failures propagate unchanged.
    pub async fn add_track(
        &self,
        owner_id: &UserId,
        external_id: &str,
        playlist_id: Option<&PlaylistId>,
    ) -> Result<AddTrackResult> {
        let external_id = validation::normalize_external_id(external_id)?;

        let (song, created) = match songs::find_by_external_id(&self.pool, &external_id).await? {
            Some(song) => (song, false),
            None => {
                let track = self.catalog.get_track(&external_id).await?;
                songs::create_if_absent(&self.pool, track.to_new_song()).await?
            }
        };

        if created {
            tracing::info!(song_id = %song.id, external_id = %external_id, "Cached catalog track");
        }

        let Some(playlist_id) = playlist_id else {
            return Ok(AddTrackResult {
                song,
                created,
                playlist: None,
                already_in_playlist: false,
            });
        };

        let (playlist, already_in_playlist) =
            match playlists::add_song(&self.pool, playlist_id, owner_id, &song.id).await {
                Ok(Some(playlist)) => (playlists::hydrate(&self.pool, playlist).await?, false),
                Ok(None) => return Err(playlist_not_found()),
                Err(StorageError::Conflict(_)) => {
                    let detail = playlists::get_detail(&self.pool, playlist_id, owner_id)
                        .await?
                        .ok_or_else(playlist_not_found)?;
                    (detail, true)
                }
                Err(err) => return Err(err.into()),
            };

        tracing::debug!(
            playlist_id = %playlist_id,
            song_id = %song.id,
            already_in_playlist,
            "Added catalog track to playlist"
        );

        Ok(AddTrackResult {
            song,
            created,
            playlist: Some(playlist),
            already_in_playlist,
        })
    }

    /// Store client-supplied song data, returning the existing record if
    /// the external id is already cached
    pub async fn create_song(&self, song: NewSong) -> Result<(Song, bool)> {
        let song = validation::normalize_new_song(song)?;
        Ok(songs::create_if_absent(&self.pool, song).await?)
    }

    /// Store many songs, skipping the ones that fail
    pub async fn create_batch(&self, batch: Vec<NewSong>) -> Result<Vec<Song>> {
        if batch.is_empty() {
            return Err(ServerError::Validation(
                "At least one song is required".to_string(),
            ));
        }

        let mut stored = Vec::with_capacity(batch.len());
        for song in batch {
            let external_id = song.external_id.clone();
            match self.create_song(song).await {
                Ok((song, _)) => stored.push(song),
                Err(err) => {
                    tracing::warn!(external_id = %external_id, error = %err, "Skipping song in batch");
                }
            }
        }

        Ok(stored)
    }
}

fn playlist_not_found() -> ServerError {
    ServerError::NotFound("Playlist not found".to_string())
}
