/// Playlists API routes
///
/// Every handler is scoped to the authenticated user. Playlists owned by
/// someone else answer 404 like missing ones.
use crate::{
    api::{
        extract::{JsonBody, ListQuery},
        response::ApiResponse,
    },
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::extract::{Path, Query, State};
use cadence_core::{
    types::{
        CreatePlaylist, PageRequest, Playlist, PlaylistDetail, PlaylistId, PlaylistStats, SongId,
        UpdatePlaylist,
    },
    validation,
};
use cadence_storage::{playlists, StorageError};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSongRequest {
    pub song_id: String,
}

fn not_found() -> ServerError {
    ServerError::NotFound("Playlist not found".to_string())
}

/// GET /api/playlists
pub async fn list_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<ListQuery>,
) -> Result<ApiResponse<Vec<Playlist>>> {
    let request = query.page_request(PageRequest::MAX_LIMIT);
    let search = validation::normalize_search(query.search.as_deref())?;

    let page = playlists::list(&app_state.pool, auth.user_id(), request, search.as_deref()).await?;
    Ok(ApiResponse::paginated(page))
}

/// GET /api/playlists/:id
pub async fn get_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<ApiResponse<PlaylistDetail>> {
    let detail = playlists::get_detail(&app_state.pool, &PlaylistId::new(id), auth.user_id())
        .await?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(detail))
}

/// POST /api/playlists
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    JsonBody(req): JsonBody<CreatePlaylist>,
) -> Result<ApiResponse<Playlist>> {
    let req = validation::normalize_create_playlist(req)?;
    // A token can outlive its account
    let playlist = playlists::create(&app_state.pool, auth.user_id(), req)
        .await
        .map_err(|err| match err {
            StorageError::NotFound { .. } => {
                ServerError::Unauthorized("User no longer exists".to_string())
            }
            other => other.into(),
        })?;

    tracing::info!(playlist_id = %playlist.id, user_id = %auth.user_id(), "Created playlist");
    Ok(ApiResponse::created(playlist).with_message("Playlist created successfully"))
}

/// PUT /api/playlists/:id
pub async fn update_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    JsonBody(req): JsonBody<UpdatePlaylist>,
) -> Result<ApiResponse<PlaylistDetail>> {
    let req = validation::normalize_update_playlist(req)?;
    let playlist = playlists::update(&app_state.pool, &PlaylistId::new(id), auth.user_id(), req)
        .await?
        .ok_or_else(not_found)?;

    let detail = playlists::hydrate(&app_state.pool, playlist).await?;
    Ok(ApiResponse::success(detail).with_message("Playlist updated successfully"))
}

/// DELETE /api/playlists/:id
pub async fn delete_playlist(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<ApiResponse<()>> {
    let playlist_id = PlaylistId::new(id);
    if !playlists::delete(&app_state.pool, &playlist_id, auth.user_id()).await? {
        return Err(not_found());
    }

    tracing::info!(playlist_id = %playlist_id, user_id = %auth.user_id(), "Deleted playlist");
    Ok(ApiResponse::message("Playlist deleted successfully"))
}

/// GET /api/playlists/:id/stats
pub async fn playlist_stats(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<ApiResponse<PlaylistStats>> {
    let stats = playlists::stats(&app_state.pool, &PlaylistId::new(id), auth.user_id())
        .await?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(stats))
}

/// POST /api/playlists/:id/songs
pub async fn add_song(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    JsonBody(req): JsonBody<AddSongRequest>,
) -> Result<ApiResponse<PlaylistDetail>> {
    let song_id = req.song_id.trim();
    if song_id.is_empty() {
        return Err(ServerError::Validation("Song ID is required".to_string()));
    }

    let playlist = playlists::add_song(
        &app_state.pool,
        &PlaylistId::new(id),
        auth.user_id(),
        &SongId::new(song_id),
    )
    .await?
    .ok_or_else(not_found)?;

    let detail = playlists::hydrate(&app_state.pool, playlist).await?;
    Ok(ApiResponse::success(detail).with_message("Song added to playlist successfully"))
}

/// DELETE /api/playlists/:id/songs/:song_id
pub async fn remove_song(
    Path((id, song_id)): Path<(String, String)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<ApiResponse<PlaylistDetail>> {
    let playlist = playlists::remove_song(
        &app_state.pool,
        &PlaylistId::new(id),
        auth.user_id(),
        &SongId::new(song_id),
    )
    .await?
    .ok_or_else(not_found)?;

    let detail = playlists::hydrate(&app_state.pool, playlist).await?;
    Ok(ApiResponse::success(detail).with_message("Song removed from playlist successfully"))
}
