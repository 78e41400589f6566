/// Song cache API routes
use crate::{
    api::{
        extract::{parse_number, JsonBody, ListQuery},
        response::ApiResponse,
    },
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use cadence_core::{
    types::{NewSong, PageRequest, PopularSong, Song, SongId, UpdateSong},
    validation,
};
use cadence_storage::songs;
use serde::Deserialize;

const POPULAR_DEFAULT: i64 = 10;
const POPULAR_MAX: i64 = 50;

#[derive(Debug, Default, Deserialize)]
pub struct PopularQuery {
    pub limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub songs: Vec<NewSong>,
}

fn not_found() -> ServerError {
    ServerError::NotFound("Song not found".to_string())
}

/// GET /api/songs
pub async fn list_songs(
    State(app_state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<ApiResponse<Vec<Song>>> {
    let request = query.page_request(PageRequest::MAX_LIMIT);
    let search = validation::normalize_search(query.search.as_deref())?;

    let page = songs::list(&app_state.pool, request, search.as_deref()).await?;
    Ok(ApiResponse::paginated(page))
}

/// GET /api/songs/popular
pub async fn popular_songs(
    State(app_state): State<AppState>,
    Query(query): Query<PopularQuery>,
) -> Result<ApiResponse<Vec<PopularSong>>> {
    let limit = parse_number(query.limit.as_deref())
        .unwrap_or(POPULAR_DEFAULT)
        .clamp(1, POPULAR_MAX);
    let limit = u32::try_from(limit).unwrap_or(10);

    let popular = songs::popular(&app_state.pool, limit).await?;
    Ok(ApiResponse::success(popular))
}

/// GET /api/songs/:id
pub async fn get_song(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<ApiResponse<Song>> {
    let song = songs::get_by_id(&app_state.pool, &SongId::new(id))
        .await?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(song))
}

/// GET /api/songs/spotify/:external_id
pub async fn get_song_by_external_id(
    Path(external_id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<ApiResponse<Song>> {
    let song = songs::find_by_external_id(&app_state.pool, external_id.trim())
        .await?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(song))
}

/// POST /api/songs
///
/// 201 when the song was stored, 200 with the existing record otherwise.
pub async fn create_song(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    JsonBody(req): JsonBody<NewSong>,
) -> Result<ApiResponse<Song>> {
    let (song, created) = app_state.library.create_song(req).await?;

    Ok(if created {
        ApiResponse::created(song).with_message("Song created successfully")
    } else {
        ApiResponse::success(song).with_message("Song already exists")
    })
}

/// POST /api/songs/batch
pub async fn create_songs_batch(
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    JsonBody(req): JsonBody<BatchRequest>,
) -> Result<ApiResponse<Vec<Song>>> {
    let requested = req.songs.len();
    let stored = app_state.library.create_batch(req.songs).await?;

    let message = format!("Processed {} of {} songs", stored.len(), requested);
    Ok(ApiResponse::success(stored)
        .with_status(StatusCode::CREATED)
        .with_message(message))
}

/// PUT /api/songs/:id
pub async fn update_song(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    _auth: AuthenticatedUser,
    JsonBody(req): JsonBody<UpdateSong>,
) -> Result<ApiResponse<Song>> {
    let req = validation::normalize_update_song(req)?;
    let song = songs::update(&app_state.pool, &SongId::new(id), req)
        .await?
        .ok_or_else(not_found)?;
    Ok(ApiResponse::success(song).with_message("Song updated successfully"))
}

/// DELETE /api/songs/:id
///
/// Detaches the song from every playlist first.
pub async fn delete_song(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<ApiResponse<()>> {
    let song_id = SongId::new(id);
    if !songs::delete(&app_state.pool, &song_id).await? {
        return Err(not_found());
    }

    tracing::info!(song_id = %song_id, user_id = %auth.user_id(), "Deleted song");
    Ok(ApiResponse::message("Song deleted successfully"))
}
