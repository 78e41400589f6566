/// Catalog API routes
use crate::{
    api::{
        extract::{parse_number, JsonBody},
        response::ApiResponse,
    },
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    services::AddTrackResult,
    state::AppState,
};
use axum::extract::{Path, Query, State};
use cadence_catalog::{CatalogStatus, CatalogTrack, FeaturedPlaylist};
use cadence_core::types::{Page, PageRequest, PlaylistDetail, PlaylistId, Song};
use serde::{Deserialize, Serialize};

/// Largest page the catalog search accepts
pub const SEARCH_MAX_LIMIT: u32 = 50;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BrowseQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TracksQuery {
    pub ids: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTrackRequest {
    #[serde(alias = "spotifyId")]
    pub external_id: String,
    #[serde(default)]
    pub playlist_id: Option<String>,
}

/// The cached song, plus the playlist when one was targeted
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTrackResponse {
    #[serde(flatten)]
    pub song: Song,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist: Option<PlaylistDetail>,
    pub already_in_playlist: bool,
}

impl From<AddTrackResult> for AddTrackResponse {
    fn from(result: AddTrackResult) -> Self {
        Self {
            song: result.song,
            playlist: result.playlist,
            already_in_playlist: result.already_in_playlist,
        }
    }
}

/// GET /api/catalog/search
pub async fn search(
    State(app_state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<ApiResponse<Vec<CatalogTrack>>> {
    let q = query.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return Err(ServerError::Validation(
            "Search query is required".to_string(),
        ));
    }

    let (request, offset) = catalog_page(query.page.as_deref(), query.limit.as_deref())?;

    let results = app_state
        .catalog()
        .search_tracks(q, request.limit, offset)
        .await?;

    Ok(ApiResponse::paginated(Page::new(
        results.items,
        request,
        results.total,
    )))
}

/// GET /api/catalog/featured
pub async fn featured(
    State(app_state): State<AppState>,
    Query(query): Query<BrowseQuery>,
) -> Result<ApiResponse<Vec<FeaturedPlaylist>>> {
    let (request, offset) = catalog_page(query.page.as_deref(), query.limit.as_deref())?;

    let featured = app_state
        .catalog()
        .featured_playlists(request.limit, offset)
        .await?;

    let response = ApiResponse::paginated(Page::new(featured.items, request, featured.total));
    Ok(match featured.message {
        Some(message) => response.with_message(message),
        None => response,
    })
}

/// GET /api/catalog/track/:id
pub async fn get_track(
    Path(id): Path<String>,
    State(app_state): State<AppState>,
) -> Result<ApiResponse<CatalogTrack>> {
    let track = app_state.catalog().get_track(&id).await?;
    Ok(ApiResponse::success(track))
}

/// GET /api/catalog/tracks?ids=a,b,c
pub async fn get_tracks(
    State(app_state): State<AppState>,
    Query(query): Query<TracksQuery>,
) -> Result<ApiResponse<Vec<CatalogTrack>>> {
    let ids: Vec<String> = query
        .ids
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();

    if ids.is_empty() {
        return Err(ServerError::Validation(
            "At least one track id is required".to_string(),
        ));
    }

    let tracks = app_state.catalog().get_tracks_by_ids(&ids).await?;
    Ok(ApiResponse::success(tracks))
}

/// GET /api/catalog/status
pub async fn status(State(app_state): State<AppState>) -> ApiResponse<CatalogStatus> {
    ApiResponse::success(app_state.catalog().status().await)
}

/// POST /api/catalog/add-track
///
/// 201 when the song was newly cached, 200 when it already existed.
pub async fn add_track(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    JsonBody(req): JsonBody<AddTrackRequest>,
) -> Result<ApiResponse<AddTrackResponse>> {
    let playlist_id = req
        .playlist_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(PlaylistId::new);

    let result = app_state
        .library
        .add_track(auth.user_id(), &req.external_id, playlist_id.as_ref())
        .await?;

    let message = result.message();
    let response = if result.created {
        ApiResponse::created(AddTrackResponse::from(result))
    } else {
        ApiResponse::success(AddTrackResponse::from(result))
    };

    Ok(response.with_message(message))
}

fn catalog_page(page: Option<&str>, limit: Option<&str>) -> Result<(PageRequest, u32)> {
    let request = PageRequest::new(parse_number(page), parse_number(limit), SEARCH_MAX_LIMIT);
    let offset = u32::try_from(request.offset())
        .map_err(|_| ServerError::Validation("Page is out of range".to_string()))?;
    Ok((request, offset))
}
