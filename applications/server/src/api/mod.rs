/// API route modules
pub mod auth;
pub mod catalog;
pub mod extract;
pub mod health;
pub mod playlists;
pub mod response;
pub mod songs;

use crate::{middleware, state::AppState};
use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full `/api` router
pub fn router(app_state: AppState) -> Router {
    let require_auth = axum_middleware::from_fn_with_state(
        Arc::clone(&app_state.auth_service),
        middleware::auth_middleware,
    );

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/songs/popular", get(songs::popular_songs))
        .route("/songs/spotify/:external_id", get(songs::get_song_by_external_id))
        .route("/catalog/search", get(catalog::search))
        .route("/catalog/featured", get(catalog::featured))
        .route("/catalog/track/:id", get(catalog::get_track))
        .route("/catalog/tracks", get(catalog::get_tracks))
        .route("/catalog/status", get(catalog::status));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        // Account
        .route("/auth/me", get(auth::me))
        .route("/auth/profile", put(auth::update_profile))
        .route("/auth/password", put(auth::change_password))
        // Playlists
        .route(
            "/playlists",
            get(playlists::list_playlists).post(playlists::create_playlist),
        )
        .route(
            "/playlists/:id",
            get(playlists::get_playlist)
                .put(playlists::update_playlist)
                .delete(playlists::delete_playlist),
        )
        .route("/playlists/:id/stats", get(playlists::playlist_stats))
        .route("/playlists/:id/songs", post(playlists::add_song))
        .route(
            "/playlists/:id/songs/:song_id",
            axum::routing::delete(playlists::remove_song),
        )
        // Songs
        .route("/songs/batch", post(songs::create_songs_batch))
        // Catalog
        .route("/catalog/add-track", post(catalog::add_track))
        .layer(require_auth.clone());

    // Reads are public, writes need a token. Auth wraps only the write
    // handlers so an unsupported method still answers 405.
    let song_routes = Router::new()
        .route(
            "/songs",
            get(songs::list_songs).merge(post(songs::create_song).route_layer(require_auth.clone())),
        )
        .route(
            "/songs/:id",
            get(songs::get_song).merge(
                put(songs::update_song)
                    .delete(songs::delete_song)
                    .route_layer(require_auth),
            ),
        );

    Router::new()
        .nest(
            "/api",
            public_routes.merge(song_routes).merge(protected_routes),
        )
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
