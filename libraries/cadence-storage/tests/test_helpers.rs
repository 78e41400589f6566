//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using REAL SQLite files (NOT in-memory)
//! so every pooled connection sees the same schema, constraints and indexes.

#![allow(dead_code)]

use cadence_core::types::*;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = cadence_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        cadence_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Test fixture: Create a test user named after `username`
pub async fn create_test_user(pool: &SqlitePool, username: &str) -> User {
    cadence_storage::users::create(
        pool,
        NewUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            name: username.to_uppercase(),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .expect("Failed to create test user")
}

/// Song input with the given external id and duration
pub fn new_song(external_id: &str, duration_ms: u32) -> NewSong {
    NewSong {
        external_id: external_id.to_string(),
        name: format!("Song {external_id}"),
        artist: "Test Artist".to_string(),
        album: "Test Album".to_string(),
        duration_ms,
        image_url: None,
        preview_url: None,
    }
}

/// Test fixture: Create a cached song
pub async fn create_test_song(pool: &SqlitePool, external_id: &str) -> Song {
    let (song, created) = cadence_storage::songs::create_if_absent(pool, new_song(external_id, 180_000))
        .await
        .expect("Failed to create test song");
    assert!(created, "fixture song {external_id} already existed");
    song
}

/// Test fixture: Create an empty playlist
pub async fn create_test_playlist(pool: &SqlitePool, owner: &UserId, name: &str) -> Playlist {
    cadence_storage::playlists::create(
        pool,
        owner,
        CreatePlaylist {
            name: name.to_string(),
            description: None,
        },
    )
    .await
    .expect("Failed to create test playlist")
}

/// Song ids of `playlist` as it is stored right now
pub async fn stored_song_ids(pool: &SqlitePool, playlist: &Playlist) -> Vec<SongId> {
    cadence_storage::playlists::get_by_id(pool, &playlist.id, &playlist.owner_id)
        .await
        .expect("Failed to load playlist")
        .expect("Playlist disappeared")
        .song_ids
}
