//! Common test utilities and fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use cadence_catalog::{
    CatalogAlbum, CatalogArtist, CatalogError, CatalogImage, CatalogStatus, CatalogTrack,
    FeaturedPlaylist, FeaturedPlaylists, SearchResults, TrackCatalog,
};
use cadence_server::{services::AuthService, state::AppState};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key";

/// Test user credentials
pub mod fixtures {
    pub const TEST_USERNAME: &str = "alice";
    pub const TEST_EMAIL: &str = "alice@x.com";
    pub const TEST_PASSWORD: &str = "Secret123!";
    pub const TEST_NAME: &str = "Alice";
}

/// Create a test database with migrations applied
pub async fn create_test_pool() -> (SqlitePool, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", temp_dir.path().join("test.db").display());

    let pool = cadence_storage::create_pool(&url).await.unwrap();
    cadence_storage::run_migrations(&pool).await.unwrap();

    (pool, temp_dir)
}

/// Minimum bcrypt cost keeps the suite fast
pub fn create_test_auth_service() -> AuthService {
    AuthService::new(TEST_SECRET.to_string(), 7).with_cost(4)
}

pub fn catalog_track(id: &str, name: &str) -> CatalogTrack {
    CatalogTrack {
        id: id.to_string(),
        name: name.to_string(),
        artists: vec![
            CatalogArtist {
                id: "a1".to_string(),
                name: "Daft Punk".to_string(),
            },
            CatalogArtist {
                id: "a2".to_string(),
                name: "Pharrell Williams".to_string(),
            },
        ],
        album: CatalogAlbum {
            id: "al1".to_string(),
            name: "Random Access Memories".to_string(),
            images: vec![CatalogImage {
                url: format!("https://img.example.com/{id}.jpg"),
                height: Some(640),
                width: Some(640),
            }],
        },
        duration_ms: 369_000,
        preview_url: None,
        explicit: false,
        popularity: Some(80),
    }
}

/// In-memory catalog with a switchable outage
#[derive(Default)]
pub struct FakeCatalog {
    tracks: Mutex<HashMap<String, CatalogTrack>>,
    unavailable: AtomicBool,
    lookups: AtomicUsize,
}

impl FakeCatalog {
    pub fn with_tracks(tracks: impl IntoIterator<Item = CatalogTrack>) -> Self {
        let catalog = Self::default();
        catalog
            .tracks
            .lock()
            .unwrap()
            .extend(tracks.into_iter().map(|t| (t.id.clone(), t)));
        catalog
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `get_track` calls that reached the catalog
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn check(&self) -> cadence_catalog::Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(CatalogError::Unavailable("catalog is down".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TrackCatalog for FakeCatalog {
    async fn search_tracks(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
    ) -> cadence_catalog::Result<SearchResults> {
        self.check()?;
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Err(CatalogError::InvalidQuery("query is empty".to_string()));
        }

        let mut hits: Vec<CatalogTrack> = self
            .tracks
            .lock()
            .unwrap()
            .values()
            .filter(|t| t.name.to_lowercase().contains(&query))
            .cloned()
            .collect();
        hits.sort_by(|a, b| a.id.cmp(&b.id));

        let total = hits.len() as u64;
        let items = hits
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok(SearchResults { items, total })
    }

    async fn get_track(&self, id: &str) -> cadence_catalog::Result<CatalogTrack> {
        self.check()?;
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.tracks
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    async fn get_tracks_by_ids(&self, ids: &[String]) -> cadence_catalog::Result<Vec<CatalogTrack>> {
        self.check()?;
        let tracks = self.tracks.lock().unwrap();
        Ok(ids
            .iter()
            .take(cadence_catalog::MAX_TRACK_IDS)
            .filter_map(|id| tracks.get(id).cloned())
            .collect())
    }

    async fn featured_playlists(
        &self,
        limit: u32,
        offset: u32,
    ) -> cadence_catalog::Result<FeaturedPlaylists> {
        self.check()?;
        let all: Vec<FeaturedPlaylist> = (1..=3_u32)
            .map(|i| FeaturedPlaylist {
                id: format!("fp{i}"),
                name: format!("Featured {i}"),
                description: None,
                image_url: None,
                owner_name: Some("Editors".to_string()),
                track_count: u64::from(i) * 10,
            })
            .collect();

        Ok(FeaturedPlaylists {
            message: Some("Editors' picks".to_string()),
            total: all.len() as u64,
            items: all
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect(),
        })
    }

    async fn status(&self) -> CatalogStatus {
        CatalogStatus {
            has_client_id: true,
            has_client_secret: true,
            has_access_token: false,
            is_token_valid: false,
            is_configured: true,
        }
    }
}

/// Router over a fresh database and a fake catalog
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub catalog: Arc<FakeCatalog>,
    pub auth_service: Arc<AuthService>,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_catalog(FakeCatalog::default()).await
    }

    pub async fn with_catalog(catalog: FakeCatalog) -> Self {
        let (pool, temp_dir) = create_test_pool().await;
        let catalog = Arc::new(catalog);
        let auth_service = Arc::new(create_test_auth_service());

        let state = AppState::new(
            pool.clone(),
            Arc::clone(&auth_service),
            Arc::clone(&catalog) as Arc<dyn TrackCatalog>,
        );

        Self {
            router: cadence_server::router(state),
            pool,
            catalog,
            auth_service,
            _temp_dir: temp_dir,
        }
    }

    /// Send a request and decode the JSON body
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(
        &self,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, serde_json::Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    /// Register through the API and return the bearer token
    pub async fn register(&self, username: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                serde_json::json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": fixtures::TEST_PASSWORD,
                    "name": username,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Create a playlist through the API and return its id
    pub async fn create_playlist(&self, token: &str, name: &str) -> String {
        let (status, body) = self
            .post("/api/playlists", Some(token), serde_json::json!({ "name": name }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create playlist failed: {body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Store a song through the API and return its id
    pub async fn create_song(&self, token: &str, external_id: &str) -> String {
        let (status, body) = self
            .post(
                "/api/songs",
                Some(token),
                serde_json::json!({
                    "externalId": external_id,
                    "name": format!("Song {external_id}"),
                    "artist": "Artist",
                    "album": "Album",
                    "durationMs": 200_000,
                }),
            )
            .await;
        assert!(status.is_success(), "create song failed: {body}");
        body["data"]["id"].as_str().unwrap().to_string()
    }
}
