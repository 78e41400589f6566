/// Shared application state
use crate::services::{AccountService, AuthService, LibraryService};
use cadence_catalog::TrackCatalog;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    pub accounts: AccountService,
    pub library: LibraryService,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        auth_service: Arc<AuthService>,
        catalog: Arc<dyn TrackCatalog>,
    ) -> Self {
        Self {
            accounts: AccountService::new(pool.clone(), Arc::clone(&auth_service)),
            library: LibraryService::new(pool.clone(), catalog),
            pool,
            auth_service,
        }
    }

    pub fn catalog(&self) -> &Arc<dyn TrackCatalog> {
        self.library.catalog()
    }
}
