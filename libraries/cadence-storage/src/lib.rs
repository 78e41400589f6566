//! Cadence Storage
//!
//! `SQLite` persistence for accounts, the canonical song cache, and playlists.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each feature owns its own queries (`users`, `songs`, `playlists`)
//! - **Ownership Scoping**: every playlist query takes the acting user and treats
//!   foreign playlists exactly like missing ones
//! - **Constraint-Backed Invariants**: one song per external id and one membership row
//!   per (playlist, song) are enforced by the schema, not by read-then-write checks
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_core::types::{CreatePlaylist, UserId};
//! use cadence_storage::{create_pool, playlists, run_migrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://cadence.db").await?;
//! run_migrations(&pool).await?;
//!
//! let owner = UserId::new("user-1");
//! let playlist = playlists::create(
//!     &pool,
//!     &owner,
//!     CreatePlaylist { name: "Road Trip".into(), description: None },
//! )
//! .await?;
//! assert!(playlist.song_ids.is_empty());
//! # Ok(())
//! # }
//! ```

mod error;
mod query;

// Vertical slices
pub mod playlists;
pub mod songs;
pub mod users;

pub use error::{Result, StorageError};

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://cadence.db`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}
