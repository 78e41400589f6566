//! Cadence Server Library
//!
//! Playlist API with accounts, a shared song cache and catalog lookups.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use api::router;
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use services::{AccountService, AuthService, LibraryService};
pub use state::AppState;
