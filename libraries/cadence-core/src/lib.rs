//! Cadence Core
//!
//! Domain types, input validation, and error handling shared by every Cadence crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `User`, `Song`, `Playlist` and their typed identifiers
//! - **Pagination**: `PageRequest`, `Pagination` and `Page<T>`
//! - **Validation**: normalisation rules for user-supplied fields
//! - **Error Handling**: `CadenceError` and the `Result` alias
//!
//! # Example
//!
//! ```rust
//! use cadence_core::types::{PageRequest, Pagination};
//!
//! let request = PageRequest::new(Some(2), Some(20), PageRequest::MAX_LIMIT);
//! assert_eq!(request.offset(), 20);
//!
//! let pagination = Pagination::new(request, 25);
//! assert_eq!(pagination.total_pages, 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;
pub mod validation;

pub use error::{CadenceError, Result};

pub use types::{
    // Identifiers
    PlaylistId, SongId, UserId,
    // Users
    NewUser, UpdateProfile, User, UserSummary,
    // Songs
    NewSong, PopularSong, Song, UpdateSong,
    // Playlists
    CreatePlaylist, Playlist, PlaylistDetail, PlaylistStats, UpdatePlaylist,
    // Pagination
    Page, PageRequest, Pagination,
};
