/// Server services
pub mod accounts;
pub mod auth;
pub mod library;

pub use accounts::{AccountService, AuthSession, Registration};
pub use auth::AuthService;
pub use library::{AddTrackResult, LibraryService};
