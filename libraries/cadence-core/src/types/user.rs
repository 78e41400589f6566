/// User domain types
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public account record
///
/// The password hash never leaves storage through this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier
    pub id: UserId,

    /// Unique login handle, stored lowercased
    pub username: String,

    /// Unique email address, stored lowercased
    pub email: String,

    /// Display name
    pub name: String,

    /// Account creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last profile change
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Reduce to the fields other users may see
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            username: self.username.clone(),
            name: self.name.clone(),
        }
    }
}

/// Owner information embedded in hydrated playlists
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// User identifier
    pub id: UserId,
    /// Login handle
    pub username: String,
    /// Display name
    pub name: String,
}

/// Data for inserting a new account (already validated and hashed)
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Normalised username
    pub username: String,
    /// Normalised email
    pub email: String,
    /// Display name
    pub name: String,
    /// KDF output
    pub password_hash: String,
}

/// Partial profile update
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    /// New display name
    pub name: Option<String>,
    /// New username
    pub username: Option<String>,
}
