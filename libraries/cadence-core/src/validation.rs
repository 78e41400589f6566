//! Normalisation and validation of user-supplied fields.
//!
//! Every `normalize_*` function trims its input and returns the value that should be
//! stored, or a [`CadenceError::InvalidField`] naming the offending field.

use crate::error::{CadenceError, Result};
use crate::types::{CreatePlaylist, NewSong, UpdatePlaylist, UpdateProfile, UpdateSong};

pub const PLAYLIST_NAME_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;
pub const SEARCH_MAX: usize = 200;
const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Usernames: 3-30 chars of `[A-Za-z0-9_-]`, lowercased
pub fn normalize_username(raw: &str) -> Result<String> {
    let username = raw.trim().to_lowercase();
    let len = username.chars().count();
    if len < 3 {
        return Err(CadenceError::invalid_field(
            "username",
            "must be at least 3 characters long",
        ));
    }
    if len > 30 {
        return Err(CadenceError::invalid_field("username", "is too long"));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(CadenceError::invalid_field(
            "username",
            "can only contain letters, numbers, underscores, and hyphens",
        ));
    }
    Ok(username)
}

/// Emails are trimmed and lowercased; matching is exact afterwards
pub fn normalize_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_lowercase();
    let len = email.chars().count();
    if len < 5 {
        return Err(CadenceError::invalid_field("email", "is too short"));
    }
    if len > 254 {
        return Err(CadenceError::invalid_field("email", "is too long"));
    }

    let invalid = || CadenceError::invalid_field("email", "is not a valid address");
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }
    Ok(email)
}

/// Passwords are never trimmed
pub fn validate_password(password: &str) -> Result<()> {
    let len = password.chars().count();
    if len < 8 {
        return Err(CadenceError::invalid_field(
            "password",
            "must be at least 8 characters long",
        ));
    }
    if len > 128 {
        return Err(CadenceError::invalid_field("password", "is too long"));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(CadenceError::invalid_field(
            "password",
            "must contain at least one lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(CadenceError::invalid_field(
            "password",
            "must contain at least one uppercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(CadenceError::invalid_field(
            "password",
            "must contain at least one number",
        ));
    }
    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        return Err(CadenceError::invalid_field(
            "password",
            "must contain at least one special character (@$!%*?&)",
        ));
    }
    Ok(())
}

/// Display names: 1-100 chars after trim
pub fn normalize_display_name(raw: &str) -> Result<String> {
    bounded_text("name", raw, 100)
}

pub fn normalize_playlist_name(raw: &str) -> Result<String> {
    bounded_text("name", raw, PLAYLIST_NAME_MAX)
}

/// Blank descriptions are stored as absent
pub fn normalize_description(raw: Option<&str>) -> Result<Option<String>> {
    let Some(description) = raw.map(str::trim) else {
        return Ok(None);
    };
    if description.is_empty() {
        return Ok(None);
    }
    if description.chars().count() > DESCRIPTION_MAX {
        return Err(CadenceError::invalid_field(
            "description",
            format!("must be at most {DESCRIPTION_MAX} characters"),
        ));
    }
    Ok(Some(description.to_string()))
}

/// Free-text search: blank means "no filter"
pub fn normalize_search(raw: Option<&str>) -> Result<Option<String>> {
    let Some(search) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if search.chars().count() > SEARCH_MAX {
        return Err(CadenceError::invalid_field("search", "is too long"));
    }
    Ok(Some(search.to_string()))
}

/// Catalog ids are opaque tokens without whitespace or separators
pub fn normalize_external_id(raw: &str) -> Result<String> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(CadenceError::invalid_field("externalId", "is required"));
    }
    if id.len() > 64 {
        return Err(CadenceError::invalid_field("externalId", "is too long"));
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(CadenceError::invalid_field(
            "externalId",
            "contains invalid characters",
        ));
    }
    Ok(id.to_string())
}

pub fn normalize_create_playlist(input: CreatePlaylist) -> Result<CreatePlaylist> {
    Ok(CreatePlaylist {
        name: normalize_playlist_name(&input.name)?,
        description: normalize_description(input.description.as_deref())?,
    })
}

/// At least one field must be present
pub fn normalize_update_playlist(input: UpdatePlaylist) -> Result<UpdatePlaylist> {
    if input.name.is_none() && input.description.is_none() {
        return Err(CadenceError::invalid_input(
            "At least one field must be provided for update",
        ));
    }
    Ok(UpdatePlaylist {
        name: input
            .name
            .as_deref()
            .map(normalize_playlist_name)
            .transpose()?,
        // Keep `Some("")` so storage can tell "clear" from "leave alone"
        description: match input.description.as_deref() {
            Some(raw) => Some(normalize_description(Some(raw))?.unwrap_or_default()),
            None => None,
        },
    })
}

pub fn normalize_update_profile(input: UpdateProfile) -> Result<UpdateProfile> {
    if input.name.is_none() && input.username.is_none() {
        return Err(CadenceError::invalid_input(
            "At least one field must be provided for update",
        ));
    }
    Ok(UpdateProfile {
        name: input
            .name
            .as_deref()
            .map(normalize_display_name)
            .transpose()?,
        username: input
            .username
            .as_deref()
            .map(normalize_username)
            .transpose()?,
    })
}

pub fn normalize_new_song(input: NewSong) -> Result<NewSong> {
    Ok(NewSong {
        external_id: normalize_external_id(&input.external_id)?,
        name: bounded_text("name", &input.name, 200)?,
        artist: bounded_text("artist", &input.artist, 200)?,
        album: bounded_text("album", &input.album, 200)?,
        duration_ms: input.duration_ms,
        image_url: normalize_url("imageUrl", input.image_url.as_deref())?,
        preview_url: normalize_url("previewUrl", input.preview_url.as_deref())?,
    })
}

pub fn normalize_update_song(input: UpdateSong) -> Result<UpdateSong> {
    if input.is_empty() {
        return Err(CadenceError::invalid_input(
            "At least one field must be provided for update",
        ));
    }
    Ok(UpdateSong {
        name: input
            .name
            .as_deref()
            .map(|v| bounded_text("name", v, 200))
            .transpose()?,
        artist: input
            .artist
            .as_deref()
            .map(|v| bounded_text("artist", v, 200))
            .transpose()?,
        album: input
            .album
            .as_deref()
            .map(|v| bounded_text("album", v, 200))
            .transpose()?,
        duration_ms: input.duration_ms,
        image_url: normalize_url("imageUrl", input.image_url.as_deref())?,
        preview_url: normalize_url("previewUrl", input.preview_url.as_deref())?,
    })
}

fn bounded_text(field: &'static str, raw: &str, max: usize) -> Result<String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(CadenceError::invalid_field(field, "is required"));
    }
    if value.chars().count() > max {
        return Err(CadenceError::invalid_field(
            field,
            format!("must be at most {max} characters"),
        ));
    }
    Ok(value.to_string())
}

fn normalize_url(field: &'static str, raw: Option<&str>) -> Result<Option<String>> {
    let Some(url) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if url.len() > 2048 {
        return Err(CadenceError::invalid_field(field, "is too long"));
    }
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err(CadenceError::invalid_field(field, "must be an http(s) URL"));
    }
    Ok(Some(url.to_string()))
}
