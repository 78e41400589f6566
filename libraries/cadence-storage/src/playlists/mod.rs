//! Playlists and their ordered song membership
//!
//! Every function takes the acting user. A playlist owned by someone else is
//! reported exactly like a missing one (`None` / `false`), so callers cannot
//! probe for other users' playlists.
//!
//! Membership lives in `playlist_songs` with a dense `position` column.
//! Appends and removals are single-statement writes inside a transaction, so
//! concurrent edits of different songs on the same playlist never overwrite
//! each other.

use crate::error::{foreign_key_violation, Result, StorageError};
use crate::query::{like_pattern, limit_offset, search_text};
use crate::{songs, users};
use cadence_core::types::{
    CreatePlaylist, Page, PageRequest, Playlist, PlaylistDetail, PlaylistId, PlaylistStats, SongId,
    UpdatePlaylist, UserId,
};
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashMap;

const PLAYLIST_COLUMNS: &str = "id, owner_id, name, description, created_at, updated_at";

/// Page through a user's playlists, most recently updated first
///
/// `search` matches name or description case-insensitively, with Unicode
/// case folding.
pub async fn list(
    pool: &SqlitePool,
    owner_id: &UserId,
    request: PageRequest,
    search: Option<&str>,
) -> Result<Page<Playlist>> {
    let pattern = search.map(like_pattern);
    let (limit, offset) = limit_offset(request);

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM playlists
        WHERE owner_id = ?1
          AND (?2 IS NULL OR search_text LIKE ?2 ESCAPE '\')
        "#,
    )
    .bind(owner_id)
    .bind(&pattern)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query(&format!(
        r#"
        SELECT {PLAYLIST_COLUMNS} FROM playlists
        WHERE owner_id = ?1
          AND (?2 IS NULL OR search_text LIKE ?2 ESCAPE '\')
        ORDER BY updated_at DESC, rowid DESC
        LIMIT ?3 OFFSET ?4
        "#
    ))
    .bind(owner_id)
    .bind(&pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let mut playlists = rows
        .iter()
        .map(playlist_from_row)
        .collect::<Result<Vec<_>>>()?;
    attach_song_ids(pool, &mut playlists).await?;

    Ok(Page::new(
        playlists,
        request,
        u64::try_from(total).unwrap_or(0),
    ))
}

/// Get an owned playlist with its song ids in order
pub async fn get_by_id(
    pool: &SqlitePool,
    id: &PlaylistId,
    owner_id: &UserId,
) -> Result<Option<Playlist>> {
    let row = sqlx::query(&format!(
        "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE id = ? AND owner_id = ?"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let mut playlist = playlist_from_row(&row)?;
    let mut conn = pool.acquire().await?;
    playlist.song_ids = song_ids(&mut conn, id).await?;

    Ok(Some(playlist))
}

/// Resolve a playlist's song ids and owner into a full view
pub async fn hydrate(pool: &SqlitePool, playlist: Playlist) -> Result<PlaylistDetail> {
    let songs = songs::get_many(pool, &playlist.song_ids).await?;
    let owner = users::get_by_id(pool, &playlist.owner_id)
        .await?
        .ok_or_else(|| StorageError::not_found("User", playlist.owner_id.as_str()))?;

    Ok(PlaylistDetail {
        playlist,
        songs,
        owner: owner.summary(),
    })
}

/// [`get_by_id`] followed by [`hydrate`]
pub async fn get_detail(
    pool: &SqlitePool,
    id: &PlaylistId,
    owner_id: &UserId,
) -> Result<Option<PlaylistDetail>> {
    match get_by_id(pool, id, owner_id).await? {
        Some(playlist) => Ok(Some(hydrate(pool, playlist).await?)),
        None => Ok(None),
    }
}

/// Create an empty playlist
///
/// `NotFound` if the owner no longer exists.
pub async fn create(
    pool: &SqlitePool,
    owner_id: &UserId,
    playlist: CreatePlaylist,
) -> Result<Playlist> {
    let id = PlaylistId::generate();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO playlists (id, owner_id, name, description, search_text, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(owner_id)
    .bind(&playlist.name)
    .bind(&playlist.description)
    .bind(playlist_search_text(&playlist.name, playlist.description.as_deref()))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|err| {
        if foreign_key_violation(&err) {
            StorageError::not_found("User", owner_id.as_str())
        } else {
            err.into()
        }
    })?;

    Ok(Playlist {
        id,
        owner_id: owner_id.clone(),
        name: playlist.name,
        description: playlist.description,
        song_ids: Vec::new(),
        created_at: now,
        updated_at: now,
    })
}

/// Partial update of name and description
///
/// A present but empty `description` clears it.
pub async fn update(
    pool: &SqlitePool,
    id: &PlaylistId,
    owner_id: &UserId,
    update: UpdatePlaylist,
) -> Result<Option<Playlist>> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query(
        r#"
        UPDATE playlists
        SET name = COALESCE(?1, name),
            description = CASE WHEN ?2 THEN NULLIF(?3, '') ELSE description END,
            updated_at = ?4
        WHERE id = ?5 AND owner_id = ?6
        RETURNING name, description
        "#,
    )
    .bind(&update.name)
    .bind(update.description.is_some())
    .bind(&update.description)
    .bind(Utc::now())
    .bind(id)
    .bind(owner_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let name: String = row.try_get("name")?;
    let description: Option<String> = row.try_get("description")?;
    sqlx::query("UPDATE playlists SET search_text = ? WHERE id = ?")
        .bind(playlist_search_text(&name, description.as_deref()))
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    get_by_id(pool, id, owner_id).await
}

/// Delete an owned playlist; membership rows cascade
pub async fn delete(pool: &SqlitePool, id: &PlaylistId, owner_id: &UserId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM playlists WHERE id = ? AND owner_id = ?")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Append a song to the end of an owned playlist
///
/// Returns `None` if the playlist is missing or not owned, `NotFound` if the
/// song does not exist and `Conflict` if it is already in the playlist.
pub async fn add_song(
    pool: &SqlitePool,
    id: &PlaylistId,
    owner_id: &UserId,
    song_id: &SongId,
) -> Result<Option<Playlist>> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();

    // Membership check, position and insert are one statement
    let inserted = sqlx::query(
        r#"
        INSERT INTO playlist_songs (playlist_id, song_id, position, added_at)
        SELECT p.id, s.id,
               COALESCE((SELECT MAX(position) + 1 FROM playlist_songs WHERE playlist_id = p.id), 0),
               ?
        FROM playlists p, songs s
        WHERE p.id = ? AND p.owner_id = ? AND s.id = ?
        ON CONFLICT (playlist_id, song_id) DO NOTHING
        "#,
    )
    .bind(now)
    .bind(id)
    .bind(owner_id)
    .bind(song_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if inserted == 0 {
        let owned = owns(&mut tx, id, owner_id).await?;
        let song_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM songs WHERE id = ?)")
            .bind(song_id)
            .fetch_one(&mut *tx)
            .await?;
        tx.rollback().await?;

        return if !owned {
            Ok(None)
        } else if !song_exists {
            Err(StorageError::not_found("Song", song_id.as_str()))
        } else {
            Err(StorageError::conflict("Song already exists in playlist"))
        };
    }

    touch(&mut tx, id, now).await?;
    tx.commit().await?;

    tracing::debug!(playlist_id = %id, song_id = %song_id, "Appended song to playlist");
    get_by_id(pool, id, owner_id).await
}

/// Remove a song from an owned playlist
///
/// Removing a song that is not in the playlist is a no-op that still returns
/// the playlist. Remaining positions are compacted.
pub async fn remove_song(
    pool: &SqlitePool,
    id: &PlaylistId,
    owner_id: &UserId,
    song_id: &SongId,
) -> Result<Option<Playlist>> {
    let mut tx = pool.begin().await?;

    let removed = sqlx::query(
        r#"
        DELETE FROM playlist_songs
        WHERE playlist_id = ?1 AND song_id = ?2
          AND EXISTS (SELECT 1 FROM playlists WHERE id = ?1 AND owner_id = ?3)
        "#,
    )
    .bind(id)
    .bind(song_id)
    .bind(owner_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if removed > 0 {
        compact_positions(&mut tx, id).await?;
        touch(&mut tx, id, Utc::now()).await?;
    }

    tx.commit().await?;

    get_by_id(pool, id, owner_id).await
}

/// Song count and total duration of an owned playlist
pub async fn stats(
    pool: &SqlitePool,
    id: &PlaylistId,
    owner_id: &UserId,
) -> Result<Option<PlaylistStats>> {
    Ok(get_detail(pool, id, owner_id)
        .await?
        .map(|detail| PlaylistStats::from_detail(&detail)))
}

/// Renumber positions to `0..n-1`, keeping relative order
pub(crate) async fn compact_positions(conn: &mut SqliteConnection, id: &PlaylistId) -> Result<()> {
    let ordered = song_ids(conn, id).await?;

    for (position, song_id) in (0_i64..).zip(ordered.iter()) {
        sqlx::query(
            "UPDATE playlist_songs SET position = ? WHERE playlist_id = ? AND song_id = ? AND position != ?",
        )
        .bind(position)
        .bind(id)
        .bind(song_id)
        .bind(position)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

pub(crate) async fn touch(
    conn: &mut SqliteConnection,
    id: &PlaylistId,
    now: DateTime<Utc>,
) -> Result<()> {
    sqlx::query("UPDATE playlists SET updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}

async fn owns(conn: &mut SqliteConnection, id: &PlaylistId, owner_id: &UserId) -> Result<bool> {
    let owned = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM playlists WHERE id = ? AND owner_id = ?)",
    )
    .bind(id)
    .bind(owner_id)
    .fetch_one(conn)
    .await?;
    Ok(owned)
}

async fn song_ids(conn: &mut SqliteConnection, id: &PlaylistId) -> Result<Vec<SongId>> {
    let ids = sqlx::query_scalar(
        "SELECT song_id FROM playlist_songs WHERE playlist_id = ? ORDER BY position",
    )
    .bind(id)
    .fetch_all(conn)
    .await?;
    Ok(ids)
}

async fn attach_song_ids(pool: &SqlitePool, playlists: &mut [Playlist]) -> Result<()> {
    if playlists.is_empty() {
        return Ok(());
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT playlist_id, song_id FROM playlist_songs WHERE playlist_id IN (",
    );
    let mut separated = builder.separated(", ");
    for playlist in playlists.iter() {
        separated.push_bind(playlist.id.clone());
    }
    separated.push_unseparated(") ORDER BY playlist_id, position");

    let rows = builder.build().fetch_all(pool).await?;

    let mut by_playlist: HashMap<PlaylistId, Vec<SongId>> = HashMap::new();
    for row in &rows {
        by_playlist
            .entry(row.try_get("playlist_id")?)
            .or_default()
            .push(row.try_get("song_id")?);
    }

    for playlist in playlists.iter_mut() {
        playlist.song_ids = by_playlist.remove(&playlist.id).unwrap_or_default();
    }

    Ok(())
}

fn playlist_search_text(name: &str, description: Option<&str>) -> String {
    search_text([name, description.unwrap_or_default()])
}

fn playlist_from_row(row: &SqliteRow) -> Result<Playlist> {
    Ok(Playlist {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        song_ids: Vec::new(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
