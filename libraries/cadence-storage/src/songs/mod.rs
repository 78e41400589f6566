//! Canonical song records keyed by external catalog id
//!
//! A song exists at most once per `external_id`. [`create_if_absent`] is the
//! only insertion path and leans on the UNIQUE constraint for that guarantee:
//! losing an insert race is not an error, the winner's row is returned instead.

use crate::error::{unique_violation, Result, StorageError};
use crate::query::{like_pattern, limit_offset, search_text};
use cadence_core::types::{
    NewSong, Page, PageRequest, PlaylistId, PopularSong, Song, SongId, UpdateSong,
};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite, SqlitePool};
use std::collections::HashMap;

const SONG_COLUMNS: &str =
    "id, external_id, name, artist, album, duration_ms, image_url, preview_url, created_at, updated_at";

/// Get song by ID
pub async fn get_by_id(pool: &SqlitePool, id: &SongId) -> Result<Option<Song>> {
    let row = sqlx::query(&format!("SELECT {SONG_COLUMNS} FROM songs WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(song_from_row).transpose()
}

/// Get song by its external catalog id
pub async fn find_by_external_id(pool: &SqlitePool, external_id: &str) -> Result<Option<Song>> {
    let row = sqlx::query(&format!(
        "SELECT {SONG_COLUMNS} FROM songs WHERE external_id = ?"
    ))
    .bind(external_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(song_from_row).transpose()
}

/// Return the song for `song.external_id`, inserting it first if needed
///
/// The boolean is `true` when this call created the record. An existing
/// record is returned unchanged; the incoming metadata is not merged into it.
pub async fn create_if_absent(pool: &SqlitePool, song: NewSong) -> Result<(Song, bool)> {
    if let Some(existing) = find_by_external_id(pool, &song.external_id).await? {
        return Ok((existing, false));
    }

    let id = SongId::generate();
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO songs (id, external_id, name, artist, album, duration_ms,
                           image_url, preview_url, search_text, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&song.external_id)
    .bind(&song.name)
    .bind(&song.artist)
    .bind(&song.album)
    .bind(song.duration_ms)
    .bind(&song.image_url)
    .bind(&song.preview_url)
    .bind(search_text([
        song.name.as_str(),
        song.artist.as_str(),
        song.album.as_str(),
    ]))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok((
            Song {
                id,
                external_id: song.external_id,
                name: song.name,
                artist: song.artist,
                album: song.album,
                duration_ms: song.duration_ms,
                image_url: song.image_url,
                preview_url: song.preview_url,
                created_at: now,
                updated_at: now,
            },
            true,
        )),
        Err(err) if unique_violation(&err).is_some() => {
            tracing::debug!(external_id = %song.external_id, "Lost song insert race, re-fetching");
            find_by_external_id(pool, &song.external_id)
                .await?
                .map(|existing| (existing, false))
                .ok_or_else(|| StorageError::not_found("Song", song.external_id))
        }
        Err(err) => Err(err.into()),
    }
}

/// Page through the cache, newest first
///
/// `search` matches name, artist or album case-insensitively, with Unicode
/// case folding.
pub async fn list(
    pool: &SqlitePool,
    request: PageRequest,
    search: Option<&str>,
) -> Result<Page<Song>> {
    let pattern = search.map(like_pattern);
    let (limit, offset) = limit_offset(request);

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM songs
        WHERE (?1 IS NULL OR search_text LIKE ?1 ESCAPE '\')
        "#,
    )
    .bind(&pattern)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query(&format!(
        r#"
        SELECT {SONG_COLUMNS} FROM songs
        WHERE (?1 IS NULL OR search_text LIKE ?1 ESCAPE '\')
        ORDER BY created_at DESC, rowid DESC
        LIMIT ?2 OFFSET ?3
        "#
    ))
    .bind(&pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let items = rows.iter().map(song_from_row).collect::<Result<Vec<_>>>()?;
    Ok(Page::new(items, request, u64::try_from(total).unwrap_or(0)))
}

/// Songs that appear in at least one playlist, most-used first
pub async fn popular(pool: &SqlitePool, limit: u32) -> Result<Vec<PopularSong>> {
    let rows = sqlx::query(
        r#"
        SELECT s.*, COUNT(ps.playlist_id) AS playlist_count
        FROM songs s
        JOIN playlist_songs ps ON ps.song_id = s.id
        GROUP BY s.id
        ORDER BY playlist_count DESC, s.name ASC
        LIMIT ?
        "#,
    )
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| -> Result<PopularSong> {
            Ok(PopularSong {
                song: song_from_row(row)?,
                playlist_count: row.try_get("playlist_count")?,
            })
        })
        .collect()
}

/// Fetch songs in the order of `ids`, skipping ids that do not exist
pub async fn get_many(pool: &SqlitePool, ids: &[SongId]) -> Result<Vec<Song>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {SONG_COLUMNS} FROM songs WHERE id IN ("));
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id.clone());
    }
    separated.push_unseparated(")");

    let rows = builder.build().fetch_all(pool).await?;

    let mut by_id = HashMap::with_capacity(rows.len());
    for row in &rows {
        let song = song_from_row(row)?;
        by_id.insert(song.id.clone(), song);
    }

    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

/// Correct a song's metadata; `external_id` never changes
pub async fn update(pool: &SqlitePool, id: &SongId, update: UpdateSong) -> Result<Option<Song>> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query(
        r#"
        UPDATE songs
        SET name = COALESCE(?, name),
            artist = COALESCE(?, artist),
            album = COALESCE(?, album),
            duration_ms = COALESCE(?, duration_ms),
            image_url = COALESCE(?, image_url),
            preview_url = COALESCE(?, preview_url),
            updated_at = ?
        WHERE id = ?
        RETURNING name, artist, album
        "#,
    )
    .bind(&update.name)
    .bind(&update.artist)
    .bind(&update.album)
    .bind(update.duration_ms)
    .bind(&update.image_url)
    .bind(&update.preview_url)
    .bind(Utc::now())
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let name: String = row.try_get("name")?;
    let artist: String = row.try_get("artist")?;
    let album: String = row.try_get("album")?;
    sqlx::query("UPDATE songs SET search_text = ? WHERE id = ?")
        .bind(search_text([name.as_str(), artist.as_str(), album.as_str()]))
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    get_by_id(pool, id).await
}

/// Detach the song from every playlist, then delete it
///
/// Runs in one transaction. Each affected playlist has its positions
/// compacted and its `updated_at` bumped.
pub async fn delete(pool: &SqlitePool, id: &SongId) -> Result<bool> {
    let mut tx = pool.begin().await?;

    // Write first so the transaction takes the write lock up front
    let affected: Vec<PlaylistId> =
        sqlx::query_scalar("DELETE FROM playlist_songs WHERE song_id = ? RETURNING playlist_id")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

    let now = Utc::now();
    for playlist_id in &affected {
        crate::playlists::compact_positions(&mut tx, playlist_id).await?;
        crate::playlists::touch(&mut tx, playlist_id, now).await?;
    }

    let result = sqlx::query("DELETE FROM songs WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    if !affected.is_empty() {
        tracing::debug!(song_id = %id, playlists = affected.len(), "Detached song before delete");
    }

    Ok(result.rows_affected() > 0)
}

pub(crate) fn song_from_row(row: &SqliteRow) -> Result<Song> {
    Ok(Song {
        id: row.try_get("id")?,
        external_id: row.try_get("external_id")?,
        name: row.try_get("name")?,
        artist: row.try_get("artist")?,
        album: row.try_get("album")?,
        duration_ms: row.try_get("duration_ms")?,
        image_url: row.try_get("image_url")?,
        preview_url: row.try_get("preview_url")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
