//! Account records and credentials

use crate::error::{unique_violation, Result, StorageError};
use cadence_core::types::{NewUser, UpdateProfile, User, UserId};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

const USER_COLUMNS: &str = "id, username, email, name, created_at, updated_at";

/// A user together with the stored KDF output, for login checks only
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Insert a new account
///
/// Fails with `Conflict` when the email or username is already taken. The
/// check is the UNIQUE constraint itself, so two racing registrations can't
/// both succeed.
pub async fn create(pool: &SqlitePool, user: NewUser) -> Result<User> {
    let id = UserId::generate();
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO users (id, username, email, name, password_hash, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.password_hash)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await;

    if let Err(err) = result {
        return Err(match unique_violation(&err) {
            Some(column) => duplicate_account(&column),
            None => err.into(),
        });
    }

    Ok(User {
        id,
        username: user.username,
        email: user.email,
        name: user.name,
        created_at: now,
        updated_at: now,
    })
}

/// Get user by ID
pub async fn get_by_id(pool: &SqlitePool, id: &UserId) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Exact match on an already-normalised email
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
        .bind(email)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Exact match on an already-normalised username
pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let row = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(user_from_row).transpose()
}

/// Look up the account and its password hash by email
pub async fn find_credentials_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<UserCredentials>> {
    let row = sqlx::query(&format!(
        "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = ?"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    row.map(|row| -> Result<UserCredentials> {
        Ok(UserCredentials {
            user: user_from_row(&row)?,
            password_hash: row.try_get("password_hash")?,
        })
    })
    .transpose()
}

/// Get user's password hash for authentication
pub async fn get_password_hash(pool: &SqlitePool, id: &UserId) -> Result<Option<String>> {
    let row = sqlx::query("SELECT password_hash FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|r| r.try_get("password_hash")).transpose()?)
}

/// Replace the stored password hash
///
/// Returns `false` if the user does not exist.
pub async fn set_password_hash(pool: &SqlitePool, id: &UserId, password_hash: &str) -> Result<bool> {
    let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
        .bind(password_hash)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Partial profile update (name and/or username)
///
/// Returns `None` if the user does not exist and `Conflict` if the new
/// username belongs to someone else.
pub async fn update_profile(
    pool: &SqlitePool,
    id: &UserId,
    update: UpdateProfile,
) -> Result<Option<User>> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET name = COALESCE(?, name),
            username = COALESCE(?, username),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&update.name)
    .bind(&update.username)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => Ok(None),
        Ok(_) => get_by_id(pool, id).await,
        Err(err) => Err(match unique_violation(&err) {
            Some(column) => duplicate_account(&column),
            None => err.into(),
        }),
    }
}

/// Get all users
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<User>> {
    let rows = sqlx::query(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY username"
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(user_from_row).collect()
}

/// Hard-delete an account; the schema cascades to the user's playlists
pub async fn delete(pool: &SqlitePool, id: &UserId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn duplicate_account(column: &str) -> StorageError {
    if column.ends_with("email") {
        StorageError::conflict("Email is already registered")
    } else if column.ends_with("username") {
        StorageError::conflict("Username is already taken")
    } else {
        StorageError::conflict("User already exists")
    }
}

fn user_from_row(row: &SqliteRow) -> Result<User> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
