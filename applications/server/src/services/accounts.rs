/// Account service - registration, login and profile management
use crate::error::{Result, ServerError};
use crate::services::AuthService;
use cadence_core::types::{NewUser, UpdateProfile, User, UserId};
use cadence_core::validation;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;

const INVALID_LOGIN: &str = "Invalid email or password";

/// Registration form
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
}

/// A user together with a freshly issued bearer token
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user: User,
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct AccountService {
    pool: SqlitePool,
    auth: Arc<AuthService>,
}

impl AccountService {
    pub fn new(pool: SqlitePool, auth: Arc<AuthService>) -> Self {
        Self { pool, auth }
    }

    /// Create an account and sign the user in
    pub async fn register(&self, registration: Registration) -> Result<AuthSession> {
        let user = self.create_user(registration).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "Registered user");
        self.session(user)
    }

    /// Validate, hash and store a new account
    ///
    /// Fails with `Conflict` if the email or username is taken.
    pub async fn create_user(&self, registration: Registration) -> Result<User> {
        let username = validation::normalize_username(&registration.username)?;
        let email = validation::normalize_email(&registration.email)?;
        let name = validation::normalize_display_name(&registration.name)?;
        validation::validate_password(&registration.password)?;

        let password_hash = self.hash(registration.password).await?;

        let user = cadence_storage::users::create(
            &self.pool,
            NewUser {
                username,
                email,
                name,
                password_hash,
            },
        )
        .await?;

        Ok(user)
    }

    /// Check an email/password pair and issue a token
    ///
    /// Unknown emails and wrong passwords fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ServerError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let email = email.trim().to_lowercase();
        let Some(credentials) =
            cadence_storage::users::find_credentials_by_email(&self.pool, &email).await?
        else {
            self.verify_dummy(password.to_string()).await?;
            return Err(ServerError::Unauthorized(INVALID_LOGIN.to_string()));
        };

        if !self
            .verify(password.to_string(), credentials.password_hash)
            .await?
        {
            tracing::debug!(user_id = %credentials.user.id, "Rejected login");
            return Err(ServerError::Unauthorized(INVALID_LOGIN.to_string()));
        }

        self.session(credentials.user)
    }

    /// Current account for a token's user
    pub async fn me(&self, user_id: &UserId) -> Result<User> {
        cadence_storage::users::get_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| ServerError::Unauthorized("User no longer exists".to_string()))
    }

    pub async fn update_profile(&self, user_id: &UserId, update: UpdateProfile) -> Result<User> {
        let update = validation::normalize_update_profile(update)?;

        cadence_storage::users::update_profile(&self.pool, user_id, update)
            .await?
            .ok_or_else(|| ServerError::Unauthorized("User no longer exists".to_string()))
    }

    /// Replace the password after checking the current one
    pub async fn change_password(
        &self,
        user_id: &UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<()> {
        let Some(stored_hash) =
            cadence_storage::users::get_password_hash(&self.pool, user_id).await?
        else {
            return Err(ServerError::Unauthorized("User no longer exists".to_string()));
        };

        if !self.verify(current_password.to_string(), stored_hash).await? {
            return Err(ServerError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }

        validation::validate_password(new_password)?;
        let new_hash = self.hash(new_password.to_string()).await?;

        if !cadence_storage::users::set_password_hash(&self.pool, user_id, &new_hash).await? {
            return Err(ServerError::Unauthorized("User no longer exists".to_string()));
        }

        tracing::info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    fn session(&self, user: User) -> Result<AuthSession> {
        let token = self.auth.create_token(&user.id)?;
        Ok(AuthSession {
            user,
            token,
            expires_in: self.auth.token_ttl_secs(),
        })
    }

    async fn hash(&self, password: String) -> Result<String> {
        let auth = Arc::clone(&self.auth);
        tokio::task::spawn_blocking(move || auth.hash_password(&password))
            .await
            .map_err(|e| ServerError::Internal(format!("Hashing task failed: {e}")))?
    }

    async fn verify(&self, password: String, hash: String) -> Result<bool> {
        let auth = Arc::clone(&self.auth);
        tokio::task::spawn_blocking(move || auth.verify_password(&password, &hash))
            .await
            .map_err(|e| ServerError::Internal(format!("Verification task failed: {e}")))?
    }

    async fn verify_dummy(&self, password: String) -> Result<()> {
        let auth = Arc::clone(&self.auth);
        tokio::task::spawn_blocking(move || auth.verify_dummy(&password))
            .await
            .map_err(|e| ServerError::Internal(format!("Verification task failed: {e}")))?
    }
}
