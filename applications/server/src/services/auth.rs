/// Authentication service - JWT and password handling
use crate::error::{Result, ServerError};
use cadence_core::UserId;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Longest token lifetime accepted
pub const MAX_EXPIRATION_DAYS: u64 = 365;

#[derive(Debug, Clone)]
pub struct AuthService {
    secret: String,
    token_expiration: Duration,
    bcrypt_cost: u32,
    /// Hash checked against when a login names no account
    pub(crate) dummy_hash: OnceLock<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub exp: i64, // Expiration time
    pub iat: i64, // Issued at
}

impl AuthService {
    pub fn new(secret: String, expiration_days: u64) -> Self {
        Self {
            secret,
            token_expiration: Duration::days(
                i64::try_from(expiration_days.clamp(1, MAX_EXPIRATION_DAYS)).unwrap_or(1),
            ),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            dummy_hash: OnceLock::new(),
        }
    }

    /// Override the bcrypt work factor
    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self.dummy_hash = OnceLock::new();
        self
    }

    /// Token lifetime in seconds
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_expiration.num_seconds()
    }

    /// Hash a password using bcrypt
    ///
    /// CPU-bound; async callers should run it on the blocking pool.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.bcrypt_cost).map_err(ServerError::from)
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(ServerError::from)
    }

    /// Run a bcrypt verification at the configured cost and discard the result
    ///
    /// Login calls this for unknown emails so they take as long as a wrong
    /// password for a real account.
    pub fn verify_dummy(&self, password: &str) -> Result<()> {
        let hash = match self.dummy_hash.get() {
            Some(hash) => hash,
            None => {
                let hash = self.hash_password("cadence-no-such-account")?;
                self.dummy_hash.get_or_init(|| hash)
            }
        };
        self.verify_password(password, hash)?;
        Ok(())
    }

    /// Create a bearer token for the user
    pub fn create_token(&self, user_id: &UserId) -> Result<String> {
        let now = Utc::now();
        let exp = now + self.token_expiration;

        let claims = Claims {
            user_id: user_id.as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(ServerError::from)
    }

    /// Verify and decode a token
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    /// Verify a token and return the user it was issued to
    pub fn verify_access_token(&self, token: &str) -> Result<UserId> {
        let claims = self.verify_token(token)?;
        Ok(UserId::new(claims.user_id))
    }
}
