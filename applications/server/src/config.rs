/// Server configuration
use crate::error::{Result, ServerError};
use crate::services::auth::MAX_EXPIRATION_DAYS;
use cadence_catalog::CatalogConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Accepted bcrypt work factors
pub const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 10..=14;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_token_expiration_days")]
    pub token_expiration_days: u64,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `config.toml` is read if
    /// present. `CADENCE_`-prefixed variables override both, with `__`
    /// between section and key (`CADENCE_AUTH__JWT_SECRET`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings =
                    settings.add_source(config::File::from(path.to_path_buf()).required(true));
            }
            None => {
                let config_path = PathBuf::from("config.toml");
                if config_path.exists() {
                    settings = settings.add_source(config::File::from(config_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CADENCE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings
            .build()
            .and_then(|built| built.try_deserialize())
            .map_err(|e| ServerError::Config(e.to_string()))?;

        Ok(config.with_catalog_fallback(|key| std::env::var(key).ok()))
    }

    /// Fill missing catalog credentials from `SPOTIFY_CLIENT_ID` /
    /// `SPOTIFY_CLIENT_SECRET`
    pub fn with_catalog_fallback(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if is_blank(self.catalog.client_id.as_deref()) {
            self.catalog.client_id = lookup("SPOTIFY_CLIENT_ID").filter(|v| !v.trim().is_empty());
        }
        if is_blank(self.catalog.client_secret.as_deref()) {
            self.catalog.client_secret =
                lookup("SPOTIFY_CLIENT_SECRET").filter(|v| !v.trim().is_empty());
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set CADENCE_AUTH__JWT_SECRET)".to_string(),
            ));
        }

        if !BCRYPT_COST_RANGE.contains(&self.auth.bcrypt_cost) {
            return Err(ServerError::Config(format!(
                "bcrypt cost must be between {} and {}",
                BCRYPT_COST_RANGE.start(),
                BCRYPT_COST_RANGE.end()
            )));
        }

        if !(1..=MAX_EXPIRATION_DAYS).contains(&self.auth.token_expiration_days) {
            return Err(ServerError::Config(format!(
                "token expiration must be between 1 and {MAX_EXPIRATION_DAYS} days"
            )));
        }

        if self.catalog.timeout_secs == 0 {
            return Err(ServerError::Config(
                "catalog timeout must be at least one second".to_string(),
            ));
        }

        Ok(())
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/cadence.db".to_string()
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        token_expiration_days: default_token_expiration_days(),
        bcrypt_cost: default_bcrypt_cost(),
    }
}

fn default_token_expiration_days() -> u64 {
    7
}

fn default_bcrypt_cost() -> u32 {
    12
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
            catalog: CatalogConfig::default(),
        }
    }
}
