/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cadence_catalog::CatalogError;
use cadence_core::CadenceError;
use cadence_storage::StorageError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Storage error: {0}")]
    Storage(StorageError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
}

impl From<CadenceError> for ServerError {
    fn from(err: CadenceError) -> Self {
        ServerError::Validation(err.to_string())
    }
}

impl From<StorageError> for ServerError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, .. } => {
                ServerError::NotFound(format!("{entity} not found"))
            }
            StorageError::Conflict(msg) => ServerError::Conflict(msg),
            other => ServerError::Storage(other),
        }
    }
}

impl From<CatalogError> for ServerError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotConfigured => {
                ServerError::ServiceUnavailable("Catalog service is not configured".to_string())
            }
            CatalogError::InvalidQuery(msg) => ServerError::Validation(msg),
            CatalogError::NotFound(_) => ServerError::NotFound("Track not found".to_string()),
            err @ (CatalogError::Unavailable(_)
            | CatalogError::Timeout
            | CatalogError::Request(_)) => {
                tracing::warn!(error = %err, "Catalog request failed");
                ServerError::ServiceUnavailable("Catalog service unavailable".to_string())
            }
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Validation(_) => StatusCode::BAD_REQUEST,
            ServerError::Unauthorized(_) | ServerError::Jwt(_) => StatusCode::UNAUTHORIZED,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Conflict(_) => StatusCode::CONFLICT,
            ServerError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Internal(_)
            | ServerError::Storage(_)
            | ServerError::Config(_)
            | ServerError::Bcrypt(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self {
            ServerError::Validation(msg)
            | ServerError::Unauthorized(msg)
            | ServerError::NotFound(msg)
            | ServerError::Conflict(msg)
            | ServerError::ServiceUnavailable(msg) => msg,
            ServerError::Jwt(ref e) => {
                tracing::debug!("JWT error: {:?}", e);
                "Invalid or expired token".to_string()
            }
            ServerError::Storage(ref e) => {
                tracing::error!("Storage error: {:?}", e);
                "Internal server error".to_string()
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                "Internal server error".to_string()
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            ServerError::Bcrypt(ref e) => {
                tracing::error!("Bcrypt error: {:?}", e);
                "Internal server error".to_string()
            }
        };

        let body = Json(json!({
            "success": false,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_map_to_taxonomy() {
        let not_found: ServerError = StorageError::not_found("Song", "s1").into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "Resource not found: Song not found");

        let conflict: ServerError = StorageError::conflict("Song already exists in playlist").into();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn catalog_errors_map_to_taxonomy() {
        let cases = [
            (CatalogError::NotConfigured, StatusCode::SERVICE_UNAVAILABLE),
            (CatalogError::InvalidQuery("q".into()), StatusCode::BAD_REQUEST),
            (CatalogError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (CatalogError::Unavailable("502".into()), StatusCode::SERVICE_UNAVAILABLE),
            (CatalogError::Timeout, StatusCode::SERVICE_UNAVAILABLE),
            (CatalogError::ParseError("bad".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ServerError::from(err).status(), status);
        }
    }

    #[test]
    fn validation_errors_are_bad_request() {
        let err: ServerError = CadenceError::invalid_field("name", "is required").into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
