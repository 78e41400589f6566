/// Request extractors that report failures through `ServerError`
use crate::error::ServerError;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use cadence_core::types::PageRequest;
use serde::{de::DeserializeOwned, Deserialize};

/// JSON body whose rejections become `400` validation errors in the
/// standard envelope
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ServerError::Validation(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// `page`, `limit` and `search` as raw strings
///
/// Unparseable numbers fall back to the defaults instead of failing the
/// request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn page_request(&self, max_limit: u32) -> PageRequest {
        PageRequest::new(
            parse_number(self.page.as_deref()),
            parse_number(self.limit.as_deref()),
            max_limit,
        )
    }
}

pub fn parse_number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse().ok())
}
