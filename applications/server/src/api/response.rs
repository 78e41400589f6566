/// Success envelope shared by every handler
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use cadence_core::types::{Page, Pagination};
use serde::Serialize;

/// `{ success: true, data?, message?, pagination? }` with a status code
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    data: Option<T>,
    message: Option<String>,
    pagination: Option<Pagination>,
    status: StatusCode,
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pagination: Option<&'a Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            message: None,
            pagination: None,
            status: StatusCode::OK,
        }
    }

    /// 201 with data
    pub fn created(data: T) -> Self {
        Self::success(data).with_status(StatusCode::CREATED)
    }

    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// A page of items plus its pagination block
    pub fn paginated(page: Page<T>) -> Self {
        Self {
            data: Some(page.items),
            message: None,
            pagination: Some(page.pagination),
            status: StatusCode::OK,
        }
    }
}

impl ApiResponse<()> {
    /// 200 with only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            data: None,
            message: Some(message.into()),
            pagination: None,
            status: StatusCode::OK,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let envelope = Envelope {
            success: true,
            data: self.data.as_ref(),
            message: self.message.as_deref(),
            pagination: self.pagination.as_ref(),
        };

        (self.status, Json(envelope)).into_response()
    }
}
