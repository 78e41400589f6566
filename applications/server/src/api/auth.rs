/// Authentication API routes
use crate::{
    api::{extract::JsonBody, response::ApiResponse},
    error::Result,
    middleware::AuthenticatedUser,
    services::{AuthSession, Registration},
    state::AppState,
};
use axum::extract::State;
use cadence_core::types::{UpdateProfile, User};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// POST /api/auth/register
pub async fn register(
    State(app_state): State<AppState>,
    JsonBody(req): JsonBody<Registration>,
) -> Result<ApiResponse<AuthSession>> {
    let session = app_state.accounts.register(req).await?;
    Ok(ApiResponse::created(session).with_message("User registered successfully"))
}

/// POST /api/auth/login
pub async fn login(
    State(app_state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<ApiResponse<AuthSession>> {
    let session = app_state.accounts.login(&req.email, &req.password).await?;
    Ok(ApiResponse::success(session).with_message("Login successful"))
}

/// POST /api/auth/logout
///
/// Tokens are stateless; the client drops its copy.
pub async fn logout() -> ApiResponse<()> {
    ApiResponse::message("Logout successful")
}

/// GET /api/auth/me
pub async fn me(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<ApiResponse<User>> {
    let user = app_state.accounts.me(auth.user_id()).await?;
    Ok(ApiResponse::success(user))
}

/// PUT /api/auth/profile
pub async fn update_profile(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    JsonBody(req): JsonBody<UpdateProfile>,
) -> Result<ApiResponse<User>> {
    let user = app_state.accounts.update_profile(auth.user_id(), req).await?;
    Ok(ApiResponse::success(user).with_message("Profile updated successfully"))
}

/// PUT /api/auth/password
pub async fn change_password(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    JsonBody(req): JsonBody<ChangePasswordRequest>,
) -> Result<ApiResponse<()>> {
    app_state
        .accounts
        .change_password(auth.user_id(), &req.current_password, &req.new_password)
        .await?;
    Ok(ApiResponse::message("Password changed successfully"))
}
