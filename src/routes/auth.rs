use axum::extract::{Query, State};
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::auth::session;
use crate::error::AppError;
use crate::state::SharedState;

pub const FORGOT_PASSWORD_MESSAGE: &str = "If the email exists, a reset link has been sent";

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct ForgotPasswordQuery {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ValidateTokenQuery {
    pub token: Option<String>,
}

#[derive(Deserialize)]
pub struct ResetPasswordQuery {
    pub token: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub access_token: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct ValidResponse {
    pub valid: bool,
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>), AppError> {
    let user = session::authenticate(&state, &req.username, &req.password).await?;
    let access_token = session::issue_token(&state, &user)?;

    let jar = session::session_cookie(&state, &access_token);
    Ok((jar, Json(AuthResponse { access_token })))
}

pub async fn forgot_password(
    State(state): State<SharedState>,
    Query(q): Query<ForgotPasswordQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    // Same answer whether or not the address is registered
    if let Err(e) = state.resets.initiate(&q.email).await {
        tracing::error!("Password reset initiation failed: {e}");
        return Err(AppError::BadRequest("Error processing request".to_string()));
    }

    Ok(Json(MessageResponse {
        message: FORGOT_PASSWORD_MESSAGE.to_string(),
    }))
}

pub async fn validate_reset_token(
    State(state): State<SharedState>,
    Query(q): Query<ValidateTokenQuery>,
) -> Result<Json<ValidResponse>, AppError> {
    let token = q.token.unwrap_or_default();
    let valid = state.resets.validate(&token).await?;
    Ok(Json(ValidResponse { valid }))
}

pub async fn reset_password(
    State(state): State<SharedState>,
    Query(q): Query<ResetPasswordQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    state.resets.reset(&q.token, &q.new_password).await?;

    Ok(Json(MessageResponse {
        message: "Password reset successfully".to_string(),
    }))
}
