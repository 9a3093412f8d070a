use axum::extract::{Path, Query, State};
use axum::Json;

use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::models::Todo;
use crate::state::SharedState;
use crate::tasks::{ListParams, NotificationSummary};

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Todo>>, AppError> {
    Ok(Json(state.tasks.list(&params).await?))
}

pub async fn get(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<Todo>, AppError> {
    Ok(Json(state.tasks.get(id).await?))
}

pub async fn notifications(
    _auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<NotificationSummary>, AppError> {
    Ok(Json(state.tasks.notification_summary().await?))
}
