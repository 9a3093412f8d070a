pub mod auth;
pub mod todos;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        // Auth
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/validate-reset-token", get(auth::validate_reset_token))
        .route("/api/auth/reset-password", post(auth::reset_password))
        // Todos
        .route("/api/todos", get(todos::list))
        .route("/api/todos/notifications", get(todos::notifications))
        .route("/api/todos/{id}", get(todos::get))
}
