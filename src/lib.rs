pub mod config;
pub mod error;
pub mod state;
pub mod auth;
pub mod db;
pub mod models;
pub mod middleware;
pub mod routes;
pub mod views;
pub mod email;
pub mod rate_limit;
pub mod tasks;

use std::sync::{Arc, Weak};
use std::time::Duration;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::auth::reset::ResetFlow;
use crate::config::Config;
use crate::db::Stores;
use crate::email::Mailer;
use crate::middleware::auth_redirect::redirect_unauthorized;
use crate::rate_limit::LoginRateLimiter;
use crate::state::{AppState, SharedState};
use crate::tasks::TaskService;

pub fn build_app(stores: Stores, mailer: Arc<dyn Mailer>, config: Config) -> Router {
    let resets = ResetFlow::new(
        stores.users.clone(),
        mailer,
        config.base_url.clone(),
        chrono::Duration::minutes(config.reset_token_minutes),
    );
    let tasks = TaskService::new(stores.todos.clone());

    let state: SharedState = Arc::new(AppState {
        config,
        stores,
        resets,
        tasks,
        login_limiter: LoginRateLimiter::new(),
    });
    spawn_limiter_cleanup(Arc::downgrade(&state));

    Router::new()
        .merge(routes::api_routes())
        .merge(views::view_routes().layer(axum::middleware::from_fn(redirect_unauthorized)))
        .nest_service("/static", ServeDir::new("static"))
        .route("/health", axum::routing::get(health))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

/// Forget closed login windows once a minute. Stops when the app is dropped.
fn spawn_limiter_cleanup(state: Weak<AppState>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(60));
        loop {
            ticker.tick().await;
            let Some(state) = state.upgrade() else {
                break;
            };
            state.login_limiter.cleanup();
        }
    });
}

async fn health() -> &'static str {
    "ok"
}
