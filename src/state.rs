use std::sync::Arc;

use crate::auth::reset::ResetFlow;
use crate::config::Config;
use crate::db::Stores;
use crate::rate_limit::LoginRateLimiter;
use crate::tasks::TaskService;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: Config,
    pub stores: Stores,
    pub resets: ResetFlow,
    pub tasks: TaskService,
    pub login_limiter: LoginRateLimiter,
}
