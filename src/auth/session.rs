use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;

use crate::auth::extractor::SESSION_COOKIE;
use crate::auth::jwt::{encode_token, Claims};
use crate::auth::password;
use crate::error::AppError;
use crate::models::User;
use crate::state::AppState;

/// Check a username/password pair, counting failures against the login
/// limiter.
pub async fn authenticate(state: &AppState, username: &str, pw: &str) -> Result<User, AppError> {
    if let Err(retry_after) = state.login_limiter.check(username) {
        let minutes = retry_after.div_ceil(60).max(1);
        return Err(AppError::RateLimited(format!(
            "Too many login attempts. Try again in {minutes} minute(s)."
        )));
    }

    let Some(user) = state.stores.users.find_user_by_username(username).await? else {
        state.login_limiter.record_failure(username);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    };

    let valid = password::verify(pw, &user.password_hash).map_err(AppError::Internal)?;
    if !valid {
        state.login_limiter.record_failure(username);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    state.login_limiter.clear(username);
    tracing::info!("User {} logged in", user.id);
    Ok(user)
}

pub fn issue_token(state: &AppState, user: &User) -> Result<String, AppError> {
    let claims = Claims::new(user.id, user.username.clone(), state.config.session_hours);
    encode_token(&claims, &state.config.jwt_secret).map_err(AppError::Internal)
}

pub fn session_cookie(state: &AppState, token: &str) -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .secure(state.config.secure_cookies())
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(state.config.session_hours))
        .build();

    CookieJar::new().add(cookie)
}

pub fn clear_session_cookie() -> CookieJar {
    let cookie = Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .max_age(time::Duration::ZERO)
        .build();
    CookieJar::new().add(cookie)
}
