use askama::Template;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::auth::extractor::SESSION_COOKIE;
use crate::auth::registration::{self, RegisterError, RegistrationForm};
use crate::auth::reset::INVALID_TOKEN;
use crate::auth::{jwt, session};
use crate::error::AppError;
use crate::routes::auth::FORGOT_PASSWORD_MESSAGE;
use crate::state::SharedState;
use crate::views::render;

#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    error: Option<String>,
    notice: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/register.html")]
struct RegisterTemplate {
    errors: Vec<String>,
    username: String,
    email: String,
}

#[derive(Template)]
#[template(path = "auth/forgot_password.html")]
struct ForgotPasswordTemplate {
    message: Option<String>,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/reset_password.html")]
struct ResetPasswordTemplate {
    token: String,
    error: Option<String>,
}

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate {
    message: String,
}

/// Flags set by redirects back to `/login`. Only their presence matters.
#[derive(Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
    pub locked: Option<String>,
    pub logout: Option<String>,
    pub success: Option<String>,
    pub reset: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct ForgotPasswordForm {
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetQuery {
    pub token: Option<String>,
}

#[derive(Deserialize)]
pub struct ResetPasswordForm {
    #[serde(default)]
    pub token: String,
    #[serde(rename = "newPassword", default)]
    pub new_password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: Option<String>,
}

pub async fn home() -> Redirect {
    Redirect::to("/todos")
}

pub async fn login_page(
    State(state): State<SharedState>,
    jar: CookieJar,
    Query(q): Query<LoginQuery>,
) -> Response {
    // If already logged in, go straight to the board
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if jwt::decode_token(cookie.value(), &state.config.jwt_secret).is_ok() {
            return Redirect::to("/todos").into_response();
        }
    }

    let error = if q.locked.is_some() {
        Some("Too many login attempts. Please try again later.".to_string())
    } else if q.error.is_some() {
        Some("Invalid username or password".to_string())
    } else {
        None
    };

    let notice = if q.logout.is_some() {
        Some("You have been logged out".to_string())
    } else if q.success.is_some() {
        Some("Registration successful. Please log in".to_string())
    } else if q.reset.is_some() {
        Some("Your password has been reset. Please log in".to_string())
    } else {
        None
    };

    render(LoginTemplate { error, notice })
}

pub async fn login(
    State(state): State<SharedState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match session::authenticate(&state, &form.username, &form.password).await {
        Ok(user) => {
            let token = session::issue_token(&state, &user)?;
            let jar = session::session_cookie(&state, &token);
            Ok((jar, Redirect::to("/todos")).into_response())
        }
        Err(AppError::Unauthorized(_)) => Ok(Redirect::to("/login?error").into_response()),
        Err(AppError::RateLimited(_)) => Ok(Redirect::to("/login?locked").into_response()),
        Err(e) => Err(e),
    }
}

pub async fn logout() -> (CookieJar, Redirect) {
    (session::clear_session_cookie(), Redirect::to("/login?logout"))
}

pub async fn register_page() -> Response {
    render(RegisterTemplate {
        errors: Vec::new(),
        username: String::new(),
        email: String::new(),
    })
}

pub async fn register(
    State(state): State<SharedState>,
    Form(form): Form<RegistrationForm>,
) -> Result<Response, AppError> {
    let errors = match registration::register(state.stores.users.as_ref(), &form).await {
        Ok(_) => return Ok(Redirect::to("/login?success").into_response()),
        Err(RegisterError::Invalid(errors)) => errors,
        Err(RegisterError::Duplicate(msg)) => vec![msg],
        Err(RegisterError::Failed(e)) => return Err(e),
    };

    Ok(render(RegisterTemplate {
        errors,
        username: form.username,
        email: form.email,
    }))
}

pub async fn forgot_password_page() -> Response {
    render(ForgotPasswordTemplate {
        message: None,
        error: None,
    })
}

pub async fn forgot_password(
    State(state): State<SharedState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Response {
    let template = match state.resets.initiate(&form.email).await {
        Ok(()) => ForgotPasswordTemplate {
            message: Some(FORGOT_PASSWORD_MESSAGE.to_string()),
            error: None,
        },
        Err(e) => {
            tracing::error!("Password reset initiation failed: {e}");
            ForgotPasswordTemplate {
                message: None,
                error: Some("Error processing request".to_string()),
            }
        }
    };
    render(template)
}

pub async fn reset_password_page(
    State(state): State<SharedState>,
    Query(q): Query<ResetQuery>,
) -> Result<Response, AppError> {
    let token = q.token.unwrap_or_default();
    if !state.resets.validate(&token).await? {
        return Ok(render(ErrorTemplate {
            message: INVALID_TOKEN.to_string(),
        }));
    }

    Ok(render(ResetPasswordTemplate { token, error: None }))
}

pub async fn reset_password(
    State(state): State<SharedState>,
    Form(form): Form<ResetPasswordForm>,
) -> Result<Response, AppError> {
    if form
        .confirm_password
        .as_deref()
        .is_some_and(|confirm| confirm != form.new_password)
    {
        return Ok(render(ResetPasswordTemplate {
            token: form.token,
            error: Some("Passwords do not match".to_string()),
        }));
    }

    match state.resets.reset(&form.token, &form.new_password).await {
        Ok(()) => Ok(Redirect::to("/login?reset").into_response()),
        Err(AppError::BadRequest(msg)) => Ok(render(ResetPasswordTemplate {
            token: form.token,
            error: Some(msg),
        })),
        Err(e) => Err(e),
    }
}
