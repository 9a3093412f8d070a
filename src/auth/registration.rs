use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::auth::password;
use crate::db::UserStore;
use crate::error::AppError;
use crate::models::{NewUser, User};

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.\-]{3,50}$").unwrap());
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug)]
pub enum RegisterError {
    /// Field-level problems, one message each.
    Invalid(Vec<String>),
    /// Username or email already belongs to an account.
    Duplicate(String),
    Failed(AppError),
}

impl From<AppError> for RegisterError {
    fn from(err: AppError) -> Self {
        match err {
            // Lost a race with a concurrent registration of the same name.
            AppError::Conflict(_) => {
                RegisterError::Duplicate("Username or email is already registered".to_string())
            }
            other => RegisterError::Failed(other),
        }
    }
}

pub fn validate(form: &RegistrationForm) -> Vec<String> {
    let mut errors = Vec::new();

    if !USERNAME_RE.is_match(form.username.trim()) {
        errors.push(
            "Username must be 3-50 characters of letters, digits, '_', '.' or '-'".to_string(),
        );
    }
    if !EMAIL_RE.is_match(form.email.trim()) {
        errors.push("Please enter a valid email address".to_string());
    }
    if let Err(msg) = password::check_strength(&form.password) {
        errors.push(msg);
    }

    errors
}

pub async fn register(users: &dyn UserStore, form: &RegistrationForm) -> Result<User, RegisterError> {
    let errors = validate(form);
    if !errors.is_empty() {
        return Err(RegisterError::Invalid(errors));
    }

    let username = form.username.trim();
    let email = form.email.trim();

    if users.username_exists(username).await? {
        return Err(RegisterError::Duplicate("Username is already taken".to_string()));
    }
    if users.email_exists(email).await? {
        return Err(RegisterError::Duplicate("Email is already registered".to_string()));
    }

    let password_hash = password::hash(&form.password).map_err(AppError::Internal)?;
    let user = users
        .create_user(&NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
        })
        .await?;

    tracing::info!("Registered user {} ({})", user.username, user.id);
    Ok(user)
}
