use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

use crate::auth::password;
use crate::db::UserStore;
use crate::email::templates::{self, PASSWORD_RESET_SUBJECT};
use crate::email::Mailer;
use crate::error::AppError;
use crate::models::ResetState;

pub const RESET_PAGE_PATH: &str = "/reset-password";
pub const INVALID_TOKEN: &str = "Invalid or expired reset token";

/// Issues, checks and redeems single-use password reset tokens.
///
/// Only the SHA-256 digest of a token is stored. The raw token exists in the
/// e-mailed link and nowhere else.
pub struct ResetFlow {
    users: Arc<dyn UserStore>,
    mailer: Arc<dyn Mailer>,
    base_url: String,
    ttl: Duration,
}

impl ResetFlow {
    pub fn new(
        users: Arc<dyn UserStore>,
        mailer: Arc<dyn Mailer>,
        base_url: impl Into<String>,
        ttl: Duration,
    ) -> Self {
        Self {
            users,
            mailer,
            base_url: base_url.into(),
            ttl,
        }
    }

    /// Start a reset for `email` (surrounding whitespace ignored). Succeeds
    /// without doing anything when no account uses that address, so callers
    /// cannot tell which addresses are registered.
    pub async fn initiate(&self, email: &str) -> Result<(), AppError> {
        let email = email.trim();
        if email.is_empty() {
            return Ok(());
        }

        let Some(user) = self.users.find_user_by_email(email).await? else {
            tracing::debug!("Password reset requested for unknown address");
            return Ok(());
        };

        let token = generate_token();
        let expires_at = Utc::now() + self.ttl;
        self.users
            .set_reset_token(user.id, &hash_token(&token), expires_at)
            .await?;

        let reset_url = format!("{}{RESET_PAGE_PATH}?token={token}", self.base_url);
        let body = templates::render_password_reset(&reset_url, self.ttl.num_minutes());
        self.mailer
            .send(&user.email, PASSWORD_RESET_SUBJECT, &body)
            .await
            .map_err(AppError::Internal)?;

        tracing::info!("Password reset issued for user {}", user.id);
        Ok(())
    }

    pub async fn validate(&self, token: &str) -> Result<bool, AppError> {
        self.validate_at(token, Utc::now()).await
    }

    pub async fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<bool, AppError> {
        if token.is_empty() {
            return Ok(false);
        }

        let user = self.users.find_user_by_reset_token(&hash_token(token)).await?;
        Ok(user.is_some_and(|u| u.reset_state(now) == ResetState::Pending))
    }

    pub async fn reset(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        self.reset_at(token, new_password, Utc::now()).await
    }

    /// Validation and consumption happen in one conditional store update, so
    /// of two racing resets on the same token exactly one wins.
    pub async fn reset_at(
        &self,
        token: &str,
        new_password: &str,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        password::check_strength(new_password).map_err(AppError::BadRequest)?;

        if token.is_empty() {
            return Err(AppError::BadRequest(INVALID_TOKEN.to_string()));
        }

        let pw_hash = password::hash(new_password).map_err(AppError::Internal)?;

        match self
            .users
            .consume_reset_token(&hash_token(token), &pw_hash, now)
            .await?
        {
            Some(user_id) => {
                tracing::info!("Password reset completed for user {user_id}");
                Ok(())
            }
            None => Err(AppError::BadRequest(INVALID_TOKEN.to_string())),
        }
    }
}

fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
