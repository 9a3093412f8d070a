use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// SHA-256 digest of the outstanding reset token, if any.
    #[serde(skip_serializing)]
    pub reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token_expiry: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Where a user sits in the password reset lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetState {
    NoPendingReset,
    Pending,
    Expired,
}

impl User {
    pub fn reset_state(&self, now: DateTime<Utc>) -> ResetState {
        match (&self.reset_token, self.reset_token_expiry) {
            (Some(_), Some(expiry)) if expiry > now => ResetState::Pending,
            (Some(_), Some(_)) => ResetState::Expired,
            _ => ResetState::NoPendingReset,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
