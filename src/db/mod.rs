pub mod memory;
pub mod todos;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Completion, NewTodo, NewUser, Priority, Todo, User};

pub use memory::MemoryStore;

/// Narrowing applied to a todo listing. Empty filter means everything.
/// Every condition that is set must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    /// Case-sensitive substring of the text.
    pub text: Option<String>,
    pub completed: Option<Completion>,
    pub priority: Option<Priority>,
    /// Exact category name.
    pub category: Option<String>,
    /// Only todos that are overdue as of this date.
    pub overdue_on: Option<NaiveDate>,
    /// Inclusive due date bounds. Todos without a due date never match.
    pub due_from: Option<NaiveDate>,
    pub due_to: Option<NaiveDate>,
}

impl TodoFilter {
    pub fn matches(&self, todo: &Todo) -> bool {
        self.text.as_deref().is_none_or(|s| todo.text.contains(s))
            && self.completed.is_none_or(|c| todo.completed == c)
            && self.priority.is_none_or(|p| todo.priority == p)
            && self.category.as_deref().is_none_or(|c| todo.category == c)
            && self.overdue_on.is_none_or(|today| todo.is_overdue(today))
            && self.due_from.is_none_or(|from| todo.due_date.is_some_and(|d| d >= from))
            && self.due_to.is_none_or(|to| todo.due_date.is_some_and(|d| d <= to))
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, new_user: &NewUser) -> Result<User, AppError>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_user_by_reset_token(&self, token_hash: &str) -> Result<Option<User>, AppError>;
    async fn username_exists(&self, username: &str) -> Result<bool, AppError>;
    async fn email_exists(&self, email: &str) -> Result<bool, AppError>;

    /// Overwrites any reset token already pending for the user.
    async fn set_reset_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Atomically: if a user holds `token_hash` with an expiry after `now`,
    /// store `password_hash` and clear the token. Returns that user's id.
    async fn consume_reset_token(
        &self,
        token_hash: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, AppError>;
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn insert_todo(&self, new_todo: &NewTodo, now: DateTime<Utc>) -> Result<Todo, AppError>;
    async fn find_todo(&self, id: i64) -> Result<Option<Todo>, AppError>;
    async fn list_todos(&self, filter: &TodoFilter) -> Result<Vec<Todo>, AppError>;
    /// Flip the completion flag and bump `updated_at`. `None` if no such todo.
    async fn toggle_todo(&self, id: i64, now: DateTime<Utc>) -> Result<Option<Todo>, AppError>;
    /// Returns whether a row was removed.
    async fn delete_todo(&self, id: i64) -> Result<bool, AppError>;
}

/// The store handles shared by the app. Both usually point at one backend.
#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UserStore>,
    pub todos: Arc<dyn TodoStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        let store = Arc::new(PgStore { pool });
        Self {
            users: store.clone(),
            todos: store,
        }
    }

    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            todos: store,
        }
    }
}

pub struct PgStore {
    pool: PgPool,
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, new_user: &NewUser) -> Result<User, AppError> {
        Ok(users::create(&self.pool, new_user).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(users::find_by_email(&self.pool, email).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(users::find_by_username(&self.pool, username).await?)
    }

    async fn find_user_by_reset_token(&self, token_hash: &str) -> Result<Option<User>, AppError> {
        Ok(users::find_by_reset_token(&self.pool, token_hash).await?)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        Ok(users::exists_by_username(&self.pool, username).await?)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        Ok(users::exists_by_email(&self.pool, email).await?)
    }

    async fn set_reset_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        Ok(users::set_reset_token(&self.pool, user_id, token_hash, expires_at).await?)
    }

    async fn consume_reset_token(
        &self,
        token_hash: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, AppError> {
        Ok(users::consume_reset_token(&self.pool, token_hash, password_hash, now).await?)
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn insert_todo(&self, new_todo: &NewTodo, now: DateTime<Utc>) -> Result<Todo, AppError> {
        Ok(todos::insert(&self.pool, new_todo, now).await?)
    }

    async fn find_todo(&self, id: i64) -> Result<Option<Todo>, AppError> {
        Ok(todos::find_by_id(&self.pool, id).await?)
    }

    async fn list_todos(&self, filter: &TodoFilter) -> Result<Vec<Todo>, AppError> {
        Ok(todos::list(&self.pool, filter).await?)
    }

    async fn toggle_todo(&self, id: i64, now: DateTime<Utc>) -> Result<Option<Todo>, AppError> {
        Ok(todos::toggle(&self.pool, id, now).await?)
    }

    async fn delete_todo(&self, id: i64) -> Result<bool, AppError> {
        Ok(todos::delete(&self.pool, id).await?)
    }
}
