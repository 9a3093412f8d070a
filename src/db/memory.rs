use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::db::{TodoFilter, TodoStore, UserStore};
use crate::error::AppError;
use crate::models::{NewTodo, NewUser, Todo, User};

/// Process-local store. Used when no database is configured and by tests.
/// Every operation runs under a single lock, so check-and-set sequences are
/// atomic.
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
    todos: Mutex<TodoTable>,
}

#[derive(Default)]
struct TodoTable {
    next_id: i64,
    // Ids only ever grow, so key order is insertion order.
    rows: BTreeMap<i64, Todo>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            todos: Mutex::new(TodoTable::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, AppError> {
    mutex
        .lock()
        .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))
}

fn find_user<F>(users: &Mutex<Vec<User>>, pred: F) -> Result<Option<User>, AppError>
where
    F: Fn(&User) -> bool,
{
    Ok(lock(users)?.iter().find(|u| pred(u)).cloned())
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new_user: &NewUser) -> Result<User, AppError> {
        let mut users = lock(&self.users)?;
        if users
            .iter()
            .any(|u| u.username == new_user.username || u.email == new_user.email)
        {
            return Err(AppError::Conflict("Record already exists".to_string()));
        }

        let user = User {
            id: Uuid::now_v7(),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            password_hash: new_user.password_hash.clone(),
            reset_token: None,
            reset_token_expiry: None,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        find_user(&self.users, |u| u.email == email)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        find_user(&self.users, |u| u.username == username)
    }

    async fn find_user_by_reset_token(&self, token_hash: &str) -> Result<Option<User>, AppError> {
        find_user(&self.users, |u| u.reset_token.as_deref() == Some(token_hash))
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        Ok(find_user(&self.users, |u| u.username == username)?.is_some())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        Ok(find_user(&self.users, |u| u.email == email)?.is_some())
    }

    async fn set_reset_token(
        &self,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let mut users = lock(&self.users)?;
        if let Some(user) = users.iter_mut().find(|u| u.id == user_id) {
            user.reset_token = Some(token_hash.to_string());
            user.reset_token_expiry = Some(expires_at);
        }
        Ok(())
    }

    async fn consume_reset_token(
        &self,
        token_hash: &str,
        password_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Uuid>, AppError> {
        let mut users = lock(&self.users)?;
        let Some(user) = users.iter_mut().find(|u| {
            u.reset_token.as_deref() == Some(token_hash)
                && u.reset_token_expiry.is_some_and(|expiry| expiry > now)
        }) else {
            return Ok(None);
        };

        user.password_hash = password_hash.to_string();
        user.reset_token = None;
        user.reset_token_expiry = None;
        Ok(Some(user.id))
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn insert_todo(&self, new_todo: &NewTodo, now: DateTime<Utc>) -> Result<Todo, AppError> {
        let mut table = lock(&self.todos)?;
        table.next_id += 1;
        let todo = Todo {
            id: table.next_id,
            text: new_todo.text.clone(),
            completed: new_todo.completed,
            priority: new_todo.priority_or_default(),
            category: new_todo.category_or_default().to_string(),
            due_date: new_todo.due_date,
            notes: new_todo.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn find_todo(&self, id: i64) -> Result<Option<Todo>, AppError> {
        Ok(lock(&self.todos)?.rows.get(&id).cloned())
    }

    async fn list_todos(&self, filter: &TodoFilter) -> Result<Vec<Todo>, AppError> {
        let table = lock(&self.todos)?;
        Ok(table
            .rows
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect())
    }

    async fn toggle_todo(&self, id: i64, now: DateTime<Utc>) -> Result<Option<Todo>, AppError> {
        let mut table = lock(&self.todos)?;
        let Some(todo) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        todo.completed = todo.completed.toggled();
        todo.updated_at = now;
        Ok(Some(todo.clone()))
    }

    async fn delete_todo(&self, id: i64) -> Result<bool, AppError> {
        Ok(lock(&self.todos)?.rows.remove(&id).is_some())
    }
}
