use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::extractor::AuthUser;
use crate::db::{TodoFilter, TodoStore};
use crate::error::AppError;
use crate::models::{Completion, NewTodo, Priority, Todo};

#[derive(Debug, Clone, Serialize)]
pub struct NotificationSummary {
    pub pending_count: usize,
    pub overdue_todos: Vec<Todo>,
}

/// Raw listing parameters as they arrive in a query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub overdue: Option<String>,
    #[serde(rename = "dueFrom")]
    pub due_from: Option<String>,
    #[serde(rename = "dueTo")]
    pub due_to: Option<String>,
}

/// Turn raw listing parameters into a store filter.
///
/// Empty values are no filter, and so is "all" for status, priority and
/// category. Status must be "Yes"/"No", priority one of High/Medium/Low,
/// `overdue` "true"/"on"/"false", dates `YYYY-MM-DD`. The overdue filter is
/// relative to `today`.
pub fn resolve_filter(params: &ListParams, today: NaiveDate) -> Result<TodoFilter, AppError> {
    let text = given(&params.search).map(str::to_string);

    let completed = match given(&params.status).filter(|s| *s != "all") {
        None => None,
        Some(other) => Some(Completion::parse(other).ok_or_else(|| {
            AppError::BadRequest(format!("Unknown status filter '{other}'"))
        })?),
    };

    let priority = match given(&params.priority).filter(|p| *p != "all") {
        None => None,
        Some(other) => Some(Priority::parse(other).ok_or_else(|| {
            AppError::BadRequest(format!("Unknown priority filter '{other}'"))
        })?),
    };

    let category = given(&params.category)
        .filter(|c| *c != "all")
        .map(str::to_string);

    let overdue_on = match given(&params.overdue) {
        None | Some("false") => None,
        Some("true") | Some("on") => Some(today),
        Some(other) => {
            return Err(AppError::BadRequest(format!(
                "Unknown overdue filter '{other}'"
            )));
        }
    };

    Ok(TodoFilter {
        text,
        completed,
        priority,
        category,
        overdue_on,
        due_from: parse_date(&params.due_from)?,
        due_to: parse_date(&params.due_to)?,
    })
}

fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_date(value: &Option<String>) -> Result<Option<NaiveDate>, AppError> {
    given(value)
        .map(|d| {
            NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map_err(|_| AppError::BadRequest(format!("Invalid date filter '{d}'")))
        })
        .transpose()
}

pub struct TaskService {
    todos: Arc<dyn TodoStore>,
}

impl TaskService {
    pub fn new(todos: Arc<dyn TodoStore>) -> Self {
        Self { todos }
    }

    /// Listing in store order. No sort is applied here.
    pub async fn list(&self, params: &ListParams) -> Result<Vec<Todo>, AppError> {
        self.list_at(params, Local::now().date_naive()).await
    }

    pub async fn list_at(&self, params: &ListParams, today: NaiveDate) -> Result<Vec<Todo>, AppError> {
        let filter = resolve_filter(params, today)?;
        self.todos.list_todos(&filter).await
    }

    pub async fn get(&self, id: i64) -> Result<Todo, AppError> {
        self.todos
            .find_todo(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Todo not found".to_string()))
    }

    /// Summary over every todo, regardless of any filter on the page.
    pub async fn notification_summary(&self) -> Result<NotificationSummary, AppError> {
        self.notification_summary_at(Local::now().date_naive()).await
    }

    pub async fn notification_summary_at(&self, today: NaiveDate) -> Result<NotificationSummary, AppError> {
        let all = self.todos.list_todos(&TodoFilter::default()).await?;

        let pending_count = all
            .iter()
            .filter(|t| t.completed == Completion::Pending)
            .count();
        let overdue_todos = all.into_iter().filter(|t| t.is_overdue(today)).collect();

        Ok(NotificationSummary {
            pending_count,
            overdue_todos,
        })
    }

    pub async fn create(&self, actor: &AuthUser, new_todo: NewTodo) -> Result<Todo, AppError> {
        if new_todo.text.trim().is_empty() {
            return Err(AppError::BadRequest("Todo text is required".to_string()));
        }

        let todo = self.todos.insert_todo(&new_todo, Utc::now()).await?;
        tracing::info!(user_id = %actor.user_id, "{} created todo {}", actor.username, todo.id);
        Ok(todo)
    }

    pub async fn toggle(&self, actor: &AuthUser, id: i64) -> Result<Todo, AppError> {
        let todo = self
            .todos
            .toggle_todo(id, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound("Todo not found".to_string()))?;

        tracing::info!(
            user_id = %actor.user_id,
            "{} marked todo {} as {}",
            actor.username,
            todo.id,
            todo.completed.as_str()
        );
        Ok(todo)
    }

    /// Deleting an id that does not exist is not an error.
    pub async fn delete(&self, actor: &AuthUser, id: i64) -> Result<(), AppError> {
        if self.todos.delete_todo(id).await? {
            tracing::info!(user_id = %actor.user_id, "{} deleted todo {id}", actor.username);
        } else {
            tracing::debug!(
                user_id = %actor.user_id,
                "{} tried to delete missing todo {id}",
                actor.username
            );
        }
        Ok(())
    }
}
