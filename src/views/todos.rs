use askama::Template;
use axum::extract::{Path, Query, State};
use axum::response::{Redirect, Response};
use axum::Form;
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::error::AppError;
use crate::models::{Completion, NewTodo, Priority, Todo};
use crate::state::SharedState;
use crate::tasks::ListParams;
use crate::views::render;

#[derive(Template)]
#[template(path = "todos/index.html")]
struct TodosTemplate {
    username: String,
    todos: Vec<TodoRow>,
    current_search: String,
    current_status: String,
    current_priority: String,
    current_category: String,
    overdue_only: bool,
    due_from: String,
    due_to: String,
    pending_count: usize,
    overdue: Vec<TodoRow>,
    success: bool,
}

struct TodoRow {
    id: i64,
    text: String,
    status: &'static str,
    done: bool,
    priority: &'static str,
    category: String,
    due_date: String,
    notes: String,
    overdue: bool,
}

impl TodoRow {
    fn new(todo: &Todo, today: NaiveDate) -> Self {
        Self {
            id: todo.id,
            text: todo.text.clone(),
            status: todo.completed.as_str(),
            done: todo.completed.is_done(),
            priority: todo.priority.as_str(),
            category: todo.category.clone(),
            due_date: todo
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            notes: todo.notes.clone().unwrap_or_default(),
            overdue: todo.is_overdue(today),
        }
    }
}

/// Flash flag set by the redirect after a change.
#[derive(Deserialize)]
pub struct Flash {
    pub success: Option<String>,
}

/// Fields of the "new todo" form, named as the page submits them.
#[derive(Debug, Deserialize)]
pub struct TodoForm {
    #[serde(rename = "todoItem")]
    pub todo_item: String,
    pub status: String,
    pub priority: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "dueDate")]
    pub due_date: Option<String>,
    pub notes: Option<String>,
}

impl TodoForm {
    /// Empty optional fields count as not supplied.
    pub fn into_new_todo(self) -> Result<NewTodo, AppError> {
        let completed = Completion::parse(&self.status)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown status '{}'", self.status)))?;

        let priority = match non_empty(self.priority) {
            Some(p) => Some(
                Priority::parse(&p)
                    .ok_or_else(|| AppError::BadRequest(format!("Unknown priority '{p}'")))?,
            ),
            None => None,
        };

        let due_date = match non_empty(self.due_date) {
            Some(d) => Some(
                NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                    .map_err(|_| AppError::BadRequest(format!("Invalid due date '{d}'")))?,
            ),
            None => None,
        };

        Ok(NewTodo {
            text: self.todo_item,
            completed,
            priority,
            category: non_empty(self.category),
            due_date,
            notes: non_empty(self.notes),
        })
    }
}

fn or_all(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "all".to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub async fn index(
    auth: AuthUser,
    State(state): State<SharedState>,
    Query(params): Query<ListParams>,
    Query(flash): Query<Flash>,
) -> Result<Response, AppError> {
    let today = Local::now().date_naive();
    let todos = state.tasks.list_at(&params, today).await?;
    let summary = state.tasks.notification_summary_at(today).await?;

    let template = TodosTemplate {
        username: auth.username,
        todos: todos.iter().map(|t| TodoRow::new(t, today)).collect(),
        current_search: params.search.unwrap_or_default(),
        current_status: or_all(params.status),
        current_priority: or_all(params.priority),
        current_category: params
            .category
            .filter(|c| c != "all")
            .unwrap_or_default(),
        overdue_only: params.overdue.is_some_and(|o| o == "true" || o == "on"),
        due_from: params.due_from.unwrap_or_default(),
        due_to: params.due_to.unwrap_or_default(),
        pending_count: summary.pending_count,
        overdue: summary
            .overdue_todos
            .iter()
            .map(|t| TodoRow::new(t, today))
            .collect(),
        success: flash.success.is_some(),
    };
    Ok(render(template))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Form(form): Form<TodoForm>,
) -> Result<Redirect, AppError> {
    let new_todo = form.into_new_todo()?;
    state.tasks.create(&auth, new_todo).await?;
    Ok(Redirect::to("/todos?success"))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    state.tasks.delete(&auth, id).await?;
    Ok(Redirect::to("/todos?success"))
}

pub async fn toggle(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Redirect, AppError> {
    state.tasks.toggle(&auth, id).await?;
    Ok(Redirect::to("/todos?success"))
}
