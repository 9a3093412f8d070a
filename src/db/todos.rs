use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::db::TodoFilter;
use crate::models::{NewTodo, Todo};

pub async fn insert(pool: &PgPool, new_todo: &NewTodo, now: DateTime<Utc>) -> Result<Todo, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        "INSERT INTO todos (text, completed, priority, category, due_date, notes, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $7) RETURNING *",
    )
    .bind(&new_todo.text)
    .bind(new_todo.completed.is_done())
    .bind(new_todo.priority_or_default().as_str())
    .bind(new_todo.category_or_default())
    .bind(new_todo.due_date)
    .bind(new_todo.notes.as_deref())
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>("SELECT * FROM todos WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// No ORDER BY: rows come back in whatever order the table scan yields.
/// `strpos` keeps the text match case-sensitive and free of LIKE wildcards.
/// Must agree with `TodoFilter::matches`.
pub async fn list(pool: &PgPool, filter: &TodoFilter) -> Result<Vec<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        "SELECT * FROM todos
         WHERE ($1::text IS NULL OR strpos(text, $1) > 0)
           AND ($2::boolean IS NULL OR completed = $2)
           AND ($3::text IS NULL OR priority = $3)
           AND ($4::text IS NULL OR category = $4)
           AND ($5::date IS NULL OR (NOT completed AND due_date < $5))
           AND ($6::date IS NULL OR due_date >= $6)
           AND ($7::date IS NULL OR due_date <= $7)",
    )
    .bind(filter.text.as_deref())
    .bind(filter.completed.map(|c| c.is_done()))
    .bind(filter.priority.map(|p| p.as_str()))
    .bind(filter.category.as_deref())
    .bind(filter.overdue_on)
    .bind(filter.due_from)
    .bind(filter.due_to)
    .fetch_all(pool)
    .await
}

pub async fn toggle(pool: &PgPool, id: i64, now: DateTime<Utc>) -> Result<Option<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        "UPDATE todos SET completed = NOT completed, updated_at = $2
         WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(now)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM todos WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
