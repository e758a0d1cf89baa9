//!
//! # Task Service
//!
//! Task CRUD with per-owner scoping. Every statement carries the owner's id
//! alongside the task id, so "missing" and "not owned" are one outcome:
//! `TaskError::NotFound`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::TaskError;
use crate::models::{CreateTask, Task, TaskFilter, TaskPriority, UpdateTask};

const TASK_COLUMNS: &str =
    "id, title, description, completed, due_date, priority, user_id, created_at, updated_at";

fn is_valid_title(title: &str) -> bool {
    !title.is_empty()
        && !title
            .chars()
            .next()
            .map_or(false, |c| c.is_ascii_digit())
}

/// A due date may be today or later; only the calendar day counts, the
/// time of day is ignored.
fn validate_due_date(due_date: &DateTime<Utc>) -> Result<(), TaskError> {
    if due_date.date_naive() < Utc::now().date_naive() {
        return Err(TaskError::Validation(
            "Due date cannot be in the past".into(),
        ));
    }
    Ok(())
}

/// Creates a task owned by `user_id`.
///
/// The title must be present, non-empty, and must not start with a digit.
/// A due date before today is rejected. A priority outside the accepted set
/// is stored as NULL rather than rejected.
pub async fn create_task(
    pool: &PgPool,
    user_id: i32,
    input: &CreateTask,
) -> Result<Task, TaskError> {
    let title = input
        .title
        .as_deref()
        .filter(|t| is_valid_title(t))
        .ok_or(TaskError::InvalidTitle)?;

    if let Some(due_date) = &input.due_date {
        validate_due_date(due_date)?;
    }

    let priority = input.priority.as_deref().and_then(TaskPriority::parse);

    let task = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (title, description, due_date, priority, user_id) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(title)
    .bind(&input.description)
    .bind(input.due_date)
    .bind(priority)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(task)
}

/// Lists tasks owned by `user_id`, newest first, optionally filtered by
/// exact completion state and/or exact priority.
#[allow(unused_assignments)]
pub async fn get_tasks(
    pool: &PgPool,
    user_id: i32,
    filter: &TaskFilter,
) -> Result<Vec<Task>, TaskError> {
    let mut sql = format!("SELECT {} FROM tasks WHERE user_id = $1", TASK_COLUMNS);
    let mut param_count = 2;

    if filter.completed.is_some() {
        sql.push_str(&format!(" AND completed = ${}", param_count));
        param_count += 1;
    }
    if filter.priority.is_some() {
        sql.push_str(&format!(" AND priority = ${}", param_count));
        param_count += 1;
    }

    sql.push_str(" ORDER BY created_at DESC");

    let mut query = sqlx::query_as::<_, Task>(&sql).bind(user_id);

    if let Some(completed) = filter.completed {
        query = query.bind(completed);
    }
    if let Some(priority) = filter.priority {
        query = query.bind(priority);
    }

    let tasks = query.fetch_all(pool).await?;

    Ok(tasks)
}

/// Fetches a single task by id, scoped to its owner.
pub async fn get_task_by_id(pool: &PgPool, user_id: i32, id: i32) -> Result<Task, TaskError> {
    sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks WHERE id = $1 AND user_id = $2",
        TASK_COLUMNS
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or(TaskError::NotFound)
}

/// Applies a partial update to a task owned by `user_id`.
///
/// Only fields present in the input are validated and written; absent fields
/// are left unchanged. A present priority is normalized the same way as on
/// create. The update is a single statement scoped to id + owner; zero rows
/// updated means the task is missing or not owned.
pub async fn update_task(
    pool: &PgPool,
    user_id: i32,
    id: i32,
    changes: &UpdateTask,
) -> Result<Task, TaskError> {
    if let Some(title) = changes.title.as_deref() {
        if !is_valid_title(title) {
            return Err(TaskError::InvalidTitle);
        }
    }

    if let Some(due_date) = &changes.due_date {
        validate_due_date(due_date)?;
    }

    // Outer Some means the field was present; the inner Option is the
    // normalized value to store (None for an unrecognized priority).
    let priority = changes.priority.as_deref().map(TaskPriority::parse);

    let mut sql = String::from("UPDATE tasks SET updated_at = NOW()");
    let mut param_count = 1;

    if changes.title.is_some() {
        sql.push_str(&format!(", title = ${}", param_count));
        param_count += 1;
    }
    if changes.description.is_some() {
        sql.push_str(&format!(", description = ${}", param_count));
        param_count += 1;
    }
    if changes.completed.is_some() {
        sql.push_str(&format!(", completed = ${}", param_count));
        param_count += 1;
    }
    if changes.due_date.is_some() {
        sql.push_str(&format!(", due_date = ${}", param_count));
        param_count += 1;
    }
    if priority.is_some() {
        sql.push_str(&format!(", priority = ${}", param_count));
        param_count += 1;
    }

    sql.push_str(&format!(
        " WHERE id = ${} AND user_id = ${} RETURNING {}",
        param_count,
        param_count + 1,
        TASK_COLUMNS
    ));

    let mut query = sqlx::query_as::<_, Task>(&sql);

    if let Some(title) = &changes.title {
        query = query.bind(title);
    }
    if let Some(description) = &changes.description {
        query = query.bind(description);
    }
    if let Some(completed) = changes.completed {
        query = query.bind(completed);
    }
    if let Some(due_date) = changes.due_date {
        query = query.bind(due_date);
    }
    if let Some(priority) = priority {
        query = query.bind(priority);
    }

    query
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(TaskError::NotFound)
}

/// Deletes a task owned by `user_id`. Zero rows affected means the task is
/// missing or not owned.
pub async fn delete_task(pool: &PgPool, user_id: i32, id: i32) -> Result<(), TaskError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(TaskError::NotFound);
    }

    Ok(())
}
