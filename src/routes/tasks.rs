use crate::{
    auth::AuthenticatedUserId,
    error::TaskError,
    models::{CreateTask, TaskFilter, UpdateTask},
    services,
};
use actix_web::{delete, get, post, route, web, HttpResponse, Responder};
use sqlx::PgPool;

/// Retrieves the authenticated user's tasks, newest first.
///
/// ## Query Parameters:
/// - `completed` (optional): filters by exact completion state ("true"/"false").
/// - `priority` (optional): filters by exact priority ("low", "medium", "high").
///
/// ## Responses:
/// - `200 OK`: a JSON array of tasks.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `500 Internal Server Error`: store failure.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<PgPool>,
    filter: web::Query<TaskFilter>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, TaskError> {
    let tasks = services::task::get_tasks(&pool, user_id.0, &filter).await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: required; non-empty, must not start with a digit.
/// - `description` (optional).
/// - `dueDate` (optional): must not be before the current calendar day.
/// - `priority` (optional): "low", "medium" or "high"; anything else is
///   stored as null.
///
/// ## Responses:
/// - `201 Created`: the created task.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `422 Unprocessable Entity`: bad title or past due date.
/// - `500 Internal Server Error`: store failure.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    task_data: web::Json<CreateTask>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, TaskError> {
    let task = services::task::create_task(&pool, user_id.0, &task_data).await?;

    Ok(HttpResponse::Created().json(task))
}

/// Retrieves a single task by id.
///
/// ## Responses:
/// - `200 OK`: the task, if it exists and is owned by the caller.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `404 Not Found`: no such task under this owner.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, TaskError> {
    let task = services::task::get_task_by_id(&pool, user_id.0, task_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task owned by the authenticated user.
///
/// Present fields are validated with the same rules as creation and written;
/// absent fields are left unchanged. Accepts both PUT and PATCH.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `404 Not Found`: no such task under this owner.
/// - `422 Unprocessable Entity`: bad title or past due date.
#[route("/{id}", method = "PUT", method = "PATCH")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
    task_data: web::Json<UpdateTask>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, TaskError> {
    let task =
        services::task::update_task(&pool, user_id.0, task_id.into_inner(), &task_data).await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task owned by the authenticated user.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `401 Unauthorized`: missing or invalid bearer token.
/// - `404 Not Found`: no such task under this owner.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i32>,
    user_id: AuthenticatedUserId,
) -> Result<impl Responder, TaskError> {
    services::task::delete_task(&pool, user_id.0, task_id.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}
