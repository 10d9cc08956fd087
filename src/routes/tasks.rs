use crate::{
    auth::{is_creator, AuthenticatedUser},
    error::AppError,
    models::{user::UserId, Task, TaskInput, TaskQuery, TaskUpdate},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const TASK_COLUMNS: &str =
    "id, title, description, status, project_id, created_at, updated_at, created_by";

/// Lists the caller's tasks under one project.
///
/// The `project` query parameter is required. Filtering is by creator first,
/// then project: a task created by another user under the same project is
/// never visible to the caller.
#[get("")]
pub async fn list_tasks(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    query_params: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let sql = format!(
        "SELECT {} FROM tasks WHERE created_by = $1 AND project_id = $2 ORDER BY created_at DESC",
        TASK_COLUMNS
    );
    let tasks = sqlx::query_as::<_, Task>(&sql)
        .bind(user.id())
        .bind(query_params.project)
        .fetch_all(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a new task owned by the authenticated user.
///
/// Status defaults to `todo` when the payload leaves it unset. The creator is
/// always the caller.
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let task = Task::new(task_data.into_inner(), user.id());

    let sql = format!(
        "INSERT INTO tasks (id, title, description, status, project_id, created_at, updated_at, created_by)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING {}",
        TASK_COLUMNS
    );
    let stored = sqlx::query_as::<_, Task>(&sql)
        .bind(task.id)
        .bind(task.title)
        .bind(task.description)
        .bind(task.status)
        .bind(task.project_id)
        .bind(task.created_at)
        .bind(task.updated_at)
        .bind(task.created_by)
        .fetch_one(&**pool)
        .await?;

    Ok(HttpResponse::Created().json(stored))
}

/// Updates a task.
///
/// Existence is checked before ownership (404 then 403). `title` and
/// `description` merge partially; the required `status` always overwrites the
/// stored state, whatever the rest of the payload carries.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let task_id = task_id.into_inner();

    let created_by = fetch_creator(&pool, task_id).await?;

    if !is_creator(user.id(), created_by) {
        return Err(AppError::Forbidden(
            "Only the task's creator may edit it".into(),
        ));
    }

    let input = task_data.into_inner();
    let sql = format!(
        "UPDATE tasks
         SET title = COALESCE($1, title),
             description = COALESCE($2, description),
             status = $3,
             updated_at = NOW()
         WHERE id = $4
         RETURNING {}",
        TASK_COLUMNS
    );
    let updated = sqlx::query_as::<_, Task>(&sql)
        .bind(input.title)
        .bind(input.description)
        .bind(input.status)
        .bind(task_id)
        .fetch_one(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a task. Same existence/ownership pattern as update.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task_id = task_id.into_inner();

    let created_by = fetch_creator(&pool, task_id).await?;

    if !is_creator(user.id(), created_by) {
        return Err(AppError::Forbidden(
            "Only the task's creator may delete it".into(),
        ));
    }

    sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(task_id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "task deleted" })))
}

/// Resolves the recorded creator of a task, or `NotFound`.
async fn fetch_creator(pool: &PgPool, task_id: Uuid) -> Result<UserId, AppError> {
    let record: Option<(UserId,)> = sqlx::query_as("SELECT created_by FROM tasks WHERE id = $1")
        .bind(task_id)
        .fetch_optional(pool)
        .await?;

    match record {
        Some((created_by,)) => Ok(created_by),
        None => Err(AppError::NotFound("Task not found".into())),
    }
}
