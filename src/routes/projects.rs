use crate::{
    auth::{is_creator, AuthenticatedUser},
    error::AppError,
    models::{user::UserId, Project, ProjectInput, ProjectUpdate},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const PROJECT_COLUMNS: &str = "id, name, description, created_at, updated_at, created_by";

/// Retrieves the authenticated user's projects.
///
/// Only projects created by the caller are returned; no pagination.
///
/// ## Responses:
/// - `200 OK`: Returns a JSON array of `Project` objects.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `500 Internal Server Error`: For database errors.
#[get("")]
pub async fn list_projects(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let sql = format!(
        "SELECT {} FROM projects WHERE created_by = $1 ORDER BY created_at DESC",
        PROJECT_COLUMNS
    );
    let projects = sqlx::query_as::<_, Project>(&sql)
        .bind(user.id())
        .fetch_all(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(projects))
}

/// Creates a new project owned by the authenticated user.
///
/// The creator is always the caller: `ProjectInput` carries no creator field,
/// so nothing in the payload can influence ownership.
///
/// ## Responses:
/// - `201 Created`: Returns the stored `Project`, including its generated id.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `422 Unprocessable Entity`: If input validation fails.
/// - `500 Internal Server Error`: If persisting the project fails.
#[post("")]
pub async fn create_project(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    project_data: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    project_data.validate()?;

    let project = Project::new(project_data.into_inner(), user.id());

    let sql = format!(
        "INSERT INTO projects (id, name, description, created_at, updated_at, created_by)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {}",
        PROJECT_COLUMNS
    );
    let stored = sqlx::query_as::<_, Project>(&sql)
        .bind(project.id)
        .bind(project.name)
        .bind(project.description)
        .bind(project.created_at)
        .bind(project.updated_at)
        .bind(project.created_by)
        .fetch_one(&**pool)
        .await?;

    Ok(HttpResponse::Created().json(stored))
}

/// Updates a project's fields.
///
/// Existence is checked before ownership: a missing project answers 404, a
/// project created by someone else answers 403. Fields absent from the
/// payload keep their stored values.
///
/// ## Responses:
/// - `200 OK`: Returns the post-update `Project`.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `403 Forbidden`: If the caller is not the project's creator.
/// - `404 Not Found`: If no project has the given id.
/// - `422 Unprocessable Entity`: If input validation fails.
/// - `500 Internal Server Error`: For database errors.
#[put("/{id}")]
pub async fn update_project(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    project_id: web::Path<Uuid>,
    project_data: web::Json<ProjectUpdate>,
) -> Result<impl Responder, AppError> {
    project_data.validate()?;
    let project_id = project_id.into_inner();

    let created_by = fetch_creator(&pool, project_id).await?;

    if !is_creator(user.id(), created_by) {
        return Err(AppError::Forbidden(
            "Only the project's creator may edit it".into(),
        ));
    }

    let input = project_data.into_inner();
    let sql = format!(
        "UPDATE projects
         SET name = COALESCE($1, name),
             description = COALESCE($2, description),
             updated_at = NOW()
         WHERE id = $3
         RETURNING {}",
        PROJECT_COLUMNS
    );
    let updated = sqlx::query_as::<_, Project>(&sql)
        .bind(input.name)
        .bind(input.description)
        .bind(project_id)
        .fetch_one(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Deletes a project.
///
/// Same existence and ownership checks as update. Tasks referencing the
/// project are left in place; see the schema notes on orphaning.
///
/// ## Responses:
/// - `200 OK`: Confirmation message.
/// - `401 Unauthorized`: If the request lacks a valid authentication token.
/// - `403 Forbidden`: If the caller is not the project's creator.
/// - `404 Not Found`: If no project has the given id.
/// - `500 Internal Server Error`: For database errors.
#[delete("/{id}")]
pub async fn delete_project(
    pool: web::Data<PgPool>,
    user: AuthenticatedUser,
    project_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let project_id = project_id.into_inner();

    let created_by = fetch_creator(&pool, project_id).await?;

    if !is_creator(user.id(), created_by) {
        return Err(AppError::Forbidden(
            "Only the project's creator may delete it".into(),
        ));
    }

    sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(project_id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "project deleted" })))
}

/// Resolves the recorded creator of a project, or `NotFound`.
async fn fetch_creator(pool: &PgPool, project_id: Uuid) -> Result<UserId, AppError> {
    let record: Option<(UserId,)> =
        sqlx::query_as("SELECT created_by FROM projects WHERE id = $1")
            .bind(project_id)
            .fetch_optional(pool)
            .await?;

    match record {
        Some((created_by,)) => Ok(created_by),
        None => Err(AppError::NotFound("Project not found".into())),
    }
}
