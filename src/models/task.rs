use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::user::UserId;

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
///
/// Any status may replace any other; there is no enforced transition graph.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task is yet to be started.
    Todo,
    /// Task is currently being worked on.
    InProgress,
    /// Task is completed.
    Done,
}

/// A task as stored in the database and returned by the API.
///
/// `project_id` is a plain reference into the project space; it does not tie
/// the task's lifecycle to the project's. `created_by` is immutable after
/// creation.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub project_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: UserId,
}

/// Input payload for creating a task. Status defaults to `todo` when unset;
/// the creator comes from the authenticated caller, never from the payload.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub project_id: Uuid,

    pub status: Option<TaskStatus>,
}

/// Update payload. `title` and `description` merge partially; `status` is
/// required and overwrites the stored state unconditionally.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub status: TaskStatus,
}

/// Query parameters for listing tasks. The project filter is mandatory:
/// listings are always scoped to one project of the caller's.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskQuery {
    pub project: Uuid,
}

impl Task {
    /// Builds a new task from input, stamping the caller as creator.
    pub fn new(input: TaskInput, created_by: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: input.status.unwrap_or(TaskStatus::Todo),
            project_id: input.project_id,
            created_at: now,
            updated_at: now,
            created_by,
        }
    }
}
