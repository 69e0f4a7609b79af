/// JSON API routes mirroring the task pages
///
/// Same data, same authorization gate, but failures are HTTP statuses with
/// JSON bodies instead of redirects. Updates are partial: the body may name
/// any subset of the editable fields, and `"due_date": null` clears the
/// deadline while an absent `due_date` leaves it alone.
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use tracing::info;

use taskhub_shared::auth::authorization::require_task_access;
use taskhub_shared::models::dates;
use taskhub_shared::models::task::{Task, TaskFilter, TaskPatch, TaskPriority, TaskStatus};
use taskhub_shared::models::user::User;

use crate::app::AppState;
use crate::error::ApiError;

/// Query parameters for GET /api/tasks
#[derive(Debug, Deserialize, Default)]
pub struct ApiListQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
}

/// Body for PUT /api/task/:id
///
/// Unknown keys are ignored; only these fields can change. The double
/// option on `due_date` distinguishes "absent" from "explicitly null".
#[derive(Debug, Deserialize, Default)]
pub struct UpdateTaskBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn parse_status(raw: &str) -> Result<TaskStatus, ApiError> {
    TaskStatus::parse(raw)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid status: {}", raw)))
}

fn parse_priority(raw: &str) -> Result<TaskPriority, ApiError> {
    TaskPriority::parse(raw)
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid priority: {}", raw)))
}

/// GET /api/tasks
///
/// The requester's tasks (every task for admins) with optional status and
/// priority filters, capped at the configured API page size.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<ApiListQuery>,
) -> Result<Json<Value>, ApiError> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(parse_status)
        .transpose()?;
    let priority = query
        .priority
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(parse_priority)
        .transpose()?;

    let filter = TaskFilter {
        status,
        priority,
        user_id: None,
    };
    let per_page = state.config.pagination.api_max_items;

    let listing = if user.is_admin() {
        Task::list_all(&state.store, filter, 1, per_page).await?
    } else {
        Task::list_for_user(&state.store, user.id, filter, 1, per_page).await?
    };

    let tasks: Vec<_> = listing.items.iter().map(Task::to_view).collect();
    Ok(Json(json!({
        "tasks": tasks,
        "total": listing.total,
    })))
}

/// GET /api/task/:id
pub async fn get_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(task_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let task = require_task_access(&state.store, &user, task_id).await?;
    Ok(Json(json!({ "task": task.to_view() })))
}

/// PUT /api/task/:id
///
/// Partial update of the editable fields.
pub async fn update_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(task_id): Path<i64>,
    Json(body): Json<UpdateTaskBody>,
) -> Result<Json<Value>, ApiError> {
    let task = require_task_access(&state.store, &user, task_id).await?;

    if let Some(title) = &body.title {
        if title.trim().is_empty() {
            return Err(ApiError::BadRequest("Title must not be empty".to_string()));
        }
    }

    let status = body.status.as_deref().map(parse_status).transpose()?;
    let priority = body.priority.as_deref().map(parse_priority).transpose()?;
    let due_date = match body.due_date {
        None => None,
        Some(None) => Some(None),
        Some(Some(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                Some(None)
            } else {
                let date = dates::parse_date(Some(trimmed)).ok_or_else(|| {
                    ApiError::BadRequest(format!("Invalid date format: {}", raw))
                })?;
                Some(Some(date))
            }
        }
    };

    let patch = TaskPatch {
        title: body.title.map(|t| t.trim().to_string()),
        description: body.description,
        status,
        priority,
        due_date,
    };

    let updated = Task::update(&state.store, task.id, patch)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    info!(task_id = task.id, user_id = user.id, "Task updated via API");
    Ok(Json(json!({
        "message": "Task updated",
        "task": updated.to_view(),
    })))
}

/// DELETE /api/task/:id
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(task_id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let task = require_task_access(&state.store, &user, task_id).await?;
    Task::delete(&state.store, task.id).await?;

    info!(task_id = task.id, user_id = user.id, "Task deleted via API");
    Ok(Json(json!({ "message": "Task deleted" })))
}
