/// Administration pages: user directory and the all-tasks overview
///
/// Both routes sit behind the page session layer and additionally require
/// the administrator flag; a non-admin is bounced back to the task list
/// with a uniform refusal.
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;

use taskhub_shared::models::task::{Task, TaskFilter, TaskPriority, TaskStatus};
use taskhub_shared::models::user::User;

use crate::app::AppState;
use crate::error::ApiError;
use crate::routes::redirect_with_notice;

/// Query parameters for the admin task overview
#[derive(Debug, Deserialize, Default)]
pub struct AdminTaskQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub user_id: Option<i64>,
    pub page: Option<usize>,
}

/// GET /admin/users
///
/// Every account, ordered by username.
pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Response, ApiError> {
    if !user.is_admin() {
        return Ok(redirect_with_notice("/tasks", "access-denied"));
    }

    let users: Vec<_> = User::list_all(&state.store)
        .await?
        .iter()
        .map(User::to_view)
        .collect();

    Ok(Json(json!({ "users": users })).into_response())
}

/// GET /admin/tasks
///
/// All tasks in the system, filterable by status, priority, and owner.
pub async fn list_all_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<AdminTaskQuery>,
) -> Result<Response, ApiError> {
    if !user.is_admin() {
        return Ok(redirect_with_notice("/tasks", "access-denied"));
    }

    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => match TaskStatus::parse(raw) {
            Some(status) => Some(status),
            None => return Ok(redirect_with_notice("/admin/tasks", "invalid-status")),
        },
        None => None,
    };
    let priority = match query.priority.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => match TaskPriority::parse(raw) {
            Some(priority) => Some(priority),
            None => return Ok(redirect_with_notice("/admin/tasks", "invalid-priority")),
        },
        None => None,
    };

    let filter = TaskFilter {
        status,
        priority,
        user_id: query.user_id,
    };
    let page = query.page.unwrap_or(1);
    let per_page = state.config.pagination.admin_per_page;

    let listing = Task::list_all(&state.store, filter, page, per_page).await?;
    let tasks: Vec<_> = listing.items.iter().map(Task::to_view).collect();

    Ok(Json(json!({
        "tasks": tasks,
        "total": listing.total,
        "page_count": listing.page_count,
        "current_page": listing.current_page,
    }))
    .into_response())
}
