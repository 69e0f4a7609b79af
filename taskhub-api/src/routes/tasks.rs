/// Task pages: list, create, view, edit, delete, profile
///
/// All of these sit behind the page session layer, so handlers receive the
/// authenticated [`User`] from request extensions. Form and filter problems
/// come back as redirects with a notice; only server-side faults surface as
/// error responses.
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Form, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use taskhub_shared::auth::authorization::{require_task_access, AccessError};
use taskhub_shared::models::dates;
use taskhub_shared::models::task::{
    CreateTask, Task, TaskFilter, TaskPatch, TaskPriority, TaskStatus,
};
use taskhub_shared::models::user::User;

use crate::app::AppState;
use crate::error::ApiError;
use crate::routes::redirect_with_notice;

/// Query parameters for task listings
#[derive(Debug, Deserialize, Default)]
pub struct ListQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub page: Option<usize>,
}

/// Task form fields (shared by create and edit)
#[derive(Debug, Deserialize)]
pub struct TaskForm {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
}

/// Builds a filter from the listing query; `Err` is the redirect for an
/// unrecognized status or priority value.
fn filter_from_query(query: &ListQuery, back_to: &str) -> Result<TaskFilter, Response> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            TaskStatus::parse(raw).ok_or_else(|| redirect_with_notice(back_to, "invalid-status"))?,
        ),
        None => None,
    };
    let priority = match query.priority.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            TaskPriority::parse(raw)
                .ok_or_else(|| redirect_with_notice(back_to, "invalid-priority"))?,
        ),
        None => None,
    };

    Ok(TaskFilter {
        status,
        priority,
        user_id: None,
    })
}

/// Parses an optional form date; `Err` is the redirect for garbage input
fn date_from_form(raw: Option<&str>, back_to: &str) -> Result<Option<chrono::NaiveDate>, Response> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => match dates::parse_date(Some(s)) {
            Some(date) => Ok(Some(date)),
            None => Err(redirect_with_notice(back_to, "invalid-date-format")),
        },
    }
}

/// Resolves a task through the owner-or-admin gate; `Err` is the response
/// already decided (redirect or error)
async fn load_task(
    state: &AppState,
    user: &User,
    task_id: i64,
) -> Result<Task, Result<Response, ApiError>> {
    match require_task_access(&state.store, user, task_id).await {
        Ok(task) => Ok(task),
        Err(AccessError::NotFound) => Err(Ok(redirect_with_notice("/tasks", "task-not-found"))),
        Err(AccessError::Denied) => Err(Ok(redirect_with_notice("/tasks", "access-denied"))),
        Err(AccessError::Database(e)) => Err(Err(e.into())),
    }
}

/// GET /tasks
///
/// The task list page: the user's own tasks (every task for admins),
/// filterable by status and priority, paginated.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    let filter = match filter_from_query(&query, "/tasks") {
        Ok(filter) => filter,
        Err(redirect) => return Ok(redirect),
    };
    let page = query.page.unwrap_or(1);
    let per_page = state.config.pagination.per_page;

    let listing = if user.is_admin() {
        Task::list_all(&state.store, filter, page, per_page).await?
    } else {
        Task::list_for_user(&state.store, user.id, filter, page, per_page).await?
    };

    let tasks: Vec<_> = listing.items.iter().map(Task::to_view).collect();
    Ok(Json(json!({
        "tasks": tasks,
        "total": listing.total,
        "page_count": listing.page_count,
        "current_page": listing.current_page,
        "status": query.status,
        "priority": query.priority,
    }))
    .into_response())
}

/// POST /task/new
///
/// Creates a task owned by the requester. Missing title and garbage input
/// redirect back with a notice.
pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Form(form): Form<TaskForm>,
) -> Result<Response, ApiError> {
    let title = form.title.trim();
    if title.is_empty() {
        return Ok(redirect_with_notice("/tasks", "title-required"));
    }

    let status = match form.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => match TaskStatus::parse(raw) {
            Some(status) => status,
            None => return Ok(redirect_with_notice("/tasks", "invalid-status")),
        },
        None => TaskStatus::New,
    };
    let priority = match form.priority.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => match TaskPriority::parse(raw) {
            Some(priority) => priority,
            None => return Ok(redirect_with_notice("/tasks", "invalid-priority")),
        },
        None => TaskPriority::Medium,
    };
    let due_date = match date_from_form(form.due_date.as_deref(), "/tasks") {
        Ok(date) => date,
        Err(redirect) => return Ok(redirect),
    };

    let task = Task::create(
        &state.store,
        CreateTask {
            title: title.to_string(),
            description: form.description.filter(|d| !d.is_empty()),
            status,
            priority,
            due_date,
            user_id: user.id,
        },
    )
    .await?;

    info!(task_id = task.id, user_id = user.id, "Task created");
    Ok(Redirect::to("/tasks").into_response())
}

/// GET /task/:id
///
/// The task detail page, gated on owner-or-admin.
pub async fn view_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(task_id): Path<i64>,
) -> Result<Response, ApiError> {
    let task = match load_task(&state, &user, task_id).await {
        Ok(task) => task,
        Err(decided) => return decided,
    };

    Ok(Json(json!({ "task": task.to_view() })).into_response())
}

/// POST /task/:id/edit
///
/// Replaces the task's editable fields from the form.
pub async fn edit_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(task_id): Path<i64>,
    Form(form): Form<TaskForm>,
) -> Result<Response, ApiError> {
    let task = match load_task(&state, &user, task_id).await {
        Ok(task) => task,
        Err(decided) => return decided,
    };

    let title = form.title.trim();
    if title.is_empty() {
        return Ok(redirect_with_notice("/tasks", "title-required"));
    }

    let status = match form.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => match TaskStatus::parse(raw) {
            Some(status) => status,
            None => return Ok(redirect_with_notice("/tasks", "invalid-status")),
        },
        None => task.status,
    };
    let priority = match form.priority.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => match TaskPriority::parse(raw) {
            Some(priority) => priority,
            None => return Ok(redirect_with_notice("/tasks", "invalid-priority")),
        },
        None => task.priority,
    };
    let due_date = match date_from_form(form.due_date.as_deref(), "/tasks") {
        Ok(date) => date,
        Err(redirect) => return Ok(redirect),
    };

    Task::update(
        &state.store,
        task.id,
        TaskPatch {
            title: Some(title.to_string()),
            description: Some(form.description.unwrap_or_default()),
            status: Some(status),
            priority: Some(priority),
            due_date: Some(due_date),
        },
    )
    .await?;

    info!(task_id = task.id, user_id = user.id, "Task updated");
    Ok(Redirect::to("/tasks").into_response())
}

/// POST /task/:id/delete
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(task_id): Path<i64>,
) -> Result<Response, ApiError> {
    let task = match load_task(&state, &user, task_id).await {
        Ok(task) => task,
        Err(decided) => return decided,
    };

    Task::delete(&state.store, task.id).await?;
    info!(task_id = task.id, user_id = user.id, "Task deleted");
    Ok(Redirect::to("/tasks").into_response())
}

/// GET /profile
///
/// The profile page with account details and task counts. Admins see
/// system-wide totals.
pub async fn profile(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Response, ApiError> {
    let (total_tasks, total_users) = if user.is_admin() {
        (
            Task::count_all(&state.store).await?,
            User::count(&state.store).await?,
        )
    } else {
        (Task::count_for_user(&state.store, user.id).await?, 1)
    };

    Ok(Json(json!({
        "user": user.to_view(),
        "total_tasks": total_tasks,
        "total_users": total_users,
    }))
    .into_response())
}
