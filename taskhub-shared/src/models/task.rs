/// Task model and database operations
///
/// Tasks are the work items users track. Each task belongs to exactly one
/// user; deleting a user cascades to their tasks.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     title TEXT NOT NULL,
///     description TEXT,
///     status TEXT NOT NULL DEFAULT 'new',
///     priority TEXT NOT NULL DEFAULT 'medium',
///     due_date TEXT,
///     created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
///     updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
///     user_id INTEGER NOT NULL,
///     FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
/// );
/// ```
///
/// # Pagination
///
/// Listing fetches the full filtered set ordered by creation time
/// descending, then slices the requested page in memory. `page_count` is
/// `ceil(total / per_page)`. This mirrors the behavior the rest of the
/// system was built around; do not swap it for LIMIT/OFFSET without
/// revisiting the ordering guarantees.
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::db::store::Store;
/// use taskhub_shared::models::task::{CreateTask, Task, TaskFilter, TaskPriority, TaskStatus};
///
/// # async fn example(store: Store, user_id: i64) -> Result<(), sqlx::Error> {
/// let task = Task::create(&store, CreateTask {
///     title: "Buy milk".to_string(),
///     description: None,
///     status: TaskStatus::New,
///     priority: TaskPriority::Low,
///     due_date: None,
///     user_id,
/// }).await?;
///
/// let page = Task::list_for_user(&store, user_id, TaskFilter::default(), 1, 9).await?;
/// assert_eq!(page.total, 1);
/// assert_eq!(page.items[0].id, task.id);
/// # Ok(())
/// # }
/// ```
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::db::store::{SqlParam, Store};
use crate::models::dates;

/// Task workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    New,

    /// Being worked on
    InProgress,

    /// Done
    Completed,
}

impl TaskStatus {
    /// String form used in the database and over the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::New => "new",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Parses the wire/database form
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "new" => Some(TaskStatus::New),
            "in_progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    /// String form used in the database and over the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    /// Parses the wire/database form
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            _ => None,
        }
    }
}

/// Task entity
#[derive(Debug, Clone)]
pub struct Task {
    /// Row id
    pub id: i64,

    /// Short summary
    pub title: String,

    /// Free-form body; a NULL column reads as the empty string
    pub description: String,

    /// Workflow state
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional deadline
    pub due_date: Option<NaiveDate>,

    /// Creation timestamp (absent if the stored value is unreadable)
    pub created_at: Option<NaiveDateTime>,

    /// Last-modification timestamp, refreshed on every update
    pub updated_at: Option<NaiveDateTime>,

    /// Owning user
    pub user_id: i64,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub user_id: i64,
}

/// Fields a task update may touch
///
/// `None` leaves a field unchanged; `due_date: Some(None)` clears the
/// deadline. Any non-empty patch also stamps `updated_at`.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskPatch {
    /// True when the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

/// Exact-match filters for task listings
///
/// Absent filters match everything. `user_id` is only honored by
/// [`Task::list_all`]; per-user listing always scopes to its owner.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub user_id: Option<i64>,
}

/// One page of a task listing
#[derive(Debug, Clone)]
pub struct TaskPage {
    /// Tasks on this page, newest first
    pub items: Vec<Task>,

    /// Size of the full filtered set
    pub total: usize,

    /// `ceil(total / per_page)`
    pub page_count: usize,

    /// The requested page (1-based)
    pub current_page: usize,
}

/// Serialized task representation
///
/// Dates are canonical strings: `YYYY-MM-DD` for `due_date`,
/// `YYYY-MM-DD HH:MM:SS` for the timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskView {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub user_id: i64,
}

impl Task {
    /// Serialized representation for responses
    pub fn to_view(&self) -> TaskView {
        TaskView {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            priority: self.priority,
            due_date: self.due_date.as_ref().map(dates::format_date),
            created_at: self.created_at.as_ref().map(dates::format_datetime),
            updated_at: self.updated_at.as_ref().map(dates::format_datetime),
            user_id: self.user_id,
        }
    }

    /// Reconstructs a task from a database row
    ///
    /// Unrecognized status/priority values fall back to the schema
    /// defaults; unparseable dates read as absent.
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let description: Option<String> = row.try_get("description")?;
        let status: String = row.try_get("status")?;
        let priority: String = row.try_get("priority")?;
        let due_date: Option<String> = row.try_get("due_date")?;
        let created_at: Option<String> = row.try_get("created_at")?;
        let updated_at: Option<String> = row.try_get("updated_at")?;

        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: description.unwrap_or_default(),
            status: TaskStatus::parse(&status).unwrap_or(TaskStatus::New),
            priority: TaskPriority::parse(&priority).unwrap_or(TaskPriority::Medium),
            due_date: dates::parse_date(due_date.as_deref()),
            created_at: dates::parse_datetime(created_at.as_deref()),
            updated_at: dates::parse_datetime(updated_at.as_deref()),
            user_id: row.try_get("user_id")?,
        })
    }

    /// Creates a task and returns it
    pub async fn create(store: &Store, data: CreateTask) -> Result<Self, sqlx::Error> {
        let due_date = data.due_date.as_ref().map(dates::format_date);

        let id = store
            .insert(
                "tasks",
                vec![
                    ("title", SqlParam::from(data.title)),
                    ("description", SqlParam::from(data.description)),
                    ("status", SqlParam::from(data.status.as_str())),
                    ("priority", SqlParam::from(data.priority.as_str())),
                    ("due_date", SqlParam::from(due_date)),
                    ("user_id", SqlParam::from(data.user_id)),
                ],
            )
            .await?;

        Self::find_by_id(store, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Finds a task by id
    pub async fn find_by_id(store: &Store, id: i64) -> Result<Option<Self>, sqlx::Error> {
        store
            .fetch_one("SELECT * FROM tasks WHERE id = ?", vec![SqlParam::from(id)])
            .await?
            .map(|row| Self::from_row(&row))
            .transpose()
    }

    /// Applies a patch and returns the updated task
    ///
    /// Any non-empty patch stamps `updated_at` with the current time. An
    /// empty patch performs no write. Returns `None` when the task does not
    /// exist.
    pub async fn update(
        store: &Store,
        id: i64,
        patch: TaskPatch,
    ) -> Result<Option<Self>, sqlx::Error> {
        if patch.is_empty() {
            return Self::find_by_id(store, id).await;
        }

        let mut fields: Vec<(&str, SqlParam)> = Vec::new();
        if let Some(title) = patch.title {
            fields.push(("title", SqlParam::from(title)));
        }
        if let Some(description) = patch.description {
            fields.push(("description", SqlParam::from(description)));
        }
        if let Some(status) = patch.status {
            fields.push(("status", SqlParam::from(status.as_str())));
        }
        if let Some(priority) = patch.priority {
            fields.push(("priority", SqlParam::from(priority.as_str())));
        }
        if let Some(due_date) = patch.due_date {
            fields.push((
                "due_date",
                SqlParam::from(due_date.as_ref().map(dates::format_date)),
            ));
        }
        fields.push((
            "updated_at",
            SqlParam::from(dates::format_datetime(&dates::now())),
        ));

        store
            .update("tasks", fields, vec![("id", SqlParam::from(id))])
            .await?;

        Self::find_by_id(store, id).await
    }

    /// Deletes a task; returns whether a row was removed
    pub async fn delete(store: &Store, id: i64) -> Result<bool, sqlx::Error> {
        let affected = store
            .delete("tasks", vec![("id", SqlParam::from(id))])
            .await?;
        Ok(affected > 0)
    }

    /// Lists one user's tasks with filters and pagination
    ///
    /// The filter's `user_id` field is ignored here; the listing is always
    /// scoped to `user_id`.
    pub async fn list_for_user(
        store: &Store,
        user_id: i64,
        filter: TaskFilter,
        page: usize,
        per_page: usize,
    ) -> Result<TaskPage, sqlx::Error> {
        let scoped = TaskFilter {
            user_id: Some(user_id),
            ..filter
        };
        Self::list_filtered(store, scoped, page, per_page).await
    }

    /// Lists tasks across all users (admin scope)
    pub async fn list_all(
        store: &Store,
        filter: TaskFilter,
        page: usize,
        per_page: usize,
    ) -> Result<TaskPage, sqlx::Error> {
        Self::list_filtered(store, filter, page, per_page).await
    }

    async fn list_filtered(
        store: &Store,
        filter: TaskFilter,
        page: usize,
        per_page: usize,
    ) -> Result<TaskPage, sqlx::Error> {
        let mut sql = String::from("SELECT * FROM tasks");
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<SqlParam> = Vec::new();

        if let Some(user_id) = filter.user_id {
            clauses.push("user_id = ?");
            params.push(SqlParam::from(user_id));
        }
        if let Some(status) = filter.status {
            clauses.push("status = ?");
            params.push(SqlParam::from(status.as_str()));
        }
        if let Some(priority) = filter.priority {
            clauses.push("priority = ?");
            params.push(SqlParam::from(priority.as_str()));
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let rows = store.fetch_all(&sql, params).await?;
        let tasks: Vec<Task> = rows
            .iter()
            .map(Self::from_row)
            .collect::<Result<_, _>>()?;

        Ok(paginate(tasks, page, per_page))
    }

    /// Counts one user's tasks
    pub async fn count_for_user(store: &Store, user_id: i64) -> Result<i64, sqlx::Error> {
        let row = store
            .fetch_one(
                "SELECT COUNT(*) AS count FROM tasks WHERE user_id = ?",
                vec![SqlParam::from(user_id)],
            )
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        row.try_get("count")
    }

    /// Counts all tasks
    pub async fn count_all(store: &Store) -> Result<i64, sqlx::Error> {
        let row = store
            .fetch_one("SELECT COUNT(*) AS count FROM tasks", vec![])
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        row.try_get("count")
    }
}

/// Slices a full result set into one page
///
/// Pages are 1-based; a page number past the end yields an empty page with
/// the correct totals.
fn paginate(all: Vec<Task>, page: usize, per_page: usize) -> TaskPage {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total = all.len();
    let page_count = (total + per_page - 1) / per_page;

    let start = (page - 1).saturating_mul(per_page).min(total);
    let end = start.saturating_add(per_page).min(total);
    let items = all[start..end].to_vec();

    TaskPage {
        items,
        total,
        page_count,
        current_page: page,
    }
}
