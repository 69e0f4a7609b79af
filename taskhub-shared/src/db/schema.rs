/// Schema bootstrap
///
/// Creates the two tables and their indexes idempotently (`CREATE ... IF NOT
/// EXISTS`) and seeds the bootstrap administrator when no admin row exists.
/// Running it against an already-initialized database is a no-op apart from
/// the admin check.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     username TEXT NOT NULL UNIQUE,
///     email TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     is_admin INTEGER NOT NULL DEFAULT 0,
///     is_active INTEGER NOT NULL DEFAULT 1,
///     created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
/// );
///
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
use sqlx::Row;
use tracing::info;

use crate::auth::password::hash_password;
use crate::db::store::{SqlParam, Store};

/// Credentials for the seeded administrator account
///
/// Defaults match the original deployment; override them through the
/// server configuration for anything beyond local development.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Default for BootstrapAdmin {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password: "admin123".to_string(),
        }
    }
}

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    is_admin INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

const CREATE_TASKS: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'new',
    priority TEXT NOT NULL DEFAULT 'medium',
    due_date TEXT,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    user_id INTEGER NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE
)
"#;

const CREATE_INDEXES: [&str; 3] = [
    "CREATE INDEX IF NOT EXISTS idx_tasks_user_id ON tasks(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_priority ON tasks(priority)",
];

/// Creates tables and indexes, then seeds the admin if needed
///
/// # Errors
///
/// Returns an error if any DDL statement or the seeding insert fails.
pub async fn init(store: &Store, admin: &BootstrapAdmin) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_USERS).execute(store.pool()).await?;
    sqlx::query(CREATE_TASKS).execute(store.pool()).await?;
    for statement in CREATE_INDEXES {
        sqlx::query(statement).execute(store.pool()).await?;
    }

    seed_admin(store, admin).await?;

    Ok(())
}

/// Seeds the bootstrap administrator when no admin row exists
///
/// The check-then-insert is intentionally not atomic; schema bootstrap runs
/// once at startup before the server accepts requests.
pub async fn seed_admin(store: &Store, admin: &BootstrapAdmin) -> Result<(), sqlx::Error> {
    let row = store
        .fetch_one(
            "SELECT COUNT(*) AS count FROM users WHERE is_admin = 1",
            vec![],
        )
        .await?;

    let admin_count: i64 = match row {
        Some(row) => row.try_get("count")?,
        None => 0,
    };

    if admin_count == 0 {
        let password_hash = hash_password(&admin.password);
        store
            .insert(
                "users",
                vec![
                    ("username", SqlParam::from(admin.username.as_str())),
                    ("email", SqlParam::from(admin.email.as_str())),
                    ("password_hash", SqlParam::from(password_hash)),
                    ("is_admin", SqlParam::from(true)),
                    ("is_active", SqlParam::from(true)),
                ],
            )
            .await?;

        info!(username = %admin.username, "Seeded bootstrap administrator");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_admin_default() {
        let admin = BootstrapAdmin::default();
        assert_eq!(admin.username, "admin");
        assert_eq!(admin.email, "admin@example.com");
        assert_eq!(admin.password, "admin123");
    }

    // Idempotency and seeding behavior are covered by the integration
    // tests in tests/.
}
