/// User model and database operations
///
/// Accounts own their password hashing and verification and are only ever
/// mutated through [`UserPatch`], which enumerates the five mutable fields.
/// `is_admin` and `is_active` are private with read-only accessors; nothing
/// outside the patch path can flip them.
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
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::db::store::Store;
/// use taskhub_shared::models::user::{User, UserPatch};
///
/// # async fn example(store: Store) -> Result<(), sqlx::Error> {
/// let user = User::create(&store, "alice", "alice@example.com", "secret1").await?;
/// assert!(user.verify_password("secret1"));
/// assert!(!user.is_admin());
///
/// User::update(
///     &store,
///     user.id,
///     UserPatch {
///         email: Some("alice@new.example.com".to_string()),
///         ..Default::default()
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::warn;

use crate::auth::password::{check_password, hash_password, PasswordCheck};
use crate::db::store::{SqlParam, Store};
use crate::models::dates;

/// User account
///
/// `is_admin` and `is_active` are deliberately private; use the accessors
/// to read them and [`User::update`] to change them.
#[derive(Debug, Clone)]
pub struct User {
    /// Row id
    pub id: i64,

    /// Unique login name
    pub username: String,

    /// Unique email address
    pub email: String,

    /// Stored as `salt$hex(sha256(password + salt))`
    pub password_hash: String,

    is_admin: bool,

    is_active: bool,

    /// When the account was created (absent if the stored value is unreadable)
    pub created_at: Option<NaiveDateTime>,
}

/// Fields a user update may touch
///
/// `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub is_admin: Option<bool>,
    pub is_active: Option<bool>,
}

impl UserPatch {
    /// True when the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.password_hash.is_none()
            && self.is_admin.is_none()
            && self.is_active.is_none()
    }
}

/// Serialized account representation (no password hash)
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub created_at: Option<String>,
}

const SELECT_COLUMNS: &str =
    "id, username, email, password_hash, is_admin, is_active, created_at";

impl User {
    /// Whether this account is an administrator
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Whether this account may log in
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Checks a plaintext password against the stored hash
    ///
    /// A malformed stored hash is reported as a mismatch; the condition is
    /// logged here because the caller cannot distinguish it.
    pub fn verify_password(&self, password: &str) -> bool {
        match check_password(password, &self.password_hash) {
            PasswordCheck::Match => true,
            PasswordCheck::Mismatch => false,
            PasswordCheck::MalformedHash => {
                warn!(user_id = self.id, "Stored password hash is malformed");
                false
            }
        }
    }

    /// Serialized representation for responses
    pub fn to_view(&self) -> UserView {
        UserView {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            is_admin: self.is_admin,
            is_active: self.is_active,
            created_at: self.created_at.as_ref().map(dates::format_datetime),
        }
    }

    /// Reconstructs a user from a database row
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let created_at: Option<String> = row.try_get("created_at")?;
        Ok(Self {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            is_admin: row.try_get("is_admin")?,
            is_active: row.try_get("is_active")?,
            created_at: dates::parse_datetime(created_at.as_deref()),
        })
    }

    /// Creates a new active, non-admin account
    ///
    /// Hashes the password with a fresh random salt.
    ///
    /// # Errors
    ///
    /// Returns an error if the username or email is already taken (unique
    /// constraint) or the database operation fails.
    pub async fn create(
        store: &Store,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, sqlx::Error> {
        let password_hash = hash_password(password);

        let id = store
            .insert(
                "users",
                vec![
                    ("username", SqlParam::from(username)),
                    ("email", SqlParam::from(email)),
                    ("password_hash", SqlParam::from(password_hash)),
                    ("is_admin", SqlParam::from(false)),
                    ("is_active", SqlParam::from(true)),
                ],
            )
            .await?;

        Self::find_by_id(store, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Finds a user by id
    pub async fn find_by_id(store: &Store, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", SELECT_COLUMNS);
        store
            .fetch_one(&sql, vec![SqlParam::from(id)])
            .await?
            .map(|row| Self::from_row(&row))
            .transpose()
    }

    /// Finds a user by login name
    pub async fn find_by_username(
        store: &Store,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users WHERE username = ?", SELECT_COLUMNS);
        store
            .fetch_one(&sql, vec![SqlParam::from(username)])
            .await?
            .map(|row| Self::from_row(&row))
            .transpose()
    }

    /// Finds a user by email address
    pub async fn find_by_email(store: &Store, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users WHERE email = ?", SELECT_COLUMNS);
        store
            .fetch_one(&sql, vec![SqlParam::from(email)])
            .await?
            .map(|row| Self::from_row(&row))
            .transpose()
    }

    /// Lists every account, ordered by username
    pub async fn list_all(store: &Store) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!("SELECT {} FROM users ORDER BY username", SELECT_COLUMNS);
        store
            .fetch_all(&sql, vec![])
            .await?
            .iter()
            .map(Self::from_row)
            .collect()
    }

    /// Applies a patch and returns the updated user
    ///
    /// An empty patch performs no write. Returns `None` when the user does
    /// not exist.
    pub async fn update(
        store: &Store,
        id: i64,
        patch: UserPatch,
    ) -> Result<Option<Self>, sqlx::Error> {
        if patch.is_empty() {
            return Self::find_by_id(store, id).await;
        }

        let mut fields: Vec<(&str, SqlParam)> = Vec::new();
        if let Some(username) = patch.username {
            fields.push(("username", SqlParam::from(username)));
        }
        if let Some(email) = patch.email {
            fields.push(("email", SqlParam::from(email)));
        }
        if let Some(password_hash) = patch.password_hash {
            fields.push(("password_hash", SqlParam::from(password_hash)));
        }
        if let Some(is_admin) = patch.is_admin {
            fields.push(("is_admin", SqlParam::from(is_admin)));
        }
        if let Some(is_active) = patch.is_active {
            fields.push(("is_active", SqlParam::from(is_active)));
        }

        store
            .update("users", fields, vec![("id", SqlParam::from(id))])
            .await?;

        Self::find_by_id(store, id).await
    }

    /// Re-hashes and persists a new password
    pub async fn change_password(
        store: &Store,
        id: i64,
        new_password: &str,
    ) -> Result<(), sqlx::Error> {
        let patch = UserPatch {
            password_hash: Some(hash_password(new_password)),
            ..Default::default()
        };
        Self::update(store, id, patch).await?;
        Ok(())
    }

    /// Builds an in-memory user for crate-internal tests
    #[cfg(test)]
    pub(crate) fn test_user(id: i64, is_admin: bool) -> Self {
        Self {
            id,
            username: format!("user{}", id),
            email: format!("user{}@example.com", id),
            password_hash: String::new(),
            is_admin,
            is_active: true,
            created_at: None,
        }
    }

    /// Counts all accounts
    pub async fn count(store: &Store) -> Result<i64, sqlx::Error> {
        let row = store
            .fetch_one("SELECT COUNT(*) AS count FROM users", vec![])
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        row.try_get("count")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_patch_default_is_empty() {
        assert!(UserPatch::default().is_empty());

        let patch = UserPatch {
            email: Some("new@example.com".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_verify_password_malformed_hash_is_false() {
        let user = User {
            id: 1,
            username: "u".to_string(),
            email: "u@example.com".to_string(),
            password_hash: "not-a-valid-hash".to_string(),
            is_admin: false,
            is_active: true,
            created_at: None,
        };
        assert!(!user.verify_password("anything"));
    }

    #[test]
    fn test_to_view_omits_password_hash() {
        let user = User {
            id: 1,
            username: "u".to_string(),
            email: "u@example.com".to_string(),
            password_hash: hash_password("pw"),
            is_admin: true,
            is_active: false,
            created_at: dates::parse_datetime(Some("2024-01-02 03:04:05")),
        };

        let view = user.to_view();
        assert_eq!(view.username, "u");
        assert!(view.is_admin);
        assert!(!view.is_active);
        assert_eq!(view.created_at.as_deref(), Some("2024-01-02 03:04:05"));

        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("password_hash").is_none());
    }

    // CRUD behavior against a real database is covered by
    // tests/user_model_tests.rs.
}
