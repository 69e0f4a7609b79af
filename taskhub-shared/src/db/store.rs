/// Storage adapter
///
/// This module wraps the SQLite pool behind the small set of primitives every
/// entity operation goes through: `fetch_one`, `fetch_all`, `insert`,
/// `update`, and `delete`. Column and table identifiers come from entity code
/// (they are never taken from request input); all values are bound as
/// parameters.
///
/// Every mutating call executes inside its own transaction: on failure the
/// transaction is rolled back and the error propagates; on success it
/// commits. Nothing holds a transaction across calls.
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::db::store::{SqlParam, Store};
///
/// # async fn example(store: Store) -> Result<(), sqlx::Error> {
/// let id = store
///     .insert(
///         "users",
///         vec![
///             ("username", SqlParam::from("alice")),
///             ("email", SqlParam::from("alice@example.com")),
///             ("password_hash", SqlParam::from("salt$digest")),
///         ],
///     )
///     .await?;
///
/// let row = store
///     .fetch_one("SELECT * FROM users WHERE id = ?", vec![SqlParam::from(id)])
///     .await?;
/// assert!(row.is_some());
/// # Ok(())
/// # }
/// ```
use sqlx::sqlite::{Sqlite, SqliteArguments, SqlitePool, SqliteRow};
use sqlx::query::Query;

/// A value bound into a parameterized query
///
/// Covers the column types the schema uses: TEXT, INTEGER, BOOLEAN (stored
/// as INTEGER), and NULL.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// TEXT value
    Text(String),

    /// INTEGER value
    Int(i64),

    /// BOOLEAN value (stored as 0/1)
    Bool(bool),

    /// NULL
    Null,
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        SqlParam::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        SqlParam::Text(value)
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        SqlParam::Int(value)
    }
}

impl From<bool> for SqlParam {
    fn from(value: bool) -> Self {
        SqlParam::Bool(value)
    }
}

impl From<Option<String>> for SqlParam {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(text) => SqlParam::Text(text),
            None => SqlParam::Null,
        }
    }
}

/// Binds a parameter onto a query
fn bind_param<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    param: &SqlParam,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match param {
        SqlParam::Text(text) => query.bind(text.clone()),
        SqlParam::Int(value) => query.bind(*value),
        SqlParam::Bool(value) => query.bind(*value),
        SqlParam::Null => query.bind(Option::<String>::None),
    }
}

/// The storage adapter mediating all persistence access
///
/// Cheap to clone; the underlying pool is reference-counted. Constructed
/// once in the application's composition root and passed into entity
/// operations.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Wraps a connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Gives direct access to the pool (health checks, schema bootstrap)
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Fetches a single row, or `None` if the query matches nothing
    pub async fn fetch_one(
        &self,
        sql: &str,
        params: Vec<SqlParam>,
    ) -> Result<Option<SqliteRow>, sqlx::Error> {
        let mut query = sqlx::query(sql);
        for param in &params {
            query = bind_param(query, param);
        }
        query.fetch_optional(&self.pool).await
    }

    /// Fetches all matching rows
    pub async fn fetch_all(
        &self,
        sql: &str,
        params: Vec<SqlParam>,
    ) -> Result<Vec<SqliteRow>, sqlx::Error> {
        let mut query = sqlx::query(sql);
        for param in &params {
            query = bind_param(query, param);
        }
        query.fetch_all(&self.pool).await
    }

    /// Inserts a row and returns the generated id
    ///
    /// `fields` maps column names to values. Executes inside a transaction;
    /// a constraint violation rolls back and propagates.
    pub async fn insert(
        &self,
        table: &str,
        fields: Vec<(&str, SqlParam)>,
    ) -> Result<i64, sqlx::Error> {
        let columns: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
        let placeholders: Vec<&str> = fields.iter().map(|_| "?").collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            columns.join(", "),
            placeholders.join(", ")
        );

        let mut tx = self.pool.begin().await?;
        let mut query = sqlx::query(&sql);
        for (_, param) in &fields {
            query = bind_param(query, param);
        }
        let result = query.execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(result.last_insert_rowid())
    }

    /// Updates matching rows and returns the affected count
    ///
    /// `fields` are the SET assignments, `filter` the WHERE equalities
    /// (joined with AND). Executes inside a transaction.
    pub async fn update(
        &self,
        table: &str,
        fields: Vec<(&str, SqlParam)>,
        filter: Vec<(&str, SqlParam)>,
    ) -> Result<u64, sqlx::Error> {
        let set_clause: Vec<String> = fields
            .iter()
            .map(|(name, _)| format!("{} = ?", name))
            .collect();
        let where_clause: Vec<String> = filter
            .iter()
            .map(|(name, _)| format!("{} = ?", name))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {}",
            table,
            set_clause.join(", "),
            where_clause.join(" AND ")
        );

        let mut tx = self.pool.begin().await?;
        let mut query = sqlx::query(&sql);
        for (_, param) in fields.iter().chain(filter.iter()) {
            query = bind_param(query, param);
        }
        let result = query.execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(result.rows_affected())
    }

    /// Deletes matching rows and returns the affected count
    ///
    /// Executes inside a transaction.
    pub async fn delete(
        &self,
        table: &str,
        filter: Vec<(&str, SqlParam)>,
    ) -> Result<u64, sqlx::Error> {
        let where_clause: Vec<String> = filter
            .iter()
            .map(|(name, _)| format!("{} = ?", name))
            .collect();
        let sql = format!("DELETE FROM {} WHERE {}", table, where_clause.join(" AND "));

        let mut tx = self.pool.begin().await?;
        let mut query = sqlx::query(&sql);
        for (_, param) in &filter {
            query = bind_param(query, param);
        }
        let result = query.execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(result.rows_affected())
    }
}
