/// Database layer for TaskHub
///
/// This module mediates all persistence access:
///
/// - `pool`: SQLite connection pool construction and health checks
/// - `store`: the storage adapter — parameterized fetch/insert/update/delete
///   primitives every entity operation goes through
/// - `schema`: idempotent table creation and bootstrap admin seeding
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskhub_shared::db::schema;
/// use taskhub_shared::db::store::Store;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let store = Store::new(pool);
/// schema::init(&store, &schema::BootstrapAdmin::default()).await?;
/// # Ok(())
/// # }
/// ```
pub mod pool;
pub mod schema;
pub mod store;
