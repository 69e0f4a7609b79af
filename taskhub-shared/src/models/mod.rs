/// Database entities for TaskHub
///
/// # Models
///
/// - `user`: accounts, password verification, profile updates
/// - `task`: work items with filtered, paginated retrieval
/// - `dates`: the lenient parse / canonical format rules both entities use
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::db::store::Store;
/// use taskhub_shared::models::user::User;
///
/// # async fn example(store: Store) -> Result<(), sqlx::Error> {
/// let user = User::create(&store, "alice", "alice@example.com", "secret1").await?;
/// assert!(user.verify_password("secret1"));
/// # Ok(())
/// # }
/// ```
pub mod dates;
pub mod task;
pub mod user;
