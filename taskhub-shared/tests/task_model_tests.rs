/// Integration tests for the Task model and the access gate
///
/// These run against an in-memory SQLite database with the real schema.
use chrono::NaiveDate;

use taskhub_shared::auth::authorization::{require_task_access, AccessError};
use taskhub_shared::db::pool::{create_pool, DatabaseConfig};
use taskhub_shared::db::schema::{self, BootstrapAdmin};
use taskhub_shared::db::store::{SqlParam, Store};
use taskhub_shared::models::task::{
    CreateTask, Task, TaskFilter, TaskPatch, TaskPriority, TaskStatus,
};
use taskhub_shared::models::user::User;

async fn test_store() -> Store {
    let pool = create_pool(DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        create_if_missing: false,
    })
    .await
    .expect("pool should connect");

    let store = Store::new(pool);
    schema::init(&store, &BootstrapAdmin::default())
        .await
        .expect("schema init should succeed");
    store
}

async fn make_user(store: &Store, name: &str) -> User {
    User::create(store, name, &format!("{}@x.com", name), "secret1")
        .await
        .expect("user creation should succeed")
}

fn new_task(title: &str, user_id: i64) -> CreateTask {
    CreateTask {
        title: title.to_string(),
        description: None,
        status: TaskStatus::New,
        priority: TaskPriority::Medium,
        due_date: None,
        user_id,
    }
}

#[tokio::test]
async fn test_create_and_find_task() {
    let store = test_store().await;
    let user = make_user(&store, "alice").await;

    let task = Task::create(
        &store,
        CreateTask {
            title: "Buy milk".to_string(),
            description: Some("2 liters".to_string()),
            status: TaskStatus::New,
            priority: TaskPriority::Low,
            due_date: NaiveDate::from_ymd_opt(2024, 3, 15),
            user_id: user.id,
        },
    )
    .await
    .unwrap();

    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.description, "2 liters");
    assert_eq!(task.status, TaskStatus::New);
    assert_eq!(task.priority, TaskPriority::Low);
    assert_eq!(task.user_id, user.id);
    assert!(task.created_at.is_some());
    assert!(task.updated_at.is_some());

    let found = Task::find_by_id(&store, task.id).await.unwrap().unwrap();
    assert_eq!(found.title, "Buy milk");

    assert!(Task::find_by_id(&store, 9999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_null_description_reads_as_empty_string() {
    let store = test_store().await;
    let user = make_user(&store, "alice").await;

    let task = Task::create(&store, new_task("no description", user.id))
        .await
        .unwrap();
    assert_eq!(task.description, "");
}

#[tokio::test]
async fn test_due_date_roundtrip() {
    let store = test_store().await;
    let user = make_user(&store, "alice").await;

    let task = Task::create(
        &store,
        CreateTask {
            due_date: NaiveDate::from_ymd_opt(2024, 3, 15),
            ..new_task("dated", user.id)
        },
    )
    .await
    .unwrap();

    let view = task.to_view();
    assert_eq!(view.due_date.as_deref(), Some("2024-03-15"));
}

#[tokio::test]
async fn test_unparseable_due_date_reads_as_absent() {
    let store = test_store().await;
    let user = make_user(&store, "alice").await;
    let task = Task::create(&store, new_task("garbled", user.id))
        .await
        .unwrap();

    store
        .update(
            "tasks",
            vec![("due_date", SqlParam::from("next tuesday"))],
            vec![("id", SqlParam::from(task.id))],
        )
        .await
        .unwrap();

    let reloaded = Task::find_by_id(&store, task.id).await.unwrap().unwrap();
    assert!(reloaded.due_date.is_none());
}

#[tokio::test]
async fn test_fractional_timestamp_reads() {
    let store = test_store().await;
    let user = make_user(&store, "alice").await;
    let task = Task::create(&store, new_task("fractional", user.id))
        .await
        .unwrap();

    store
        .update(
            "tasks",
            vec![("created_at", SqlParam::from("2024-03-15 10:30:00.123456"))],
            vec![("id", SqlParam::from(task.id))],
        )
        .await
        .unwrap();

    let reloaded = Task::find_by_id(&store, task.id).await.unwrap().unwrap();
    let view = reloaded.to_view();
    assert_eq!(view.created_at.as_deref(), Some("2024-03-15 10:30:00"));
}

#[tokio::test]
async fn test_update_stamps_updated_at() {
    let store = test_store().await;
    let user = make_user(&store, "alice").await;
    let task = Task::create(&store, new_task("stampme", user.id))
        .await
        .unwrap();
    let original_updated_at = task.updated_at;

    // Timestamps have second resolution
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let updated = Task::update(
        &store,
        task.id,
        TaskPatch {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.status, TaskStatus::Completed);
    assert_ne!(updated.updated_at, original_updated_at);
}

#[tokio::test]
async fn test_empty_patch_is_a_noop() {
    let store = test_store().await;
    let user = make_user(&store, "alice").await;
    let task = Task::create(&store, new_task("untouched", user.id))
        .await
        .unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let unchanged = Task::update(&store, task.id, TaskPatch::default())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged.updated_at, task.updated_at);
}

#[tokio::test]
async fn test_patch_clears_due_date() {
    let store = test_store().await;
    let user = make_user(&store, "alice").await;
    let task = Task::create(
        &store,
        CreateTask {
            due_date: NaiveDate::from_ymd_opt(2024, 3, 15),
            ..new_task("clearable", user.id)
        },
    )
    .await
    .unwrap();
    assert!(task.due_date.is_some());

    let cleared = Task::update(
        &store,
        task.id,
        TaskPatch {
            due_date: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(cleared.due_date.is_none());
}

#[tokio::test]
async fn test_delete_task() {
    let store = test_store().await;
    let user = make_user(&store, "alice").await;
    let task = Task::create(&store, new_task("doomed", user.id))
        .await
        .unwrap();

    assert!(Task::delete(&store, task.id).await.unwrap());
    assert!(Task::find_by_id(&store, task.id).await.unwrap().is_none());
    assert!(!Task::delete(&store, task.id).await.unwrap());
}

#[tokio::test]
async fn test_pagination_25_items_9_per_page() {
    let store = test_store().await;
    let user = make_user(&store, "alice").await;
    for i in 1..=25 {
        Task::create(&store, new_task(&format!("task {}", i), user.id))
            .await
            .unwrap();
    }

    let page1 = Task::list_for_user(&store, user.id, TaskFilter::default(), 1, 9)
        .await
        .unwrap();
    assert_eq!(page1.items.len(), 9);
    assert_eq!(page1.total, 25);
    assert_eq!(page1.page_count, 3);
    assert_eq!(page1.current_page, 1);
    // Newest first
    assert_eq!(page1.items[0].title, "task 25");

    let page3 = Task::list_for_user(&store, user.id, TaskFilter::default(), 3, 9)
        .await
        .unwrap();
    assert_eq!(page3.items.len(), 7);
    assert_eq!(page3.items.last().unwrap().title, "task 1");
}

#[tokio::test]
async fn test_list_filters() {
    let store = test_store().await;
    let alice = make_user(&store, "alice").await;
    let bob = make_user(&store, "bob").await;

    Task::create(
        &store,
        CreateTask {
            status: TaskStatus::Completed,
            priority: TaskPriority::High,
            ..new_task("done high", alice.id)
        },
    )
    .await
    .unwrap();
    Task::create(
        &store,
        CreateTask {
            status: TaskStatus::New,
            priority: TaskPriority::High,
            ..new_task("new high", alice.id)
        },
    )
    .await
    .unwrap();
    Task::create(&store, new_task("bobs", bob.id)).await.unwrap();

    // Status filter, scoped to alice
    let completed = Task::list_for_user(
        &store,
        alice.id,
        TaskFilter {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        },
        1,
        9,
    )
    .await
    .unwrap();
    assert_eq!(completed.total, 1);
    assert_eq!(completed.items[0].title, "done high");

    // Priority filter
    let high = Task::list_for_user(
        &store,
        alice.id,
        TaskFilter {
            priority: Some(TaskPriority::High),
            ..Default::default()
        },
        1,
        9,
    )
    .await
    .unwrap();
    assert_eq!(high.total, 2);

    // Admin scope sees everyone
    let all = Task::list_all(&store, TaskFilter::default(), 1, 9)
        .await
        .unwrap();
    assert_eq!(all.total, 3);

    // Admin scope with owner filter
    let bobs = Task::list_all(
        &store,
        TaskFilter {
            user_id: Some(bob.id),
            ..Default::default()
        },
        1,
        9,
    )
    .await
    .unwrap();
    assert_eq!(bobs.total, 1);
    assert_eq!(bobs.items[0].title, "bobs");
}

#[tokio::test]
async fn test_counts() {
    let store = test_store().await;
    let alice = make_user(&store, "alice").await;
    let bob = make_user(&store, "bob").await;
    Task::create(&store, new_task("a1", alice.id)).await.unwrap();
    Task::create(&store, new_task("a2", alice.id)).await.unwrap();
    Task::create(&store, new_task("b1", bob.id)).await.unwrap();

    assert_eq!(Task::count_for_user(&store, alice.id).await.unwrap(), 2);
    assert_eq!(Task::count_for_user(&store, bob.id).await.unwrap(), 1);
    assert_eq!(Task::count_all(&store).await.unwrap(), 3);
}

#[tokio::test]
async fn test_deleting_user_cascades_to_tasks() {
    let store = test_store().await;
    let alice = make_user(&store, "alice").await;
    Task::create(&store, new_task("orphan-to-be", alice.id))
        .await
        .unwrap();

    store
        .delete("users", vec![("id", SqlParam::from(alice.id))])
        .await
        .unwrap();

    assert_eq!(Task::count_all(&store).await.unwrap(), 0);
}

#[tokio::test]
async fn test_access_gate_distinguishes_missing_and_denied() {
    let store = test_store().await;
    let alice = make_user(&store, "alice").await;
    let bob = make_user(&store, "bob").await;
    let admin = User::find_by_username(&store, "admin")
        .await
        .unwrap()
        .unwrap();

    let task = Task::create(&store, new_task("private", alice.id))
        .await
        .unwrap();

    // Owner passes
    let resolved = require_task_access(&store, &alice, task.id).await.unwrap();
    assert_eq!(resolved.id, task.id);

    // Admin passes
    assert!(require_task_access(&store, &admin, task.id).await.is_ok());

    // Another non-admin is denied, not told "missing"
    let denied = require_task_access(&store, &bob, task.id).await;
    assert!(matches!(denied, Err(AccessError::Denied)));

    // Truly missing task is not-found for everyone
    let missing = require_task_access(&store, &bob, 9999).await;
    assert!(matches!(missing, Err(AccessError::NotFound)));
}
