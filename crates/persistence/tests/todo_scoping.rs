//! Integration tests for to-do listing filters and team scoping.
//!
//! Requires PostgreSQL; set `TEST_DATABASE_URL` and run with
//! `cargo test -- --ignored`.

use sqlx::PgPool;
use uuid::Uuid;

use domain::models::todo::{TodoOrder, TodoQuery, TodoStatus};
use persistence::repositories::{TeamRepository, TodoRepository, UserRepository};

async fn test_pool() -> PgPool {
    let url = std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must be set for integration tests");
    let pool = PgPool::connect(&url).await.expect("Failed to connect");
    sqlx::migrate!("./src/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

async fn create_user(pool: &PgPool) -> Uuid {
    let id = Uuid::new_v4();
    UserRepository::new(pool.clone())
        .upsert_user(id, &format!("user-{}", &id.to_string()[..8]))
        .await
        .expect("Failed to create user");
    id
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL)"]
async fn keyword_filter_is_case_insensitive() {
    let pool = test_pool().await;
    let user = create_user(&pool).await;

    let repo = TodoRepository::new(pool.clone());
    repo.create_personal(user, "Buy MILK today", "", false)
        .await
        .unwrap();
    repo.create_personal(user, "Walk the dog", "", false)
        .await
        .unwrap();

    let query = TodoQuery {
        q: Some("milk".to_string()),
        status: None,
        order_by: None,
    };
    let todos = repo.list_personal(user, &query).await.unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].title, "Buy MILK today");
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL)"]
async fn status_filter_splits_open_and_done() {
    let pool = test_pool().await;
    let user = create_user(&pool).await;

    let repo = TodoRepository::new(pool.clone());
    let open = repo.create_personal(user, "Open item", "", false).await.unwrap();
    let done = repo.create_personal(user, "Done item", "", false).await.unwrap();
    repo.set_completed(done.id, true).await.unwrap();

    let open_query = TodoQuery {
        q: None,
        status: Some(TodoStatus::Open),
        order_by: None,
    };
    let todos = repo.list_personal(user, &open_query).await.unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].id, open.id);

    let done_query = TodoQuery {
        q: None,
        status: Some(TodoStatus::Done),
        order_by: None,
    };
    let todos = repo.list_personal(user, &done_query).await.unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].id, done.id);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL)"]
async fn ordering_follows_creation_time() {
    let pool = test_pool().await;
    let user = create_user(&pool).await;

    let repo = TodoRepository::new(pool.clone());
    let first = repo.create_personal(user, "First", "", false).await.unwrap();
    let second = repo.create_personal(user, "Second", "", false).await.unwrap();

    let newest = TodoQuery {
        q: None,
        status: None,
        order_by: Some(TodoOrder::Newest),
    };
    let todos = repo.list_personal(user, &newest).await.unwrap();
    assert_eq!(todos[0].id, second.id);

    let oldest = TodoQuery {
        q: None,
        status: None,
        order_by: Some(TodoOrder::Oldest),
    };
    let todos = repo.list_personal(user, &oldest).await.unwrap();
    assert_eq!(todos[0].id, first.id);
}

#[tokio::test]
#[ignore = "requires PostgreSQL (set TEST_DATABASE_URL)"]
async fn team_todos_are_scoped_to_given_teams() {
    let pool = test_pool().await;
    let owner = create_user(&pool).await;
    let outsider = create_user(&pool).await;

    let title = format!("Scope {}", &Uuid::new_v4().to_string()[..8]);
    let team = TeamRepository::new(pool.clone())
        .create_team(&title, &domain::models::team::generate_slug(&title), owner)
        .await
        .unwrap();

    let other_title = format!("Other {}", &Uuid::new_v4().to_string()[..8]);
    let other_team = TeamRepository::new(pool.clone())
        .create_team(
            &other_title,
            &domain::models::team::generate_slug(&other_title),
            outsider,
        )
        .await
        .unwrap();

    let repo = TodoRepository::new(pool.clone());
    repo.create_team_todo(team.id, owner, "Ours", "", false)
        .await
        .unwrap();
    repo.create_team_todo(other_team.id, outsider, "Theirs", "", false)
        .await
        .unwrap();

    let query = TodoQuery::default();
    let todos = repo.list_for_teams(&[team.id], &query).await.unwrap();
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].title, "Ours");
    assert_eq!(todos[0].team_title, title);

    // No teams means no team to-dos, not all of them
    let todos = repo.list_for_teams(&[], &query).await.unwrap();
    assert!(todos.is_empty());
}
