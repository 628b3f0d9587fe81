//! Integration tests for repository layer
//!
//! These tests verify that the SQLite repository implementations correctly
//! interact with the database: CRUD operations, the username constraint,
//! view counting and cascading deletes.

use blog_api::auth::password::hash_password;
use blog_api::domain::errors::RepositoryError;
use blog_api::domain::post::{PostContent, PostTitle};
use blog_api::domain::repositories::post_repository::{NewPost, PostChanges, PostRepository};
use blog_api::domain::repositories::user_repository::{NewUser, UserRepository};
use blog_api::domain::user::{PersonName, Username};
use blog_api::infrastructure::database;
use blog_api::infrastructure::repositories::{SqlitePostRepository, SqliteUserRepository};
use sqlx::SqlitePool;

/// Set up an in-memory database with the schema applied
async fn setup_test_db() -> SqlitePool {
    let pool = database::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory database");
    database::init_schema(&pool)
        .await
        .expect("Failed to create schema");
    pool
}

fn new_user(username: &str) -> NewUser {
    NewUser {
        username: Username::new(username).unwrap(),
        password_hash: hash_password("testpass", 4).expect("hash password"),
        first_name: PersonName::new("Test", "first_name").unwrap(),
        last_name: PersonName::new("User", "last_name").unwrap(),
        avatar: None,
    }
}

fn new_post(user_id: i64, title: &str) -> NewPost {
    NewPost {
        title: PostTitle::new(title).unwrap(),
        content: PostContent::new("Some content").unwrap(),
        user_id,
    }
}

/// Create a test user and return its id
async fn create_test_user(pool: &SqlitePool, username: &str) -> i64 {
    SqliteUserRepository::new(pool.clone())
        .create(new_user(username))
        .await
        .expect("Failed to create test user")
}

#[tokio::test]
async fn test_user_repository_create_and_find_by_username() {
    let pool = setup_test_db().await;
    let repo = SqliteUserRepository::new(pool.clone());

    let id = repo.create(new_user("alice")).await.expect("create user");

    let found = repo
        .find_by_username("alice")
        .await
        .expect("query user")
        .expect("user exists");
    assert_eq!(found.id, id);
    assert_eq!(found.username, "alice");
    assert_eq!(found.first_name, "Test");
    assert_eq!(found.avatar, None);
    assert_ne!(found.password_hash, "testpass");

    let by_id = repo.find_by_id(id).await.expect("query user");
    assert_eq!(by_id, Some(found));

    assert!(repo.find_by_username("bob").await.unwrap().is_none());
}

#[tokio::test]
async fn test_user_repository_duplicate_username_fails() {
    let pool = setup_test_db().await;
    let repo = SqliteUserRepository::new(pool.clone());

    repo.create(new_user("alice")).await.expect("first insert");
    let result = repo.create(new_user("alice")).await;

    assert!(matches!(result, Err(RepositoryError::Conflict(_))));
}

#[tokio::test]
async fn test_user_repository_profile_counts_posts() {
    let pool = setup_test_db().await;
    let user_id = create_test_user(&pool, "alice").await;
    let other_id = create_test_user(&pool, "bob").await;

    let posts = SqlitePostRepository::new(pool.clone());
    posts.create(new_post(user_id, "one")).await.unwrap();
    posts.create(new_post(user_id, "two")).await.unwrap();
    posts.create(new_post(other_id, "three")).await.unwrap();

    let users = SqliteUserRepository::new(pool.clone());
    let profile = users
        .find_profile(user_id)
        .await
        .unwrap()
        .expect("profile exists");
    assert_eq!(profile.username, "alice");
    assert_eq!(profile.post_count, 2);

    assert!(users.find_profile(9999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_user_repository_delete_cascades_to_posts() {
    let pool = setup_test_db().await;
    let user_id = create_test_user(&pool, "alice").await;
    let other_id = create_test_user(&pool, "bob").await;

    let posts = SqlitePostRepository::new(pool.clone());
    let owned = posts.create(new_post(user_id, "mine")).await.unwrap();
    let kept = posts.create(new_post(other_id, "theirs")).await.unwrap();

    let users = SqliteUserRepository::new(pool.clone());
    users.delete(user_id).await.expect("delete user");

    assert!(users.find_by_id(user_id).await.unwrap().is_none());
    assert!(posts.find_by_id(owned.id).await.unwrap().is_none());
    assert!(posts.find_by_id(kept.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_user_repository_delete_missing_user() {
    let pool = setup_test_db().await;
    let users = SqliteUserRepository::new(pool);

    let result = users.delete(42).await;
    assert!(matches!(result, Err(RepositoryError::NotFound(_))));
}

#[tokio::test]
async fn test_post_repository_create_starts_with_zero_views() {
    let pool = setup_test_db().await;
    let user_id = create_test_user(&pool, "alice").await;
    let repo = SqlitePostRepository::new(pool);

    let post = repo.create(new_post(user_id, "hi")).await.expect("create post");

    assert_eq!(post.title, "hi");
    assert_eq!(post.content, "Some content");
    assert_eq!(post.views, 0);
    assert_eq!(post.user_id, user_id);

    let found = repo.find_by_id(post.id).await.unwrap();
    assert_eq!(found, Some(post));
}

#[tokio::test]
async fn test_post_repository_rejects_unknown_author() {
    let pool = setup_test_db().await;
    let repo = SqlitePostRepository::new(pool);

    let result = repo.create(new_post(777, "orphan")).await;
    assert!(matches!(result, Err(RepositoryError::Database(_))));
}

#[tokio::test]
async fn test_post_repository_record_view_increments() {
    let pool = setup_test_db().await;
    let user_id = create_test_user(&pool, "alice").await;
    let repo = SqlitePostRepository::new(pool);
    let post = repo.create(new_post(user_id, "hi")).await.unwrap();

    for expected in 1..=5 {
        let viewed = repo
            .record_view(post.id)
            .await
            .unwrap()
            .expect("post exists");
        assert_eq!(viewed.post.views, expected);
        assert_eq!(viewed.author, "alice");
    }

    assert!(repo.record_view(post.id + 100).await.unwrap().is_none());
}

#[tokio::test]
async fn test_post_repository_find_all_resolves_authors() {
    let pool = setup_test_db().await;
    let alice = create_test_user(&pool, "alice").await;
    let bob = create_test_user(&pool, "bob").await;
    let repo = SqlitePostRepository::new(pool);

    repo.create(new_post(alice, "first")).await.unwrap();
    repo.create(new_post(bob, "second")).await.unwrap();

    let all = repo.find_all().await.unwrap();
    let summary: Vec<(&str, &str)> = all
        .iter()
        .map(|p| (p.post.title.as_str(), p.author.as_str()))
        .collect();
    assert_eq!(summary, vec![("first", "alice"), ("second", "bob")]);
}

#[tokio::test]
async fn test_post_repository_find_by_author() {
    let pool = setup_test_db().await;
    let alice = create_test_user(&pool, "alice").await;
    let bob = create_test_user(&pool, "bob").await;
    let repo = SqlitePostRepository::new(pool);

    repo.create(new_post(alice, "a1")).await.unwrap();
    repo.create(new_post(bob, "b1")).await.unwrap();
    repo.create(new_post(alice, "a2")).await.unwrap();

    let titles: Vec<String> = repo
        .find_by_author(alice)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect();
    assert_eq!(titles, vec!["a1".to_string(), "a2".to_string()]);
}

#[tokio::test]
async fn test_post_repository_partial_update() {
    let pool = setup_test_db().await;
    let user_id = create_test_user(&pool, "alice").await;
    let repo = SqlitePostRepository::new(pool);
    let post = repo.create(new_post(user_id, "before")).await.unwrap();

    let updated = repo
        .update(
            post.id,
            PostChanges {
                title: Some(PostTitle::new("after").unwrap()),
                content: None,
            },
        )
        .await
        .expect("update post");

    assert_eq!(updated.title, "after");
    assert_eq!(updated.content, post.content);
    assert_eq!(updated.created_at, post.created_at);

    let missing = repo.update(post.id + 1, PostChanges::default()).await;
    assert!(matches!(missing, Err(RepositoryError::NotFound(_))));
}

#[tokio::test]
async fn test_post_repository_delete() {
    let pool = setup_test_db().await;
    let user_id = create_test_user(&pool, "alice").await;
    let repo = SqlitePostRepository::new(pool);
    let post = repo.create(new_post(user_id, "bye")).await.unwrap();

    repo.delete(post.id).await.expect("delete post");
    assert!(repo.find_by_id(post.id).await.unwrap().is_none());

    let again = repo.delete(post.id).await;
    assert!(matches!(again, Err(RepositoryError::NotFound(_))));
}
