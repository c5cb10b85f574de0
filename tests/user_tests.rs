// tests/user_tests.rs

use gradebook::{Database, models::user::User};

async fn open_db() -> Database {
    Database::open("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database")
}

async fn count_users(db: &Database) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM User")
        .fetch_one(db.pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn upsert_new_user_assigns_id() {
    let db = open_db().await;
    let users = db.users();

    let id = users
        .upsert_user(&User::new("alice", "Alice", "Liddell"), "wonderland")
        .await
        .unwrap();

    assert!(id.is_some());
    assert_eq!(count_users(&db).await, 1);

    let other = users
        .upsert_user(&User::new("bob", "Bob", "Builder"), "canwefixit")
        .await
        .unwrap();
    assert!(other.is_some());
    assert_ne!(id, other);
    assert_eq!(count_users(&db).await, 2);
}

#[tokio::test]
async fn upsert_existing_user_keeps_id_and_updates_fields() {
    let db = open_db().await;
    let users = db.users();

    let first = users
        .upsert_user(&User::new("alice", "Alice", "Liddell"), "wonderland")
        .await
        .unwrap();
    let second = users
        .upsert_user(&User::new("alice", "Alicia", "Hargreaves"), "looking-glass")
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(count_users(&db).await, 1);

    let stored = users.find_by_username("alice").await.unwrap().unwrap();
    assert_eq!(stored.id, first);
    assert_eq!(stored.firstname, "Alicia");
    assert_eq!(stored.lastname, "Hargreaves");

    assert!(users.verify_login("alice", "looking-glass").await.unwrap());
    assert!(!users.verify_login("alice", "wonderland").await.unwrap());
}

#[tokio::test]
async fn upsert_rejects_blank_username_or_password() {
    let db = open_db().await;
    let users = db.users();

    let blank_name = users
        .upsert_user(&User::new("  ", "No", "Name"), "secret")
        .await
        .unwrap();
    let empty_password = users
        .upsert_user(&User::new("carol", "Carol", "Danvers"), "")
        .await
        .unwrap();
    let blank_password = users
        .upsert_user(&User::new("carol", "Carol", "Danvers"), "   ")
        .await
        .unwrap();

    assert_eq!(blank_name, None);
    assert_eq!(empty_password, None);
    assert_eq!(blank_password, None);
    assert_eq!(count_users(&db).await, 0);
}

#[tokio::test]
async fn verify_login_requires_exact_match() {
    let db = open_db().await;
    let users = db.users();
    users
        .upsert_user(&User::new("alice", "Alice", "Liddell"), "wonderland")
        .await
        .unwrap();

    assert!(users.verify_login("alice", "wonderland").await.unwrap());
    assert!(!users.verify_login("alice", "Wonderland").await.unwrap());
    assert!(!users.verify_login("Alice", "wonderland").await.unwrap());
    assert!(!users.verify_login("alice", "").await.unwrap());
    assert!(!users.verify_login("nobody", "wonderland").await.unwrap());
}

#[tokio::test]
async fn find_unknown_user_is_none() {
    let db = open_db().await;
    assert!(db.users().find_by_username("ghost").await.unwrap().is_none());
}
