//! Runs the ads repository against an in-memory SQLite database through AnyPool.

use adflux_common::models::AdType;
use adflux_db::{AdStore, Database};
use serde_json::json;
use sqlx::{AnyPool, any::AnyPoolOptions};

/// A single connection keeps the in-memory database alive for the whole test.
async fn memory_pool() -> AnyPool {
    sqlx::any::install_default_drivers();
    AnyPoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite")
}

async fn memory_db() -> (Database, AnyPool) {
    let pool = memory_pool().await;

    sqlx::query(
        r#"
        CREATE TABLE ads (
            id INTEGER PRIMARY KEY,
            title TEXT,
            type TEXT,
            media_url TEXT,
            target_url TEXT,
            created_at TEXT,
            weight REAL,
            priority INTEGER
        )
        "#,
    )
    .execute(&pool)
    .await
    .expect("create ads table");

    (Database::Any(pool.clone()), pool)
}

async fn insert(pool: &AnyPool, id: i64, title: &str, ad_type: &str, media_url: Option<&str>) {
    sqlx::query(
        "INSERT INTO ads (id, title, type, media_url, target_url, created_at, weight, priority) \
         VALUES (?, ?, ?, ?, ?, '2024-05-01 10:00:00', 1.5, NULL)",
    )
    .bind(id)
    .bind(title)
    .bind(ad_type)
    .bind(media_url)
    .bind(format!("https://shop.example.com/{id}"))
    .execute(pool)
    .await
    .expect("insert ad");
}

#[tokio::test]
async fn test_empty_table_lists_nothing() {
    let (db, _) = memory_db().await;
    assert!(db.list_ads().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_lists_newest_id_first() {
    let (db, pool) = memory_db().await;
    insert(&pool, 1, "first", "image", Some("a.png")).await;
    insert(&pool, 3, "third", "video", Some("https://cdn.example.com/c.mp4")).await;
    insert(&pool, 2, "second", "image", Some("b.png")).await;

    let ids: Vec<i64> = db.list_ads().await.unwrap().iter().map(|ad| ad.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn test_row_is_decoded_into_typed_fields() {
    let (db, pool) = memory_db().await;
    insert(&pool, 1, "Spring sale", "video", Some("spring.mp4")).await;
    insert(&pool, 2, "Odd one", "carousel", None).await;

    let ads = db.list_ads().await.unwrap();
    assert_eq!(ads[0].title.as_deref(), Some("Odd one"));
    assert_eq!(ads[0].ad_type, Some(AdType::Other("carousel".into())));
    assert_eq!(ads[0].media_url, None);

    assert_eq!(ads[1].ad_type, Some(AdType::Video));
    assert_eq!(ads[1].media_url.as_deref(), Some("spring.mp4"));
    assert_eq!(ads[1].target_url.as_deref(), Some("https://shop.example.com/1"));
}

#[tokio::test]
async fn test_stored_media_url_is_returned_as_stored() {
    let (db, pool) = memory_db().await;
    insert(&pool, 1, "local", "image", Some("car.png")).await;

    let ads = db.list_ads().await.unwrap();
    assert_eq!(ads[0].media_url.as_deref(), Some("car.png"));
}

#[tokio::test]
async fn test_extra_columns_pass_through() {
    let (db, pool) = memory_db().await;
    insert(&pool, 1, "with extras", "image", Some("a.png")).await;

    let ad = db.list_ads().await.unwrap().remove(0);
    assert_eq!(ad.extra.get("created_at"), Some(&json!("2024-05-01 10:00:00")));
    assert_eq!(ad.extra.get("weight"), Some(&json!(1.5)));
    assert_eq!(ad.extra.get("priority"), Some(&json!(null)));
    assert!(!ad.extra.contains_key("media_url"));
    assert_eq!(ad.extra.len(), 3);
}

#[tokio::test]
async fn test_null_text_columns_do_not_fail_listing() {
    let (db, pool) = memory_db().await;
    insert(&pool, 1, "kept", "image", Some("a.png")).await;
    sqlx::query(
        "INSERT INTO ads (id, title, type, media_url, target_url) VALUES (2, NULL, 'image', 'b.png', NULL)",
    )
    .execute(&pool)
    .await
    .expect("insert partial ad");

    let ads = db.list_ads().await.unwrap();
    assert_eq!(ads.len(), 2);
    assert_eq!(ads[0].id, 2);
    assert_eq!(ads[0].title, None);
    assert_eq!(ads[0].ad_type, Some(AdType::Image));
    assert_eq!(ads[0].media_url.as_deref(), Some("b.png"));
    assert_eq!(ads[0].target_url, None);
    assert_eq!(ads[1].title.as_deref(), Some("kept"));
}

#[tokio::test]
async fn test_non_integer_id_is_an_error() {
    let pool = memory_pool().await;
    sqlx::query("CREATE TABLE ads (id TEXT, title TEXT, type TEXT, media_url TEXT, target_url TEXT)")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query("INSERT INTO ads VALUES ('abc', 't', 'image', 'a.png', 'https://x')")
        .execute(&pool)
        .await
        .unwrap();

    assert!(Database::Any(pool).list_ads().await.is_err());
}

#[tokio::test]
async fn test_missing_table_is_an_error() {
    let db = Database::Any(memory_pool().await);
    assert!(db.list_ads().await.is_err());
}

#[tokio::test]
async fn test_ping() {
    let (db, _) = memory_db().await;
    assert_eq!(db.ping().await.unwrap(), 2);
}

#[tokio::test]
async fn test_closed_pool_fails_ping() {
    let (db, _) = memory_db().await;
    db.close().await;
    assert!(db.ping().await.is_err());
    assert!(db.list_ads().await.is_err());
}
