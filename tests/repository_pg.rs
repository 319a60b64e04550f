//! PostgreSQL repository tests. Run with `DATABASE_URL` pointing at a
//! disposable server: `cargo test -- --ignored`.

use chrono::{Duration as ChronoDuration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use likr::domain::entities::{NewUrlRecord, NewVisit};
use likr::domain::repositories::{UrlRepository, VisitRepository};
use likr::error::AppError;
use likr::infrastructure::persistence::{PgUrlRepository, PgVisitRepository};

const TIMEOUT: Duration = Duration::from_secs(5);

fn new_record(owner: &str, slug: &str) -> NewUrlRecord {
    NewUrlRecord {
        owner_id: owner.to_string(),
        original_url: format!("example.com/{slug}"),
        slug: slug.to_string(),
        is_custom_alias: true,
        expires_at: None,
        qr_code_image_url: format!("https://qr.test/{slug}.png"),
    }
}

fn repos(pool: PgPool) -> (PgUrlRepository, PgVisitRepository) {
    let pool = Arc::new(pool);
    (
        PgUrlRepository::new(pool.clone(), TIMEOUT),
        PgVisitRepository::new(pool, TIMEOUT),
    )
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_create_and_find_by_slug(pool: PgPool) {
    let (urls, _) = repos(pool);

    let created = urls.create(new_record("owner-1", "promo")).await.unwrap();

    assert!(created.id > 0);
    assert_eq!(created.visit_count, 0);
    assert!(!created.deleted);
    assert!(created.last_visited_at.is_none());

    let found = urls.find_by_slug("promo", false).await.unwrap().unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.owner_id, "owner-1");
    assert_eq!(found.qr_code_image_url, "https://qr.test/promo.png");
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_slug_conflicts(pool: PgPool) {
    let (urls, _) = repos(pool);
    urls.create(new_record("owner-1", "promo")).await.unwrap();

    let err = urls.create(new_record("owner-2", "promo")).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict { .. }));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_expiry_round_trips(pool: PgPool) {
    let (urls, _) = repos(pool);
    let expires = Utc::now() - ChronoDuration::days(1);
    let mut record = new_record("owner-1", "old");
    record.expires_at = Some(expires);

    let created = urls.create(record).await.unwrap();

    let stored = created.expires_at.unwrap();
    assert!((stored - expires).num_milliseconds().abs() < 1);
    assert!(created.is_expired());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_soft_delete_hides_but_reserves_slug(pool: PgPool) {
    let (urls, _) = repos(pool);
    let created = urls.create(new_record("owner-1", "gone")).await.unwrap();

    assert!(!urls.soft_delete(created.id, "owner-2").await.unwrap());
    assert!(urls.soft_delete(created.id, "owner-1").await.unwrap());
    assert!(!urls.soft_delete(created.id, "owner-1").await.unwrap());

    assert!(urls.find_by_slug("gone", false).await.unwrap().is_none());
    let reserved = urls.find_by_slug("gone", true).await.unwrap().unwrap();
    assert!(reserved.deleted);

    let err = urls.create(new_record("owner-1", "gone")).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict { .. }));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_find_by_owner_pages_newest_first(pool: PgPool) {
    let (urls, _) = repos(pool);
    for slug in ["aaaa", "bbbb", "cccc"] {
        urls.create(new_record("owner-1", slug)).await.unwrap();
    }
    urls.create(new_record("owner-2", "dddd")).await.unwrap();
    let deleted = urls.create(new_record("owner-1", "eeee")).await.unwrap();
    urls.soft_delete(deleted.id, "owner-1").await.unwrap();

    let first = urls.find_by_owner("owner-1", 0, 2).await.unwrap();
    assert_eq!(first.total, 3);
    let slugs: Vec<_> = first.items.iter().map(|r| r.slug.as_str()).collect();
    assert_eq!(slugs, vec!["cccc", "bbbb"]);

    let second = urls.find_by_owner("owner-1", 2, 2).await.unwrap();
    assert_eq!(second.total, 3);
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].slug, "aaaa");

    let empty = urls.find_by_owner("nobody", 0, 10).await.unwrap();
    assert_eq!(empty.total, 0);
    assert!(empty.items.is_empty());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_increment_visit(pool: PgPool) {
    let (urls, _) = repos(pool);
    let created = urls.create(new_record("owner-1", "hits")).await.unwrap();

    urls.increment_visit(created.id).await.unwrap();
    urls.increment_visit(created.id).await.unwrap();

    let found = urls.find_by_slug("hits", false).await.unwrap().unwrap();
    assert_eq!(found.visit_count, 2);
    assert!(found.last_visited_at.is_some());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_and_count_visits(pool: PgPool) {
    let (urls, visits) = repos(pool);
    let created = urls.create(new_record("owner-1", "seen")).await.unwrap();

    let visit = visits
        .insert(NewVisit {
            url_id: created.id,
            browser: "Firefox".to_string(),
            device_type: "Linux".to_string(),
            referrer: String::new(),
            ip_address: "127.0.0.1".to_string(),
            visited_at: Utc::now(),
        })
        .await
        .unwrap();

    assert!(visit.id > 0);
    assert_eq!(visit.url_id, created.id);
    assert_eq!(visit.browser, "Firefox");
    assert_eq!(visits.count_by_url(created.id).await.unwrap(), 1);
    assert_eq!(visits.count_by_url(created.id + 1).await.unwrap(), 0);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_ping(pool: PgPool) {
    let (urls, _) = repos(pool);

    assert!(urls.ping().await.is_ok());
}
