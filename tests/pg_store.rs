//! PostgreSQL store tests
//!
//! These need a running database and are ignored by default:
//!
//! ```text
//! DATABASE_URL=postgres://localhost/stampbook_test cargo test --test pg_store -- --ignored
//! ```

#![cfg(feature = "server")]

use std::sync::Arc;

use assert_matches::assert_matches;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use stampbook::backend::store::{PgStore, StampbookStore, StoreError};
use stampbook::shared::{Book, Geocode, Location, PageIndex, ProfileUpdate, SeedPolicy, Size, Stamp, Transform, UserProfile};

async fn store() -> PgStore {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for postgres tests");
    let pool = PgPoolOptions::new().max_connections(5).connect(&url).await.unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    PgStore::new(pool)
}

/// Fresh user id so runs do not see each other's rows
fn user() -> String {
    format!("test-{}", Uuid::new_v4().simple())
}

fn book(pages: Option<PageIndex>) -> Book {
    Book {
        cover: "http://127.0.0.1:3000/media/covers/austin.png".to_string(),
        pages,
        city: "Austin".to_string(),
        state: "TX".to_string(),
    }
}

fn stamp(name: &str) -> Stamp {
    Stamp {
        photo_url: "http://127.0.0.1:3000/media/photos/visit.jpg".to_string(),
        stamp_url: "http://127.0.0.1:3000/media/stamps/sticker.png".to_string(),
        stamp_transformation: Transform::default(),
        stamp_size: Size { width: 100.0, height: 100.0 },
        date: "Oct 16, 2026 10:00 AM".to_string(),
        notes: None,
        location: Location::new(name, Geocode { lat: 30.0, lng: -97.0 }),
    }
}

#[tokio::test]
#[ignore]
async fn test_book_roundtrip() {
    let store = store().await;
    let uid = user();
    let seeds = vec![Location::new("Zilker Park", Geocode { lat: 30.2669, lng: -97.7729 })];
    let created = book(Some(PageIndex::seeded(&seeds, SeedPolicy::Append).unwrap()));

    let id = store.create_book(&uid, &created).await.unwrap();
    assert_eq!(store.get_book(&uid, id).await.unwrap(), created);

    let books = store.get_books(&uid).await.unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].id, id);
}

#[tokio::test]
#[ignore]
async fn test_append_materializes_and_appends() {
    let store = store().await;
    let uid = user();
    let id = store.create_book(&uid, &book(None)).await.unwrap();
    assert_eq!(store.get_pages(&uid, id).await.unwrap(), None);

    store.append_stamp(&uid, id, &stamp("Alamo")).await.unwrap();
    store.append_stamp(&uid, id, &stamp("Auditorium Shores")).await.unwrap();

    let pages = store.get_pages(&uid, id).await.unwrap().unwrap();
    assert_eq!(pages.bucket_count(), 26);
    let names: Vec<_> = pages
        .bucket("A".parse().unwrap())
        .iter()
        .map(|entry| entry.location().name.clone())
        .collect();
    assert_eq!(names, vec!["Alamo", "Auditorium Shores"]);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_appends() {
    let store = Arc::new(store().await);
    let uid = user();
    let id = store.create_book(&uid, &book(None)).await.unwrap();

    let handles: Vec<_> = ["Alamo", "Barton Springs", "Austin Zoo", "Zilker Park"]
        .into_iter()
        .map(|name| {
            let store = store.clone();
            let uid = uid.clone();
            tokio::spawn(async move { store.append_stamp(&uid, id, &stamp(name)).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let pages = store.get_pages(&uid, id).await.unwrap().unwrap();
    assert_eq!(pages.entry_count(), 4);
    assert_eq!(pages.bucket("A".parse().unwrap()).len(), 2);
}

#[tokio::test]
#[ignore]
async fn test_missing_book() {
    let store = store().await;
    let err = store.append_stamp(&user(), Uuid::new_v4(), &stamp("Alamo")).await.unwrap_err();
    assert_matches!(err, StoreError::BookNotFound { .. });
}

#[tokio::test]
#[ignore]
async fn test_profiles() {
    let store = store().await;
    let uid = user();
    let profile = UserProfile {
        email: format!("{uid}@example.com"),
        display_name: Some("Ana".to_string()),
        bio: None,
        profile_photo: None,
    };
    store.put_profile(&uid, &profile).await.unwrap();

    let updated = store
        .update_profile(
            &uid,
            &ProfileUpdate {
                bio: Some("Road-tripping Texas".to_string()),
                profile_photo: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.display_name.as_deref(), Some("Ana"));
    assert_eq!(updated.bio.as_deref(), Some("Road-tripping Texas"));
    assert_matches!(store.get_profile(&user()).await, Err(StoreError::ProfileNotFound(_)));
}
