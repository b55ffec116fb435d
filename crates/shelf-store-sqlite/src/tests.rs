//! Integration tests for `SqliteStore` against an in-memory database.

use shelf_core::{
  book::{BookFields, NewBook},
  store::CatalogStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn dune() -> NewBook {
  NewBook::new("Dune", "Frank Herbert").with_description("Spice and sand.")
}

// ─── Insert / get ────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_book() {
  let s = store().await;

  let book = s.insert_book(dune()).await.unwrap();
  assert_eq!(book.title, "Dune");
  assert_eq!(book.author, "Frank Herbert");
  assert_eq!(book.description, "Spice and sand.");

  let fetched = s.get_book(book.id).await.unwrap();
  assert_eq!(fetched, Some(book));
}

#[tokio::test]
async fn first_book_gets_id_one_and_ids_increase() {
  let s = store().await;
  let a = s.insert_book(dune()).await.unwrap();
  let b = s.insert_book(NewBook::new("Emma", "Austen")).await.unwrap();
  assert_eq!(a.id, 1);
  assert!(b.id > a.id);
}

#[tokio::test]
async fn description_defaults_to_empty() {
  let s = store().await;
  let book = s
    .insert_book(NewBook::new("Madol Doova", "Martin Wickramasinghe"))
    .await
    .unwrap();
  assert_eq!(book.description, "");
}

#[tokio::test]
async fn get_book_missing_returns_none() {
  let s = store().await;
  assert!(s.get_book(42).await.unwrap().is_none());
}

#[tokio::test]
async fn insert_with_blank_title_fails_and_persists_nothing() {
  let s = store().await;

  let err = s.insert_book(NewBook::new("   ", "Anon")).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(shelf_core::Error::MissingField("title"))
  ));

  let err = s.insert_book(NewBook::new("Untitled", "")).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(shelf_core::Error::MissingField("author"))
  ));

  assert!(s.list_books().await.unwrap().is_empty());
}

#[tokio::test]
async fn deleted_ids_are_not_reused() {
  let s = store().await;
  let first = s.insert_book(dune()).await.unwrap();
  assert!(s.delete_book(first.id).await.unwrap());

  let second = s.insert_book(dune()).await.unwrap();
  assert_ne!(first.id, second.id);
}

// ─── List ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_empty_store() {
  let s = store().await;
  assert!(s.list_books().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_is_in_insertion_order() {
  let s = store().await;
  for title in ["A", "B", "C"] {
    s.insert_book(NewBook::new(title, "X")).await.unwrap();
  }

  let titles: Vec<_> = s
    .list_books()
    .await
    .unwrap()
    .into_iter()
    .map(|b| b.title)
    .collect();
  assert_eq!(titles, ["A", "B", "C"]);
}

#[tokio::test]
async fn list_after_creates_and_deletes_counts_survivors() {
  let s = store().await;
  let mut ids = Vec::new();
  for i in 0..5 {
    let b = s
      .insert_book(NewBook::new(format!("Book {i}"), "Author"))
      .await
      .unwrap();
    ids.push(b.id);
  }
  s.delete_book(ids[1]).await.unwrap();
  s.delete_book(ids[3]).await.unwrap();

  let all = s.list_books().await.unwrap();
  assert_eq!(all.len(), 3);
  assert!(all.iter().all(|b| b.id != ids[1] && b.id != ids[3]));
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_overwrites_fields_and_keeps_identity() {
  let s = store().await;
  let original = s.insert_book(dune()).await.unwrap();

  let updated = s
    .update_book(original.id, BookFields {
      title:       "Dune Messiah".into(),
      author:      "Frank Herbert".into(),
      description: String::new(),
    })
    .await
    .unwrap()
    .expect("book exists");

  assert_eq!(updated.id, original.id);
  assert_eq!(updated.created_at, original.created_at);
  assert_eq!(updated.title, "Dune Messiah");
  assert_eq!(updated.description, "");

  let fetched = s.get_book(original.id).await.unwrap().unwrap();
  assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_missing_returns_none_and_creates_nothing() {
  let s = store().await;
  let result = s
    .update_book(7, BookFields::from(dune()))
    .await
    .unwrap();
  assert!(result.is_none());
  assert!(s.list_books().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_with_blank_author_fails_and_leaves_row_alone() {
  let s = store().await;
  let original = s.insert_book(dune()).await.unwrap();

  let mut fields = original.fields();
  fields.author = " ".into();
  let err = s.update_book(original.id, fields).await.unwrap_err();
  assert!(matches!(err, Error::Core(_)));

  let fetched = s.get_book(original.id).await.unwrap().unwrap();
  assert_eq!(fetched, original);
}

#[tokio::test]
async fn last_write_wins() {
  let s = store().await;
  let book = s.insert_book(dune()).await.unwrap();

  let mut first = book.fields();
  first.title = "First".into();
  let mut second = book.fields();
  second.title = "Second".into();

  s.update_book(book.id, first).await.unwrap();
  s.update_book(book.id, second).await.unwrap();

  assert_eq!(s.get_book(book.id).await.unwrap().unwrap().title, "Second");
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_then_get_returns_none() {
  let s = store().await;
  let book = s.insert_book(dune()).await.unwrap();

  assert!(s.delete_book(book.id).await.unwrap());
  assert!(s.get_book(book.id).await.unwrap().is_none());
}

#[tokio::test]
async fn second_delete_reports_missing() {
  let s = store().await;
  let book = s.insert_book(dune()).await.unwrap();

  assert!(s.delete_book(book.id).await.unwrap());
  assert!(!s.delete_book(book.id).await.unwrap());
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_a_file_keeps_books() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("catalog.db");

  let id = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.insert_book(dune()).await.unwrap().id
  };

  let s = SqliteStore::open(&path).await.unwrap();
  let book = s.get_book(id).await.unwrap().expect("persisted");
  assert_eq!(book.title, "Dune");
}
