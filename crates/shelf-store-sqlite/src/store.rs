//! [`SqliteStore`] — the SQLite implementation of [`CatalogStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use shelf_core::{
  book::{Book, BookFields, BookId, NewBook},
  store::CatalogStore,
};

use crate::{
  Result,
  encode::{BOOK_COLUMNS, RawBook, encode_dt},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Shelf catalog backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = crate::Error;

  async fn list_books(&self) -> Result<Vec<Book>> {
    let raws: Vec<RawBook> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawBook::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBook::into_book).collect()
  }

  async fn get_book(&self, id: BookId) -> Result<Option<Book>> {
    let raw: Option<RawBook> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"),
              rusqlite::params![id],
              RawBook::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawBook::into_book).transpose()
  }

  async fn insert_book(&self, input: NewBook) -> Result<Book> {
    input.validate()?;

    let at_str = encode_dt(Utc::now());
    let NewBook { title, author, description } = input;

    // Read the row back so the caller sees exactly what a later `get_book`
    // will return.
    let raw: RawBook = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO books (title, author, description, created_at)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {BOOK_COLUMNS}"
          ),
          rusqlite::params![title, author, description, at_str],
          RawBook::from_row,
        )?)
      })
      .await?;

    let book = raw.into_book()?;
    tracing::debug!(id = book.id, "inserted book");
    Ok(book)
  }

  async fn update_book(
    &self,
    id:     BookId,
    fields: BookFields,
  ) -> Result<Option<Book>> {
    fields.validate()?;

    let BookFields { title, author, description } = fields;

    let raw: Option<RawBook> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "UPDATE books
                 SET title = ?1, author = ?2, description = ?3
                 WHERE id = ?4
                 RETURNING {BOOK_COLUMNS}"
              ),
              rusqlite::params![title, author, description, id],
              RawBook::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawBook::into_book).transpose()
  }

  async fn delete_book(&self, id: BookId) -> Result<bool> {
    let removed: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM books WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;

    Ok(removed > 0)
  }
}
