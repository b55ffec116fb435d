//! The `CatalogStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `shelf-store-sqlite`).
//! Higher layers (`shelf-api`, `shelf-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::book::{Book, BookFields, BookId, NewBook};

/// Abstraction over a Shelf catalog backend.
///
/// Not-Found is not an error: lookups and mutations of an absent id return
/// `None` (or `false` for deletes) so callers can map it themselves.
/// Every operation touches at most one record and is atomic at the storage
/// layer; there is no versioning, so concurrent updates are last-write-wins.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CatalogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All books in insertion order. Empty if the catalog is empty.
  fn list_books(
    &self,
  ) -> impl Future<Output = Result<Vec<Book>, Self::Error>> + Send + '_;

  /// Retrieve a book by id. Returns `None` if not found.
  fn get_book(
    &self,
    id: BookId,
  ) -> impl Future<Output = Result<Option<Book>, Self::Error>> + Send + '_;

  /// Persist a new book and return it with its assigned `id` and
  /// `created_at`. Fails if the input does not validate.
  fn insert_book(
    &self,
    input: NewBook,
  ) -> impl Future<Output = Result<Book, Self::Error>> + Send + '_;

  /// Overwrite the mutable fields of an existing book and return the updated
  /// record. Returns `None`, creating nothing, if `id` is absent.
  fn update_book(
    &self,
    id: BookId,
    fields: BookFields,
  ) -> impl Future<Output = Result<Option<Book>, Self::Error>> + Send + '_;

  /// Remove a book. Returns `false` if `id` was absent; deleting twice is
  /// therefore observable.
  fn delete_book(
    &self,
    id: BookId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
