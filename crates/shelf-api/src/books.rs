//! Handlers for `/books` endpoints.
//!
//! | Method   | Path          | Notes |
//! |----------|---------------|-------|
//! | `GET`    | `/books`      | All books, insertion order |
//! | `POST`   | `/books`      | Body: [`BookBody`]; returns 201 + stored book |
//! | `GET`    | `/books/{id}` | 404 if not found |
//! | `PUT`    | `/books/{id}` | Body: [`BookBody`]; returns 204 |
//! | `DELETE` | `/books/{id}` | Returns 204; 404 if already gone |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    OriginalUri, Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::{StatusCode, header},
  response::IntoResponse,
};
use serde::Deserialize;
use shelf_core::{
  book::{Book, BookFields, BookId, NewBook},
  store::CatalogStore,
};

use crate::error::ApiError;

// ─── Request body ─────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /books` and `PUT /books/{id}`.
///
/// Every field is optional at the wire level so that a missing `title` is
/// reported as a validation failure rather than a deserialisation error.
/// `createdAt` is ignored if present.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookBody {
  pub id:          Option<BookId>,
  pub title:       Option<String>,
  pub author:      Option<String>,
  pub description: Option<String>,
}

impl From<BookBody> for BookFields {
  fn from(b: BookBody) -> Self {
    BookFields {
      title:       b.title.unwrap_or_default(),
      author:      b.author.unwrap_or_default(),
      description: b.description.unwrap_or_default(),
    }
  }
}

fn body(payload: Result<Json<BookBody>, JsonRejection>) -> Result<BookBody, ApiError> {
  payload
    .map(|Json(b)| b)
    .map_err(|r| ApiError::BadRequest(r.body_text()))
}

fn book_id(path: Result<Path<BookId>, PathRejection>) -> Result<BookId, ApiError> {
  path
    .map(|Path(id)| id)
    .map_err(|r| ApiError::BadRequest(r.body_text()))
}

fn not_found(id: BookId) -> ApiError { ApiError::NotFound(format!("book {id} not found")) }

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /books`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<Book>>, ApiError>
where
  S: CatalogStore,
{
  let books = store.list_books().await.map_err(ApiError::store)?;
  Ok(Json(books))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /books/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  path: Result<Path<BookId>, PathRejection>,
) -> Result<Json<Book>, ApiError>
where
  S: CatalogStore,
{
  let id = book_id(path)?;
  let book = store
    .get_book(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  Ok(Json(book))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /books` — returns 201, a `Location` header, and the stored [`Book`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  OriginalUri(uri): OriginalUri,
  payload: Result<Json<BookBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
{
  let input = NewBook::from(BookFields::from(body(payload)?));
  if let Err(e) = input.validate() {
    tracing::warn!(error = %e, "rejected book creation");
    return Err(e.into());
  }

  let book = store.insert_book(input).await.map_err(ApiError::store)?;
  tracing::info!(id = book.id, title = %book.title, "created book");

  let location = format!("{}/{}", uri.path().trim_end_matches('/'), book.id);
  Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(book)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /books/{id}` — overwrites title, author, and description.
///
/// A body `id`, if present, must match the path.
pub async fn update<S>(
  State(store): State<Arc<S>>,
  path: Result<Path<BookId>, PathRejection>,
  payload: Result<Json<BookBody>, JsonRejection>,
) -> Result<StatusCode, ApiError>
where
  S: CatalogStore,
{
  let id = book_id(path)?;
  let body = body(payload)?;

  if let Some(body_id) = body.id
    && body_id != id
  {
    return Err(ApiError::BadRequest(format!(
      "body id {body_id} does not match path id {id}"
    )));
  }

  let fields = BookFields::from(body);
  if let Err(e) = fields.validate() {
    tracing::warn!(id, error = %e, "rejected book update");
    return Err(e.into());
  }

  store
    .update_book(id, fields)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| not_found(id))?;
  tracing::info!(id, "updated book");

  Ok(StatusCode::NO_CONTENT)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /books/{id}` — not idempotent: a second delete is a 404.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  path: Result<Path<BookId>, PathRejection>,
) -> Result<StatusCode, ApiError>
where
  S: CatalogStore,
{
  let id = book_id(path)?;
  if !store.delete_book(id).await.map_err(ApiError::store)? {
    return Err(not_found(id));
  }
  tracing::info!(id, "deleted book");
  Ok(StatusCode::NO_CONTENT)
}
