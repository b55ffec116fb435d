//! JSON REST API for the Shelf book catalog.
//!
//! Exposes an axum [`Router`] backed by any [`shelf_core::store::CatalogStore`].
//! Transport concerns (CORS, tracing layers, listening) are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", shelf_api::api_router(store.clone()))
//! ```

pub mod books;
pub mod error;

use std::sync::Arc;

use axum::{Router, routing::get};
use shelf_core::store::CatalogStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: CatalogStore + 'static,
{
  Router::new()
    .route("/books", get(books::list::<S>).post(books::create::<S>))
    .route(
      "/books/{id}",
      get(books::get_one::<S>)
        .put(books::update::<S>)
        .delete(books::delete_one::<S>),
    )
    .with_state(store)
}
