//! Async HTTP client wrapping the Shelf JSON API.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use shelf_core::book::{Book, BookFields, BookId};
use thiserror::Error;

/// Connection settings for the Shelf API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
  /// The server could not be reached or the response could not be read.
  #[error("cannot reach the server: {0}")]
  Transport(#[from] reqwest::Error),

  /// The server answered with a non-success status.
  #[error("{message} ({status})")]
  Status { status: StatusCode, message: String },
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Async HTTP client for the Shelf JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based. Requests are
/// never retried and use the transport's default timeouts.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder().build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  // ── Books ─────────────────────────────────────────────────────────────────

  /// `GET /api/books`
  pub async fn list_books(&self) -> Result<Vec<Book>> {
    json(self.client.get(self.url("/books"))).await
  }

  /// `GET /api/books/{id}`
  pub async fn get_book(&self, id: BookId) -> Result<Book> {
    json(self.client.get(self.url(&format!("/books/{id}")))).await
  }

  /// `POST /api/books` — returns the stored book with its new id.
  pub async fn create_book(&self, fields: &BookFields) -> Result<Book> {
    json(self.client.post(self.url("/books")).json(fields)).await
  }

  /// `PUT /api/books/{id}`
  pub async fn update_book(&self, id: BookId, fields: &BookFields) -> Result<()> {
    send(self.client.put(self.url(&format!("/books/{id}"))).json(fields)).await?;
    Ok(())
  }

  /// `DELETE /api/books/{id}`
  pub async fn delete_book(&self, id: BookId) -> Result<()> {
    send(self.client.delete(self.url(&format!("/books/{id}")))).await?;
    Ok(())
  }
}

async fn json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T> {
  Ok(send(req).await?.json().await?)
}

/// Send `req`, turning a non-2xx answer into [`ClientError::Status`] carrying
/// the server's `{"error": ...}` message when there is one.
async fn send(req: RequestBuilder) -> Result<reqwest::Response> {
  let resp = req.send().await?;
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }

  let message = resp
    .json::<serde_json::Value>()
    .await
    .ok()
    .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
    .unwrap_or_else(|| {
      status
        .canonical_reason()
        .unwrap_or("request failed")
        .to_owned()
    });
  tracing::debug!(%status, %message, "request rejected");
  Err(ClientError::Status { status, message })
}
