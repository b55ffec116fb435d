//! Book types — the single entity of the Shelf catalog.
//!
//! A [`Book`] is what the store hands back: it always carries a
//! store-assigned `id` and `created_at`. Callers never construct those two
//! fields themselves; they submit a [`NewBook`] on creation and a
//! [`BookFields`] on update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Store-assigned identifier of a book.
pub type BookId = i64;

// ─── Book ────────────────────────────────────────────────────────────────────

/// A persisted catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
  pub id:          BookId,
  pub title:       String,
  pub author:      String,
  #[serde(default)]
  pub description: String,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:  DateTime<Utc>,
}

impl Book {
  /// The mutable part of this record, e.g. to seed an edit form.
  pub fn fields(&self) -> BookFields {
    BookFields {
      title:       self.title.clone(),
      author:      self.author.clone(),
      description: self.description.clone(),
    }
  }
}

// ─── NewBook ─────────────────────────────────────────────────────────────────

/// Input to [`crate::store::CatalogStore::insert_book`].
/// `id` and `created_at` are always set by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
  pub title:       String,
  pub author:      String,
  #[serde(default)]
  pub description: String,
}

impl NewBook {
  /// Convenience constructor with an empty description.
  pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
    Self {
      title:       title.into(),
      author:      author.into(),
      description: String::new(),
    }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = description.into();
    self
  }

  /// Reject the input if `title` or `author` is blank.
  pub fn validate(&self) -> Result<()> { require_title_author(&self.title, &self.author) }
}

// ─── BookFields ──────────────────────────────────────────────────────────────

/// The mutable fields of a book, as accepted by
/// [`crate::store::CatalogStore::update_book`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFields {
  pub title:       String,
  pub author:      String,
  #[serde(default)]
  pub description: String,
}

impl BookFields {
  /// Reject the input if `title` or `author` is blank.
  pub fn validate(&self) -> Result<()> { require_title_author(&self.title, &self.author) }
}

impl From<BookFields> for NewBook {
  fn from(f: BookFields) -> Self {
    NewBook {
      title:       f.title,
      author:      f.author,
      description: f.description,
    }
  }
}

impl From<NewBook> for BookFields {
  fn from(b: NewBook) -> Self {
    BookFields {
      title:       b.title,
      author:      b.author,
      description: b.description,
    }
  }
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Whitespace-only counts as missing. `title` is checked first.
fn require_title_author(title: &str, author: &str) -> Result<()> {
  if title.trim().is_empty() {
    return Err(Error::MissingField("title"));
  }
  if author.trim().is_empty() {
    return Err(Error::MissingField("author"));
  }
  Ok(())
}
