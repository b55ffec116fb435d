//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with millisecond precision.

use chrono::{DateTime, SecondsFormat, Utc};
use shelf_core::book::Book;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawBook::from_row`].
pub const BOOK_COLUMNS: &str = "id, title, author, description, created_at";

/// Raw values read directly from a `books` row.
pub struct RawBook {
  pub id:          i64,
  pub title:       String,
  pub author:      String,
  pub description: String,
  pub created_at:  String,
}

impl RawBook {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawBook {
      id:          row.get(0)?,
      title:       row.get(1)?,
      author:      row.get(2)?,
      description: row.get(3)?,
      created_at:  row.get(4)?,
    })
  }

  pub fn into_book(self) -> Result<Book> {
    Ok(Book {
      id:          self.id,
      title:       self.title,
      author:      self.author,
      description: self.description,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}
