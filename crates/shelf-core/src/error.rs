//! Error types for `shelf-core`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  /// A required field was absent or blank.
  #[error("{0} is required")]
  MissingField(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
