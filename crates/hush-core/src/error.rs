//! Error types for `hush-core`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("{field} must not be empty")]
  Empty { field: &'static str },

  #[error("{field} is longer than {max} characters")]
  TooLong { field: &'static str, max: usize },

  #[error("poll options must differ")]
  DuplicateOptions,

  #[error("{0:?} matches neither poll option")]
  UnknownOption(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
