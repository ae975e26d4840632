//! Input checks shared by the store and the API layer.
//!
//! The store only enforces presence. Length limits are a caller concern and
//! are applied by the API before any store call.

use crate::{Error, Result};

/// Default upper bound for post content, in characters.
pub const MAX_POST_CHARS: usize = 280;

/// Upper bound for a caller-supplied username. Pool nicknames stay well
/// below it.
pub const MAX_USERNAME_CHARS: usize = 32;

/// Reject empty or whitespace-only text.
pub fn require_text(field: &'static str, text: &str) -> Result<()> {
  if text.trim().is_empty() {
    return Err(Error::Empty { field });
  }
  Ok(())
}

/// Reject text longer than `max` characters (Unicode scalar values, not bytes).
pub fn check_length(field: &'static str, text: &str, max: usize) -> Result<()> {
  if text.chars().count() > max {
    return Err(Error::TooLong { field, max });
  }
  Ok(())
}
