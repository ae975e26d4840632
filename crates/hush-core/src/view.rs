//! Read models assembled from several tables at query time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Comment, Confession, Poll, Post, Question};

/// A post bundled with its comments, oldest comment first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostThread {
  pub post:     Post,
  pub comments: Vec<Comment>,
}

/// Everything the feed page shows — never stored, always derived.
///
/// Mystery messages are absent on purpose: they are only reachable through a
/// random reveal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedView {
  /// The moment the view was assembled.
  pub as_of:       DateTime<Utc>,
  /// Newest first.
  pub posts:       Vec<PostThread>,
  pub polls:       Vec<Poll>,
  pub confessions: Vec<Confession>,
  pub questions:   Vec<Question>,
}
