//! Entity types — one per table in the feed store.
//!
//! Every entity carries a store-assigned integer id that increases
//! monotonically and never changes. Apart from the like/vote counters and the
//! answer of a question, entities are never updated after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Posts ───────────────────────────────────────────────────────────────────

/// A short anonymous message on the community feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
  pub id:         i64,
  pub content:    String,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at: DateTime<Utc>,
  pub likes:      u64,
  /// Display identity chosen at creation time.
  pub username:   String,
}

/// Input to [`crate::store::FeedStore::create_post`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPost {
  pub content:  String,
  /// The poster's session nickname. When absent or blank the store draws one
  /// from the nickname pool.
  #[serde(default)]
  pub username: Option<String>,
}

impl NewPost {
  pub fn new(content: impl Into<String>) -> Self {
    Self { content: content.into(), username: None }
  }

  pub fn with_username(mut self, username: impl Into<String>) -> Self {
    self.username = Some(username.into());
    self
  }
}

/// Ordering for [`crate::store::FeedStore::list_posts`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostOrder {
  /// Most recent first.
  #[default]
  Newest,
  /// Every post, in uniformly random order.
  Shuffled,
}

/// A reply attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub id:         i64,
  pub post_id:    i64,
  pub content:    String,
  pub created_at: DateTime<Utc>,
}

// ─── Polls ───────────────────────────────────────────────────────────────────

/// One side of a two-option poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
  A,
  B,
}

/// A two-option poll with running tallies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
  pub id:         i64,
  pub question:   String,
  pub option_a:   String,
  pub option_b:   String,
  pub votes_a:    u64,
  pub votes_b:    u64,
  pub created_at: DateTime<Utc>,
}

impl Poll {
  pub fn total_votes(&self) -> u64 { self.votes_a + self.votes_b }

  /// Resolve the literal option text a voter picked to the side it names.
  pub fn choice_for(&self, option: &str) -> Result<VoteChoice> {
    if option == self.option_a {
      Ok(VoteChoice::A)
    } else if option == self.option_b {
      Ok(VoteChoice::B)
    } else {
      Err(Error::UnknownOption(option.to_owned()))
    }
  }
}

/// Input to [`crate::store::FeedStore::add_poll`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewPoll {
  pub question: String,
  pub option_a: String,
  pub option_b: String,
}

// ─── Anonymous drops ─────────────────────────────────────────────────────────

/// An anonymous confession. No identity, no likes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confession {
  pub id:         i64,
  pub content:    String,
  pub created_at: DateTime<Utc>,
}

/// A message that is only ever read back through a random reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MysteryMessage {
  pub id:         i64,
  pub content:    String,
  pub created_at: DateTime<Utc>,
}

// ─── Q&A ─────────────────────────────────────────────────────────────────────

/// An anonymous question, optionally answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
  pub id:         i64,
  pub question:   String,
  pub answer:     Option<String>,
  pub created_at: DateTime<Utc>,
}

impl Question {
  pub fn is_answered(&self) -> bool { self.answer.is_some() }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn poll() -> Poll {
    Poll {
      id:         1,
      question:   "Tabs or spaces?".into(),
      option_a:   "Tabs".into(),
      option_b:   "Spaces".into(),
      votes_a:    3,
      votes_b:    4,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn choice_for_matches_literal_option() {
    let p = poll();
    assert_eq!(p.choice_for("Tabs").unwrap(), VoteChoice::A);
    assert_eq!(p.choice_for("Spaces").unwrap(), VoteChoice::B);
  }

  #[test]
  fn choice_for_rejects_unknown_option() {
    let p = poll();
    assert_eq!(
      p.choice_for("tabs"),
      Err(Error::UnknownOption("tabs".into()))
    );
  }

  #[test]
  fn total_votes_sums_both_sides() {
    assert_eq!(poll().total_votes(), 7);
  }

  #[test]
  fn post_order_deserializes_lowercase() {
    let order: PostOrder = serde_json::from_str("\"shuffled\"").unwrap();
    assert_eq!(order, PostOrder::Shuffled);
    assert_eq!(PostOrder::default(), PostOrder::Newest);
  }
}
