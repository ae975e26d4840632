//! Encoding and decoding helpers between Rust domain types and the plain
//! column values stored in SQLite.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`
//! suffix) so that ordering by the text column is chronological. Counters
//! are stored as `INTEGER` and decoded into `u64`.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use hush_core::entity::{Comment, Confession, MysteryMessage, Poll, Post, Question};
use rusqlite::Row;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// The current time, truncated to the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Counters ────────────────────────────────────────────────────────────────

pub fn decode_count(column: &str, n: i64) -> Result<u64> {
  u64::try_from(n).map_err(|_| Error::Decode(format!("negative {column}: {n}")))
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// Build a `%needle%` pattern for `LIKE ... ESCAPE '\'`, escaping the
/// wildcard characters so they match literally.
pub fn contains_pattern(needle: &str) -> String {
  let mut out = String::with_capacity(needle.len() + 2);
  out.push('%');
  for c in needle.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const POST_COLUMNS: &str = "id, content, created_at, likes, username";

/// Raw values read directly from a `posts` row.
pub struct RawPost {
  pub id:         i64,
  pub content:    String,
  pub created_at: String,
  pub likes:      i64,
  pub username:   String,
}

impl RawPost {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      content:    row.get(1)?,
      created_at: row.get(2)?,
      likes:      row.get(3)?,
      username:   row.get(4)?,
    })
  }

  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      id:         self.id,
      content:    self.content,
      created_at: decode_dt(&self.created_at)?,
      likes:      decode_count("likes", self.likes)?,
      username:   self.username,
    })
  }
}

pub const COMMENT_COLUMNS: &str = "id, post_id, content, created_at";

/// Raw values read directly from a `comments` row.
pub struct RawComment {
  pub id:         i64,
  pub post_id:    i64,
  pub content:    String,
  pub created_at: String,
}

impl RawComment {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      post_id:    row.get(1)?,
      content:    row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_comment(self) -> Result<Comment> {
    Ok(Comment {
      id:         self.id,
      post_id:    self.post_id,
      content:    self.content,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const POLL_COLUMNS: &str =
  "id, question, option_a, option_b, votes_a, votes_b, created_at";

/// Raw values read directly from a `polls` row.
pub struct RawPoll {
  pub id:         i64,
  pub question:   String,
  pub option_a:   String,
  pub option_b:   String,
  pub votes_a:    i64,
  pub votes_b:    i64,
  pub created_at: String,
}

impl RawPoll {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      question:   row.get(1)?,
      option_a:   row.get(2)?,
      option_b:   row.get(3)?,
      votes_a:    row.get(4)?,
      votes_b:    row.get(5)?,
      created_at: row.get(6)?,
    })
  }

  pub fn into_poll(self) -> Result<Poll> {
    Ok(Poll {
      id:         self.id,
      question:   self.question,
      option_a:   self.option_a,
      option_b:   self.option_b,
      votes_a:    decode_count("votes_a", self.votes_a)?,
      votes_b:    decode_count("votes_b", self.votes_b)?,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Column list shared by the two plain text tables (`confessions`,
/// `mystery_messages`).
pub const TEXT_COLUMNS: &str = "id, content, created_at";

/// Raw values read from a table holding only `id, content, created_at`.
pub struct RawText {
  pub id:         i64,
  pub content:    String,
  pub created_at: String,
}

impl RawText {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      content:    row.get(1)?,
      created_at: row.get(2)?,
    })
  }

  pub fn into_confession(self) -> Result<Confession> {
    Ok(Confession {
      id:         self.id,
      content:    self.content,
      created_at: decode_dt(&self.created_at)?,
    })
  }

  pub fn into_mystery(self) -> Result<MysteryMessage> {
    Ok(MysteryMessage {
      id:         self.id,
      content:    self.content,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

pub const QUESTION_COLUMNS: &str = "id, question, answer, created_at";

/// Raw values read directly from a `questions` row.
pub struct RawQuestion {
  pub id:         i64,
  pub question:   String,
  pub answer:     Option<String>,
  pub created_at: String,
}

impl RawQuestion {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      question:   row.get(1)?,
      answer:     row.get(2)?,
      created_at: row.get(3)?,
    })
  }

  pub fn into_question(self) -> Result<Question> {
    Ok(Question {
      id:         self.id,
      question:   self.question,
      answer:     self.answer,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
