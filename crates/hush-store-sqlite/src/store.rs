//! [`SqliteStore`] — the SQLite implementation of [`FeedStore`].

use std::{collections::HashMap, path::Path, time::Duration};

use rusqlite::{OptionalExtension as _, Row, types::Value};
use tracing::{debug, info};

use hush_core::{
  entity::{
    Comment, Confession, MysteryMessage, NewPoll, NewPost, Poll, Post, PostOrder,
    Question, VoteChoice,
  },
  nickname,
  store::FeedStore,
  validate::require_text,
  view::{FeedView, PostThread},
};

use crate::{
  encode::{
    COMMENT_COLUMNS, POLL_COLUMNS, POST_COLUMNS, QUESTION_COLUMNS, RawComment,
    RawPoll, RawPost, RawQuestion, RawText, TEXT_COLUMNS, contains_pattern,
    encode_dt, now,
  },
  schema::SCHEMA,
  Error, Result,
};

/// How long a write waits on a lock held by another process.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Hush feed store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted, and every
/// clone submits its work to the same connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    info!("feed store opened at {}", path.display());
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Close the underlying connection. Other clones of this store fail with a
  /// database error afterwards.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    info!("feed store closed");
    Ok(())
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run `sql` and map every resulting row with `map`.
  async fn fetch_all<R, F>(&self, sql: String, params: Vec<Value>, map: F) -> Result<Vec<R>>
  where
    R: Send + 'static,
    F: Fn(&Row<'_>) -> rusqlite::Result<R> + Send + 'static,
  {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), map)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Run `sql` and map the first row, if any.
  async fn fetch_optional<R, F>(
    &self,
    sql: String,
    params: Vec<Value>,
    map: F,
  ) -> Result<Option<R>>
  where
    R: Send + 'static,
    F: FnOnce(&Row<'_>) -> rusqlite::Result<R> + Send + 'static,
  {
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params_from_iter(params), map)
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  /// Execute a single statement and return the number of changed rows.
  async fn execute(&self, sql: &'static str, params: Vec<Value>) -> Result<usize> {
    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(sql, rusqlite::params_from_iter(params))?))
      .await?;
    Ok(changed)
  }

  /// Execute an `INSERT` and return the new row id.
  async fn insert(&self, sql: &'static str, params: Vec<Value>) -> Result<i64> {
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(sql, rusqlite::params_from_iter(params))?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  /// Insert a row into one of the `id, content, created_at` tables.
  async fn insert_text(
    &self,
    sql: &'static str,
    content: String,
  ) -> Result<(i64, chrono::DateTime<chrono::Utc>, String)> {
    require_text("content", &content)?;
    let created_at = now();
    let id = self
      .insert(sql, vec![Value::from(content.clone()), Value::from(encode_dt(created_at))])
      .await?;
    Ok((id, created_at, content))
  }
}

fn decode_posts(raws: Vec<RawPost>) -> Result<Vec<Post>> {
  raws.into_iter().map(RawPost::into_post).collect()
}

// ─── FeedStore impl ──────────────────────────────────────────────────────────

impl FeedStore for SqliteStore {
  type Error = Error;

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn create_post(&self, input: NewPost) -> Result<Post> {
    require_text("content", &input.content)?;

    let username = match input.username {
      Some(name) if !name.trim().is_empty() => name,
      _ => nickname::generate(),
    };
    let created_at = now();

    let id = self
      .insert(
        "INSERT INTO posts (content, created_at, likes, username) VALUES (?1, ?2, 0, ?3)",
        vec![
          Value::from(input.content.clone()),
          Value::from(encode_dt(created_at)),
          Value::from(username.clone()),
        ],
      )
      .await?;

    debug!(post_id = id, %username, "post created");
    Ok(Post { id, content: input.content, created_at, likes: 0, username })
  }

  async fn get_post(&self, id: i64) -> Result<Option<Post>> {
    self
      .fetch_optional(
        format!("SELECT {POST_COLUMNS} FROM posts WHERE id = ?1"),
        vec![Value::from(id)],
        RawPost::from_row,
      )
      .await?
      .map(RawPost::into_post)
      .transpose()
  }

  async fn list_posts(&self, order: PostOrder) -> Result<Vec<Post>> {
    let order_by = match order {
      PostOrder::Newest => "created_at DESC, id DESC",
      PostOrder::Shuffled => "RANDOM()",
    };
    let raws = self
      .fetch_all(
        format!("SELECT {POST_COLUMNS} FROM posts ORDER BY {order_by}"),
        vec![],
        RawPost::from_row,
      )
      .await?;
    decode_posts(raws)
  }

  async fn search_posts(&self, text: String) -> Result<Vec<Post>> {
    let raws = self
      .fetch_all(
        format!(
          "SELECT {POST_COLUMNS} FROM posts
           WHERE content LIKE ?1 ESCAPE '\\'
           ORDER BY created_at DESC, id DESC"
        ),
        vec![Value::from(contains_pattern(&text))],
        RawPost::from_row,
      )
      .await?;
    decode_posts(raws)
  }

  async fn random_post(&self) -> Result<Option<Post>> {
    self
      .fetch_optional(
        format!("SELECT {POST_COLUMNS} FROM posts ORDER BY RANDOM() LIMIT 1"),
        vec![],
        RawPost::from_row,
      )
      .await?
      .map(RawPost::into_post)
      .transpose()
  }

  async fn increment_like(&self, post_id: i64) -> Result<bool> {
    let changed = self
      .execute(
        "UPDATE posts SET likes = likes + 1 WHERE id = ?1",
        vec![Value::from(post_id)],
      )
      .await?;
    debug!(post_id, found = changed > 0, "like");
    Ok(changed > 0)
  }

  async fn delete_post(&self, post_id: i64) -> Result<bool> {
    // Comments go first and in the same transaction, so a database opened
    // without `foreign_keys` still never keeps orphans.
    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM comments WHERE post_id = ?1", [post_id])?;
        let n = tx.execute("DELETE FROM posts WHERE id = ?1", [post_id])?;
        tx.commit()?;
        Ok(n > 0)
      })
      .await?;
    debug!(post_id, removed, "post deleted");
    Ok(removed)
  }

  // ── Comments ──────────────────────────────────────────────────────────────

  async fn add_comment(&self, post_id: i64, content: String) -> Result<Option<Comment>> {
    require_text("content", &content)?;
    let created_at = now();
    let at_str = encode_dt(created_at);
    let body = content.clone();

    let inserted: Option<i64> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let exists = tx
          .query_row("SELECT 1 FROM posts WHERE id = ?1", [post_id], |_| Ok(()))
          .optional()?
          .is_some();
        if !exists {
          return Ok(None);
        }
        tx.execute(
          "INSERT INTO comments (post_id, content, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![post_id, body, at_str],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(Some(id))
      })
      .await?;

    let Some(id) = inserted else {
      debug!(post_id, "comment rejected, post missing");
      return Ok(None);
    };
    debug!(post_id, comment_id = id, "comment added");
    Ok(Some(Comment { id, post_id, content, created_at }))
  }

  async fn list_comments(&self, post_id: i64) -> Result<Vec<Comment>> {
    let raws = self
      .fetch_all(
        format!(
          "SELECT {COMMENT_COLUMNS} FROM comments
           WHERE post_id = ?1
           ORDER BY created_at ASC, id ASC"
        ),
        vec![Value::from(post_id)],
        RawComment::from_row,
      )
      .await?;
    raws.into_iter().map(RawComment::into_comment).collect()
  }

  // ── Polls ─────────────────────────────────────────────────────────────────

  async fn add_poll(&self, input: NewPoll) -> Result<Poll> {
    require_text("question", &input.question)?;
    require_text("option_a", &input.option_a)?;
    require_text("option_b", &input.option_b)?;
    if input.option_a == input.option_b {
      return Err(hush_core::Error::DuplicateOptions.into());
    }

    let created_at = now();
    let id = self
      .insert(
        "INSERT INTO polls (question, option_a, option_b, votes_a, votes_b, created_at)
         VALUES (?1, ?2, ?3, 0, 0, ?4)",
        vec![
          Value::from(input.question.clone()),
          Value::from(input.option_a.clone()),
          Value::from(input.option_b.clone()),
          Value::from(encode_dt(created_at)),
        ],
      )
      .await?;

    debug!(poll_id = id, "poll created");
    Ok(Poll {
      id,
      question: input.question,
      option_a: input.option_a,
      option_b: input.option_b,
      votes_a: 0,
      votes_b: 0,
      created_at,
    })
  }

  async fn get_poll(&self, id: i64) -> Result<Option<Poll>> {
    self
      .fetch_optional(
        format!("SELECT {POLL_COLUMNS} FROM polls WHERE id = ?1"),
        vec![Value::from(id)],
        RawPoll::from_row,
      )
      .await?
      .map(RawPoll::into_poll)
      .transpose()
  }

  async fn list_polls(&self) -> Result<Vec<Poll>> {
    let raws = self
      .fetch_all(
        format!("SELECT {POLL_COLUMNS} FROM polls ORDER BY created_at DESC, id DESC"),
        vec![],
        RawPoll::from_row,
      )
      .await?;
    raws.into_iter().map(RawPoll::into_poll).collect()
  }

  async fn cast_vote(&self, poll_id: i64, choice: VoteChoice) -> Result<bool> {
    let sql = match choice {
      VoteChoice::A => "UPDATE polls SET votes_a = votes_a + 1 WHERE id = ?1",
      VoteChoice::B => "UPDATE polls SET votes_b = votes_b + 1 WHERE id = ?1",
    };
    let changed = self.execute(sql, vec![Value::from(poll_id)]).await?;
    debug!(poll_id, ?choice, found = changed > 0, "vote");
    Ok(changed > 0)
  }

  // ── Confessions ───────────────────────────────────────────────────────────

  async fn add_confession(&self, content: String) -> Result<Confession> {
    let (id, created_at, content) = self
      .insert_text(
        "INSERT INTO confessions (content, created_at) VALUES (?1, ?2)",
        content,
      )
      .await?;
    debug!(confession_id = id, "confession added");
    Ok(Confession { id, content, created_at })
  }

  async fn list_confessions(&self) -> Result<Vec<Confession>> {
    let raws = self
      .fetch_all(
        format!(
          "SELECT {TEXT_COLUMNS} FROM confessions ORDER BY created_at DESC, id DESC"
        ),
        vec![],
        RawText::from_row,
      )
      .await?;
    raws.into_iter().map(RawText::into_confession).collect()
  }

  async fn random_confession(&self) -> Result<Option<Confession>> {
    self
      .fetch_optional(
        format!("SELECT {TEXT_COLUMNS} FROM confessions ORDER BY RANDOM() LIMIT 1"),
        vec![],
        RawText::from_row,
      )
      .await?
      .map(RawText::into_confession)
      .transpose()
  }

  // ── Mystery messages ──────────────────────────────────────────────────────

  async fn add_mystery_message(&self, content: String) -> Result<MysteryMessage> {
    let (id, created_at, content) = self
      .insert_text(
        "INSERT INTO mystery_messages (content, created_at) VALUES (?1, ?2)",
        content,
      )
      .await?;
    debug!(mystery_id = id, "mystery message added");
    Ok(MysteryMessage { id, content, created_at })
  }

  async fn get_random_mystery(&self) -> Result<Option<MysteryMessage>> {
    self
      .fetch_optional(
        format!("SELECT {TEXT_COLUMNS} FROM mystery_messages ORDER BY RANDOM() LIMIT 1"),
        vec![],
        RawText::from_row,
      )
      .await?
      .map(RawText::into_mystery)
      .transpose()
  }

  // ── Questions ─────────────────────────────────────────────────────────────

  async fn add_question(&self, text: String) -> Result<Question> {
    require_text("question", &text)?;
    let created_at = now();
    let id = self
      .insert(
        "INSERT INTO questions (question, answer, created_at) VALUES (?1, NULL, ?2)",
        vec![Value::from(text.clone()), Value::from(encode_dt(created_at))],
      )
      .await?;
    debug!(question_id = id, "question added");
    Ok(Question { id, question: text, answer: None, created_at })
  }

  async fn answer_question(&self, question_id: i64, answer: String) -> Result<bool> {
    require_text("answer", &answer)?;
    let changed = self
      .execute(
        "UPDATE questions SET answer = ?2 WHERE id = ?1",
        vec![Value::from(question_id), Value::from(answer)],
      )
      .await?;
    debug!(question_id, found = changed > 0, "question answered");
    Ok(changed > 0)
  }

  async fn list_questions(&self) -> Result<Vec<Question>> {
    let raws = self
      .fetch_all(
        format!(
          "SELECT {QUESTION_COLUMNS} FROM questions ORDER BY created_at DESC, id DESC"
        ),
        vec![],
        RawQuestion::from_row,
      )
      .await?;
    raws.into_iter().map(RawQuestion::into_question).collect()
  }

  // ── Views ─────────────────────────────────────────────────────────────────

  async fn snapshot(&self) -> Result<FeedView> {
    // One read transaction, so the view never mixes states from before and
    // after a concurrent write.
    let (posts, comments, polls, confessions, questions) = self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;

        fn all<R>(
          tx: &rusqlite::Transaction<'_>,
          sql: &str,
          map: fn(&Row<'_>) -> rusqlite::Result<R>,
        ) -> rusqlite::Result<Vec<R>> {
          let mut stmt = tx.prepare(sql)?;
          let rows = stmt.query_map([], map)?.collect();
          rows
        }

        let posts = all(
          &tx,
          &format!("SELECT {POST_COLUMNS} FROM posts ORDER BY created_at DESC, id DESC"),
          RawPost::from_row,
        )?;
        let comments = all(
          &tx,
          &format!(
            "SELECT {COMMENT_COLUMNS} FROM comments ORDER BY created_at ASC, id ASC"
          ),
          RawComment::from_row,
        )?;
        let polls = all(
          &tx,
          &format!("SELECT {POLL_COLUMNS} FROM polls ORDER BY created_at DESC, id DESC"),
          RawPoll::from_row,
        )?;
        let confessions = all(
          &tx,
          &format!(
            "SELECT {TEXT_COLUMNS} FROM confessions ORDER BY created_at DESC, id DESC"
          ),
          RawText::from_row,
        )?;
        let questions = all(
          &tx,
          &format!(
            "SELECT {QUESTION_COLUMNS} FROM questions ORDER BY created_at DESC, id DESC"
          ),
          RawQuestion::from_row,
        )?;

        tx.commit()?;
        Ok((posts, comments, polls, confessions, questions))
      })
      .await?;

    let mut by_post: HashMap<i64, Vec<Comment>> = HashMap::new();
    for raw in comments {
      let comment = raw.into_comment()?;
      by_post.entry(comment.post_id).or_default().push(comment);
    }

    let posts = decode_posts(posts)?
      .into_iter()
      .map(|post| {
        let comments = by_post.remove(&post.id).unwrap_or_default();
        PostThread { post, comments }
      })
      .collect();

    Ok(FeedView {
      as_of: now(),
      posts,
      polls: polls.into_iter().map(RawPoll::into_poll).collect::<Result<_>>()?,
      confessions: confessions
        .into_iter()
        .map(RawText::into_confession)
        .collect::<Result<_>>()?,
      questions: questions
        .into_iter()
        .map(RawQuestion::into_question)
        .collect::<Result<_>>()?,
    })
  }
}
