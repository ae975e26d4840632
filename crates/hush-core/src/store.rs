//! The `FeedStore` trait.
//!
//! Implemented by storage backends (e.g. `hush-store-sqlite`). The API layer
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  entity::{
    Comment, Confession, MysteryMessage, NewPoll, NewPost, Poll, Post, PostOrder,
    Question, VoteChoice,
  },
  view::FeedView,
};

/// Abstraction over a feed store backend.
///
/// Every mutation goes through one of these methods; there is no other write
/// path. Counters only ever increase. Operations that target an id that does
/// not exist report it through their return value (`false` / `None`) rather
/// than an error, except where a child row would otherwise be orphaned.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait FeedStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Posts ─────────────────────────────────────────────────────────────

  /// Persist a new post with `likes = 0`. Empty content is rejected; length
  /// limits are the caller's job.
  fn create_post(
    &self,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  /// Retrieve a post by id. Returns `None` if not found.
  fn get_post(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// All posts, unpaginated.
  fn list_posts(
    &self,
    order: PostOrder,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  /// Posts whose content contains `text`, newest first.
  fn search_posts(
    &self,
    text: String,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  /// One uniformly random post, or `None` when there are none.
  fn random_post(
    &self,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// Add one like. Returns `false` if the post does not exist.
  fn increment_like(
    &self,
    post_id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete a post together with its comments. Idempotent; returns whether a
  /// post was actually removed.
  fn delete_post(
    &self,
    post_id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Comments ──────────────────────────────────────────────────────────

  /// Attach a comment to an existing post. Returns `None` when the post does
  /// not exist at the time of the insert.
  fn add_comment(
    &self,
    post_id: i64,
    content: String,
  ) -> impl Future<Output = Result<Option<Comment>, Self::Error>> + Send + '_;

  /// Comments on a post, oldest first.
  fn list_comments(
    &self,
    post_id: i64,
  ) -> impl Future<Output = Result<Vec<Comment>, Self::Error>> + Send + '_;

  // ── Polls ─────────────────────────────────────────────────────────────

  fn add_poll(
    &self,
    input: NewPoll,
  ) -> impl Future<Output = Result<Poll, Self::Error>> + Send + '_;

  fn get_poll(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Poll>, Self::Error>> + Send + '_;

  /// All polls, newest first.
  fn list_polls(
    &self,
  ) -> impl Future<Output = Result<Vec<Poll>, Self::Error>> + Send + '_;

  /// Add one vote to the chosen side. Returns `false` if the poll does not
  /// exist.
  fn cast_vote(
    &self,
    poll_id: i64,
    choice: VoteChoice,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Confessions ───────────────────────────────────────────────────────

  fn add_confession(
    &self,
    content: String,
  ) -> impl Future<Output = Result<Confession, Self::Error>> + Send + '_;

  /// All confessions, newest first.
  fn list_confessions(
    &self,
  ) -> impl Future<Output = Result<Vec<Confession>, Self::Error>> + Send + '_;

  fn random_confession(
    &self,
  ) -> impl Future<Output = Result<Option<Confession>, Self::Error>> + Send + '_;

  // ── Mystery messages ──────────────────────────────────────────────────

  fn add_mystery_message(
    &self,
    content: String,
  ) -> impl Future<Output = Result<MysteryMessage, Self::Error>> + Send + '_;

  /// One uniformly random mystery message, or `None` when the table is empty.
  fn get_random_mystery(
    &self,
  ) -> impl Future<Output = Result<Option<MysteryMessage>, Self::Error>> + Send + '_;

  // ── Questions ─────────────────────────────────────────────────────────

  fn add_question(
    &self,
    text: String,
  ) -> impl Future<Output = Result<Question, Self::Error>> + Send + '_;

  /// Set (or overwrite) the answer to a question. Returns `false` if the
  /// question does not exist.
  fn answer_question(
    &self,
    question_id: i64,
    answer: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// All questions, newest first.
  fn list_questions(
    &self,
  ) -> impl Future<Output = Result<Vec<Question>, Self::Error>> + Send + '_;

  // ── Views ─────────────────────────────────────────────────────────────

  /// Assemble the full page state from freshly queried tables.
  fn snapshot(
    &self,
  ) -> impl Future<Output = Result<FeedView, Self::Error>> + Send + '_;
}
