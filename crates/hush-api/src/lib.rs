//! JSON REST API for the Hush feed.
//!
//! Exposes an axum [`Router`] backed by any [`hush_core::store::FeedStore`].
//! Every user action on the feed page maps to one request here, and the page
//! re-renders from `GET /feed` afterwards. Transport concerns (binding, TLS,
//! request tracing) are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", hush_api::api_router(store.clone(), 280))
//! ```

pub mod drops;
pub mod error;
pub mod feed;
pub mod polls;
pub mod posts;
pub mod questions;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use hush_core::store::FeedStore;

pub use error::ApiError;

/// State shared by every handler.
pub struct ApiState<S> {
  pub store:          Arc<S>,
  /// Upper bound for post content, enforced before the store is called.
  pub max_post_chars: usize,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), max_post_chars: self.max_post_chars }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, max_post_chars: usize) -> Router<()>
where
  S: FeedStore + 'static,
{
  Router::new()
    // Page state
    .route("/feed", get(feed::snapshot::<S>))
    .route("/nickname", get(feed::new_nickname))
    // Posts & comments
    .route("/posts", get(posts::list::<S>).post(posts::create::<S>))
    .route("/posts/random", get(posts::random::<S>))
    .route("/posts/{id}", get(posts::get_one::<S>).delete(posts::delete_one::<S>))
    .route("/posts/{id}/like", post(posts::like::<S>))
    .route(
      "/posts/{id}/comments",
      get(posts::list_comments::<S>).post(posts::add_comment::<S>),
    )
    // Polls
    .route("/polls", get(polls::list::<S>).post(polls::create::<S>))
    .route("/polls/{id}/vote", post(polls::vote::<S>))
    // Confessions & mystery messages
    .route("/confessions", get(drops::list_confessions::<S>).post(drops::add_confession::<S>))
    .route("/confessions/random", get(drops::random_confession::<S>))
    .route("/mystery", post(drops::add_mystery::<S>))
    .route("/mystery/random", get(drops::random_mystery::<S>))
    // Q&A
    .route("/questions", get(questions::list::<S>).post(questions::create::<S>))
    .route("/questions/{id}/answer", post(questions::answer::<S>))
    .with_state(ApiState { store, max_post_chars })
}
