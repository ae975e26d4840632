//! Handlers for `/posts` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/posts` | Optional `?order=newest\|shuffled`, or `?q=` to search |
//! | `POST`   | `/posts` | Body: [`NewPost`]; returns 201 + stored post |
//! | `GET`    | `/posts/random` | A random post, or `null` |
//! | `GET`    | `/posts/:id` | 404 if not found |
//! | `DELETE` | `/posts/:id` | Removes the post and its comments; always 204 |
//! | `POST`   | `/posts/:id/like` | 204, or 404 for an unknown post |
//! | `GET`    | `/posts/:id/comments` | Oldest first |
//! | `POST`   | `/posts/:id/comments` | Body: `{"content":"..."}`; 404 for an unknown post |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use hush_core::{
  entity::{Comment, NewPost, Post, PostOrder},
  store::FeedStore,
  validate::{MAX_USERNAME_CHARS, check_length, require_text},
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

// ─── List / search ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub order: PostOrder,
  /// Substring to search for. Results are always newest first.
  pub q:     Option<String>,
}

/// `GET /posts[?order=<order>][&q=<text>]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Post>>, ApiError>
where
  S: FeedStore + 'static,
{
  let posts = match params.q {
    Some(text) => state.store.search_posts(text).await,
    None => state.store.list_posts(params.order).await,
  }
  .map_err(ApiError::store)?;
  Ok(Json(posts))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /posts` — body: `{"content":"...","username":"..."}`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewPost>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FeedStore + 'static,
{
  require_text("content", &body.content)?;
  check_length("content", &body.content, state.max_post_chars)?;
  if let Some(name) = &body.username {
    check_length("username", name, MAX_USERNAME_CHARS)?;
  }

  let post = state.store.create_post(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(post)))
}

// ─── Single post ──────────────────────────────────────────────────────────────

/// `GET /posts/random`
pub async fn random<S>(State(state): State<ApiState<S>>) -> Result<Json<Option<Post>>, ApiError>
where
  S: FeedStore + 'static,
{
  let post = state.store.random_post().await.map_err(ApiError::store)?;
  Ok(Json(post))
}

/// `GET /posts/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Post>, ApiError>
where
  S: FeedStore + 'static,
{
  let post = state
    .store
    .get_post(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("post {id} not found")))?;
  Ok(Json(post))
}

/// `DELETE /posts/:id`
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: FeedStore + 'static,
{
  state.store.delete_post(id).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /posts/:id/like`
pub async fn like<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError>
where
  S: FeedStore + 'static,
{
  let found = state.store.increment_like(id).await.map_err(ApiError::store)?;
  if !found {
    return Err(ApiError::NotFound(format!("post {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}

// ─── Comments ─────────────────────────────────────────────────────────────────

/// `GET /posts/:id/comments`
pub async fn list_comments<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Vec<Comment>>, ApiError>
where
  S: FeedStore + 'static,
{
  let comments = state.store.list_comments(id).await.map_err(ApiError::store)?;
  Ok(Json(comments))
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
  pub content: String,
}

/// `POST /posts/:id/comments` — body: `{"content":"..."}`
pub async fn add_comment<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<CommentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FeedStore + 'static,
{
  require_text("content", &body.content)?;

  let comment = state
    .store
    .add_comment(id, body.content)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("post {id} not found")))?;
  Ok((StatusCode::CREATED, Json(comment)))
}
