//! Handlers for anonymous drops: confessions and mystery messages.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/confessions` | Newest first |
//! | `POST` | `/confessions` | Body: `{"content":"..."}` |
//! | `GET`  | `/confessions/random` | A random confession, or `null` |
//! | `POST` | `/mystery` | Body: `{"content":"..."}` |
//! | `GET`  | `/mystery/random` | A random mystery message, or `null` |

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use hush_core::{
  entity::{Confession, MysteryMessage},
  store::FeedStore,
  validate::require_text,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct TextBody {
  pub content: String,
}

// ─── Confessions ──────────────────────────────────────────────────────────────

/// `GET /confessions`
pub async fn list_confessions<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Confession>>, ApiError>
where
  S: FeedStore + 'static,
{
  let confessions = state.store.list_confessions().await.map_err(ApiError::store)?;
  Ok(Json(confessions))
}

/// `POST /confessions`
pub async fn add_confession<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<TextBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FeedStore + 'static,
{
  require_text("content", &body.content)?;
  let confession = state
    .store
    .add_confession(body.content)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(confession)))
}

/// `GET /confessions/random`
pub async fn random_confession<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Option<Confession>>, ApiError>
where
  S: FeedStore + 'static,
{
  let confession = state.store.random_confession().await.map_err(ApiError::store)?;
  Ok(Json(confession))
}

// ─── Mystery messages ─────────────────────────────────────────────────────────

/// `POST /mystery`
pub async fn add_mystery<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<TextBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FeedStore + 'static,
{
  require_text("content", &body.content)?;
  let message = state
    .store
    .add_mystery_message(body.content)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(message)))
}

/// `GET /mystery/random`
pub async fn random_mystery<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Option<MysteryMessage>>, ApiError>
where
  S: FeedStore + 'static,
{
  let message = state.store.get_random_mystery().await.map_err(ApiError::store)?;
  Ok(Json(message))
}
