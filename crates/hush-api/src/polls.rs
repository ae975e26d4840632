//! Handlers for `/polls` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/polls` | Newest first |
//! | `POST` | `/polls` | Body: [`NewPoll`]; returns 201 + stored poll |
//! | `POST` | `/polls/:id/vote` | Body: [`VoteBody`]; 204, or 404 for an unknown poll |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use hush_core::{
  entity::{NewPoll, Poll, VoteChoice},
  store::FeedStore,
  validate::require_text,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

/// `GET /polls`
pub async fn list<S>(State(state): State<ApiState<S>>) -> Result<Json<Vec<Poll>>, ApiError>
where
  S: FeedStore + 'static,
{
  let polls = state.store.list_polls().await.map_err(ApiError::store)?;
  Ok(Json(polls))
}

/// `POST /polls` — body: `{"question":"...","option_a":"...","option_b":"..."}`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewPoll>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FeedStore + 'static,
{
  require_text("question", &body.question)?;
  require_text("option_a", &body.option_a)?;
  require_text("option_b", &body.option_b)?;
  if body.option_a == body.option_b {
    return Err(hush_core::Error::DuplicateOptions.into());
  }

  let poll = state.store.add_poll(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(poll)))
}

/// A ballot: either the side itself or the literal text of the chosen option.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum VoteBody {
  Choice { choice: VoteChoice },
  Text { option: String },
}

/// `POST /polls/:id/vote` — body: `{"choice":"a"}` or `{"option":"Cats"}`
pub async fn vote<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<VoteBody>,
) -> Result<StatusCode, ApiError>
where
  S: FeedStore + 'static,
{
  let not_found = || ApiError::NotFound(format!("poll {id} not found"));

  let choice = match body {
    VoteBody::Choice { choice } => choice,
    VoteBody::Text { option } => state
      .store
      .get_poll(id)
      .await
      .map_err(ApiError::store)?
      .ok_or_else(not_found)?
      .choice_for(&option)?,
  };

  if !state.store.cast_vote(id, choice).await.map_err(ApiError::store)? {
    return Err(not_found());
  }
  Ok(StatusCode::NO_CONTENT)
}
