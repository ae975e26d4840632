//! Handlers for `/questions` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/questions` | Newest first |
//! | `POST` | `/questions` | Body: `{"question":"..."}` |
//! | `POST` | `/questions/:id/answer` | Body: `{"answer":"..."}`; replaces any earlier answer |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use hush_core::{entity::Question, store::FeedStore, validate::require_text};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

/// `GET /questions`
pub async fn list<S>(State(state): State<ApiState<S>>) -> Result<Json<Vec<Question>>, ApiError>
where
  S: FeedStore + 'static,
{
  let questions = state.store.list_questions().await.map_err(ApiError::store)?;
  Ok(Json(questions))
}

#[derive(Debug, Deserialize)]
pub struct AskBody {
  pub question: String,
}

/// `POST /questions`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<AskBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: FeedStore + 'static,
{
  require_text("question", &body.question)?;
  let question = state
    .store
    .add_question(body.question)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(question)))
}

#[derive(Debug, Deserialize)]
pub struct AnswerBody {
  pub answer: String,
}

/// `POST /questions/:id/answer`
pub async fn answer<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<AnswerBody>,
) -> Result<StatusCode, ApiError>
where
  S: FeedStore + 'static,
{
  require_text("answer", &body.answer)?;
  let found = state
    .store
    .answer_question(id, body.answer)
    .await
    .map_err(ApiError::store)?;
  if !found {
    return Err(ApiError::NotFound(format!("question {id} not found")));
  }
  Ok(StatusCode::NO_CONTENT)
}
