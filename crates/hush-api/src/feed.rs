//! Whole-page handlers.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/feed` | Complete [`FeedView`], freshly queried |
//! | `GET`  | `/nickname` | A fresh display name; `?numbered=true` for an `Anon####` label |

use axum::{
  Json,
  extract::{Query, State},
};
use hush_core::{nickname, store::FeedStore, view::FeedView};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

/// `GET /feed`
pub async fn snapshot<S>(State(state): State<ApiState<S>>) -> Result<Json<FeedView>, ApiError>
where
  S: FeedStore + 'static,
{
  let view = state.store.snapshot().await.map_err(ApiError::store)?;
  Ok(Json(view))
}

#[derive(Debug, Default, Deserialize)]
pub struct NicknameParams {
  #[serde(default)]
  pub numbered: bool,
}

#[derive(Debug, Serialize)]
pub struct NicknameBody {
  pub nickname: String,
}

/// `GET /nickname[?numbered=true]` — display-only; nothing is persisted until
/// the session posts with it.
pub async fn new_nickname(Query(params): Query<NicknameParams>) -> Json<NicknameBody> {
  let nickname = if params.numbered { nickname::numbered() } else { nickname::generate() };
  Json(NicknameBody { nickname })
}
