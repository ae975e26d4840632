//! Server wiring for Hush: configuration and the top-level router.
//!
//! The binary in `main.rs` owns the process lifecycle; everything here is
//! plain functions so it can be exercised from tests.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::Router;
use hush_core::{store::FeedStore, validate::MAX_POST_CHARS};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `HUSH_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:           String,
  pub port:           u16,
  pub store_path:     PathBuf,
  /// Upper bound for post content, in characters.
  pub max_post_chars: usize,
}

impl ServerConfig {
  /// Load configuration from `path` (optional) layered under the
  /// environment, falling back to built-in defaults.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080_i64)?
      .set_default("store_path", "hush.db")?
      .set_default("max_post_chars", MAX_POST_CHARS as i64)?
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("HUSH").try_parsing(true))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// The store path with a leading `~/` expanded.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full application: the JSON API under `/api`, with request tracing.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: FeedStore + 'static,
{
  Router::new()
    .nest("/api", hush_api::api_router(store, config.max_post_chars))
    .layer(TraceLayer::new_for_http())
}
