//! HTTP server wiring for the Shelf book catalog.
//!
//! Mounts the JSON API from [`shelf_api`] under `/api`, adds request tracing
//! and CORS, and exposes a liveness probe at `/health`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::{Router, http::HeaderValue, routing::get};
use serde::Deserialize;
use shelf_core::store::CatalogStore;
use tower_http::{
  cors::{AllowOrigin, Any, CorsLayer},
  trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SHELF_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:         String,
  pub port:         u16,
  pub store_path:   PathBuf,
  /// Allowed browser origins. Empty means any origin.
  pub cors_origins: Vec<String>,
}

impl ServerConfig {
  /// Layer defaults, the optional file at `path`, and the environment, in
  /// increasing order of precedence.
  pub fn load(path: &Path) -> anyhow::Result<Self> { Self::load_from(path, None) }

  /// As [`ServerConfig::load`], reading `SHELF_*` variables from `env` instead
  /// of the process environment when it is given.
  fn load_from(path: &Path, env: Option<config::Map<String, String>>) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 5000)?
      .set_default("store_path", "shelf.db")?
      .set_default("cors_origins", Vec::<String>::new())?
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("SHELF")
          .try_parsing(true)
          .list_separator(",")
          .with_list_parse_key("cors_origins")
          .source(env),
      )
      .build()
      .context("failed to read config file")?;

    let mut cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    // `SHELF_CORS_ORIGINS=` parses as `[""]`; it means "no list".
    cfg.cors_origins.retain(|o| !o.trim().is_empty());
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// The configured store path with a leading `~` expanded.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }

  fn cors_layer(&self) -> anyhow::Result<CorsLayer> {
    let origin = if self.cors_origins.is_empty() {
      AllowOrigin::from(Any)
    } else {
      let origins = self
        .cors_origins
        .iter()
        .map(|o| {
          HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin {o:?}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
      AllowOrigin::list(origins)
    };

    Ok(
      CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any),
    )
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `store`.
pub fn router<S>(store: Arc<S>, config: &ServerConfig) -> anyhow::Result<Router>
where
  S: CatalogStore + 'static,
{
  Ok(
    Router::new()
      .route("/health", get(|| async { "ok" }))
      .nest("/api", shelf_api::api_router(store))
      .layer(
        TraceLayer::new_for_http()
          .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
          .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
      )
      .layer(config.cors_layer()?),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Integration tests ────────────────────────────────────────────────────────
