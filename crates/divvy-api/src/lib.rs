//! JSON REST API for divvy.
//!
//! Exposes an axum [`Router`] backed by any combination of the core store
//! and scraper traits. Transport concerns (TLS, proxies) are the caller's
//! responsibility.

pub mod auth;
pub mod companies;
pub mod error;
pub mod finance;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use divvy_core::{
  ingest::IngestService,
  keyword::KeywordAdmin,
  scraper::Scraper,
  store::{CompanyStore, DividendStore, MemberStore},
};

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` layered
/// with `DIVVY_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:            String,
  #[serde(default = "default_port")]
  pub port:            u16,
  #[serde(default = "default_store_path")]
  pub store_path:      PathBuf,
  #[serde(default = "default_scrape_base_url")]
  pub scrape_base_url: String,
}

fn default_host() -> String {
  "127.0.0.1".to_owned()
}

fn default_port() -> u16 {
  8080
}

fn default_store_path() -> PathBuf {
  PathBuf::from("divvy.db3")
}

fn default_scrape_base_url() -> String {
  divvy_scrape::YahooScraper::DEFAULT_BASE_URL.to_owned()
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<C, D, S, M> {
  pub service:  Arc<IngestService<C, D, S>>,
  pub keywords: KeywordAdmin,
  pub members:  Arc<M>,
}

// Derived Clone would demand Clone on every type parameter; the fields are
// all reference-counted regardless.
impl<C, D, S, M> Clone for AppState<C, D, S, M> {
  fn clone(&self) -> Self {
    Self {
      service:  Arc::clone(&self.service),
      keywords: self.keywords.clone(),
      members:  Arc::clone(&self.members),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for the given state.
pub fn router<C, D, S, M>(state: AppState<C, D, S, M>) -> Router
where
  C: CompanyStore + 'static,
  D: DividendStore + 'static,
  S: Scraper + 'static,
  M: MemberStore + 'static,
{
  Router::new()
    // Companies
    .route(
      "/company",
      get(companies::list::<C, D, S, M>).post(companies::create::<C, D, S, M>),
    )
    .route(
      "/company/autocomplete",
      get(companies::autocomplete::<C, D, S, M>),
    )
    .route("/company/{ticker}", delete(companies::remove::<C, D, S, M>))
    // Dividends
    .route(
      "/finance/dividend/{ticker}",
      get(finance::dividends::<C, D, S, M>),
    )
    // Members
    .route("/auth/signup", post(auth::signup::<C, D, S, M>))
    .route("/auth/signin", post(auth::signin::<C, D, S, M>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
