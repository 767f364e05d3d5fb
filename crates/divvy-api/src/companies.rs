//! Handlers for `/company` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/company` | Body `{"ticker":"AAPL"}`; scrape + persist |
//! | `GET`    | `/company` | `?offset=&limit=` paged listing |
//! | `DELETE` | `/company/{ticker}` | Cascades to the dividend history |
//! | `GET`    | `/company/autocomplete` | `?keyword=<prefix>` |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use divvy_core::{
  company::CompanyRecord,
  scraper::Scraper,
  store::{CompanyStore, DividendStore, MemberStore, Page},
};

use crate::{AppState, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct IngestBody {
  pub ticker: String,
}

/// `POST /company` — scrape and persist a ticker; 201 + the scraped
/// company.
pub async fn create<C, D, S, M>(
  State(state): State<AppState<C, D, S, M>>,
  Json(body): Json<IngestBody>,
) -> Result<impl IntoResponse, ApiError>
where
  C: CompanyStore + 'static,
  D: DividendStore + 'static,
  S: Scraper + 'static,
  M: MemberStore + 'static,
{
  let company = state.service.ingest(&body.ticker).await?;
  // Freshly ingested names become autocomplete keywords.
  state.keywords.add_keyword(&company.name);
  tracing::info!(ticker = %company.ticker, "ingested company");
  Ok((StatusCode::CREATED, Json(company)))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub offset: u64,
  #[serde(default = "default_limit")]
  pub limit:  u64,
}

fn default_limit() -> u64 {
  20
}

/// `GET /company?offset=0&limit=20`
pub async fn list<C, D, S, M>(
  State(state): State<AppState<C, D, S, M>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Page<CompanyRecord>>, ApiError>
where
  C: CompanyStore + 'static,
  D: DividendStore + 'static,
  S: Scraper + 'static,
  M: MemberStore + 'static,
{
  let page = state.service.list(params.offset, params.limit).await?;
  Ok(Json(page))
}

// ─── Remove ───────────────────────────────────────────────────────────────────

/// `DELETE /company/{ticker}` — returns the removed company's name.
pub async fn remove<C, D, S, M>(
  State(state): State<AppState<C, D, S, M>>,
  Path(ticker): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  C: CompanyStore + 'static,
  D: DividendStore + 'static,
  S: Scraper + 'static,
  M: MemberStore + 'static,
{
  let name = state.service.remove(&ticker).await?;
  state.keywords.remove_keyword(&name);
  tracing::info!(%ticker, "removed company");
  Ok(Json(json!({ "name": name })))
}

// ─── Autocomplete ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AutocompleteParams {
  pub keyword: String,
}

/// `GET /company/autocomplete?keyword=<prefix>` — stored company names
/// starting with the prefix, lexicographically.
pub async fn autocomplete<C, D, S, M>(
  State(state): State<AppState<C, D, S, M>>,
  Query(params): Query<AutocompleteParams>,
) -> Json<Vec<String>>
where
  C: CompanyStore + 'static,
  D: DividendStore + 'static,
  S: Scraper + 'static,
  M: MemberStore + 'static,
{
  Json(state.keywords.autocomplete(&params.keyword))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
