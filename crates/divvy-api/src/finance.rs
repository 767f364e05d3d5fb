//! Handler for `/finance/dividend/{ticker}`.

use axum::{
  Json,
  extract::{Path, State},
};
use serde::Serialize;

use divvy_core::{
  company::Company,
  dividend::DividendFact,
  scraper::Scraper,
  store::{CompanyStore, DividendStore, MemberStore},
};

use crate::{AppState, error::ApiError};

/// A company with its stored dividend history, in ex-date order.
#[derive(Debug, Serialize)]
pub struct DividendView {
  pub company:   Company,
  pub dividends: Vec<DividendFact>,
}

/// `GET /finance/dividend/{ticker}` — the stored history, never a live
/// scrape.
pub async fn dividends<C, D, S, M>(
  State(state): State<AppState<C, D, S, M>>,
  Path(ticker): Path<String>,
) -> Result<Json<DividendView>, ApiError>
where
  C: CompanyStore + 'static,
  D: DividendStore + 'static,
  S: Scraper + 'static,
  M: MemberStore + 'static,
{
  let (company, dividends) = state.service.dividends(&ticker).await?;
  Ok(Json(DividendView { company, dividends }))
}
