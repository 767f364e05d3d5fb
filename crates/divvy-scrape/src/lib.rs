//! Yahoo Finance implementation of the divvy [`Scraper`] trait.
//!
//! Uses the chart JSON endpoint with `events=div`, which carries both the
//! company name (in its metadata block) and the full dividend event table,
//! so one upstream call shape serves both trait methods.

mod chart;
pub mod error;

pub use error::{Error, Result};

use std::time::Duration;

use divvy_core::{company::Company, dividend::DividendFact, scraper::Scraper};

/// Scrapes company facts and dividend histories from Yahoo Finance.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct YahooScraper {
  client:   reqwest::Client,
  base_url: String,
}

impl YahooScraper {
  pub const DEFAULT_BASE_URL: &'static str = "https://query1.finance.yahoo.com";

  pub fn new() -> Result<Self> {
    Self::with_base_url(Self::DEFAULT_BASE_URL)
  }

  /// Point the scraper at a different host — used by tests and proxies.
  pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(30))
      .user_agent(concat!("divvy/", env!("CARGO_PKG_VERSION")))
      .build()?;
    Ok(Self {
      client,
      base_url: base_url.into().trim_end_matches('/').to_owned(),
    })
  }

  async fn fetch_chart(&self, ticker: &str) -> Result<Option<chart::ChartResult>> {
    let url = format!(
      "{}/v8/finance/chart/{}?range=max&interval=1mo&events=div",
      self.base_url, ticker
    );
    tracing::debug!(%ticker, "fetching chart data");

    let resp = self.client.get(&url).send().await?;
    // Yahoo answers unknown tickers with 404 plus an error payload; both
    // spellings of "no such symbol" collapse to None.
    if resp.status() == reqwest::StatusCode::NOT_FOUND {
      return Ok(None);
    }
    let body: chart::ChartResponse = resp.error_for_status()?.json().await?;
    Ok(chart::first_result(body))
  }
}

impl Scraper for YahooScraper {
  type Error = Error;

  async fn fetch_company(&self, ticker: &str) -> Result<Option<Company>> {
    let Some(result) = self.fetch_chart(ticker).await? else {
      return Ok(None);
    };
    Ok(Some(chart::company_from_meta(ticker, &result.meta)))
  }

  async fn fetch_dividends(&self, company: &Company) -> Result<Vec<DividendFact>> {
    let Some(result) = self.fetch_chart(&company.ticker).await? else {
      // The ticker vanished between the two scrape calls; an empty history
      // is the honest answer.
      return Ok(Vec::new());
    };
    let facts = chart::dividends_from_events(result.events.as_ref());
    tracing::debug!(ticker = %company.ticker, count = facts.len(), "scraped dividends");
    Ok(facts)
  }
}
