//! The `Scraper` trait — an opaque provider of company and dividend facts.
//!
//! Scheduling, retries and rate limiting are the implementor's concern;
//! the ingestion service calls these methods exactly once per operation.

use std::future::Future;

use crate::{company::Company, dividend::DividendFact};

pub trait Scraper: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Look up the company behind `ticker`. `Ok(None)` means the source
  /// knows no such ticker — distinct from a transport failure.
  fn fetch_company<'a>(
    &'a self,
    ticker: &'a str,
  ) -> impl Future<Output = Result<Option<Company>, Self::Error>> + Send + 'a;

  /// Fetch the full dividend history for `company`. Never null; an empty
  /// history is valid.
  fn fetch_dividends<'a>(
    &'a self,
    company: &'a Company,
  ) -> impl Future<Output = Result<Vec<DividendFact>, Self::Error>> + Send + 'a;
}
