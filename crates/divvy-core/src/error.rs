//! Error taxonomy for the ingestion pipeline and keyword admin.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A `CompanyRecord` already exists for the ticker. Raised by the
  /// pre-check, or by mapping a store-level uniqueness violation when two
  /// concurrent ingests race past that check.
  #[error("ticker already exists: {0}")]
  DuplicateTicker(String),

  /// The scraper returned nothing for the ticker, or a removal targeted a
  /// ticker that was never ingested.
  #[error("no company found for ticker: {0}")]
  NoCompany(String),

  /// A persistence failure. Fatal for the call; prior writes within the
  /// same call are not rolled back.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The scraper failed in transport or decoding (distinct from an empty
  /// scrape, which is [`Error::NoCompany`]).
  #[error("scrape error: {0}")]
  Scrape(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// A placeholder operation that is deliberately not implemented.
  #[error("not implemented: {0}")]
  Unimplemented(&'static str),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
