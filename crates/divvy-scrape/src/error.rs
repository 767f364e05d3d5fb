//! Error type for `divvy-scrape`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Transport failure or a non-success status from the upstream source.
  /// Body decoding failures also land here — `reqwest` folds them in.
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
