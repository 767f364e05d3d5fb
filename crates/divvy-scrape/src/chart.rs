//! Wire types for Yahoo's `/v8/finance/chart` endpoint, and the pure
//! mapping functions from them onto domain types.
//!
//! Only the fields we read are modelled; everything else in the payload is
//! ignored by serde.

use std::collections::BTreeMap;

use chrono::DateTime;
use rust_decimal::{Decimal, prelude::FromPrimitive as _};
use serde::Deserialize;

use divvy_core::{company::Company, dividend::DividendFact};

#[derive(Debug, Deserialize)]
pub(crate) struct ChartResponse {
  pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Chart {
  // Null when Yahoo reports an error for the symbol.
  #[serde(default)]
  pub result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChartResult {
  pub meta:   Meta,
  #[serde(default)]
  pub events: Option<Events>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Meta {
  pub symbol:     String,
  #[serde(rename = "longName", default)]
  pub long_name:  Option<String>,
  #[serde(rename = "shortName", default)]
  pub short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Events {
  #[serde(default)]
  pub dividends: BTreeMap<String, DividendEvent>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DividendEvent {
  pub amount: f64,
  /// Ex-dividend date as unix seconds.
  pub date:   i64,
}

pub(crate) fn first_result(body: ChartResponse) -> Option<ChartResult> {
  body
    .chart
    .result
    .and_then(|mut results| (!results.is_empty()).then(|| results.remove(0)))
}

/// Yahoo's display name of choice, falling back to the symbol itself for
/// instruments that carry no name.
pub(crate) fn company_from_meta(ticker: &str, meta: &Meta) -> Company {
  let name = meta
    .long_name
    .clone()
    .or_else(|| meta.short_name.clone())
    .unwrap_or_else(|| meta.symbol.clone());
  Company {
    ticker: ticker.to_owned(),
    name,
  }
}

/// Map the dividend event table onto facts. Events with timestamps or
/// amounts the domain cannot represent are skipped rather than failing the
/// whole scrape.
pub(crate) fn dividends_from_events(events: Option<&Events>) -> Vec<DividendFact> {
  let Some(events) = events else {
    return Vec::new();
  };
  events
    .dividends
    .values()
    .filter_map(|ev| {
      let ex_date = DateTime::from_timestamp(ev.date, 0)?.date_naive();
      let amount = Decimal::from_f64(ev.amount)?;
      Some(DividendFact { ex_date, amount })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  const AAPL_CHART: &str = r#"{
    "chart": {
      "result": [{
        "meta": {
          "currency": "USD",
          "symbol": "AAPL",
          "longName": "Apple Inc.",
          "shortName": "Apple Inc.",
          "regularMarketPrice": 227.52
        },
        "events": {
          "dividends": {
            "1707485400": { "amount": 0.24, "date": 1707485400 },
            "1715347800": { "amount": 0.25, "date": 1715347800 }
          }
        },
        "indicators": { "quote": [{}] }
      }],
      "error": null
    }
  }"#;

  const NOT_FOUND: &str = r#"{
    "chart": {
      "result": null,
      "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
    }
  }"#;

  fn parse(json: &str) -> ChartResponse {
    serde_json::from_str(json).expect("chart json")
  }

  #[test]
  fn company_comes_from_long_name() {
    let result = first_result(parse(AAPL_CHART)).unwrap();
    let company = company_from_meta("AAPL", &result.meta);
    assert_eq!(company.ticker, "AAPL");
    assert_eq!(company.name, "Apple Inc.");
  }

  #[test]
  fn company_name_falls_back_to_symbol() {
    let meta = Meta {
      symbol:     "BRK-B".into(),
      long_name:  None,
      short_name: None,
    };
    assert_eq!(company_from_meta("BRK-B", &meta).name, "BRK-B");
  }

  #[test]
  fn dividends_map_to_dated_facts() {
    let result = first_result(parse(AAPL_CHART)).unwrap();
    let facts = dividends_from_events(result.events.as_ref());
    assert_eq!(facts.len(), 2);
    assert_eq!(facts[0].ex_date.to_string(), "2024-02-09");
    assert_eq!(facts[0].amount.to_string(), "0.24");
    assert_eq!(facts[1].ex_date.to_string(), "2024-05-10");
  }

  #[test]
  fn missing_events_means_empty_history() {
    let facts = dividends_from_events(None);
    assert!(facts.is_empty());
  }

  #[test]
  fn error_payload_has_no_result() {
    assert!(first_result(parse(NOT_FOUND)).is_none());
  }
}
