//! Dividend facts and their persisted form.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single dividend event as scraped: ex-dividend date and per-share
/// amount.
///
/// No uniqueness constraint applies here; duplicates within one scrape pass
/// through as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividendFact {
  pub ex_date: NaiveDate,
  pub amount:  Decimal,
}

/// A persisted dividend row, bound to the owning
/// [`CompanyRecord`](crate::company::CompanyRecord)'s surrogate key.
///
/// Lifecycle is strictly tied to the owner: written only during that
/// company's ingestion, deleted in bulk before the company row. A dividend
/// row must never outlive its owning company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DividendRecord {
  pub dividend_id: Uuid,
  pub company_id:  Uuid,
  pub ex_date:     NaiveDate,
  pub amount:      Decimal,
}

impl DividendRecord {
  pub fn fact(&self) -> DividendFact {
    DividendFact {
      ex_date: self.ex_date,
      amount:  self.amount,
    }
  }
}
