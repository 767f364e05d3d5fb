//! Conversions between domain types and their TEXT column encodings.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use divvy_core::{
  company::CompanyRecord,
  dividend::DividendRecord,
  member::MemberRecord,
};

use crate::{Error, Result};

pub(crate) fn encode_uuid(id: Uuid) -> String {
  id.to_string()
}

pub(crate) fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub(crate) fn encode_date(d: NaiveDate) -> String {
  d.to_string()
}

pub(crate) fn encode_amount(a: Decimal) -> String {
  a.to_string()
}

pub(crate) fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub(crate) fn decode_date(s: &str) -> Result<NaiveDate> {
  s.parse()
    .map_err(|e: chrono::ParseError| Error::DateParse(e.to_string()))
}

pub(crate) fn decode_amount(s: &str) -> Result<Decimal> {
  s.parse()
    .map_err(|e: rust_decimal::Error| Error::AmountParse(e.to_string()))
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

/// A `companies` row as raw TEXT columns, before parsing.
pub(crate) struct RawCompany {
  pub company_id: String,
  pub ticker:     String,
  pub name:       String,
  pub created_at: String,
}

impl RawCompany {
  pub fn into_record(self) -> Result<CompanyRecord> {
    Ok(CompanyRecord {
      company_id: Uuid::parse_str(&self.company_id)?,
      ticker:     self.ticker,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// A `dividends` row as raw TEXT columns.
pub(crate) struct RawDividend {
  pub dividend_id: String,
  pub company_id:  String,
  pub ex_date:     String,
  pub amount:      String,
}

impl RawDividend {
  pub fn into_record(self) -> Result<DividendRecord> {
    Ok(DividendRecord {
      dividend_id: Uuid::parse_str(&self.dividend_id)?,
      company_id:  Uuid::parse_str(&self.company_id)?,
      ex_date:     decode_date(&self.ex_date)?,
      amount:      decode_amount(&self.amount)?,
    })
  }
}

/// A `members` row as raw TEXT columns. Roles are a JSON string array.
pub(crate) struct RawMember {
  pub member_id:     String,
  pub username:      String,
  pub password_hash: String,
  pub roles:         String,
  pub created_at:    String,
}

impl RawMember {
  pub fn into_record(self) -> Result<MemberRecord> {
    Ok(MemberRecord {
      member_id:     Uuid::parse_str(&self.member_id)?,
      username:      self.username,
      password_hash: self.password_hash,
      roles:         serde_json::from_str(&self.roles)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
