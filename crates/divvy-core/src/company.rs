//! Company — the entity a dividend history hangs off.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A company fact as scraped: ticker plus display name.
///
/// Identity is the ticker — case-sensitive and externally assigned. The
/// value is immutable within a single ingestion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
  pub ticker: String,
  pub name:   String,
}

/// A persisted company row: [`Company`] plus the store-assigned surrogate
/// key.
///
/// Created exactly once per successful ingestion and never updated in
/// place. Re-ingesting an existing ticker is rejected, not merged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRecord {
  pub company_id: Uuid,
  pub ticker:     String,
  pub name:       String,
  pub created_at: DateTime<Utc>,
}

impl CompanyRecord {
  /// The natural-key view of this record.
  pub fn company(&self) -> Company {
    Company {
      ticker: self.ticker.clone(),
      name:   self.name.clone(),
    }
  }
}
