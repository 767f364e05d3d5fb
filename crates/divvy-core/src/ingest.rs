//! The ingestion service: scrape → validate → persist, and the inverse
//! deletion flow.

use uuid::Uuid;

use crate::{
  company::{Company, CompanyRecord},
  dividend::{DividendFact, DividendRecord},
  error::{Error, Result},
  scraper::Scraper,
  store::{CompanyStore, DividendStore, Page, StoreError},
};

/// Orchestrates company/dividend ingestion and removal.
///
/// Owns the duplicate-ticker invariant: at most one `CompanyRecord` per
/// ticker at any time. The pre-check in [`ingest`](Self::ingest) is a
/// fast path for a better error message; the authoritative guard is the
/// store's uniqueness constraint, whose violation is mapped back onto
/// [`Error::DuplicateTicker`].
pub struct IngestService<C, D, S> {
  companies: C,
  dividends: D,
  scraper:   S,
}

fn store_err<E: StoreError>(e: E) -> Error {
  Error::Store(Box::new(e))
}

fn scrape_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> Error {
  Error::Scrape(Box::new(e))
}

impl<C, D, S> IngestService<C, D, S>
where
  C: CompanyStore,
  D: DividendStore,
  S: Scraper,
{
  pub fn new(companies: C, dividends: D, scraper: S) -> Self {
    Self {
      companies,
      dividends,
      scraper,
    }
  }

  /// Bring `ticker`'s company and full dividend history into the stores.
  ///
  /// Returns the scraped [`Company`] value, not the persisted record.
  ///
  /// The company and dividend writes are two separate store calls with no
  /// rollback across them: if the dividend write fails, the company row
  /// stays behind with zero dividends. Known limitation — the caller
  /// remediates by removing the ticker and re-ingesting, since
  /// re-ingestion alone is blocked by the duplicate check.
  pub async fn ingest(&self, ticker: &str) -> Result<Company> {
    if self.companies.exists(ticker).await.map_err(store_err)? {
      return Err(Error::DuplicateTicker(ticker.to_owned()));
    }

    let company = self
      .scraper
      .fetch_company(ticker)
      .await
      .map_err(scrape_err)?
      .ok_or_else(|| Error::NoCompany(ticker.to_owned()))?;

    // An empty history is valid: the company exists but has no recorded
    // dividends.
    let facts = self
      .scraper
      .fetch_dividends(&company)
      .await
      .map_err(scrape_err)?;

    let record = match self.companies.save(&company).await {
      Ok(record) => record,
      // Two concurrent ingests can both pass the exists() check; the
      // store's unique index on ticker is what actually holds the line.
      Err(e) if e.is_unique_violation() => {
        return Err(Error::DuplicateTicker(ticker.to_owned()));
      }
      Err(e) => return Err(store_err(e)),
    };

    let records: Vec<DividendRecord> = facts
      .iter()
      .map(|f| DividendRecord {
        dividend_id: Uuid::new_v4(),
        company_id:  record.company_id,
        ex_date:     f.ex_date,
        amount:      f.amount,
      })
      .collect();
    self
      .dividends
      .save_all(&records)
      .await
      .map_err(store_err)?;

    Ok(company)
  }

  /// Remove `ticker`'s company and its entire dividend history, returning
  /// the company's name.
  ///
  /// Dividends are deleted strictly before the company row, so a failure
  /// mid-way can never leave dividend rows without an owner.
  pub async fn remove(&self, ticker: &str) -> Result<String> {
    let record = self
      .companies
      .find_by_ticker(ticker)
      .await
      .map_err(store_err)?
      .ok_or_else(|| Error::NoCompany(ticker.to_owned()))?;

    self
      .dividends
      .delete_all_by_company(record.company_id)
      .await
      .map_err(store_err)?;
    self
      .companies
      .delete(record.company_id)
      .await
      .map_err(store_err)?;

    Ok(record.name)
  }

  /// Pass-through pagination over the company store.
  pub async fn list(&self, offset: u64, limit: u64) -> Result<Page<CompanyRecord>> {
    self
      .companies
      .find_all(offset, limit)
      .await
      .map_err(store_err)
  }

  /// Read a stored company's dividend history back out.
  pub async fn dividends(&self, ticker: &str) -> Result<(Company, Vec<DividendFact>)> {
    let record = self
      .companies
      .find_by_ticker(ticker)
      .await
      .map_err(store_err)?
      .ok_or_else(|| Error::NoCompany(ticker.to_owned()))?;

    let rows = self
      .dividends
      .find_all_by_company(record.company_id)
      .await
      .map_err(store_err)?;

    Ok((
      record.company(),
      rows.iter().map(DividendRecord::fact).collect(),
    ))
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
  };

  use chrono::{NaiveDate, Utc};
  use rust_decimal::Decimal;
  use thiserror::Error;

  use super::*;

  #[derive(Debug, Error)]
  enum MockError {
    #[error("unique violation")]
    Unique,
    #[error("write failed")]
    WriteFailed,
  }

  impl StoreError for MockError {
    fn is_unique_violation(&self) -> bool {
      matches!(self, MockError::Unique)
    }
  }

  /// Backs both store traits. Clones share state, so a test can keep one
  /// handle for assertions and hand clones to the service.
  #[derive(Clone, Default)]
  struct MemStore {
    companies:           Arc<Mutex<Vec<CompanyRecord>>>,
    dividends:           Arc<Mutex<Vec<DividendRecord>>>,
    ops:                 Arc<Mutex<Vec<&'static str>>>,
    fail_company_unique: Arc<AtomicBool>,
    fail_dividend_write: Arc<AtomicBool>,
  }

  impl MemStore {
    fn log(&self, op: &'static str) {
      self.ops.lock().expect("ops lock").push(op);
    }

    fn ops(&self) -> Vec<&'static str> {
      self.ops.lock().expect("ops lock").clone()
    }

    fn company_rows(&self) -> Vec<CompanyRecord> {
      self.companies.lock().expect("companies lock").clone()
    }

    fn dividend_rows(&self) -> Vec<DividendRecord> {
      self.dividends.lock().expect("dividends lock").clone()
    }
  }

  impl CompanyStore for MemStore {
    type Error = MockError;

    async fn exists(&self, ticker: &str) -> Result<bool, MockError> {
      let rows = self.companies.lock().expect("companies lock");
      Ok(rows.iter().any(|r| r.ticker == ticker))
    }

    async fn find_by_ticker(&self, ticker: &str) -> Result<Option<CompanyRecord>, MockError> {
      let rows = self.companies.lock().expect("companies lock");
      Ok(rows.iter().find(|r| r.ticker == ticker).cloned())
    }

    async fn save(&self, company: &Company) -> Result<CompanyRecord, MockError> {
      if self.fail_company_unique.load(Ordering::SeqCst) {
        return Err(MockError::Unique);
      }
      let mut rows = self.companies.lock().expect("companies lock");
      if rows.iter().any(|r| r.ticker == company.ticker) {
        return Err(MockError::Unique);
      }
      let record = CompanyRecord {
        company_id: Uuid::new_v4(),
        ticker:     company.ticker.clone(),
        name:       company.name.clone(),
        created_at: Utc::now(),
      };
      rows.push(record.clone());
      self.log("save_company");
      Ok(record)
    }

    async fn delete(&self, company_id: Uuid) -> Result<(), MockError> {
      let mut rows = self.companies.lock().expect("companies lock");
      rows.retain(|r| r.company_id != company_id);
      self.log("delete_company");
      Ok(())
    }

    async fn find_all(&self, offset: u64, limit: u64) -> Result<Page<CompanyRecord>, MockError> {
      let mut rows = self.company_rows();
      rows.sort_by(|a, b| a.ticker.cmp(&b.ticker));
      let total = rows.len() as u64;
      let items = rows
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();
      Ok(Page { items, offset, total })
    }
  }

  impl DividendStore for MemStore {
    type Error = MockError;

    async fn save_all(&self, records: &[DividendRecord]) -> Result<(), MockError> {
      if self.fail_dividend_write.load(Ordering::SeqCst) {
        return Err(MockError::WriteFailed);
      }
      let mut rows = self.dividends.lock().expect("dividends lock");
      rows.extend_from_slice(records);
      self.log("save_dividends");
      Ok(())
    }

    async fn delete_all_by_company(&self, company_id: Uuid) -> Result<(), MockError> {
      let mut rows = self.dividends.lock().expect("dividends lock");
      rows.retain(|r| r.company_id != company_id);
      self.log("delete_dividends");
      Ok(())
    }

    async fn find_all_by_company(&self, company_id: Uuid) -> Result<Vec<DividendRecord>, MockError> {
      let rows = self.dividends.lock().expect("dividends lock");
      let mut out: Vec<_> = rows
        .iter()
        .filter(|r| r.company_id == company_id)
        .cloned()
        .collect();
      out.sort_by_key(|r| r.ex_date);
      Ok(out)
    }
  }

  #[derive(Clone, Default)]
  struct MockScraper {
    company: Option<Company>,
    facts:   Vec<DividendFact>,
  }

  impl Scraper for MockScraper {
    type Error = std::convert::Infallible;

    async fn fetch_company(&self, _ticker: &str) -> Result<Option<Company>, Self::Error> {
      Ok(self.company.clone())
    }

    async fn fetch_dividends(&self, _company: &Company) -> Result<Vec<DividendFact>, Self::Error> {
      Ok(self.facts.clone())
    }
  }

  fn aapl() -> Company {
    Company {
      ticker: "AAPL".into(),
      name:   "Apple Inc.".into(),
    }
  }

  fn facts(n: u32) -> Vec<DividendFact> {
    (0..n)
      .map(|i| DividendFact {
        ex_date: NaiveDate::from_ymd_opt(2024, 1 + i % 12, 15).expect("valid date"),
        amount:  Decimal::new(24, 2),
      })
      .collect()
  }

  fn service(
    store: &MemStore,
    scraper: MockScraper,
  ) -> IngestService<MemStore, MemStore, MockScraper> {
    IngestService::new(store.clone(), store.clone(), scraper)
  }

  #[tokio::test]
  async fn ingest_persists_company_and_all_dividends() {
    let store = MemStore::default();
    let svc = service(&store, MockScraper {
      company: Some(aapl()),
      facts:   facts(4),
    });

    let company = svc.ingest("AAPL").await.unwrap();
    assert_eq!(company, aapl());

    let companies = store.company_rows();
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0].ticker, "AAPL");

    // Exactly N rows, every one referencing the surrogate key.
    let dividends = store.dividend_rows();
    assert_eq!(dividends.len(), 4);
    assert!(
      dividends
        .iter()
        .all(|d| d.company_id == companies[0].company_id)
    );
  }

  #[tokio::test]
  async fn ingest_with_empty_history_is_valid() {
    let store = MemStore::default();
    let svc = service(&store, MockScraper {
      company: Some(aapl()),
      facts:   vec![],
    });

    svc.ingest("AAPL").await.unwrap();
    assert_eq!(store.company_rows().len(), 1);
    assert!(store.dividend_rows().is_empty());
  }

  #[tokio::test]
  async fn second_ingest_rejected_without_writes() {
    let store = MemStore::default();
    let svc = service(&store, MockScraper {
      company: Some(aapl()),
      facts:   facts(2),
    });

    svc.ingest("AAPL").await.unwrap();
    let ops_before = store.ops();

    let err = svc.ingest("AAPL").await.unwrap_err();
    assert!(matches!(err, Error::DuplicateTicker(t) if t == "AAPL"));
    assert_eq!(store.ops(), ops_before);
  }

  #[tokio::test]
  async fn empty_scrape_writes_nothing() {
    let store = MemStore::default();
    let svc = service(&store, MockScraper::default());

    let err = svc.ingest("NOPE").await.unwrap_err();
    assert!(matches!(err, Error::NoCompany(t) if t == "NOPE"));
    assert!(store.company_rows().is_empty());
    assert!(store.dividend_rows().is_empty());
    assert!(store.ops().is_empty());
  }

  #[tokio::test]
  async fn unique_violation_maps_to_duplicate_ticker() {
    // exists() says no, but the write hits the unique index — the lost
    // pre-check race from two concurrent ingests.
    let store = MemStore::default();
    store.fail_company_unique.store(true, Ordering::SeqCst);
    let svc = service(&store, MockScraper {
      company: Some(aapl()),
      facts:   facts(1),
    });

    let err = svc.ingest("AAPL").await.unwrap_err();
    assert!(matches!(err, Error::DuplicateTicker(t) if t == "AAPL"));
  }

  #[tokio::test]
  async fn dividend_write_failure_leaves_orphaned_company() {
    let store = MemStore::default();
    store.fail_dividend_write.store(true, Ordering::SeqCst);
    let svc = service(&store, MockScraper {
      company: Some(aapl()),
      facts:   facts(3),
    });

    let err = svc.ingest("AAPL").await.unwrap_err();
    assert!(matches!(err, Error::Store(_)));

    // The documented partial-failure window: company row with zero
    // dividends, remediable only via remove + re-ingest.
    assert_eq!(store.company_rows().len(), 1);
    assert!(store.dividend_rows().is_empty());
  }

  #[tokio::test]
  async fn remove_deletes_dividends_before_company() {
    let store = MemStore::default();
    let svc = service(&store, MockScraper {
      company: Some(aapl()),
      facts:   facts(3),
    });

    svc.ingest("AAPL").await.unwrap();
    let name = svc.remove("AAPL").await.unwrap();
    assert_eq!(name, "Apple Inc.");

    assert!(store.company_rows().is_empty());
    assert!(store.dividend_rows().is_empty());

    let ops = store.ops();
    assert_eq!(
      &ops[ops.len() - 2..],
      &["delete_dividends", "delete_company"]
    );
  }

  #[tokio::test]
  async fn second_remove_errors() {
    let store = MemStore::default();
    let svc = service(&store, MockScraper {
      company: Some(aapl()),
      facts:   facts(1),
    });

    svc.ingest("AAPL").await.unwrap();
    svc.remove("AAPL").await.unwrap();

    let err = svc.remove("AAPL").await.unwrap_err();
    assert!(matches!(err, Error::NoCompany(t) if t == "AAPL"));
  }

  #[tokio::test]
  async fn remove_unknown_ticker_errors() {
    let store = MemStore::default();
    let svc = service(&store, MockScraper::default());

    let err = svc.remove("GHOST").await.unwrap_err();
    assert!(matches!(err, Error::NoCompany(_)));
  }

  #[tokio::test]
  async fn list_is_a_pass_through() {
    let store = MemStore::default();
    for ticker in ["MSFT", "AAPL", "KO"] {
      let svc = service(&store, MockScraper {
        company: Some(Company {
          ticker: ticker.into(),
          name:   format!("{ticker} Corp"),
        }),
        facts:   vec![],
      });
      svc.ingest(ticker).await.unwrap();
    }

    let svc = service(&store, MockScraper::default());
    let page = svc.list(1, 1).await.unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.offset, 1);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].ticker, "KO");
  }

  #[tokio::test]
  async fn dividends_reads_history_back() {
    let store = MemStore::default();
    let svc = service(&store, MockScraper {
      company: Some(aapl()),
      facts:   facts(2),
    });

    svc.ingest("AAPL").await.unwrap();
    let (company, history) = svc.dividends("AAPL").await.unwrap();
    assert_eq!(company, aapl());
    assert_eq!(history.len(), 2);

    let err = svc.dividends("GHOST").await.unwrap_err();
    assert!(matches!(err, Error::NoCompany(_)));
  }
}
