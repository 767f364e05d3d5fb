//! [`SqliteStore`] — the SQLite implementation of the divvy store traits.

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use divvy_core::{
  company::{Company, CompanyRecord},
  dividend::DividendRecord,
  member::{MemberRecord, NewMember},
  store::{CompanyStore, DividendStore, MemberStore, Page},
};

use crate::{
  Error, Result,
  encode::{
    RawCompany, RawDividend, RawMember, encode_amount, encode_date, encode_dt,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A divvy store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. One value
/// serves as both the company and the dividend store.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── CompanyStore impl ───────────────────────────────────────────────────────

impl CompanyStore for SqliteStore {
  type Error = Error;

  async fn exists(&self, ticker: &str) -> Result<bool> {
    let ticker = ticker.to_owned();

    let found: bool = self
      .conn
      .call(move |conn| {
        let found = conn
          .query_row(
            "SELECT 1 FROM companies WHERE ticker = ?1",
            rusqlite::params![ticker],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        Ok(found)
      })
      .await?;

    Ok(found)
  }

  async fn find_by_ticker(&self, ticker: &str) -> Result<Option<CompanyRecord>> {
    let ticker = ticker.to_owned();

    let raw: Option<RawCompany> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT company_id, ticker, name, created_at
               FROM companies WHERE ticker = ?1",
              rusqlite::params![ticker],
              |row| {
                Ok(RawCompany {
                  company_id: row.get(0)?,
                  ticker:     row.get(1)?,
                  name:       row.get(2)?,
                  created_at: row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCompany::into_record).transpose()
  }

  async fn save(&self, company: &Company) -> Result<CompanyRecord> {
    let record = CompanyRecord {
      company_id: Uuid::new_v4(),
      ticker:     company.ticker.clone(),
      name:       company.name.clone(),
      created_at: Utc::now(),
    };

    let id_str     = encode_uuid(record.company_id);
    let ticker_str = record.ticker.clone();
    let name_str   = record.name.clone();
    let at_str     = encode_dt(record.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO companies (company_id, ticker, name, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, ticker_str, name_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }

  async fn delete(&self, company_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(company_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM companies WHERE company_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn find_all(&self, offset: u64, limit: u64) -> Result<Page<CompanyRecord>> {
    let (total, raws): (u64, Vec<RawCompany>) = self
      .conn
      .call(move |conn| {
        let total: u64 =
          conn.query_row("SELECT COUNT(*) FROM companies", [], |r| r.get(0))?;

        let mut stmt = conn.prepare(
          "SELECT company_id, ticker, name, created_at
           FROM companies
           ORDER BY ticker
           LIMIT ?1 OFFSET ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![limit as i64, offset as i64], |row| {
            Ok(RawCompany {
              company_id: row.get(0)?,
              ticker:     row.get(1)?,
              name:       row.get(2)?,
              created_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((total, rows))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawCompany::into_record)
      .collect::<Result<_>>()?;

    Ok(Page { items, offset, total })
  }
}

// ─── DividendStore impl ──────────────────────────────────────────────────────

impl DividendStore for SqliteStore {
  type Error = Error;

  async fn save_all(&self, records: &[DividendRecord]) -> Result<()> {
    let rows: Vec<(String, String, String, String)> = records
      .iter()
      .map(|r| {
        (
          encode_uuid(r.dividend_id),
          encode_uuid(r.company_id),
          encode_date(r.ex_date),
          encode_amount(r.amount),
        )
      })
      .collect();

    // One transaction: the batch lands entirely or not at all.
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO dividends (dividend_id, company_id, ex_date, amount)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for (dividend_id, company_id, ex_date, amount) in &rows {
            stmt.execute(rusqlite::params![
              dividend_id,
              company_id,
              ex_date,
              amount
            ])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn delete_all_by_company(&self, company_id: Uuid) -> Result<()> {
    let id_str = encode_uuid(company_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM dividends WHERE company_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn find_all_by_company(&self, company_id: Uuid) -> Result<Vec<DividendRecord>> {
    let id_str = encode_uuid(company_id);

    let raws: Vec<RawDividend> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT dividend_id, company_id, ex_date, amount
           FROM dividends
           WHERE company_id = ?1
           ORDER BY ex_date",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawDividend {
              dividend_id: row.get(0)?,
              company_id:  row.get(1)?,
              ex_date:     row.get(2)?,
              amount:      row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDividend::into_record).collect()
  }
}

// ─── MemberStore impl ────────────────────────────────────────────────────────

impl MemberStore for SqliteStore {
  type Error = Error;

  async fn find_by_username(&self, username: &str) -> Result<Option<MemberRecord>> {
    let username = username.to_owned();

    let raw: Option<RawMember> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT member_id, username, password_hash, roles, created_at
               FROM members WHERE username = ?1",
              rusqlite::params![username],
              |row| {
                Ok(RawMember {
                  member_id:     row.get(0)?,
                  username:      row.get(1)?,
                  password_hash: row.get(2)?,
                  roles:         row.get(3)?,
                  created_at:    row.get(4)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMember::into_record).transpose()
  }

  async fn save(&self, member: NewMember) -> Result<MemberRecord> {
    let record = MemberRecord {
      member_id:     Uuid::new_v4(),
      username:      member.username,
      password_hash: member.password_hash,
      roles:         member.roles,
      created_at:    Utc::now(),
    };

    let id_str    = encode_uuid(record.member_id);
    let username  = record.username.clone();
    let hash      = record.password_hash.clone();
    let roles_str = serde_json::to_string(&record.roles)?;
    let at_str    = encode_dt(record.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO members (member_id, username, password_hash, roles, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, username, hash, roles_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }
}
