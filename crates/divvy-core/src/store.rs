//! Store traits and supporting query types.
//!
//! The traits are implemented by storage backends (e.g.
//! `divvy-store-sqlite`). Higher layers (`divvy-api`, the ingestion
//! service) depend on these abstractions, not on any concrete backend.

use std::future::Future;

use serde::Serialize;
use uuid::Uuid;

use crate::{
  company::{Company, CompanyRecord},
  dividend::DividendRecord,
  member::{MemberRecord, NewMember},
};

// ─── Pagination ──────────────────────────────────────────────────────────────

/// One page of a paginated listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
  pub items:  Vec<T>,
  /// Row offset this page starts at.
  pub offset: u64,
  /// Total row count across all pages.
  pub total:  u64,
}

// ─── Backend error contract ──────────────────────────────────────────────────

/// Implemented by backend error types so the ingestion service can tell a
/// uniqueness-constraint violation — an alternate path to
/// [`Error::DuplicateTicker`](crate::Error::DuplicateTicker) — apart from a
/// fatal write failure.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn is_unique_violation(&self) -> bool;
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Keyed persistence for company records.
///
/// The backend must hold a uniqueness constraint on ticker. The pre-check
/// in the ingestion service is an optimisation; this constraint is the
/// authoritative duplicate guard.
///
/// All methods return `Send` futures so the traits can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CompanyStore: Send + Sync {
  type Error: StoreError;

  /// Fast existence check by ticker.
  fn exists<'a>(
    &'a self,
    ticker: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Retrieve a record by ticker. Returns `None` if not found.
  fn find_by_ticker<'a>(
    &'a self,
    ticker: &'a str,
  ) -> impl Future<Output = Result<Option<CompanyRecord>, Self::Error>> + Send + 'a;

  /// Persist `company`, assigning its surrogate key. Violating the ticker
  /// uniqueness constraint yields an error whose
  /// [`StoreError::is_unique_violation`] is true.
  fn save<'a>(
    &'a self,
    company: &'a Company,
  ) -> impl Future<Output = Result<CompanyRecord, Self::Error>> + Send + 'a;

  /// Delete a record by surrogate key. Deleting an absent key is a no-op.
  fn delete(
    &self,
    company_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Paged listing in ticker order.
  fn find_all(
    &self,
    offset: u64,
    limit: u64,
  ) -> impl Future<Output = Result<Page<CompanyRecord>, Self::Error>> + Send + '_;
}

/// Keyed persistence for dividend rows, owned by companies.
pub trait DividendStore: Send + Sync {
  type Error: StoreError;

  /// Bulk-insert a batch of dividend rows as one write.
  fn save_all<'a>(
    &'a self,
    records: &'a [DividendRecord],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete every dividend row owned by `company_id`.
  fn delete_all_by_company(
    &self,
    company_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All dividend rows owned by `company_id`, in ex-date order.
  fn find_all_by_company(
    &self,
    company_id: Uuid,
  ) -> impl Future<Output = Result<Vec<DividendRecord>, Self::Error>> + Send + '_;
}

/// Persistence for member accounts. Usernames are unique.
pub trait MemberStore: Send + Sync {
  type Error: StoreError;

  fn find_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<MemberRecord>, Self::Error>> + Send + 'a;

  /// Persist a new member. A duplicate username yields an error whose
  /// [`StoreError::is_unique_violation`] is true.
  fn save(
    &self,
    member: NewMember,
  ) -> impl Future<Output = Result<MemberRecord, Self::Error>> + Send + '_;
}
