//! SQLite persistence backend for divvy.
//!
//! Implements the `divvy-core` store traits ([`CompanyStore`],
//! [`DividendStore`], [`MemberStore`]) over a single SQLite file.
//!
//! [`CompanyStore`]: divvy_core::store::CompanyStore
//! [`DividendStore`]: divvy_core::store::DividendStore
//! [`MemberStore`]: divvy_core::store::MemberStore

mod encode;
pub mod error;
mod schema;
mod store;


pub use error::{Error, Result};
pub use store::SqliteStore;
