//! Core types and trait definitions for the divvy dividend service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod company;
pub mod dividend;
pub mod error;
pub mod ingest;
pub mod keyword;
pub mod member;
pub mod scraper;
pub mod store;
pub mod trie;

pub use error::{Error, Result};
