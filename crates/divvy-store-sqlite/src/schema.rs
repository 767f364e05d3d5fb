//! SQL schema for the divvy SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS companies (
    company_id  TEXT PRIMARY KEY,
    ticker      TEXT NOT NULL,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL     -- ISO 8601 UTC; store-assigned
);

-- The authoritative duplicate-ticker guard. The ingestion service's
-- exists() pre-check can lose a race; this index cannot.
CREATE UNIQUE INDEX IF NOT EXISTS companies_ticker_idx ON companies(ticker);

-- Dividend rows never outlive their owning company: the ingestion service
-- deletes them first, and the FK rejects any ordering mistake.
CREATE TABLE IF NOT EXISTS dividends (
    dividend_id TEXT PRIMARY KEY,
    company_id  TEXT NOT NULL REFERENCES companies(company_id),
    ex_date     TEXT NOT NULL,    -- ISO 8601 date
    amount      TEXT NOT NULL     -- decimal string, exact
);

CREATE INDEX IF NOT EXISTS dividends_company_idx ON dividends(company_id);

CREATE TABLE IF NOT EXISTS members (
    member_id     TEXT PRIMARY KEY,
    username      TEXT NOT NULL,
    password_hash TEXT NOT NULL,  -- argon2 PHC string
    roles         TEXT NOT NULL DEFAULT '[]',
    created_at    TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS members_username_idx ON members(username);

PRAGMA user_version = 1;
";
