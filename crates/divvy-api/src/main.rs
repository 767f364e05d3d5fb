//! divvy API server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, seeds the autocomplete index from the stored
//! company names, and serves the JSON API over HTTP.
//!
//! # Password hash generation
//!
//! To produce an argon2 PHC string without going through `/auth/signup`:
//!
//! ```
//! cargo run -p divvy-api --bin server -- --hash-password
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use divvy_api::{AppState, ServerConfig};
use divvy_core::{
  ingest::IngestService,
  keyword::KeywordAdmin,
  store::CompanyStore,
  trie::KeywordIndex,
};
use divvy_scrape::YahooScraper;
use divvy_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "divvy dividend API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = password_from_stdin()?;
    let hash = divvy_api::auth::hash_password(&password)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?;
    println!("{hash}");
    return Ok(());
  }

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("DIVVY"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Expand `~` in store path.
  let store_path = expand_tilde(&server_cfg.store_path);

  // Open SQLite store.
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let scraper = YahooScraper::with_base_url(&server_cfg.scrape_base_url)
    .context("failed to build scraper client")?;

  // The autocomplete index lives in memory only; rebuild it from the
  // stored company names on every boot.
  let index = Arc::new(KeywordIndex::new());
  let seeded = seed_keywords(&store, &index)
    .await
    .context("failed to seed autocomplete index")?;
  tracing::info!(companies = seeded, "seeded autocomplete index");

  // Build application state.
  let state = AppState {
    service:  Arc::new(IngestService::new(store.clone(), store.clone(), scraper)),
    keywords: KeywordAdmin::new(index),
    members:  Arc::new(store),
  };

  let app = divvy_api::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Page through every stored company and insert its name into the index.
async fn seed_keywords(store: &SqliteStore, index: &KeywordIndex) -> anyhow::Result<u64> {
  const PAGE: u64 = 500;
  let mut offset = 0;
  loop {
    let page = store.find_all(offset, PAGE).await?;
    for record in &page.items {
      index.insert(&record.name);
    }
    offset += page.items.len() as u64;
    if offset >= page.total || page.items.is_empty() {
      return Ok(offset);
    }
  }
}

/// Read a password from stdin.
fn password_from_stdin() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
