//! Member registration and credential verification.
//!
//! Passwords are hashed with argon2 into PHC strings before they reach the
//! store; plaintext never leaves the handler.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::{Json, extract::State, http::StatusCode};
use rand_core::OsRng;
use serde::Deserialize;

use divvy_core::{
  member::{MemberRecord, NewMember},
  scraper::Scraper,
  store::{CompanyStore, DividendStore, MemberStore, StoreError},
};

use crate::{AppState, error::ApiError};

/// Hash a plaintext password into a PHC string, e.g. `$argon2id$v=19$…`.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map_err(|e| ApiError::Internal(e.to_string().into()))?;
  Ok(hash.to_string())
}

// ─── Signup ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SignupBody {
  pub username: String,
  pub password: String,
  #[serde(default)]
  pub roles:    Vec<String>,
}

/// `POST /auth/signup` — register a member; 201 + the stored record (hash
/// withheld).
pub async fn signup<C, D, S, M>(
  State(state): State<AppState<C, D, S, M>>,
  Json(body): Json<SignupBody>,
) -> Result<(StatusCode, Json<MemberRecord>), ApiError>
where
  C: CompanyStore + 'static,
  D: DividendStore + 'static,
  S: Scraper + 'static,
  M: MemberStore + 'static,
{
  if state
    .members
    .find_by_username(&body.username)
    .await
    .map_err(internal)?
    .is_some()
  {
    return Err(ApiError::Conflict(format!(
      "username already exists: {}",
      body.username
    )));
  }

  let member = NewMember {
    username:      body.username,
    password_hash: hash_password(&body.password)?,
    roles:         body.roles,
  };
  let record = match state.members.save(member).await {
    Ok(record) => record,
    // Concurrent signups can both pass the pre-check; the unique index on
    // username decides.
    Err(e) if e.is_unique_violation() => {
      return Err(ApiError::Conflict("username already exists".to_owned()));
    }
    Err(e) => return Err(internal(e)),
  };

  tracing::info!(username = %record.username, "registered member");
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Signin ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SigninBody {
  pub username: String,
  pub password: String,
}

/// `POST /auth/signin` — verify credentials; the member record on success,
/// 401 otherwise. Unknown usernames and bad passwords are
/// indistinguishable to the caller.
pub async fn signin<C, D, S, M>(
  State(state): State<AppState<C, D, S, M>>,
  Json(body): Json<SigninBody>,
) -> Result<Json<MemberRecord>, ApiError>
where
  C: CompanyStore + 'static,
  D: DividendStore + 'static,
  S: Scraper + 'static,
  M: MemberStore + 'static,
{
  let record = state
    .members
    .find_by_username(&body.username)
    .await
    .map_err(internal)?
    .ok_or(ApiError::Unauthorized)?;

  let parsed_hash =
    PasswordHash::new(&record.password_hash).map_err(|_| ApiError::Unauthorized)?;
  Argon2::default()
    .verify_password(body.password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  tracing::info!(username = %record.username, "member signed in");
  Ok(Json(record))
}

fn internal<E: StoreError>(e: E) -> ApiError {
  ApiError::Internal(Box::new(e))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::extract::State;

  use divvy_core::{
    company::Company,
    dividend::DividendFact,
    ingest::IngestService,
    keyword::KeywordAdmin,
    scraper::Scraper,
    trie::KeywordIndex,
  };
  use divvy_store_sqlite::SqliteStore;

  use super::*;

  #[derive(Clone)]
  struct NoScraper;

  impl Scraper for NoScraper {
    type Error = std::convert::Infallible;

    async fn fetch_company(&self, _ticker: &str) -> Result<Option<Company>, Self::Error> {
      Ok(None)
    }

    async fn fetch_dividends(&self, _company: &Company) -> Result<Vec<DividendFact>, Self::Error> {
      Ok(vec![])
    }
  }

  type TestState = AppState<SqliteStore, SqliteStore, NoScraper, SqliteStore>;

  async fn make_state() -> TestState {
    let store = SqliteStore::open_in_memory().await.expect("store");
    AppState {
      service:  Arc::new(IngestService::new(store.clone(), store.clone(), NoScraper)),
      keywords: KeywordAdmin::new(Arc::new(KeywordIndex::new())),
      members:  Arc::new(store),
    }
  }

  fn signup_body(username: &str, password: &str) -> SignupBody {
    SignupBody {
      username: username.to_owned(),
      password: password.to_owned(),
      roles:    vec!["ROLE_READ".to_owned()],
    }
  }

  #[tokio::test]
  async fn signup_then_signin_round_trip() {
    let state = make_state().await;

    let (status, created) = signup(
      State(state.clone()),
      Json(signup_body("alice", "hunter2")),
    )
    .await
    .expect("signup");
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.username, "alice");
    assert_eq!(created.roles, vec!["ROLE_READ"]);

    let signed_in = signin(
      State(state),
      Json(SigninBody {
        username: "alice".into(),
        password: "hunter2".into(),
      }),
    )
    .await
    .expect("signin");
    assert_eq!(signed_in.member_id, created.member_id);
  }

  #[tokio::test]
  async fn wrong_password_is_unauthorized() {
    let state = make_state().await;
    signup(State(state.clone()), Json(signup_body("alice", "hunter2")))
      .await
      .expect("signup");

    let err = signin(
      State(state),
      Json(SigninBody {
        username: "alice".into(),
        password: "wrong".into(),
      }),
    )
    .await
    .err()
    .expect("unauthorized");
    assert!(matches!(err, ApiError::Unauthorized));
  }

  #[tokio::test]
  async fn unknown_user_is_unauthorized() {
    let state = make_state().await;

    let err = signin(
      State(state),
      Json(SigninBody {
        username: "nobody".into(),
        password: "whatever".into(),
      }),
    )
    .await
    .err()
    .expect("unauthorized");
    assert!(matches!(err, ApiError::Unauthorized));
  }

  #[tokio::test]
  async fn duplicate_username_is_a_conflict() {
    let state = make_state().await;
    signup(State(state.clone()), Json(signup_body("alice", "hunter2")))
      .await
      .expect("signup");

    let err = signup(State(state), Json(signup_body("alice", "other")))
      .await
      .err()
      .expect("conflict");
    assert!(matches!(err, ApiError::Conflict(_)));
  }

  #[test]
  fn hashes_are_salted_phc_strings() {
    let a = hash_password("secret").expect("hash");
    let b = hash_password("secret").expect("hash");
    assert!(a.starts_with("$argon2"));
    assert_ne!(a, b);
  }
}
