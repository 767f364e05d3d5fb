//! Member accounts — username plus hashed password, nothing fancier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Input for member registration.
///
/// `password_hash` is a PHC string produced by the caller; the store never
/// sees a plaintext password.
#[derive(Debug, Clone)]
pub struct NewMember {
  pub username:      String,
  pub password_hash: String,
  pub roles:         Vec<String>,
}

/// A persisted member row. The password hash is never serialised out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRecord {
  pub member_id:     Uuid,
  pub username:      String,
  #[serde(skip_serializing, default)]
  pub password_hash: String,
  pub roles:         Vec<String>,
  pub created_at:    DateTime<Utc>,
}
