use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Persisted session token. Only the SHA-256 digest of the bearer value is
/// stored; the plaintext is returned to the client exactly once.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Label given to tokens minted by the login/registration flow.
pub const AUTH_TOKEN_NAME: &str = "auth_token";
