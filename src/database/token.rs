use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::token::ApiToken;
use crate::models::user::User;
use rand::Rng;
use sha2::{Digest, Sha256};
use uuid::Uuid;

impl PostgresRepository {
    /// Generate an opaque bearer token. Returns (plain, hash); the plain
    /// value goes to the client once, the hash to the database.
    pub fn generate_session_token() -> (String, String) {
        let mut rng = rand::thread_rng();
        let token_bytes: [u8; 32] = rng.r#gen();
        let token = hex::encode(token_bytes);

        (token.clone(), hash_token(&token))
    }

    /// Mint a session token for the user and return the plaintext value.
    pub async fn create_session_token(&self, user_id: &Uuid, name: &str) -> Result<String, AppError> {
        let (token, token_hash) = Self::generate_session_token();

        let row = sqlx::query_as::<_, ApiToken>(
            r#"
            INSERT INTO api_tokens (user_id, token_hash, name)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, token_hash, name, created_at
            "#,
        )
        .bind(user_id)
        .bind(&token_hash)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!("Issued session token {} for user {}", row.id, row.user_id);

        Ok(token)
    }

    /// Resolve a bearer token to its owning user, if any.
    pub async fn get_user_by_token(&self, token: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.email, u.password_hash, u.role, u.two_factor_code_hash, u.two_factor_expires_at, u.created_at
            FROM api_tokens t
            JOIN users u ON u.id = t.user_id
            WHERE t.token_hash = $1
            "#,
        )
        .bind(hash_token(token))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

}

pub(crate) fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_are_64_hex_chars() {
        let (token, token_hash) = PostgresRepository::generate_session_token();

        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));

        // Hash is SHA-256 of the plain token, also 64 hex chars.
        assert_eq!(token_hash.len(), 64);
        assert_eq!(token_hash, hash_token(&token));
        assert_ne!(token, token_hash);
    }

    #[test]
    fn tokens_are_unique_per_call() {
        let (first, _) = PostgresRepository::generate_session_token();
        let (second, _) = PostgresRepository::generate_session_token();
        assert_ne!(first, second);
    }
}
