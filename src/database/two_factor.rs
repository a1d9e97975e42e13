use crate::database::postgres_repository::PostgresRepository;
use crate::error::app_error::AppError;
use crate::models::two_factor::hash_code;
use chrono::{DateTime, Utc};
use rand::Rng;
use uuid::Uuid;

impl PostgresRepository {
    /// Generate a 6-digit one-time login code, uniformly distributed over
    /// 100000..=999999.
    pub fn generate_login_code() -> String {
        let mut rng = rand::thread_rng();
        let code: u32 = rng.gen_range(100_000..=999_999);
        code.to_string()
    }

    /// Attach a fresh challenge to the user, replacing any pending one.
    /// Only the digest of the code is stored; both columns move in a single
    /// statement so the set-together invariant holds at every point.
    pub async fn begin_two_factor_challenge(&self, user_id: &Uuid, code: &str, expires_at: DateTime<Utc>) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET two_factor_code_hash = $1, two_factor_expires_at = $2
            WHERE id = $3
            "#,
        )
        .bind(hash_code(code))
        .bind(expires_at)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Clear the pending challenge, consumed or stale alike.
    pub async fn clear_two_factor_challenge(&self, user_id: &Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE users
            SET two_factor_code_hash = NULL, two_factor_expires_at = NULL
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..256 {
            let code = PostgresRepository::generate_login_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert!(!code.starts_with('0'));
        }
    }

    #[test]
    fn consecutive_codes_differ() {
        // 1/900000 collision chance per pair; 8 identical draws in a row
        // would mean the generator is broken.
        let first = PostgresRepository::generate_login_code();
        let all_equal = (0..8).all(|_| PostgresRepository::generate_login_code() == first);
        assert!(!all_equal);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn codes_parse_into_the_expected_range(_seed in 0u32..64) {
                let code = PostgresRepository::generate_login_code();
                let value: u32 = code.parse().expect("numeric code");
                prop_assert!((100_000..=999_999).contains(&value));
            }
        }
    }
}
