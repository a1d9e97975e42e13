use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// User row. The pending two-factor pair is set together by a login and
/// cleared together by a successful verification; the schema enforces that
/// neither column is ever set alone.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub two_factor_code_hash: Option<String>,
    pub two_factor_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// User as returned to clients. Never includes the password hash or the
/// pending verification fields.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Password confirmation does not match."))]
    pub password_confirmation: String,
    /// Optional role name; must exist in the role catalogue.
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Returned by a password-accepted login: the challenge is pending and the
/// code travels out-of-band. Never carries the code itself.
#[derive(Debug, Serialize, JsonSchema)]
pub struct LoginPendingResponse {
    pub message: String,
    pub user_id: Uuid,
    pub email: String,
}

/// Returned once a session token has been issued (registration or a
/// verified login). The token value appears here exactly once.
#[derive(Debug, Serialize, JsonSchema)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserResponse,
    pub token: String,
}

pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let estimate = zxcvbn::zxcvbn(password, &[]);
    if estimate.score() < zxcvbn::Score::Three {
        return Err(ValidationError::new("password_strength").with_message("Password is too easy to guess.".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_request(password: &str, confirmation: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: password.to_string(),
            password_confirmation: confirmation.to_string(),
            role: None,
        }
    }

    #[test]
    fn register_accepts_strong_confirmed_password() {
        let request = register_request("correct-horse-battery", "correct-horse-battery");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn register_rejects_mismatched_confirmation() {
        let request = register_request("correct-horse-battery", "wrong-horse-battery");
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password_confirmation"));
    }

    #[test]
    fn register_rejects_weak_password() {
        let request = register_request("password", "password");
        assert!(request.validate().is_err());
    }

    #[test]
    fn user_response_omits_secrets() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: "user".to_string(),
            two_factor_code_hash: Some("deadbeef".to_string()),
            two_factor_expires_at: Some(Utc::now()),
            created_at: Utc::now(),
        };
        let serialized = serde_json::to_string(&UserResponse::from(&user)).expect("serialize");
        assert!(!serialized.contains("argon2"));
        assert!(!serialized.contains("deadbeef"));
    }
}
