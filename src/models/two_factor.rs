use chrono::{DateTime, Utc};
use rocket::serde::Deserialize;
use schemars::JsonSchema;
use sha2::{Digest, Sha256};
use std::sync::LazyLock;
use uuid::Uuid;
use validator::Validate;

static CODE_FORMAT: LazyLock<regex::Regex> = LazyLock::new(|| regex::Regex::new(r"^[0-9]{6}$").expect("valid code regex"));

/// Request to verify a pending login challenge.
#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct TwoFactorVerifyRequest {
    pub user_id: Uuid,
    /// 6-digit code delivered by email
    #[validate(regex(path = "CODE_FORMAT", message = "Code must be exactly 6 digits."))]
    pub two_factor_code: String,
}

/// The (code hash, expiry) pair attached to a user between password success
/// and code confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingChallenge {
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// Outcome of evaluating a submitted code against a user's stored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeOutcome {
    /// Code matched before expiry; a session token may be issued.
    Verified,
    /// A live challenge exists but the code did not match. The challenge
    /// stays in place for further attempts.
    CodeMismatch,
    /// No challenge, no expiry, or the expiry has passed. Callers must not
    /// reveal which.
    ExpiredOrUnset,
}

impl PendingChallenge {
    /// Reassemble a challenge from the two nullable user columns. The schema
    /// guarantees both-or-neither, but a row observed mid-migration is
    /// treated as having no challenge.
    pub fn from_columns(code_hash: Option<String>, expires_at: Option<DateTime<Utc>>) -> Option<Self> {
        match (code_hash, expires_at) {
            (Some(code_hash), Some(expires_at)) => Some(Self { code_hash, expires_at }),
            _ => None,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Evaluate a submitted code at the given instant. Takes `now` as an
    /// argument so expiry behavior is testable without real sleeps.
    pub fn verify(&self, submitted_code: &str, now: DateTime<Utc>) -> ChallengeOutcome {
        if self.is_expired(now) {
            return ChallengeOutcome::ExpiredOrUnset;
        }

        if constant_time_eq(hash_code(submitted_code).as_bytes(), self.code_hash.as_bytes()) {
            ChallengeOutcome::Verified
        } else {
            ChallengeOutcome::CodeMismatch
        }
    }
}

/// Evaluate the full stored state, treating a missing challenge the same as
/// an expired one.
pub fn evaluate_challenge(challenge: Option<&PendingChallenge>, submitted_code: &str, now: DateTime<Utc>) -> ChallengeOutcome {
    match challenge {
        Some(challenge) => challenge.verify(submitted_code, now),
        None => ChallengeOutcome::ExpiredOrUnset,
    }
}

/// SHA-256 digest of a one-time code, hex encoded. Only digests are stored;
/// the plaintext code exists in the email and nowhere else.
pub fn hash_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}

/// Byte comparison that does not short-circuit on the first mismatch, so the
/// comparison time leaks nothing about how much of the digest matched.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn challenge_for(code: &str, expires_at: DateTime<Utc>) -> PendingChallenge {
        PendingChallenge {
            code_hash: hash_code(code),
            expires_at,
        }
    }

    #[test]
    fn correct_code_before_expiry_verifies() {
        let challenge = challenge_for("123456", at(600));
        assert_eq!(challenge.verify("123456", at(0)), ChallengeOutcome::Verified);
    }

    #[test]
    fn correct_code_at_exact_expiry_still_verifies() {
        // Expiry is inclusive: "current time past the stored expiry" fails,
        // equal does not.
        let challenge = challenge_for("123456", at(600));
        assert_eq!(challenge.verify("123456", at(600)), ChallengeOutcome::Verified);
    }

    #[test]
    fn correct_code_after_expiry_is_rejected_as_expired() {
        let challenge = challenge_for("123456", at(600));
        assert_eq!(challenge.verify("123456", at(601)), ChallengeOutcome::ExpiredOrUnset);
    }

    #[test]
    fn wrong_code_before_expiry_is_a_mismatch() {
        let challenge = challenge_for("123456", at(600));
        assert_eq!(challenge.verify("654321", at(0)), ChallengeOutcome::CodeMismatch);
    }

    #[test]
    fn wrong_code_after_expiry_reports_expired_not_mismatch() {
        let challenge = challenge_for("123456", at(600));
        assert_eq!(challenge.verify("654321", at(601)), ChallengeOutcome::ExpiredOrUnset);
    }

    #[test]
    fn missing_challenge_reports_expired_or_unset() {
        assert_eq!(evaluate_challenge(None, "123456", at(0)), ChallengeOutcome::ExpiredOrUnset);
    }

    #[test]
    fn half_set_columns_count_as_no_challenge() {
        assert!(PendingChallenge::from_columns(Some(hash_code("123456")), None).is_none());
        assert!(PendingChallenge::from_columns(None, Some(at(600))).is_none());
        assert!(PendingChallenge::from_columns(None, None).is_none());
    }

    #[test]
    fn overwritten_challenge_invalidates_the_earlier_code() {
        // Two logins in a row: only the second code verifies.
        let first = challenge_for("111111", at(600));
        let second = challenge_for("222222", first.expires_at + Duration::seconds(30));
        assert_eq!(second.verify("111111", at(0)), ChallengeOutcome::CodeMismatch);
        assert_eq!(second.verify("222222", at(0)), ChallengeOutcome::Verified);
    }

    #[test]
    fn constant_time_eq_basic_properties() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn hash_code_is_hex_sha256() {
        let digest = hash_code("123456");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        // Digest differs from its input and is stable.
        assert_ne!(digest, "123456");
        assert_eq!(digest, hash_code("123456"));
    }

    #[test]
    fn code_format_accepts_exactly_six_digits() {
        for code in ["123456", "000000", "999999"] {
            assert!(CODE_FORMAT.is_match(code), "{code} should match");
        }
        for code in ["12345", "1234567", "12a456", "", " 23456"] {
            assert!(!CODE_FORMAT.is_match(code), "{code} should not match");
        }
    }
}
