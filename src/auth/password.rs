use crate::error::AppError;
use bcrypt::{hash, verify};
use validator::ValidationError;

/// bcrypt only reads this many bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Rejects empty passwords and passwords bcrypt would silently truncate.
///
/// Used with `#[validate(custom = "validate_password")]`. Overlong passwords report the
/// `length` code so they read as "maximum length exceeded".
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::new("required"));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::new("length"));
    }
    Ok(())
}

/// Hashes a password with bcrypt.
///
/// # Arguments
/// * `password` - The plain-text password, at most `MAX_PASSWORD_BYTES` long.
/// * `cost` - The bcrypt work factor.
///
/// # Returns
/// The bcrypt digest, or `AppError::Hash` if the password is too long or hashing fails.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::Hash("password exceeds 72 bytes".into()));
    }
    hash(password, cost).map_err(AppError::from)
}

/// Checks `candidate` against a bcrypt digest.
///
/// A malformed digest or a candidate longer than `MAX_PASSWORD_BYTES` is a mismatch,
/// not an error, so a longer string sharing the first 72 bytes never matches.
pub fn verify_password(digest: &str, candidate: &str) -> bool {
    if candidate.len() > MAX_PASSWORD_BYTES {
        return false;
    }
    verify(candidate, digest).unwrap_or_else(|e| {
        log::warn!("rejecting password check against malformed digest: {}", e);
        false
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bcrypt::DEFAULT_COST;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_password_hashing_and_verification() {
        let password = "secret123";
        let hashed = hash_password(password, TEST_COST).unwrap();

        assert_ne!(hashed, password);
        assert!(verify_password(&hashed, password));
        assert!(!verify_password(&hashed, "secret123x"));
    }

    #[test]
    fn test_verify_with_invalid_hash() {
        assert!(!verify_password("invalidhashformat", "secret123"));
        assert!(!verify_password("", "secret123"));
    }

    #[test]
    fn test_invalid_cost_is_a_hash_error() {
        assert!(matches!(
            hash_password("secret123", DEFAULT_COST + 100),
            Err(AppError::Hash(_))
        ));
    }

    #[test]
    fn test_suffix_past_72_bytes_does_not_match() {
        let password = "a".repeat(MAX_PASSWORD_BYTES);
        let hashed = hash_password(&password, TEST_COST).unwrap();

        assert!(verify_password(&hashed, &password));
        assert!(!verify_password(&hashed, &format!("{}x", password)));
    }

    #[test]
    fn test_overlong_password_is_not_hashed() {
        assert!(matches!(
            hash_password(&"a".repeat(MAX_PASSWORD_BYTES + 1), TEST_COST),
            Err(AppError::Hash(_))
        ));
    }

    #[test]
    fn test_validate_password_counts_bytes() {
        assert!(validate_password("secret123").is_ok());
        assert!(validate_password(&"a".repeat(MAX_PASSWORD_BYTES)).is_ok());
        assert_eq!(validate_password("").unwrap_err().code, "required");
        // 37 two-byte characters: under 72 chars, over 72 bytes.
        assert_eq!(validate_password(&"é".repeat(37)).unwrap_err().code, "length");
    }
}
