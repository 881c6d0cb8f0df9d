/// Why a caller was refused the admin capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing x-api-key header")]
    Missing,
    #[error("Invalid API key")]
    Invalid,
    /// No admin key is configured, so nobody may mutate content
    #[error("Content changes are disabled")]
    NotConfigured,
}

/// Header carrying the admin key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Validates the provided admin key against the configured one.
///
/// Returns `Ok(())` if the key matches. The comparison does not short-circuit on the
/// first differing byte.
pub fn validate_api_key(provided: Option<&str>, expected: Option<&str>) -> Result<(), AuthError> {
    let expected = expected
        .filter(|k| !k.is_empty())
        .ok_or(AuthError::NotConfigured)?;
    let provided = provided.ok_or(AuthError::Missing)?;

    if constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        Err(AuthError::Invalid)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
