//! Error kinds reported by the derivation pipeline.

use thiserror::Error;

/// Errors produced by the derivation operations.
///
/// Validation errors are raised before any cryptographic work and are a
/// deterministic function of the caller's input, so retrying never helps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpectreError {
    /// The requested algorithm version is outside `[V0, V3]`.
    #[error("unsupported algorithm version: {0}")]
    InvalidVersion(u32),

    #[error("missing user name")]
    MissingUserName,

    #[error("missing user secret")]
    MissingUserSecret,

    /// The user key has been wiped and can no longer key a site derivation.
    #[error("missing user key")]
    MissingUserKey,

    #[error("missing site name")]
    MissingSiteName,

    /// The counter is outside `[1, 2^32 - 1]`.
    #[error("invalid counter value: {0}")]
    InvalidCounter(u64),

    /// The result type has no registered template set.
    #[error("unsupported result type: {0}")]
    UnsupportedResultType(u32),

    /// The session was invalidated; a new user key must be derived.
    #[error("user logged out")]
    UserLoggedOut,

    /// The scrypt primitive rejected its parameters or output buffer.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),
}

impl SpectreError {
    /// Name of the input field that caused the error, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidVersion(_) => Some("algorithm_version"),
            Self::MissingUserName => Some("user_name"),
            Self::MissingUserSecret => Some("user_secret"),
            Self::MissingUserKey => Some("user_key"),
            Self::MissingSiteName => Some("site_name"),
            Self::InvalidCounter(_) => Some("key_counter"),
            Self::UnsupportedResultType(_) => Some("result_type"),
            Self::UserLoggedOut => Some("invalidate"),
            Self::KeyDerivation(_) => None,
        }
    }
}

pub type Result<T, E = SpectreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_named() {
        assert_eq!(
            SpectreError::InvalidVersion(4).field(),
            Some("algorithm_version")
        );
        assert_eq!(SpectreError::MissingSiteName.field(), Some("site_name"));
        assert_eq!(SpectreError::InvalidCounter(0).field(), Some("key_counter"));
        assert_eq!(SpectreError::KeyDerivation("oom".into()).field(), None);
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            SpectreError::InvalidVersion(7).to_string(),
            "unsupported algorithm version: 7"
        );
        assert_eq!(
            SpectreError::InvalidCounter(4294967296).to_string(),
            "invalid counter value: 4294967296"
        );
        assert_eq!(SpectreError::UserLoggedOut.to_string(), "user logged out");
    }
}
