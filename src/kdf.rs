use crate::error::{Result, SpectreError};
use crate::types::{AlgorithmVersion, KeyPurpose};
use crate::version::VersionPolicy;
use std::fmt;
use zeroize::Zeroizing;

pub const USER_KEY_LEN: usize = 64;

/// scrypt cost parameters.
///
/// Only [`ScryptConfig::REFERENCE`] produces keys compatible with other
/// implementations; it is the only configuration the deriver accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScryptConfig {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

impl ScryptConfig {
    pub const REFERENCE: Self = Self {
        log_n: 15,
        r: 8,
        p: 2,
    };

    pub fn cost(&self) -> u64 {
        1u64 << self.log_n
    }

    /// Working-set size of one scrypt lane, `128 * r * N` bytes.
    pub fn memory_mib(&self) -> u64 {
        128 * u64::from(self.r) * self.cost() / (1024 * 1024)
    }
}

/// 64 bytes of scrypt output keying every site derivation of one identity.
///
/// The key starts out active; [`UserKey::invalidate`] wipes the material and
/// the key can never be used again.
pub struct UserKey {
    material: Option<Zeroizing<[u8; USER_KEY_LEN]>>,
    version: AlgorithmVersion,
}

impl UserKey {
    pub fn version(&self) -> AlgorithmVersion {
        self.version
    }

    pub fn is_active(&self) -> bool {
        self.material.is_some()
    }

    pub fn invalidate(&mut self) {
        self.material = None;
    }

    pub(crate) fn material(&self) -> Result<&[u8; USER_KEY_LEN]> {
        self.material
            .as_deref()
            .ok_or(SpectreError::MissingUserKey)
    }
}

impl fmt::Debug for UserKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserKey")
            .field("version", &self.version)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

pub fn derive_user_key(
    user_name: &str,
    user_secret: &str,
    version: AlgorithmVersion,
) -> Result<UserKey> {
    if user_name.is_empty() {
        return Err(SpectreError::MissingUserName);
    }
    if user_secret.is_empty() {
        return Err(SpectreError::MissingUserSecret);
    }

    tracing::debug!(%version, "deriving user key");

    let policy = VersionPolicy::for_version(version);
    let salt = user_salt(user_name, &policy);

    let config = ScryptConfig::REFERENCE;
    let params = scrypt::Params::new(config.log_n, config.r, config.p, USER_KEY_LEN)
        .map_err(|e| SpectreError::KeyDerivation(format!("invalid scrypt parameters: {}", e)))?;

    let mut material = Zeroizing::new([0u8; USER_KEY_LEN]);
    scrypt::scrypt(user_secret.as_bytes(), &salt, &params, &mut material[..])
        .map_err(|e| SpectreError::KeyDerivation(format!("scrypt derivation failed: {}", e)))?;

    Ok(UserKey {
        material: Some(material),
        version,
    })
}

/// `scope | #user_name | user_name`, with a 32-bit big-endian length field.
pub(crate) fn user_salt(user_name: &str, policy: &VersionPolicy) -> Vec<u8> {
    let scope = KeyPurpose::Authentication.scope().as_bytes();
    let mut salt = Vec::with_capacity(scope.len() + 4 + user_name.len());

    salt.extend_from_slice(scope);
    salt.extend_from_slice(&policy.user_name_length(user_name).to_be_bytes());
    salt.extend_from_slice(user_name.as_bytes());

    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_NAME: &str = "Robert Lee Mitchell";
    const USER_SECRET: &str = "banana colored duckling";

    #[test]
    fn test_missing_inputs() {
        let result = derive_user_key("", USER_SECRET, AlgorithmVersion::V3);
        assert_eq!(result.unwrap_err(), SpectreError::MissingUserName);

        let result = derive_user_key(USER_NAME, "", AlgorithmVersion::V3);
        assert_eq!(result.unwrap_err(), SpectreError::MissingUserSecret);

        let result = derive_user_key("", "", AlgorithmVersion::V3);
        assert_eq!(result.unwrap_err(), SpectreError::MissingUserName);
    }

    #[test]
    fn test_reference_config() {
        let config = ScryptConfig::REFERENCE;
        assert_eq!(config.cost(), 32768);
        assert_eq!(config.r, 8);
        assert_eq!(config.p, 2);
        assert_eq!(config.memory_mib(), 32);
    }

    #[test]
    fn test_user_salt_layout() {
        let v3 = VersionPolicy::for_version(AlgorithmVersion::V3);
        let salt = user_salt("User", &v3);

        let mut expected = b"com.lyndir.masterpassword".to_vec();
        expected.extend_from_slice(&hex::decode("00000004").unwrap());
        expected.extend_from_slice(b"User");
        assert_eq!(salt, expected);
    }

    #[test]
    fn test_user_salt_multibyte_length() {
        let v2 = VersionPolicy::for_version(AlgorithmVersion::V2);
        let v3 = VersionPolicy::for_version(AlgorithmVersion::V3);

        let salt_v2 = user_salt("⛄", &v2);
        let salt_v3 = user_salt("⛄", &v3);

        let scope_len = "com.lyndir.masterpassword".len();
        assert_eq!(hex::encode(&salt_v2[scope_len..]), "00000001e29b84");
        assert_eq!(hex::encode(&salt_v3[scope_len..]), "00000003e29b84");
    }

    #[test]
    fn test_deterministic_derivation() {
        let key1 = derive_user_key(USER_NAME, USER_SECRET, AlgorithmVersion::V3).unwrap();
        let key2 = derive_user_key(USER_NAME, USER_SECRET, AlgorithmVersion::V3).unwrap();

        assert_eq!(key1.material().unwrap(), key2.material().unwrap());
        assert_eq!(key1.material().unwrap().len(), USER_KEY_LEN);
        assert_eq!(key1.version(), AlgorithmVersion::V3);
    }

    #[test]
    fn test_different_secrets_different_keys() {
        let key1 = derive_user_key(USER_NAME, USER_SECRET, AlgorithmVersion::V3).unwrap();
        let key2 = derive_user_key(USER_NAME, "banana colored duckling!", AlgorithmVersion::V3)
            .unwrap();

        assert_ne!(key1.material().unwrap(), key2.material().unwrap());
    }

    #[test]
    fn test_ascii_name_same_key_across_versions() {
        let key_v2 = derive_user_key(USER_NAME, USER_SECRET, AlgorithmVersion::V2).unwrap();
        let key_v3 = derive_user_key(USER_NAME, USER_SECRET, AlgorithmVersion::V3).unwrap();

        assert_eq!(key_v2.material().unwrap(), key_v3.material().unwrap());
        assert_ne!(key_v2.version(), key_v3.version());
    }

    #[test]
    fn test_multibyte_name_key_changes_at_v3() {
        let key_v2 = derive_user_key("⛄", USER_SECRET, AlgorithmVersion::V2).unwrap();
        let key_v3 = derive_user_key("⛄", USER_SECRET, AlgorithmVersion::V3).unwrap();

        assert_ne!(key_v2.material().unwrap(), key_v3.material().unwrap());
    }

    #[test]
    fn test_invalidate_wipes_material() {
        let mut key = derive_user_key(USER_NAME, USER_SECRET, AlgorithmVersion::V3).unwrap();
        assert!(key.is_active());

        key.invalidate();
        assert!(!key.is_active());
        assert_eq!(key.material().unwrap_err(), SpectreError::MissingUserKey);

        let debug = format!("{:?}", key);
        assert!(debug.contains("active: false"));
    }
}
