//! Per-version byte-encoding rules.
//!
//! Every version-dependent branch of the pipeline goes through [`VersionPolicy`]
//! so that the legacy quirks stay isolated from the general code paths.

use crate::types::AlgorithmVersion;
use zeroize::Zeroizing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionPolicy {
    /// User salt length field counts UTF-8 bytes instead of characters.
    pub user_salt_uses_byte_length: bool,
    /// Site salt length field counts UTF-8 bytes instead of characters.
    pub site_salt_uses_byte_length: bool,
    /// Site key bytes are widened to 16 bits before indexing.
    pub result_uses_16bit_reinterpretation: bool,
}

impl VersionPolicy {
    pub const fn for_version(version: AlgorithmVersion) -> Self {
        let v = version.as_u32();
        Self {
            user_salt_uses_byte_length: v >= 3,
            site_salt_uses_byte_length: v >= 2,
            result_uses_16bit_reinterpretation: v == 0,
        }
    }

    /// Value of the user name length field in the user salt.
    pub fn user_name_length(&self, user_name: &str) -> u32 {
        encoded_length(user_name, self.user_salt_uses_byte_length)
    }

    /// Value of the site name length field in the site salt.
    pub fn site_name_length(&self, site_name: &str) -> u32 {
        encoded_length(site_name, self.site_salt_uses_byte_length)
    }

    /// Seed values used to index templates and alphabets.
    ///
    /// V0 sign-extended each byte to 16 bits and then read the big-endian
    /// encoding back in host (little-endian) order, so byte `b` becomes
    /// `b << 8 | (0xFF if b > 127 else 0x00)`.
    pub fn seed_values(&self, site_key: &[u8]) -> Zeroizing<Vec<u16>> {
        let seeds: Vec<u16> = if self.result_uses_16bit_reinterpretation {
            site_key
                .iter()
                .map(|&b| {
                    let low = if b > 127 { 0x00FF } else { 0x0000 };
                    (u16::from(b) << 8) | low
                })
                .collect()
        } else {
            site_key.iter().map(|&b| u16::from(b)).collect()
        };
        Zeroizing::new(seeds)
    }
}

fn encoded_length(s: &str, byte_length: bool) -> u32 {
    let len = if byte_length {
        s.len()
    } else {
        s.chars().count()
    };
    len as u32
}
