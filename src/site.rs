use crate::error::{Result, SpectreError};
use crate::kdf::UserKey;
use crate::types::{AlgorithmVersion, COUNTER_LAST, KeyPurpose};
use crate::version::VersionPolicy;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

pub const SITE_KEY_LEN: usize = 32;

/// HMAC-SHA256 output for one (site, purpose, counter, context) combination.
///
/// Site keys are recomputed on every request and never cached.
pub struct SiteKey {
    data: Zeroizing<[u8; SITE_KEY_LEN]>,
    version: AlgorithmVersion,
}

impl SiteKey {
    pub fn data(&self) -> &[u8; SITE_KEY_LEN] {
        &self.data
    }

    pub fn version(&self) -> AlgorithmVersion {
        self.version
    }

    #[cfg(test)]
    pub(crate) fn from_parts(data: [u8; SITE_KEY_LEN], version: AlgorithmVersion) -> Self {
        Self {
            data: Zeroizing::new(data),
            version,
        }
    }
}

impl fmt::Debug for SiteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteKey")
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

pub fn derive_site_key(
    user_key: &UserKey,
    site_name: &str,
    counter: u64,
    purpose: KeyPurpose,
    context: Option<&str>,
) -> Result<SiteKey> {
    let material = user_key.material()?;
    if site_name.is_empty() {
        return Err(SpectreError::MissingSiteName);
    }
    if !(1..=COUNTER_LAST).contains(&counter) {
        return Err(SpectreError::InvalidCounter(counter));
    }
    // An empty context is treated as absent.
    let context = context.filter(|c| !c.is_empty());

    tracing::trace!(
        version = %user_key.version(),
        %purpose,
        counter,
        has_context = context.is_some(),
        "deriving site key"
    );

    let policy = VersionPolicy::for_version(user_key.version());
    let salt = site_salt(site_name, counter as u32, purpose, context, &policy);

    let Ok(mut mac) = HmacSha256::new_from_slice(material) else {
        unreachable!("HMAC-SHA256 accepts any key size");
    };
    mac.update(&salt);
    let result = mac.finalize().into_bytes();

    let mut data = Zeroizing::new([0u8; SITE_KEY_LEN]);
    data.copy_from_slice(&result);

    Ok(SiteKey {
        data,
        version: user_key.version(),
    })
}

/// `scope | #site_name | site_name | counter [| #context | context]`, with
/// 32-bit big-endian integers.
pub(crate) fn site_salt(
    site_name: &str,
    counter: u32,
    purpose: KeyPurpose,
    context: Option<&str>,
    policy: &VersionPolicy,
) -> Vec<u8> {
    let scope = purpose.scope().as_bytes();
    let context_len = context.map_or(0, |c| 4 + c.len());
    let mut salt = Vec::with_capacity(scope.len() + 4 + site_name.len() + 4 + context_len);

    salt.extend_from_slice(scope);
    salt.extend_from_slice(&policy.site_name_length(site_name).to_be_bytes());
    salt.extend_from_slice(site_name.as_bytes());
    salt.extend_from_slice(&counter.to_be_bytes());

    if let Some(context) = context {
        salt.extend_from_slice(&(context.len() as u32).to_be_bytes());
        salt.extend_from_slice(context.as_bytes());
    }

    salt
}
