use crate::error::{Result, SpectreError};
use crate::kdf::UserKey;
use crate::site::{SiteKey, derive_site_key};
use crate::tables::AlgorithmTables;
use crate::types::{KeyPurpose, ResultType};
use crate::version::VersionPolicy;
use zeroize::Zeroizing;

/// Renders a site key through the template set registered for `result_type`.
///
/// Seed 0 picks the template; seed `i + 1` picks the character for template
/// position `i` from that position's class alphabet.
pub fn encode_result(
    site_key: &SiteKey,
    result_type: ResultType,
    tables: &AlgorithmTables,
) -> Result<Zeroizing<String>> {
    let templates = tables
        .templates(result_type)
        .ok_or(SpectreError::UnsupportedResultType(result_type.bits()))?;

    let policy = VersionPolicy::for_version(site_key.version());
    let seeds = policy.seed_values(site_key.data());

    let template = templates[usize::from(seeds[0]) % templates.len()].as_bytes();
    // Templates are at most 20 characters, well within the 31 remaining seeds.
    debug_assert!(template.len() < seeds.len());

    let mut result = Zeroizing::new(String::with_capacity(template.len()));
    for (i, &class) in template.iter().enumerate() {
        let alphabet = tables
            .characters(class)
            .ok_or(SpectreError::UnsupportedResultType(result_type.bits()))?;
        let index = usize::from(seeds[i + 1]) % alphabet.len();
        result.push(char::from(alphabet[index]));
    }

    Ok(result)
}

/// Validates the result type, then derives the site key and renders it.
pub fn site_result(
    user_key: &UserKey,
    site_name: &str,
    result_type: ResultType,
    counter: u64,
    purpose: KeyPurpose,
    context: Option<&str>,
    tables: &AlgorithmTables,
) -> Result<Zeroizing<String>> {
    if tables.templates(result_type).is_none() {
        return Err(SpectreError::UnsupportedResultType(result_type.bits()));
    }

    tracing::debug!(%result_type, %purpose, counter, "generating site result");

    let site_key = derive_site_key(user_key, site_name, counter, purpose, context)?;
    encode_result(&site_key, result_type, tables)
}
