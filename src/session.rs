//! Long-lived user identity.
//!
//! A [`SpectreUser`] derives its user key once and then answers any number of
//! site requests until it is invalidated. Invalidation is terminal: the key
//! material is wiped and every later request fails with
//! [`SpectreError::UserLoggedOut`].

use crate::error::{Result, SpectreError};
use crate::generator::site_result;
use crate::identicon::{Identicon, generate_identicon};
use crate::kdf::{UserKey, derive_user_key};
use crate::tables::AlgorithmTables;
use crate::types::{AlgorithmVersion, COUNTER_DEFAULT, KeyPurpose, ResultType};
use std::fmt;
use zeroize::Zeroizing;

enum SessionState {
    Active(UserKey),
    Invalidated,
}

/// Per-request options for [`SpectreUser::password`], [`SpectreUser::login`]
/// and [`SpectreUser::answer`].
#[derive(Debug, Clone, Copy)]
pub struct SiteParams<'a> {
    /// Falls back to the purpose's default type when unset.
    pub result_type: Option<ResultType>,
    pub counter: u64,
    pub context: Option<&'a str>,
}

impl Default for SiteParams<'_> {
    fn default() -> Self {
        Self {
            result_type: None,
            counter: COUNTER_DEFAULT,
            context: None,
        }
    }
}

pub struct SpectreUser<'t> {
    user_name: String,
    algorithm_version: AlgorithmVersion,
    identicon: Identicon,
    state: SessionState,
    tables: &'t AlgorithmTables,
}

impl fmt::Debug for SpectreUser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectreUser")
            .field("user_name", &self.user_name)
            .field("algorithm_version", &self.algorithm_version)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl<'t> SpectreUser<'t> {
    /// Derives the user key. This runs the memory-hard KDF and blocks for
    /// its full duration; callers with an event loop should run it on a
    /// worker thread.
    pub fn new(
        user_name: &str,
        user_secret: &str,
        algorithm_version: AlgorithmVersion,
        tables: &'t AlgorithmTables,
    ) -> Result<Self> {
        let user_key = derive_user_key(user_name, user_secret, algorithm_version)?;
        let identicon = generate_identicon(user_name, user_secret, tables);

        tracing::debug!(version = %algorithm_version, "user session active");

        Ok(Self {
            user_name: user_name.to_owned(),
            algorithm_version,
            identicon,
            state: SessionState::Active(user_key),
            tables,
        })
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn algorithm_version(&self) -> AlgorithmVersion {
        self.algorithm_version
    }

    pub fn identicon(&self) -> Identicon {
        self.identicon
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    /// Wipes the user key. There is no way back to the active state.
    pub fn invalidate(&mut self) {
        if let SessionState::Active(user_key) = &mut self.state {
            user_key.invalidate();
        }
        self.state = SessionState::Invalidated;
        tracing::debug!("user session invalidated");
    }

    pub fn password(&self, site_name: &str, params: &SiteParams<'_>) -> Result<Zeroizing<String>> {
        self.request(site_name, params, KeyPurpose::Authentication)
    }

    pub fn login(&self, site_name: &str, params: &SiteParams<'_>) -> Result<Zeroizing<String>> {
        self.request(site_name, params, KeyPurpose::Identification)
    }

    pub fn answer(&self, site_name: &str, params: &SiteParams<'_>) -> Result<Zeroizing<String>> {
        self.request(site_name, params, KeyPurpose::Recovery)
    }

    pub fn result(
        &self,
        site_name: &str,
        result_type: ResultType,
        counter: u64,
        purpose: KeyPurpose,
        context: Option<&str>,
    ) -> Result<Zeroizing<String>> {
        let SessionState::Active(user_key) = &self.state else {
            return Err(SpectreError::UserLoggedOut);
        };
        site_result(
            user_key,
            site_name,
            result_type,
            counter,
            purpose,
            context,
            self.tables,
        )
    }

    fn request(
        &self,
        site_name: &str,
        params: &SiteParams<'_>,
        purpose: KeyPurpose,
    ) -> Result<Zeroizing<String>> {
        let result_type = params
            .result_type
            .unwrap_or_else(|| purpose.default_result_type());
        self.result(site_name, result_type, params.counter, purpose, params.context)
    }
}

pub const CONSISTENCY_USER_NAME: &str = "Robert Lee Mitchell";
pub const CONSISTENCY_USER_SECRET: &str = "banana colored duckling";
pub const CONSISTENCY_SITE_NAME: &str = "masterpasswordapp.com";
pub const CONSISTENCY_PASSWORD: &str = "Jejr5[RepuSosp";

/// Derives the reference password and compares it with the known answer.
pub fn consistency_check(tables: &AlgorithmTables) -> Result<bool> {
    let user = SpectreUser::new(
        CONSISTENCY_USER_NAME,
        CONSISTENCY_USER_SECRET,
        AlgorithmVersion::CURRENT,
        tables,
    )?;
    let password = user.password(CONSISTENCY_SITE_NAME, &SiteParams::default())?;
    Ok(*password == CONSISTENCY_PASSWORD)
}
