pub mod error;
pub mod generator;
pub mod identicon;
pub mod kdf;
pub mod session;
pub mod site;
pub mod tables;
pub mod types;
pub mod version;

pub use error::{Result, SpectreError};
pub use generator::{encode_result, site_result};
pub use identicon::{Identicon, IdenticonColor, generate_identicon};
pub use kdf::{ScryptConfig, UserKey, derive_user_key};
pub use session::{SiteParams, SpectreUser, consistency_check};
pub use site::{SiteKey, derive_site_key};
pub use tables::AlgorithmTables;
pub use types::{AlgorithmVersion, KeyPurpose, ResultClass, ResultFeature, ResultType};
pub use version::VersionPolicy;
