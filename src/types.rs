use crate::error::SpectreError;
use std::fmt;
use std::str::FromStr;

/// Algorithm revision. Later versions fix historical encoding mistakes of
/// earlier ones, and each must still be reproducible exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AlgorithmVersion {
    /// 2012-03-05: host-endian math on bytes translated into 16-bit network order.
    V0 = 0,
    /// 2012-07-17: site name length measured in characters.
    V1 = 1,
    /// 2014-09-24: user name length measured in characters.
    V2 = 2,
    /// 2015-01-15
    V3 = 3,
}

impl AlgorithmVersion {
    pub const CURRENT: Self = Self::V3;
    pub const FIRST: Self = Self::V0;
    pub const LAST: Self = Self::V3;

    pub const fn as_u32(self) -> u32 {
        self as u32
    }
}

impl Default for AlgorithmVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl TryFrom<u32> for AlgorithmVersion {
    type Error = SpectreError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::V0),
            1 => Ok(Self::V1),
            2 => Ok(Self::V2),
            3 => Ok(Self::V3),
            other => Err(SpectreError::InvalidVersion(other)),
        }
    }
}

impl fmt::Display for AlgorithmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.as_u32())
    }
}

/// Namespace separating the three kinds of site derivation.
///
/// The scope strings are fed verbatim into every salt and must match other
/// implementations byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyPurpose {
    #[default]
    Authentication,
    Identification,
    Recovery,
}

impl KeyPurpose {
    pub const fn scope(self) -> &'static str {
        match self {
            Self::Authentication => "com.lyndir.masterpassword",
            Self::Identification => "com.lyndir.masterpassword.login",
            Self::Recovery => "com.lyndir.masterpassword.answer",
        }
    }

    pub const fn default_result_type(self) -> ResultType {
        match self {
            Self::Authentication => ResultType::DEFAULT_PASSWORD,
            Self::Identification => ResultType::DEFAULT_LOGIN,
            Self::Recovery => ResultType::DEFAULT_ANSWER,
        }
    }
}

impl fmt::Display for KeyPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Authentication => "authentication",
            Self::Identification => "identification",
            Self::Recovery => "recovery",
        };
        f.write_str(name)
    }
}

/// Result category, bits 4..=6 of a [`ResultType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultClass {
    /// Render the site key through a template.
    Template,
    /// Encrypt and decrypt a stored entity with the site key.
    Stateful,
    /// Derive a site-specific object from the site key.
    Derive,
}

impl ResultClass {
    pub const fn bits(self) -> u32 {
        match self {
            Self::Template => 1 << 4,
            Self::Stateful => 1 << 5,
            Self::Derive => 1 << 6,
        }
    }
}

/// Feature flags, bits 10..=12 of a [`ResultType`].
pub struct ResultFeature;

impl ResultFeature {
    pub const NONE: u32 = 0;
    /// Export the key-protected content data.
    pub const EXPORT_CONTENT: u32 = 1 << 10;
    /// Never export content.
    pub const DEVICE_PRIVATE: u32 = 1 << 11;
    /// Not suitable as the primary authentication result.
    pub const ALTERNATE: u32 = 1 << 12;

    const MASK: u32 = Self::EXPORT_CONTENT | Self::DEVICE_PRIVATE | Self::ALTERNATE;
}

/// Bit-composed result type: `id | class | features`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResultType(u32);

impl ResultType {
    pub const NONE: Self = Self(0);

    /// `pg^VMAUBk5x3p%HP%i4=`
    pub const TEMPLATE_MAXIMUM: Self = Self::template(0x0);
    /// `BiroYena8:Kixa`
    pub const TEMPLATE_LONG: Self = Self::template(0x1);
    /// `BirSuj0-`
    pub const TEMPLATE_MEDIUM: Self = Self::template(0x2);
    /// `Bir8`
    pub const TEMPLATE_SHORT: Self = Self::template(0x3);
    /// `pO98MoD0`
    pub const TEMPLATE_BASIC: Self = Self::template(0x4);
    /// `2798`
    pub const TEMPLATE_PIN: Self = Self::template(0x5);
    /// `birsujano`
    pub const TEMPLATE_NAME: Self = Self::template(0xE);
    /// `bir yennoquce fefi`
    pub const TEMPLATE_PHRASE: Self = Self::template(0xF);

    pub const STATE_PERSONAL: Self =
        Self(0x0 | ResultClass::Stateful.bits() | ResultFeature::EXPORT_CONTENT);
    pub const STATE_DEVICE: Self =
        Self(0x1 | ResultClass::Stateful.bits() | ResultFeature::DEVICE_PRIVATE);

    pub const DERIVE_KEY: Self = Self(0x0 | ResultClass::Derive.bits() | ResultFeature::ALTERNATE);

    pub const DEFAULT_PASSWORD: Self = Self::TEMPLATE_LONG;
    pub const DEFAULT_LOGIN: Self = Self::TEMPLATE_NAME;
    pub const DEFAULT_ANSWER: Self = Self::TEMPLATE_PHRASE;

    pub const ALL: [Self; 11] = [
        Self::TEMPLATE_MAXIMUM,
        Self::TEMPLATE_LONG,
        Self::TEMPLATE_MEDIUM,
        Self::TEMPLATE_SHORT,
        Self::TEMPLATE_BASIC,
        Self::TEMPLATE_PIN,
        Self::TEMPLATE_NAME,
        Self::TEMPLATE_PHRASE,
        Self::STATE_PERSONAL,
        Self::STATE_DEVICE,
        Self::DERIVE_KEY,
    ];

    const fn template(id: u32) -> Self {
        Self(id | ResultClass::Template.bits() | ResultFeature::NONE)
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub fn class(self) -> Option<ResultClass> {
        [ResultClass::Template, ResultClass::Stateful, ResultClass::Derive]
            .into_iter()
            .find(|class| self.0 & class.bits() != 0)
    }

    pub const fn features(self) -> u32 {
        self.0 & ResultFeature::MASK
    }

    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::TEMPLATE_MAXIMUM => "Maximum",
            Self::TEMPLATE_LONG => "Long",
            Self::TEMPLATE_MEDIUM => "Medium",
            Self::TEMPLATE_SHORT => "Short",
            Self::TEMPLATE_BASIC => "Basic",
            Self::TEMPLATE_PIN => "PIN",
            Self::TEMPLATE_NAME => "Name",
            Self::TEMPLATE_PHRASE => "Phrase",
            Self::STATE_PERSONAL => "Own",
            Self::STATE_DEVICE => "Device",
            Self::DERIVE_KEY => "Key",
            _ => return None,
        };
        Some(name)
    }
}

impl Default for ResultType {
    fn default() -> Self {
        Self::DEFAULT_PASSWORD
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name, self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

impl FromStr for ResultType {
    type Err = SpectreError;

    /// Accepts a type name (any case), a one-letter alias, or the decimal value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(bits) = s.parse::<u32>() {
            return Ok(Self(bits));
        }

        // Single-letter aliases are case sensitive: `p` is Phrase, `P` is Personal.
        let by_alias = match s {
            "x" => Some(Self::TEMPLATE_MAXIMUM),
            "l" => Some(Self::TEMPLATE_LONG),
            "m" => Some(Self::TEMPLATE_MEDIUM),
            "s" => Some(Self::TEMPLATE_SHORT),
            "b" => Some(Self::TEMPLATE_BASIC),
            "i" => Some(Self::TEMPLATE_PIN),
            "n" => Some(Self::TEMPLATE_NAME),
            "p" => Some(Self::TEMPLATE_PHRASE),
            "P" => Some(Self::STATE_PERSONAL),
            "D" => Some(Self::STATE_DEVICE),
            "K" => Some(Self::DERIVE_KEY),
            _ => None,
        };
        if let Some(result_type) = by_alias {
            return Ok(result_type);
        }

        let lower = s.to_ascii_lowercase();
        let by_name = match lower.as_str() {
            "maximum" => Self::TEMPLATE_MAXIMUM,
            "long" => Self::TEMPLATE_LONG,
            "medium" => Self::TEMPLATE_MEDIUM,
            "short" => Self::TEMPLATE_SHORT,
            "basic" => Self::TEMPLATE_BASIC,
            "pin" => Self::TEMPLATE_PIN,
            "name" => Self::TEMPLATE_NAME,
            "phrase" => Self::TEMPLATE_PHRASE,
            "own" | "personal" => Self::STATE_PERSONAL,
            "device" => Self::STATE_DEVICE,
            "key" => Self::DERIVE_KEY,
            _ => return Err(SpectreError::UnsupportedResultType(0)),
        };
        Ok(by_name)
    }
}

/// Initial value of a site's counter.
pub const COUNTER_INITIAL: u64 = 1;
pub const COUNTER_DEFAULT: u64 = COUNTER_INITIAL;
pub const COUNTER_LAST: u64 = u32::MAX as u64;
