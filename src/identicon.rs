//! Visual fingerprint of an identity.
//!
//! The identicon lets a user notice a mistyped secret before using any
//! derived result. It is independent of the algorithm version.

use crate::tables::AlgorithmTables;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdenticonColor {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    /// The terminal's or page's current foreground colour.
    Current,
}

impl IdenticonColor {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Magenta => "magenta",
            Self::Cyan => "cyan",
            Self::Current => "currentcolor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identicon {
    pub left_arm: &'static str,
    pub body: &'static str,
    pub right_arm: &'static str,
    pub accessory: &'static str,
    pub color: IdenticonColor,
}

impl fmt::Display for Identicon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            self.left_arm, self.body, self.right_arm, self.accessory
        )
    }
}

/// `seed = HMAC-SHA256(key = user_secret, message = user_name)`; seed bytes
/// 0..=4 index the five glyph tables.
pub fn generate_identicon(
    user_name: &str,
    user_secret: &str,
    tables: &AlgorithmTables,
) -> Identicon {
    tracing::trace!("generating identicon");

    let Ok(mut mac) = HmacSha256::new_from_slice(user_secret.as_bytes()) else {
        unreachable!("HMAC-SHA256 accepts any key size");
    };
    mac.update(user_name.as_bytes());
    let mut seed = Zeroizing::new([0u8; 32]);
    seed.copy_from_slice(&mac.finalize().into_bytes());

    let glyphs = &tables.identicons;
    Identicon {
        left_arm: pick(glyphs.left_arm, seed[0]),
        body: pick(glyphs.body, seed[1]),
        right_arm: pick(glyphs.right_arm, seed[2]),
        accessory: pick(glyphs.accessory, seed[3]),
        color: pick(glyphs.color, seed[4]),
    }
}

fn pick<T: Copy>(table: &[T], seed: u8) -> T {
    table[usize::from(seed) % table.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLES: AlgorithmTables = AlgorithmTables::STANDARD;

    #[test]
    fn test_identicon_deterministic() {
        let first = generate_identicon("Robert Lee Mitchell", "banana colored duckling", &TABLES);
        let second = generate_identicon("Robert Lee Mitchell", "banana colored duckling", &TABLES);
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_identicon_fields_from_tables() {
        let icon = generate_identicon("Robert Lee Mitchell", "banana colored duckling", &TABLES);
        let glyphs = TABLES.identicons;

        assert!(glyphs.left_arm.contains(&icon.left_arm));
        assert!(glyphs.body.contains(&icon.body));
        assert!(glyphs.right_arm.contains(&icon.right_arm));
        assert!(glyphs.accessory.contains(&icon.accessory));
        assert!(glyphs.color.contains(&icon.color));
        assert_eq!(icon.to_string().chars().count(), 4);
    }

    #[test]
    fn test_identicon_fields_use_separate_seed_bytes() {
        use std::collections::HashSet;

        let mut bodies = HashSet::new();
        let mut colors = HashSet::new();
        for i in 0..64 {
            let icon = generate_identicon(&format!("user {}", i), "secret", &TABLES);
            bodies.insert(icon.body);
            colors.insert(icon.color);
        }
        assert!(bodies.len() > 1);
        assert!(colors.len() > 1);
    }

    #[test]
    fn test_pick_wraps() {
        assert_eq!(pick(&["a", "b", "c"], 0), "a");
        assert_eq!(pick(&["a", "b", "c"], 4), "b");
        assert_eq!(pick(&["a", "b", "c"], 255), "a");
    }

    #[test]
    fn test_color_names() {
        assert_eq!(IdenticonColor::Red.name(), "red");
        assert_eq!(IdenticonColor::Current.name(), "currentcolor");
    }
}
