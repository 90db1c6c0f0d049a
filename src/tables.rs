//! Constant tables consumed by the encoder and the identicon generator.
//!
//! The tables are plain static data: [`AlgorithmTables::STANDARD`] is built at
//! compile time and handed around by reference, so concurrent readers never
//! need synchronisation.

use crate::identicon::IdenticonColor;
use crate::types::ResultType;

#[derive(Debug, Clone, Copy)]
pub struct AlgorithmTables {
    pub templates: &'static [(ResultType, &'static [&'static str])],
    pub characters: &'static [(u8, &'static str)],
    pub identicons: IdenticonTables,
}

#[derive(Debug, Clone, Copy)]
pub struct IdenticonTables {
    pub left_arm: &'static [&'static str],
    pub body: &'static [&'static str],
    pub right_arm: &'static [&'static str],
    pub accessory: &'static [&'static str],
    pub color: &'static [IdenticonColor],
}

impl AlgorithmTables {
    pub const STANDARD: Self = Self {
        templates: TEMPLATES,
        characters: CHARACTERS,
        identicons: IDENTICONS,
    };

    /// Template set registered for `result_type`, if it is non-empty.
    pub fn templates(&self, result_type: ResultType) -> Option<&'static [&'static str]> {
        self.templates
            .iter()
            .find(|(registered, _)| *registered == result_type)
            .map(|(_, set)| *set)
            .filter(|set| !set.is_empty())
    }

    /// Alphabet for a template character class code.
    pub fn characters(&self, class: u8) -> Option<&'static [u8]> {
        self.characters
            .iter()
            .find(|(code, _)| *code == class)
            .map(|(_, alphabet)| alphabet.as_bytes())
    }
}

impl Default for AlgorithmTables {
    fn default() -> Self {
        Self::STANDARD
    }
}

const TEMPLATES: &[(ResultType, &[&str])] = &[
    (
        ResultType::TEMPLATE_MAXIMUM,
        &["anoxxxxxxxxxxxxxxxxx", "axxxxxxxxxxxxxxxxxno"],
    ),
    (
        ResultType::TEMPLATE_LONG,
        &[
            "CvcvnoCvcvCvcv",
            "CvcvCvcvnoCvcv",
            "CvcvCvcvCvcvno",
            "CvccnoCvcvCvcv",
            "CvccCvcvnoCvcv",
            "CvccCvcvCvcvno",
            "CvcvnoCvccCvcv",
            "CvcvCvccnoCvcv",
            "CvcvCvccCvcvno",
            "CvcvnoCvcvCvcc",
            "CvcvCvcvnoCvcc",
            "CvcvCvcvCvccno",
            "CvccnoCvccCvcv",
            "CvccCvccnoCvcv",
            "CvccCvccCvcvno",
            "CvcvnoCvccCvcc",
            "CvcvCvccnoCvcc",
            "CvcvCvccCvccno",
            "CvccnoCvcvCvcc",
            "CvccCvcvnoCvcc",
            "CvccCvcvCvccno",
        ],
    ),
    (ResultType::TEMPLATE_MEDIUM, &["CvcnoCvc", "CvcCvcno"]),
    (ResultType::TEMPLATE_SHORT, &["Cvcn"]),
    (
        ResultType::TEMPLATE_BASIC,
        &["aaanaaan", "aannaaan", "aaannaaa"],
    ),
    (ResultType::TEMPLATE_PIN, &["nnnn"]),
    (ResultType::TEMPLATE_NAME, &["cvccvcvcv"]),
    (
        ResultType::TEMPLATE_PHRASE,
        &[
            "cvcc cvc cvccvcv cvc",
            "cvc cvccvcvcv cvcv",
            "cv cvccv cvc cvcvccv",
        ],
    ),
];

const CHARACTERS: &[(u8, &str)] = &[
    (b'V', "AEIOU"),
    (b'C', "BCDFGHJKLMNPQRSTVWXYZ"),
    (b'v', "aeiou"),
    (b'c', "bcdfghjklmnpqrstvwxyz"),
    (b'A', "AEIOUBCDFGHJKLMNPQRSTVWXYZ"),
    (b'a', "AEIOUaeiouBCDFGHJKLMNPQRSTVWXYZbcdfghjklmnpqrstvwxyz"),
    (b'n', "0123456789"),
    (b'o', "@&%?,=[]_:-+*$#!'^~;()/."),
    (
        b'x',
        "AEIOUaeiouBCDFGHJKLMNPQRSTVWXYZbcdfghjklmnpqrstvwxyz0123456789!@#$%^&*()",
    ),
    (b' ', " "),
];

const IDENTICONS: IdenticonTables = IdenticonTables {
    left_arm: &["╔", "╚", "╰", "═"],
    body: &["█", "░", "▒", "▓", "☺", "☻"],
    right_arm: &["╗", "╝", "╯", "═"],
    accessory: &[
        "◈", "◎", "◐", "◑", "◒", "◓", "☀", "☁", "☂", "☃", "☄", "★", "☆", "☎", "☏", "⎈", "⌂", "☘",
        "☢", "☣", "☕", "⌚", "⌛", "⏰", "⚡", "⛄", "⛅", "☔", "♔", "♕", "♖", "♗", "♘", "♙", "♚",
        "♛", "♜", "♝", "♞", "♟", "♨", "♩", "♪", "♫", "⚐", "⚑", "⚔", "⚖", "⚙", "⚠", "⌘", "⏎",
        "✄", "✆", "✈", "✉", "✌",
    ],
    color: &[
        IdenticonColor::Red,
        IdenticonColor::Green,
        IdenticonColor::Yellow,
        IdenticonColor::Blue,
        IdenticonColor::Magenta,
        IdenticonColor::Cyan,
        IdenticonColor::Current,
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResultClass;
    use std::collections::HashSet;

    #[test]
    fn test_template_sets_registered() {
        let tables = AlgorithmTables::STANDARD;
        for result_type in ResultType::ALL {
            let registered = tables.templates(result_type).is_some();
            let is_template = result_type.class() == Some(ResultClass::Template);
            assert_eq!(registered, is_template, "{}", result_type);
        }
        assert_eq!(tables.templates(ResultType::TEMPLATE_LONG).unwrap().len(), 21);
        assert!(tables.templates(ResultType::NONE).is_none());
    }

    #[test]
    fn test_template_classes_resolve() {
        let tables = AlgorithmTables::STANDARD;
        for (result_type, set) in tables.templates {
            for template in *set {
                for class in template.bytes() {
                    assert!(
                        tables.characters(class).is_some(),
                        "Template {:?} of {} uses unknown class {:?}",
                        template,
                        result_type,
                        class as char
                    );
                }
            }
        }
    }

    #[test]
    fn test_alphabets() {
        let tables = AlgorithmTables::STANDARD;
        let sizes = [
            (b'V', 5),
            (b'C', 21),
            (b'v', 5),
            (b'c', 21),
            (b'A', 26),
            (b'a', 52),
            (b'n', 10),
            (b'o', 24),
            (b'x', 72),
            (b' ', 1),
        ];
        for (class, size) in sizes {
            let alphabet = tables.characters(class).unwrap();
            assert_eq!(alphabet.len(), size, "class {:?}", class as char);
            assert!(alphabet.is_ascii());

            let unique: HashSet<_> = alphabet.iter().collect();
            assert_eq!(unique.len(), size, "class {:?} has duplicates", class as char);
        }
        assert!(tables.characters(b'?').is_none());
    }

    #[test]
    fn test_identicon_table_sizes() {
        let glyphs = AlgorithmTables::STANDARD.identicons;
        assert_eq!(glyphs.left_arm.len(), 4);
        assert_eq!(glyphs.body.len(), 6);
        assert_eq!(glyphs.right_arm.len(), 4);
        assert_eq!(glyphs.accessory.len(), 57);
        assert_eq!(glyphs.color.len(), 7);
    }
}
