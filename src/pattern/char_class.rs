//! Byte class membership tests for pattern matching.

use super::ast::{CharClass, ClassKind, Set, SetMember};

/// Test whether `byte` is matched by `class`.
pub fn class_matches(class: &CharClass, byte: u8) -> bool {
    match class {
        CharClass::Any => true,
        CharClass::Literal(b) => *b == byte,
        CharClass::Named { kind, negated } => kind_matches(*kind, byte) != *negated,
        CharClass::Set(set) => set_matches(set, byte),
    }
}

/// Test whether `byte` is a member of `set`.
pub fn set_matches(set: &Set, byte: u8) -> bool {
    let base = set.members.iter().any(|m| member_matches(m, byte));
    if set.negated { !base } else { base }
}

fn member_matches(member: &SetMember, byte: u8) -> bool {
    match member {
        SetMember::Byte(b) => *b == byte,
        SetMember::Range(lo, hi) => *lo <= byte && byte <= *hi,
        SetMember::Named { kind, negated } => kind_matches(*kind, byte) != *negated,
    }
}

/// ASCII ("C" locale) classification; bytes above 0x7F belong to no class.
pub fn kind_matches(kind: ClassKind, byte: u8) -> bool {
    match kind {
        ClassKind::Alpha => byte.is_ascii_alphabetic(),
        ClassKind::Control => byte.is_ascii_control(),
        ClassKind::Digit => byte.is_ascii_digit(),
        ClassKind::Graph => byte.is_ascii_graphic(),
        ClassKind::Lower => byte.is_ascii_lowercase(),
        ClassKind::Punct => byte.is_ascii_punctuation(),
        // Includes vertical tab, unlike `u8::is_ascii_whitespace`.
        ClassKind::Space => matches!(byte, b' ' | b'\t'..=b'\r'),
        ClassKind::Upper => byte.is_ascii_uppercase(),
        ClassKind::AlNum => byte.is_ascii_alphanumeric(),
        ClassKind::HexDigit => byte.is_ascii_hexdigit(),
    }
}
