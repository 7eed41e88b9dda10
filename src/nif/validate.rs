//! NIF/NIE/CIF classification and checksum algorithms.

use serde::{Deserialize, Serialize};

/// Reference alphabet for the NIF/NIE mod-23 check letter.
const NIF_CHECK_LETTERS: &[u8; 23] = b"TRWAGMYFPDXBNJZSQVHLCKE";

/// Control letters for CIF categories that use a letter control character,
/// indexed by the control digit.
const CIF_CHECK_LETTERS: &[u8; 10] = b"JABCDEFGHI";

/// Organization-type letters allowed to lead a CIF.
const CIF_ORG_LETTERS: &[u8] = b"ABCDEFGHJKLMNPQRSUVW";

/// CIF categories that may carry the letter form of the control
/// character. The numeric form is accepted for every category (known
/// looseness, matching what the tax authority accepts in practice).
const CIF_LETTER_CONTROL: &[u8] = b"KNPQRSW";

/// The family a fiscal identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FiscalIdKind {
    /// NIF/DNI — 8 digits followed by a check letter (individuals).
    Nif,
    /// NIE — X/Y/Z prefix, 7 digits, check letter (foreign residents).
    Nie,
    /// CIF — organization letter, 7 digits, check digit or letter.
    Cif,
    /// Not a recognizable Spanish fiscal identifier.
    Invalid,
}

impl FiscalIdKind {
    /// Whether this is one of the three recognized identifier families.
    #[must_use]
    pub fn is_valid_kind(self) -> bool {
        self != Self::Invalid
    }
}

/// Normalize an identifier: uppercase, strip everything outside `[A-Z0-9]`.
///
/// Accepts the display forms users actually type ("12.345.678-Z",
/// "b-65410011") and reduces them to the canonical 9-character form.
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Classify an identifier into its family without checking the checksum.
///
/// Anything that does not normalize to exactly 9 characters, or that
/// matches none of the three shapes, is [`FiscalIdKind::Invalid`].
#[must_use]
pub fn classify(raw: &str) -> FiscalIdKind {
    classify_normalized(normalize(raw).as_bytes())
}

/// Validate an identifier: shape plus checksum.
///
/// Never panics; any malformed input (including the empty string) simply
/// returns `false`.
#[must_use]
pub fn validate(raw: &str) -> bool {
    let normalized = normalize(raw);
    let bytes = normalized.as_bytes();
    match classify_normalized(bytes) {
        FiscalIdKind::Nif => {
            // First 8 bytes are ASCII digits, checked during classification.
            let value = parse_digits(&bytes[..8]);
            check_letter(value) as u8 == bytes[8]
        }
        FiscalIdKind::Nie => {
            let prefix = u32::from(bytes[0] - b'X'); // X→0, Y→1, Z→2
            let value = prefix * 10_000_000 + parse_digits(&bytes[1..8]);
            check_letter(value) as u8 == bytes[8]
        }
        FiscalIdKind::Cif => {
            let control = cif_control_digit(&bytes[1..8]);
            let last = bytes[8];
            if last.is_ascii_digit() {
                u32::from(last - b'0') == control
            } else {
                CIF_LETTER_CONTROL.contains(&bytes[0])
                    && CIF_CHECK_LETTERS[control as usize] == last
            }
        }
        FiscalIdKind::Invalid => false,
    }
}

/// The mod-23 check letter for a DNI/NIE number.
#[must_use]
pub fn check_letter(value: u32) -> char {
    NIF_CHECK_LETTERS[(value % 23) as usize] as char
}

fn classify_normalized(bytes: &[u8]) -> FiscalIdKind {
    if bytes.len() != 9 {
        return FiscalIdKind::Invalid;
    }
    let last = bytes[8];
    if bytes[..8].iter().all(u8::is_ascii_digit) && last.is_ascii_uppercase() {
        return FiscalIdKind::Nif;
    }
    if matches!(bytes[0], b'X' | b'Y' | b'Z')
        && bytes[1..8].iter().all(u8::is_ascii_digit)
        && last.is_ascii_uppercase()
    {
        return FiscalIdKind::Nie;
    }
    if CIF_ORG_LETTERS.contains(&bytes[0])
        && bytes[1..8].iter().all(u8::is_ascii_digit)
        && (last.is_ascii_digit() || last.is_ascii_uppercase())
    {
        return FiscalIdKind::Cif;
    }
    FiscalIdKind::Invalid
}

/// Parse a run of ASCII digits. Caller guarantees the slice is all digits
/// and short enough to fit in a u32 (at most 8 positions here).
fn parse_digits(digits: &[u8]) -> u32 {
    digits
        .iter()
        .fold(0u32, |acc, b| acc * 10 + u32::from(b - b'0'))
}

/// Luhn-style weighted sum over the 7 CIF digits: even positions
/// (0-indexed) doubled and digit-folded, odd positions as-is.
fn cif_control_digit(digits: &[u8]) -> u32 {
    let mut sum = 0u32;
    for (i, b) in digits.iter().enumerate() {
        let d = u32::from(b - b'0');
        if i % 2 == 0 {
            let doubled = d * 2;
            sum += doubled / 10 + doubled % 10;
        } else {
            sum += d;
        }
    }
    (10 - sum % 10) % 10
}
