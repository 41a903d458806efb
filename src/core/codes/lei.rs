//! ISO 17442 Legal Entity Identifier.
//!
//! Eighteen uppercase alphanumerics followed by two numeric check digits.
//! The whole code, with letters expanded to two digits (A=10 .. Z=35), must
//! be congruent to 1 modulo 97 (ISO 7064 MOD 97-10).

use super::{alnum_value, is_upper_alnum};

pub const LEN: usize = 20;
const BASE_LEN: usize = 18;

pub fn is_valid(code: &str) -> bool {
    let bytes = code.as_bytes();

    bytes.len() == LEN
        && bytes[..BASE_LEN].iter().all(|&b| is_upper_alnum(b))
        && bytes[BASE_LEN..].iter().all(u8::is_ascii_digit)
        && mod97(bytes) == Some(1)
}

/// Check digits for an 18 character base, e.g. `"529900T8BM49AURSDO"` -> `"55"`.
pub fn check_digits(base: &str) -> Option<String> {
    let bytes = base.as_bytes();
    if bytes.len() != BASE_LEN || !bytes.iter().all(|&b| is_upper_alnum(b)) {
        return None;
    }

    // append "00" and pick the digits that bring the remainder to 1
    let remainder = mod97(bytes)? * 100 % 97;
    Some(format!("{:02}", 98 - remainder))
}

/// Remainder of the transliterated code, folded one character at a time so
/// the value never leaves `u32`.
fn mod97(bytes: &[u8]) -> Option<u32> {
    bytes.iter().try_fold(0u32, |m, &b| {
        let v = alnum_value(b)?;
        let shift = if v < 10 { 10 } else { 100 };
        Some((m * shift + v) % 97)
    })
}
