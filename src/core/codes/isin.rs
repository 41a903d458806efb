//! ISO 6166 International Securities Identification Number.
//!
//! Two letter country prefix, nine alphanumeric characters and a Luhn check
//! digit computed over the letter-expanded form of the first eleven.

use super::{alnum_value, is_upper_alnum};

pub const LEN: usize = 12;
const BODY_LEN: usize = 11;

pub fn is_valid(code: &str) -> bool {
    let bytes = code.as_bytes();
    if bytes.len() != LEN {
        return false;
    }

    let well_formed = bytes[..2].iter().all(u8::is_ascii_uppercase)
        && bytes[2..BODY_LEN].iter().all(|&b| is_upper_alnum(b))
        && bytes[BODY_LEN].is_ascii_digit();

    well_formed && luhn_check_digit(&bytes[..BODY_LEN]) == Some(bytes[BODY_LEN] - b'0')
}

/// Check digit for an eleven character prefix, e.g. `"US037833100"` -> `5`.
pub fn check_digit(prefix: &str) -> Option<u8> {
    let bytes = prefix.as_bytes();
    if bytes.len() != BODY_LEN
        || !bytes[..2].iter().all(u8::is_ascii_uppercase)
        || !bytes.iter().all(|&b| is_upper_alnum(b))
    {
        return None;
    }
    luhn_check_digit(bytes)
}

fn luhn_check_digit(body: &[u8]) -> Option<u8> {
    let mut digits = Vec::with_capacity(BODY_LEN * 2);
    for &b in body {
        let v = alnum_value(b)?;
        if v >= 10 {
            digits.push(v / 10);
        }
        digits.push(v % 10);
    }

    // the rightmost digit is the one next to the check digit, so it is doubled
    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            let d = if i % 2 == 0 { d * 2 } else { d };
            d / 10 + d % 10
        })
        .sum();

    Some(((10 - sum % 10) % 10) as u8)
}
