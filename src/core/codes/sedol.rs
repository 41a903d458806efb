//! SEDOL, the seven character London Stock Exchange identifier.
//!
//! Six characters drawn from digits and uppercase consonants, then a weighted
//! modulus 10 check digit.

use super::alnum_value;

pub const LEN: usize = 7;
const WEIGHTS: [u32; 6] = [1, 3, 1, 7, 3, 9];

pub fn is_valid(code: &str) -> bool {
    let bytes = code.as_bytes();
    if bytes.len() != LEN || !bytes[LEN - 1].is_ascii_digit() {
        return false;
    }

    check_digit_of(&bytes[..LEN - 1]) == Some(bytes[LEN - 1] - b'0')
}

/// Check digit for a six character base, e.g. `"026349"` -> `4`.
pub fn check_digit(base: &str) -> Option<u8> {
    let bytes = base.as_bytes();
    if bytes.len() != LEN - 1 {
        return None;
    }
    check_digit_of(bytes)
}

fn is_allowed(b: u8) -> bool {
    b.is_ascii_digit() || (b.is_ascii_uppercase() && !matches!(b, b'A' | b'E' | b'I' | b'O' | b'U'))
}

fn check_digit_of(base: &[u8]) -> Option<u8> {
    let mut sum = 0;
    for (&b, weight) in base.iter().zip(WEIGHTS) {
        if !is_allowed(b) {
            return None;
        }
        sum += weight * alnum_value(b)?;
    }
    Some(((10 - sum % 10) % 10) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_sedol_codes() {
        for code in [
            "0263494", "0540528", "B1XH2C0", "BH4HKS3", "BMDGCK2", "0736554", "B033F22",
            "B74CDH8", "B07KD36", "B138NB9", "BLNN3L4", "0056650", "3134865", "0884709",
            "0798059",
        ] {
            assert!(is_valid(code), "{} rejected", code);
        }
    }

    #[test]
    fn test_invalid_sedol_codes() {
        assert!(!is_valid("026349"));
        assert!(!is_valid("02634941"));
        assert!(!is_valid("0263495"));
        assert!(!is_valid("b1xh2c0"));
        assert!(!is_valid("A1XH2C0"));
        assert!(!is_valid(""));
    }

    #[test]
    fn test_check_digit() {
        assert_eq!(check_digit("026349"), Some(4));
        assert_eq!(check_digit("B1XH2C"), Some(0));
        assert_eq!(check_digit("E1XH2C"), None);
    }
}
