//! CUSIP, the nine character North American security identifier.
//!
//! Eight characters from `0-9 A-Z * @ #` and a modulus 10 "double add double"
//! check digit.

pub const LEN: usize = 9;

pub fn is_valid(code: &str) -> bool {
    let bytes = code.as_bytes();
    if bytes.len() != LEN || !bytes[LEN - 1].is_ascii_digit() {
        return false;
    }

    check_digit_of(&bytes[..LEN - 1]) == Some(bytes[LEN - 1] - b'0')
}

/// Check digit for an eight character base, e.g. `"03783310"` -> `0`.
pub fn check_digit(base: &str) -> Option<u8> {
    let bytes = base.as_bytes();
    if bytes.len() != LEN - 1 {
        return None;
    }
    check_digit_of(bytes)
}

fn char_value(b: u8) -> Option<u32> {
    match b {
        b'0'..=b'9' => Some(u32::from(b - b'0')),
        b'A'..=b'Z' => Some(u32::from(b - b'A') + 10),
        b'*' => Some(36),
        b'@' => Some(37),
        b'#' => Some(38),
        _ => None,
    }
}

fn check_digit_of(base: &[u8]) -> Option<u8> {
    let mut sum = 0;
    for (i, &b) in base.iter().enumerate() {
        let mut v = char_value(b)?;
        if i % 2 == 1 {
            v *= 2;
        }
        sum += v / 10 + v % 10;
    }
    Some(((10 - sum % 10) % 10) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cusip_codes() {
        assert!(is_valid("037833100"));
        assert!(is_valid("17275R102"));
        assert!(is_valid("38259P508"));
        assert!(is_valid("594918104"));
        assert!(is_valid("68389X105"));
    }

    #[test]
    fn test_private_placement_characters() {
        assert!(is_valid("0*7833107"));
        assert!(is_valid("0@7833105"));
        assert!(is_valid("0#7833103"));
    }

    #[test]
    fn test_invalid_cusip_codes() {
        assert!(!is_valid("0378331000"));
        assert!(!is_valid("03783310"));
        assert!(!is_valid("68389X10A"));
        assert!(!is_valid("38259Q508"));
        assert!(!is_valid("17275r102"));
        assert!(!is_valid("0$7833107"));
        assert!(!is_valid(""));
    }

    #[test]
    fn test_check_digit() {
        assert_eq!(check_digit("03783310"), Some(0));
        assert_eq!(check_digit("17275R10"), Some(2));
        assert_eq!(check_digit("1727"), None);
    }
}
