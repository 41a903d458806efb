//! ISO 9362 Business Identifier Code (SWIFT code).
//!
//! `AAAA BB CC [DDD]`: institution, country, location and optional branch.
//! The standard defines no check digit, so only the layout is verified. The
//! country segment is checked for letters, not against the ISO 3166 list.

use super::is_upper_alnum;

pub const SHORT_LEN: usize = 8;
pub const LONG_LEN: usize = 11;

pub fn is_valid(code: &str) -> bool {
    let bytes = code.as_bytes();
    if bytes.len() != SHORT_LEN && bytes.len() != LONG_LEN {
        return false;
    }

    let (institution, rest) = bytes.split_at(4);
    let (country, rest) = rest.split_at(2);
    let (location, branch) = rest.split_at(2);

    institution.iter().all(u8::is_ascii_uppercase)
        && country.iter().all(u8::is_ascii_uppercase)
        && location.iter().all(|&b| is_upper_alnum(b))
        && branch.iter().all(|&b| is_upper_alnum(b))
}

/// Eight character form, dropping the branch if present.
pub fn head_office(code: &str) -> Option<&str> {
    is_valid(code).then(|| &code[..SHORT_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_bic_codes() {
        assert!(is_valid("DEUTDEFF"));
        assert!(is_valid("DEUTDEFF500"));
        assert!(is_valid("NEDSZAJJ"));
        assert!(is_valid("DABADKKK"));
        assert!(is_valid("UNCRITMM"));
        assert!(is_valid("DSBACNBXSHA"));
        assert!(is_valid("BNORPHMM"));
        assert!(is_valid("HBUKGB4BXXX"));
    }

    #[test]
    fn test_invalid_bic_codes() {
        assert!(!is_valid("deutdeff"));
        assert!(!is_valid("DEUTDEFF50"));
        assert!(!is_valid("DEUTDEF"));
        assert!(!is_valid("DEU1DEFF"));
        assert!(!is_valid("DEUTD3FF"));
        assert!(!is_valid("DEUTDEff"));
        assert!(!is_valid("DEUTDEFF50x"));
        assert!(!is_valid("0003783310050"));
        assert!(!is_valid("000378331005"));
        assert!(!is_valid("US0378331000"));
        assert!(!is_valid(""));
    }

    #[test]
    fn test_head_office() {
        assert_eq!(head_office("DEUTDEFF500"), Some("DEUTDEFF"));
        assert_eq!(head_office("DEUTDEFF"), Some("DEUTDEFF"));
        assert_eq!(head_office("deutdeff500"), None);
    }
}
