use lei_lookup::core::codes::{bic, cusip, isin, lei, sedol};
use lei_lookup::CodeKind;

const VALID_LEIS: [&str; 5] = [
    "529900T8BM49AURSDO55",
    "7LTWFZYICNSX8D621K86",
    "5493001KJTIIGC8Y1R12",
    "HWUPKR0MPOU8FGXBT394",
    "029200067A7K6CH0H586",
];

const VALID_ISINS: [&str; 4] = ["US0378331005", "AU0000XVGZA3", "DE0005140008", "GB0002634946"];

/// Every code differing from `code` in one position by a character of the
/// same class. Swapping a digit for a letter changes the digit stream length,
/// which mod 97 does not guard against.
fn substitutions(code: &str) -> impl Iterator<Item = String> + '_ {
    const DIGITS: &[u8] = b"0123456789";
    const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    (0..code.len()).flat_map(move |i| {
        let alphabet = if code.as_bytes()[i].is_ascii_digit() {
            DIGITS
        } else {
            LETTERS
        };
        alphabet.iter().filter_map(move |&c| {
            let mut bytes = code.as_bytes().to_vec();
            if bytes[i] == c {
                return None;
            }
            bytes[i] = c;
            String::from_utf8(bytes).ok()
        })
    })
}

#[test]
fn known_scenarios() {
    assert!(lei::is_valid("529900T8BM49AURSDO55"));
    assert!(!lei::is_valid("529900T8BM49AURSDO56"));
    assert!(bic::is_valid("DEUTDEFF"));
    assert!(bic::is_valid("DEUTDEFF500"));
    assert!(!bic::is_valid("deutdeff"));
    assert!(isin::is_valid("US0378331005"));
    assert!(!isin::is_valid("US0378331006"));

    for kind in CodeKind::ALL {
        assert!(!kind.is_valid(""), "{} accepted empty input", kind);
        assert!(!kind.accepts(None), "{} accepted absent input", kind);
    }
}

#[test]
fn lei_rejects_any_single_substitution() {
    for code in VALID_LEIS {
        assert!(lei::is_valid(code));
        for mutated in substitutions(code) {
            assert!(!lei::is_valid(&mutated), "{} accepted", mutated);
        }
    }
}

#[test]
fn lei_check_digits_complete_a_base() {
    for code in VALID_LEIS {
        let (base, digits) = code.split_at(18);
        assert_eq!(lei::check_digits(base).as_deref(), Some(digits));
    }
}

#[test]
fn isin_check_digit_matches_last_character() {
    for code in VALID_ISINS {
        assert!(isin::is_valid(code), "{} rejected", code);
        let expected = code.as_bytes()[11] - b'0';
        assert_eq!(isin::check_digit(&code[..11]), Some(expected));
    }
}

// Luhn catches every single-digit error; letters expand to two digits and can collide.
#[test]
fn isin_rejects_any_body_digit_substitution() {
    for code in VALID_ISINS {
        let bytes = code.as_bytes();
        for i in (0..isin::LEN - 1).filter(|&i| bytes[i].is_ascii_digit()) {
            for d in b'0'..=b'9' {
                if d == bytes[i] {
                    continue;
                }
                let mut mutated = bytes.to_vec();
                mutated[i] = d;
                let mutated = String::from_utf8(mutated).unwrap();
                assert!(!isin::is_valid(&mutated), "{} accepted", mutated);
            }
        }
    }
}

#[test]
fn lowercase_and_punctuation_rejected_everywhere() {
    let samples = [
        (CodeKind::Lei, "529900T8BM49AURSDO55"),
        (CodeKind::Bic, "DEUTDEFFXXX"),
        (CodeKind::Isin, "US0378331005"),
        (CodeKind::Cusip, "037833100"),
        (CodeKind::Sedol, "0263494"),
    ];

    for (kind, code) in samples {
        assert!(kind.is_valid(code), "{} rejected {}", kind, code);
        assert!(kind.accepts(Some(code)));

        let lowered = code.to_lowercase();
        if lowered != code {
            assert!(!kind.is_valid(&lowered), "{} accepted {}", kind, lowered);
        }

        let punctuated = format!("{}-", &code[..code.len() - 1]);
        assert!(!kind.is_valid(&punctuated), "{} accepted {}", kind, punctuated);
    }
}

#[test]
fn cusip_and_sedol_samples() {
    assert!(cusip::is_valid("037833100"));
    assert!(cusip::is_valid("38259P508"));
    assert!(!cusip::is_valid("037833101"));
    assert!(sedol::is_valid("B0YBKJ7"));
    assert!(!sedol::is_valid("B0YBKJ8"));
}
