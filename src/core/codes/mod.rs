//! Format and check-digit validators for financial identifier codes.
//!
//! Every validator is a total function over `&str`: malformed, empty or
//! non-ASCII input yields `false`, never a panic. Letters are only accepted
//! in uppercase.

pub mod bic;
pub mod cusip;
pub mod isin;
pub mod lei;
pub mod sedol;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier schemes understood by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum CodeKind {
    Lei,
    Bic,
    Isin,
    Cusip,
    Sedol,
}

impl CodeKind {
    pub const ALL: [CodeKind; 5] = [
        CodeKind::Lei,
        CodeKind::Bic,
        CodeKind::Isin,
        CodeKind::Cusip,
        CodeKind::Sedol,
    ];

    pub fn is_valid(self, code: &str) -> bool {
        match self {
            CodeKind::Lei => lei::is_valid(code),
            CodeKind::Bic => bic::is_valid(code),
            CodeKind::Isin => isin::is_valid(code),
            CodeKind::Cusip => cusip::is_valid(code),
            CodeKind::Sedol => sedol::is_valid(code),
        }
    }

    /// Absent input is never valid.
    pub fn accepts(self, code: Option<&str>) -> bool {
        code.is_some_and(|c| self.is_valid(c))
    }

    pub fn expected_len(self) -> &'static [usize] {
        match self {
            CodeKind::Lei => &[lei::LEN],
            CodeKind::Bic => &[bic::SHORT_LEN, bic::LONG_LEN],
            CodeKind::Isin => &[isin::LEN],
            CodeKind::Cusip => &[cusip::LEN],
            CodeKind::Sedol => &[sedol::LEN],
        }
    }

    /// Check digits a full-length code should end with, computed from its
    /// body. `None` for BIC, which carries no checksum, and for codes whose
    /// length or body is malformed.
    pub fn expected_check_digits(self, code: &str) -> Option<String> {
        let (len, check_len) = match self {
            CodeKind::Lei => (lei::LEN, 2),
            CodeKind::Isin => (isin::LEN, 1),
            CodeKind::Cusip => (cusip::LEN, 1),
            CodeKind::Sedol => (sedol::LEN, 1),
            CodeKind::Bic => return None,
        };
        if code.len() != len {
            return None;
        }
        let body = code.get(..len - check_len)?;

        match self {
            CodeKind::Lei => lei::check_digits(body),
            CodeKind::Isin => isin::check_digit(body).map(|d| d.to_string()),
            CodeKind::Cusip => cusip::check_digit(body).map(|d| d.to_string()),
            CodeKind::Sedol => sedol::check_digit(body).map(|d| d.to_string()),
            CodeKind::Bic => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CodeKind::Lei => "lei",
            CodeKind::Bic => "bic",
            CodeKind::Isin => "isin",
            CodeKind::Cusip => "cusip",
            CodeKind::Sedol => "sedol",
        }
    }
}

impl fmt::Display for CodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CodeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown identifier kind '{}'", s))
    }
}

/// A=10 .. Z=35, digits map to themselves.
pub(crate) fn alnum_value(b: u8) -> Option<u32> {
    match b {
        b'0'..=b'9' => Some(u32::from(b - b'0')),
        b'A'..=b'Z' => Some(u32::from(b - b'A') + 10),
        _ => None,
    }
}

pub(crate) fn is_upper_alnum(b: u8) -> bool {
    b.is_ascii_digit() || b.is_ascii_uppercase()
}
