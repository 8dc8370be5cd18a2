//! Brazilian taxpayer identifiers (CPF and CNPJ) and their modulo-11 check digits.
//!
//! The validators are total: any string goes in, a `bool` comes out. Everything
//! that is not an ASCII digit is discarded before the length check, so
//! `"111.444.777-35"` and `"11144477735"` are the same input.

use crate::core::masks::MaskKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const INDIVIDUAL_LEN: usize = 11;
pub const ORGANIZATION_LEN: usize = 14;

const ORGANIZATION_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const ORGANIZATION_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxIdKind {
    /// CPF, 11 digits.
    Individual,
    /// CNPJ, 14 digits.
    Organization,
}

impl TaxIdKind {
    pub fn digit_count(self) -> usize {
        match self {
            TaxIdKind::Individual => INDIVIDUAL_LEN,
            TaxIdKind::Organization => ORGANIZATION_LEN,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaxIdKind::Individual => "CPF",
            TaxIdKind::Organization => "CNPJ",
        }
    }

    /// Guesses the kind from the number of digits in `raw`.
    pub fn detect(raw: &str) -> Option<Self> {
        match raw.chars().filter(char::is_ascii_digit).count() {
            INDIVIDUAL_LEN => Some(TaxIdKind::Individual),
            ORGANIZATION_LEN => Some(TaxIdKind::Organization),
            _ => None,
        }
    }

    pub fn diagnose(self, raw: &str) -> Result<(), TaxIdIssue> {
        match self {
            TaxIdKind::Individual => diagnose_individual(raw),
            TaxIdKind::Organization => diagnose_organization(raw),
        }
    }
}

impl fmt::Display for TaxIdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaxIdKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpf" | "individual" => Ok(TaxIdKind::Individual),
            "cnpj" | "organization" => Ok(TaxIdKind::Organization),
            other => Err(format!("unknown tax id kind '{}' (expected cpf or cnpj)", other)),
        }
    }
}

/// Why a value is not a valid identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum TaxIdIssue {
    WrongLength { expected: usize, found: usize },
    RepeatedDigits,
    /// `position` is the index of the first check digit that did not match.
    CheckDigitMismatch { position: usize },
}

impl fmt::Display for TaxIdIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxIdIssue::WrongLength { expected, found } => {
                write!(f, "expected {} digits, found {}", expected, found)
            }
            TaxIdIssue::RepeatedDigits => f.write_str("all digits are the same"),
            TaxIdIssue::CheckDigitMismatch { position } => {
                write!(f, "check digit at position {} does not match", position + 1)
            }
        }
    }
}

/// Keeps only the ASCII digits of `raw`.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

fn digit_values(raw: &str) -> Vec<u8> {
    raw.bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect()
}

fn all_same(digits: &[u8]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

fn individual_digit(digits: &[u8]) -> u8 {
    let top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, &d)| u32::from(d) * (top - i as u32))
        .sum();
    ((sum * 10) % 11 % 10) as u8
}

fn organization_digit(digits: &[u8], weights: &[u32]) -> u8 {
    let sum: u32 = digits
        .iter()
        .zip(weights)
        .map(|(&d, &w)| u32::from(d) * w)
        .sum();
    match sum % 11 {
        r if r < 2 => 0,
        r => (11 - r) as u8,
    }
}

/// Computes both CPF check digits for a 9-digit base.
pub fn individual_check_digits(base: &[u8; 9]) -> [u8; 2] {
    let first = individual_digit(base);
    let mut extended = [0u8; 10];
    extended[..9].copy_from_slice(base);
    extended[9] = first;
    [first, individual_digit(&extended)]
}

/// Computes both CNPJ check digits for a 12-digit base.
pub fn organization_check_digits(base: &[u8; 12]) -> [u8; 2] {
    let first = organization_digit(base, &ORGANIZATION_FIRST_WEIGHTS);
    let mut extended = [0u8; 13];
    extended[..12].copy_from_slice(base);
    extended[12] = first;
    [first, organization_digit(&extended, &ORGANIZATION_SECOND_WEIGHTS)]
}

fn check_digits_match(supplied: &[u8], computed: [u8; 2], first_position: usize) -> Result<(), TaxIdIssue> {
    for (offset, (&given, expected)) in supplied.iter().zip(computed).enumerate() {
        if given != expected {
            return Err(TaxIdIssue::CheckDigitMismatch {
                position: first_position + offset,
            });
        }
    }
    Ok(())
}

pub fn diagnose_individual(raw: &str) -> Result<(), TaxIdIssue> {
    let digits = digit_values(raw);
    if digits.len() != INDIVIDUAL_LEN {
        return Err(TaxIdIssue::WrongLength {
            expected: INDIVIDUAL_LEN,
            found: digits.len(),
        });
    }
    if all_same(&digits) {
        return Err(TaxIdIssue::RepeatedDigits);
    }

    let mut base = [0u8; 9];
    base.copy_from_slice(&digits[..9]);
    check_digits_match(&digits[9..], individual_check_digits(&base), 9)
}

pub fn diagnose_organization(raw: &str) -> Result<(), TaxIdIssue> {
    let digits = digit_values(raw);
    if digits.len() != ORGANIZATION_LEN {
        return Err(TaxIdIssue::WrongLength {
            expected: ORGANIZATION_LEN,
            found: digits.len(),
        });
    }
    if all_same(&digits) {
        return Err(TaxIdIssue::RepeatedDigits);
    }

    let mut base = [0u8; 12];
    base.copy_from_slice(&digits[..12]);
    check_digits_match(&digits[12..], organization_check_digits(&base), 12)
}

/// True when `raw` holds a valid CPF once punctuation is removed.
pub fn validate_individual(raw: &str) -> bool {
    diagnose_individual(raw).is_ok()
}

/// True when `raw` holds a valid CNPJ once punctuation is removed.
pub fn validate_organization(raw: &str) -> bool {
    diagnose_organization(raw).is_ok()
}

/// A validated identifier, holding digits only.
///
/// Only [`TaxId::parse`] and [`TaxId::parse_as`] build one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaxId {
    kind: TaxIdKind,
    digits: String,
}

impl TaxId {
    /// Picks the kind by digit count and keeps it only if the check digits hold.
    pub fn parse(raw: &str) -> Option<Self> {
        let kind = TaxIdKind::detect(raw)?;
        Self::parse_as(kind, raw).ok()
    }

    pub fn parse_as(kind: TaxIdKind, raw: &str) -> Result<Self, TaxIdIssue> {
        kind.diagnose(raw)?;
        Ok(TaxId {
            kind,
            digits: digits_only(raw),
        })
    }

    pub fn kind(&self) -> TaxIdKind {
        self.kind
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// The punctuated form used on screen, e.g. `111.444.777-35`.
    pub fn formatted(&self) -> String {
        let mask = match self.kind {
            TaxIdKind::Individual => MaskKind::Cpf,
            TaxIdKind::Organization => MaskKind::Cnpj,
        };
        mask.apply(&self.digits)
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}
