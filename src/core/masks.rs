//! Input masks for the ERP forms, keyed by the `data-mask` attribute value.
//!
//! Every mask first drops everything that is not a digit and then applies its
//! substitutions in order, each one replacing only the first match. Partial
//! input is fine: typing `1114` into a CPF field yields `111.4`.

use crate::core::format::group_thousands;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskKind {
    Cpf,
    Cnpj,
    Phone,
    Cep,
    Currency,
}

struct Substitution {
    pattern: Regex,
    replacement: &'static str,
}

fn rule(pattern: &str, replacement: &'static str) -> Substitution {
    Substitution {
        pattern: Regex::new(pattern).expect("mask patterns are valid"),
        replacement,
    }
}

static CPF_RULES: LazyLock<Vec<Substitution>> = LazyLock::new(|| {
    vec![
        rule(r"(\d{3})(\d)", "${1}.${2}"),
        rule(r"(\d{3})(\d)", "${1}.${2}"),
        rule(r"(\d{3})(\d{1,2})$", "${1}-${2}"),
    ]
});

static CNPJ_RULES: LazyLock<Vec<Substitution>> = LazyLock::new(|| {
    vec![
        rule(r"^(\d{2})(\d)", "${1}.${2}"),
        rule(r"^(\d{2})\.(\d{3})(\d)", "${1}.${2}.${3}"),
        rule(r"\.(\d{3})(\d)", ".${1}/${2}"),
        rule(r"(\d{4})(\d)", "${1}-${2}"),
    ]
});

static LANDLINE_RULES: LazyLock<Vec<Substitution>> = LazyLock::new(|| {
    vec![
        rule(r"(\d{2})(\d)", "(${1}) ${2}"),
        rule(r"(\d{4})(\d)", "${1}-${2}"),
    ]
});

static MOBILE_RULES: LazyLock<Vec<Substitution>> = LazyLock::new(|| {
    vec![
        rule(r"(\d{2})(\d)", "(${1}) ${2}"),
        rule(r"(\d{5})(\d)", "${1}-${2}"),
    ]
});

static CEP_RULES: LazyLock<Vec<Substitution>> =
    LazyLock::new(|| vec![rule(r"(\d{5})(\d)", "${1}-${2}")]);

// Ten digits or fewer is a landline (DDD + 8), otherwise a mobile (DDD + 9).
const LANDLINE_MAX_DIGITS: usize = 10;

fn substitute(digits: String, rules: &[Substitution]) -> String {
    rules.iter().fold(digits, |value, r| {
        r.pattern.replace(&value, r.replacement).into_owned()
    })
}

fn currency(digits: &str) -> String {
    let significant = digits.trim_start_matches('0');
    let padded = format!("{:0>3}", significant);
    let (units, cents) = padded.split_at(padded.len() - 2);
    format!("R$ {},{}", group_thousands(units), cents)
}

impl MaskKind {
    pub const ALL: [MaskKind; 5] = [
        MaskKind::Cpf,
        MaskKind::Cnpj,
        MaskKind::Phone,
        MaskKind::Cep,
        MaskKind::Currency,
    ];

    /// The `data-mask` attribute value that selects this mask.
    pub fn attribute(self) -> &'static str {
        match self {
            MaskKind::Cpf => "cpf",
            MaskKind::Cnpj => "cnpj",
            MaskKind::Phone => "phone",
            MaskKind::Cep => "cep",
            MaskKind::Currency => "currency",
        }
    }

    pub fn from_attribute(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.attribute() == value)
    }

    /// Rewrites the current field value the way the input handler would.
    pub fn apply(self, input: &str) -> String {
        let digits: String = input.chars().filter(char::is_ascii_digit).collect();
        match self {
            MaskKind::Cpf => substitute(digits, &CPF_RULES),
            MaskKind::Cnpj => substitute(digits, &CNPJ_RULES),
            MaskKind::Phone if digits.len() <= LANDLINE_MAX_DIGITS => {
                substitute(digits, &LANDLINE_RULES)
            }
            MaskKind::Phone => substitute(digits, &MOBILE_RULES),
            MaskKind::Cep => substitute(digits, &CEP_RULES),
            MaskKind::Currency => currency(&digits),
        }
    }
}

impl fmt::Display for MaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

impl FromStr for MaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_attribute(s.trim()).ok_or_else(|| {
            format!(
                "unknown mask '{}' (expected one of: cpf, cnpj, phone, cep, currency)",
                s
            )
        })
    }
}
