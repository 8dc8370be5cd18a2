use crate::core::tax_id::{TaxId, TaxIdKind, INDIVIDUAL_LEN, ORGANIZATION_LEN};
use crate::domain::model::{AuditOutcome, AuditRecord, AuditReport, AuditStatus};
use crate::domain::ports::AuditPipeline;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Which identifier the audited column is expected to hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditKind {
    Cpf,
    Cnpj,
    /// Decide per row from the digit count.
    #[default]
    Auto,
}

impl AuditKind {
    /// The identifier kind to check `raw` against, if one applies.
    pub fn resolve(self, raw: &str) -> Option<TaxIdKind> {
        match self {
            AuditKind::Cpf => Some(TaxIdKind::Individual),
            AuditKind::Cnpj => Some(TaxIdKind::Organization),
            AuditKind::Auto => TaxIdKind::detect(raw),
        }
    }
}

impl fmt::Display for AuditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AuditKind::Cpf => "cpf",
            AuditKind::Cnpj => "cnpj",
            AuditKind::Auto => "auto",
        })
    }
}

impl FromStr for AuditKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(AuditKind::Auto),
            other => other.parse::<TaxIdKind>().map(|kind| match kind {
                TaxIdKind::Individual => AuditKind::Cpf,
                TaxIdKind::Organization => AuditKind::Cnpj,
            }),
        }
    }
}

/// Checks every record and flags repeats of an identifier already seen valid.
pub fn audit_records(records: Vec<AuditRecord>, kind: AuditKind) -> AuditReport {
    let mut report = AuditReport::default();
    let mut first_seen: HashMap<String, usize> = HashMap::new();

    for record in records {
        let outcome = audit_one(record, kind, &mut first_seen);
        report.summary.record(outcome.status);
        report.outcomes.push(outcome);
    }

    report
}

fn audit_one(
    record: AuditRecord,
    kind: AuditKind,
    first_seen: &mut HashMap<String, usize>,
) -> AuditOutcome {
    let AuditRecord { row, label, value } = record;
    let mut outcome = AuditOutcome {
        row,
        label,
        value,
        kind: None,
        status: AuditStatus::Missing,
        detail: None,
        formatted: None,
    };

    if outcome.value.trim().is_empty() {
        return outcome;
    }

    let Some(expected) = kind.resolve(&outcome.value) else {
        outcome.status = AuditStatus::Invalid;
        outcome.detail = Some(format!(
            "expected {} or {} digits, found {}",
            INDIVIDUAL_LEN,
            ORGANIZATION_LEN,
            outcome.value.chars().filter(char::is_ascii_digit).count()
        ));
        return outcome;
    };
    outcome.kind = Some(expected);

    match TaxId::parse_as(expected, &outcome.value) {
        Ok(tax_id) => {
            outcome.formatted = Some(tax_id.formatted());
            match first_seen.get(tax_id.digits()) {
                Some(&first_row) => {
                    outcome.status = AuditStatus::Duplicate;
                    outcome.detail = Some(format!("{} already used on row {}", expected, first_row));
                }
                None => {
                    first_seen.insert(tax_id.digits().to_string(), row);
                    outcome.status = AuditStatus::Valid;
                }
            }
        }
        Err(issue) => {
            outcome.status = AuditStatus::Invalid;
            outcome.detail = Some(issue.to_string());
        }
    }

    outcome
}

pub struct AuditEngine<P: AuditPipeline> {
    pipeline: P,
}

impl<P: AuditPipeline> AuditEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn run(&self) -> Result<(AuditReport, Vec<String>)> {
        tracing::info!("Starting registry audit");

        let records = self.pipeline.extract()?;
        tracing::info!("Extracted {} rows", records.len());

        let report = self.pipeline.transform(records)?;
        let summary = &report.summary;
        tracing::info!(
            "Audited {} rows: {} valid, {} invalid, {} missing, {} duplicate",
            summary.total,
            summary.valid,
            summary.invalid,
            summary.missing,
            summary.duplicate
        );
        for outcome in report
            .outcomes
            .iter()
            .filter(|o| o.status != AuditStatus::Valid)
        {
            tracing::debug!(
                "Row {} ({:?}): {:?} {}",
                outcome.row,
                outcome.value,
                outcome.status,
                outcome.detail.as_deref().unwrap_or("")
            );
        }

        let written = self.pipeline.load(&report)?;
        for path in &written {
            tracing::info!("Report saved to: {}", path);
        }

        Ok((report, written))
    }
}
