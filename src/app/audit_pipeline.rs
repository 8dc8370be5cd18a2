use crate::config::toml_config::{AuditSettings, ReportFormat};
use crate::core::audit::audit_records;
use crate::domain::model::{AuditRecord, AuditReport};
use crate::domain::ports::{AuditPipeline, Storage};
use crate::utils::error::{HelperError, Result};
use crate::utils::validation::validate_required_field;

/// Reads a CSV export through `source` and writes the reports through `sink`.
pub struct CsvAuditPipeline<S: Storage, T: Storage> {
    source: S,
    sink: T,
    settings: AuditSettings,
}

impl<S: Storage, T: Storage> CsvAuditPipeline<S, T> {
    pub fn new(source: S, sink: T, settings: AuditSettings) -> Self {
        Self {
            source,
            sink,
            settings,
        }
    }

    /// Report files that already exist and would be replaced by `load`.
    pub fn existing_reports(&self) -> Vec<String> {
        self.settings
            .output_formats
            .iter()
            .map(|format| format.file_name())
            .filter(|name| self.sink.exists(name))
            .map(|name| self.sink.describe(name))
            .collect()
    }

    fn render(&self, report: &AuditReport, format: ReportFormat) -> Result<Vec<u8>> {
        match format {
            ReportFormat::Json => Ok(serde_json::to_vec_pretty(report)?),
            ReportFormat::Csv => {
                let mut writer = csv::Writer::from_writer(Vec::new());
                for outcome in &report.outcomes {
                    writer.serialize(outcome)?;
                }
                writer
                    .into_inner()
                    .map_err(|e| HelperError::ProcessingError {
                        message: format!("Failed to finish CSV report: {}", e),
                    })
            }
        }
    }
}

fn find_column(headers: &csv::ByteRecord, field: &str, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name.as_bytes()))
        .ok_or_else(|| HelperError::ConfigValidationError {
            field: field.to_string(),
            message: format!(
                "Column '{}' not found; available columns: {}",
                name,
                headers
                    .iter()
                    .map(String::from_utf8_lossy)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        })
}

impl<S: Storage, T: Storage> AuditPipeline for CsvAuditPipeline<S, T> {
    fn extract(&self) -> Result<Vec<AuditRecord>> {
        let input = validate_required_field("audit.input_path", &self.settings.input_path)?;
        let column = validate_required_field("audit.column", &self.settings.column)?;

        tracing::debug!("Reading export: {}", self.source.describe(input));
        let data = self.source.read_file(input)?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(data.as_slice());

        // Exports saved as Latin-1 are common; only the digits of the value matter.
        let headers = reader.byte_headers()?.clone();
        let value_index = find_column(&headers, "audit.column", column)?;
        let label_index = self
            .settings
            .label_column
            .as_deref()
            .map(|label| find_column(&headers, "audit.label_column", label))
            .transpose()?;

        let mut records = Vec::new();
        for (i, result) in reader.byte_records().enumerate() {
            let row = result?;
            records.push(AuditRecord {
                row: i + 1,
                label: label_index
                    .and_then(|index| row.get(index))
                    .filter(|label| !label.is_empty())
                    .map(|label| String::from_utf8_lossy(label).into_owned()),
                value: String::from_utf8_lossy(row.get(value_index).unwrap_or_default())
                    .into_owned(),
            });
        }

        Ok(records)
    }

    fn transform(&self, records: Vec<AuditRecord>) -> Result<AuditReport> {
        Ok(audit_records(records, self.settings.kind))
    }

    fn load(&self, report: &AuditReport) -> Result<Vec<String>> {
        let mut written = Vec::new();
        for &format in &self.settings.output_formats {
            let name = format.file_name();
            let bytes = self.render(report, format)?;
            self.sink.write_file(name, &bytes)?;
            written.push(self.sink.describe(name));
        }
        Ok(written)
    }
}
