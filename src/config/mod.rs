pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::audit::AuditKind;
#[cfg(feature = "cli")]
use crate::core::masks::MaskKind;
#[cfg(feature = "cli")]
use crate::core::notify::ToastLevel;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use self::toml_config::{AuditSettings, ReportFormat};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatKind {
    Currency,
    Date,
    Datetime,
}

#[cfg(feature = "cli")]
#[derive(Debug, Parser)]
#[command(name = "erp-helpers")]
#[command(about = "Tax id validation, input masks and sidebar state for the ERP front end")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a CPF or CNPJ
    Validate {
        /// cpf, cnpj or auto
        kind: AuditKind,
        value: String,
    },
    /// Apply an input mask to a value
    Mask { kind: MaskKind, value: String },
    /// Format a value for pt-BR
    Format {
        #[arg(value_enum)]
        kind: FormatKind,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Print the markup of a toast notification
    Toast {
        #[arg(long, default_value = "info")]
        level: ToastLevel,
        message: String,
    },
    /// Replay UI events against the sidebar and print its state as JSON
    Sidebar {
        #[arg(long, default_value_t = 1280)]
        width: u32,

        #[arg(long, default_value = "/")]
        path: String,

        /// toggle, overlay, resize:<px>, key:<name>, section:<id>, navigate:<path>, tick:<ms>
        #[arg(long, value_delimiter = ',')]
        events: Vec<String>,
    },
    /// Audit a registry export for invalid or duplicated tax ids
    Audit {
        #[arg(long)]
        input: Option<String>,

        #[arg(long)]
        column: Option<String>,

        #[arg(long)]
        label_column: Option<String>,

        #[arg(long)]
        kind: Option<AuditKind>,

        #[arg(long)]
        output: Option<String>,

        #[arg(long, value_delimiter = ',')]
        format: Vec<ReportFormat>,

        #[arg(short, long, help = "Replace existing reports without asking")]
        yes: bool,
    },
}

#[cfg(feature = "cli")]
impl Command {
    /// Applies the audit flags on top of the file settings.
    pub fn apply_audit_overrides(&self, settings: &mut AuditSettings) {
        if let Command::Audit {
            input,
            column,
            label_column,
            kind,
            output,
            format,
            ..
        } = self
        {
            if let Some(input) = input {
                settings.input_path = Some(input.clone());
            }
            if let Some(column) = column {
                settings.column = Some(column.clone());
            }
            if let Some(label_column) = label_column {
                settings.label_column = Some(label_column.clone());
            }
            if let Some(kind) = kind {
                settings.kind = *kind;
            }
            if let Some(output) = output {
                settings.output_path = output.clone();
            }
            if !format.is_empty() {
                settings.output_formats = format.clone();
            }
        }
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_audit_flags_override_file_settings() {
        let cli = CliConfig::parse_from([
            "erp-helpers",
            "audit",
            "--input",
            "pessoas.csv",
            "--column",
            "cpf",
            "--kind",
            "cpf",
            "--format",
            "csv,json",
        ]);

        let mut settings = AuditSettings {
            output_path: "./out".to_string(),
            ..AuditSettings::default()
        };
        cli.command.apply_audit_overrides(&mut settings);

        assert_eq!(settings.input_path.as_deref(), Some("pessoas.csv"));
        assert_eq!(settings.column.as_deref(), Some("cpf"));
        assert_eq!(settings.kind, AuditKind::Cpf);
        assert_eq!(settings.output_path, "./out");
        assert_eq!(settings.output_formats, vec![ReportFormat::Csv, ReportFormat::Json]);
    }

    #[test]
    fn test_format_accepts_negative_amounts() {
        let cli = CliConfig::parse_from(["erp-helpers", "format", "currency", "-15.5"]);
        assert!(matches!(
            cli.command,
            Command::Format { kind: FormatKind::Currency, ref value } if value == "-15.5"
        ));
    }
}
