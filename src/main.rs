use anyhow::Context;
use clap::Parser;
use erp_helpers::config::cli::StdinConfirm;
use erp_helpers::config::{Command, FormatKind, LogFormat};
use erp_helpers::core::audit::AuditKind;
use erp_helpers::core::format::{format_currency, format_date, format_datetime};
use erp_helpers::core::notify::{confirm_delete, ToastLevel, ToastStack};
use erp_helpers::utils::error::ErrorSeverity;
use erp_helpers::utils::{logger, validation::Validate};
use erp_helpers::{
    AuditEngine, CliConfig, CsvAuditPipeline, HelperConfig, HelperError, LocalStorage, SidebarSession,
    TaxId,
};

const REPLACE_REPORTS_PROMPT: &str = "Os relatórios existentes serão substituídos. Continuar?";

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    match run(&cli.command, config) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            if let Some(helper_error) = e.downcast_ref::<HelperError>() {
                exit_with(helper_error);
            }
            Err(e)
        }
    }
}

fn load_config(path: Option<&str>) -> erp_helpers::Result<HelperConfig> {
    let config = match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            HelperConfig::from_file(path)?
        }
        None => HelperConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn exit_with(e: &HelperError) -> ! {
    tracing::error!(
        "{} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}

/// Runs one subcommand and returns the process exit code.
fn run(command: &Command, config: HelperConfig) -> anyhow::Result<i32> {
    match command {
        Command::Validate { kind, value } => Ok(validate(*kind, value)),
        Command::Mask { kind, value } => {
            println!("{}", kind.apply(value));
            Ok(0)
        }
        Command::Format { kind, value } => {
            let formatted = match kind {
                FormatKind::Currency => {
                    let amount: f64 = value
                        .trim()
                        .parse()
                        .with_context(|| format!("'{}' is not a number", value))?;
                    format_currency(amount)
                }
                FormatKind::Date => format_date(value)?,
                FormatKind::Datetime => format_datetime(value)?,
            };
            println!("{}", formatted);
            Ok(0)
        }
        Command::Toast { level, message } => {
            println!("{}", toast_markup(*level, message));
            Ok(0)
        }
        Command::Sidebar {
            width,
            path,
            events,
        } => {
            let mut session =
                SidebarSession::new(config.sidebar, config.menu_or_default(), *width, path);
            let view = session.run_script(events)?;
            println!("{}", serde_json::to_string_pretty(&view)?);
            Ok(0)
        }
        Command::Audit { yes, .. } => {
            let mut settings = config.audit;
            command.apply_audit_overrides(&mut settings);
            settings.validate_for_run()?;

            let output_path = settings.output_path.clone();
            let pipeline = CsvAuditPipeline::new(
                LocalStorage::new(String::new()),
                LocalStorage::new(output_path),
                settings,
            );

            let existing = pipeline.existing_reports();
            if !existing.is_empty() && !*yes {
                tracing::info!("Existing reports: {}", existing.join(", "));
                if !confirm_delete(&StdinConfirm, Some(REPLACE_REPORTS_PROMPT)) {
                    println!("Audit cancelled; existing reports kept.");
                    return Ok(0);
                }
            }

            let (report, written) = AuditEngine::new(pipeline).run()?;
            let summary = &report.summary;
            println!(
                "✅ {} rows audited: {} valid, {} invalid, {} missing, {} duplicate",
                summary.total, summary.valid, summary.invalid, summary.missing, summary.duplicate
            );
            for path in written {
                println!("📁 Report saved to: {}", path);
            }
            Ok(if summary.is_clean() { 0 } else { 1 })
        }
    }
}

fn validate(kind: AuditKind, value: &str) -> i32 {
    let Some(tax_kind) = kind.resolve(value) else {
        println!("❌ invalid: expected 11 (CPF) or 14 (CNPJ) digits");
        return 1;
    };

    match TaxId::parse_as(tax_kind, value) {
        Ok(tax_id) => {
            println!("✅ valid {}: {}", tax_kind, tax_id);
            0
        }
        Err(issue) => {
            println!("❌ invalid {}: {}", tax_kind, issue);
            1
        }
    }
}

fn toast_markup(level: ToastLevel, message: &str) -> String {
    let mut stack = ToastStack::new();
    stack.show(message, level);
    stack
        .iter()
        .map(|toast| toast.to_html())
        .collect::<Vec<_>>()
        .join("\n")
}
