use crate::core::audit::AuditKind;
use crate::core::sidebar::SidebarSettings;
use crate::domain::model::{Menu, MenuEntry};
use crate::utils::error::{HelperError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const ALLOWED_INPUT_EXTENSIONS: [&str; 2] = ["csv", "txt"];
const MAX_BREAKPOINT_PX: u32 = 10_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HelperConfig {
    #[serde(default)]
    pub sidebar: SidebarSettings,
    #[serde(default)]
    pub menu: Option<Menu>,
    #[serde(default)]
    pub audit: AuditSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Csv,
    Json,
}

impl ReportFormat {
    pub fn file_name(self) -> &'static str {
        match self {
            ReportFormat::Csv => "audit_report.csv",
            ReportFormat::Json => "audit_report.json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        })
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ReportFormat::Csv),
            "json" => Ok(ReportFormat::Json),
            other => Err(format!("unsupported report format '{}' (expected csv or json)", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSettings {
    pub input_path: Option<String>,
    /// Header of the column holding the CPF/CNPJ.
    pub column: Option<String>,
    /// Optional header shown next to each row, e.g. `razao_social`.
    pub label_column: Option<String>,
    pub kind: AuditKind,
    pub output_path: String,
    pub output_formats: Vec<ReportFormat>,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            input_path: None,
            column: None,
            label_column: None,
            kind: AuditKind::Auto,
            output_path: "./reports".to_string(),
            output_formats: vec![ReportFormat::Csv],
        }
    }
}

impl AuditSettings {
    /// Checks the settings needed to actually run an audit.
    pub fn validate_for_run(&self) -> Result<()> {
        let input = validation::validate_required_field("audit.input_path", &self.input_path)?;
        validation::validate_path("audit.input_path", input)?;
        validation::validate_file_extension("audit.input_path", input, &ALLOWED_INPUT_EXTENSIONS)?;

        let column = validation::validate_required_field("audit.column", &self.column)?;
        validation::validate_non_empty_string("audit.column", column)?;

        self.validate()
    }
}

impl Validate for AuditSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_path("audit.output_path", &self.output_path)?;
        if self.output_formats.is_empty() {
            return Err(HelperError::ConfigValidationError {
                field: "audit.output_formats".to_string(),
                message: "At least one report format is required".to_string(),
            });
        }
        if let Some(label) = &self.label_column {
            validation::validate_non_empty_string("audit.label_column", label)?;
        }
        Ok(())
    }
}

impl HelperConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        let re = Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid");

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    /// The configured menu, or the ERP navigation when none is given.
    pub fn menu_or_default(&self) -> Menu {
        self.menu.clone().unwrap_or_else(Menu::erp_default)
    }

    fn validate_menu(menu: &Menu) -> Result<()> {
        for entry in &menu.entries {
            validation::validate_non_empty_string("menu.entries.label", entry.label())?;
            if let MenuEntry::Section(section) = entry {
                validation::validate_non_empty_string("menu.entries.id", &section.id)?;
                for item in &section.items {
                    validation::validate_non_empty_string("menu.entries.items.label", &item.label)?;
                }
            }
        }
        validation::validate_unique("menu.entries.id", menu.sections().map(|s| s.id.as_str()))
    }
}

impl Validate for HelperConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_range(
            "sidebar.breakpoint_px",
            self.sidebar.breakpoint_px,
            1,
            MAX_BREAKPOINT_PX,
        )?;
        if let Some(menu) = &self.menu {
            Self::validate_menu(menu)?;
        }
        self.audit.validate()
    }
}
