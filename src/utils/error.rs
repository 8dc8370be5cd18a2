use thiserror::Error;

#[derive(Error, Debug)]
pub enum HelperError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid date '{input}'")]
    InvalidDate { input: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Configuration,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HelperError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            HelperError::IoError(_) => ErrorCategory::Io,
            HelperError::CsvError(_)
            | HelperError::SerializationError(_)
            | HelperError::ProcessingError { .. } => ErrorCategory::Data,
            HelperError::TomlParseError(_)
            | HelperError::ConfigValidationError { .. }
            | HelperError::InvalidConfigValueError { .. }
            | HelperError::MissingConfigError { .. } => ErrorCategory::Configuration,
            HelperError::InvalidDate { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            HelperError::IoError(_) => "Check that the file exists and that you have permission to read or write it",
            HelperError::CsvError(_) => "Make sure the export is a comma separated file with a header row",
            HelperError::SerializationError(_) => "Report this issue; the report could not be serialized",
            HelperError::TomlParseError(_) => "Check the configuration file for TOML syntax errors",
            HelperError::ConfigValidationError { .. }
            | HelperError::InvalidConfigValueError { .. } => "Fix the reported configuration value and retry",
            HelperError::MissingConfigError { .. } => "Provide the missing value in the config file or as a command line flag",
            HelperError::InvalidDate { .. } => "Use YYYY-MM-DD, YYYY-MM-DD HH:MM:SS or an RFC 3339 timestamp",
            HelperError::ProcessingError { .. } => "Inspect the input data around the reported row",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            HelperError::IoError(e) => format!("Could not access a file: {}", e),
            HelperError::MissingConfigError { field } => {
                format!("The setting '{}' is required", field)
            }
            HelperError::InvalidConfigValueError { field, reason, .. } => {
                format!("The setting '{}' is invalid: {}", field, reason)
            }
            HelperError::InvalidDate { input } => format!("'{}' is not a recognised date", input),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, HelperError>;
