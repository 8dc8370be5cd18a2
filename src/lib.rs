pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::audit_pipeline::CsvAuditPipeline;
pub use app::sidebar_session::SidebarSession;
pub use config::cli::LocalStorage;
pub use config::toml_config::HelperConfig;
pub use crate::core::audit::AuditEngine;
pub use crate::core::masks::MaskKind;
pub use crate::core::sidebar::{SidebarController, SidebarSettings, UiEvent};
pub use crate::core::tax_id::{validate_individual, validate_organization, TaxId, TaxIdKind};
pub use utils::error::{HelperError, Result};
