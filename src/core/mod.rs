pub mod audit;
pub mod format;
pub mod masks;
pub mod notify;
pub mod sidebar;
pub mod tax_id;

pub use crate::domain::model::{AuditRecord, AuditReport, Menu};
pub use crate::domain::ports::{AuditPipeline, Confirm, Location, Storage, Viewport};
pub use crate::utils::error::Result;
