pub mod audit_pipeline;
pub mod sidebar_session;
