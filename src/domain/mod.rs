// Domain layer: models and ports shared by the core helpers and the adapters.

pub mod model;
pub mod ports;
