// Domain layer: core models and ports. No external dependencies beyond serde/chrono.

pub mod model;
pub mod ports;
