pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{FileOfferStore, InMemoryOfferStore, LocalStorage};
pub use api::AppState;
pub use config::TomlConfig;
pub use crate::core::{cache::ModelCache, predictor::Predictor, trainer::ModelTrainer};
pub use utils::error::{HousingError, Result};
