pub mod cache;
pub mod dataset;
pub mod predictor;
pub mod regression;
pub mod trainer;

pub use crate::domain::model::{FittedModel, ModelArtifact, TrainingRow};
pub use crate::domain::ports::{ConfigProvider, OfferStore, Storage};
pub use crate::utils::error::Result;
