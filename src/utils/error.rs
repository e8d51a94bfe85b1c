use thiserror::Error;

#[derive(Error, Debug)]
pub enum HousingError {
    #[error("Dataset not found at {path}")]
    DataSourceMissing { path: String },

    #[error("Dataset format error: {message}")]
    DataFormat { message: String },

    #[error("No training rows left after cleaning the dataset")]
    InsufficientData,

    #[error("Model fit failed: {message}")]
    ModelFit { message: String },

    #[error("Model artifact at {path} is corrupt: {reason}")]
    ModelCorrupt { path: String, reason: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    TaskJoinError(#[from] tokio::task::JoinError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, HousingError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Data,
    Model,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HousingError {
    pub fn invalid_input(field: &str, value: impl ToString, reason: &str) -> Self {
        HousingError::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            HousingError::InvalidInput { .. } => ErrorCategory::Input,
            HousingError::DataSourceMissing { .. }
            | HousingError::DataFormat { .. }
            | HousingError::InsufficientData
            | HousingError::CsvError(_) => ErrorCategory::Data,
            HousingError::ModelCorrupt { .. } | HousingError::ModelFit { .. } => ErrorCategory::Model,
            HousingError::ConfigError { .. }
            | HousingError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            HousingError::IoError(_)
            | HousingError::SerializationError(_)
            | HousingError::TaskJoinError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            HousingError::InvalidInput { .. } => ErrorSeverity::Low,
            // a retrain can fix it
            HousingError::ModelCorrupt { .. } => ErrorSeverity::Medium,
            HousingError::DataSourceMissing { .. }
            | HousingError::DataFormat { .. }
            | HousingError::InsufficientData
            | HousingError::ModelFit { .. }
            | HousingError::CsvError(_)
            | HousingError::ConfigError { .. }
            | HousingError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            HousingError::IoError(_)
            | HousingError::SerializationError(_)
            | HousingError::TaskJoinError(_) => ErrorSeverity::Critical,
        }
    }

    /// True when the caller sent something we refuse to evaluate.
    pub fn is_client_error(&self) -> bool {
        self.category() == ErrorCategory::Input
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            HousingError::DataSourceMissing { .. } => {
                "Place the offers CSV at the configured data.dataset_path"
            }
            HousingError::DataFormat { .. } | HousingError::CsvError(_) => {
                "Check that the dataset has a header with rooms, area_m2 and price_total_zl columns"
            }
            HousingError::InsufficientData => {
                "Check the dataset contents; every row was dropped by the cleaning filters"
            }
            HousingError::ModelFit { .. } => "Check the dataset for degenerate or extreme values",
            HousingError::ModelCorrupt { .. } => {
                "Delete the model artifact or run `housing-api train` to rebuild it"
            }
            HousingError::InvalidInput { .. } => "Send a positive area_m2 and a non-negative rooms count",
            HousingError::ConfigError { .. }
            | HousingError::InvalidConfigValueError { .. } => "Fix the configuration file and restart",
            HousingError::IoError(_) => "Check file permissions and free disk space",
            HousingError::SerializationError(_) | HousingError::TaskJoinError(_) => {
                "Retry the operation; report it if the problem persists"
            }
        }
    }

    /// Message safe to show to API callers and CLI users.
    pub fn user_friendly_message(&self) -> String {
        match self {
            HousingError::InvalidInput { .. }
            | HousingError::InvalidConfigValueError { .. }
            | HousingError::ConfigError { .. } => self.to_string(),
            HousingError::DataSourceMissing { .. }
            | HousingError::DataFormat { .. }
            | HousingError::InsufficientData
            | HousingError::CsvError(_) => {
                "Price model is unavailable: training data could not be loaded".to_string()
            }
            HousingError::ModelCorrupt { .. } => {
                "Price model is unavailable: the stored model could not be read".to_string()
            }
            HousingError::ModelFit { .. } => {
                "Price model is unavailable: the model could not be fitted".to_string()
            }
            HousingError::IoError(_)
            | HousingError::SerializationError(_)
            | HousingError::TaskJoinError(_) => "Internal server error".to_string(),
        }
    }
}
