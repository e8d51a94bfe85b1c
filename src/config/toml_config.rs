use crate::domain::ports::ConfigProvider;
use crate::utils::error::{HousingError, Result};
use crate::utils::validation::{
    validate_file_extension, validate_one_of, validate_path, validate_socket_addr, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

pub const OFFER_BACKENDS: [&str; 2] = ["file", "memory"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub model: ModelConfig,
    pub offers: OffersConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    /// Resolve the model at startup instead of on the first request.
    pub preload_model: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8000".to_string(),
            preload_model: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dataset_path: String,
    /// Base directory of the model artifact and the offers file.
    pub data_dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset_path: "data/adresowo_wroclaw_all.csv".to_string(),
            data_dir: ".".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub artifact: String,
    pub retrain_on_corrupt: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact: "model.json".to_string(),
            retrain_on_corrupt: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OffersConfig {
    pub backend: String,
    pub file: String,
}

impl Default for OffersConfig {
    fn default() -> Self {
        Self {
            backend: "file".to_string(),
            file: "offers.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| HousingError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HousingError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATASET_PATH})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HousingError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn bind_address(&self) -> Result<SocketAddr> {
        validate_socket_addr("server.bind_address", &self.server.bind_address)
    }

    pub fn uses_memory_offers(&self) -> bool {
        self.offers.backend == "memory"
    }
}

impl ConfigProvider for TomlConfig {
    fn dataset_path(&self) -> &str {
        &self.data.dataset_path
    }

    fn data_dir(&self) -> &str {
        &self.data.data_dir
    }

    fn model_artifact(&self) -> &str {
        &self.model.artifact
    }

    fn retrain_on_corrupt(&self) -> bool {
        self.model.retrain_on_corrupt
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.bind_address()?;
        validate_path("data.dataset_path", &self.data.dataset_path)?;
        validate_path("data.data_dir", &self.data.data_dir)?;
        validate_path("model.artifact", &self.model.artifact)?;
        validate_file_extension("model.artifact", &self.model.artifact, &["json"])?;
        validate_one_of("offers.backend", &self.offers.backend, &OFFER_BACKENDS)?;
        if !self.uses_memory_offers() {
            validate_path("offers.file", &self.offers.file)?;
            validate_file_extension("offers.file", &self.offers.file, &["json"])?;
        }
        validate_one_of(
            "logging.level",
            &self.logging.level,
            &["trace", "debug", "info", "warn", "error"],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
bind_address = "0.0.0.0:9000"
preload_model = true

[data]
dataset_path = "/srv/data/offers.csv"
data_dir = "/srv/state"

[model]
artifact = "price-model.json"
retrain_on_corrupt = true

[offers]
backend = "memory"

[logging]
level = "debug"
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.bind_address().unwrap().port(), 9000);
        assert!(config.server.preload_model);
        assert_eq!(config.dataset_path(), "/srv/data/offers.csv");
        assert_eq!(config.data_dir(), "/srv/state");
        assert_eq!(config.model_artifact(), "price-model.json");
        assert!(config.retrain_on_corrupt());
        assert!(config.uses_memory_offers());
        assert!(config.logging.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.server.bind_address, "127.0.0.1:8000");
        assert_eq!(config.dataset_path(), "data/adresowo_wroclaw_all.csv");
        assert_eq!(config.model_artifact(), "model.json");
        assert_eq!(config.offers.file, "offers.json");
        assert!(!config.uses_memory_offers());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("HOUSING_TEST_DATASET", "/tmp/wroclaw.csv");

        let toml_content = r#"
[data]
dataset_path = "${HOUSING_TEST_DATASET}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.data.dataset_path, "/tmp/wroclaw.csv");

        std::env::remove_var("HOUSING_TEST_DATASET");
    }

    #[test]
    fn test_unset_env_var_is_left_verbatim() {
        let toml_content = r#"
[data]
data_dir = "${HOUSING_TEST_UNSET_DIR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.data.data_dir, "${HOUSING_TEST_UNSET_DIR}");
    }

    #[test]
    fn test_config_validation() {
        let bad_bind = TomlConfig::from_toml_str("[server]\nbind_address = \"nowhere\"\n").unwrap();
        assert!(bad_bind.validate().is_err());

        let bad_backend = TomlConfig::from_toml_str("[offers]\nbackend = \"sqlite\"\n").unwrap();
        assert!(bad_backend.validate().is_err());

        let bad_artifact = TomlConfig::from_toml_str("[model]\nartifact = \"model.pkl\"\n").unwrap();
        assert!(bad_artifact.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("[server\nbind_address = 1");
        assert!(matches!(result, Err(HousingError::ConfigError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[model]\nartifact = \"from-file.json\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.model_artifact(), "from-file.json");
    }
}
