use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "housing-api")]
#[command(about = "Housing offers API with a linear price model")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Override data.dataset_path
    #[arg(long, global = true)]
    pub dataset: Option<String>,

    /// Override data.data_dir
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Override server.bind_address
    #[arg(long, global = true)]
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start the HTTP API
    Serve,
    /// Retrain the model from the dataset and print sample predictions
    Train,
    /// Predict the price of a single apartment
    Predict {
        #[arg(long)]
        area: f64,
        #[arg(long)]
        rooms: i64,
    },
}

impl CliConfig {
    /// Loads the configuration file (defaults when none is given) and applies overrides.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(dataset) = &self.dataset {
            config.data.dataset_path = dataset.clone();
        }
        if let Some(data_dir) = &self.data_dir {
            config.data.data_dir = data_dir.clone();
        }
        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }

        Ok(config)
    }
}
