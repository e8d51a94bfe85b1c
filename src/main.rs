use anyhow::Context;
use clap::Parser;
use housing_api::api::{self, AppState};
use housing_api::config::{CliConfig, Command};
use housing_api::utils::error::ErrorSeverity;
use housing_api::utils::{logger, validation::Validate};
use housing_api::{HousingError, LocalStorage, TomlConfig};

const SAMPLE_APARTMENTS: [(f64, i64); 4] = [(50.0, 2), (70.0, 3), (30.0, 1), (100.0, 4)];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.logging.json {
        logger::init_json_logger(cli.verbose, &config.logging.level);
    } else {
        logger::init_cli_logger(cli.verbose, &config.logging.level);
    }

    tracing::info!("Starting housing-api");
    if cli.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let state = AppState::from_config(&config);

    let outcome = match cli.command {
        Command::Serve => return serve(&config, state).await,
        Command::Train => train(&state).await,
        Command::Predict { area, rooms } => predict(&state, area, rooms).await,
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }

    Ok(())
}

async fn serve(config: &TomlConfig, state: AppState<LocalStorage>) -> anyhow::Result<()> {
    let addr = config.bind_address()?;

    if config.server.preload_model {
        let artifact = state
            .predictor
            .cache()
            .artifact()
            .await
            .context("failed to load the price model at startup")?;
        tracing::info!(
            "Model ready: R² {:.4} on {} samples",
            artifact.r_squared,
            artifact.samples
        );
    }

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot bind {}", addr))?;
    api::serve(listener, state).await?;
    Ok(())
}

async fn train(state: &AppState<LocalStorage>) -> Result<(), HousingError> {
    let artifact = state.predictor.cache().retrain().await?;
    println!(
        "✅ Model trained on {} samples (in-sample R² {:.4})",
        artifact.samples, artifact.r_squared
    );

    println!("\n=== Model Predictions ===");
    for (area, rooms) in SAMPLE_APARTMENTS {
        let price = state.predictor.predict_price(area, rooms).await?;
        println!(
            "Area: {} m², Rooms: {} → Price: {:.0} PLN ({:.0} PLN/m²)",
            area,
            rooms,
            price,
            price / area
        );
    }
    Ok(())
}

async fn predict(state: &AppState<LocalStorage>, area: f64, rooms: i64) -> Result<(), HousingError> {
    let request = housing_api::domain::model::PredictionRequest {
        area_m2: area,
        rooms,
        locality: None,
    };
    request.validate()?;

    let price = state.predictor.predict_price(area, rooms).await?;
    let prediction = housing_api::domain::model::PricePrediction::from_raw(area, rooms, price);
    println!("{}", serde_json::to_string_pretty(&prediction)?);
    Ok(())
}
