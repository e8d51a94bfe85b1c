use crate::core::dataset::DatasetLoader;
use crate::core::regression::fit_ols;
use crate::domain::model::ModelArtifact;
use crate::domain::ports::Storage;
use crate::utils::error::Result;

pub struct ModelTrainer<S: Storage> {
    loader: DatasetLoader,
    storage: S,
    artifact: String,
}

impl<S: Storage> ModelTrainer<S> {
    pub fn new(loader: DatasetLoader, storage: S, artifact: impl Into<String>) -> Self {
        Self {
            loader,
            storage,
            artifact: artifact.into(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    /// Loads the dataset, fits the model and overwrites the stored artifact.
    ///
    /// Nothing is written when loading or fitting fails.
    pub async fn train_model(&self) -> Result<ModelArtifact> {
        let loader = self.loader.clone();
        let report = tokio::task::spawn_blocking(move || {
            let rows = loader.load_data()?;
            fit_ols(&rows)
        })
        .await??;

        tracing::info!("Model R² score: {:.4} (in-sample)", report.r_squared);
        tracing::info!(
            "Model coefficients: area_m2={:.2}, rooms={:.2}",
            report.model.area_coef,
            report.model.rooms_coef
        );
        tracing::info!("Model intercept: {:.2}", report.model.intercept);

        let artifact = ModelArtifact::new(report.model, report.r_squared, report.samples);
        let data = serde_json::to_vec_pretty(&artifact)?;
        self.storage.write_file(&self.artifact, &data).await?;

        tracing::info!(
            "Model trained on {} samples and saved to {}",
            report.samples,
            self.storage.describe(&self.artifact)
        );
        Ok(artifact)
    }
}
