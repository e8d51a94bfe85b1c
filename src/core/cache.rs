use crate::core::dataset::DatasetLoader;
use crate::core::trainer::ModelTrainer;
use crate::domain::model::{FittedModel, ModelArtifact};
use crate::domain::ports::{ConfigProvider, Storage};
use crate::utils::error::{HousingError, Result};
use tokio::sync::{Mutex, RwLock};

/// Cache-aside access to the fitted price model.
///
/// The stored artifact is the source of truth across restarts. A missing
/// artifact is rebuilt by training, and only one caller trains at a time:
/// others wait on the same guard and pick up the fresh model. The loaded model
/// is kept in memory until [`ModelCache::retrain`] replaces it.
pub struct ModelCache<S: Storage> {
    trainer: ModelTrainer<S>,
    retrain_on_corrupt: bool,
    current: RwLock<Option<ModelArtifact>>,
    train_lock: Mutex<()>,
}

impl<S: Storage> ModelCache<S> {
    pub fn new(trainer: ModelTrainer<S>, retrain_on_corrupt: bool) -> Self {
        Self {
            trainer,
            retrain_on_corrupt,
            current: RwLock::new(None),
            train_lock: Mutex::new(()),
        }
    }

    pub fn from_config<C: ConfigProvider>(storage: S, config: &C) -> Self {
        let trainer = ModelTrainer::new(
            DatasetLoader::new(config.dataset_path()),
            storage,
            config.model_artifact(),
        );
        Self::new(trainer, config.retrain_on_corrupt())
    }

    /// The model every prediction uses.
    pub async fn get(&self) -> Result<FittedModel> {
        Ok(self.artifact().await?.model)
    }

    /// The model with the diagnostics of the fit that produced it.
    pub async fn artifact(&self) -> Result<ModelArtifact> {
        if let Some(artifact) = self.current.read().await.as_ref() {
            return Ok(artifact.clone());
        }

        let _guard = self.train_lock.lock().await;
        if let Some(artifact) = self.current.read().await.as_ref() {
            return Ok(artifact.clone());
        }

        let artifact = self.resolve().await?;
        *self.current.write().await = Some(artifact.clone());
        Ok(artifact)
    }

    /// Reads the stored artifact, training a new model only when none exists.
    pub async fn load_model(&self) -> Result<FittedModel> {
        if let Ok(Some(artifact)) = self.read_artifact().await {
            return Ok(artifact.model);
        }

        let _guard = self.train_lock.lock().await;
        let artifact = self.resolve().await?;
        *self.current.write().await = Some(artifact.clone());
        Ok(artifact.model)
    }

    /// Trains unconditionally and replaces both the stored and in-memory model.
    pub async fn retrain(&self) -> Result<ModelArtifact> {
        let _guard = self.train_lock.lock().await;
        let artifact = self.trainer.train_model().await?;
        *self.current.write().await = Some(artifact.clone());
        Ok(artifact)
    }

    // caller holds train_lock
    async fn resolve(&self) -> Result<ModelArtifact> {
        match self.read_artifact().await {
            Ok(Some(artifact)) => Ok(artifact),
            Ok(None) => {
                tracing::info!("Model file not found. Training new model...");
                self.trainer.train_model().await
            }
            Err(e @ HousingError::ModelCorrupt { .. }) if self.retrain_on_corrupt => {
                tracing::warn!("{}; retraining", e);
                self.trainer.train_model().await
            }
            Err(e) => Err(e),
        }
    }

    async fn read_artifact(&self) -> Result<Option<ModelArtifact>> {
        let storage = self.trainer.storage();
        let name = self.trainer.artifact();
        let Some(data) = storage.read_file(name).await? else {
            return Ok(None);
        };

        let corrupt = |reason: String| HousingError::ModelCorrupt {
            path: storage.describe(name),
            reason,
        };

        let artifact: ModelArtifact =
            serde_json::from_slice(&data).map_err(|e| corrupt(e.to_string()))?;
        if artifact.format_version != ModelArtifact::FORMAT_VERSION {
            return Err(corrupt(format!(
                "unsupported format version {}",
                artifact.format_version
            )));
        }
        if !artifact.model.is_finite() {
            return Err(corrupt("non-finite coefficients".to_string()));
        }

        tracing::debug!("Loaded model from {}", storage.describe(name));
        Ok(Some(artifact))
    }
}
