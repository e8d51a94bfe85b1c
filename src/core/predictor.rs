use crate::core::cache::ModelCache;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::sync::Arc;

pub struct Predictor<S: Storage> {
    cache: Arc<ModelCache<S>>,
}

impl<S: Storage> Clone for Predictor<S> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<S: Storage> Predictor<S> {
    pub fn new(cache: Arc<ModelCache<S>>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &ModelCache<S> {
        &self.cache
    }

    /// Raw price estimate. Inputs are not range checked; callers validate.
    pub async fn predict_price(&self, area_m2: f64, rooms: i64) -> Result<f64> {
        let model = self.cache.get().await?;
        Ok(model.predict(area_m2, rooms as f64))
    }
}
