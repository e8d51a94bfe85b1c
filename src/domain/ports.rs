use crate::domain::model::{NewOffer, Offer};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    /// `Ok(None)` when nothing is stored under `path`.
    fn read_file(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;

    /// Replaces the whole file; readers never observe a partial write.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn describe(&self, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn dataset_path(&self) -> &str;
    fn data_dir(&self) -> &str;
    fn model_artifact(&self) -> &str;
    fn retrain_on_corrupt(&self) -> bool;
}

/// Persistence for submitted offers. Implementations must not cache `list`.
#[async_trait]
pub trait OfferStore: Send + Sync {
    /// Stores the offer with the given predicted price and assigns its id.
    async fn create(&self, offer: NewOffer, price_total_zl: i64) -> Result<Offer>;
    async fn list(&self) -> Result<Vec<Offer>>;
}
