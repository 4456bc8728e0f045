use thiserror::Error;

use crate::fra_api::purchase_objects::Purchase;

#[derive(Debug, Clone, Error)]
pub enum PurchaseStoreError {
    #[error("Storage error: {0}")]
    StorageError(String),
}

/// Keyed store of purchase records. The engine only ever saves and looks up by id; everything else about
/// persistence is the embedder's business.
#[allow(async_fn_in_trait)]
pub trait PurchaseStore {
    async fn save(&self, purchase: Purchase) -> Result<Purchase, PurchaseStoreError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Purchase>, PurchaseStoreError>;
}
