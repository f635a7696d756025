use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::profile::{InventoryFilter, InventoryItem, StoreProfile};
use crate::error::Result;
use crate::wire::PersistedDocument;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub store_id: i64,
    pub customization: PersistedDocument,
    pub publish_now: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishReceipt {
    pub public_url: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlugCandidate {
    pub slug: String,
    pub available: bool,
}

/// Durable copy of record for customization documents, plus slug and
/// publish endpoints. The edit counter rides along with every save so a
/// server-side optimistic-concurrency check can be added later without
/// changing the client model.
#[async_trait]
pub trait CustomizationGateway: Send + Sync {
    async fn load(&self, store_id: i64) -> Result<Option<PersistedDocument>>;

    async fn save_draft(&self, document: &PersistedDocument, edit_counter: u64) -> Result<()>;

    async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt>;

    async fn generate_slug(&self, store_id: i64, seed_name: &str) -> Result<SlugCandidate>;
}

/// Read-only upstream store profile, the sole input to the data enricher.
#[async_trait]
pub trait StoreProfileGateway: Send + Sync {
    async fn comprehensive_details(&self, store_id: i64) -> Result<StoreProfile>;
}

/// Read-only feed for the featured-products preview; never persisted into
/// the document.
#[async_trait]
pub trait InventoryGateway: Send + Sync {
    async fn items(&self, filter: &InventoryFilter) -> Result<Vec<InventoryItem>>;
}
