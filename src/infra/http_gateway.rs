use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::json;
use tracing::instrument;

use crate::app::ports::{
    CustomizationGateway, InventoryGateway, PublishReceipt, PublishRequest, SlugCandidate,
    StoreProfileGateway,
};
use crate::domain::profile::{InventoryFilter, InventoryItem, StoreProfile};
use crate::error::{ComposerError, Result};
use crate::observability;
use crate::wire::PersistedDocument;

/// Reqwest adapter for every backend port: customization persistence,
/// store profile, inventory feed. One client, JSON bodies throughout.
pub struct StorefrontApi {
    client: reqwest::Client,
    base_url: String,
}

impl StorefrontApi {
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map HTTP failure statuses into the error taxonomy: 401/403 are
    /// authorization failures with their own message, everything else
    /// non-2xx is a generic API error.
    async fn check(endpoint: &'static str, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            observability::metrics::gateway_error(endpoint);
            return Err(ComposerError::Authorization {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            observability::metrics::gateway_error(endpoint);
            let body = response.text().await.unwrap_or_default();
            return Err(ComposerError::Api {
                message: format!("{} returned HTTP {}: {}", endpoint, status.as_u16(), body),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl CustomizationGateway for StorefrontApi {
    #[instrument(skip(self))]
    async fn load(&self, store_id: i64) -> Result<Option<PersistedDocument>> {
        let started = Instant::now();
        let response = self
            .client
            .get(self.url(&format!("/stores/{store_id}/storefront/customization")))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check("load_customization", response).await?;
        let document = response.json::<PersistedDocument>().await?;
        observability::metrics::gateway_call("load_customization", started.elapsed().as_secs_f64());
        Ok(Some(document))
    }

    #[instrument(skip(self, document), fields(store_id = document.store_id))]
    async fn save_draft(&self, document: &PersistedDocument, edit_counter: u64) -> Result<()> {
        let started = Instant::now();
        let response = self
            .client
            .put(self.url(&format!(
                "/stores/{}/storefront/customization",
                document.store_id
            )))
            // the document body stays bit-exact; the counter rides in a header
            .header("x-edit-counter", edit_counter)
            .json(document)
            .send()
            .await?;
        Self::check("save_customization", response).await?;
        observability::metrics::gateway_call("save_customization", started.elapsed().as_secs_f64());
        Ok(())
    }

    #[instrument(skip(self, request), fields(store_id = request.store_id))]
    async fn publish(&self, request: &PublishRequest) -> Result<PublishReceipt> {
        let started = Instant::now();
        let response = self
            .client
            .post(self.url(&format!("/stores/{}/storefront/publish", request.store_id)))
            .json(request)
            .send()
            .await?;
        let response = Self::check("publish_storefront", response).await?;
        let receipt = response.json::<PublishReceipt>().await?;
        observability::metrics::gateway_call("publish_storefront", started.elapsed().as_secs_f64());
        Ok(receipt)
    }

    #[instrument(skip(self))]
    async fn generate_slug(&self, store_id: i64, seed_name: &str) -> Result<SlugCandidate> {
        let started = Instant::now();
        let response = self
            .client
            .post(self.url(&format!("/stores/{store_id}/storefront/slug")))
            .json(&json!({ "seedName": seed_name }))
            .send()
            .await?;
        let response = Self::check("generate_slug", response).await?;
        let candidate = response.json::<SlugCandidate>().await?;
        observability::metrics::gateway_call("generate_slug", started.elapsed().as_secs_f64());
        Ok(candidate)
    }
}

#[async_trait]
impl StoreProfileGateway for StorefrontApi {
    #[instrument(skip(self))]
    async fn comprehensive_details(&self, store_id: i64) -> Result<StoreProfile> {
        let started = Instant::now();
        let response = self
            .client
            .get(self.url(&format!("/stores/{store_id}/details/comprehensive")))
            .send()
            .await?;
        let response = Self::check("store_details", response).await?;
        let profile = response.json::<StoreProfile>().await?;
        observability::metrics::gateway_call("store_details", started.elapsed().as_secs_f64());
        Ok(profile)
    }
}

#[async_trait]
impl InventoryGateway for StorefrontApi {
    #[instrument(skip(self, filter), fields(store_id = filter.store_id))]
    async fn items(&self, filter: &InventoryFilter) -> Result<Vec<InventoryItem>> {
        let started = Instant::now();
        let mut request = self
            .client
            .get(self.url("/inventory/items"))
            .query(&[("storeId", filter.store_id.to_string())]);
        if let Some(limit) = filter.limit {
            request = request.query(&[("limit", limit.to_string())]);
        }
        if let Some(category) = &filter.category {
            request = request.query(&[("category", category.clone())]);
        }
        let response = request.send().await?;
        let response = Self::check("inventory_items", response).await?;
        let items = response.json::<Vec<InventoryItem>>().await?;
        observability::metrics::gateway_call("inventory_items", started.elapsed().as_secs_f64());
        Ok(items)
    }
}
