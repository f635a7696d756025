use serde::{Deserialize, Serialize};

/// Read-only upstream store profile, consulted once per document load by the
/// data enricher. This subsystem never writes to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreProfile {
    pub store_id: i64,
    pub name: String,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub addresses: Vec<StoreAddress>,
    #[serde(default)]
    pub open_hours: Vec<DayHours>,
    #[serde(default)]
    pub payment_methods: Vec<PaymentMethod>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl StoreProfile {
    pub fn primary_address(&self) -> Option<&StoreAddress> {
        self.addresses
            .iter()
            .find(|a| a.is_primary)
            .or_else(|| self.addresses.first())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreAddress {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub is_primary: bool,
}

impl StoreAddress {
    /// Single-line rendering used by enriched contact blocks.
    pub fn display_line(&self) -> String {
        let mut line = format!("{}, {} {}", self.street, self.postal_code, self.city);
        if !self.country.is_empty() {
            line.push_str(", ");
            line.push_str(&self.country);
        }
        line
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHours {
    pub day: String,
    #[serde(default)]
    pub opens: Option<String>,
    #[serde(default)]
    pub closes: Option<String>,
    #[serde(default)]
    pub closed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethod {
    pub name: String,
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// One row of the read-only inventory feed backing the featured-products
/// preview. Never persisted into the customization document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub in_stock: bool,
}

/// Filter for the inventory feed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryFilter {
    pub store_id: i64,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub category: Option<String>,
}
