use serde::{Deserialize, Serialize};

/// The product payload POSTed to `/products.json`, wrapped in a `{"product": ...}` envelope by the
/// API client. Optional fields are omitted from the JSON entirely when unset.
///
/// Per-variant `cost` is deliberately absent: the product creation endpoint does not accept it, and
/// it must be written to the inventory item resource after the fact.
#[derive(Debug, Clone, Serialize)]
pub struct ProductInput {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_html: Option<String>,
    pub vendor: String,
    pub product_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageInput>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<VariantInput>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariantInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    /// Always "shopify", so that inventory levels can be set against the variant's inventory item.
    pub inventory_management: String,
    pub requires_shipping: bool,
    pub taxable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageInput {
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// A product as returned by the Admin API after creation. Everything except the id is optional or
/// defaulted, since Shopify's response shape varies with the store's setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub status: String,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub tags: Option<String>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variant {
    pub id: i64,
    /// The handle for inventory level and cost writes. Absent when the store does not track
    /// inventory for this variant.
    pub inventory_item_id: Option<i64>,
    pub sku: Option<String>,
    pub price: Option<String>,
    pub position: Option<i64>,
    pub title: Option<String>,
    pub inventory_quantity: Option<i64>,
}

/// A store location, the destination for inventory level writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    #[serde(default)]
    pub active: bool,
    pub name: Option<String>,
}
