use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shopify_api::Product;

/// The inbound product payload. Known fields are typed; anything else lands in `extra`, which is
/// logged and never forwarded to Shopify.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub title: String,
    pub body_html: Option<String>,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub tags: Option<Vec<String>>,
    pub images: Option<Vec<NewImage>>,
    /// Optional. When absent or empty, the product is created and the inventory/cost
    /// reconciliation step is skipped entirely.
    pub variants: Option<Vec<NewVariant>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewVariant {
    pub price: Option<String>,
    pub sku: Option<String>,
    /// Per-unit cost as a decimal string. Applied to the variant's inventory item after creation;
    /// the product creation endpoint does not accept it.
    pub cost: Option<String>,
    pub inventory_quantity: Option<i64>,
    pub requires_shipping: Option<bool>,
    pub taxable: Option<bool>,
    pub weight: Option<f64>,
    pub weight_unit: Option<String>,
    pub barcode: Option<String>,
    pub compare_at_price: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewImage {
    pub src: String,
    pub alt: Option<String>,
}

/// The 200 response body. Failures never use this shape; they are rendered by
/// [`ServerError::error_response`](crate::errors::ServerError) as `{"ok": false, "error": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    pub ok: bool,
    pub product: Product,
}

impl ProductResponse {
    pub fn success(product: Product) -> Self {
        Self { ok: true, product }
    }
}
