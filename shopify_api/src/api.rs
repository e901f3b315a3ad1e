use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    config::ShopifyConfig,
    data_objects::{Location, Product, ProductInput},
    ShopifyApiError,
};

/// The subset of the Admin API that the product creation flow needs. Route handlers are generic
/// over this trait so that endpoint tests can substitute a mock for the live client.
#[allow(async_fn_in_trait)]
pub trait ProductApi {
    /// Create a product. The creation endpoint cannot set inventory levels or per-variant cost;
    /// use [`ProductApi::set_inventory_level`] and [`ProductApi::update_inventory_item_cost`]
    /// against the created variants afterwards.
    async fn create_product(&self, product: &ProductInput) -> Result<Product, ShopifyApiError>;
    /// Fetch the store's locations. Inventory levels are always written against a location.
    async fn fetch_locations(&self) -> Result<Vec<Location>, ShopifyApiError>;
    /// Set the available quantity for an inventory item at a location.
    async fn set_inventory_level(
        &self,
        location_id: i64,
        inventory_item_id: i64,
        available: i64,
    ) -> Result<(), ShopifyApiError>;
    /// Set the unit cost on an inventory item. Cost lives on the inventory item resource, not on
    /// the variant.
    async fn update_inventory_item_cost(&self, inventory_item_id: i64, cost: f64) -> Result<(), ShopifyApiError>;
}

#[derive(Clone)]
pub struct ShopifyApi {
    config: ShopifyConfig,
    client: Arc<Client>,
}

impl ShopifyApi {
    pub fn new(config: ShopifyConfig) -> Result<Self, ShopifyApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let val = HeaderValue::from_str(config.admin_access_token.reveal().as_str())
            .map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
        headers.insert("X-Shopify-Access-Token", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ShopifyApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, ShopifyApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| ShopifyApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| ShopifyApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| ShopifyApiError::RestResponseError(e.to_string()))?;
            Err(ShopifyApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("https://{}/admin/api/{}{path}", self.config.shop, self.config.api_version)
    }
}

impl ProductApi for ShopifyApi {
    async fn create_product(&self, product: &ProductInput) -> Result<Product, ShopifyApiError> {
        #[derive(Serialize)]
        struct ProductRequest<'a> {
            product: &'a ProductInput,
        }
        // The product is optional on the response side so that a 2xx with a missing envelope
        // surfaces as EmptyResponse rather than a deserialization error.
        #[derive(Deserialize)]
        struct ProductResponse {
            product: Option<Product>,
        }
        debug!("Creating product '{}'", product.title);
        let input = ProductRequest { product };
        let result =
            self.rest_query::<ProductResponse, ProductRequest>(Method::POST, "/products.json", &[], Some(input)).await?;
        let product = result.product.ok_or(ShopifyApiError::EmptyResponse)?;
        info!("Created product '{}' with id {}", product.title, product.id);
        Ok(product)
    }

    async fn fetch_locations(&self) -> Result<Vec<Location>, ShopifyApiError> {
        #[derive(Deserialize)]
        struct LocationsResponse {
            locations: Vec<Location>,
        }
        debug!("Fetching locations");
        let result = self.rest_query::<LocationsResponse, ()>(Method::GET, "/locations.json", &[], None).await?;
        debug!("Fetched {} locations", result.locations.len());
        Ok(result.locations)
    }

    async fn set_inventory_level(
        &self,
        location_id: i64,
        inventory_item_id: i64,
        available: i64,
    ) -> Result<(), ShopifyApiError> {
        let body = serde_json::json!({
            "location_id": location_id,
            "inventory_item_id": inventory_item_id,
            "available": available,
        });
        debug!("Setting inventory level of item {inventory_item_id} at location {location_id} to {available}");
        self.rest_query::<Value, Value>(Method::POST, "/inventory_levels/set.json", &[], Some(body)).await?;
        Ok(())
    }

    async fn update_inventory_item_cost(&self, inventory_item_id: i64, cost: f64) -> Result<(), ShopifyApiError> {
        let body = serde_json::json!({
            "inventory_item": {
                "id": inventory_item_id,
                "cost": cost,
            },
        });
        let path = format!("/inventory_items/{inventory_item_id}.json");
        debug!("Setting cost of inventory item {inventory_item_id} to {cost}");
        self.rest_query::<Value, Value>(Method::PUT, &path, &[], Some(body)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use ct_common::Secret;

    use super::*;

    #[test]
    fn url_includes_shop_and_version() {
        let config = ShopifyConfig::new("example.myshopify.com", Secret::new("shpat_123".into()), "2024-10");
        let api = ShopifyApi::new(config).unwrap();
        assert_eq!(api.url("/products.json"), "https://example.myshopify.com/admin/api/2024-10/products.json");
    }
}
