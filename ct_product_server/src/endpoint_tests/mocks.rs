use mockall::mock;
use shopify_api::{
    data_objects::{Location, Product, ProductInput},
    ProductApi,
    ShopifyApiError,
};

mock! {
    pub ProductApi {}
    impl ProductApi for ProductApi {
        async fn create_product(&self, product: &ProductInput) -> Result<Product, ShopifyApiError>;
        async fn fetch_locations(&self) -> Result<Vec<Location>, ShopifyApiError>;
        async fn set_inventory_level(&self, location_id: i64, inventory_item_id: i64, available: i64) -> Result<(), ShopifyApiError>;
        async fn update_inventory_item_cost(&self, inventory_item_id: i64, cost: f64) -> Result<(), ShopifyApiError>;
    }
}
