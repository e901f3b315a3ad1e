use ct_common::Secret;

/// Connection details for a Shopify Admin REST API endpoint.
///
/// This is a plain value. Loading it from the environment is the caller's job (see the server's config
/// module), so tests and multi-store setups can construct as many of these as they need.
#[derive(Debug, Clone, Default)]
pub struct ShopifyConfig {
    /// The store domain, e.g. "example.myshopify.com"
    pub shop: String,
    pub admin_access_token: Secret<String>,
    /// Admin API version path segment, e.g. "2024-10"
    pub api_version: String,
}

impl ShopifyConfig {
    pub fn new(shop: &str, admin_access_token: Secret<String>, api_version: &str) -> Self {
        Self { shop: shop.to_string(), admin_access_token, api_version: api_version.to_string() }
    }
}
