use std::env;

use ct_common::Secret;
use log::*;
use shopify_api::ShopifyConfig as ShopifyApiConfig;

use crate::errors::ServerError;

const DEFAULT_CT_HOST: &str = "127.0.0.1";
const DEFAULT_CT_PORT: u16 = 8370;
/// The Admin API version used when `CT_SHOPIFY_API_VERSION` is not set.
pub const DEFAULT_SHOPIFY_API_VERSION: &str = "2024-10";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Shopify storefront configuration
    pub shopify_config: ShopifyConfig,
}

#[derive(Clone, Debug, Default)]
pub struct ShopifyConfig {
    /// The url for the shopify storefront to use. e.g. "my-shop.myshopify.com"
    pub shop: String,
    pub api_version: String,
    pub admin_access_token: Secret<String>,
    /// The value the `x-ct-auth` request header must equal, byte for byte, for an inbound request
    /// to be trusted.
    pub shared_secret: Secret<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CT_HOST.to_string(),
            port: DEFAULT_CT_PORT,
            shopify_config: ShopifyConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("CT_HOST").ok().unwrap_or_else(|| DEFAULT_CT_HOST.into());
        let port = env::var("CT_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for CT_PORT. {e} Using the default, {DEFAULT_CT_PORT}, instead."
                    );
                    DEFAULT_CT_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_CT_PORT);
        let shopify_config = ShopifyConfig::from_env_or_default();
        Self { host, port, shopify_config }
    }
}

impl ShopifyConfig {
    pub fn from_env_or_default() -> Self {
        let shop = env::var("CT_SHOPIFY_SHOP").ok().unwrap_or_else(|| {
            error!("🪛️ CT_SHOPIFY_SHOP is not set. Set it to the store domain, e.g. example.myshopify.com.");
            String::default()
        });
        let api_version = env::var("CT_SHOPIFY_API_VERSION").ok().unwrap_or_else(|| {
            warn!("🪛️ CT_SHOPIFY_API_VERSION is not set. Using {DEFAULT_SHOPIFY_API_VERSION} as default.");
            DEFAULT_SHOPIFY_API_VERSION.to_string()
        });
        let admin_access_token = Secret::new(env::var("CT_SHOPIFY_ADMIN_ACCESS_TOKEN").ok().unwrap_or_else(|| {
            error!("🪛️ CT_SHOPIFY_ADMIN_ACCESS_TOKEN is not set. Set it to the Admin API access token for the store.");
            String::default()
        }));
        let shared_secret = Secret::new(env::var("CT_SHARED_SECRET").ok().unwrap_or_else(|| {
            error!("🪛️ CT_SHARED_SECRET is not set. All inbound requests will be rejected until it is configured.");
            String::default()
        }));
        Self { shop, api_version, admin_access_token, shared_secret }
    }

    /// The request-time configuration gate. A missing value here is the operator's fault, not the
    /// caller's, so it answers 500 rather than 400.
    pub fn check_required(&self) -> Result<(), ServerError> {
        if self.shop.is_empty() {
            return Err(ServerError::ConfigurationError("CT_SHOPIFY_SHOP is not set".to_string()));
        }
        if self.admin_access_token.is_empty() {
            return Err(ServerError::ConfigurationError("CT_SHOPIFY_ADMIN_ACCESS_TOKEN is not set".to_string()));
        }
        if self.api_version.is_empty() {
            return Err(ServerError::ConfigurationError("CT_SHOPIFY_API_VERSION is not set".to_string()));
        }
        Ok(())
    }

    pub fn api_config(&self) -> ShopifyApiConfig {
        ShopifyApiConfig {
            shop: self.shop.clone(),
            api_version: self.api_version.clone(),
            admin_access_token: self.admin_access_token.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use ct_common::Secret;

    use super::ShopifyConfig;

    fn full_config() -> ShopifyConfig {
        ShopifyConfig {
            shop: "example.myshopify.com".to_string(),
            api_version: "2024-10".to_string(),
            admin_access_token: Secret::new("shpat_test".to_string()),
            shared_secret: Secret::new("secret".to_string()),
        }
    }

    #[test]
    fn complete_config_passes_the_gate() {
        assert!(full_config().check_required().is_ok());
    }

    #[test]
    fn each_missing_value_fails_the_gate() {
        let mut config = full_config();
        config.shop = String::default();
        assert!(config.check_required().is_err());

        let mut config = full_config();
        config.admin_access_token = Secret::default();
        assert!(config.check_required().is_err());

        let mut config = full_config();
        config.api_version = String::default();
        assert!(config.check_required().is_err());
    }
}
