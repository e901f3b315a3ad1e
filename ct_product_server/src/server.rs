use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use shopify_api::ShopifyApi;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{health, CreateProductRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let api = ShopifyApi::new(config.shopify_config.api_config())
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, api)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, api: ShopifyApi) -> Result<Server, ServerError> {
    let shopify_config = config.shopify_config.clone();
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("ct::access_log"))
            .app_data(json_config())
            .app_data(web::Data::new(shopify_config.clone()))
            .app_data(web::Data::new(api.clone()))
            .service(health)
            .service(CreateProductRoute::<ShopifyApi>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Body deserialization failures must render in the same `{"ok": false, ...}` shape as every other
/// rejection, so route them through [`ServerError`].
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| ServerError::InvalidPayload(err.to_string()).into())
}
