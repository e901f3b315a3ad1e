use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web,
    web::ServiceConfig,
    App,
};
use ct_common::Secret;
use serde_json::Value;
use shopify_api::data_objects::{Location, Product, Variant};

use super::mocks::MockProductApi;
use crate::{config::ShopifyConfig, routes::CreateProductRoute, server::json_config};

pub const TEST_SECRET: &str = "test-shared-secret";

pub fn test_config() -> ShopifyConfig {
    ShopifyConfig {
        shop: "example.myshopify.com".to_string(),
        api_version: "2024-10".to_string(),
        admin_access_token: Secret::new("shpat_test_token".to_string()),
        shared_secret: Secret::new(TEST_SECRET.to_string()),
    }
}

pub fn configure_app(config: ShopifyConfig, api: MockProductApi) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg| {
        cfg.app_data(json_config())
            .app_data(web::Data::new(config))
            .app_data(web::Data::new(api))
            .service(CreateProductRoute::<MockProductApi>::new());
    }
}

pub async fn send_request(req: TestRequest, config: ShopifyConfig, api: MockProductApi) -> (StatusCode, String) {
    let app = App::new().configure(configure_app(config, api));
    let app = test::init_service(app).await;
    let (_, res) = test::call_service(&app, req.to_request()).await.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}

pub async fn post_product(
    auth_header: Option<&str>,
    body: Value,
    config: ShopifyConfig,
    api: MockProductApi,
) -> (StatusCode, String) {
    let mut req = TestRequest::post().uri("/products").set_json(body);
    if let Some(secret) = auth_header {
        req = req.insert_header(("x-ct-auth", secret));
    }
    send_request(req, config, api).await
}

pub fn created_product(variants: Vec<Variant>) -> Product {
    Product {
        id: 632910392,
        title: "IPod Nano - 8GB".to_string(),
        handle: "ipod-nano".to_string(),
        status: "active".to_string(),
        vendor: Some("Apple".to_string()),
        product_type: Some("Cult Products".to_string()),
        tags: None,
        variants,
    }
}

pub fn created_variant(id: i64, inventory_item_id: Option<i64>, sku: Option<&str>) -> Variant {
    Variant {
        id,
        inventory_item_id,
        sku: sku.map(String::from),
        price: Some("29.99".to_string()),
        position: None,
        title: None,
        inventory_quantity: Some(0),
    }
}

pub fn location(id: i64, active: bool) -> Location {
    Location { id, active, name: Some(format!("Location {id}")) }
}
