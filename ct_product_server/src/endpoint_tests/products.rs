use actix_web::{http::StatusCode, test::TestRequest};
use ct_common::Secret;
use mockall::Sequence;
use serde_json::json;
use shopify_api::ShopifyApiError;

use super::helpers::*;
use super::mocks::MockProductApi;

fn untouched_api() -> MockProductApi {
    let mut api = MockProductApi::new();
    api.expect_create_product().never();
    api.expect_fetch_locations().never();
    api.expect_set_inventory_level().never();
    api.expect_update_inventory_item_cost().never();
    api
}

#[actix_web::test]
async fn non_post_methods_are_rejected() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/products").insert_header(("x-ct-auth", TEST_SECRET));
    let (status, body) = send_request(req, test_config(), untouched_api()).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(body.contains(r#""ok":false"#), "was: {body}");
    assert!(body.contains(r#""error":"Method Not Allowed""#), "was: {body}");

    let req = TestRequest::put().uri("/products");
    let (status, _) = send_request(req, test_config(), untouched_api()).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[actix_web::test]
async fn missing_auth_header_is_rejected() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_product(None, json!({"title": "Widget"}), test_config(), untouched_api()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains(r#""ok":false"#), "was: {body}");
}

#[actix_web::test]
async fn wrong_shared_secret_is_rejected() {
    let _ = env_logger::try_init().ok();
    let (status, _) = post_product(Some("not-the-secret"), json!({"title": "Widget"}), test_config(), untouched_api()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    // The comparison is case-sensitive on the secret value
    let shouted = TEST_SECRET.to_uppercase();
    let (status, _) =
        post_product(Some(shouted.as_str()), json!({"title": "Widget"}), test_config(), untouched_api()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn unconfigured_shared_secret_rejects_everything() {
    let _ = env_logger::try_init().ok();
    let mut config = test_config();
    config.shared_secret = Secret::default();
    // Even an empty header value must not match an empty configured secret
    let (status, _) = post_product(Some(""), json!({"title": "Widget"}), config, untouched_api()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn incomplete_configuration_is_a_server_error() {
    let _ = env_logger::try_init().ok();
    let mut config = test_config();
    config.shop = String::default();
    let (status, body) = post_product(Some(TEST_SECRET), json!({"title": "Widget"}), config, untouched_api()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("CT_SHOPIFY_SHOP"), "was: {body}");
}

#[actix_web::test]
async fn missing_title_is_a_payload_error() {
    let _ = env_logger::try_init().ok();
    let (status, body) = post_product(Some(TEST_SECRET), json!({"vendor": "Acme"}), test_config(), untouched_api()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains(r#""ok":false"#), "was: {body}");
    assert!(body.contains("title"), "was: {body}");
}

#[actix_web::test]
async fn creates_product_and_reconciles_inventory_and_cost_in_order() {
    let _ = env_logger::try_init().ok();
    let mut api = MockProductApi::new();
    let mut seq = Sequence::new();
    api.expect_create_product()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|p| p.title == "IPod Nano - 8GB" && p.variants.as_ref().is_some_and(|v| v.len() == 1))
        .returning(|_| Ok(created_product(vec![created_variant(101, Some(9101), Some("IPOD-8GB"))])));
    api.expect_fetch_locations()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|| Ok(vec![location(55, true)]));
    api.expect_set_inventory_level()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|location_id, item_id, available| (*location_id, *item_id, *available) == (55, 9101, 100))
        .returning(|_, _, _| Ok(()));
    api.expect_update_inventory_item_cost()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|item_id, cost| *item_id == 9101 && (*cost - 12.5).abs() < f64::EPSILON)
        .returning(|_, _| Ok(()));

    let body = json!({
        "title": "IPod Nano - 8GB",
        "variants": [{"price": "29.99", "sku": "IPOD-8GB", "cost": "12.50", "inventory_quantity": 100}]
    });
    let (status, body) = post_product(Some(TEST_SECRET), body, test_config(), api).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""ok":true"#), "was: {body}");
    assert!(body.contains(r#""id":632910392"#), "was: {body}");
}

#[actix_web::test]
async fn inventory_failure_does_not_fail_the_request() {
    let _ = env_logger::try_init().ok();
    let mut api = MockProductApi::new();
    api.expect_create_product()
        .times(1)
        .returning(|_| Ok(created_product(vec![created_variant(101, Some(9101), None)])));
    api.expect_fetch_locations().times(1).returning(|| Ok(vec![location(55, true)]));
    api.expect_set_inventory_level()
        .times(1)
        .returning(|_, _, _| Err(ShopifyApiError::QueryError { status: 429, message: "throttled".to_string() }));
    // The cost update is still attempted after the inventory write failed
    api.expect_update_inventory_item_cost().times(1).returning(|_, _| Ok(()));

    let body = json!({
        "title": "Widget",
        "variants": [{"cost": "12.50", "inventory_quantity": 100}]
    });
    let (status, body) = post_product(Some(TEST_SECRET), body, test_config(), api).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""ok":true"#), "was: {body}");
}

#[actix_web::test]
async fn create_failure_aborts_the_flow() {
    let _ = env_logger::try_init().ok();
    let mut api = MockProductApi::new();
    api.expect_create_product()
        .times(1)
        .returning(|_| Err(ShopifyApiError::QueryError { status: 422, message: "title taken".to_string() }));
    api.expect_fetch_locations().never();
    api.expect_set_inventory_level().never();
    api.expect_update_inventory_item_cost().never();

    let body = json!({
        "title": "Widget",
        "variants": [{"cost": "12.50", "inventory_quantity": 100}]
    });
    let (status, body) = post_product(Some(TEST_SECRET), body, test_config(), api).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains(r#""ok":false"#), "was: {body}");
    assert!(body.contains("422"), "was: {body}");
}

#[actix_web::test]
async fn created_variants_are_reconciled_by_sku_not_position() {
    let _ = env_logger::try_init().ok();
    let mut api = MockProductApi::new();
    // Created variants come back in the opposite order to the input specs
    api.expect_create_product().times(1).returning(|_| {
        Ok(created_product(vec![
            created_variant(2, Some(902), Some("SKU-B")),
            created_variant(1, Some(901), Some("SKU-A")),
        ]))
    });
    api.expect_fetch_locations().times(1).returning(|| Ok(vec![location(55, true)]));
    api.expect_set_inventory_level()
        .times(1)
        .withf(|_, item_id, available| (*item_id, *available) == (902, 7))
        .returning(|_, _, _| Ok(()));
    api.expect_set_inventory_level()
        .times(1)
        .withf(|_, item_id, available| (*item_id, *available) == (901, 5))
        .returning(|_, _, _| Ok(()));

    let body = json!({
        "title": "Widget",
        "variants": [
            {"sku": "SKU-A", "inventory_quantity": 5},
            {"sku": "SKU-B", "inventory_quantity": 7}
        ]
    });
    let (status, _) = post_product(Some(TEST_SECRET), body, test_config(), api).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn empty_location_list_is_fatal() {
    let _ = env_logger::try_init().ok();
    let mut api = MockProductApi::new();
    api.expect_create_product()
        .times(1)
        .returning(|_| Ok(created_product(vec![created_variant(101, Some(9101), None)])));
    api.expect_fetch_locations().times(1).returning(|| Ok(vec![]));
    api.expect_set_inventory_level().never();
    api.expect_update_inventory_item_cost().never();

    let body = json!({
        "title": "Widget",
        "variants": [{"inventory_quantity": 100}]
    });
    let (status, body) = post_product(Some(TEST_SECRET), body, test_config(), api).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains(r#""ok":false"#), "was: {body}");
}

#[actix_web::test]
async fn product_without_variants_skips_reconciliation() {
    let _ = env_logger::try_init().ok();
    let mut api = MockProductApi::new();
    api.expect_create_product().times(1).returning(|_| Ok(created_product(vec![])));
    api.expect_fetch_locations().never();
    api.expect_set_inventory_level().never();
    api.expect_update_inventory_item_cost().never();

    let (status, body) = post_product(Some(TEST_SECRET), json!({"title": "Widget"}), test_config(), api).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""ok":true"#), "was: {body}");
}

#[actix_web::test]
async fn variant_without_inventory_item_is_skipped() {
    let _ = env_logger::try_init().ok();
    let mut api = MockProductApi::new();
    api.expect_create_product()
        .times(1)
        .returning(|_| Ok(created_product(vec![created_variant(101, None, None)])));
    // Locations are still fetched, since the input described variants
    api.expect_fetch_locations().times(1).returning(|| Ok(vec![location(55, true)]));
    api.expect_set_inventory_level().never();
    api.expect_update_inventory_item_cost().never();

    let body = json!({
        "title": "Widget",
        "variants": [{"cost": "12.50", "inventory_quantity": 100}]
    });
    let (status, _) = post_product(Some(TEST_SECRET), body, test_config(), api).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn first_active_location_is_preferred() {
    let _ = env_logger::try_init().ok();
    let mut api = MockProductApi::new();
    api.expect_create_product()
        .times(1)
        .returning(|_| Ok(created_product(vec![created_variant(101, Some(9101), None)])));
    api.expect_fetch_locations()
        .times(1)
        .returning(|| Ok(vec![location(7, false), location(9, true), location(11, true)]));
    api.expect_set_inventory_level()
        .times(1)
        .withf(|location_id, _, _| *location_id == 9)
        .returning(|_, _, _| Ok(()));

    let body = json!({
        "title": "Widget",
        "variants": [{"inventory_quantity": 3}]
    });
    let (status, _) = post_product(Some(TEST_SECRET), body, test_config(), api).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn unparseable_cost_is_skipped_with_a_warning() {
    let _ = env_logger::try_init().ok();
    let mut api = MockProductApi::new();
    api.expect_create_product()
        .times(1)
        .returning(|_| Ok(created_product(vec![created_variant(101, Some(9101), None)])));
    api.expect_fetch_locations().times(1).returning(|| Ok(vec![location(55, true)]));
    api.expect_set_inventory_level().times(1).returning(|_, _, _| Ok(()));
    api.expect_update_inventory_item_cost().never();

    let body = json!({
        "title": "Widget",
        "variants": [{"cost": "twelve fifty", "inventory_quantity": 100}]
    });
    let (status, _) = post_product(Some(TEST_SECRET), body, test_config(), api).await;
    assert_eq!(status, StatusCode::OK);
}
