//! The product creation flow.
//!
//! One inbound request turns into an ordered series of Admin API calls: create the product, then,
//! when the input described variants, fetch the store's locations and walk the created variants
//! setting inventory levels and costs. Product creation and the location lookup are fatal when
//! they fail; the per-variant writes are best-effort and only ever logged.

use log::*;
use serde_json::Value;
use shopify_api::{
    data_objects::{ImageInput, Product, ProductInput, Variant, VariantInput},
    helpers::parse_money,
    ProductApi,
};

use crate::{
    data_objects::{NewProduct, NewVariant},
    errors::ServerError,
};

pub const DEFAULT_VENDOR: &str = "Default";
pub const DEFAULT_PRODUCT_TYPE: &str = "General";
/// Every variant is created with managed inventory, otherwise levels cannot be set afterwards.
const INVENTORY_MANAGED_BY: &str = "shopify";

/// Check the parsed request body and turn it into a [`NewProduct`].
///
/// The body must be a JSON object with a non-empty `title`; `variants`, when present, must be an
/// array. Unknown fields are collected rather than rejected, and dropped before anything is sent
/// upstream.
pub fn validate_payload(payload: Value) -> Result<NewProduct, ServerError> {
    let Some(fields) = payload.as_object() else {
        return Err(ServerError::InvalidPayload("The request body must be a JSON object".to_string()));
    };
    match fields.get("title").and_then(Value::as_str) {
        Some(title) if !title.trim().is_empty() => {},
        _ => {
            return Err(ServerError::InvalidPayload("'title' is required and must be a non-empty string".to_string()))
        },
    }
    if let Some(variants) = fields.get("variants") {
        if !variants.is_array() && !variants.is_null() {
            return Err(ServerError::InvalidPayload("'variants' must be an array".to_string()));
        }
    }
    let product =
        serde_json::from_value::<NewProduct>(payload).map_err(|e| ServerError::InvalidPayload(e.to_string()))?;
    if !product.extra.is_empty() {
        let ignored = product.extra.keys().cloned().collect::<Vec<String>>().join(", ");
        debug!("🛍️ Ignoring unrecognised product fields: {ignored}");
    }
    Ok(product)
}

/// Map the validated payload onto the creation request. `cost` and `inventory_quantity` are left
/// out: the creation endpoint does not accept them, and they are applied by
/// [`create_product_flow`] after the product exists.
pub fn build_product_input(product: &NewProduct) -> ProductInput {
    let tags = product.tags.as_ref().map(|tags| tags.join(", "));
    let images = product
        .images
        .as_ref()
        .map(|images| images.iter().map(|i| ImageInput { src: i.src.clone(), alt: i.alt.clone() }).collect());
    let variants = product.variants.as_ref().map(|variants| variants.iter().map(variant_input).collect());
    ProductInput {
        title: product.title.trim().to_string(),
        body_html: product.body_html.clone(),
        vendor: product.vendor.clone().unwrap_or_else(|| DEFAULT_VENDOR.to_string()),
        product_type: product.product_type.clone().unwrap_or_else(|| DEFAULT_PRODUCT_TYPE.to_string()),
        tags,
        images,
        variants,
    }
}

fn variant_input(variant: &NewVariant) -> VariantInput {
    VariantInput {
        price: variant.price.clone(),
        sku: variant.sku.clone(),
        inventory_management: INVENTORY_MANAGED_BY.to_string(),
        requires_shipping: variant.requires_shipping.unwrap_or(true),
        taxable: variant.taxable.unwrap_or(true),
        weight: variant.weight,
        weight_unit: variant.weight_unit.clone(),
        barcode: variant.barcode.clone(),
        compare_at_price: variant.compare_at_price.clone(),
    }
}

/// Find the input spec for a created variant: by sku when the created variant carries a non-empty
/// sku that some input declares, falling back to the created variant's position. A created variant
/// that matches nothing is skipped by the caller.
fn paired_spec<'a>(variant: &Variant, index: usize, specs: &'a [NewVariant]) -> Option<&'a NewVariant> {
    if let Some(sku) = variant.sku.as_deref().filter(|s| !s.is_empty()) {
        if let Some(spec) = specs.iter().find(|s| s.sku.as_deref() == Some(sku)) {
            return Some(spec);
        }
    }
    specs.get(index)
}

/// Run the full creation sequence and return the created product.
pub async fn create_product_flow<A: ProductApi>(api: &A, new_product: &NewProduct) -> Result<Product, ServerError> {
    let input = build_product_input(new_product);
    let created = api.create_product(&input).await.map_err(|e| {
        error!("🛍️ Could not create product '{}'. {e}", input.title);
        ServerError::UpstreamCreateFailed(e.to_string())
    })?;
    info!("🛍️ Created product '{}' ({})", created.title, created.id);
    let specs = new_product.variants.as_deref().unwrap_or_default();
    if specs.is_empty() {
        return Ok(created);
    }
    reconcile_variants(api, &created, specs).await?;
    Ok(created)
}

/// Apply inventory quantities and costs to the created variants. The product already exists when
/// this runs, so per-variant failures must not fail the request; they are logged and skipped. An
/// unusable location list is the one fatal case, since inventory has nowhere to go.
async fn reconcile_variants<A: ProductApi>(
    api: &A,
    created: &Product,
    specs: &[NewVariant],
) -> Result<(), ServerError> {
    let locations = api.fetch_locations().await.map_err(|e| {
        error!("🛍️ Could not fetch locations for product {}. {e}", created.id);
        ServerError::LocationsUnavailable(e.to_string())
    })?;
    let location = locations.iter().find(|l| l.active).or_else(|| locations.first()).ok_or_else(|| {
        error!("🛍️ The store has no locations. Inventory for product {} cannot be set.", created.id);
        ServerError::LocationsUnavailable("The store has no locations".to_string())
    })?;
    // Sequential on purpose: the write order must follow the created variant order, and the Admin
    // API throttles per store.
    for (index, variant) in created.variants.iter().enumerate() {
        let Some(spec) = paired_spec(variant, index, specs) else {
            debug!("🛍️ Created variant {} has no matching input variant. Skipping.", variant.id);
            continue;
        };
        let Some(inventory_item_id) = variant.inventory_item_id else {
            debug!("🛍️ Created variant {} has no inventory item. Skipping.", variant.id);
            continue;
        };
        if let Some(quantity) = spec.inventory_quantity {
            if let Err(e) = api.set_inventory_level(location.id, inventory_item_id, quantity).await {
                warn!("🛍️ Could not set inventory level for variant {} of product {}. {e}", variant.id, created.id);
            }
        }
        if let Some(cost) = spec.cost.as_deref() {
            match parse_money(cost) {
                Ok(cost) => {
                    if let Err(e) = api.update_inventory_item_cost(inventory_item_id, cost).await {
                        warn!("🛍️ Could not set cost for variant {} of product {}. {e}", variant.id, created.id);
                    }
                },
                Err(e) => {
                    warn!("🛍️ Ignoring invalid cost for variant {} of product {}. {e}", variant.id, created.id)
                },
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn spec_with_sku(sku: &str) -> NewVariant {
        let variant = json!({ "sku": sku });
        serde_json::from_value(variant).unwrap()
    }

    fn created_variant(id: i64, sku: Option<&str>) -> Variant {
        Variant {
            id,
            inventory_item_id: Some(id + 1000),
            sku: sku.map(String::from),
            price: None,
            position: None,
            title: None,
            inventory_quantity: None,
        }
    }

    #[test]
    fn missing_title_is_rejected() {
        assert!(validate_payload(json!({"vendor": "Acme"})).is_err());
        assert!(validate_payload(json!({"title": ""})).is_err());
        assert!(validate_payload(json!({"title": "   "})).is_err());
        assert!(validate_payload(json!({"title": 42})).is_err());
    }

    #[test]
    fn body_must_be_an_object() {
        assert!(validate_payload(json!(["a", "list"])).is_err());
        assert!(validate_payload(json!("just a string")).is_err());
    }

    #[test]
    fn variants_must_be_an_array_when_present() {
        assert!(validate_payload(json!({"title": "Widget", "variants": "nope"})).is_err());
        assert!(validate_payload(json!({"title": "Widget", "variants": null})).is_ok());
        assert!(validate_payload(json!({"title": "Widget", "variants": []})).is_ok());
    }

    #[test]
    fn unknown_fields_are_collected_not_rejected() {
        let product = validate_payload(json!({"title": "Widget", "published_scope": "web"})).unwrap();
        assert!(product.extra.contains_key("published_scope"));
    }

    #[test]
    fn defaults_are_applied_to_the_creation_request() {
        let product = validate_payload(json!({
            "title": "  Widget  ",
            "tags": ["summer", "sale"],
            "variants": [{"price": "29.99", "cost": "12.50", "inventory_quantity": 100}]
        }))
        .unwrap();
        let input = build_product_input(&product);
        assert_eq!(input.title, "Widget");
        assert_eq!(input.vendor, DEFAULT_VENDOR);
        assert_eq!(input.product_type, DEFAULT_PRODUCT_TYPE);
        assert_eq!(input.tags.as_deref(), Some("summer, sale"));
        let variant = &input.variants.as_ref().unwrap()[0];
        assert_eq!(variant.price.as_deref(), Some("29.99"));
        assert_eq!(variant.inventory_management, "shopify");
        assert!(variant.requires_shipping);
        assert!(variant.taxable);
        // Cost must never appear in the creation request
        let wire = serde_json::to_value(&input).unwrap();
        assert!(wire["variants"][0].get("cost").is_none());
        assert!(wire["variants"][0].get("inventory_quantity").is_none());
    }

    #[test]
    fn explicit_false_flags_survive_the_mapping() {
        let product = validate_payload(json!({
            "title": "Widget",
            "variants": [{"requires_shipping": false, "taxable": false}]
        }))
        .unwrap();
        let input = build_product_input(&product);
        let variant = &input.variants.as_ref().unwrap()[0];
        assert!(!variant.requires_shipping);
        assert!(!variant.taxable);
    }

    #[test]
    fn pairing_prefers_sku_over_position() {
        let specs = vec![spec_with_sku("SKU-A"), spec_with_sku("SKU-B")];
        // Created variants come back in reverse order
        let first = created_variant(1, Some("SKU-B"));
        let second = created_variant(2, Some("SKU-A"));
        assert_eq!(paired_spec(&first, 0, &specs).unwrap().sku.as_deref(), Some("SKU-B"));
        assert_eq!(paired_spec(&second, 1, &specs).unwrap().sku.as_deref(), Some("SKU-A"));
    }

    #[test]
    fn pairing_falls_back_to_position_without_skus() {
        let specs = vec![spec_with_sku("SKU-A"), spec_with_sku("SKU-B")];
        let unskued = created_variant(1, None);
        assert_eq!(paired_spec(&unskued, 1, &specs).unwrap().sku.as_deref(), Some("SKU-B"));
        let blank = created_variant(2, Some(""));
        assert_eq!(paired_spec(&blank, 0, &specs).unwrap().sku.as_deref(), Some("SKU-A"));
    }

    #[test]
    fn unmatched_created_variant_pairs_with_nothing() {
        let specs = vec![spec_with_sku("SKU-A")];
        let extra = created_variant(9, None);
        assert!(paired_spec(&extra, 5, &specs).is_none());
    }
}
