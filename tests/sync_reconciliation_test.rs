use httpmock::prelude::*;
use shop_cart::app::service::{AddItemRequest, CartApi, SyncEntryDto, SyncRequest};
use shop_cart::domain::model::SyncNotice;
use shop_cart::{CartService, HttpCatalog, JsonCartStore};
use tempfile::TempDir;

fn mock_product(server: &MockServer, id: &str, stock: u32, sizes: &[(&str, u32)]) {
    let size_quantities: Vec<_> = sizes
        .iter()
        .map(|(size, quantity)| serde_json::json!({"size": size, "quantity": quantity}))
        .collect();
    let body = serde_json::json!({
        "_id": id,
        "name": format!("Product {}", id),
        "price": 19.9,
        "stock": stock,
        "sizeQuantities": size_quantities
    });
    server.mock(|when, then| {
        when.method(GET).path(format!("/products/{}", id));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(body);
    });
}

fn service_for(
    server: &MockServer,
    dir: &TempDir,
) -> CartService<HttpCatalog, JsonCartStore> {
    let catalog = HttpCatalog::new(server.url("/products"));
    let repo = JsonCartStore::new(dir.path().to_str().unwrap());
    CartService::new(catalog, repo)
}

fn entry(product_id: &str, size: Option<&str>, quantity: i64) -> SyncEntryDto {
    SyncEntryDto {
        product_id: product_id.to_string(),
        size: size.map(str::to_string),
        quantity,
    }
}

#[tokio::test]
async fn test_scenario_d_sync_with_deleted_product_and_adjustment() {
    let server = MockServer::start();
    mock_product(&server, "p2", 2, &[("M", 2), ("L", 0)]);
    let deleted_mock = server.mock(|when, then| {
        when.method(GET).path("/products/p3");
        then.status(404);
    });
    let dir = TempDir::new().unwrap();
    let service = service_for(&server, &dir);

    let response = service
        .sync_cart(
            "u1",
            SyncRequest {
                cart_items: vec![entry("p3", None, 1), entry("p2", Some("M"), 10)],
            },
        )
        .await
        .unwrap();

    deleted_mock.assert();
    assert_eq!(response.cart_items.len(), 1);
    assert_eq!(response.cart_items[0].product_id, "p2");
    assert_eq!(response.cart_items[0].quantity, 2);

    let notices = response.validation_messages.unwrap();
    assert_eq!(notices.len(), 2);
    assert!(matches!(
        &notices[0],
        SyncNotice::RemovedNonexistentProduct { product_id, .. } if product_id == "p3"
    ));
    assert!(matches!(
        &notices[1],
        SyncNotice::QuantityAdjusted { product_id, new_quantity: 2, .. } if product_id == "p2"
    ));
}

#[tokio::test]
async fn test_sync_replaces_the_existing_server_cart() {
    let server = MockServer::start();
    mock_product(&server, "p1", 5, &[]);
    mock_product(&server, "p9", 5, &[]);
    let dir = TempDir::new().unwrap();
    let service = service_for(&server, &dir);

    service
        .add_item(
            "u1",
            AddItemRequest {
                product_id: "p1".to_string(),
                quantity: 2,
                size: None,
            },
        )
        .await
        .unwrap();

    // The snapshot does not mention p1; after sync it must be gone.
    // Reconciliation is an overwrite, not a merge.
    let response = service
        .sync_cart(
            "u1",
            SyncRequest {
                cart_items: vec![entry("p9", None, 1)],
            },
        )
        .await
        .unwrap();

    assert_eq!(response.cart_items.len(), 1);
    assert_eq!(response.cart_items[0].product_id, "p9");

    let cart = service.get_cart("u1").await.unwrap();
    assert_eq!(cart.cart_items.len(), 1);
    assert_eq!(cart.cart_items[0].product_id, "p9");
}

#[tokio::test]
async fn test_sync_is_total_every_entry_has_an_outcome() {
    let server = MockServer::start();
    mock_product(&server, "p1", 3, &[]);
    mock_product(&server, "p2", 2, &[("M", 2), ("L", 0)]);
    let dir = TempDir::new().unwrap();
    let service = service_for(&server, &dir);

    let snapshot = vec![
        entry("p1", None, 2),         // kept
        entry("p2", Some("M"), 9),    // adjusted
        entry("p2", Some("L"), 1),    // removed: sold out
        entry("p2", None, 1),         // removed: size required
        entry("p1", Some("M"), 1),    // removed: size not applicable
        entry("ghost", None, 1),      // removed: nonexistent
        entry("p2", Some("XXL"), 1),  // removed: unknown size
    ];
    let total = snapshot.len();

    let response = service
        .sync_cart("u1", SyncRequest { cart_items: snapshot })
        .await
        .unwrap();

    let notices = response.validation_messages.unwrap();
    // Two entries survive (p1 exact, p2/M adjusted); the adjustment also
    // carries a notice. Kept lines + removal notices cover all entries.
    assert_eq!(response.cart_items.len(), 2);
    assert_eq!(response.cart_items.len() + notices.len() - 1, total);
}

#[tokio::test]
async fn test_sync_merges_duplicate_identities_before_validation() {
    let server = MockServer::start();
    mock_product(&server, "p1", 10, &[]);
    let dir = TempDir::new().unwrap();
    let service = service_for(&server, &dir);

    let response = service
        .sync_cart(
            "u1",
            SyncRequest {
                // 與空字串尺寸是同一個身分，應合併為數量 5
                cart_items: vec![entry("p1", None, 2), entry("p1", Some(""), 3)],
            },
        )
        .await
        .unwrap();

    assert_eq!(response.cart_items.len(), 1);
    assert_eq!(response.cart_items[0].quantity, 5);
    assert!(response.validation_messages.is_none());
}

#[tokio::test]
async fn test_sync_reports_invalid_quantities_instead_of_dropping() {
    let server = MockServer::start();
    mock_product(&server, "p1", 10, &[]);
    let dir = TempDir::new().unwrap();
    let service = service_for(&server, &dir);

    let response = service
        .sync_cart(
            "u1",
            SyncRequest {
                cart_items: vec![entry("p1", None, 0)],
            },
        )
        .await
        .unwrap();

    assert!(response.cart_items.is_empty());
    let notices = response.validation_messages.unwrap();
    assert!(matches!(
        &notices[0],
        SyncNotice::RemovedInvalidQuantity { product_id, .. } if product_id == "p1"
    ));
}

#[tokio::test]
async fn test_catalog_outage_aborts_sync_without_overwriting() {
    let server = MockServer::start();
    mock_product(&server, "p1", 5, &[]);
    let dir = TempDir::new().unwrap();
    let service = service_for(&server, &dir);

    service
        .add_item(
            "u1",
            AddItemRequest {
                product_id: "p1".to_string(),
                quantity: 2,
                size: None,
            },
        )
        .await
        .unwrap();

    // A catalog that 500s is a system error, not a validation outcome.
    let broken = MockServer::start();
    broken.mock(|when, then| {
        when.method(GET).path("/products/p1");
        then.status(500);
    });
    let repo = JsonCartStore::new(dir.path().to_str().unwrap());
    let broken_service = CartService::new(HttpCatalog::new(broken.url("/products")), repo);

    let err = broken_service
        .sync_cart(
            "u1",
            SyncRequest {
                cart_items: vec![entry("p1", None, 1)],
            },
        )
        .await
        .unwrap_err();
    assert!(err.rejection().is_none());

    // The previously persisted cart is untouched.
    let cart = service.get_cart("u1").await.unwrap();
    assert_eq!(cart.cart_items.len(), 1);
    assert_eq!(cart.cart_items[0].quantity, 2);
}

#[tokio::test]
async fn test_response_serialization_matches_the_route_contract() {
    let server = MockServer::start();
    mock_product(&server, "p2", 2, &[("M", 2)]);
    let dir = TempDir::new().unwrap();
    let service = service_for(&server, &dir);

    let response = service
        .sync_cart(
            "u1",
            SyncRequest {
                cart_items: vec![entry("p2", Some("M"), 9), entry("ghost", None, 1)],
            },
        )
        .await
        .unwrap();

    let json = serde_json::to_value(&response).unwrap();
    let items = json["cartItems"].as_array().unwrap();
    assert_eq!(items[0]["productId"], "p2");
    assert_eq!(items[0]["quantity"], 2);

    let messages = json["validationMessages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["reason"], "quantity-adjusted");
    assert_eq!(messages[0]["newQuantity"], 2);
    assert_eq!(messages[1]["reason"], "removed-nonexistent-product");
    assert!(messages[1]["message"].is_string());
}
