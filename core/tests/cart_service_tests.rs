// tests/cart_service_tests.rs
mod common;
use bakery_core::{CartError, CartService, CartStore, CartPricingEngine, ShippingMethod};
use common::*;
use serde_json::json;
use serial_test::serial;
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn test_add_then_reload_round_trips_through_store() {
  setup_tracing();
  let (store, service) = memory_service();

  let cart = service.add_item(Some("u1"), cookie("1", 200, 2)).await.unwrap();
  assert_eq!(cart.total(), 400);

  let reloaded = service.load(Some("u1")).await;
  assert_eq!(reloaded, cart);
  assert_eq!(store.document("u1").unwrap()["total"], 400);
}

#[tokio::test]
#[serial]
async fn test_end_to_end_pricing_crosses_free_shipping_threshold() {
  setup_tracing();
  let (_, service) = memory_service();

  service.add_item(Some("u1"), cookie("1", 200, 2)).await.unwrap();
  let summary = service.checkout_summary(Some("u1"), ShippingMethod::Standard).await;
  assert_eq!((summary.subtotal, summary.shipping_fee, summary.grand_total), (400, 60, 460));

  service.add_item(Some("u1"), cookie("2", 700, 1)).await.unwrap();
  let summary = service.checkout_summary(Some("u1"), ShippingMethod::Standard).await;
  assert_eq!((summary.subtotal, summary.shipping_fee, summary.grand_total), (1100, 0, 1100));

  let express = service.checkout_summary(Some("u1"), ShippingMethod::Express).await;
  assert_eq!(express.expedite_surcharge, 100);
  assert_eq!(express.grand_total, 1200);
}

#[tokio::test]
#[serial]
async fn test_merge_keeps_first_seen_price() {
  setup_tracing();
  let (_, service) = memory_service();

  service.add_item(Some("u1"), cookie("A", 200, 1)).await.unwrap();
  let cart = service.add_item(Some("u1"), cookie("A", 999, 2)).await.unwrap();

  let item = cart.get("A").unwrap();
  assert_eq!((item.price, item.quantity), (200, 3));
  assert_eq!(cart.total(), 600);
}

#[tokio::test]
#[serial]
async fn test_quantity_controls() {
  setup_tracing();
  let (_, service) = memory_service();
  let user = Some("u1");

  service.add_item(user, cookie("A", 100, 2)).await.unwrap();
  let cart = service.increment(user, "A").await.unwrap();
  assert_eq!(cart.get("A").unwrap().quantity, 3);

  service.decrement(user, "A").await.unwrap();
  service.decrement(user, "A").await.unwrap();
  let cart = service.decrement(user, "A").await.unwrap();
  assert_eq!(cart.get("A").unwrap().quantity, 1);
  assert_eq!(cart.total(), 100);

  let cart = service.update_quantity(user, "A", 0).await.unwrap();
  assert!(cart.is_empty());
  assert_eq!(cart.total(), 0);

  let cart = service.update_quantity(user, "missing", 5).await.unwrap();
  assert!(cart.is_empty());
}

#[tokio::test]
#[serial]
async fn test_remove_absent_item_twice_is_harmless() {
  setup_tracing();
  let (_, service) = memory_service();
  service.add_item(Some("u1"), cookie("A", 100, 1)).await.unwrap();

  let first = service.remove_item(Some("u1"), "ghost").await.unwrap();
  let second = service.remove_item(Some("u1"), "ghost").await.unwrap();
  assert_eq!(first.total(), 100);
  assert_eq!(second.total(), 100);
}

#[tokio::test]
#[serial]
async fn test_clear_leaves_an_empty_document() {
  setup_tracing();
  let (store, service) = memory_service();
  service.add_item(Some("u1"), cookie("A", 100, 3)).await.unwrap();

  let cart = service.clear(Some("u1")).await.unwrap();
  assert!(cart.is_empty());
  assert_eq!(store.document("u1").unwrap(), json!({ "items": {}, "total": 0 }));
  assert_eq!(service.item_count(Some("u1")).await, 0);
}

#[tokio::test]
#[serial]
async fn test_invalid_item_is_rejected_and_not_persisted() {
  setup_tracing();
  let (store, service) = memory_service();

  let zero = service.add_item(Some("u1"), cookie("A", 100, 0)).await;
  assert!(matches!(zero, Err(CartError::InvalidItem { .. })));
  let negative = service.add_item(Some("u1"), cookie("A", -5, 1)).await;
  assert!(matches!(negative, Err(CartError::InvalidItem { .. })));
  assert!(store.is_empty());
}

#[tokio::test]
#[serial]
async fn test_mutations_require_identity() {
  setup_tracing();
  let (store, service) = memory_service();

  assert!(matches!(service.add_item(None, cookie("A", 100, 1)).await, Err(CartError::Unauthenticated)));
  assert!(matches!(service.update_quantity(None, "A", 2).await, Err(CartError::Unauthenticated)));
  assert!(matches!(service.remove_item(None, "A").await, Err(CartError::Unauthenticated)));
  assert!(matches!(service.clear(None).await, Err(CartError::Unauthenticated)));
  assert!(matches!(service.save(None, &Default::default()).await, Err(CartError::Unauthenticated)));

  assert!(service.load(None).await.is_empty());
  assert_eq!(service.item_count(None).await, 0);
  assert!(store.is_empty());
}

#[tokio::test]
#[serial]
async fn test_users_have_separate_carts() {
  setup_tracing();
  let (_, service) = memory_service();
  service.add_item(Some("alice"), cookie("A", 100, 1)).await.unwrap();
  service.add_item(Some("bob"), cookie("B", 300, 2)).await.unwrap();

  assert_eq!(service.load(Some("alice")).await.total(), 100);
  assert_eq!(service.load(Some("bob")).await.total(), 600);
}

#[tokio::test]
#[serial]
async fn test_concurrent_adds_for_one_user_are_all_applied() {
  setup_tracing();
  let (_, service) = memory_service();
  let service = Arc::new(service);

  let tasks: Vec<_> = (0..20)
    .map(|_| {
      let service = service.clone();
      tokio::spawn(async move { service.add_item(Some("u1"), cookie("A", 50, 1)).await })
    })
    .collect();
  for task in tasks {
    task.await.unwrap().unwrap();
  }

  let cart = service.load(Some("u1")).await;
  assert_eq!(cart.get("A").unwrap().quantity, 20);
  assert_eq!(cart.total(), 1000);
}

#[tokio::test]
#[serial]
async fn test_write_failure_surfaces_as_persistence() {
  setup_tracing();
  let store = Arc::new(FlakyStore::failing_writes());
  let service = CartService::new(store.clone(), CartPricingEngine::default());

  let result = service.add_item(Some("u1"), cookie("A", 100, 1)).await;
  match result {
    Err(CartError::Persistence { source }) => assert!(source.to_string().contains("rejected write")),
    other => panic!("Expected CartError::Persistence, got {:?}", other),
  }
}

#[tokio::test]
#[serial]
async fn test_read_failure_degrades_display_but_fails_mutation() {
  setup_tracing();
  let store = Arc::new(FlakyStore::default());
  let service = CartService::new(store.clone(), CartPricingEngine::default());
  service.add_item(Some("u1"), cookie("A", 100, 2)).await.unwrap();

  store.fail_reads.store(true, Ordering::SeqCst);
  assert!(service.load(Some("u1")).await.is_empty());

  let writes_before = store.writes.load(Ordering::SeqCst);
  let result = service.add_item(Some("u1"), cookie("B", 100, 1)).await;
  assert!(matches!(result, Err(CartError::Persistence { .. })));
  assert_eq!(store.writes.load(Ordering::SeqCst), writes_before);

  store.fail_reads.store(false, Ordering::SeqCst);
  let stored = store.fetch("u1").await.unwrap().unwrap();
  assert_eq!(stored.total(), 200);
}

#[tokio::test]
#[serial]
async fn test_stale_stored_total_is_recomputed() {
  setup_tracing();
  let (store, service) = memory_service();
  store.put_document(
    "u1",
    json!({
      "items": {
        "A": { "productId": "A", "name": "Cookie A", "price": 200, "quantity": 2 },
        "B": { "productId": "B", "name": "Cookie B", "price": 100, "quantity": 0 }
      },
      "total": 9999
    }),
  );

  let cart = service.load(Some("u1")).await;
  assert_eq!(cart.total(), 400);
  assert!(!cart.contains("B"));

  let cart = service.increment(Some("u1"), "A").await.unwrap();
  assert_eq!(cart.total(), 600);
  assert_eq!(store.document("u1").unwrap()["total"], 600);
}

#[tokio::test]
#[serial]
async fn test_overflowing_add_is_rejected_and_not_persisted() {
  setup_tracing();
  let (store, service) = memory_service();
  let big = i64::MAX / 100;

  service.add_item(Some("u1"), cookie("1", 200, big)).await.unwrap();
  let err = service.add_item(Some("u1"), cookie("2", 200, big)).await.unwrap_err();
  assert!(matches!(err, CartError::InvalidItem { .. }));

  let cart = service.load(Some("u1")).await;
  assert!(!cart.contains("2"));
  assert_eq!(cart.total(), 200 * big);
  assert_eq!(store.document("u1").unwrap()["total"], json!(200 * big));
}

#[tokio::test]
#[serial]
async fn test_overflowing_stored_document_is_treated_as_malformed() {
  setup_tracing();
  let (store, service) = memory_service();
  let big = i64::MAX / 100;
  let document = json!({
    "items": {
      "1": { "productId": "1", "name": "Cookie 1", "price": 200, "quantity": big },
      "2": { "productId": "2", "name": "Cookie 2", "price": 200, "quantity": big }
    },
    "total": 0
  });
  store.put_document("u1", document.clone());

  assert!(store.fetch("u1").await.is_err());
  assert!(service.load(Some("u1")).await.is_empty());
  assert_eq!(service.item_count(Some("u1")).await, 0);

  let err = service.add_item(Some("u1"), cookie("3", 100, 1)).await.unwrap_err();
  assert!(matches!(err, CartError::Persistence { .. }));
  assert_eq!(store.document("u1").unwrap(), document);
}
