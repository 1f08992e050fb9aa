//! File-backed persistence of the cart record.

use std::fs;

use chrono::TimeDelta;
use toolshed_cart::{
    CartFacade, CartStorage, GateConfig, KeyValueStore, MemoryStore, NotificationGate,
    RecordingNotifier,
};
use toolshed_core::ProductId;
use toolshed_integration_tests::{TestCart, product};

#[test]
fn test_cart_survives_remount() {
    let mut t = TestCart::new();
    t.cart.add_to_cart(Some(&product(1, "Hammer", 100, 5)), 2);
    t.cart.add_to_cart(Some(&product(2, "Saw", 40, 3)), 3);
    let items = t.cart.cart_items().to_vec();

    let t = t.remount();

    assert_eq!(t.cart.cart_items(), items.as_slice());
    assert!(!t.cart.is_loading());
}

#[test]
fn test_record_matches_wire_format() {
    let mut t = TestCart::new();
    t.cart.add_to_cart(Some(&product(7, "Wrench", 15, 9)), 2);

    let raw = fs::read_to_string(t.record_path()).expect("record written");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("valid json");

    assert_eq!(json["timestamp"], "2026-10-18T09:00:00Z");
    let line = &json["items"][0];
    assert_eq!(line["id"], 7);
    assert_eq!(line["name"], "Wrench");
    assert_eq!(line["price"], 15.0);
    assert_eq!(line["mainImageUrl"], "/img/7.jpg");
    assert_eq!(line["stock"], 9);
    assert_eq!(line["quantity"], 2);
}

#[test]
fn test_corrupted_record_is_purged() {
    let mut t = TestCart::new();
    t.cart.add_to_cart(Some(&product(1, "Hammer", 100, 5)), 2);
    fs::write(t.record_path(), "{\"items\": 12").expect("overwrite record");

    let t = t.remount();
    assert!(t.cart.cart_items().is_empty());
    assert!(!t.record_path().exists());

    // A second session must not resurrect anything either.
    let t = t.remount();
    assert!(t.cart.cart_items().is_empty());
}

#[test]
fn test_hand_edited_record_is_normalized() {
    let t = TestCart::new();
    let record = r#"{
        "items": [
            {"id": 1, "name": "Hammer", "price": 100, "mainImageUrl": "", "stock": 5, "quantity": 9},
            {"id": 1, "name": "Hammer", "price": 100, "mainImageUrl": "", "stock": 5, "quantity": 1},
            {"id": 2, "name": "Saw", "price": 40, "mainImageUrl": "", "stock": 0, "quantity": 1}
        ],
        "timestamp": "2026-10-18T09:00:00Z"
    }"#;
    t.store.set_item("toolshed:cart", record).expect("write record");

    let t = t.remount();
    assert_eq!(t.cart.cart_items().len(), 1);
    assert_eq!(t.cart.cart_item_quantity(ProductId::new(1)), 5);
}

#[test]
fn test_expired_cart_discarded_on_mount() {
    let mut t = TestCart::new();
    t.cart.add_to_cart(Some(&product(1, "Hammer", 100, 5)), 2);

    t.clock.advance(TimeDelta::days(31));
    let t = t.remount();

    assert!(t.cart.cart_items().is_empty());
    assert!(!t.record_path().exists());
}

#[test]
fn test_cart_within_expiry_kept_on_mount() {
    let mut t = TestCart::new();
    t.cart.add_to_cart(Some(&product(1, "Hammer", 100, 5)), 2);

    t.clock.advance(TimeDelta::days(29));
    let t = t.remount();

    assert_eq!(t.cart.cart_items_count(), 2);
}

#[test]
fn test_every_mutation_refreshes_timestamp() {
    let mut t = TestCart::new();
    t.cart.add_to_cart(Some(&product(1, "Hammer", 100, 5)), 1);

    t.clock.advance(TimeDelta::days(20));
    t.cart.update_quantity(ProductId::new(1), 2);
    t.clock.advance(TimeDelta::days(20));

    assert!(!t.cart.is_expired());
}

#[test]
fn test_clear_writes_empty_snapshot() {
    let mut t = TestCart::new();
    t.cart.add_to_cart(Some(&product(1, "Hammer", 100, 5)), 1);

    t.cart.clear_cart();

    let raw = fs::read_to_string(t.record_path()).expect("record written");
    let json: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
    assert_eq!(json["items"], serde_json::json!([]));
}

#[test]
fn test_storage_failure_keeps_session_cart() {
    let store = MemoryStore::with_quota(8);
    let notes = RecordingNotifier::new();
    let mut cart = CartFacade::mount(
        CartStorage::new(store.clone(), "toolshed"),
        NotificationGate::new(notes, GateConfig::default()),
        30,
    );

    assert!(cart.add_to_cart(Some(&product(1, "Hammer", 100, 5)), 2));

    assert_eq!(cart.cart_items_count(), 2);
    assert!(store.is_empty());
}

#[test]
fn test_unreadable_timestamp_keeps_items() {
    let t = TestCart::new();
    let record = r#"{
        "items": [
            {"id": 1, "name": "Hammer", "price": 100, "mainImageUrl": "", "stock": 5, "quantity": 2}
        ],
        "timestamp": "yesterday"
    }"#;
    t.store.set_item("toolshed:cart", record).expect("write record");

    let t = t.remount();
    assert_eq!(t.cart.cart_item_quantity(ProductId::new(1)), 2);
    assert!(t.record_path().exists());
    assert!(!t.cart.is_expired());
}

#[test]
fn test_stored_zero_quantity_line_not_restored() {
    let t = TestCart::new();
    let record = r#"{
        "items": [
            {"id": 1, "name": "Hammer", "price": 100, "mainImageUrl": "", "stock": 5, "quantity": 0},
            {"id": 2, "name": "Saw", "price": 40, "mainImageUrl": "", "stock": 5, "quantity": 1}
        ],
        "timestamp": "2026-10-18T09:00:00Z"
    }"#;
    t.store.set_item("toolshed:cart", record).expect("write record");

    let t = t.remount();
    assert!(!t.cart.is_in_cart(ProductId::new(1)));
    assert_eq!(t.cart.cart_items_count(), 1);
}
