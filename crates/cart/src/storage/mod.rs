//! Durable cart persistence.
//!
//! # Layout
//!
//! The cart is stored as one JSON blob under a namespaced key
//! (`<namespace>:cart`) in a [`KeyValueStore`]:
//!
//! ```json
//! { "items": [ { "id": 1, "name": "Claw Hammer", "price": 24.5,
//!                "mainImageUrl": "/img/1.jpg", "stock": 5, "quantity": 2 } ],
//!   "timestamp": "2026-10-18T10:00:00Z" }
//! ```
//!
//! # Failure policy
//!
//! Storage is best-effort. The in-memory cart stays authoritative for the
//! session, so [`CartStorage`] never returns errors to its caller: read
//! failures fall back to an empty cart (purging malformed blobs) and write
//! failures are logged and skipped.

mod clock;
mod file;
mod memory;

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use toolshed_core::CartItem;
use tracing::{debug, warn};

pub use clock::{Clock, FixedClock, SystemClock};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Suffix appended to the namespace to form the cart key.
pub const CART_KEY_SUFFIX: &str = "cart";

/// Errors raised by [`KeyValueStore`] implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The write does not fit in the store's quota.
    #[error("Storage quota exceeded: {needed} bytes needed, {limit} allowed")]
    QuotaExceeded {
        /// Bytes the store would hold after the write.
        needed: usize,
        /// Configured quota in bytes.
        limit: usize,
    },

    /// The key cannot be mapped onto the backing store.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// The store is not usable (e.g. a lock was poisoned).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Minimal string key-value store, shaped like browser local storage.
pub trait KeyValueStore {
    /// Read a value. Missing keys are `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite a value in a single step.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails or exceeds a quota.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backing store cannot be modified.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Persisted cart record (read side).
///
/// The timestamp is kept raw: an unreadable timestamp only disables expiry,
/// it does not make the items unreadable.
#[derive(Debug, Deserialize)]
struct StoredCart {
    items: Vec<CartItem>,
    #[serde(default)]
    timestamp: Option<serde_json::Value>,
}

/// Persisted cart record (write side).
#[derive(Debug, Serialize)]
struct StoredCartRef<'a> {
    items: &'a [CartItem],
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct StoredTimestamp {
    timestamp: DateTime<Utc>,
}

/// Reads and writes the cart record under a namespaced key.
pub struct CartStorage<S> {
    store: S,
    key: String,
    clock: Arc<dyn Clock>,
}

impl<S: KeyValueStore> CartStorage<S> {
    /// Create an adapter writing to `<namespace>:cart` in `store`.
    #[must_use]
    pub fn new(store: S, namespace: &str) -> Self {
        Self {
            store,
            key: format!("{namespace}:{CART_KEY_SUFFIX}"),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source used for timestamps and expiry.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// The namespaced key holding the cart record.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Current time according to the adapter's clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Load the persisted items.
    ///
    /// Absent records yield an empty list. Records that fail to parse are
    /// deleted so a later load cannot resurrect them.
    #[must_use]
    pub fn load(&self) -> Vec<CartItem> {
        let raw = match self.store.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read stored cart");
                return Vec::new();
            }
        };

        match serde_json::from_str::<StoredCart>(&raw) {
            Ok(stored) => {
                debug!(
                    key = %self.key,
                    items = stored.items.len(),
                    saved_at = ?stored.timestamp,
                    "Loaded stored cart"
                );
                stored.items
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding malformed stored cart");
                self.clear();
                Vec::new()
            }
        }
    }

    /// Persist `items` with the current timestamp.
    ///
    /// Failures are logged and otherwise ignored.
    pub fn save(&self, items: &[CartItem]) {
        let record = StoredCartRef {
            items,
            timestamp: self.clock.now(),
        };

        let result = serde_json::to_string(&record)
            .map_err(StorageError::from)
            .and_then(|json| self.store.set_item(&self.key, &json));

        match result {
            Ok(()) => debug!(key = %self.key, items = items.len(), "Saved cart"),
            Err(e) => warn!(key = %self.key, error = %e, "Failed to save cart"),
        }
    }

    /// Delete the persisted record.
    pub fn clear(&self) {
        if let Err(e) = self.store.remove_item(&self.key) {
            warn!(key = %self.key, error = %e, "Failed to clear stored cart");
        }
    }

    /// Whether the stored record is older than `days`.
    ///
    /// Missing records and unreadable timestamps are never expired.
    #[must_use]
    pub fn is_expired(&self, days: u32) -> bool {
        let Ok(Some(raw)) = self.store.get_item(&self.key) else {
            return false;
        };
        let Ok(stored) = serde_json::from_str::<StoredTimestamp>(&raw) else {
            return false;
        };

        let age = self.clock.now() - stored.timestamp;
        age > TimeDelta::days(i64::from(days))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use toolshed_core::{Price, ProductId};

    use super::*;

    fn item(id: i64, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            name: format!("Item {id}"),
            price: Price::from_cents(1999),
            main_image_url: format!("/img/{id}.jpg"),
            stock: 10,
            quantity,
        }
    }

    fn storage_at(store: MemoryStore, now: DateTime<Utc>) -> (CartStorage<MemoryStore>, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(now));
        let storage = CartStorage::new(store, "toolshed").with_clock(clock.clone());
        (storage, clock)
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_key_is_namespaced() {
        let storage = CartStorage::new(MemoryStore::new(), "shop");
        assert_eq!(storage.key(), "shop:cart");
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (storage, _) = storage_at(MemoryStore::new(), start());
        let items = vec![item(1, 2), item(2, 1)];

        storage.save(&items);
        assert_eq!(storage.load(), items);
    }

    #[test]
    fn test_saved_record_shape() {
        let store = MemoryStore::new();
        let (storage, _) = storage_at(store.clone(), start());
        storage.save(&[item(1, 2)]);

        let raw = store.get_item("toolshed:cart").unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["timestamp"], "2026-10-01T12:00:00Z");
        assert_eq!(json["items"][0]["mainImageUrl"], "/img/1.jpg");
        assert_eq!(json["items"][0]["quantity"], 2);
    }

    #[test]
    fn test_load_missing_is_empty() {
        let (storage, _) = storage_at(MemoryStore::new(), start());
        assert!(storage.load().is_empty());
    }

    #[test]
    fn test_load_malformed_purges_key() {
        let store = MemoryStore::new();
        store.set_item("toolshed:cart", "{not json").unwrap();
        let (storage, _) = storage_at(store.clone(), start());

        assert!(storage.load().is_empty());
        assert!(store.get_item("toolshed:cart").unwrap().is_none());
    }

    #[test]
    fn test_load_items_not_array_purges_key() {
        let store = MemoryStore::new();
        store
            .set_item("toolshed:cart", r#"{"items":{"id":1},"timestamp":"2026-10-01T12:00:00Z"}"#)
            .unwrap();
        let (storage, _) = storage_at(store.clone(), start());

        assert!(storage.load().is_empty());
        assert!(store.get_item("toolshed:cart").unwrap().is_none());
    }

    #[test]
    fn test_save_over_quota_is_swallowed() {
        let store = MemoryStore::with_quota(16);
        let (storage, _) = storage_at(store.clone(), start());

        storage.save(&[item(1, 1)]);
        assert!(store.get_item("toolshed:cart").unwrap().is_none());
    }

    #[test]
    fn test_expiry_threshold() {
        let (storage, clock) = storage_at(MemoryStore::new(), start());
        storage.save(&[item(1, 1)]);

        clock.advance(TimeDelta::days(30));
        assert!(!storage.is_expired(30));

        clock.advance(TimeDelta::days(1));
        assert!(storage.is_expired(30));
    }

    #[test]
    fn test_expiry_without_record_is_false() {
        let (storage, _) = storage_at(MemoryStore::new(), start());
        assert!(!storage.is_expired(0));
    }

    #[test]
    fn test_expiry_with_bad_timestamp_is_false() {
        let store = MemoryStore::new();
        store
            .set_item("toolshed:cart", r#"{"items":[],"timestamp":"yesterday"}"#)
            .unwrap();
        let (storage, _) = storage_at(store, start());
        assert!(!storage.is_expired(0));
    }

    #[test]
    fn test_load_keeps_items_with_bad_timestamp() {
        let store = MemoryStore::new();
        let (storage, _) = storage_at(store.clone(), start());
        let line = serde_json::to_string(&item(1, 2)).unwrap();
        for timestamp in [r#""yesterday""#, "1790000000000"] {
            store
                .set_item("toolshed:cart", &format!(r#"{{"items":[{line}],"timestamp":{timestamp}}}"#))
                .unwrap();

            assert_eq!(storage.load(), vec![item(1, 2)]);
            assert!(store.get_item("toolshed:cart").unwrap().is_some());
            assert!(!storage.is_expired(0));
        }
    }

    #[test]
    fn test_clear_removes_record() {
        let store = MemoryStore::new();
        let (storage, _) = storage_at(store.clone(), start());
        storage.save(&[item(1, 1)]);
        storage.clear();
        assert!(store.get_item("toolshed:cart").unwrap().is_none());
    }
}
