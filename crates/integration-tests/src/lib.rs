//! Integration tests for Toolshed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p toolshed-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_scenarios` - End-to-end command sequences through the facade
//! - `cart_persistence` - File-backed storage, corruption and expiry
//! - `cart_properties` - Randomized command sequences
//!
//! This crate holds the shared fixtures: a cart mounted on a temporary
//! directory with a controllable clock and a recording notifier.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;
use toolshed_cart::{
    CartFacade, CartStorage, FileStore, FixedClock, GateConfig, NotificationGate,
    RecordingNotifier,
};
use toolshed_core::{Price, Product, ProductId, ProductStatus};

/// Namespace every fixture cart writes under.
pub const NAMESPACE: &str = "toolshed";

/// Build an active catalog product.
#[must_use]
pub fn product(id: i64, name: &str, price_units: u32, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Price::from_units(price_units),
        main_image_url: format!("/img/{id}.jpg"),
        stock,
        status: ProductStatus::Active,
    }
}

/// The instant fixture clocks start at.
///
/// # Panics
///
/// Never; the date is a fixed valid constant.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap()
}

/// A cart on disk plus the handles needed to inspect it.
pub struct TestCart {
    pub cart: CartFacade<FileStore, RecordingNotifier>,
    pub notes: RecordingNotifier,
    pub clock: Arc<FixedClock>,
    pub store: FileStore,
    dir: TempDir,
}

impl TestCart {
    /// Mount a fresh cart in a new temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let clock = Arc::new(FixedClock::new(epoch()));
        Self::mount(dir, clock, GateConfig::default())
    }

    /// Mount a fresh cart with custom notification timing.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_gate(gate: GateConfig) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let clock = Arc::new(FixedClock::new(epoch()));
        Self::mount(dir, clock, gate)
    }

    /// Drop the in-memory cart and mount again from the same directory,
    /// as a new session would.
    #[must_use]
    pub fn remount(self) -> Self {
        Self::mount(self.dir, self.clock, GateConfig::default())
    }

    /// Path of the cart record on disk.
    ///
    /// # Panics
    ///
    /// Never for the fixture namespace, which is a valid key.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn record_path(&self) -> std::path::PathBuf {
        self.store
            .path_for(&format!("{NAMESPACE}:cart"))
            .expect("fixture key is valid")
    }

    fn mount(dir: TempDir, clock: Arc<FixedClock>, gate: GateConfig) -> Self {
        let store = FileStore::new(dir.path());
        let notes = RecordingNotifier::new();
        let storage = CartStorage::new(store.clone(), NAMESPACE).with_clock(clock.clone());
        let cart = CartFacade::mount(storage, NotificationGate::new(notes.clone(), gate), 30);
        Self {
            cart,
            notes,
            clock,
            store,
            dir,
        }
    }
}

impl Default for TestCart {
    fn default() -> Self {
        Self::new()
    }
}
