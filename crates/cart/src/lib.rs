//! Toolshed Cart - Client-held shopping cart.
//!
//! The cart is a persisted collection of line items with quantity and stock
//! invariants, driven through [`CartFacade`].
//!
//! # Architecture
//!
//! - [`validation`] - Pure checks run before any state change
//! - [`state`] - Cart state and the total transition function
//! - [`storage`] - Namespaced JSON record in a key-value store, with expiry
//! - [`notify`] - Deduplicating per-category user notifications
//! - [`facade`] - Command/query surface composing the above
//! - [`config`] - Environment-driven settings
//!
//! # Example
//!
//! ```rust
//! use toolshed_cart::{CartConfig, CartFacade, MemoryStore, RecordingNotifier};
//! use toolshed_core::{Price, Product, ProductId, ProductStatus};
//!
//! let mut cart = CartFacade::from_config(
//!     MemoryStore::new(),
//!     RecordingNotifier::new(),
//!     &CartConfig::default(),
//! );
//!
//! let hammer = Product {
//!     id: ProductId::new(1),
//!     name: "Hammer".to_string(),
//!     price: Price::from_units(100),
//!     main_image_url: String::new(),
//!     stock: 5,
//!     status: ProductStatus::Active,
//! };
//!
//! assert!(cart.add_to_cart(Some(&hammer), 3));
//! assert_eq!(cart.cart_total(), Price::from_units(300));
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod facade;
pub mod notify;
pub mod order;
pub mod state;
pub mod storage;
pub mod validation;

pub use config::{CartConfig, ConfigError};
pub use facade::CartFacade;
pub use notify::{
    GateConfig, Notification, NotificationCategory, NotificationGate, NotificationId, Notifier,
    NotifierEvent, RecordingNotifier, Severity, TracingNotifier,
};
pub use order::{OrderDraft, OrderError};
pub use state::{CartAction, CartState};
pub use storage::{
    CartStorage, Clock, FileStore, FixedClock, KeyValueStore, MemoryStore, StorageError,
    SystemClock,
};
pub use validation::ValidationError;
