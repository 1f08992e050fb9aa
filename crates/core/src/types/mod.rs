//! Core types for Toolshed.
//!
//! This module provides type-safe wrappers for catalog and cart concepts.

pub mod cart_item;
pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use cart_item::CartItem;
pub use id::*;
pub use price::{Price, PriceError};
pub use product::Product;
pub use status::*;
