//! Toolshed Core - Shared types library.
//!
//! This crate provides the types shared by every Toolshed component:
//! - `cart` - Client-held shopping cart with persistence and notifications
//! - `cli` - Command-line driver for the cart against a local catalog
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, product status, and cart line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
