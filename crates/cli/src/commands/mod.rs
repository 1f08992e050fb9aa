//! CLI subcommand implementations.

pub mod cart;

use thiserror::Error;
use toolshed_core::ProductId;

/// Errors surfaced by subcommands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The cart refused the change; the reason was already reported as a
    /// notification.
    #[error("cart rejected adding product {0}")]
    Rejected(ProductId),
}
