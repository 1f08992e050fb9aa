//! Toolshed CLI - Cart management against a local product catalog.
//!
//! # Usage
//!
//! ```bash
//! # Show the stored cart
//! ts-cli show
//!
//! # Add three units of product 1 from catalog.yaml
//! ts-cli --catalog catalog.yaml add 1 -q 3
//!
//! # Change or remove a line
//! ts-cli update 1 2
//! ts-cli remove 1
//!
//! # Discard the cart if it is older than a week
//! ts-cli expire --days 7
//!
//! # Print the order draft and empty the cart
//! ts-cli checkout --confirm
//! ```
//!
//! Storage location, namespace and notification timing come from the
//! `CART_*` environment variables (see `toolshed_cart::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use toolshed_cart::{CartConfig, CartFacade, FileStore, TracingNotifier};
use toolshed_core::ProductId;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod catalog;
mod commands;

use catalog::Catalog;

#[derive(Parser)]
#[command(name = "ts-cli")]
#[command(author, version, about = "Toolshed cart tools")]
struct Cli {
    /// Product catalog (YAML list of products)
    #[arg(long, global = true, env = "CART_CATALOG", default_value = "catalog.yaml")]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show cart lines and totals
    Show,
    /// Add a catalog product to the cart
    Add {
        /// Product id
        id: ProductId,

        /// Units to add
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        id: ProductId,
    },
    /// Set the quantity of a cart line (0 or less removes it)
    Update {
        /// Product id
        id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove every line
    Clear,
    /// Discard the stored cart if it is older than the expiry threshold
    Expire {
        /// Override `CART_EXPIRY_DAYS`
        #[arg(long)]
        days: Option<u32>,
    },
    /// Print the order draft
    Checkout {
        /// Empty the cart after printing, as on confirmed submission
        #[arg(long)]
        confirm: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load .env before reading SENTRY_DSN
    dotenvy::dotenv().ok();

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = init_sentry();

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "toolshed_cart=info,ts_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if sentry_guard.is_some() {
        tracing::debug!("Sentry initialized");
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CartConfig::from_env()?;
    let store = FileStore::new(&config.storage_dir);
    let mut cart = CartFacade::from_config(store, TracingNotifier, &config);

    match cli.command {
        Commands::Show => commands::cart::show(&cart),
        Commands::Add { id, quantity } => {
            let catalog = Catalog::load(&cli.catalog).await?;
            commands::cart::add(&mut cart, &catalog, id, quantity)?;
        }
        Commands::Remove { id } => commands::cart::remove(&mut cart, id),
        Commands::Update { id, quantity } => commands::cart::update(&mut cart, id, quantity),
        Commands::Clear => commands::cart::clear(&mut cart),
        Commands::Expire { days } => {
            commands::cart::expire(&mut cart, days.unwrap_or(config.expiry_days));
        }
        Commands::Checkout { confirm } => commands::cart::checkout(&mut cart, confirm)?,
    }
    Ok(())
}
