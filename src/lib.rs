//! Bookshop catalog application
//!
//! Wires the author and book modules over shared in-memory stores and runs
//! them behind the HTTP server.

pub mod error;
pub mod modules;
pub mod utils;

pub use error::{CatalogError, CatalogResult};

use anyhow::Context;
use bookshop_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use modules::CatalogStores;

/// Build a registry holding every catalog module over fresh in-memory stores
pub fn build_registry(settings: &Settings) -> ModuleRegistry {
    let stores = CatalogStores::in_memory(&settings.database);
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &stores, settings);
    registry
}

/// Initialize and start every module, serve HTTP until shutdown, then stop
/// the modules in reverse order.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry(&settings);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry
        .init_modules(&ctx)
        .await
        .context("failed to initialize modules")?;
    registry
        .start_modules(&ctx)
        .await
        .context("failed to start modules")?;

    tracing::info!(modules = registry.len(), "bookshop modules started");

    let served = bookshop_http::start_server(&registry, &settings).await;

    registry
        .stop_modules()
        .await
        .context("failed to stop modules")?;

    served
}
