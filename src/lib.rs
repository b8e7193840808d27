//! Libris application library
//!
//! Wires the record store, the application modules and the HTTP server.

pub mod modules;

use anyhow::Context;
use libris_kernel::{settings::Settings, InitCtx, ModuleRegistry};

/// Open the configured store and build a registry with every module.
pub async fn build_registry(settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let store = libris_db::open(&settings.store)
        .await
        .context("failed to open the book store")?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store)?;
    Ok(registry)
}

/// Run the catalog service until a shutdown signal arrives.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(
        env = ?settings.environment,
        store = ?settings.store.backend,
        "libris bootstrap starting"
    );

    let registry = build_registry(&settings).await?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_modules(&ctx).await?;
    registry.start_modules(&ctx).await?;
    tracing::info!("libris bootstrap complete");

    let served = libris_http::start_server(&registry, &settings).await;
    let stopped = registry.stop_modules().await;

    served?;
    stopped
}
