//! Bookshelf application library
//!
//! Hosts the in-memory book catalog module and wires it into the HTTP shell.

use anyhow::Context;
use axum::Router;
use bookshelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub mod modules;
pub mod utils;

/// Registry holding every application module, configured from `settings`.
pub fn build_registry(settings: &Settings) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, settings);
    registry
}

/// Full application router without running module lifecycle hooks.
pub fn app(settings: &Settings) -> Router {
    bookshelf_http::build_router(&build_registry(settings), settings)
}

/// Initialize and start every module, serve HTTP until shutdown, then stop the modules.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry(&settings);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry
        .init_modules(&ctx)
        .await
        .context("module initialization failed")?;
    registry
        .start_modules(&ctx)
        .await
        .context("module startup failed")?;

    let served = bookshelf_http::start_server(&registry, &settings).await;

    registry
        .stop_modules()
        .await
        .context("module shutdown failed")?;

    served
}
