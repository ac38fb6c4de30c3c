mod app;
mod core;

use crate::app::lifecycle::context::StartupContext;
use crate::app::lifecycle::shutdown::build_shutdown_pipeline;
use crate::app::lifecycle::startup::build_start_pipeline;
use actix_web::rt::signal;
use anyhow::Context;
use mimalloc::MiMalloc;
use std::path::PathBuf;
use tracing::info;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Env var naming the config file
const CONFIG_PATH_ENV: &str = "PPCBID_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "ppcbid.yaml";

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cfg_path: PathBuf = std::env::var(CONFIG_PATH_ENV)
        .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
        .into();

    let startup_pipeline = build_start_pipeline(cfg_path);
    let startup_ctx = StartupContext::default();

    startup_pipeline
        .run(&startup_ctx)
        .await
        .context("Startup failed")?;
    info!("Startup successful");

    let shutdown_pipeline = build_shutdown_pipeline();

    signal::ctrl_c()
        .await
        .context("Failed to listen for sigint")?;

    shutdown_pipeline
        .run(&startup_ctx)
        .await
        .context("Clean shutdown failed")?;

    // subscriber is flushed by now
    println!("Shutdown successful");

    Ok(())
}
