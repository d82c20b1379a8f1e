//! Compile server binary
//!
//! Run with: cargo run -p cloakcc --bin cloakcc-server

use cloakcc::{CloakConfig, CloakServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cloakcc=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CloakConfig::default();

    tracing::info!("Configuration loaded");
    tracing::info!("  - Compiler: {}", config.compiler.binary.display());
    tracing::info!("  - Working dir: {}", config.compiler.work_dir.display());
    tracing::info!("  - Max upload: {} bytes", config.server.max_upload_size);
    tracing::info!("  - Compile timeout: {}s", config.compiler.timeout_secs);

    // Check the compiler binary is where we expect it
    if !config.compiler.binary.exists() {
        tracing::warn!(
            "Compiler binary not found at {}",
            config.compiler.binary.display()
        );
        tracing::warn!("Compile requests will fail until it is in place.");
    }

    let server = CloakServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /upload    - Compile a source file (fields: file, option)");
    println!("  GET  /api/info  - Service info");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
