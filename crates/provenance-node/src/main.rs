//! # Provenance Node
//!
//! Entry point: loads configuration, opens the ledger and serves JSON
//! invocations on stdin until EOF or Ctrl+C.

use anyhow::{Context, Result};
use provenance_node::container::{build_router, open_ledger, NodeConfig};
use provenance_node::logging::init_logging;
use provenance_node::runtime::serve;
use tokio::io::BufReader;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::from_env().context("invalid configuration")?;
    init_logging(&config.logging)?;

    info!("===========================================");
    info!("  Provenance Node v{}", env!("CARGO_PKG_VERSION"));
    info!("  Storage backend: {}", config.storage.backend);
    info!("===========================================");

    let ledger = open_ledger(&config.storage).context("failed to open ledger")?;
    let router = build_router(ledger);

    let init = router.init();
    if !init.ok {
        error!(message = ?init.message, "Instantiation hook failed");
        anyhow::bail!("instantiation hook failed");
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    let stats = serve(
        &router,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        shutdown,
    )
    .await?;

    info!(
        invocations = stats.invocations,
        successes = stats.successes,
        failures = stats.failures,
        unknown_operations = stats.unknown_operations,
        "Node stopped"
    );
    Ok(())
}
