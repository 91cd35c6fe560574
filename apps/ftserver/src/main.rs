//! File server entry point.

mod cli;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ftserve_server::{FileServer, ServerConfig};

use crate::cli::ServerOpts;

fn main() -> anyhow::Result<()> {
    // Parse before logging so a bad port exits with just the usage message.
    let opts = ServerOpts::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting ftserver");

    let config = ServerConfig {
        port: opts.port,
        root: opts.root,
        data_connect_delay: Duration::from_millis(opts.data_delay_ms),
        io_timeout: Duration::from_secs(opts.timeout_secs),
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let server = FileServer::new(config);

        let signal_server = std::sync::Arc::clone(&server);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received");
                signal_server.shutdown();
            }
        });

        server.run().await
    })?;

    tracing::info!("server shut down cleanly");
    Ok(())
}
