//! Geo query server entry point

use anyhow::Result;
use clap::Parser;
use gq_server::{init_logging, GeoQueryServer, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_filter);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.listen_addr,
        database = %config.database.display(),
        templates = %config.templates_dir.display(),
        classifier = ?config.classifier,
        denylist = ?config.denylist,
        filter_mode = ?config.filter_mode,
        cors = config.cors_enabled,
        "Starting geo query server"
    );

    let server = GeoQueryServer::new(config).await?;
    server.run().await?;
    Ok(())
}
