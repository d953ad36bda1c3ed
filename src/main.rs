//! Conversion History Server - Binary Entry Point
//!
//! Serves the history log to the UI process over stdin/stdout. Logs go to
//! stderr; set `RUST_LOG` to change the level.

use std::io;

use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use conversion_history::{HistoryConfig, HistoryManager, HistoryServer};

#[tokio::main]
async fn main() -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(false),
        )
        .init();

    let config = HistoryConfig::from_env();
    info!(
        path = %config.history_file.display(),
        max_entries = config.max_entries,
        "starting history server"
    );

    let server = HistoryServer::new(HistoryManager::new(config));
    server.run().await
}
