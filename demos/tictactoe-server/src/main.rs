//! Runnable tic-tac-toe server.
//!
//! Binds the address given as the first argument (default
//! `0.0.0.0:8080`) and serves until Ctrl-C.
//!
//! `RUST_LOG=turnwise=debug` for per-request logging.

use tracing_subscriber::EnvFilter;
use turnwise::prelude::*;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "0.0.0.0:8080".to_string());

    let server = ServerBuilder::new().bind(&addr).build().await?;
    let handle = server.handle();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("ctrl-c, shutting down");
            handle.shutdown();
        }
    });

    server.run().await
}
