// coin-alert - emails when a coin's price moves past a threshold
// Checks each <coin><interval><threshold> argument once and exits

use std::process::ExitCode;

use anyhow::Result;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match dotenv::dotenv() {
        Ok(path) => debug!("📄 Loaded .env from {:?}", path),
        Err(e) if e.not_found() => debug!("No .env file, using process environment"),
        Err(e) => warn!("⚠️  Could not load .env file: {}", e),
    }

    coin_alert::run(std::env::args().skip(1)).await
}
