pub mod alert;
pub mod args;
pub mod config;
pub mod domain;
pub mod notifier;
pub mod pipeline;
pub mod price;
pub mod utils;

use std::process::ExitCode;

use args::{parse_args, USAGE};
use config::AppConfig;
use pipeline::AlertPipeline;

use anyhow::Result;
use tracing::{info, warn};

/// Runs one check over the coin-specs in `args` (program name excluded).
///
/// Exits with failure when no coin-spec is usable or when any ticker fetch
/// failed; a failed email still counts as a normal run.
pub async fn run<I, S>(args: I) -> Result<ExitCode>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parsed = parse_args(args);
    if parsed.requests.is_empty() {
        println!("{USAGE}");
        return Ok(ExitCode::FAILURE);
    }

    let config = AppConfig::from_env()?;
    info!(
        "🏗️  Checking {} coin(s) against {}",
        parsed.requests.len(),
        config.ticker_url
    );

    let pipeline = AlertPipeline::from_config(&config)?;
    let report = pipeline.run(&parsed.requests).await;

    let failures = report.failures();
    if failures > 0 {
        warn!("{} of {} ticker fetch(es) failed", failures, report.coins.len());
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
