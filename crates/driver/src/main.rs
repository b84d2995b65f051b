//! Checkout driver entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use driver::{Config, DriverError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::from_env();

    // 1. Initialize tracing; stdout is reserved for the report
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Resolve the script: first argument wins over CHECKOUT_SCRIPT
    let script = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.script.clone());
    let Some(script) = script else {
        tracing::error!(error = %DriverError::NoScript, "nothing to run");
        return ExitCode::FAILURE;
    };

    // 4. Replay and print the report
    tracing::info!(script = %script.display(), "replaying checkout script");
    let code = match driver::run_file(&script, config.options()).await {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize report");
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "script run failed");
            ExitCode::FAILURE
        }
    };

    if config.print_metrics {
        println!("{}", metrics_handle.render());
    }
    code
}
