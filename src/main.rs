use std::sync::Arc;

use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use depo_telemetry::chart::PlottersRenderer;
use depo_telemetry::config;
use depo_telemetry::services::Services;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // a local .env is optional, lambda provides the environment directly
    let dotenv = dotenvy::dotenv();

    depo_telemetry::set_up_logging();

    info!(
        "Initializing {} version {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    if let Ok(path) = dotenv {
        debug!("loaded environment from {}", path.display());
    }

    // failed calls are reported, never retried
    let aws_config = aws_config::defaults(BehaviorVersion::v2024_03_28())
        .retry_config(RetryConfig::disabled())
        .load()
        .await;
    let clients = depo_telemetry::AwsClients::new(&aws_config);
    let config = config::Config::load_from_env()?;

    let renderer = Arc::new(PlottersRenderer::with_font_file(&config.chart_font_path));
    let services = Services::new(&clients, renderer);

    run(service_fn(|request: LambdaEvent<Value>| {
        depo_telemetry::function_handler(&services, &config, request)
    }))
    .await
}
