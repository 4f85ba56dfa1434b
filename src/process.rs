use chrono::{Local, Utc};
use lambda_runtime::Error;
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info};

use crate::alert;
use crate::chart::{ChartError, TrendChart, CHART_KEY};
use crate::config::Config;
use crate::reading::{Reading, StoredRecord};
use crate::series;
use crate::services::Services;

/// Failure of a single pipeline stage. Callers only ever see the generic
/// failure response; the stage is kept for the logs.
#[derive(thiserror::Error, Debug)]
pub enum ProcessError {
    #[error("invalid reading: {0}")]
    InvalidReading(#[from] serde_json::Error),
    #[error("failed to store record: {0}")]
    Store(Error),
    #[error("failed to publish alert: {0}")]
    Publish(Error),
    #[error("failed to render chart: {0}")]
    Render(#[from] ChartError),
    #[error("failed to upload chart: {0}")]
    Upload(Error),
}

impl ProcessError {
    pub fn stage(&self) -> &'static str {
        match self {
            ProcessError::InvalidReading(_) => "extract",
            ProcessError::Store(_) => "persist",
            ProcessError::Publish(_) => "notify",
            ProcessError::Render(_) => "render",
            ProcessError::Upload(_) => "upload",
        }
    }
}

/// Runs one reading through persist, alert, chart and upload, stopping at the
/// first failing stage.
pub async fn reading(
    services: &Services,
    config: &Config,
    payload: Value,
) -> Result<(), ProcessError> {
    let reading = Reading::from_event(payload)?;
    debug!("processing reading: {:?}", reading);

    let record = StoredRecord::new(&reading, Utc::now().timestamp());
    services
        .store
        .put_record(&config.table_name, &record)
        .await
        .map_err(ProcessError::Store)?;
    info!(
        "stored reading for {} at {}",
        record.device_id, record.timestamp
    );

    if let Some(alert) = alert::evaluate(&config.thresholds, &reading) {
        info!(
            "thresholds exceeded for {}: sicaklik={} nem={}",
            reading.device_id, reading.sicaklik, reading.nem
        );
        services
            .publisher
            .publish_alert(&config.topic_arn, &alert)
            .await
            .map_err(ProcessError::Publish)?;
    }

    let points = series::generate(reading.sicaklik, Local::now(), &mut rand::thread_rng());
    let chart = TrendChart::new(&reading, points);

    let start = Instant::now();
    let png = services.renderer.render_png(&chart)?;
    debug!("chart rendered in {:?}", start.elapsed());

    services
        .artifacts
        .put_artifact(&config.bucket_name, CHART_KEY, "image/png", png)
        .await
        .map_err(ProcessError::Upload)?;
    info!("uploaded chart to s3://{}/{}", config.bucket_name, CHART_KEY);

    Ok(())
}
