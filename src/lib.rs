use lambda_runtime::{Error, LambdaEvent};
use serde::Serialize;
use serde_json::Value;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::services::Services;

pub mod alert;
pub mod chart;
pub mod clients;
pub mod config;
pub mod process;
pub mod reading;
pub mod series;
pub mod services;

pub use clients::AwsClients;

pub const SUCCESS_BODY: &str = "İşlem başarılı!";
pub const FAILURE_BODY: &str = "İşlem başarısız!";

pub fn set_up_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();
}

/// Lambda response payload, serialized as `{"statusCode": .., "body": ..}`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    pub body: String,
}

impl Response {
    pub fn success() -> Self {
        Response {
            status_code: 200,
            body: SUCCESS_BODY.to_string(),
        }
    }

    pub fn failure() -> Self {
        Response {
            status_code: 500,
            body: FAILURE_BODY.to_string(),
        }
    }
}

// lambda handler
pub async fn function_handler(
    services: &Services,
    config: &Config,
    evt: LambdaEvent<Value>,
) -> Result<Response, Error> {
    info!("Handling lambda invocation {}", evt.context.request_id);
    debug!("Handling event payload: {:?}", evt.payload);

    match process::reading(services, config, evt.payload).await {
        Ok(()) => Ok(Response::success()),
        Err(e) => {
            error!(stage = e.stage(), "Hata: {}", e);
            Ok(Response::failure())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_response_serialization() {
        let value = serde_json::to_value(Response::success()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"statusCode": 200, "body": "İşlem başarılı!"})
        );

        let value = serde_json::to_value(Response::failure()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"statusCode": 500, "body": "İşlem başarısız!"})
        );
    }
}
