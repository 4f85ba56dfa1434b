use std::env;
use std::string::String;

use crate::alert::Thresholds;

pub const DEFAULT_MAX_TEMPERATURE: f64 = 30.0;
pub const DEFAULT_MAX_HUMIDITY: f64 = 70.0;
pub const DEFAULT_CHART_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub table_name: String,
    pub topic_arn: String,
    pub bucket_name: String,
    pub thresholds: Thresholds,
    pub chart_font_path: String,
}

impl Config {
    pub fn load_from_env() -> Result<Config, String> {
        let conf = Config {
            table_name: env::var("DYNAMODB_TABLE_NAME")
                .map_err(|e| format!("DYNAMODB_TABLE_NAME not set - {}", e))?,
            topic_arn: env::var("SNS_TOPIC_ARN")
                .map_err(|e| format!("SNS_TOPIC_ARN not set - {}", e))?,
            bucket_name: env::var("S3_BUCKET_NAME")
                .map_err(|e| format!("S3_BUCKET_NAME not set - {}", e))?,
            thresholds: Thresholds {
                max_temperature: env::var("MAX_TEMPERATURE")
                    .map(|v| v.trim().parse::<f64>())
                    .unwrap_or(Ok(DEFAULT_MAX_TEMPERATURE))
                    .map_err(|e| format!("Error parsing MAX_TEMPERATURE to f64 - {}", e))?,
                max_humidity: env::var("MAX_HUMIDITY")
                    .map(|v| v.trim().parse::<f64>())
                    .unwrap_or(Ok(DEFAULT_MAX_HUMIDITY))
                    .map_err(|e| format!("Error parsing MAX_HUMIDITY to f64 - {}", e))?,
            },
            chart_font_path: env::var("CHART_FONT_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CHART_FONT_PATH.to_string()),
        };

        Ok(conf)
    }
}
