use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single telemetry sample as sent by a warehouse sensor.
///
/// Field names are the wire names used by the devices: `sicaklik` is the
/// temperature in °C, `nem` the relative humidity in % and `hareket` the
/// motion flag.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Reading {
    pub device_id: String,
    pub sicaklik: f64,
    pub nem: f64,
    pub hareket: bool,
}

impl Reading {
    pub fn from_event(payload: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(payload)
    }
}

/// Row written to the telemetry table, keyed by (`device_id`, `timestamp`).
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub device_id: String,
    pub timestamp: i64,
    pub sicaklik: f64,
    pub nem: f64,
    pub hareket: bool,
}

impl StoredRecord {
    pub fn new(reading: &Reading, timestamp: i64) -> Self {
        StoredRecord {
            device_id: reading.device_id.clone(),
            timestamp,
            sicaklik: reading.sicaklik,
            nem: reading.nem,
            hareket: reading.hareket,
        }
    }

    pub fn to_item(&self) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (
                "device_id".to_string(),
                AttributeValue::S(self.device_id.clone()),
            ),
            (
                "timestamp".to_string(),
                AttributeValue::N(self.timestamp.to_string()),
            ),
            (
                "sicaklik".to_string(),
                AttributeValue::N(self.sicaklik.to_string()),
            ),
            ("nem".to_string(), AttributeValue::N(self.nem.to_string())),
            ("hareket".to_string(), AttributeValue::Bool(self.hareket)),
        ])
    }
}
