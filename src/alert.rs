use crate::reading::Reading;

pub const ALERT_SUBJECT: &str = "Depo Alarm Bildirimi";

/// Upper limits for a reading. Both comparisons are strict, a value equal to
/// the limit does not raise an alert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub max_temperature: f64,
    pub max_humidity: f64,
}

impl Thresholds {
    pub fn is_exceeded_by(&self, reading: &Reading) -> bool {
        reading.sicaklik > self.max_temperature || reading.nem > self.max_humidity
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertMessage {
    pub subject: &'static str,
    pub body: String,
}

impl AlertMessage {
    pub fn for_reading(reading: &Reading) -> Self {
        AlertMessage {
            subject: ALERT_SUBJECT,
            body: format!(
                "DEPO ALARM! Cihaz: {}\nSıcaklık: {}°C\nNem: {}%",
                reading.device_id, reading.sicaklik, reading.nem
            ),
        }
    }
}

/// Returns the alert to publish for `reading`, if any.
pub fn evaluate(thresholds: &Thresholds, reading: &Reading) -> Option<AlertMessage> {
    thresholds
        .is_exceeded_by(reading)
        .then(|| AlertMessage::for_reading(reading))
}
