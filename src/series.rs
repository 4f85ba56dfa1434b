use chrono::{DateTime, Duration, Local};
use rand::Rng;

pub const SERIES_POINTS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub time: DateTime<Local>,
    pub temperature: f64,
}

/// Builds the hourly series drawn on the trend chart.
///
/// This is not history: each point is `current_temp` with uniform jitter in
/// `[-1, 1)`, one hour apart and ending at `now`. Points come back oldest
/// first.
pub fn generate<R: Rng + ?Sized>(
    current_temp: f64,
    now: DateTime<Local>,
    rng: &mut R,
) -> Vec<SamplePoint> {
    let mut points: Vec<SamplePoint> = (0..SERIES_POINTS)
        .map(|i| SamplePoint {
            time: now - Duration::hours(i as i64),
            temperature: current_temp + rng.gen_range(-1.0..1.0),
        })
        .collect();
    points.reverse();
    points
}
