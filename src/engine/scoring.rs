//! Weighted overall-health score
//!
//! Each vital is scored against a baseline window and the four scores are
//! combined with fixed weights. Out-of-range, absent, or non-finite values
//! score zero, so they contribute the full weighted penalty.

use crate::models::{Posture, SensorReading};

/// Acceptable window and optimal point for one vital
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
    pub min: f64,
    pub max: f64,
    pub optimal: f64,
}

pub const HEART_RATE: Baseline = Baseline { min: 60.0, max: 100.0, optimal: 72.0 };
pub const TEMPERATURE: Baseline = Baseline { min: 36.0, max: 37.5, optimal: 36.6 };
pub const GAS_LEVEL: Baseline = Baseline { min: 0.0, max: 1000.0, optimal: 300.0 };

pub const HEART_RATE_WEIGHT: f64 = 0.4;
pub const TEMPERATURE_WEIGHT: f64 = 0.3;
pub const GAS_LEVEL_WEIGHT: f64 = 0.2;
pub const POSTURE_WEIGHT: f64 = 0.1;

impl Baseline {
    /// Score a value in `0.0..=100.0`.
    ///
    /// Inside the window the score falls by 50 points per half-window of
    /// distance from the optimal point.
    pub fn score(&self, value: Option<f64>) -> f64 {
        match value {
            Some(v) if v.is_finite() && v >= self.min && v <= self.max => {
                let half_range = (self.max - self.min) / 2.0;
                (100.0 - ((v - self.optimal).abs() / half_range) * 50.0).max(0.0)
            }
            _ => 0.0,
        }
    }
}

pub fn posture_score(posture: Option<Posture>) -> f64 {
    match posture {
        Some(Posture::Good) => 100.0,
        Some(Posture::Fair) => 70.0,
        Some(Posture::Poor) => 30.0,
        None => 0.0,
    }
}

/// Composite health score in `0..=100`
pub fn overall_health(reading: &SensorReading) -> u8 {
    let composite = HEART_RATE.score(reading.heart_rate) * HEART_RATE_WEIGHT
        + TEMPERATURE.score(reading.temperature) * TEMPERATURE_WEIGHT
        + GAS_LEVEL.score(reading.gas_level) * GAS_LEVEL_WEIGHT
        + posture_score(reading.posture) * POSTURE_WEIGHT;

    if !composite.is_finite() {
        return 0;
    }

    composite.clamp(0.0, 100.0).round() as u8
}
