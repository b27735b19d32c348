//! Additive risk classification
//!
//! Every vital adds points according to how far it strays; the total is then
//! bucketed into a [`RiskLevel`]. Absent values add nothing.

use crate::engine::{above, below};
use crate::models::{Posture, RiskLevel, SensorReading};

pub const CRITICAL_THRESHOLD: u32 = 5;
pub const HIGH_THRESHOLD: u32 = 3;
pub const MEDIUM_THRESHOLD: u32 = 2;

/// Sum of per-vital risk points
pub fn risk_score(reading: &SensorReading) -> u32 {
    let mut score = 0;

    let hr = reading.heart_rate;
    if above(hr, 120.0) || below(hr, 50.0) {
        score += 3;
    } else if above(hr, 100.0) || below(hr, 60.0) {
        score += 2;
    } else if above(hr, 90.0) || below(hr, 65.0) {
        score += 1;
    }

    let temp = reading.temperature;
    if above(temp, 38.0) || below(temp, 35.0) {
        score += 3;
    } else if above(temp, 37.5) || below(temp, 35.5) {
        score += 2;
    }

    if above(reading.gas_level, 800.0) {
        score += 2;
    } else if above(reading.gas_level, 600.0) {
        score += 1;
    }

    if reading.posture == Some(Posture::Poor) {
        score += 1;
    }
    if reading.fall_detected {
        score += 3;
    }
    if reading.flame_detected {
        score += 3;
    }

    score
}

/// Bucket an accumulated risk score
pub fn classify(score: u32) -> RiskLevel {
    if score >= CRITICAL_THRESHOLD {
        RiskLevel::Critical
    } else if score >= HIGH_THRESHOLD {
        RiskLevel::High
    } else if score >= MEDIUM_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Risk level for a reading. A fall or flame event is always critical.
pub fn assess(reading: &SensorReading) -> RiskLevel {
    if reading.is_emergency() {
        return RiskLevel::Critical;
    }
    classify(risk_score(reading))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calm() -> SensorReading {
        SensorReading::new(72.0, 36.6, 300.0, Posture::Good)
    }

    #[test]
    fn test_calm_reading_is_low() {
        assert_eq!(risk_score(&calm()), 0);
        assert_eq!(assess(&calm()), RiskLevel::Low);
    }

    #[test]
    fn test_heart_rate_tiers() {
        let at = |hr| SensorReading { heart_rate: Some(hr), ..calm() };
        assert_eq!(risk_score(&at(135.0)), 3);
        assert_eq!(risk_score(&at(45.0)), 3);
        assert_eq!(risk_score(&at(105.0)), 2);
        assert_eq!(risk_score(&at(55.0)), 2);
        assert_eq!(risk_score(&at(95.0)), 1);
        assert_eq!(risk_score(&at(62.0)), 1);
        assert_eq!(risk_score(&at(80.0)), 0);
    }

    #[test]
    fn test_temperature_tiers() {
        let at = |t| SensorReading { temperature: Some(t), ..calm() };
        assert_eq!(risk_score(&at(38.5)), 3);
        assert_eq!(risk_score(&at(34.0)), 3);
        assert_eq!(risk_score(&at(37.8)), 2);
        assert_eq!(risk_score(&at(35.2)), 2);
        assert_eq!(risk_score(&at(37.0)), 0);
    }

    #[test]
    fn test_gas_and_posture() {
        let gas = |g| SensorReading { gas_level: Some(g), ..calm() };
        assert_eq!(risk_score(&gas(900.0)), 2);
        assert_eq!(risk_score(&gas(700.0)), 1);
        assert_eq!(risk_score(&gas(600.0)), 0);

        let poor = SensorReading { posture: Some(Posture::Poor), ..calm() };
        assert_eq!(risk_score(&poor), 1);
    }

    #[test]
    fn test_classification_thresholds() {
        assert_eq!(classify(0), RiskLevel::Low);
        assert_eq!(classify(1), RiskLevel::Low);
        assert_eq!(classify(2), RiskLevel::Medium);
        assert_eq!(classify(3), RiskLevel::High);
        assert_eq!(classify(4), RiskLevel::High);
        assert_eq!(classify(5), RiskLevel::Critical);
        assert_eq!(classify(14), RiskLevel::Critical);
    }

    #[test]
    fn test_extreme_heart_rate_is_high() {
        let reading = SensorReading { heart_rate: Some(135.0), ..calm() };
        assert_eq!(risk_score(&reading), 3);
        assert_eq!(assess(&reading), RiskLevel::High);
    }

    #[test]
    fn test_safety_events_escalate_to_critical() {
        let fall = calm().with_fall(true);
        assert_eq!(risk_score(&fall), 3);
        assert_eq!(assess(&fall), RiskLevel::Critical);

        let flame = calm().with_flame(true);
        assert_eq!(assess(&flame), RiskLevel::Critical);
    }

    #[test]
    fn test_monotonic_in_single_factor() {
        let mut previous = RiskLevel::Low;
        for hr in 70..=200 {
            let reading = SensorReading { heart_rate: Some(hr as f64), ..calm() };
            let level = assess(&reading);
            assert!(level >= previous, "risk dropped at {hr} bpm");
            previous = level;
        }
    }

    #[test]
    fn test_absent_values_add_nothing() {
        assert_eq!(risk_score(&SensorReading::default()), 0);
    }
}
