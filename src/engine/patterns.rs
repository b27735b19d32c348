//! Fixed diagnostic pattern table
//!
//! Patterns are pure predicates over a reading plus the heart-rate-variability
//! proxy sampled for that reading. The proxy is a placeholder: no RR-interval
//! data reaches the engine, so it is drawn from the engine's random source.

use rand::Rng;

use crate::engine::above;
use crate::models::{PatternKind, PatternMatch, Posture, SensorReading, Severity};

/// Evaluation order of the pattern table
pub const PATTERNS: [PatternKind; 4] = [
    PatternKind::Stress,
    PatternKind::Fatigue,
    PatternKind::Fever,
    PatternKind::PoorPosture,
];

/// Upper bound (exclusive) of the simulated variability proxy
pub const HRV_PROXY_MAX: f64 = 50.0;

const FATIGUE_HRV_LIMIT: f64 = 20.0;

/// Inputs visible to pattern predicates
#[derive(Debug, Clone, Copy)]
pub struct PatternContext<'a> {
    pub reading: &'a SensorReading,
    pub hrv_proxy: f64,
}

/// Sample the simulated heart-rate-variability proxy
pub fn sample_hrv_proxy<R: Rng>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..HRV_PROXY_MAX)
}

impl PatternKind {
    pub fn matches(self, ctx: &PatternContext<'_>) -> bool {
        let reading = ctx.reading;
        match self {
            PatternKind::Stress => {
                above(reading.heart_rate, 85.0) && above(reading.gas_level, 600.0)
            }
            PatternKind::Fatigue => ctx.hrv_proxy < FATIGUE_HRV_LIMIT,
            PatternKind::Fever => above(reading.temperature, 37.2),
            PatternKind::PoorPosture => reading.posture == Some(Posture::Poor),
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PatternKind::Stress => "Elevated heart rate combined with poor air quality",
            PatternKind::Fatigue => "Low heart rate variability suggests fatigue",
            PatternKind::Fever => "Body temperature above the normal range",
            PatternKind::PoorPosture => "Sustained poor posture detected",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            PatternKind::Stress => Severity::Medium,
            PatternKind::Fatigue => Severity::Low,
            PatternKind::Fever => Severity::High,
            PatternKind::PoorPosture => Severity::Medium,
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            PatternKind::Stress => "Move to a well-ventilated area and take slow, deep breaths",
            PatternKind::Fatigue => "Take a short rest and consider improving sleep quality",
            PatternKind::Fever => "Monitor temperature closely and consult a doctor if it persists",
            PatternKind::PoorPosture => "Straighten your back and adjust your seating position",
        }
    }

    fn to_match(self) -> PatternMatch {
        PatternMatch {
            name: self,
            description: self.description().to_string(),
            severity: self.severity(),
            recommendation: self.recommendation().to_string(),
        }
    }
}

/// Every matching pattern, in table order
pub fn detect(ctx: &PatternContext<'_>) -> Vec<PatternMatch> {
    PATTERNS
        .iter()
        .filter(|kind| kind.matches(ctx))
        .map(|kind| kind.to_match())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn names(matches: &[PatternMatch]) -> Vec<PatternKind> {
        matches.iter().map(|m| m.name).collect()
    }

    fn rested(reading: &SensorReading) -> PatternContext<'_> {
        PatternContext { reading, hrv_proxy: 45.0 }
    }

    #[test]
    fn test_no_patterns_on_calm_reading() {
        let reading = SensorReading::new(72.0, 36.6, 300.0, Posture::Good);
        assert!(detect(&rested(&reading)).is_empty());
    }

    #[test]
    fn test_stress_needs_both_conditions() {
        let both = SensorReading::new(90.0, 36.6, 700.0, Posture::Good);
        let heart_only = SensorReading::new(90.0, 36.6, 300.0, Posture::Good);
        let gas_only = SensorReading::new(72.0, 36.6, 700.0, Posture::Good);

        assert_eq!(names(&detect(&rested(&both))), vec![PatternKind::Stress]);
        assert!(detect(&rested(&heart_only)).is_empty());
        assert!(detect(&rested(&gas_only)).is_empty());
    }

    #[test]
    fn test_fatigue_follows_proxy() {
        let reading = SensorReading::new(72.0, 36.6, 300.0, Posture::Good);
        let tired = PatternContext { reading: &reading, hrv_proxy: 12.0 };

        let found = detect(&tired);
        assert_eq!(names(&found), vec![PatternKind::Fatigue]);
        assert_eq!(found[0].severity, Severity::Low);
        assert!(detect(&PatternContext { reading: &reading, hrv_proxy: 20.0 }).is_empty());
    }

    #[test]
    fn test_all_patterns_in_table_order() {
        let reading = SensorReading::new(95.0, 38.0, 900.0, Posture::Poor);
        let ctx = PatternContext { reading: &reading, hrv_proxy: 5.0 };

        assert_eq!(names(&detect(&ctx)), PATTERNS.to_vec());
    }

    #[test]
    fn test_fever_is_high_severity() {
        let reading = SensorReading::new(72.0, 37.3, 300.0, Posture::Good);
        let found = detect(&rested(&reading));

        assert_eq!(names(&found), vec![PatternKind::Fever]);
        assert_eq!(found[0].severity, Severity::High);
    }

    #[test]
    fn test_detection_is_pure() {
        let reading = SensorReading::new(88.0, 37.4, 650.0, Posture::Fair);
        let ctx = rested(&reading);
        assert_eq!(detect(&ctx), detect(&ctx));
    }

    #[test]
    fn test_hrv_proxy_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let proxy = sample_hrv_proxy(&mut rng);
            assert!((0.0..HRV_PROXY_MAX).contains(&proxy));
        }
    }
}
