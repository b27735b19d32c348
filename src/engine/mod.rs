//! Rule-based health analysis engine
//!
//! Turns one [`SensorReading`] at a time into an [`AnalysisResult`]: a
//! weighted health score, a risk level, matched patterns, insights,
//! recommendations and safety alerts. Each result is appended to a bounded
//! [`HealthHistory`] that feeds the trend checks.
//!
//! The engine is a plain owned value with no interior locking. Whoever drives
//! it must serialize calls to [`HealthAnalysisEngine::analyze`]; the service
//! keeps it behind the application state lock.
//!
//! ⚠️ The scores are heuristics for a monitoring dashboard, not a diagnosis.

pub mod advisor;
pub mod alerts;
pub mod history;
pub mod patterns;
pub mod risk;
pub mod scoring;
pub mod trend;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::models::{AnalysisResult, HealthBreakdown, SensorReading, Severity, Trend};

pub use history::HealthHistory;

/// `true` when the value is present and strictly greater than `limit`
pub(crate) fn above(value: Option<f64>, limit: f64) -> bool {
    value.is_some_and(|v| v > limit)
}

/// `true` when the value is present and strictly less than `limit`
pub(crate) fn below(value: Option<f64>, limit: f64) -> bool {
    value.is_some_and(|v| v < limit)
}

/// Health analysis engine
///
/// `R` supplies the randomness behind the simulated heart-rate-variability
/// proxy and the breakdown jitter. Tests pass a seeded [`StdRng`].
#[derive(Debug)]
pub struct HealthAnalysisEngine<R = StdRng> {
    history: HealthHistory,
    rng: R,
}

impl HealthAnalysisEngine<StdRng> {
    /// Engine with the default history capacity and an entropy-seeded RNG
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Engine whose random placeholders replay for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for HealthAnalysisEngine<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> HealthAnalysisEngine<R> {
    pub fn with_rng(rng: R) -> Self {
        Self::with_history(HealthHistory::new(), rng)
    }

    pub fn with_history(history: HealthHistory, rng: R) -> Self {
        Self { history, rng }
    }

    /// Analyze one reading and record the result.
    ///
    /// Never fails: absent or non-finite values degrade the score and skip
    /// the threshold checks they would have triggered.
    pub fn analyze(&mut self, reading: &SensorReading) -> AnalysisResult {
        let overall_health = scoring::overall_health(reading);
        let risk_level = risk::assess(reading);

        let context = patterns::PatternContext {
            reading,
            hrv_proxy: patterns::sample_hrv_proxy(&mut self.rng),
        };
        let patterns = patterns::detect(&context);

        let mut recent_scores = self.history.recent_scores(trend::DECLINE_WINDOW - 1);
        recent_scores.push(overall_health);
        let insights = advisor::insights(reading, &recent_scores);

        let recommendations = advisor::recommendations(reading);
        let alerts = alerts::evaluate(reading);

        let result = AnalysisResult {
            timestamp: Utc::now(),
            overall_health,
            risk_level,
            patterns,
            insights,
            recommendations,
            alerts,
        };

        debug!(
            overall_health = result.overall_health,
            risk_level = ?result.risk_level,
            patterns = result.patterns.len(),
            insights = result.insights.len(),
            alerts = result.alerts.len(),
            "Analyzed sensor reading"
        );

        for alert in result.alerts.iter().filter(|a| a.severity == Severity::Critical) {
            warn!(
                alert = ?alert.kind,
                immediate_action = alert.immediate_action,
                "Critical alert raised"
            );
        }

        self.history.record(result.clone());
        result
    }

    /// Display sub-scores jittered around `overall_health`.
    ///
    /// Non-deterministic unless the engine was built with a seeded RNG. The
    /// stress sub-score is independent of `overall_health`.
    pub fn health_breakdown(&mut self, overall_health: u8) -> HealthBreakdown {
        let overall = f64::from(overall_health);
        let cardiovascular = overall + self.rng.gen_range(-10.0..10.0);
        let respiratory = overall + self.rng.gen_range(-7.0..7.5);
        let stress = 100.0 - self.rng.gen_range(0.0..30.0);

        HealthBreakdown {
            cardiovascular: to_sub_score(cardiovascular),
            respiratory: to_sub_score(respiratory),
            stress: to_sub_score(stress),
        }
    }

    /// Direction of the last few recorded scores
    pub fn predict_trend(&self) -> Trend {
        trend::forecast(&self.history.recent_scores(trend::FORECAST_WINDOW))
    }

    pub fn history(&self) -> &HealthHistory {
        &self.history
    }
}

fn to_sub_score(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}
