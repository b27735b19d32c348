//! Human-readable insights and recommendations

use crate::engine::trend;
use crate::engine::{above, below};
use crate::models::{
    Insight, InsightKind, Posture, Priority, Recommendation, RecommendationKind, SensorReading,
    Severity,
};

fn insight(
    kind: InsightKind,
    title: &str,
    description: &str,
    severity: Severity,
    icon: &str,
) -> Insight {
    Insight {
        kind,
        title: title.to_string(),
        description: description.to_string(),
        severity,
        icon: icon.to_string(),
    }
}

fn recommendation(
    kind: RecommendationKind,
    title: &str,
    description: &str,
    priority: Priority,
    icon: &str,
) -> Recommendation {
    Recommendation {
        kind,
        title: title.to_string(),
        description: description.to_string(),
        priority,
        icon: icon.to_string(),
    }
}

/// Findings for the current reading.
///
/// `recent_scores` holds prior overall-health scores followed by the current
/// one, oldest first.
pub fn insights(reading: &SensorReading, recent_scores: &[u8]) -> Vec<Insight> {
    let mut insights = Vec::new();

    if above(reading.heart_rate, 100.0) {
        insights.push(insight(
            InsightKind::Warning,
            "Elevated heart rate",
            "Heart rate is above 100 bpm. Consider resting and avoiding exertion.",
            Severity::Medium,
            "heart",
        ));
    }
    if below(reading.heart_rate, 60.0) {
        insights.push(insight(
            InsightKind::Info,
            "Low heart rate",
            "Heart rate is below 60 bpm. This can be normal at rest.",
            Severity::Low,
            "heart",
        ));
    }
    if above(reading.temperature, 37.2) {
        insights.push(insight(
            InsightKind::Warning,
            "Elevated temperature",
            "Body temperature is above normal. Keep monitoring for fever.",
            Severity::Medium,
            "thermometer",
        ));
    }
    if above(reading.gas_level, 600.0) {
        insights.push(insight(
            InsightKind::Warning,
            "Poor air quality",
            "Gas concentration is high. Ventilate the area.",
            Severity::High,
            "wind",
        ));
    }
    if reading.posture == Some(Posture::Poor) {
        insights.push(insight(
            InsightKind::Info,
            "Poor posture",
            "Posture has been classified as poor. Sit up straight.",
            Severity::Low,
            "user",
        ));
    }
    if trend::is_declining(recent_scores) {
        insights.push(insight(
            InsightKind::Trend,
            "Declining health trend",
            "Overall health has dropped across most of the recent readings.",
            Severity::Medium,
            "trending-down",
        ));
    }

    insights
}

/// Advisory list for the current reading. The last entry is always the
/// preventive movement reminder.
pub fn recommendations(reading: &SensorReading) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if above(reading.heart_rate, 90.0) {
        recommendations.push(recommendation(
            RecommendationKind::Wellness,
            "Take a relaxation break",
            "Pause for a few minutes of slow breathing to bring your heart rate down.",
            Priority::High,
            "coffee",
        ));
    }
    if above(reading.temperature, 37.0) {
        recommendations.push(recommendation(
            RecommendationKind::Hydration,
            "Stay hydrated",
            "Drink water regularly and avoid hot environments.",
            Priority::Medium,
            "droplet",
        ));
    }
    if above(reading.gas_level, 500.0) {
        recommendations.push(recommendation(
            RecommendationKind::Environment,
            "Improve ventilation",
            "Open windows or move to an area with fresh air.",
            Priority::High,
            "wind",
        ));
    }
    if reading.posture != Some(Posture::Good) {
        recommendations.push(recommendation(
            RecommendationKind::Posture,
            "Correct your posture",
            "Keep your back straight and shoulders relaxed.",
            Priority::Low,
            "user-check",
        ));
    }

    recommendations.push(recommendation(
        RecommendationKind::Preventive,
        "Regular movement",
        "Stand up and move around for a few minutes every hour.",
        Priority::Medium,
        "activity",
    ));

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calm() -> SensorReading {
        SensorReading::new(72.0, 36.6, 300.0, Posture::Good)
    }

    fn titles(insights: &[Insight]) -> Vec<&str> {
        insights.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_no_insights_on_calm_reading() {
        assert!(insights(&calm(), &[100]).is_empty());
    }

    #[test]
    fn test_threshold_insights() {
        let reading = SensorReading::new(110.0, 37.5, 700.0, Posture::Poor);
        let found = insights(&reading, &[]);

        assert_eq!(
            titles(&found),
            vec!["Elevated heart rate", "Elevated temperature", "Poor air quality", "Poor posture"]
        );
        assert_eq!(found[2].severity, Severity::High);
    }

    #[test]
    fn test_low_heart_rate_insight() {
        let reading = SensorReading { heart_rate: Some(52.0), ..calm() };
        let found = insights(&reading, &[]);

        assert_eq!(titles(&found), vec!["Low heart rate"]);
        assert_eq!(found[0].severity, Severity::Low);
    }

    #[test]
    fn test_declining_trend_insight() {
        let falling: [u8; 10] = [90, 88, 86, 84, 82, 80, 78, 76, 74, 72];
        let found = insights(&calm(), &falling);

        assert_eq!(titles(&found), vec!["Declining health trend"]);
        assert_eq!(found[0].kind, InsightKind::Trend);
        assert_eq!(found[0].severity, Severity::Medium);

        assert!(insights(&calm(), &falling[1..]).is_empty());
    }

    #[test]
    fn test_absent_fields_produce_no_insights() {
        assert!(insights(&SensorReading::default(), &[]).is_empty());
    }

    #[test]
    fn test_calm_reading_gets_only_movement_reminder() {
        let recs = recommendations(&calm());

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, RecommendationKind::Preventive);
        assert_eq!(recs[0].priority, Priority::Medium);
    }

    #[test]
    fn test_all_recommendations() {
        let reading = SensorReading::new(95.0, 37.1, 550.0, Posture::Fair);
        let kinds: Vec<_> = recommendations(&reading).iter().map(|r| r.kind).collect();

        assert_eq!(
            kinds,
            vec![
                RecommendationKind::Wellness,
                RecommendationKind::Hydration,
                RecommendationKind::Environment,
                RecommendationKind::Posture,
                RecommendationKind::Preventive,
            ]
        );
    }

    #[test]
    fn test_recommendation_priorities() {
        let reading = SensorReading::new(95.0, 37.1, 550.0, Posture::Poor);
        let recs = recommendations(&reading);

        assert_eq!(recs[0].priority, Priority::High);
        assert_eq!(recs[1].priority, Priority::Medium);
        assert_eq!(recs[2].priority, Priority::High);
        assert_eq!(recs[3].priority, Priority::Low);
    }
}
