//! Safety alerts
//!
//! Alerts are derived straight from the reading and never from the health
//! score, so a fall or flame always surfaces regardless of the other vitals.

use crate::engine::{above, below};
use crate::models::{Alert, AlertKind, SensorReading, Severity};

impl AlertKind {
    fn title(self) -> &'static str {
        match self {
            AlertKind::FallDetected => "Fall detected",
            AlertKind::FlameDetected => "Fire detected",
            AlertKind::HeartRateExtreme => "Extreme heart rate",
            AlertKind::TemperatureExtreme => "Extreme body temperature",
        }
    }

    fn message(self) -> &'static str {
        match self {
            AlertKind::FallDetected => "A fall was detected. Check on the wearer immediately.",
            AlertKind::FlameDetected => "Flame sensor triggered. Evacuate and call emergency services.",
            AlertKind::HeartRateExtreme => "Heart rate is outside the safe range (45-130 bpm).",
            AlertKind::TemperatureExtreme => "Body temperature is outside the safe range (34-39 °C).",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            AlertKind::FallDetected => "alert-triangle",
            AlertKind::FlameDetected => "flame",
            AlertKind::HeartRateExtreme => "heart",
            AlertKind::TemperatureExtreme => "thermometer",
        }
    }

    fn severity(self) -> Severity {
        match self {
            AlertKind::FallDetected | AlertKind::FlameDetected => Severity::Critical,
            AlertKind::HeartRateExtreme | AlertKind::TemperatureExtreme => Severity::High,
        }
    }

    fn requires_immediate_action(self) -> bool {
        matches!(self, AlertKind::FallDetected | AlertKind::FlameDetected)
    }

    fn to_alert(self) -> Alert {
        Alert {
            kind: self,
            title: self.title().to_string(),
            message: self.message().to_string(),
            severity: self.severity(),
            icon: self.icon().to_string(),
            immediate_action: self.requires_immediate_action(),
        }
    }
}

/// Every alert the reading triggers
pub fn evaluate(reading: &SensorReading) -> Vec<Alert> {
    let hr = reading.heart_rate;
    let temp = reading.temperature;

    [
        (AlertKind::FallDetected, reading.fall_detected),
        (AlertKind::FlameDetected, reading.flame_detected),
        (AlertKind::HeartRateExtreme, above(hr, 130.0) || below(hr, 45.0)),
        (AlertKind::TemperatureExtreme, above(temp, 39.0) || below(temp, 34.0)),
    ]
    .into_iter()
    .filter(|(_, triggered)| *triggered)
    .map(|(kind, _)| kind.to_alert())
    .collect()
}
