//! Data models for sensor readings and analysis results
//!
//! Readings mirror the JSON snapshot pushed by the sensor hub firmware and are
//! decoded leniently: a missing or mistyped field is carried as absent instead
//! of rejecting the whole snapshot. Analysis types are the engine's output and
//! are serialized in camelCase for dashboard consumers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body posture as classified by the hub (`0`, `1`, `2` on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Posture {
    Good,
    Fair,
    Poor,
}

impl Posture {
    /// Map a wire code to a posture. Unknown codes yield `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Posture::Good),
            1 => Some(Posture::Fair),
            2 => Some(Posture::Poor),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Posture::Good => 0,
            Posture::Fair => 1,
            Posture::Poor => 2,
        }
    }
}

/// Status string reported by the hub firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HubStatus {
    Normal,
    Warning,
    Emergency,
}

/// One snapshot from the sensor hub
///
/// Field names follow the firmware JSON. Only the first six fields are scored;
/// the rest are passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorReading {
    /// Heart rate (beats per minute)
    #[serde(default, deserialize_with = "wire::lenient", skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<f64>,

    /// Body temperature (Celsius)
    #[serde(default, deserialize_with = "wire::lenient", skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    /// MQ-2 gas reading (raw ppm-like analog units)
    #[serde(default, deserialize_with = "wire::lenient", skip_serializing_if = "Option::is_none")]
    pub gas_level: Option<f64>,

    #[serde(
        default,
        with = "wire::posture_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub posture: Option<Posture>,

    #[serde(default, deserialize_with = "wire::flag")]
    pub fall_detected: bool,

    #[serde(default, deserialize_with = "wire::flag")]
    pub flame_detected: bool,

    #[serde(default, deserialize_with = "wire::lenient", skip_serializing_if = "Option::is_none")]
    pub status: Option<HubStatus>,

    /// Hub uptime in seconds when the snapshot was taken
    #[serde(default, deserialize_with = "wire::lenient", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,

    /// Number of viewers connected to the hub
    #[serde(default, deserialize_with = "wire::lenient", skip_serializing_if = "Option::is_none")]
    pub clients: Option<u32>,

    #[serde(default, deserialize_with = "wire::lenient", skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,

    #[serde(default, deserialize_with = "wire::lenient", skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<f64>,

    #[serde(default, deserialize_with = "wire::lenient", skip_serializing_if = "Option::is_none")]
    pub motion_detected: Option<bool>,

    #[serde(default, deserialize_with = "wire::lenient", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, deserialize_with = "wire::lenient", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    #[serde(default, deserialize_with = "wire::lenient", skip_serializing_if = "Option::is_none")]
    pub gps_fixed: Option<bool>,

    #[serde(default, deserialize_with = "wire::lenient", skip_serializing_if = "Option::is_none")]
    pub satellites: Option<u32>,
}

impl SensorReading {
    /// Create a reading with the four scored vitals and no safety events
    pub fn new(heart_rate: f64, temperature: f64, gas_level: f64, posture: Posture) -> Self {
        Self {
            heart_rate: Some(heart_rate),
            temperature: Some(temperature),
            gas_level: Some(gas_level),
            posture: Some(posture),
            ..Self::default()
        }
    }

    pub fn with_fall(mut self, fall_detected: bool) -> Self {
        self.fall_detected = fall_detected;
        self
    }

    pub fn with_flame(mut self, flame_detected: bool) -> Self {
        self.flame_detected = flame_detected;
        self
    }

    /// Whether the snapshot carries a fall or flame event
    pub fn is_emergency(&self) -> bool {
        self.fall_detected || self.flame_detected
    }
}

/// Lenient serde helpers for the hub wire format
mod wire {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Decode any field, treating `null` or a mistyped value as absent
    pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.and_then(|v| serde_json::from_value(v).ok()))
    }

    /// Boolean flags accept `true`/`false` and the firmware's `0`/`1`
    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::Bool(b)) => b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            _ => false,
        })
    }

    pub mod posture_code {
        use crate::models::Posture;
        use serde::{Deserialize, Deserializer, Serializer};
        use serde_json::Value;

        pub fn serialize<S>(posture: &Option<Posture>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match posture {
                Some(p) => serializer.serialize_u8(p.code()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Posture>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = Option::<Value>::deserialize(deserializer)?;
            Ok(value
                .and_then(|v| v.as_f64())
                .filter(|code| code.fract() == 0.0)
                .and_then(|code| Posture::from_code(code as i64)))
        }
    }
}

/// Coarse ordinal risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Named diagnostic pattern, evaluated in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Stress,
    Fatigue,
    Fever,
    PoorPosture,
}

/// A pattern that matched the current reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMatch {
    pub name: PatternKind,
    pub description: String,
    pub severity: Severity,
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Warning,
    Info,
    Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Wellness,
    Hydration,
    Environment,
    Posture,
    Preventive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    FallDetected,
    FlameDetected,
    HeartRateExtreme,
    TemperatureExtreme,
}

/// Safety-critical notification derived from a single reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub icon: String,
    pub immediate_action: bool,
}

/// Engine output for one reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub timestamp: DateTime<Utc>,
    /// Composite score in `0..=100`
    pub overall_health: u8,
    pub risk_level: RiskLevel,
    pub patterns: Vec<PatternMatch>,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<Recommendation>,
    pub alerts: Vec<Alert>,
}

/// Direction of recent overall-health scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

/// Display sub-scores, each in `0..=100`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthBreakdown {
    pub cardiovascular: u8,
    pub respiratory: u8,
    pub stress: u8,
}

/// WebSocket message types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WsMessage {
    /// A reading was analyzed
    AnalysisUpdate {
        reading: SensorReading,
        analysis: AnalysisResult,
    },
    /// Connection acknowledgment
    Connected { client_id: String },
    /// Error message
    Error { message: String },
    /// Heartbeat/ping
    Ping,
    /// Heartbeat/pong response
    Pong,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub last_analysis: Option<DateTime<Utc>>,
    pub connected_clients: usize,
    pub manual_triggers: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_firmware_snapshot() {
        let json = r#"{
            "heartRate": 78,
            "temperature": 25.4,
            "gasLevel": 1430,
            "posture": 2,
            "fallDetected": false,
            "flameDetected": true,
            "status": "EMERGENCY",
            "timestamp": 512,
            "clients": 1
        }"#;

        let reading: SensorReading = serde_json::from_str(json).unwrap();

        assert_eq!(reading.heart_rate, Some(78.0));
        assert_eq!(reading.temperature, Some(25.4));
        assert_eq!(reading.gas_level, Some(1430.0));
        assert_eq!(reading.posture, Some(Posture::Poor));
        assert!(!reading.fall_detected);
        assert!(reading.flame_detected);
        assert_eq!(reading.status, Some(HubStatus::Emergency));
        assert_eq!(reading.timestamp, Some(512));
        assert_eq!(reading.clients, Some(1));
        assert!(reading.is_emergency());
    }

    #[test]
    fn test_missing_fields_are_absent() {
        let reading: SensorReading = serde_json::from_str("{}").unwrap();

        assert_eq!(reading.heart_rate, None);
        assert_eq!(reading.posture, None);
        assert!(!reading.fall_detected);
        assert!(!reading.flame_detected);
    }

    #[test]
    fn test_mistyped_fields_are_absent() {
        let json = r#"{"heartRate": "fast", "posture": 7, "status": "PANIC", "fallDetected": 1}"#;
        let reading: SensorReading = serde_json::from_str(json).unwrap();

        assert_eq!(reading.heart_rate, None);
        assert_eq!(reading.posture, None);
        assert_eq!(reading.status, None);
        assert!(reading.fall_detected);
    }

    #[test]
    fn test_extended_fields_pass_through() {
        let json = r#"{"humidity": 41.5, "stressLevel": 3, "motionDetected": true,
                       "latitude": 27.7, "longitude": 85.3, "gpsFixed": true, "satellites": 7}"#;
        let reading: SensorReading = serde_json::from_str(json).unwrap();
        let echoed = serde_json::to_value(&reading).unwrap();

        assert_eq!(echoed["humidity"], 41.5);
        assert_eq!(echoed["motionDetected"], true);
        assert_eq!(echoed["satellites"], 7);
        assert!(echoed.get("heartRate").is_none());
    }

    #[test]
    fn test_posture_serializes_as_code() {
        let reading = SensorReading::new(72.0, 36.6, 300.0, Posture::Fair);
        let json = serde_json::to_value(&reading).unwrap();

        assert_eq!(json["posture"], 1);
        assert_eq!(json["heartRate"], 72.0);
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::High < RiskLevel::Critical);
        assert_eq!(serde_json::to_string(&RiskLevel::Critical).unwrap(), "\"critical\"");
    }

    #[test]
    fn test_alert_kind_wire_name() {
        assert_eq!(
            serde_json::to_string(&AlertKind::HeartRateExtreme).unwrap(),
            "\"heart_rate_extreme\""
        );
    }
}
