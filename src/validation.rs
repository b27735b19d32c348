//! Input validation module
//!
//! Decodes hub snapshots at the service edge and checks API query inputs.
//! Snapshot decoding is shallow: only the envelope must be a JSON
//! object, individual fields are left to the engine's lenient handling.

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::models::SensorReading;

/// Largest page size accepted by history endpoints
pub const MAX_PAGE_LIMIT: u32 = 1000;

/// Decode a hub snapshot from its JSON text
pub fn decode_reading(body: &str) -> AppResult<SensorReading> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "Rejected malformed sensor snapshot");
        AppError::from(e)
    })?;

    if !value.is_object() {
        warn!("Rejected sensor snapshot that is not a JSON object");
        return Err(AppError::ValidationError(
            "Sensor snapshot must be a JSON object".to_string(),
        ));
    }

    let reading: SensorReading = serde_json::from_value(value)?;

    debug!(
        heart_rate = ?reading.heart_rate,
        temperature = ?reading.temperature,
        gas_level = ?reading.gas_level,
        "Sensor snapshot decoded"
    );
    Ok(reading)
}

/// Validate pagination parameters
pub fn validate_pagination(page: Option<u32>, limit: Option<u32>) -> AppResult<(u32, u32)> {
    let page = page.unwrap_or(1);
    let limit = limit.unwrap_or(100);

    if page == 0 {
        return Err(AppError::ValidationError(
            "Page number must be greater than 0".to_string(),
        ));
    }

    if limit == 0 || limit > MAX_PAGE_LIMIT {
        return Err(AppError::ValidationError(format!(
            "Limit must be between 1 and {}",
            MAX_PAGE_LIMIT
        )));
    }

    Ok((page, limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HubStatus, Posture};

    #[test]
    fn test_decode_full_snapshot() {
        let body = r#"{"heartRate":72,"temperature":36.6,"gasLevel":300,"posture":0,
                       "fallDetected":false,"flameDetected":false,"status":"NORMAL",
                       "timestamp":12,"clients":2}"#;

        let reading = decode_reading(body).unwrap();
        assert_eq!(reading, SensorReading {
            status: Some(HubStatus::Normal),
            timestamp: Some(12),
            clients: Some(2),
            ..SensorReading::new(72.0, 36.6, 300.0, Posture::Good)
        });
    }

    #[test]
    fn test_decode_partial_snapshot() {
        let reading = decode_reading(r#"{"flameDetected": true}"#).unwrap();

        assert!(reading.flame_detected);
        assert_eq!(reading.heart_rate, None);
    }

    #[test]
    fn test_decode_rejects_malformed_json() {
        assert!(matches!(
            decode_reading("{heartRate: 72"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(matches!(
            decode_reading("[72, 36.6]"),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(decode_reading("42"), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_pagination_validation() {
        // Valid cases
        assert!(validate_pagination(Some(1), Some(50)).is_ok());
        assert_eq!(validate_pagination(None, None).unwrap(), (1, 100));

        // Invalid cases
        assert!(validate_pagination(Some(0), Some(50)).is_err());
        assert!(validate_pagination(Some(1), Some(0)).is_err());
        assert!(validate_pagination(Some(1), Some(2000)).is_err());
    }
}
