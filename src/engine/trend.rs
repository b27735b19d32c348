//! Trend analysis over recent overall-health scores
//!
//! Scores are passed oldest first.

use crate::models::Trend;

/// Scores inspected for the declining-trend insight
pub const DECLINE_WINDOW: usize = 10;
/// Share of strictly decreasing consecutive pairs that counts as a decline
pub const DECLINE_RATIO: f64 = 0.7;

/// Scores inspected by the forecast
pub const FORECAST_WINDOW: usize = 5;
/// Slope (points per reading) beyond which the forecast leaves `Stable`
pub const SLOPE_THRESHOLD: f64 = 2.0;

/// Whether the last [`DECLINE_WINDOW`] scores are mostly falling
pub fn is_declining(scores: &[u8]) -> bool {
    if scores.len() < DECLINE_WINDOW {
        return false;
    }

    let window = &scores[scores.len() - DECLINE_WINDOW..];
    let drops = window.windows(2).filter(|pair| pair[1] < pair[0]).count();
    let pairs = window.len() - 1;

    drops as f64 / pairs as f64 >= DECLINE_RATIO
}

/// Ordinary least-squares slope of score against index
pub fn slope(scores: &[u8]) -> f64 {
    let n = scores.len() as f64;
    if scores.len() < 2 {
        return 0.0;
    }

    let (sum_x, sum_y, sum_xy, sum_xx) = scores.iter().enumerate().fold(
        (0.0, 0.0, 0.0, 0.0),
        |(sx, sy, sxy, sxx), (i, &score)| {
            let x = i as f64;
            let y = score as f64;
            (sx + x, sy + y, sxy + x * y, sxx + x * x)
        },
    );

    (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x)
}

/// Forecast from the last [`FORECAST_WINDOW`] scores
pub fn forecast(scores: &[u8]) -> Trend {
    if scores.len() < FORECAST_WINDOW {
        return Trend::Stable;
    }

    let slope = slope(&scores[scores.len() - FORECAST_WINDOW..]);
    if slope > SLOPE_THRESHOLD {
        Trend::Improving
    } else if slope < -SLOPE_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    }
}
