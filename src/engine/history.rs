//! Bounded history of analysis results
//!
//! A drop-oldest ring of [`AnalysisResult`]s. Insertion order is the only
//! order; entries are never mutated after they are recorded.

use std::collections::VecDeque;

use serde::Serialize;
use tracing::debug;

use crate::models::{AnalysisResult, RiskLevel};

/// Default number of analyses kept in memory
pub const DEFAULT_CAPACITY: usize = 1000;

#[derive(Debug, Clone)]
pub struct HealthHistory {
    entries: VecDeque<AnalysisResult>,
    capacity: usize,
    /// Analyses recorded since creation, including evicted ones
    total_recorded: u64,
}

impl HealthHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// A zero capacity is raised to one so the latest analysis is always kept
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            total_recorded: 0,
        }
    }

    /// Append an analysis, evicting the oldest once over capacity
    pub fn record(&mut self, result: AnalysisResult) {
        self.total_recorded += 1;
        self.entries.push_back(result);

        if self.entries.len() > self.capacity {
            self.entries.pop_front();
            debug!(capacity = self.capacity, "Evicted oldest analysis from history");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn total_recorded(&self) -> u64 {
        self.total_recorded
    }

    pub fn latest(&self) -> Option<&AnalysisResult> {
        self.entries.back()
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.entries.iter()
    }

    /// The last `count` analyses, newest first
    pub fn recent(&self, count: usize) -> Vec<&AnalysisResult> {
        self.entries.iter().rev().take(count).collect()
    }

    /// The last `count` overall-health scores, oldest first
    pub fn recent_scores(&self, count: usize) -> Vec<u8> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(skip).map(|r| r.overall_health).collect()
    }

    pub fn statistics(&self) -> HistoryStatistics {
        if self.entries.is_empty() {
            return HistoryStatistics::empty();
        }

        let mut risk_counts = RiskCounts::default();
        for result in &self.entries {
            match result.risk_level {
                RiskLevel::Low => risk_counts.low += 1,
                RiskLevel::Medium => risk_counts.medium += 1,
                RiskLevel::High => risk_counts.high += 1,
                RiskLevel::Critical => risk_counts.critical += 1,
            }
        }

        let scores = || self.entries.iter().map(|r| r.overall_health);
        let sum: f64 = scores().map(f64::from).sum();

        HistoryStatistics {
            count: self.entries.len(),
            total_recorded: self.total_recorded,
            avg_health: sum / self.entries.len() as f64,
            min_health: scores().min().unwrap_or(0),
            max_health: scores().max().unwrap_or(0),
            alert_count: self.entries.iter().map(|r| r.alerts.len()).sum(),
            risk_counts,
        }
    }
}

impl Default for HealthHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RiskCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

/// Statistical summary of the recorded analyses
#[derive(Debug, Clone, Serialize)]
pub struct HistoryStatistics {
    pub count: usize,
    pub total_recorded: u64,
    pub avg_health: f64,
    pub min_health: u8,
    pub max_health: u8,
    pub alert_count: usize,
    pub risk_counts: RiskCounts,
}

impl HistoryStatistics {
    pub fn empty() -> Self {
        Self {
            count: 0,
            total_recorded: 0,
            avg_health: 0.0,
            min_health: 0,
            max_health: 0,
            alert_count: 0,
            risk_counts: RiskCounts::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn result(overall_health: u8, risk_level: RiskLevel) -> AnalysisResult {
        AnalysisResult {
            timestamp: Utc::now(),
            overall_health,
            risk_level,
            patterns: Vec::new(),
            insights: Vec::new(),
            recommendations: Vec::new(),
            alerts: Vec::new(),
        }
    }

    #[test]
    fn test_history_creation() {
        let history = HealthHistory::new();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
        assert_eq!(history.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_drop_oldest() {
        let mut history = HealthHistory::with_capacity(3);
        for score in [10, 20, 30, 40] {
            history.record(result(score, RiskLevel::Low));
        }

        assert_eq!(history.len(), 3);
        assert_eq!(history.total_recorded(), 4);
        assert_eq!(history.recent_scores(10), vec![20, 30, 40]);
        assert_eq!(history.latest().map(|r| r.overall_health), Some(40));
    }

    #[test]
    fn test_zero_capacity_keeps_latest() {
        let mut history = HealthHistory::with_capacity(0);
        history.record(result(50, RiskLevel::Low));
        history.record(result(60, RiskLevel::Low));

        assert_eq!(history.len(), 1);
        assert_eq!(history.latest().map(|r| r.overall_health), Some(60));
    }

    #[test]
    fn test_recent_is_newest_first() {
        let mut history = HealthHistory::new();
        for score in 0..10 {
            history.record(result(score, RiskLevel::Low));
        }

        let recent = history.recent(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].overall_health, 9);
        assert_eq!(recent[2].overall_health, 7);
        assert_eq!(history.recent_scores(3), vec![7, 8, 9]);
    }

    #[test]
    fn test_statistics() {
        let mut history = HealthHistory::new();
        history.record(result(60, RiskLevel::High));
        history.record(result(80, RiskLevel::Low));
        history.record(result(100, RiskLevel::Low));

        let stats = history.statistics();

        assert_eq!(stats.count, 3);
        assert_eq!(stats.avg_health, 80.0);
        assert_eq!(stats.min_health, 60);
        assert_eq!(stats.max_health, 100);
        assert_eq!(stats.risk_counts.low, 2);
        assert_eq!(stats.risk_counts.high, 1);
    }

    #[test]
    fn test_empty_statistics() {
        let stats = HealthHistory::new().statistics();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.avg_health, 0.0);
    }
}
