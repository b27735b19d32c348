//! Application state management
//!
//! Central state container: owns the analysis engine, the last decoded
//! snapshot, and the WebSocket client registry. The whole state sits behind a
//! single `RwLock`, so every `ingest` runs the engine under the write guard.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

use crate::engine::HealthAnalysisEngine;
use crate::hub::HubCommand;
use crate::models::{AnalysisResult, SensorReading};

/// Manual triggers kept for sessions that have not polled yet
const TRIGGER_BACKLOG: usize = 16;

/// Central application state
#[derive(Debug)]
pub struct AppState {
    engine: HealthAnalysisEngine,
    /// Most recent snapshot fed to the engine
    latest_reading: Option<SensorReading>,
    /// Application start time
    start_time: DateTime<Utc>,
    /// Manual emergency/SOS triggers received from viewers
    manual_triggers: u64,
    /// Latest triggers tagged with their running count, oldest first
    recent_triggers: VecDeque<(u64, HubCommand)>,
    /// Connected WebSocket clients
    connected_clients: Vec<String>,
}

impl AppState {
    /// Create new application state around an engine
    pub fn new(engine: HealthAnalysisEngine) -> Self {
        info!(
            history_capacity = engine.history().capacity(),
            "Initializing application state"
        );
        Self {
            engine,
            latest_reading: None,
            start_time: Utc::now(),
            manual_triggers: 0,
            recent_triggers: VecDeque::with_capacity(TRIGGER_BACKLOG),
            connected_clients: Vec::new(),
        }
    }

    /// Analyze a snapshot and keep it as the latest reading
    pub fn ingest(&mut self, reading: SensorReading) -> AnalysisResult {
        let analysis = self.engine.analyze(&reading);

        debug!(
            sequence = self.sequence(),
            overall_health = analysis.overall_health,
            "Sensor snapshot ingested"
        );

        self.latest_reading = Some(reading);
        analysis
    }

    pub fn engine(&self) -> &HealthAnalysisEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut HealthAnalysisEngine {
        &mut self.engine
    }

    pub fn latest_reading(&self) -> Option<&SensorReading> {
        self.latest_reading.as_ref()
    }

    pub fn latest_analysis(&self) -> Option<&AnalysisResult> {
        self.engine.history().latest()
    }

    /// Number of snapshots analyzed so far; changes whenever a new analysis lands
    pub fn sequence(&self) -> u64 {
        self.engine.history().total_recorded()
    }

    /// Latest snapshot and its analysis, tagged with the current sequence
    pub fn latest_update(&self) -> Option<(u64, SensorReading, AnalysisResult)> {
        let reading = self.latest_reading.clone()?;
        let analysis = self.latest_analysis()?.clone();
        Some((self.sequence(), reading, analysis))
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        (Utc::now() - self.start_time).num_seconds().max(0) as u64
    }

    /// Get the timestamp of the latest analysis
    pub fn last_analysis_time(&self) -> Option<DateTime<Utc>> {
        self.latest_analysis().map(|r| r.timestamp)
    }

    /// Record a manual emergency or SOS trigger
    ///
    /// Every connected session picks the trigger up on its next poll.
    pub fn record_command(&mut self, client_id: &str, command: HubCommand) {
        self.manual_triggers += 1;
        if self.recent_triggers.len() == TRIGGER_BACKLOG {
            self.recent_triggers.pop_front();
        }
        self.recent_triggers.push_back((self.manual_triggers, command));
        warn!(
            client_id = %client_id,
            command = ?command,
            total = self.manual_triggers,
            "Manual hub trigger received"
        );
    }

    pub fn manual_triggers(&self) -> u64 {
        self.manual_triggers
    }

    /// Triggers recorded after the `seen`-th one, oldest first
    pub fn triggers_since(&self, seen: u64) -> Vec<(u64, HubCommand)> {
        self.recent_triggers
            .iter()
            .filter(|(count, _)| *count > seen)
            .copied()
            .collect()
    }

    /// Register a new WebSocket client
    pub fn add_client(&mut self, client_id: String) {
        info!(client_id = %client_id, "WebSocket client connected");
        self.connected_clients.push(client_id);
    }

    /// Remove a WebSocket client
    pub fn remove_client(&mut self, client_id: &str) {
        info!(client_id = %client_id, "WebSocket client disconnected");
        self.connected_clients.retain(|id| id != client_id);
    }

    /// Get count of connected clients
    pub fn client_count(&self) -> usize {
        self.connected_clients.len()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(HealthAnalysisEngine::new())
    }
}
