//! Sensor hub simulation and protocol helpers
//!
//! The physical hub is an ESP32 that reads a flame sensor and an MQ-2 gas
//! sensor, simulates the wearable vitals, and pushes a JSON snapshot to every
//! connected viewer every couple of seconds. This module reproduces that feed
//! in-process for development, along with the hub's status and indicator
//! rules and the manual trigger commands viewers can send back.
//!
//! Vitals follow the firmware's own simulation: heart rate 70 ± 10-14 bpm,
//! an ambient-looking 24-26 °C temperature, a uniformly random posture, and a
//! 5% fall chance per snapshot. Gas and flame, which are real sensors on the
//! hub, are modelled here as a noisy baseline with occasional spikes and a
//! rare flame event.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};

use crate::models::{HubStatus, Posture, SensorReading};
use crate::state::AppState;

/// Gas reading above which the hub lights its red lamp
pub const GAS_ALARM_LEVEL: f64 = 2000.0;

/// Full scale of the ESP32's 12-bit ADC
const ADC_MAX: f64 = 4095.0;

const FALL_PROBABILITY: f64 = 0.05;
const FLAME_PROBABILITY: f64 = 0.01;
const GAS_SPIKE_PROBABILITY: f64 = 0.03;
const GAS_NOISE_STD_DEV: f64 = 60.0;

/// Status the firmware reports for a snapshot
pub fn hub_status(flame_detected: bool, fall_detected: bool) -> HubStatus {
    if flame_detected || fall_detected {
        HubStatus::Emergency
    } else {
        HubStatus::Normal
    }
}

/// State of the hub's red/green indicator lamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorLamp {
    Green,
    Red,
}

impl IndicatorLamp {
    pub fn for_reading(reading: &SensorReading) -> Self {
        let gas_alarm = reading.gas_level.is_some_and(|g| g > GAS_ALARM_LEVEL);
        if reading.is_emergency() || gas_alarm {
            IndicatorLamp::Red
        } else {
            IndicatorLamp::Green
        }
    }
}

/// Manual trigger sent by a viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubCommand {
    Emergency,
    Sos,
}

impl HubCommand {
    /// Match a text frame. `emergency` takes precedence over `sos`.
    pub fn parse(text: &str) -> Option<Self> {
        if text.contains("emergency") {
            Some(HubCommand::Emergency)
        } else if text.contains("sos") {
            Some(HubCommand::Sos)
        } else {
            None
        }
    }

    /// Reply sent to the viewer that issued the command
    pub fn ack(self) -> Value {
        match self {
            HubCommand::Emergency => json!({ "action": "emergency_activated" }),
            HubCommand::Sos => json!({ "action": "sos_activated" }),
        }
    }

    /// Notice pushed to viewers once the trigger has fired
    pub fn broadcast(self) -> Value {
        match self {
            HubCommand::Emergency => json!({ "alert": "EMERGENCY_MANUAL_TRIGGER" }),
            HubCommand::Sos => json!({ "alert": "SOS_SIGNAL_SENT" }),
        }
    }
}

/// Simulated sensor hub that feeds snapshots into the engine
pub struct SensorHubSimulator {
    /// Interval between snapshots in milliseconds
    interval_ms: u64,
    /// Clean-air MQ-2 reading
    base_gas: f64,
    rng: StdRng,
}

impl SensorHubSimulator {
    pub fn new(interval_ms: u64) -> Self {
        Self::with_rng(interval_ms, StdRng::from_entropy())
    }

    pub fn with_rng(interval_ms: u64, rng: StdRng) -> Self {
        info!(interval_ms = interval_ms, "Initializing simulated sensor hub");

        Self {
            interval_ms,
            base_gas: 400.0,
            rng,
        }
    }

    /// Produce one firmware-shaped snapshot
    pub fn next_reading(&mut self, uptime_secs: u64, clients: u32) -> SensorReading {
        let heart_rate = 70.0 + f64::from(self.rng.gen_range(-10i32..15));
        let temperature = 25.0 + f64::from(self.rng.gen_range(-10i32..10)) / 10.0;
        let posture = Posture::from_code(self.rng.gen_range(0..3));
        let fall_detected = self.rng.gen_bool(FALL_PROBABILITY);
        let flame_detected = self.rng.gen_bool(FLAME_PROBABILITY);

        let noise: f64 = self.rng.sample(StandardNormal);
        let spike = if self.rng.gen_bool(GAS_SPIKE_PROBABILITY) {
            self.rng.gen_range(800.0..2500.0)
        } else {
            0.0
        };
        let gas_level = (self.base_gas + noise * GAS_NOISE_STD_DEV + spike)
            .clamp(0.0, ADC_MAX)
            .round();

        SensorReading {
            heart_rate: Some(heart_rate),
            temperature: Some(temperature),
            gas_level: Some(gas_level),
            posture,
            fall_detected,
            flame_detected,
            status: Some(hub_status(flame_detected, fall_detected)),
            timestamp: Some(uptime_secs),
            clients: Some(clients),
            ..SensorReading::default()
        }
    }

    /// Run the simulated hub continuously
    ///
    /// Like the firmware, a tick with no connected viewers produces nothing.
    pub async fn run(mut self, state: Arc<RwLock<AppState>>) {
        info!("Starting simulated sensor hub loop");

        let started = Instant::now();
        let mut tick_interval = interval(Duration::from_millis(self.interval_ms));

        loop {
            tick_interval.tick().await;

            let clients = state.read().await.client_count() as u32;
            if clients == 0 {
                continue;
            }

            let reading = self.next_reading(started.elapsed().as_secs(), clients);
            let lamp = IndicatorLamp::for_reading(&reading);

            debug!(
                heart_rate = ?reading.heart_rate,
                temperature = ?reading.temperature,
                gas_level = ?reading.gas_level,
                posture = ?reading.posture,
                lamp = ?lamp,
                "Generated hub snapshot"
            );

            if lamp == IndicatorLamp::Red {
                warn!(
                    fall = reading.fall_detected,
                    flame = reading.flame_detected,
                    gas_level = ?reading.gas_level,
                    "Hub indicator lamp red"
                );
            }

            let mut app_state = state.write().await;
            app_state.ingest(reading);
        }
    }
}
