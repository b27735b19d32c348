//! WebSocket module for real-time analysis streaming
//!
//! Pushes every new analysis to connected viewers and accepts the hub's manual
//! trigger commands (`emergency`, `sos`) as plain text frames. A trigger is
//! acknowledged to its sender and its alert is relayed to every session.

use actix::{Actor, ActorContext, ActorFutureExt, AsyncContext, StreamHandler};
use actix_web_actors::ws;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::hub::HubCommand;
use crate::models::WsMessage;
use crate::state::AppState;

/// How often heartbeat pings are sent
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// How long before lack of client response causes a timeout
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// How often the session checks for a fresh analysis
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// What a session has already pushed to its client
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivered {
    /// Sequence of the last analysis sent
    analysis: Option<u64>,
    /// Running count of the last manual trigger sent
    trigger: u64,
}

impl Delivered {
    /// Cursor for a session that joins after `seen_triggers` triggers
    pub fn new(seen_triggers: u64) -> Self {
        Self {
            analysis: None,
            trigger: seen_triggers,
        }
    }

    /// Frames the client has not seen yet, and the cursor after sending them
    pub fn collect(self, state: &AppState) -> (Self, Vec<String>) {
        let mut next = self;
        let mut frames = Vec::new();

        for (count, command) in state.triggers_since(self.trigger) {
            frames.push(command.broadcast().to_string());
            next.trigger = count;
        }

        if let Some((sequence, reading, analysis)) = state.latest_update() {
            if self.analysis != Some(sequence) {
                let update = WsMessage::AnalysisUpdate { reading, analysis };
                if let Ok(json) = serde_json::to_string(&update) {
                    frames.push(json);
                }
                next.analysis = Some(sequence);
            }
        }

        (next, frames)
    }
}

/// WebSocket session actor
pub struct WsSession {
    client_id: String,
    last_heartbeat: Instant,
    state: Arc<RwLock<AppState>>,
    delivered: Delivered,
}

impl WsSession {
    pub fn new(client_id: String, state: Arc<RwLock<AppState>>, seen_triggers: u64) -> Self {
        Self {
            client_id,
            last_heartbeat: Instant::now(),
            state,
            delivered: Delivered::new(seen_triggers),
        }
    }

    fn send(ctx: &mut ws::WebsocketContext<Self>, msg: &WsMessage) {
        if let Ok(json) = serde_json::to_string(msg) {
            ctx.text(json);
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    client_id = %act.client_id,
                    "WebSocket heartbeat timeout"
                );
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }

    /// Push new analyses and manual triggers from the shared state
    fn start_polling(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(POLL_INTERVAL, |act, ctx| {
            let state = act.state.clone();
            let delivered = act.delivered;

            let fut = async move {
                let state = state.read().await;
                delivered.collect(&state)
            };

            let fut = actix::fut::wrap_future::<_, Self>(fut);

            ctx.spawn(fut.map(|(delivered, frames), act, ctx| {
                act.delivered = delivered;
                for frame in frames {
                    ctx.text(frame);
                }
            }));
        });
    }

    /// Acknowledge to the sender; the alert reaches every session via polling
    fn handle_command(&self, command: HubCommand, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.text(command.ack().to_string());

        let state = self.state.clone();
        let client_id = self.client_id.clone();

        actix_rt::spawn(async move {
            let mut state = state.write().await;
            state.record_command(&client_id, command);
        });
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(client_id = %self.client_id, "WebSocket connected");

        self.start_heartbeat(ctx);
        self.start_polling(ctx);

        Self::send(
            ctx,
            &WsMessage::Connected {
                client_id: self.client_id.clone(),
            },
        );
    }

    fn stopped(&mut self, _: &mut Self::Context) {
        info!(client_id = %self.client_id, "WebSocket disconnected");

        let state = self.state.clone();
        let client_id = self.client_id.clone();

        // Actix runtime spawn (not Tokio)
        actix_rt::spawn(async move {
            let mut state = state.write().await;
            state.remove_client(&client_id);
        });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                debug!(client_id = %self.client_id, message = %text);

                if let Some(command) = HubCommand::parse(&text) {
                    self.handle_command(command, ctx);
                    return;
                }

                match serde_json::from_str::<WsMessage>(&text) {
                    Ok(WsMessage::Ping) => {
                        self.last_heartbeat = Instant::now();
                        Self::send(ctx, &WsMessage::Pong);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(client_id = %self.client_id, error = %e);
                        Self::send(
                            ctx,
                            &WsMessage::Error {
                                message: "Invalid message format".into(),
                            },
                        );
                    }
                }
            }
            Ok(ws::Message::Close(reason)) => {
                info!(client_id = %self.client_id, reason = ?reason);
                ctx.stop();
            }
            Err(e) => {
                warn!(client_id = %self.client_id, error = %e);
                ctx.stop();
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::HealthAnalysisEngine;
    use crate::models::{Posture, SensorReading};
    use serde_json::Value;

    fn state() -> AppState {
        AppState::new(HealthAnalysisEngine::seeded(4))
    }

    fn parse(frames: &[String]) -> Vec<Value> {
        frames
            .iter()
            .map(|f| serde_json::from_str(f).unwrap())
            .collect()
    }

    #[test]
    fn test_trigger_reaches_every_session() {
        let mut state = state();
        let sender = Delivered::new(state.manual_triggers());
        let viewer = Delivered::new(state.manual_triggers());

        state.record_command("sender", HubCommand::Sos);

        let (_, sender_frames) = sender.collect(&state);
        let (_, viewer_frames) = viewer.collect(&state);

        for frames in [sender_frames, viewer_frames] {
            assert_eq!(parse(&frames), vec![HubCommand::Sos.broadcast()]);
        }
    }

    #[test]
    fn test_frames_are_sent_once() {
        let mut state = state();
        let viewer = Delivered::new(0);

        state.record_command("sender", HubCommand::Emergency);
        state.ingest(SensorReading::new(72.0, 36.6, 300.0, Posture::Good));

        let (viewer, frames) = viewer.collect(&state);
        let frames = parse(&frames);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0]["alert"], "EMERGENCY_MANUAL_TRIGGER");
        assert_eq!(frames[1]["type"], "AnalysisUpdate");

        let (_, frames) = viewer.collect(&state);
        assert!(frames.is_empty());
    }

    #[test]
    fn test_late_joiner_skips_earlier_triggers() {
        let mut state = state();
        state.record_command("sender", HubCommand::Emergency);

        let late = Delivered::new(state.manual_triggers());
        let (_, frames) = late.collect(&state);
        assert!(frames.is_empty());

        state.record_command("sender", HubCommand::Sos);
        let (_, frames) = late.collect(&state);
        assert_eq!(parse(&frames), vec![HubCommand::Sos.broadcast()]);
    }
}
