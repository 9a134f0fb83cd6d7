//! Websocket client for the daemon's live stats stream.
//!
//! Frames are JSON objects `{"event": <name>, "args": [...]}`. After
//! connecting the client authenticates (when a token is configured) and asks
//! the daemon to start sending `stats` events.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tokio_util::sync::CancellationToken;

use super::state::TelemetryState;
use crate::core::server::ServerStatus;
use crate::error::{Result, SrvmonError};

const INITIAL_BACKOFF_MS: u64 = 500;
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Events the daemon pushes to us
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    AuthSuccess,
    Stats,
    Status,
    TokenExpiring,
    TokenExpired,
    JwtError,
    DaemonError,
    Other(String),
}

impl SocketEvent {
    pub fn from_name(name: &str) -> Self {
        match name {
            "auth success" => SocketEvent::AuthSuccess,
            "stats" => SocketEvent::Stats,
            "status" => SocketEvent::Status,
            "token expiring" => SocketEvent::TokenExpiring,
            "token expired" => SocketEvent::TokenExpired,
            "jwt error" => SocketEvent::JwtError,
            "daemon error" => SocketEvent::DaemonError,
            other => SocketEvent::Other(other.to_string()),
        }
    }
}

/// Commands we send to the daemon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketRequest {
    Auth(String),
    SendStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SocketMessage {
    pub event: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl SocketMessage {
    pub fn decode(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn kind(&self) -> SocketEvent {
        SocketEvent::from_name(&self.event)
    }

    pub fn first_arg(&self) -> Option<&Value> {
        self.args.first()
    }
}

impl SocketRequest {
    pub fn encode(&self) -> String {
        let message = match self {
            SocketRequest::Auth(token) => SocketMessage {
                event: "auth".to_string(),
                args: vec![Value::String(token.clone())],
            },
            SocketRequest::SendStats => SocketMessage {
                event: "send stats".to_string(),
                args: vec![Value::Null],
            },
        };
        // Serializing a string and a Vec<Value> cannot fail
        serde_json::to_string(&message).unwrap_or_default()
    }

    fn to_message(&self) -> Message {
        Message::Text(self.encode().into())
    }
}

/// Delay before reconnect attempt `attempt` (0-based): 500ms doubling, capped
pub fn backoff_delay(attempt: u32) -> Duration {
    let factor = 1u64 << attempt.min(16);
    Duration::from_millis(INITIAL_BACKOFF_MS.saturating_mul(factor)).min(MAX_BACKOFF)
}

pub struct StatsChannel {
    url: String,
    token: Option<String>,
    state: Arc<TelemetryState>,
}

impl StatsChannel {
    pub fn new(url: impl Into<String>, token: Option<String>, state: Arc<TelemetryState>) -> Self {
        Self {
            url: url.into(),
            token,
            state,
        }
    }

    /// Keep a session open until `cancel` fires, reconnecting with backoff
    pub async fn run(self, cancel: CancellationToken) {
        let mut attempt: u32 = 0;

        loop {
            match self.session(&cancel).await {
                Ok(()) => {
                    if cancel.is_cancelled() {
                        break;
                    }
                    log::info!("Stats channel closed by daemon");
                    attempt = 0;
                }
                Err(e) => log::warn!("Stats channel error: {}", e),
            }

            let delay = backoff_delay(attempt);
            attempt = attempt.saturating_add(1);
            log::info!("Reconnecting to {} in {}ms", self.url, delay.as_millis());

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        log::debug!("Stats channel stopped");
    }

    async fn session(&self, cancel: &CancellationToken) -> Result<()> {
        let (ws, _) = tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            connected = connect_async(self.url.as_str()) => connected?,
        };
        log::info!("Connected to {}", self.url);

        let (mut sink, mut stream) = ws.split();

        let opening = match &self.token {
            Some(token) => SocketRequest::Auth(token.clone()),
            None => SocketRequest::SendStats,
        };
        sink.send(opening.to_message()).await?;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    let _ = sink.send(Message::Close(None)).await;
                    return Ok(());
                }
                frame = stream.next() => match frame {
                    None | Some(Ok(Message::Close(_))) => return Ok(()),
                    Some(Err(e)) => return Err(SrvmonError::from(e)),
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = self.handle_frame(text.as_str()) {
                            sink.send(reply.to_message()).await?;
                        }
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    /// Apply one inbound frame; returns a command to send back, if any
    pub fn handle_frame(&self, text: &str) -> Option<SocketRequest> {
        let message = match SocketMessage::decode(text) {
            Ok(message) => message,
            Err(e) => {
                log::debug!("Dropping undecodable frame: {}", e);
                return None;
            }
        };

        match message.kind() {
            SocketEvent::AuthSuccess => return Some(SocketRequest::SendStats),
            SocketEvent::Stats => match message.first_arg() {
                Some(Value::String(raw)) => {
                    self.state.apply_inbound(raw.as_bytes());
                }
                Some(value @ Value::Object(_)) => {
                    if let Ok(raw) = serde_json::to_vec(value) {
                        self.state.apply_inbound(&raw);
                    }
                }
                _ => log::debug!("Stats event without payload"),
            },
            SocketEvent::Status => {
                match message
                    .first_arg()
                    .and_then(Value::as_str)
                    .map(str::parse::<ServerStatus>)
                {
                    Some(Ok(status)) => self.state.set_status(Some(status)),
                    Some(Err(e)) => log::debug!("Ignoring status event: {}", e),
                    None => log::debug!("Status event without payload"),
                }
            }
            SocketEvent::TokenExpiring => log::warn!("Daemon token is about to expire"),
            SocketEvent::TokenExpired => log::warn!("Daemon token expired"),
            SocketEvent::JwtError => log::warn!("Daemon rejected the token: {:?}", message.args),
            SocketEvent::DaemonError => log::warn!("Daemon error: {:?}", message.args),
            SocketEvent::Other(name) => log::trace!("Ignoring '{}' event", name),
        }

        None
    }
}
