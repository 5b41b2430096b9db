use crate::config::Config;
use crate::state::{ConnectionState, StateMessage};
use crate::stream_core::backoff::{ExponentialBackoff, MaxRetriesExceeded};
use async_trait::async_trait;
use futures_util::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};

/// Consecutive reconnect attempts before giving up permanently
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;
/// First retry delay in seconds; doubles per consecutive drop
const INITIAL_RETRY_SECS: u64 = 1;
/// Ceiling on a single retry delay in seconds
const MAX_RETRY_SECS: u64 = 16;

#[derive(Debug)]
pub enum ClientError {
    Connection(String),
    MaxRetries,
}

impl From<MaxRetriesExceeded> for ClientError {
    fn from(_: MaxRetriesExceeded) -> Self {
        ClientError::MaxRetries
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Connection(msg) => write!(f, "Connection error: {}", msg),
            ClientError::MaxRetries => write!(f, "Maximum retry attempts exceeded"),
        }
    }
}

impl std::error::Error for ClientError {}

/// Raised by a sink whose consumer has gone away; the connector treats it
/// as a graceful shutdown request
#[derive(Debug)]
pub struct SinkClosed;

/// Where the connector hands off received frames and status transitions.
///
/// The production sink forwards into the reconciler channel; tests collect
/// into a Vec instead.
#[async_trait]
pub trait EventSink: Send {
    async fn status(&mut self, connection: ConnectionState) -> Result<(), SinkClosed>;
    async fn deliver(&mut self, frame: String) -> Result<(), SinkClosed>;
}

/// Production sink forwarding into the reconciler's mpsc channel
pub struct ChannelSink {
    tx: tokio::sync::mpsc::Sender<StateMessage>,
}

impl ChannelSink {
    pub fn new(tx: tokio::sync::mpsc::Sender<StateMessage>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl EventSink for ChannelSink {
    async fn status(&mut self, connection: ConnectionState) -> Result<(), SinkClosed> {
        self.tx
            .send(StateMessage::Status(connection))
            .await
            .map_err(|_| SinkClosed)
    }

    async fn deliver(&mut self, frame: String) -> Result<(), SinkClosed> {
        self.tx
            .send(StateMessage::Frame(frame))
            .await
            .map_err(|_| SinkClosed)
    }
}

/// Maintain at most one live feed connection, reconnecting on drops.
///
/// Each loop iteration dials once. On success the retry counter resets, so
/// a later drop starts the 1s/2s/4s/8s/16s schedule from the top. Transport
/// errors and graceful closes funnel into the same single retry path, and
/// when the retry ceiling is reached the function resolves with
/// `ClientError::MaxRetries`, leaving the published state `Disconnected`.
/// A closed sink ends the loop gracefully (the session is shutting down).
pub async fn run_with_reconnect<S: EventSink>(
    config: &Config,
    sink: &mut S,
) -> Result<(), ClientError> {
    let mut backoff =
        ExponentialBackoff::new(INITIAL_RETRY_SECS, MAX_RETRY_SECS, MAX_RECONNECT_ATTEMPTS);

    loop {
        if sink.status(ConnectionState::Connecting).await.is_err() {
            return Ok(());
        }

        match connect_async(config.ws_url.as_str()).await {
            Ok((mut ws, _response)) => {
                log::info!("✅ Connected to feed: {}", config.ws_url);
                backoff.reset();
                if sink.status(ConnectionState::Connected).await.is_err() {
                    return Ok(());
                }

                while let Some(message) = ws.next().await {
                    match message {
                        Ok(Message::Text(text)) => {
                            if sink.deliver(text).await.is_err() {
                                return Ok(());
                            }
                        }
                        Ok(Message::Close(_)) => {
                            log::info!("Feed closed the connection");
                            break;
                        }
                        // ping/pong handled by tungstenite, binary not part
                        // of the feed protocol
                        Ok(_) => {}
                        Err(e) => {
                            log::warn!("⚠️ Transport error: {}", e);
                            break;
                        }
                    }
                }

                if sink.status(ConnectionState::Disconnected).await.is_err() {
                    return Ok(());
                }
                backoff.sleep().await?;
            }
            Err(e) => {
                if sink.status(ConnectionState::Disconnected).await.is_err() {
                    return Ok(());
                }
                // a malformed endpoint never becomes dialable
                if matches!(e, tokio_tungstenite::tungstenite::Error::Url(_)) {
                    return Err(ClientError::Connection(e.to_string()));
                }
                log::error!("❌ Connection failed: {}", e);
                backoff.sleep().await?;
            }
        }
    }
}
