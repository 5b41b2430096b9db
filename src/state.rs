use crate::reconciler::{classifier, Inbound, Prediction, Transaction};

/// Scaling constant applied to paired-shape amounts for the display unit.
/// Bare-prediction frames contribute the raw amount instead; the asymmetry
/// is observed feed behavior and is kept as-is.
pub const PAIRED_VOLUME_SCALE: f64 = 10.0;

/// Connection status as owned by the stream connector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "CONNECTING",
            ConnectionState::Connected => "CONNECTED",
            ConnectionState::Disconnected => "DISCONNECTED",
        }
    }
}

/// Message sent through the channel from the connector to the reconciler task
#[derive(Debug, Clone)]
pub enum StateMessage {
    /// One raw text frame, undecoded beyond the transport layer
    Frame(String),
    Status(ConnectionState),
    Shutdown,
}

/// Running aggregate statistics, updated incrementally per accepted event
#[derive(Debug, Clone, Copy, Default)]
pub struct Stats {
    pub total: u64,
    pub flagged: u64,
    pub recent_volume: f64,
}

/// In-memory session state: the append-only event log plus aggregates.
///
/// Transactions and predictions are kept as two parallel logs. A paired
/// frame appends to both; a bare prediction appends only to the prediction
/// log, so the logs may diverge. Readers pair records by index and treat a
/// missing side as unknown.
pub struct State {
    transactions: Vec<Transaction>,
    predictions: Vec<Prediction>,
    stats: Stats,
    connection: ConnectionState,
}

impl State {
    pub fn new() -> Self {
        Self {
            transactions: Vec::new(),
            predictions: Vec::new(),
            stats: Stats::default(),
            connection: ConnectionState::Connecting,
        }
    }

    /// Fold one normalized message into the log and aggregates.
    ///
    /// Status, error, and unrecognized frames change nothing. Statistics
    /// move only when a transaction is accepted, and an absent amount
    /// contributes zero volume.
    pub fn apply(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::Paired {
                prediction,
                transaction,
            } => {
                let flagged = classifier::is_flagged(Some(&prediction));
                let weighted = transaction.amount.unwrap_or(0.0) * PAIRED_VOLUME_SCALE;
                self.predictions.push(prediction);
                self.transactions.push(transaction);
                self.record_accepted(flagged, weighted);
            }
            Inbound::Single {
                prediction,
                transaction,
            } => {
                let flagged = classifier::is_flagged(Some(&prediction));
                self.predictions.push(prediction);
                if let Some(transaction) = transaction {
                    let weighted = transaction.amount.unwrap_or(0.0);
                    self.transactions.push(transaction);
                    self.record_accepted(flagged, weighted);
                }
            }
            Inbound::Status(_) | Inbound::Error(_) | Inbound::Unrecognized => {}
        }
    }

    fn record_accepted(&mut self, flagged: bool, weighted_amount: f64) {
        self.stats.total += 1;
        if flagged {
            self.stats.flagged += 1;
        }
        self.stats.recent_volume += weighted_amount;
    }

    pub fn set_connection(&mut self, connection: ConnectionState) {
        self.connection = connection;
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// The (transaction, prediction) pair at a log position; either side may
    /// be missing when the logs have diverged
    pub fn event_at(&self, index: usize) -> Option<(Option<&Transaction>, Option<&Prediction>)> {
        if index >= self.event_count() {
            return None;
        }
        Some((self.transactions.get(index), self.predictions.get(index)))
    }

    /// Number of log positions (the longer of the two logs)
    pub fn event_count(&self) -> usize {
        self.transactions.len().max(self.predictions.len())
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn prediction_count(&self) -> usize {
        self.predictions.len()
    }

    /// Amounts in log order, None where absent, for outlier flagging
    pub fn amounts(&self) -> Vec<Option<f64>> {
        self.transactions.iter().map(|t| t.amount).collect()
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

/// Background task that drains the connector channel and reconciles frames
/// into shared state.
///
/// This is the only writer of `State`; one message is fully applied before
/// the next is received, so readers never observe a partial update.
pub async fn state_reconciler_task(
    mut receiver: tokio::sync::mpsc::Receiver<StateMessage>,
    state: std::sync::Arc<tokio::sync::RwLock<State>>,
) {
    log::info!("State reconciler task started");

    while let Some(message) = receiver.recv().await {
        match message {
            StateMessage::Frame(raw) => {
                let inbound = Inbound::parse(&raw);
                match &inbound {
                    Inbound::Status(message) => {
                        log::debug!("Status frame acknowledged: {}", message)
                    }
                    Inbound::Error(error) => log::warn!("Feed reported an error: {}", error),
                    Inbound::Unrecognized => {
                        log::debug!("Dropping unrecognized frame: {:.120}", raw)
                    }
                    _ => {}
                }
                let mut state = state.write().await;
                state.apply(inbound);
            }
            StateMessage::Status(connection) => {
                let mut state = state.write().await;
                state.set_connection(connection);
            }
            StateMessage::Shutdown => {
                log::info!("State reconciler received shutdown signal");
                break;
            }
        }
    }

    log::info!("State reconciler task stopped");
}
