//! Event Reconciler - Stream Normalization and Classification
//!
//! This module converts the heterogeneous frames arriving on the feed
//! connection into canonical event-log records and derives the fraud flag
//! for each one.
//!
//! # Architecture
//!
//! ```text
//! Raw text frame → Inbound::parse (shape dispatch)
//!     ↓
//! State::apply (append-only event log + aggregate statistics)
//!     ↓
//! classifier::is_flagged (single source of truth for the fraud flag)
//!     ↓
//! anomaly::anomaly_flags (statistical outlier marks for charting)
//! ```

pub mod anomaly;
pub mod classifier;
pub mod message;

pub use anomaly::anomaly_flags;
pub use classifier::{is_flagged, is_fraud_display};
pub use message::{Inbound, Prediction, Transaction};
