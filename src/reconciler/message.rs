//! Inbound frame normalization from feed JSON to canonical event records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One financial event as carried on the wire.
///
/// Every field is optional: the feed omits fields freely and an absent value
/// must degrade to an "unknown" display, never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    /// Seconds since an arbitrary epoch, relative ordering only
    #[serde(rename = "Time", skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(rename = "Amount", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Ground-truth label when the feed carries one (0/1)
    #[serde(rename = "Class", skip_serializing_if = "Option::is_none")]
    pub class: Option<u8>,
    /// Opaque model features (V1..V28), kept as raw JSON values
    #[serde(flatten)]
    pub features: BTreeMap<String, serde_json::Value>,
}

impl Transaction {
    /// Numeric value of a feature field, None if absent or non-numeric
    pub fn feature(&self, name: &str) -> Option<f64> {
        self.features.get(name).and_then(|v| v.as_f64())
    }
}

/// Per-model binary votes for the transaction at the same log position
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logistic: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub random_forest: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xgboost: Option<u8>,
    /// Continuous ensemble score, display only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraud_score: Option<f64>,
}

/// Top-level decode target for one feed frame.
///
/// The feed interleaves several message shapes on one connection; this
/// struct accepts any of them and `Inbound::parse` dispatches afterwards.
#[derive(Debug, Deserialize)]
struct RawEnvelope {
    message: Option<String>,
    error: Option<String>,
    predictions: Option<Prediction>,
    prediction: Option<Prediction>,
    transaction: Option<Transaction>,
}

/// A normalized inbound message
#[derive(Debug, Clone)]
pub enum Inbound {
    /// Shape 1: prediction and transaction delivered together
    Paired {
        prediction: Prediction,
        transaction: Transaction,
    },
    /// Shape 2: prediction always present, transaction sometimes missing
    Single {
        prediction: Prediction,
        transaction: Option<Transaction>,
    },
    /// Status/greeting frame, acknowledged and dropped
    Status(String),
    /// Server-side scoring failure report, logged and dropped
    Error(String),
    /// Undecodable or unknown shape, dropped without error
    Unrecognized,
}

impl Inbound {
    /// Normalize one raw text frame.
    ///
    /// Dispatch order matters: the paired shape is tried first, then the
    /// single-prediction shape, then status/error frames. Anything else is
    /// `Unrecognized` and must not fault the caller.
    pub fn parse(raw: &str) -> Inbound {
        let envelope: RawEnvelope = match serde_json::from_str(raw) {
            Ok(envelope) => envelope,
            Err(_) => return Inbound::Unrecognized,
        };

        match envelope {
            RawEnvelope {
                predictions: Some(prediction),
                transaction: Some(transaction),
                ..
            } => Inbound::Paired {
                prediction,
                transaction,
            },
            RawEnvelope {
                prediction: Some(prediction),
                transaction,
                ..
            } => Inbound::Single {
                prediction,
                transaction,
            },
            RawEnvelope {
                message: Some(message),
                ..
            } => Inbound::Status(message),
            RawEnvelope { error: Some(e), .. } => Inbound::Error(e),
            _ => Inbound::Unrecognized,
        }
    }
}
