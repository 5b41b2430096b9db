//! Fraud classification from model votes

use super::message::{Prediction, Transaction};

/// Amount above which a transaction with no prediction is shown as fraud
const FALLBACK_AMOUNT_THRESHOLD: f64 = 1000.0;
/// V1 below this marks a transaction with no prediction as fraud
const FALLBACK_V1_THRESHOLD: f64 = -3.0;

/// The single source of truth for the fraud flag.
///
/// A single positive model vote is sufficient; there is no majority vote or
/// confidence weighting. An absent prediction is never fraud. Aggregate
/// counting, the alert panel, and table color coding all go through here.
pub fn is_flagged(prediction: Option<&Prediction>) -> bool {
    match prediction {
        Some(p) => {
            p.logistic == Some(1) || p.random_forest == Some(1) || p.xgboost == Some(1)
        }
        None => false,
    }
}

/// Broader fraud predicate for table/alert display only.
///
/// When a prediction exists at the log position, its verdict wins
/// unconditionally. The ground-truth label, a depressed V1, or an outsized
/// amount only apply when the prediction log is exhausted at that position.
/// Never used for aggregate counting.
pub fn is_fraud_display(transaction: &Transaction, prediction: Option<&Prediction>) -> bool {
    if prediction.is_some() {
        return is_flagged(prediction);
    }

    transaction.class == Some(1)
        || transaction
            .feature("V1")
            .map_or(false, |v| v < FALLBACK_V1_THRESHOLD)
        || transaction
            .amount
            .map_or(false, |a| a > FALLBACK_AMOUNT_THRESHOLD)
}
