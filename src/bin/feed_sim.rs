//! Local WebSocket feed that simulates the fraud-prediction backend.
//!
//! Emits a greeting on accept, then a scored random transaction every two
//! seconds. A client may also submit `{"transaction": {...}}` and receives
//! the scored result (or an `{"error": ...}` frame) in return. Lets the
//! dashboard run end-to-end with no external service:
//!
//! ```text
//! FEED_ADDR=127.0.0.1:8765 cargo run --bin feed_sim
//! WS_URL=ws://127.0.0.1:8765/ws/fraud_detection/ cargo run
//! ```

use fraudflow::reconciler::{Prediction, Transaction};
use futures_util::{SinkExt, StreamExt};
use rand::Rng;
use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{accept_async, tungstenite::Message};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let addr = std::env::var("FEED_ADDR").unwrap_or_else(|_| "127.0.0.1:8765".to_string());
    let listener = TcpListener::bind(&addr).await?;
    log::info!("🚀 Feed simulator listening on ws://{}", addr);

    loop {
        let (stream, peer) = listener.accept().await?;
        log::info!("🔗 Client connected: {}", peer);
        tokio::spawn(async move {
            if let Err(e) = serve_client(stream).await {
                log::warn!("Client session ended: {}", e);
            }
        });
    }
}

async fn serve_client(
    stream: TcpStream,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let ws = accept_async(stream).await?;
    let (mut write, mut read) = ws.split();

    write
        .send(Message::Text(
            json!({"message": "Connected to WebSocket"}).to_string(),
        ))
        .await?;

    let mut ticker = tokio::time::interval(Duration::from_secs(2));
    let mut counter: u64 = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let transaction = generate_random_transaction();
                let result = score_transaction(&transaction);

                if counter % 5 == 0 {
                    log::info!("Sending prediction {}", counter);
                }

                write.send(Message::Text(result.to_string())).await?;
                counter += 1;
            }
            incoming = read.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(reply) = handle_client_frame(&text) {
                            write.send(Message::Text(reply.to_string())).await?;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => return Ok(()),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                }
            }
        }
    }
}

/// Score a client-submitted transaction, mirroring the feed's own error
/// reporting for undecodable submissions
fn handle_client_frame(text: &str) -> Option<serde_json::Value> {
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => return Some(json!({"error": e.to_string()})),
    };

    let tx_value = value.get("transaction")?.clone();
    match serde_json::from_value::<Transaction>(tx_value) {
        Ok(transaction) => Some(score_transaction(&transaction)),
        Err(e) => Some(json!({"error": e.to_string()})),
    }
}

fn generate_random_transaction() -> Transaction {
    let mut rng = rand::thread_rng();

    let mut features = BTreeMap::new();
    for i in 1..=28 {
        features.insert(
            format!("V{}", i),
            json!(round6(rng.gen_range(-10.0..10.0))),
        );
    }

    let mut transaction = Transaction {
        transaction_id: Some(format!("tx-{}", rng.gen_range(10000..100000))),
        time: Some(rng.gen_range(0..172800) as f64),
        amount: Some(round2(rng.gen_range(1.0..5000.0))),
        class: None,
        features,
    };

    // roughly one in ten transactions is shaped to look fraudulent
    if rng.gen_bool(0.1) {
        transaction
            .features
            .insert("V1".to_string(), json!(round6(rng.gen_range(-20.0..-5.0))));
        transaction
            .features
            .insert("V3".to_string(), json!(round6(rng.gen_range(-15.0..-2.0))));
        transaction.amount = Some(round2(rng.gen_range(500.0..5000.0)));
    }

    transaction
}

/// Build the paired frame for a transaction: deterministic feature part of
/// the score plus a random component, thresholded into the three votes
fn score_transaction(transaction: &Transaction) -> serde_json::Value {
    let mut rng = rand::thread_rng();
    let fraud_score = base_fraud_score(transaction) + rng.gen_range(0.0..0.3);

    let prediction = Prediction {
        logistic: Some(u8::from(fraud_score > 0.5)),
        random_forest: Some(u8::from(fraud_score > 0.6)),
        xgboost: Some(u8::from(fraud_score > 0.7)),
        fraud_score: Some(round2(fraud_score).min(0.99)),
    };

    json!({
        "predictions": prediction,
        "transaction": transaction,
    })
}

/// Feature-driven part of the score, separated from the random component
fn base_fraud_score(transaction: &Transaction) -> f64 {
    let mut score = 0.0;
    if transaction.feature("V1").map_or(false, |v| v < -5.0) {
        score += 0.3;
    }
    if transaction.feature("V3").map_or(false, |v| v < -5.0) {
        score += 0.2;
    }
    if transaction.amount.map_or(false, |a| a > 1000.0) {
        score += 0.2;
    }
    score
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round6(x: f64) -> f64 {
    (x * 1_000_000.0).round() / 1_000_000.0
}
