//! Integration tests for the connector → reconciler flow.
//!
//! Covers the channel hand-off between the two halves of the core, a
//! loopback WebSocket feed end to end, and the terminal retry-exhaustion
//! path (under a paused clock, so no real backoff waiting).

use fraudflow::config::Config;
use fraudflow::state::{state_reconciler_task, ConnectionState, State, StateMessage};
use fraudflow::stream_core::connector::{run_with_reconnect, ChannelSink, ClientError};
use futures_util::SinkExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, RwLock};
use tokio::time::timeout;
use tokio_tungstenite::{accept_async, tungstenite::Message};

#[tokio::test]
async fn test_reconciler_task_applies_frames_in_order() {
    let (tx, rx) = mpsc::channel::<StateMessage>(100);
    let state = Arc::new(RwLock::new(State::new()));
    let task = tokio::spawn(state_reconciler_task(rx, state.clone()));

    tx.send(StateMessage::Status(ConnectionState::Connected))
        .await
        .unwrap();
    for frame in [
        r#"{"message":"Connected to WebSocket"}"#,
        r#"{"predictions":{"xgboost":1},"transaction":{"Amount":50}}"#,
        r#"{"prediction":{"logistic":0},"transaction":{"Amount":200}}"#,
        "garbage that is not json",
    ] {
        tx.send(StateMessage::Frame(frame.to_string()))
            .await
            .unwrap();
    }
    tx.send(StateMessage::Shutdown).await.unwrap();
    task.await.unwrap();

    let state = state.read().await;
    assert_eq!(state.connection(), ConnectionState::Connected);
    assert_eq!(state.transaction_count(), 2);
    assert_eq!(state.prediction_count(), 2);
    let stats = state.stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.flagged, 1);
    // 50 * 10 (paired) + 200 (single)
    assert_eq!(stats.recent_volume, 700.0);
}

#[tokio::test]
async fn test_connector_delivers_frames_and_reports_status() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        ws.send(Message::Text(
            r#"{"message":"Connected to WebSocket"}"#.to_string(),
        ))
        .await
        .unwrap();
        ws.send(Message::Text(
            r#"{"predictions":{"xgboost":1},"transaction":{"Amount":50}}"#.to_string(),
        ))
        .await
        .unwrap();
        ws.close(None).await.unwrap();
    });

    let config = Config {
        ws_url: format!("ws://{}/ws/fraud_detection/", addr),
        rust_log: None,
    };
    let (tx, mut rx) = mpsc::channel::<StateMessage>(100);
    let connector = tokio::spawn(async move {
        let mut sink = ChannelSink::new(tx);
        run_with_reconnect(&config, &mut sink).await
    });

    let mut received = Vec::new();
    for _ in 0..5 {
        let message = timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for connector hand-off")
            .expect("channel closed early");
        received.push(message);
    }

    assert!(matches!(
        received[0],
        StateMessage::Status(ConnectionState::Connecting)
    ));
    assert!(matches!(
        received[1],
        StateMessage::Status(ConnectionState::Connected)
    ));
    assert!(matches!(&received[2], StateMessage::Frame(f) if f.contains("Connected to WebSocket")));
    assert!(matches!(&received[3], StateMessage::Frame(f) if f.contains("predictions")));
    assert!(matches!(
        received[4],
        StateMessage::Status(ConnectionState::Disconnected)
    ));

    // dropping the receiver ends the retry loop at its next hand-off
    drop(rx);
    let result = timeout(Duration::from_secs(5), connector)
        .await
        .expect("connector did not stop")
        .unwrap();
    assert!(result.is_ok());
    server.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_retry_exhaustion_is_terminal() {
    // bind then drop so the port refuses connections
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = Config {
        ws_url: format!("ws://{}/ws/fraud_detection/", addr),
        rust_log: None,
    };
    let (tx, mut rx) = mpsc::channel::<StateMessage>(200);

    let mut sink = ChannelSink::new(tx);
    let result = run_with_reconnect(&config, &mut sink).await;
    assert!(matches!(result, Err(ClientError::MaxRetries)));

    let mut dials = 0;
    let mut last = None;
    while let Ok(message) = rx.try_recv() {
        if matches!(message, StateMessage::Status(ConnectionState::Connecting)) {
            dials += 1;
        }
        last = Some(message);
    }

    // the initial dial plus five retries, then nothing further is scheduled
    assert_eq!(dials, 6);
    assert!(matches!(
        last,
        Some(StateMessage::Status(ConnectionState::Disconnected))
    ));
}
