#[cfg(test)]
mod tests;

pub mod config;
pub mod reconciler;
pub mod state;
pub mod stream_core;
pub mod ui;

use {
    config::Config,
    state::{State, StateMessage},
    std::sync::Arc,
    stream_core::connector::{self, ChannelSink},
    tokio::sync::{mpsc, RwLock},
};

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env()?;

    // Write logs to stderr (the UI owns stdout once it enters the
    // alternate screen)
    let mut builder = if config.rust_log.is_some() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
    } else {
        env_logger::Builder::from_default_env()
    };
    builder.target(env_logger::Target::Stderr).init();

    // NOTE: Workaround for rustls issue
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .expect("Can't set crypto provider to aws_lc_rs");

    log::info!("🚀 Starting FraudFlow...");
    log::info!("📊 Configuration:");
    log::info!("   WS_URL: {}", config.ws_url);

    // Bounded channel between the connector and the reconciler task
    let (tx, rx) = mpsc::channel::<StateMessage>(1000);

    let state = Arc::new(RwLock::new(State::new()));

    // Spawn the reconciler task: the only writer of shared state
    let state_clone = state.clone();
    tokio::spawn(async move {
        state::state_reconciler_task(rx, state_clone).await;
    });

    // Spawn UI task
    let state_for_ui = state.clone();
    let mut ui_handle = tokio::spawn(async move {
        if let Err(e) = ui::run_ui(state_for_ui).await {
            log::error!("UI error: {}", e);
        }
    });

    log::info!("🔌 Connecting to prediction feed: {}", config.ws_url);
    let stream_config = config.clone();
    let mut stream_handle = tokio::spawn(async move {
        let mut sink = ChannelSink::new(tx);
        connector::run_with_reconnect(&stream_config, &mut sink).await
    });

    tokio::select! {
        _ = &mut ui_handle => {
            log::info!("UI exited");
        }
        result = &mut stream_handle => {
            match result {
                Ok(Ok(())) => log::info!("✅ Stream finished"),
                Ok(Err(e)) => log::error!("❌ Stream error: {}", e),
                Err(e) => log::error!("Stream task failed: {}", e),
            }
            // The dashboard stays up with the terminal connection status
            // visible until the user quits
            let _ = (&mut ui_handle).await;
        }
    }

    Ok(())
}
