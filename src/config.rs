use std::env;

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub ws_url: String,
    pub rust_log: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVariable(String),
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingVariable(var) => write!(f, "Missing environment variable: {}", var),
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables
    ///
    /// WS_URL points at the prediction feed endpoint
    /// (e.g. ws://localhost:8000/ws/fraud_detection/).
    pub fn from_env() -> Result<Self, ConfigError> {
        let ws_url =
            env::var("WS_URL").map_err(|_| ConfigError::MissingVariable("WS_URL".to_string()))?;

        validate_ws_url(&ws_url)?;

        let rust_log = env::var("RUST_LOG").ok();

        Ok(Self { ws_url, rust_log })
    }
}

fn validate_ws_url(url: &str) -> Result<(), ConfigError> {
    if !url.starts_with("ws://") && !url.starts_with("wss://") {
        return Err(ConfigError::InvalidValue(
            "WS_URL must start with ws:// or wss://".to_string(),
        ));
    }
    Ok(())
}
