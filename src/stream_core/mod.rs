pub mod backoff;
pub mod connector;

pub use backoff::ExponentialBackoff;
pub use connector::{run_with_reconnect, ChannelSink, ClientError, EventSink, MAX_RECONNECT_ATTEMPTS};
