use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug)]
pub struct ExponentialBackoff {
    initial_delay: u64,
    max_delay: u64,
    max_retries: u32,
    current_attempt: u32,
}

#[derive(Debug)]
pub struct MaxRetriesExceeded;

impl std::fmt::Display for MaxRetriesExceeded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Maximum retry attempts exceeded")
    }
}

impl std::error::Error for MaxRetriesExceeded {}

impl ExponentialBackoff {
    pub fn new(initial: u64, max: u64, retries: u32) -> Self {
        Self {
            initial_delay: initial,
            max_delay: max,
            max_retries: retries,
            current_attempt: 0,
        }
    }

    /// Delay the next retry would wait, in seconds.
    ///
    /// Pure so tests can assert the exact schedule without timers.
    pub fn delay_secs(&self) -> u64 {
        std::cmp::min(
            self.initial_delay * 2_u64.pow(self.current_attempt),
            self.max_delay,
        )
    }

    pub fn exhausted(&self) -> bool {
        self.current_attempt >= self.max_retries
    }

    pub fn record_attempt(&mut self) {
        self.current_attempt += 1;
    }

    pub async fn sleep(&mut self) -> Result<(), MaxRetriesExceeded> {
        if self.exhausted() {
            return Err(MaxRetriesExceeded);
        }

        let delay = self.delay_secs();

        log::warn!(
            "⏳ Retry attempt {} of {} in {}s",
            self.current_attempt + 1,
            self.max_retries,
            delay
        );

        sleep(Duration::from_secs(delay)).await;
        self.record_attempt();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.current_attempt = 0;
    }
}
