//! Bounded reconnect policy with increasing backoff

use std::time::Duration;

pub const MAX_ATTEMPTS: u32 = 5;
pub const BASE_DELAY: Duration = Duration::from_secs(1);
pub const MAX_DELAY: Duration = Duration::from_secs(5);

/// Tracks reconnect attempts after a transport failure.
///
/// The delay grows linearly with the attempt number up to `MAX_DELAY`;
/// after `MAX_ATTEMPTS` failures the session requires a manual reload.
#[derive(Debug, Default)]
pub struct ReconnectPolicy {
    attempts: u32,
}

impl ReconnectPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay before the next attempt, or `None` once the budget is spent
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempts >= MAX_ATTEMPTS {
            return None;
        }
        self.attempts += 1;
        Some((BASE_DELAY * self.attempts).min(MAX_DELAY))
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// A successful connection resets the budget
    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}
