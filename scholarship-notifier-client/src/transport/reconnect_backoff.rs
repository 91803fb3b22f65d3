use std::time::Duration;

///
/// Exponential backoff for reconnect attempts.
///
/// Delays start at `initial_delay`, double on every attempt and are
/// capped at `max_delay`. After `max_attempts` attempts [`Self::next_delay`]
/// returns [`None`] and the caller is expected to give up.
///
pub struct ReconnectBackoff {
    initial_delay: Duration,
    max_delay: Duration,
    max_attempts: u32,
    attempts: u32,
}

impl ReconnectBackoff {
    pub fn new(initial_delay: Duration, max_delay: Duration, max_attempts: u32) -> Self {
        Self {
            initial_delay,
            max_delay,
            max_attempts,
            attempts: 0,
        }
    }

    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempts >= self.max_attempts {
            return None;
        }

        let exponent = self.attempts.min(31);
        let delay = self
            .initial_delay
            .saturating_mul(1_u32 << exponent)
            .min(self.max_delay);
        self.attempts += 1;

        Some(delay)
    }

    /// Called after a successful connect so the next failure starts over.
    pub fn reset(&mut self) {
        self.attempts = 0;
    }
}
