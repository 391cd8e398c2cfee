//! Bounded retry policy.
//!
//! Generalises the firmware's "try time sync, retry once on failure"
//! special case into an explicit, configurable policy: a maximum attempt
//! count and a fixed backoff between attempts.

use log::warn;

use crate::ports::Delay;

/// Bounded retry with fixed backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first (minimum 1).
    pub max_attempts: u32,
    /// Delay between attempts in milliseconds (0 = immediate retry).
    pub backoff_ms: u32,
}

impl RetryPolicy {
    /// Run `op` until it succeeds or the attempt budget is spent.
    ///
    /// Returns the first success, or the error from the final attempt.
    pub fn run<T, E, F>(&self, delay: &impl Delay, what: &str, mut op: F) -> Result<T, E>
    where
        E: core::fmt::Display,
        F: FnMut() -> Result<T, E>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op() {
                Ok(v) => return Ok(v),
                Err(e) if attempt < attempts => {
                    warn!("{what}: attempt {attempt}/{attempts} failed ({e}), retrying");
                    if self.backoff_ms > 0 {
                        delay.delay_ms(self.backoff_ms);
                    }
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
