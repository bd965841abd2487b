//! Artificial thinking time before a reply.

use rand::Rng;
use std::time::Duration;

/// A pause of `base` plus a random extra below `jitter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PonderDelay {
    pub base: Duration,
    pub jitter: Duration,
}

impl PonderDelay {
    pub fn new(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    /// No pause at all.
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Pick the length of the next pause.
    pub fn sample(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.base;
        }
        self.base + Duration::from_millis(rand::rng().random_range(0..jitter_ms))
    }

    pub async fn wait(&self) {
        let pause = self.sample();
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }
}

impl Default for PonderDelay {
    fn default() -> Self {
        Self::new(Duration::from_millis(800), Duration::from_millis(400))
    }
}
