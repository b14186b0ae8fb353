//! Production Environment implementation using system time and RNG.

use std::time::{SystemTime, UNIX_EPOCH};

use banter_client::Environment;
use rand::RngCore;

/// Production environment: real monotonic clock, real wall clock, OS-seeded
/// randomness.
///
/// Non-deterministic by nature; reproducible runs come from the harness
/// environment, not this one.
#[derive(Clone, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    type Instant = std::time::Instant;

    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }

    fn unix_millis(&self) -> u64 {
        // A clock set before the epoch yields 0 rather than a panic; the
        // timestamp is display-only so a nonsense value degrades rendering,
        // nothing else.
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |since| since.as_millis() as u64)
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        rand::thread_rng().fill_bytes(buffer);
    }
}
