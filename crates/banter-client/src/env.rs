//! Environment abstraction for deterministic testing.
//!
//! Decouples the synchronization core from system resources (monotonic
//! time, wall-clock time, randomness). Production code plugs in the real
//! system clock and OS entropy; tests drive a manual clock and a seeded
//! RNG so every run is reproducible.

use std::time::Duration;

/// Abstract environment providing time and randomness.
///
/// # Invariants
///
/// Implementations MUST guarantee:
///
/// - `now()` never goes backwards within a single execution context
/// - `unix_millis()` tracks the same clock the peer's timestamps use
/// - Given the same seed, `random_bytes()` produces the same sequence
pub trait Environment: Clone + Send + Sync + 'static {
    /// The specific instant type used by this environment.
    ///
    /// Production environments use `std::time::Instant`; simulation
    /// environments use virtual time.
    type Instant: Copy + Ord + Send + Sync + std::ops::Sub<Output = Duration>;

    /// Current monotonic time, for deadlines and debounce arithmetic.
    fn now(&self) -> Self::Instant;

    /// Current wall-clock time in Unix milliseconds, for wire timestamps
    /// and message id composition.
    fn unix_millis(&self) -> u64;

    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random `u64`.
    ///
    /// Convenience for id suffixes and similar small draws.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }
}
