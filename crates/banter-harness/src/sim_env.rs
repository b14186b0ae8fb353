//! Simulated environment: manual clock, seeded RNG.

use std::{
    ops::{Add, Sub},
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use banter_client::Environment;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Wall-clock base the simulation starts from, in Unix milliseconds.
/// An arbitrary but realistic point in time so generated message ids look
/// like production ids.
const SIM_EPOCH_MILLIS: u64 = 1_700_000_000_000;

/// Virtual instant: elapsed simulation time since the environment was
/// created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SimInstant(Duration);

impl Sub for SimInstant {
    type Output = Duration;

    fn sub(self, earlier: Self) -> Duration {
        self.0.saturating_sub(earlier.0)
    }
}

impl Add<Duration> for SimInstant {
    type Output = Self;

    fn add(self, duration: Duration) -> Self {
        Self(self.0 + duration)
    }
}

struct SimState {
    elapsed: Duration,
    rng: ChaCha8Rng,
}

/// Simulated environment for deterministic tests.
///
/// Clones share the same clock and RNG, so a test can hold one handle to
/// advance time while the client under test holds another.
#[derive(Clone)]
pub struct SimEnv {
    state: Arc<Mutex<SimState>>,
}

impl SimEnv {
    /// Create a simulation environment with the given RNG seed. Time
    /// starts at zero elapsed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                elapsed: Duration::ZERO,
                rng: ChaCha8Rng::seed_from_u64(seed),
            })),
        }
    }

    /// Advance the simulated clock. Both the monotonic instant and the
    /// wall clock move together, as they do on a real machine.
    pub fn advance(&self, duration: Duration) {
        self.lock().elapsed += duration;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SimState> {
        // A poisoned lock only means a panicking test thread; the state
        // itself stays coherent
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Environment for SimEnv {
    type Instant = SimInstant;

    fn now(&self) -> Self::Instant {
        SimInstant(self.lock().elapsed)
    }

    fn unix_millis(&self) -> u64 {
        SIM_EPOCH_MILLIS + self.lock().elapsed.as_millis() as u64
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        self.lock().rng.fill_bytes(buffer);
    }
}
