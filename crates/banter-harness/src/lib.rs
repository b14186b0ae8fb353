//! Deterministic simulation harness for banter tests.
//!
//! Two pieces make every test reproducible:
//!
//! - [`SimEnv`]: a manual clock and a seeded RNG implementing the client's
//!   `Environment` trait. Time advances only when the test says so, and
//!   the same seed always yields the same id suffixes.
//! - [`SimDriver`]: an in-memory implementation of the app's `Driver`
//!   trait. Tests inject session events through a [`SimNetwork`] and
//!   inspect everything the engine tried to send.
//!
//! The same `SyncEngine` orchestration code runs over these as over the
//! production WebSocket stack.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod sim_driver;
mod sim_env;

pub use sim_driver::{SimDriver, SimNetwork};
pub use sim_env::{SimEnv, SimInstant};
