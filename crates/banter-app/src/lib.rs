//! Transport session and sync engine
//!
//! The I/O half of the banter chat client. [`Session`] owns the single
//! WebSocket connection and converts it into plain channels; [`SyncEngine`]
//! is the event loop that feeds transport traffic, user commands, and
//! periodic ticks into the pure [`banter_client::Client`] state machine and
//! executes the actions it returns.
//!
//! # Components
//!
//! - [`Session`]: the WebSocket connection with reconnect backoff and
//!   idempotent teardown
//! - [`Driver`]: platform I/O abstraction so the same engine loop runs on a
//!   real socket and in simulation
//! - [`WsDriver`]: production driver adapting a [`Session`]
//! - [`SyncEngine`]: the orchestration loop; publishes the derived view
//!   through a watch channel
//! - [`ChatHandle`]: the surface API handed to frontends
//! - [`SystemEnv`]: production time and randomness

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod driver;
mod engine;
mod error;
mod handle;
mod system_env;
mod transport;
mod ws;

pub use driver::Driver;
pub use engine::{EngineConfig, SyncEngine};
pub use error::{EngineError, TransportError};
pub use handle::{ChatHandle, Command};
pub use system_env::SystemEnv;
pub use transport::{Backoff, Session, SessionEvent};
pub use ws::WsDriver;
