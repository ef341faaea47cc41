//! Async host for the blockfall core.
//!
//! The core is synchronous and never reads a clock. This crate supplies the
//! rest of a running game:
//!
//! - [`Session`]: one `GameState` behind a tokio mutex, with a play clock and
//!   a `watch` channel announcing lifecycle changes
//! - [`spawn_gravity`]: ticks the session at the current drop interval
//! - [`spawn_input_pump`]: feeds a bounded intent queue into the session
//! - [`RunSink`]: where finished runs are reported
//! - [`EngineConfig`]: environment-driven settings

pub mod config;
pub mod scheduler;
pub mod session;
pub mod sink;

pub use config::{ConfigError, EngineConfig};
pub use scheduler::{spawn_gravity, spawn_input_pump, GravityHandle};
pub use session::{RunStatus, Session};
pub use sink::{ChannelSink, JsonLinesSink, RunSink, SinkError, TracingSink};
