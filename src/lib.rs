//! Blockfall (workspace facade crate).
//!
//! Re-exports the workspace crates under one `blockfall::{core,engine,types}`
//! path and hosts the demo input source used by the default binary.

pub mod autopilot;

pub use blockfall_core as core;
pub use blockfall_engine as engine;
pub use blockfall_types as types;
