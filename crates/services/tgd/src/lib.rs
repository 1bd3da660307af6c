//! tokengate service library.
//!
//! The binary in `main.rs` is a thin wrapper around [`api::setup_api`];
//! keeping the wiring here lets integration tests start the same server on
//! an ephemeral port.

pub mod api;
pub mod error;
pub mod prelude;
pub mod state;
