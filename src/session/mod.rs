//! The session layer: connect/download/disconnect dialogue state machine
//! built on top of `wire` and `record`.

/// The `Client` type and its connect/download/disconnect dialogue.
pub mod client;
/// Session configuration.
pub mod config;
/// The lazy per-record download sequence.
pub mod download;
/// Session state machine states.
pub mod state;

pub use client::Client;
pub use config::Config;
pub use download::Download;
pub use state::State;
