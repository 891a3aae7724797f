//! Port traits for the engine's collaborators.

pub mod config_port;
pub mod series_port;
