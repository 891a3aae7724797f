//! econcalc — formula engine for calculations over economic time series.
//!
//! Hexagonal architecture: the pure engine lives in [`domain`], collaborator traits in
//! [`ports`], concrete implementations (INI config, CSV series files) in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
