//! Configuration validation.
//!
//! Validates engine and data settings before any formula runs.

use crate::domain::engine::{DEFAULT_MAX_NODES, EngineConfig};
use crate::domain::error::EconcalcError;
use crate::domain::formatter::OutputType;
use crate::ports::config_port::ConfigPort;

pub fn validate_engine_config(config: &dyn ConfigPort) -> Result<(), EconcalcError> {
    validate_max_nodes(config)?;
    validate_output_type(config)?;
    validate_data_dir(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> EconcalcError {
    EconcalcError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_max_nodes(config: &dyn ConfigPort) -> Result<(), EconcalcError> {
    let Some(raw) = config.get_string("engine", "max_nodes") else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => Ok(()),
        Ok(_) => Err(invalid("engine", "max_nodes", "max_nodes must be positive")),
        Err(_) => Err(invalid(
            "engine",
            "max_nodes",
            format!("max_nodes must be an integer, got '{}'", raw.trim()),
        )),
    }
}

fn validate_output_type(config: &dyn ConfigPort) -> Result<(), EconcalcError> {
    match config.get_string("engine", "output_type") {
        None => Ok(()),
        Some(raw) => raw
            .parse::<OutputType>()
            .map(|_| ())
            .map_err(|reason| invalid("engine", "output_type", reason)),
    }
}

fn validate_data_dir(config: &dyn ConfigPort) -> Result<(), EconcalcError> {
    match config.get_string("data", "dir") {
        Some(dir) if dir.trim().is_empty() => {
            Err(invalid("data", "dir", "dir must not be empty"))
        }
        _ => Ok(()),
    }
}

/// Build the engine settings; call [`validate_engine_config`] first.
pub fn build_engine_config(config: &dyn ConfigPort) -> Result<EngineConfig, EconcalcError> {
    validate_max_nodes(config)?;
    let max_nodes = config.get_int("engine", "max_nodes", DEFAULT_MAX_NODES as i64);
    Ok(EngineConfig {
        max_nodes: max_nodes as usize,
    })
}

/// Declared output type from `[engine] output_type`, defaulting to series.
pub fn configured_output_type(config: &dyn ConfigPort) -> Result<OutputType, EconcalcError> {
    match config.get_string("engine", "output_type") {
        None => Ok(OutputType::default()),
        Some(raw) => raw
            .parse()
            .map_err(|reason| invalid("engine", "output_type", reason)),
    }
}
