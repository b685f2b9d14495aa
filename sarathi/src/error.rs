//! Error types for Sarathi
//!
//! Every variant is a configuration or wiring mistake detected before the
//! first control tick. Telemetry degradation is never an error; the vision
//! subsystem reports sentinel values instead.

use crate::config::Capability;
use thiserror::Error;

/// Sarathi error type
#[derive(Error, Debug)]
pub enum Error {
    /// A second instance of a subsystem type was registered
    #[error("Subsystem already registered: {0}")]
    SubsystemAlreadyRegistered(&'static str),

    /// A subsystem already has a default command bound
    #[error("Default command for {subsystem} already set to '{existing}', refusing '{rejected}'")]
    DuplicateDefaultCommand {
        /// Subsystem the default command was requested for
        subsystem: &'static str,
        /// Command that is already bound
        existing: String,
        /// Command that was refused
        rejected: String,
    },

    /// A default command must claim the subsystem it is the default for
    #[error("Default command '{command}' does not require {subsystem}")]
    DefaultCommandMissingRequirement {
        subsystem: &'static str,
        command: String,
    },

    /// A binding or command was requested for a capability that is switched off
    #[error("Capability disabled: {0}")]
    CapabilityDisabled(Capability),

    /// Command id not issued by this scheduler
    #[error("Unknown command id: {0}")]
    UnknownCommand(usize),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
