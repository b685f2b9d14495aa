//! Sarathi - Command orchestration and vision tracking for a competition robot
//!
//! This library provides the periodic control core of the robot: singleton
//! subsystems refreshed once per tick, commands started and stopped by
//! operator input and match phase, and a vision subsystem that turns camera
//! telemetry into alignment and distance estimates.
//!
//! ## Modules
//!
//! - [`registry`]: one instance per subsystem type, refreshed in order
//! - [`scheduler`]: command lifecycle, subsystem claims, default commands
//! - [`bindings`]: operator controls to commands, gated by capability
//! - [`phase`]: disabled / teleop / autonomous entry side effects
//! - [`vision`]: target tracking and distance estimation
//! - [`robot`]: builds all of the above from a [`SarathiConfig`]
//!
//! Motor drivers, sensor parsers and the vision processor sit outside this
//! crate and exchange values through [`telemetry`] tables.

pub mod bindings;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod input;
pub mod phase;
pub mod registry;
pub mod robot;
pub mod scheduler;
pub mod subsystems;
pub mod telemetry;
pub mod vision;

// Re-export commonly used types
pub use config::{Capability, CapabilityConfig, GeometricConstants, SarathiConfig};
pub use error::{Error, Result};
pub use input::InputHub;
pub use phase::MatchPhase;
pub use robot::Robot;
pub use telemetry::{TelemetryHub, TelemetryTable};
