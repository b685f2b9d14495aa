//! Mechanism subsystems
//!
//! Each subsystem keeps its demanded output and publishes it into the
//! `actuators` telemetry table on refresh, where the motor drivers pick it up.

pub mod climber;
pub mod color_spinner;
pub mod drive;
pub mod shooter;

pub use climber::{ClimbDirection, ClimberSubsystem};
pub use color_spinner::{ColorSpinnerSubsystem, WheelColor};
pub use drive::{DriveMode, DriveSubsystem};
pub use shooter::ShooterSubsystem;
