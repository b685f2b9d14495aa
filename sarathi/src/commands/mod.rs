//! Command implementations
//!
//! - [`drive`]: operator drive, drive modes, timed straight drive
//! - [`vision`]: turn-to-target alignment
//! - [`mechanisms`]: shooter, climber and color spinner

pub mod drive;
pub mod mechanisms;
pub mod vision;

pub use drive::{AutoDriveLinear, DriveModeCommand, ManualDrive};
pub use mechanisms::{ClimbCommand, ColorTargetCommand, ShooterCommand};
pub use vision::VisionAlign;
